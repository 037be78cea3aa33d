// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (WiFi benötigt dynamischen Speicher)
extern crate alloc;

// Embassy Async Runtime
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, StackResources};
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::gpio::AnyPin;
use esp_hal::rmt::PulseCode;
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;
use esp_hal_smartled::smart_led_buffer;
use static_cell::StaticCell;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use strip_receiver::config::{
    EXTRA_HEAP_SIZE, PIXEL_COUNT, RMT_BUFFER_SIZE, RX_BUFFER_SIZE, WIFI_HEAP_SIZE,
};
use strip_receiver::tasks::{UdpBuffers, WifiLink, net_task, receiver_task};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Hardware, WiFi, startet Embassy Runtime und spawnt Tasks.
/// Danach schläft main() - alle Arbeit läuft in Tasks.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Heap Allocator initialisieren (WiFi braucht dynamischen Speicher!)
    // Zwei Bereiche: reclaimed RAM (64 KB) + extra (36 KB) = 100 KB total
    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // WiFi Hardware initialisieren
    static RADIO_INIT: StaticCell<esp_radio::Controller> = StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));

    let (wifi_controller, wifi_interface) =
        esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi");

    // Netzwerk-Stack erstellen
    // Random seed für TCP/IP Stack (von Hardware RNG)
    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    // Static resources für embassy-net
    // 2 Sockets: DHCP (1) + UDP-Empfang (1)
    static RESOURCES: StaticCell<StackResources<2>> = StaticCell::new();
    let resources = RESOURCES.init(StackResources::new());

    // embassy-net erstellt Stack + Runner (nutzt STA interface für Client-Modus)
    let (stack, runner) = embassy_net::new(
        wifi_interface.sta,
        NetConfig::dhcpv4(Default::default()),
        resources,
        seed,
    );

    // UDP-Socket Buffer (müssen 'static sein)
    static UDP_BUFFERS: StaticCell<UdpBuffers> = StaticCell::new();
    let udp_buffers = UDP_BUFFERS.init_with(UdpBuffers::new);
    let link = WifiLink::new(wifi_controller, stack, udp_buffers);

    // Datenleitung je nach Strip-Feature
    #[cfg(feature = "strip-0")]
    let data_pin: AnyPin<'static> = peripherals.GPIO10.into();
    #[cfg(feature = "strip-1")]
    let data_pin: AnyPin<'static> = peripherals.GPIO18.into();
    #[cfg(feature = "strip-2")]
    let data_pin: AnyPin<'static> = peripherals.GPIO19.into();

    // RMT Pulse-Buffer für alle LEDs (~96 KB, daher static statt Stack)
    static RMT_BUFFER: StaticCell<[PulseCode; RMT_BUFFER_SIZE]> = StaticCell::new();
    let rmt_buffer = RMT_BUFFER.init_with(|| smart_led_buffer!(PIXEL_COUNT));

    // Empfangs-Buffer für ein Datagramm
    static RX_BUFFER: StaticCell<[u8; RX_BUFFER_SIZE]> = StaticCell::new();
    let rx_buffer = RX_BUFFER.init([0; RX_BUFFER_SIZE]);

    // Spawn Network Task (muss laufen, bevor der Receiver verbindet)
    spawner.spawn(net_task(runner)).unwrap();

    // Spawn Receiver Task (Strip löschen, verbinden, Frames empfangen)
    spawner
        .spawn(receiver_task(
            link,
            data_pin,
            peripherals.RMT,
            rmt_buffer,
            rx_buffer,
        ))
        .unwrap();

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
