// Receiver Task - Steuerschleife: UDP-Frames empfangen und auf den Strip schreiben
use defmt::{Debug2Format, debug, error, info, warn};
use embassy_time::{Delay, Duration, Instant, Timer};
use embedded_hal_async::delay::DelayNs;
use esp_hal::gpio::AnyPin;
use esp_hal::rmt::PulseCode;
use strip_core::{
    FrameBuffer, LinkState, NetworkLink, PacketReport, StripController, StripOutput, StripState,
    TickReport,
};

use crate::config::{
    DEBUG_LED_UPDATES, DEBUG_PACKET_RECEIVED, DEFAULT_BRIGHTNESS, LED_GPIO_PIN,
    LIVENESS_TIMEOUT_MS, PIXEL_COUNT, RECONNECT_POLICY, RMT_BUFFER_SIZE, RMT_CLOCK_MHZ,
    RX_BUFFER_SIZE, SERIAL_DEBUG, STRIP_ID, TICK_INTERVAL_MS, UDP_PORT,
};
use crate::hal::RmtStripWriter;
use crate::tasks::wifi::WifiLink;

/// Receiver Logic - Steuerschleife, generisch über die Traits aus strip-core
///
/// Startet den Controller (Strip löschen, erste Verbindung) und ruft danach
/// endlos `tick()` auf. Zwischen zwei Ticks gibt der Task die CPU ab, damit
/// der Netzwerk-Stack laufen kann.
///
/// # Trait-basierte Abstraktion
/// - `L: NetworkLink` - WifiLink
/// - `O: StripOutput` - RmtStripWriter
/// - `D: DelayNs` - embassy_time::Delay
pub async fn receiver_logic<L, O, D, const N: usize>(
    controller: &mut StripController<'_, L, O, D, N>,
) -> !
where
    L: NetworkLink,
    O: StripOutput,
    D: DelayNs,
{
    let report = controller.start().await;
    log_report(&report, controller.state().frame());

    loop {
        let report = controller.tick(Instant::now().as_millis()).await;
        log_report(&report, controller.state().frame());

        Timer::after(Duration::from_millis(TICK_INTERVAL_MS)).await;
    }
}

/// Gibt aus, was in einem Tick passiert ist
fn log_report<const N: usize>(report: &TickReport, frame: &FrameBuffer<N>) {
    if report.link_lost {
        warn!("WiFi: Connection lost, reconnecting...");
    }

    match report.reconnect {
        Some(LinkState::Connected) => {
            if SERIAL_DEBUG {
                info!("WiFi: Connected, waiting for frames on port {}", UDP_PORT);
            }
        }
        Some(LinkState::Disconnected) => warn!("WiFi: Not connected, will retry..."),
        None => {}
    }

    if let Some(packet) = &report.packet {
        log_packet(packet);
    }

    if let Some(silent_ms) = report.blackout {
        if SERIAL_DEBUG {
            info!("Strip: No frame for {} ms, blackout", silent_ms);
        }
    }

    match report.output {
        Some(Ok(())) if DEBUG_LED_UPDATES => debug!(
            "Strip: Frame pushed, brightness {}, first pixel {}",
            frame.brightness(),
            Debug2Format(&frame.pixels().first())
        ),
        Some(Err(e)) => error!("Strip: Failed to write frame: {}", e),
        _ => {}
    }
}

fn log_packet(packet: &PacketReport) {
    match packet.result {
        Ok(()) if DEBUG_PACKET_RECEIVED => debug!(
            "UDP: Frame accepted ({} bytes from {})",
            packet.datagram.len,
            Debug2Format(&packet.datagram.source)
        ),
        Ok(()) => {}
        Err(rejection) if rejection.is_error() => warn!(
            "UDP: Datagram rejected ({} bytes from {}): {}",
            packet.datagram.len,
            Debug2Format(&packet.datagram.source),
            rejection
        ),
        // Frames für andere Strips sind normaler Betrieb
        Err(rejection) if DEBUG_PACKET_RECEIVED => debug!("UDP: {}", rejection),
        Err(_) => {}
    }
}

/// Receiver Task - Embassy Task für die Steuerschleife
///
/// Dieser Task übernimmt die Hardware-Initialisierung (RMT) und ruft dann
/// die testbare `receiver_logic()` Funktion auf.
///
/// # Parameter
/// - `link`: WiFi + UDP Link (in main.rs erstellt)
/// - `data_pin`: GPIO für die Datenleitung (je nach Strip-Feature)
/// - `rmt_peripheral`: RMT Peripheral für präzises Timing
/// - `rmt_buffer`: Pulse-Buffer für alle LEDs
/// - `rx_buffer`: Empfangs-Buffer für ein Datagramm
#[embassy_executor::task]
pub async fn receiver_task(
    link: WifiLink,
    data_pin: AnyPin<'static>,
    rmt_peripheral: esp_hal::peripherals::RMT<'static>,
    rmt_buffer: &'static mut [PulseCode; RMT_BUFFER_SIZE],
    rx_buffer: &'static mut [u8; RX_BUFFER_SIZE],
) {
    // Hardware initialisieren: RmtStripWriter kapselt RMT + SmartLED
    let output = match RmtStripWriter::new(data_pin, rmt_peripheral, RMT_CLOCK_MHZ, rmt_buffer) {
        Ok(output) => output,
        Err(e) => {
            error!("Strip: RMT init failed: {}", Debug2Format(&e));
            return;
        }
    };

    let state = StripState::<PIXEL_COUNT>::new(STRIP_ID, DEFAULT_BRIGHTNESS, LIVENESS_TIMEOUT_MS);
    info!(
        "Strip: ID {} on GPIO{}, {} pixels, blackout after {} ms",
        state.identity().get(),
        LED_GPIO_PIN,
        PIXEL_COUNT,
        state.liveness().timeout_ms()
    );

    let mut controller =
        StripController::new(link, output, Delay, state, RECONNECT_POLICY, &mut rx_buffer[..]);

    // Business Logic aufrufen (läuft endlos)
    receiver_logic(&mut controller).await
}
