// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen

use strip_core::{ReconnectPolicy, StripIdentity, packet_len};

// ============================================================================
// Geräte-Variante (Cargo Feature strip-0 / strip-1 / strip-2)
// ============================================================================

#[cfg(not(any(feature = "strip-0", feature = "strip-1", feature = "strip-2")))]
compile_error!("Genau ein Feature strip-0, strip-1 oder strip-2 aktivieren");

#[cfg(any(
    all(feature = "strip-0", feature = "strip-1"),
    all(feature = "strip-0", feature = "strip-2"),
    all(feature = "strip-1", feature = "strip-2"),
))]
compile_error!("Nur ein Strip-Feature gleichzeitig erlaubt (--no-default-features nutzen)");

/// Identität dieses Geräts im Netzwerk
#[cfg(feature = "strip-0")]
pub const STRIP_ID: StripIdentity = StripIdentity::new(0);
#[cfg(feature = "strip-1")]
pub const STRIP_ID: StripIdentity = StripIdentity::new(1);
#[cfg(feature = "strip-2")]
pub const STRIP_ID: StripIdentity = StripIdentity::new(2);

/// GPIO-Pin für die Datenleitung des Strips (nur für Logs, Zuordnung in main.rs)
#[cfg(feature = "strip-0")]
pub const LED_GPIO_PIN: u8 = 10;
#[cfg(feature = "strip-1")]
pub const LED_GPIO_PIN: u8 = 18;
#[cfg(feature = "strip-2")]
pub const LED_GPIO_PIN: u8 = 19;

// ============================================================================
// LED Konfiguration
// ============================================================================

/// Anzahl der LEDs im Strip
pub const PIXEL_COUNT: usize = 1000;

/// Helligkeit beim Start, bis der erste Frame eine andere vorgibt
pub const DEFAULT_BRIGHTNESS: u8 = strip_core::DEFAULT_BRIGHTNESS;

/// RMT Pulse-Buffer: 24 Bits pro LED + 1 Reset (wie smart_led_buffer!)
pub const RMT_BUFFER_SIZE: usize = PIXEL_COUNT * 24 + 1;

/// RMT Taktfrequenz in MHz
/// 80 MHz ist optimal für WS2812 LED-Timing
pub const RMT_CLOCK_MHZ: u32 = 80;

/// Timeout ohne gültigen Frame bis zum Blackout
pub const LIVENESS_TIMEOUT_MS: u64 = 5000;

/// Pause zwischen zwei Durchläufen der Steuerschleife
pub const TICK_INTERVAL_MS: u64 = 1;

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// WiFi SSID (Netzwerk-Name)
/// Wird zur Build-Zeit aus der Environment Variable WIFI_SSID geladen
/// Setze diese in .env file (siehe .env.example)
pub const WIFI_SSID: &str = env!(
    "WIFI_SSID",
    "WiFi SSID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// WiFi Passwort
/// Wird zur Build-Zeit aus der Environment Variable WIFI_PASSWORD geladen
/// Setze diese in .env file (siehe .env.example)
pub const WIFI_PASSWORD: &str = env!(
    "WIFI_PASSWORD",
    "WiFi Password nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Maximale Status-Abfragen pro Verbindungsaufbau
pub const RECONNECT_ATTEMPTS: u32 = 20;

/// Pause zwischen zwei Status-Abfragen
pub const RECONNECT_DELAY_MS: u32 = 500;

/// Pause nach einem gescheiterten Verbindungsaufbau
pub const RECONNECT_BACKOFF_MS: u32 = 1000;

/// Retry-Budget: höchstens 20 × 500 ms = 10 s pro Verbindungsaufbau
pub const RECONNECT_POLICY: ReconnectPolicy = ReconnectPolicy {
    attempts: RECONNECT_ATTEMPTS,
    delay_ms: RECONNECT_DELAY_MS,
    backoff_ms: RECONNECT_BACKOFF_MS,
};

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

// ============================================================================
// UDP Konfiguration
// ============================================================================

/// UDP Port, auf dem alle Strips lauschen
pub const UDP_PORT: u16 = 8888;

/// Größe eines vollständigen Frames auf dem Draht (2 + 3 × 1000 = 3002 Bytes)
pub const FRAME_LEN: usize = packet_len(PIXEL_COUNT);

/// Größtes Datagramm, das smoltcp aus IP-Fragmenten zusammensetzt
/// Muss zum Feature `reassembly-buffer-size-4096` in Cargo.toml passen
pub const REASSEMBLY_BUFFER_SIZE: usize = 4096;

/// Empfangs-Buffer der Steuerschleife
/// So groß wie das größte zusammengesetzte Datagramm, damit nichts abgeschnitten wird
pub const RX_BUFFER_SIZE: usize = REASSEMBLY_BUFFER_SIZE;

const _: () = assert!(FRAME_LEN <= REASSEMBLY_BUFFER_SIZE);
const _: () = assert!(RX_BUFFER_SIZE >= REASSEMBLY_BUFFER_SIZE);

/// Socket-Buffer für eingehende Datagramme (zwei volle Frames)
pub const UDP_RX_BUFFER_SIZE: usize = 2 * RX_BUFFER_SIZE;

/// Socket-Buffer für ausgehende Datagramme (Empfänger sendet nie)
pub const UDP_TX_BUFFER_SIZE: usize = 64;

/// Anzahl Metadaten-Slots (Datagramme) im Socket
pub const UDP_META_SLOTS: usize = 4;

// ============================================================================
// Debug-Ausgaben
// ============================================================================

/// Verbindungs- und Blackout-Meldungen ausgeben
pub const SERIAL_DEBUG: bool = true;

/// Jedes empfangene Datagramm loggen (Länge, Absender, Ergebnis)
pub const DEBUG_PACKET_RECEIVED: bool = false;

/// Jeden Push auf den Strip loggen
pub const DEBUG_LED_UPDATES: bool = false;
