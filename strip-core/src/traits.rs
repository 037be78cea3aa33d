//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Netzwerk- und LED-Zugriff
//! ohne konkrete Implementierung.

use core::net::SocketAddr;

use rgb::RGB8;

/// Fehler-Typ für LED-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedError {
    WriteFailed,
}

/// Fehler-Typ für Netzwerk-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Client-Konfiguration (SSID/Passwort) wurde abgelehnt
    ConfigFailed,
    /// WiFi-Treiber konnte nicht gestartet werden
    StartFailed,
    /// Verbindungsaufbau konnte nicht eingeleitet werden
    ConnectFailed,
    /// UDP-Socket konnte nicht gebunden werden
    BindFailed,
}

/// Metadaten eines empfangenen Datagramms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Datagram {
    /// Tatsächlich in den Buffer kopierte Bytes
    pub len: usize,
    pub source: Option<SocketAddr>,
}

/// Trait für den Netzwerk-Zugang (WiFi + UDP)
///
/// # Implementierungen
/// - **Production:** WifiLink (esp-radio + embassy-net)
/// - **Testing:** MockLink (in-memory Queue)
///
/// Die Retry-Logik liegt nicht im Trait, sondern in [`crate::link::connect`].
#[allow(async_fn_in_trait)]
pub trait NetworkLink {
    /// Startet einen Verbindungsversuch, ohne auf das Ergebnis zu warten
    async fn begin_connect(&mut self) -> Result<(), LinkError>;

    /// Günstige, nicht-blockierende Abfrage des aktuellen Zustands
    fn is_connected(&self) -> bool;

    /// Bindet den Empfangs-Socket (neu), nachdem die Verbindung steht
    fn open_receiver(&mut self) -> Result<(), LinkError>;

    /// Holt ein wartendes Datagramm ab, falls vorhanden
    ///
    /// Blockiert nie. Darf nur bei bestehender Verbindung aufgerufen werden.
    fn try_receive(&mut self, buf: &mut [u8]) -> Option<Datagram>;
}

/// Trait für den Output Driver (WS2812 Strip)
///
/// # Implementierungen
/// - **Production:** RmtStripWriter (ESP32 RMT Peripheral)
/// - **Testing:** MockStrip (in-memory Mock)
pub trait StripOutput {
    /// Setzt die globale Helligkeit für den nächsten `show()`
    fn set_brightness(&mut self, brightness: u8);

    /// Schreibt alle Pixel auf den Strip
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::WriteFailed` zurück wenn Hardware-Zugriff fehlschlägt
    fn show(&mut self, pixels: &[RGB8]) -> Result<(), LedError>;
}
