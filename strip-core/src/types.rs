//! Core Types für die Strip-Steuerung
//!
//! Datenstrukturen ohne Hardware-Dependencies

use rgb::RGB8;

/// Anzahl Header-Bytes pro Datagramm: `[strip_id][brightness]`
pub const HEADER_LEN: usize = 2;

/// Bytes pro Pixel im Payload (R, G, B)
pub const BYTES_PER_PIXEL: usize = 3;

/// Helligkeit beim Start (volle Helligkeit, Farben aus)
pub const DEFAULT_BRIGHTNESS: u8 = 255;

/// Standard-Timeout bis zum Blackout in Millisekunden
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Nominale Datagramm-Größe für `pixel_count` Pixel
///
/// ```
/// # use strip_core::packet_len;
/// assert_eq!(packet_len(1000), 3002);
/// ```
pub const fn packet_len(pixel_count: usize) -> usize {
    HEADER_LEN + pixel_count * BYTES_PER_PIXEL
}

/// Identität eines Strips im Netzwerk (0, 1, 2, ...)
///
/// Wird zur Build-Zeit pro Gerät festgelegt. Alle Geräte hören auf
/// demselben Port und verwerfen Pakete, die nicht an sie adressiert sind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StripIdentity(u8);

impl StripIdentity {
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

/// Verbindungs-Zustand des Network Links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    Disconnected,
    Connected,
}

impl LinkState {
    pub fn is_connected(self) -> bool {
        matches!(self, LinkState::Connected)
    }
}

/// Dekodiertes Strip-Kommando
///
/// Lebt nur für einen Apply-Schritt und zeigt direkt in den Empfangs-Buffer
/// (keine Kopie der Farbdaten).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command<'a> {
    pub target: StripIdentity,
    pub brightness: u8,
    pub payload: &'a [u8],
}

impl<'a> Command<'a> {
    /// Iteriert über alle vollständigen (R, G, B) Tripel im Payload
    pub fn pixels(&self) -> impl Iterator<Item = RGB8> + 'a {
        self.payload
            .chunks_exact(BYTES_PER_PIXEL)
            .map(|rgb| RGB8::new(rgb[0], rgb[1], rgb[2]))
    }
}
