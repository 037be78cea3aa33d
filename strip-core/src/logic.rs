//! Pure Business Logic Functions
//!
//! Farbkorrektur und Skalierung ohne Hardware-Dependencies (testbar!)

use rgb::RGB8;

/// Farbkorrektur für typische WS2812 Strips (Blau- und Grünanteil gedämpft)
pub const TYPICAL_LED_STRIP: RGB8 = RGB8 {
    r: 255,
    g: 176,
    b: 240,
};

/// Keine Korrektur
pub const UNCORRECTED: RGB8 = RGB8 {
    r: 255,
    g: 255,
    b: 255,
};

/// Skaliert einen Kanal mit `scale / 256`
///
/// `scale = 255` lässt den Wert unverändert, `scale = 0` ergibt 0.
///
/// # Beispiele
///
/// ```
/// # use strip_core::scale8;
/// assert_eq!(scale8(255, 255), 255);
/// assert_eq!(scale8(200, 128), 100);
/// assert_eq!(scale8(200, 0), 0);
/// ```
pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (scale as u16 + 1)) >> 8) as u8
}

/// Wendet eine Farbkorrektur kanalweise an
pub fn correct_color(color: RGB8, correction: RGB8) -> RGB8 {
    RGB8 {
        r: scale8(color.r, correction.r),
        g: scale8(color.g, correction.g),
        b: scale8(color.b, correction.b),
    }
}
