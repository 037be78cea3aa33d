// WS2812 Strip Writer über das RMT Peripheral
//
// Implementiert `StripOutput` aus strip-core: Farbkorrektur und
// Helligkeit werden erst beim Schreiben angewendet, der Frame Buffer
// im Controller bleibt unverändert.

use esp_hal::Blocking;
use esp_hal::gpio::interconnect::PeripheralOutput;
use esp_hal::rmt::{PulseCode, Rmt};
use esp_hal::time::Rate;
use esp_hal_smartled::SmartLedsAdapter;
use rgb::RGB8;
use smart_leds::brightness;
use smart_leds_trait::SmartLedsWrite;
use strip_core::{LedError, StripOutput, TYPICAL_LED_STRIP, correct_color};

use crate::config::RMT_BUFFER_SIZE;

/// Real Hardware Strip Writer
///
/// Nutzt ESP32 RMT Peripheral um WS2812 LEDs anzusteuern.
///
/// Hinweis: Der Pulse-Buffer ist für 1000 LEDs ~96 KB groß und muss
/// 'static sein, daher liegt er in einer StaticCell (siehe main.rs).
pub struct RmtStripWriter<'a> {
    led: SmartLedsAdapter<'a, RMT_BUFFER_SIZE>,
    brightness: u8,
    correction: RGB8,
}

impl<'a> RmtStripWriter<'a> {
    /// Erstellt einen neuen RmtStripWriter
    ///
    /// # Parameter
    /// - `pin`: GPIO für die Datenleitung (je nach Strip-Feature)
    /// - `rmt_peripheral`: RMT Peripheral
    /// - `rmt_clock_mhz`: RMT Clock Frequenz in MHz (z.B. 80)
    /// - `buffer`: Pulse-Buffer für alle LEDs
    pub fn new(
        pin: impl PeripheralOutput<'a>,
        rmt_peripheral: esp_hal::peripherals::RMT<'a>,
        rmt_clock_mhz: u32,
        buffer: &'a mut [PulseCode; RMT_BUFFER_SIZE],
    ) -> Result<Self, esp_hal::rmt::Error> {
        let rmt: Rmt<'a, Blocking> = Rmt::new(rmt_peripheral, Rate::from_mhz(rmt_clock_mhz))?;
        let led = SmartLedsAdapter::new(rmt.channel0, pin, buffer);

        Ok(Self {
            led,
            brightness: u8::MAX,
            correction: TYPICAL_LED_STRIP,
        })
    }
}

impl StripOutput for RmtStripWriter<'_> {
    fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    fn show(&mut self, pixels: &[RGB8]) -> Result<(), LedError> {
        let correction = self.correction;
        let colors = pixels.iter().map(|&color| correct_color(color, correction));

        self.led
            .write(brightness(colors, self.brightness))
            .map_err(|_| LedError::WriteFailed)
    }
}
