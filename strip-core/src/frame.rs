//! Frame Buffer für einen Strip mit fester Pixel-Anzahl
//!
//! Die Länge wird über den Const-Generic `N` festgelegt und ändert sich
//! nach der Initialisierung nie. Index `i` entspricht Pixel `i` am Strip.

use rgb::RGB8;

use crate::types::Command;

/// Pixel-Farben plus globale Helligkeit eines Strips
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer<const N: usize> {
    pixels: [RGB8; N],
    brightness: u8,
    dirty: bool,
}

impl<const N: usize> FrameBuffer<N> {
    /// Erstellt einen Frame mit allen Pixeln aus
    ///
    /// Der Frame startet als "dirty", damit der erste Push den Strip
    /// in einen definierten Zustand bringt.
    pub const fn new(brightness: u8) -> Self {
        Self {
            pixels: [RGB8 { r: 0, g: 0, b: 0 }; N],
            brightness,
            dirty: true,
        }
    }

    pub fn pixels(&self) -> &[RGB8; N] {
        &self.pixels
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Übernimmt Helligkeit und Farben aus einem akzeptierten Kommando
    ///
    /// Pixel, für die der Payload kein vollständiges Tripel mehr enthält,
    /// bleiben unverändert. Überschüssige Tripel werden ignoriert.
    pub fn apply(&mut self, command: &Command<'_>) {
        self.brightness = command.brightness;
        for (slot, color) in self.pixels.iter_mut().zip(command.pixels()) {
            *slot = color;
        }
        self.dirty = true;
    }

    /// Setzt alle Farben auf Schwarz, die Helligkeit bleibt erhalten
    pub fn blank(&mut self) {
        self.pixels = [RGB8::default(); N];
        self.dirty = true;
    }

    /// Liefert `true` genau einmal nach jeder Änderung
    pub fn take_dirty(&mut self) -> bool {
        core::mem::replace(&mut self.dirty, false)
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
