// Library-Root: Wiederverwendbare Logik und Module
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;

// Re-exports von strip-core
pub use strip_core::{
    LedError, LinkError, NetworkLink, StripController, StripIdentity, StripOutput, StripState,
};
