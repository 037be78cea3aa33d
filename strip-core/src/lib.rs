//! Strip Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert Traits für Netzwerk und LED-Strip sowie die komplette
//! Steuerlogik (Decoder, Liveness Monitor, Controller).

#![no_std]

pub mod controller;
pub mod decoder;
pub mod frame;
pub mod link;
pub mod liveness;
pub mod logic;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use controller::{PacketReport, StripController, StripState, TickReport};
pub use decoder::{Rejection, decode};
pub use frame::FrameBuffer;
pub use link::{ReconnectPolicy, connect};
pub use liveness::{Liveness, LivenessMonitor};
pub use logic::{TYPICAL_LED_STRIP, UNCORRECTED, correct_color, scale8};
pub use traits::{Datagram, LedError, LinkError, NetworkLink, StripOutput};
pub use types::{
    BYTES_PER_PIXEL, Command, DEFAULT_BRIGHTNESS, DEFAULT_TIMEOUT_MS, HEADER_LEN, LinkState,
    StripIdentity, packet_len,
};
