//! Packet Decoder für das Strip-Protokoll
//!
//! Datagramm-Layout (fest, ohne Versionierung):
//!
//! ```text
//! [strip_id][brightness][R][G][B][R][G][B]...
//!  1 Byte    1 Byte      3 Bytes pro Pixel, aufsteigender Index
//! ```
//!
//! Jedes Gerät am Port empfängt jedes Paket und verwirft alles, was nicht an
//! seine eigene Identität adressiert ist.

use crate::types::{BYTES_PER_PIXEL, Command, HEADER_LEN, StripIdentity};

/// Grund für das Verwerfen eines Datagramms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Weniger als die zwei Header-Bytes empfangen
    TooShort { len: usize },
    /// Paket gehört zu einem anderen Strip (normaler Betrieb, kein Fehler)
    NotAddressed { target: u8 },
    /// Weniger Farb-Bytes als `3 * N`
    Incomplete { expected: usize, actual: usize },
}

impl Rejection {
    /// `false` nur für fremd adressierte Pakete
    pub fn is_error(&self) -> bool {
        !matches!(self, Rejection::NotAddressed { .. })
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Rejection {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Rejection::TooShort { len } => defmt::write!(fmt, "too short ({} bytes)", len),
            Rejection::NotAddressed { target } => {
                defmt::write!(fmt, "addressed to strip {}", target)
            }
            Rejection::Incomplete { expected, actual } => defmt::write!(
                fmt,
                "incomplete payload ({} of {} color bytes)",
                actual,
                expected
            ),
        }
    }
}

/// Dekodiert und validiert ein Datagramm für diesen Strip
///
/// Prüfreihenfolge: Länge des Headers, Ziel-Identität, Vollständigkeit des
/// Payloads. Bytes hinter `2 + 3 * pixel_count` werden ignoriert.
pub fn decode(
    bytes: &[u8],
    identity: StripIdentity,
    pixel_count: usize,
) -> Result<Command<'_>, Rejection> {
    let [target, brightness, payload @ ..] = bytes else {
        return Err(Rejection::TooShort { len: bytes.len() });
    };

    if *target != identity.get() {
        return Err(Rejection::NotAddressed { target: *target });
    }

    let expected = pixel_count * BYTES_PER_PIXEL;
    if payload.len() < expected {
        return Err(Rejection::Incomplete {
            expected,
            actual: bytes.len() - HEADER_LEN,
        });
    }

    Ok(Command {
        target: identity,
        brightness: *brightness,
        payload: &payload[..expected],
    })
}
