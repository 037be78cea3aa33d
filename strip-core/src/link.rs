//! Begrenzter Verbindungsaufbau für den Network Link

use embedded_hal_async::delay::DelayNs;

use crate::traits::NetworkLink;
use crate::types::LinkState;

/// Retry-Budget für einen Verbindungsaufbau
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReconnectPolicy {
    /// Maximale Anzahl Status-Abfragen pro Verbindungsaufbau
    pub attempts: u32,
    /// Pause zwischen zwei Abfragen
    pub delay_ms: u32,
    /// Pause nach einem gescheiterten Verbindungsaufbau
    pub backoff_ms: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            attempts: 20,
            delay_ms: 500,
            backoff_ms: 1000,
        }
    }
}

impl ReconnectPolicy {
    /// Maximale Dauer eines Verbindungsaufbaus in Millisekunden
    pub fn budget_ms(&self) -> u64 {
        u64::from(self.attempts) * u64::from(self.delay_ms)
    }
}

/// Verbindet den Link mit begrenztem Retry-Budget
///
/// Startet den Verbindungsaufbau und fragt danach höchstens
/// `policy.attempts` mal den Status ab, jeweils im Abstand von
/// `policy.delay_ms`. Kehrt nach spätestens `policy.budget_ms()` zurück.
pub async fn connect<L, D>(link: &mut L, delay: &mut D, policy: &ReconnectPolicy) -> LinkState
where
    L: NetworkLink,
    D: DelayNs,
{
    if link.begin_connect().await.is_err() {
        return LinkState::Disconnected;
    }

    for _ in 0..policy.attempts {
        if link.is_connected() {
            return LinkState::Connected;
        }
        delay.delay_ms(policy.delay_ms).await;
    }

    if link.is_connected() {
        LinkState::Connected
    } else {
        LinkState::Disconnected
    }
}
