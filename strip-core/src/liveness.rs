//! Liveness Monitor: schaltet den Strip ab, wenn keine Daten mehr kommen
//!
//! Zwei Zustände: Live (kürzlich Daten gesehen) und Blackout (zu lange
//! nichts). Ein Gerät, das noch nie Daten empfangen hat, bleibt im Leerlauf
//! und löst keinen Blackout aus.

/// Ergebnis einer Auswertung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Liveness {
    /// Noch nie ein Paket akzeptiert (oder Blackout bereits ausgeführt)
    Idle,
    /// Letztes Paket liegt innerhalb des Timeouts
    Live,
    /// Timeout überschritten, Strip muss abgeschaltet werden
    TimedOut { silent_ms: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LivenessMonitor {
    timeout_ms: u64,
    last_accepted: Option<u64>,
}

impl LivenessMonitor {
    pub const fn new(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            last_accepted: None,
        }
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Zeitstempel des letzten akzeptierten Pakets (`None` = noch nie)
    pub fn last_accepted(&self) -> Option<u64> {
        self.last_accepted
    }

    pub fn record_acceptance(&mut self, now_ms: u64) {
        self.last_accepted = Some(now_ms);
    }

    /// Wertet den Timeout aus
    ///
    /// `TimedOut` wird genau einmal gemeldet: der Zeitstempel wird dabei auf
    /// "nie" zurückgesetzt, bis das nächste Paket akzeptiert wird.
    pub fn evaluate(&mut self, now_ms: u64) -> Liveness {
        let Some(last) = self.last_accepted else {
            return Liveness::Idle;
        };

        let silent_ms = now_ms.saturating_sub(last);
        if silent_ms > self.timeout_ms {
            self.last_accepted = None;
            Liveness::TimedOut { silent_ms }
        } else {
            Liveness::Live
        }
    }
}
