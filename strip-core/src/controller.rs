//! Strip Controller - verbindet Link, Decoder, Liveness Monitor und Output
//!
//! Ein einziger Besitzer für den gesamten veränderlichen Zustand: kein
//! Locking nötig, solange der Controller nur aus einem Task getrieben wird.

use embedded_hal_async::delay::DelayNs;

use crate::decoder::{Rejection, decode};
use crate::frame::FrameBuffer;
use crate::link::{ReconnectPolicy, connect};
use crate::liveness::{Liveness, LivenessMonitor};
use crate::traits::{Datagram, LedError, NetworkLink, StripOutput};
use crate::types::{LinkState, StripIdentity};

/// Strip-Zustand ohne Netzwerk- und Hardware-Anbindung
#[derive(Debug, Clone)]
pub struct StripState<const N: usize> {
    identity: StripIdentity,
    frame: FrameBuffer<N>,
    liveness: LivenessMonitor,
}

impl<const N: usize> StripState<N> {
    pub const fn new(identity: StripIdentity, brightness: u8, timeout_ms: u64) -> Self {
        Self {
            identity,
            frame: FrameBuffer::new(brightness),
            liveness: LivenessMonitor::new(timeout_ms),
        }
    }

    pub fn identity(&self) -> StripIdentity {
        self.identity
    }

    pub fn frame(&self) -> &FrameBuffer<N> {
        &self.frame
    }

    pub fn liveness(&self) -> &LivenessMonitor {
        &self.liveness
    }

    /// Dekodiert ein Datagramm und übernimmt es bei Erfolg
    ///
    /// Bei jeder Ablehnung bleiben Frame, Helligkeit und Zeitstempel
    /// unverändert.
    pub fn on_packet(&mut self, bytes: &[u8], now_ms: u64) -> Result<(), Rejection> {
        let command = decode(bytes, self.identity, N)?;
        self.frame.apply(&command);
        self.liveness.record_acceptance(now_ms);
        Ok(())
    }

    /// Wertet den Timeout aus und schaltet bei Bedarf die Farben ab
    pub fn evaluate_liveness(&mut self, now_ms: u64) -> Liveness {
        let liveness = self.liveness.evaluate(now_ms);
        if let Liveness::TimedOut { .. } = liveness {
            self.frame.blank();
        }
        liveness
    }
}

/// Ein empfangenes Datagramm und was daraus wurde
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketReport {
    pub datagram: Datagram,
    pub result: Result<(), Rejection>,
}

/// Was während eines Ticks passiert ist (für Diagnose-Ausgaben)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Ergebnis eines Verbindungsaufbaus, falls einer stattfand
    pub reconnect: Option<LinkState>,
    /// Verbindung ist seit dem letzten Tick verloren gegangen
    pub link_lost: bool,
    pub packet: Option<PacketReport>,
    /// Blackout ausgelöst nach `silent_ms` ohne Daten
    pub blackout: Option<u64>,
    /// Ergebnis des Output-Pushs, falls der Frame sich geändert hat
    pub output: Option<Result<(), LedError>>,
}

/// Controller für genau einen Strip mit `N` Pixeln
///
/// # Generische Parameter
/// - `L: NetworkLink` - WiFi/UDP (Hardware oder Mock)
/// - `O: StripOutput` - LED-Strip (Hardware oder Mock)
/// - `D: DelayNs` - Pausen beim Verbindungsaufbau
pub struct StripController<'a, L, O, D, const N: usize> {
    link: L,
    output: O,
    delay: D,
    policy: ReconnectPolicy,
    link_state: LinkState,
    state: StripState<N>,
    rx: &'a mut [u8],
}

impl<'a, L, O, D, const N: usize> StripController<'a, L, O, D, N>
where
    L: NetworkLink,
    O: StripOutput,
    D: DelayNs,
{
    /// Erstellt den Controller
    ///
    /// `rx` ist der Empfangs-Buffer. Er sollte mindestens
    /// [`crate::packet_len`]`(N)` Bytes groß sein, sonst kommen nie
    /// vollständige Frames an.
    pub fn new(
        link: L,
        output: O,
        delay: D,
        state: StripState<N>,
        policy: ReconnectPolicy,
        rx: &'a mut [u8],
    ) -> Self {
        Self {
            link,
            output,
            delay,
            policy,
            link_state: LinkState::Disconnected,
            state,
            rx,
        }
    }

    pub fn link_state(&self) -> LinkState {
        self.link_state
    }

    pub fn state(&self) -> &StripState<N> {
        &self.state
    }

    pub fn policy(&self) -> &ReconnectPolicy {
        &self.policy
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Startsequenz: Strip löschen, dann erste Verbindung aufbauen
    pub async fn start(&mut self) -> TickReport {
        let output = self.flush();
        let link = self.establish().await;
        TickReport {
            reconnect: Some(link),
            output,
            ..TickReport::default()
        }
    }

    /// Ein Durchlauf der Steuerschleife
    ///
    /// Reihenfolge: (a) Verbindung prüfen und ggf. neu aufbauen, (b) höchstens
    /// ein Datagramm verarbeiten, (c) Timeout auswerten, (d) Output pushen.
    /// Ohne Verbindung endet der Tick nach (a), ohne den Frame anzufassen.
    pub async fn tick(&mut self, now_ms: u64) -> TickReport {
        let mut report = TickReport::default();

        if self.link_state.is_connected() && !self.link.is_connected() {
            self.link_state = LinkState::Disconnected;
            report.link_lost = true;
        }

        if !self.link_state.is_connected() {
            let link = self.establish().await;
            if !link.is_connected() {
                self.delay.delay_ms(self.policy.backoff_ms).await;
            }
            report.reconnect = Some(link);
            return report;
        }

        if let Some(datagram) = self.link.try_receive(&mut self.rx[..]) {
            let len = datagram.len.min(self.rx.len());
            let result = self.state.on_packet(&self.rx[..len], now_ms);
            report.packet = Some(PacketReport { datagram, result });
        }

        if let Liveness::TimedOut { silent_ms } = self.state.evaluate_liveness(now_ms) {
            report.blackout = Some(silent_ms);
        }

        report.output = self.flush();
        report
    }

    /// Verbindet und bindet danach den Empfangs-Socket neu
    async fn establish(&mut self) -> LinkState {
        let mut link = connect(&mut self.link, &mut self.delay, &self.policy).await;
        if link.is_connected() && self.link.open_receiver().is_err() {
            link = LinkState::Disconnected;
        }
        self.link_state = link;
        link
    }

    /// Pusht den Frame, falls er sich seit dem letzten Push geändert hat
    ///
    /// Ein fehlgeschlagener Push wird im nächsten Tick wiederholt.
    fn flush(&mut self) -> Option<Result<(), LedError>> {
        if !self.state.frame.take_dirty() {
            return None;
        }

        self.output.set_brightness(self.state.frame.brightness());
        let result = self.output.show(self.state.frame.pixels());
        if result.is_err() {
            self.state.frame.mark_dirty();
        }
        Some(result)
    }
}
