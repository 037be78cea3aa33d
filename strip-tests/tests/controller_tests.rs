//! Integration Tests für den StripController
//!
//! Der Controller läuft hier komplett auf dem Host, WiFi/UDP, LED-Strip und
//! Delay sind durch Mocks ersetzt. Async-Methoden werden mit
//! `embassy_futures::block_on` ausgeführt (alle Mocks sind sofort fertig).

use std::cell::Cell;
use std::collections::VecDeque;
use std::net::{Ipv4Addr, SocketAddr};

use embassy_futures::block_on;
use embedded_hal_async::delay::DelayNs;
use rgb::RGB8;
use strip_core::{
    Datagram, LedError, LinkError, LinkState, NetworkLink, ReconnectPolicy, Rejection,
    StripController, StripIdentity, StripOutput, StripState, packet_len,
};

// ============================================================================
// Mock Implementations (für Tests)
// ============================================================================

/// Mock Network Link für Tests
///
/// Nach `begin_connect()` meldet der Link sich beim `join_after`-ten
/// Status-Abfrage als verbunden. `None` = Access Point nie erreichbar.
struct MockLink {
    connected: Cell<bool>,
    joining: Cell<bool>,
    polls: Cell<u32>,
    join_after: Option<u32>,
    fail_begin: bool,
    fail_open: bool,
    begin_count: usize,
    open_count: usize,
    receive_count: usize,
    inbox: VecDeque<Vec<u8>>,
    sender: SocketAddr,
}

impl MockLink {
    fn new(join_after: Option<u32>) -> Self {
        Self {
            connected: Cell::new(false),
            joining: Cell::new(false),
            polls: Cell::new(0),
            join_after,
            fail_begin: false,
            fail_open: false,
            begin_count: 0,
            open_count: 0,
            receive_count: 0,
            inbox: VecDeque::new(),
            sender: SocketAddr::from((Ipv4Addr::new(192, 168, 1, 20), 50000)),
        }
    }

    /// Access Point sofort erreichbar
    fn online() -> Self {
        Self::new(Some(1))
    }

    /// Access Point nie erreichbar
    fn offline() -> Self {
        Self::new(None)
    }

    fn push(&mut self, bytes: &[u8]) {
        self.inbox.push_back(bytes.to_vec());
    }

    /// Simuliert einen Verbindungsabbruch durch den Access Point
    fn drop_link(&mut self, join_after: Option<u32>) {
        self.connected.set(false);
        self.joining.set(false);
        self.join_after = join_after;
    }
}

impl NetworkLink for MockLink {
    async fn begin_connect(&mut self) -> Result<(), LinkError> {
        self.begin_count += 1;
        self.polls.set(0);
        if self.fail_begin {
            return Err(LinkError::ConnectFailed);
        }
        self.joining.set(true);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        if !self.connected.get() && self.joining.get() {
            let polls = self.polls.get() + 1;
            self.polls.set(polls);
            if self.join_after.is_some_and(|after| polls >= after) {
                self.connected.set(true);
                self.joining.set(false);
            }
        }
        self.connected.get()
    }

    fn open_receiver(&mut self) -> Result<(), LinkError> {
        self.open_count += 1;
        if self.fail_open {
            return Err(LinkError::BindFailed);
        }
        Ok(())
    }

    fn try_receive(&mut self, buf: &mut [u8]) -> Option<Datagram> {
        assert!(self.connected.get(), "try_receive without connection");
        self.receive_count += 1;

        let bytes = self.inbox.pop_front()?;
        let len = bytes.len().min(buf.len());
        buf[..len].copy_from_slice(&bytes[..len]);
        Some(Datagram {
            len,
            source: Some(self.sender),
        })
    }
}

/// Mock LED Strip für Tests
#[derive(Default)]
struct MockStrip {
    brightness: Option<u8>,
    frames: Vec<Vec<RGB8>>,
    fail_next: bool,
}

impl MockStrip {
    fn last_frame(&self) -> Option<&[RGB8]> {
        self.frames.last().map(Vec::as_slice)
    }
}

impl StripOutput for MockStrip {
    fn set_brightness(&mut self, brightness: u8) {
        self.brightness = Some(brightness);
    }

    fn show(&mut self, pixels: &[RGB8]) -> Result<(), LedError> {
        if std::mem::take(&mut self.fail_next) {
            return Err(LedError::WriteFailed);
        }
        self.frames.push(pixels.to_vec());
        Ok(())
    }
}

/// Mock Delay, zeichnet jede Pause in Millisekunden auf
#[derive(Default)]
struct MockDelay {
    pauses: Vec<u32>,
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.pauses.push(ns / 1_000_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.pauses.push(ms);
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

const PIXELS: usize = 3;
const ME: StripIdentity = StripIdentity::new(0);
const TIMEOUT_MS: u64 = 5000;

const POLICY: ReconnectPolicy = ReconnectPolicy {
    attempts: 4,
    delay_ms: 10,
    backoff_ms: 100,
};

const RED_GREEN_BLUE: [u8; packet_len(PIXELS)] = [0, 128, 255, 0, 0, 0, 255, 0, 0, 0, 255];

type Controller<'a> = StripController<'a, MockLink, MockStrip, MockDelay, PIXELS>;

fn controller<'a>(link: MockLink, rx: &'a mut [u8]) -> Controller<'a> {
    StripController::new(
        link,
        MockStrip::default(),
        MockDelay::default(),
        StripState::new(ME, 255, TIMEOUT_MS),
        POLICY,
        rx,
    )
}

fn off() -> Vec<RGB8> {
    vec![RGB8::default(); PIXELS]
}

fn rgb() -> Vec<RGB8> {
    vec![
        RGB8::new(255, 0, 0),
        RGB8::new(0, 255, 0),
        RGB8::new(0, 0, 255),
    ]
}

// ============================================================================
// Tests: Startup
// ============================================================================

#[test]
fn test_start_clears_strip_and_connects() {
    let mut rx = [0u8; packet_len(PIXELS)];
    let mut ctrl = controller(MockLink::online(), &mut rx);

    let report = block_on(ctrl.start());

    assert_eq!(report.output, Some(Ok(())));
    assert_eq!(report.reconnect, Some(LinkState::Connected));
    assert_eq!(ctrl.link_state(), LinkState::Connected);
    assert_eq!(ctrl.output().frames, vec![off()]);
    assert_eq!(ctrl.output().brightness, Some(255));
    assert_eq!(ctrl.link().open_count, 1);
}

#[test]
fn test_start_without_access_point_is_bounded() {
    let mut rx = [0u8; packet_len(PIXELS)];
    let mut ctrl = controller(MockLink::offline(), &mut rx);

    let report = block_on(ctrl.start());

    assert_eq!(report.reconnect, Some(LinkState::Disconnected));
    // attempts Status-Abfragen im Abstand delay_ms, plus eine Abschluss-Abfrage
    assert_eq!(ctrl.link().polls.get(), POLICY.attempts + 1);
    // Kein Backoff beim Start, der erste Tick versucht es sofort erneut
    assert_eq!(ctrl.delay().pauses, vec![10; 4]);
    let waited: u32 = ctrl.delay().pauses.iter().sum();
    assert_eq!(u64::from(waited), ctrl.policy().budget_ms());
    assert_eq!(ctrl.link().open_count, 0);
    // Strip wurde trotzdem gelöscht
    assert_eq!(ctrl.output().frames, vec![off()]);
}

#[test]
fn test_start_waits_between_polls() {
    let mut rx = [0u8; packet_len(PIXELS)];
    let mut ctrl = controller(MockLink::new(Some(3)), &mut rx);

    block_on(ctrl.start());

    assert_eq!(ctrl.link_state(), LinkState::Connected);
    assert_eq!(ctrl.link().polls.get(), 3);
    assert_eq!(ctrl.delay().pauses, vec![10, 10]);
}

#[test]
fn test_no_blackout_before_first_packet() {
    let mut rx = [0u8; packet_len(PIXELS)];
    let mut ctrl = controller(MockLink::online(), &mut rx);
    block_on(ctrl.start());

    for now in (0..30_000).step_by(500) {
        let report = block_on(ctrl.tick(now));
        assert_eq!(report.blackout, None);
        assert_eq!(report.output, None);
    }
    assert_eq!(ctrl.output().frames.len(), 1);
}

// ============================================================================
// Tests: Datagram Handling
// ============================================================================

#[test]
fn test_addressed_frame_is_shown() {
    let mut rx = [0u8; packet_len(PIXELS)];
    let mut ctrl = controller(MockLink::online(), &mut rx);
    block_on(ctrl.start());

    ctrl.link_mut().push(&RED_GREEN_BLUE);
    let report = block_on(ctrl.tick(100));

    let packet = report.packet.unwrap();
    assert_eq!(packet.result, Ok(()));
    assert_eq!(packet.datagram.len, RED_GREEN_BLUE.len());
    assert_eq!(packet.datagram.source, Some(ctrl.link().sender));
    assert_eq!(report.output, Some(Ok(())));
    assert_eq!(ctrl.output().last_frame(), Some(rgb().as_slice()));
    assert_eq!(ctrl.output().brightness, Some(128));
    assert_eq!(ctrl.state().liveness().last_accepted(), Some(100));
}

#[test]
fn test_frame_for_other_strip_is_ignored() {
    let mut rx = [0u8; packet_len(PIXELS)];
    let mut ctrl = controller(MockLink::online(), &mut rx);
    block_on(ctrl.start());

    let mut foreign = RED_GREEN_BLUE;
    foreign[0] = 2;
    ctrl.link_mut().push(&foreign);
    let report = block_on(ctrl.tick(100));

    assert_eq!(
        report.packet.unwrap().result,
        Err(Rejection::NotAddressed { target: 2 })
    );
    assert_eq!(report.output, None);
    assert_eq!(ctrl.output().frames, vec![off()]);
    assert_eq!(ctrl.state().liveness().last_accepted(), None);
}

#[test]
fn test_short_and_incomplete_datagrams_are_rejected() {
    let mut rx = [0u8; packet_len(PIXELS)];
    let mut ctrl = controller(MockLink::online(), &mut rx);
    block_on(ctrl.start());

    ctrl.link_mut().push(&[0]);
    ctrl.link_mut().push(&RED_GREEN_BLUE[..8]);

    let first = block_on(ctrl.tick(10));
    assert_eq!(
        first.packet.unwrap().result,
        Err(Rejection::TooShort { len: 1 })
    );

    let second = block_on(ctrl.tick(20));
    assert_eq!(
        second.packet.unwrap().result,
        Err(Rejection::Incomplete {
            expected: 9,
            actual: 6
        })
    );

    assert_eq!(ctrl.output().frames, vec![off()]);
    assert_eq!(ctrl.output().brightness, Some(255));
}

#[test]
fn test_one_datagram_per_tick() {
    let mut rx = [0u8; packet_len(PIXELS)];
    let mut ctrl = controller(MockLink::online(), &mut rx);
    block_on(ctrl.start());

    ctrl.link_mut().push(&RED_GREEN_BLUE);
    ctrl.link_mut().push(&RED_GREEN_BLUE);

    block_on(ctrl.tick(1));
    assert_eq!(ctrl.link().inbox.len(), 1);
    block_on(ctrl.tick(2));
    assert!(ctrl.link().inbox.is_empty());
}

#[test]
fn test_repeated_frame_is_idempotent() {
    let mut rx = [0u8; packet_len(PIXELS)];
    let mut ctrl = controller(MockLink::online(), &mut rx);
    block_on(ctrl.start());

    ctrl.link_mut().push(&RED_GREEN_BLUE);
    ctrl.link_mut().push(&RED_GREEN_BLUE);
    block_on(ctrl.tick(1));
    let after_first = ctrl.state().frame().clone();
    block_on(ctrl.tick(2));

    assert_eq!(ctrl.state().frame().pixels(), after_first.pixels());
    assert_eq!(ctrl.state().frame().brightness(), after_first.brightness());
    assert_eq!(ctrl.output().last_frame(), Some(rgb().as_slice()));
}

#[test]
fn test_oversized_datagram_is_truncated_by_buffer() {
    let mut rx = [0u8; packet_len(PIXELS)];
    let mut ctrl = controller(MockLink::online(), &mut rx);
    block_on(ctrl.start());

    let mut big = RED_GREEN_BLUE.to_vec();
    big.extend_from_slice(&[0xFF; 30]);
    ctrl.link_mut().push(&big);
    let report = block_on(ctrl.tick(5));

    let packet = report.packet.unwrap();
    assert_eq!(packet.datagram.len, packet_len(PIXELS));
    assert_eq!(packet.result, Ok(()));
    assert_eq!(ctrl.output().last_frame(), Some(rgb().as_slice()));
}

// ============================================================================
// Tests: Liveness / Blackout
// ============================================================================

#[test]
fn test_blackout_fires_once_after_timeout() {
    let mut rx = [0u8; packet_len(PIXELS)];
    let mut ctrl = controller(MockLink::online(), &mut rx);
    block_on(ctrl.start());

    ctrl.link_mut().push(&RED_GREEN_BLUE);
    block_on(ctrl.tick(1000));

    assert_eq!(block_on(ctrl.tick(6000)).blackout, None);

    let report = block_on(ctrl.tick(6001));
    assert_eq!(report.blackout, Some(5001));
    assert_eq!(report.output, Some(Ok(())));
    assert_eq!(ctrl.output().last_frame(), Some(off().as_slice()));
    // Helligkeit bleibt beim Blackout erhalten
    assert_eq!(ctrl.output().brightness, Some(128));

    let pushes = ctrl.output().frames.len();
    for now in [7000, 12_000, 60_000] {
        assert_eq!(block_on(ctrl.tick(now)).blackout, None);
    }
    assert_eq!(ctrl.output().frames.len(), pushes);
}

#[test]
fn test_rejected_datagrams_do_not_keep_strip_alive() {
    let mut rx = [0u8; packet_len(PIXELS)];
    let mut ctrl = controller(MockLink::online(), &mut rx);
    block_on(ctrl.start());

    ctrl.link_mut().push(&RED_GREEN_BLUE);
    block_on(ctrl.tick(0));

    let mut foreign = RED_GREEN_BLUE;
    foreign[0] = 1;
    ctrl.link_mut().push(&foreign);
    block_on(ctrl.tick(4000));

    assert_eq!(block_on(ctrl.tick(5001)).blackout, Some(5001));
}

#[test]
fn test_new_frame_after_blackout_lights_strip_again() {
    let mut rx = [0u8; packet_len(PIXELS)];
    let mut ctrl = controller(MockLink::online(), &mut rx);
    block_on(ctrl.start());

    ctrl.link_mut().push(&RED_GREEN_BLUE);
    block_on(ctrl.tick(0));
    block_on(ctrl.tick(5001));
    assert_eq!(ctrl.output().last_frame(), Some(off().as_slice()));

    ctrl.link_mut().push(&RED_GREEN_BLUE);
    block_on(ctrl.tick(9000));
    assert_eq!(ctrl.output().last_frame(), Some(rgb().as_slice()));
    assert_eq!(block_on(ctrl.tick(14_000)).blackout, None);
    assert_eq!(block_on(ctrl.tick(14_001)).blackout, Some(5001));
}

// ============================================================================
// Tests: Reconnect
// ============================================================================

#[test]
fn test_failed_reconnect_backs_off_and_retries_next_tick() {
    let mut rx = [0u8; packet_len(PIXELS)];
    let mut ctrl = controller(MockLink::offline(), &mut rx);
    block_on(ctrl.start());
    ctrl.link_mut().push(&RED_GREEN_BLUE);

    let report = block_on(ctrl.tick(0));
    assert_eq!(report.reconnect, Some(LinkState::Disconnected));
    assert_eq!(report.packet, None);
    assert_eq!(ctrl.link().receive_count, 0);
    assert_eq!(ctrl.link().begin_count, 2);

    // Zweiter Tick: Access Point wieder da
    ctrl.link_mut().join_after = Some(2);
    let report = block_on(ctrl.tick(2000));
    assert_eq!(report.reconnect, Some(LinkState::Connected));
    assert_eq!(ctrl.link().begin_count, 3);
    assert_eq!(ctrl.link().open_count, 1);
    // Der Tick mit dem Verbindungsaufbau liest noch nichts
    assert_eq!(report.packet, None);

    let report = block_on(ctrl.tick(2001));
    assert_eq!(report.reconnect, None);
    assert_eq!(report.packet.unwrap().result, Ok(()));
}

#[test]
fn test_reconnect_pauses_are_bounded() {
    let mut rx = [0u8; packet_len(PIXELS)];
    let mut ctrl = controller(MockLink::offline(), &mut rx);

    block_on(ctrl.tick(0));

    assert_eq!(ctrl.link().polls.get(), POLICY.attempts + 1);
    assert_eq!(ctrl.link_state(), LinkState::Disconnected);
    // 4 Abfrage-Pausen, danach ein Backoff
    assert_eq!(ctrl.delay().pauses, vec![10, 10, 10, 10, 100]);
}

#[test]
fn test_link_loss_is_detected_and_repaired() {
    let mut rx = [0u8; packet_len(PIXELS)];
    let mut ctrl = controller(MockLink::online(), &mut rx);
    block_on(ctrl.start());

    ctrl.link_mut().drop_link(Some(1));
    ctrl.link_mut().push(&RED_GREEN_BLUE);

    let report = block_on(ctrl.tick(10));
    assert!(report.link_lost);
    assert_eq!(report.reconnect, Some(LinkState::Connected));
    assert_eq!(report.packet, None);
    // Socket nach Reconnect neu gebunden
    assert_eq!(ctrl.link().open_count, 2);

    let report = block_on(ctrl.tick(11));
    assert!(!report.link_lost);
    assert_eq!(report.packet.unwrap().result, Ok(()));
}

#[test]
fn test_link_loss_keeps_frame_while_disconnected() {
    let mut rx = [0u8; packet_len(PIXELS)];
    let mut ctrl = controller(MockLink::online(), &mut rx);
    block_on(ctrl.start());
    ctrl.link_mut().push(&RED_GREEN_BLUE);
    block_on(ctrl.tick(0));

    ctrl.link_mut().drop_link(None);
    let report = block_on(ctrl.tick(100));
    assert!(report.link_lost);
    assert_eq!(report.reconnect, Some(LinkState::Disconnected));
    assert_eq!(report.output, None);
    assert_eq!(ctrl.state().frame().pixels().to_vec(), rgb());
}

#[test]
fn test_blackout_fires_on_first_connected_tick_after_outage() {
    let mut rx = [0u8; packet_len(PIXELS)];
    let mut ctrl = controller(MockLink::online(), &mut rx);
    block_on(ctrl.start());
    ctrl.link_mut().push(&RED_GREEN_BLUE);
    block_on(ctrl.tick(0));

    ctrl.link_mut().drop_link(None);
    let report = block_on(ctrl.tick(100));
    assert_eq!(report.reconnect, Some(LinkState::Disconnected));
    assert_eq!(report.blackout, None);

    // Access Point nach langer Pause wieder da: dieser Tick verbindet nur
    ctrl.link_mut().join_after = Some(1);
    let report = block_on(ctrl.tick(20_000));
    assert_eq!(report.reconnect, Some(LinkState::Connected));
    assert_eq!(report.blackout, None);
    assert_eq!(ctrl.state().frame().pixels().to_vec(), rgb());

    let report = block_on(ctrl.tick(20_001));
    assert_eq!(report.reconnect, None);
    assert_eq!(report.blackout, Some(20_001));
    assert_eq!(report.output, Some(Ok(())));
    assert_eq!(ctrl.output().last_frame(), Some(off().as_slice()));
}

#[test]
fn test_begin_connect_error_counts_as_disconnected() {
    let mut link = MockLink::online();
    link.fail_begin = true;
    let mut rx = [0u8; packet_len(PIXELS)];
    let mut ctrl = controller(link, &mut rx);

    let report = block_on(ctrl.start());

    assert_eq!(report.reconnect, Some(LinkState::Disconnected));
    assert_eq!(ctrl.link().polls.get(), 0);
    assert_eq!(ctrl.link().open_count, 0);
}

#[test]
fn test_bind_failure_counts_as_disconnected() {
    let mut link = MockLink::online();
    link.fail_open = true;
    let mut rx = [0u8; packet_len(PIXELS)];
    let mut ctrl = controller(link, &mut rx);

    let report = block_on(ctrl.start());
    assert_eq!(report.reconnect, Some(LinkState::Disconnected));

    ctrl.link_mut().fail_open = false;
    let report = block_on(ctrl.tick(1));
    assert_eq!(report.reconnect, Some(LinkState::Connected));
}

// ============================================================================
// Tests: Output
// ============================================================================

#[test]
fn test_failed_write_is_retried_next_tick() {
    let mut rx = [0u8; packet_len(PIXELS)];
    let mut ctrl = controller(MockLink::online(), &mut rx);
    block_on(ctrl.start());

    ctrl.output_mut().fail_next = true;
    ctrl.link_mut().push(&RED_GREEN_BLUE);
    let report = block_on(ctrl.tick(1));
    assert_eq!(report.output, Some(Err(LedError::WriteFailed)));

    let report = block_on(ctrl.tick(2));
    assert_eq!(report.output, Some(Ok(())));
    assert_eq!(ctrl.output().last_frame(), Some(rgb().as_slice()));
}
