use std::{collections::VecDeque, string::String};

use embassy_futures::block_on;

use super::*;
use crate::{
    network::{ConnectError, SecurityClass},
    settings::{DstRule, KEY_BRIGHTNESS, KEY_DST_RULE, KEY_FIRST_RUN, KEY_TIMEZONE, MemoryStore},
    time::{SyncStatus, TIME_SENTINEL},
    wordclock::{Word, encode},
};

// 2024-07-04T18:30:15Z
const JULY_4_2024: u64 = 1_720_117_815;
const TICK_MS: u64 = 10;

#[derive(Default)]
struct QueuedInput {
    queue: VecDeque<ButtonId>,
}

impl InputProvider for QueuedInput {
    type Error = ();

    fn poll_event(&mut self, _now_ms: u64) -> Result<Option<ButtonId>, Self::Error> {
        Ok(self.queue.pop_front())
    }
}

#[derive(Default)]
struct FakeNetwork {
    available: Vec<NetworkCandidate>,
    fail_scan: bool,
    scan_calls: u32,
    connect_results: VecDeque<Result<(), ConnectError>>,
    connect_calls: Vec<(String, String)>,
    connect_security: Vec<SecurityClass>,
}

impl NetworkProvider for FakeNetwork {
    type Error = ();

    async fn scan(&mut self, results: &mut NetworkList) -> Result<(), Self::Error> {
        self.scan_calls += 1;
        results.clear();
        if self.fail_scan {
            return Err(());
        }
        for candidate in &self.available {
            results.insert(candidate.clone());
        }
        Ok(())
    }

    async fn connect(
        &mut self,
        ssid: &str,
        password: &str,
        security: SecurityClass,
        _timeout_ms: u32,
    ) -> Result<(), ConnectError> {
        self.connect_calls
            .push((ssid.to_string(), password.to_string()));
        self.connect_security.push(security);
        self.connect_results.pop_front().unwrap_or(Ok(()))
    }

    fn local_address(&self) -> AddressText {
        let mut address = AddressText::new();
        let _ = address.push_str("192.168.1.50");
        address
    }
}

struct FakeClock {
    reply: Option<u64>,
    requests: u32,
}

impl ClockSource for FakeClock {
    async fn request_time(&mut self, _timeout_ms: u32) -> Option<u64> {
        self.requests += 1;
        self.reply
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Shown {
    Logo,
    Startup,
    Scanning,
    Network {
        ssid: String,
        index: usize,
        total: usize,
    },
    NoNetworks,
    Password {
        entered: String,
        candidate: char,
    },
    Connecting(String),
    Success {
        ssid: String,
        address: String,
    },
    Failure(String),
    Settings {
        cursor: usize,
        values: Vec<String>,
        first_run: bool,
    },
    Syncing,
    Clock {
        time: String,
        status: SyncStatus,
    },
    WordStatus {
        phrase: String,
    },
}

#[derive(Default)]
struct RecordingRenderer {
    screens: Vec<Shown>,
    frames: Vec<MatrixFrame>,
}

impl RecordingRenderer {
    fn last(&self) -> Option<&Shown> {
        self.screens.last()
    }

    fn count(&self, wanted: impl Fn(&Shown) -> bool) -> usize {
        self.screens.iter().filter(|shown| wanted(shown)).count()
    }
}

impl Renderer for RecordingRenderer {
    fn show(&mut self, screen: Screen<'_>) {
        let shown = match screen {
            Screen::Logo { .. } => Shown::Logo,
            Screen::StartupMessage { .. } => Shown::Startup,
            Screen::Scanning => Shown::Scanning,
            Screen::NetworkList {
                network,
                index,
                total,
            } => Shown::Network {
                ssid: network.ssid.to_string(),
                index,
                total,
            },
            Screen::NoNetworks => Shown::NoNetworks,
            Screen::PasswordEntry {
                entered, candidate, ..
            } => Shown::Password {
                entered: entered.to_string(),
                candidate,
            },
            Screen::Connecting { ssid } => Shown::Connecting(ssid.to_string()),
            Screen::ConnectSuccess { ssid, address } => Shown::Success {
                ssid: ssid.to_string(),
                address: address.to_string(),
            },
            Screen::ConnectFailure { ssid } => Shown::Failure(ssid.to_string()),
            Screen::Settings {
                rows,
                cursor,
                first_run,
            } => Shown::Settings {
                cursor,
                values: rows
                    .iter()
                    .map(|row| match row.value {
                        SettingValue::Label(label) => label.to_string(),
                        SettingValue::Percent(percent) => format!("{percent}%"),
                        SettingValue::Action(action) => action.to_string(),
                    })
                    .collect(),
                first_run,
            },
            Screen::TimeSyncing => Shown::Syncing,
            Screen::ClockFace { time, status, .. } => Shown::Clock {
                time: time.to_string(),
                status,
            },
            Screen::WordClockStatus { phrase, .. } => Shown::WordStatus {
                phrase: phrase.to_string(),
            },
        };
        self.screens.push(shown);
    }

    fn illuminate(&mut self, frame: MatrixFrame) {
        self.frames.push(frame);
    }
}

type TestApp = ClockApp<QueuedInput, FakeNetwork, FakeClock, MemoryStore, RecordingRenderer>;

struct Harness {
    app: TestApp,
    now_ms: u64,
}

impl Harness {
    fn new(network: FakeNetwork, reply: Option<u64>, store: MemoryStore) -> Self {
        let app = ClockApp::new(
            QueuedInput::default(),
            network,
            FakeClock { reply, requests: 0 },
            store,
            RecordingRenderer::default(),
            ClockConfig::default(),
            "0.1.0",
        );
        Self { app, now_ms: 0 }
    }

    fn advance(&mut self, ms: u64) {
        self.advance_by(ms, TICK_MS);
    }

    fn advance_by(&mut self, ms: u64, step_ms: u64) {
        let end = self.now_ms + ms;
        while self.now_ms < end {
            self.now_ms += step_ms;
            block_on(self.app.tick(self.now_ms));
        }
    }

    fn press(&mut self, button: ButtonId) {
        self.app.input_mut().queue.push_back(button);
        self.advance(50);
    }

    fn boot_to_list(&mut self) {
        self.advance(7_200);
        assert_eq!(self.app.state(), DeviceState::WifiList);
    }

    fn screens(&self) -> &[Shown] {
        &self.app.renderer().screens
    }

    fn last_screen(&self) -> Option<&Shown> {
        self.app.renderer().last()
    }

    fn frames(&self) -> &[MatrixFrame] {
        &self.app.renderer().frames
    }
}

fn home_networks() -> FakeNetwork {
    FakeNetwork {
        available: vec![
            NetworkCandidate::new("Home", -60, SecurityClass::Wpa2),
            NetworkCandidate::new("Cafe", -40, SecurityClass::Open),
        ],
        ..FakeNetwork::default()
    }
}

fn returning_user_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    let _ = store.put_int(KEY_TIMEZONE, -6);
    let _ = store.put_int(KEY_DST_RULE, DstRule::Us.as_raw());
    let _ = store.put_int(KEY_BRIGHTNESS, 75);
    let _ = store.put_bool(KEY_FIRST_RUN, false);
    store
}

/// Boots a returning user on the open network and lands on the clock face.
fn clock_display_harness(reply: Option<u64>) -> Harness {
    let mut harness = Harness::new(home_networks(), reply, returning_user_store());
    harness.boot_to_list();
    harness.press(ButtonId::B);
    assert_eq!(harness.app.state(), DeviceState::WifiSuccess);
    harness.press(ButtonId::A);
    assert_eq!(harness.app.state(), DeviceState::ClockDisplay);
    harness
}

#[test]
fn boot_sequence_runs_logo_startup_then_scan() {
    let mut harness = Harness::new(home_networks(), None, MemoryStore::new());

    harness.advance(TICK_MS);
    assert_eq!(harness.app.state(), DeviceState::LogoDisplay);

    harness.advance(3_900);
    assert_eq!(harness.app.state(), DeviceState::LogoDisplay);
    harness.advance(200);
    assert_eq!(harness.app.state(), DeviceState::StartupMessage);

    harness.advance(3_100);
    assert_eq!(harness.app.state(), DeviceState::WifiList);

    assert_eq!(
        &harness.screens()[..3],
        &[Shown::Logo, Shown::Startup, Shown::Scanning]
    );
    assert_eq!(
        harness.last_screen(),
        Some(&Shown::Network {
            ssid: "Cafe".to_string(),
            index: 0,
            total: 2,
        })
    );
    assert_eq!(harness.app.network_mut().scan_calls, 1);
}

#[test]
fn first_run_secured_network_flow_reaches_clock() {
    let mut harness = Harness::new(home_networks(), Some(JULY_4_2024), MemoryStore::new());
    harness.boot_to_list();

    harness.press(ButtonId::A);
    assert_eq!(
        harness.last_screen(),
        Some(&Shown::Network {
            ssid: "Home".to_string(),
            index: 1,
            total: 2,
        })
    );

    harness.press(ButtonId::B);
    assert_eq!(harness.app.state(), DeviceState::PasswordEntry);
    assert_eq!(
        harness.last_screen(),
        Some(&Shown::Password {
            entered: String::new(),
            candidate: 'a',
        })
    );

    harness.press(ButtonId::A);
    harness.press(ButtonId::A);
    harness.press(ButtonId::B);
    harness.press(ButtonId::B);
    assert_eq!(harness.app.context().password(), "ca");
    assert_eq!(harness.app.context().char_index(), 0);

    harness.press(ButtonId::C);
    assert_eq!(harness.app.state(), DeviceState::WifiSuccess);
    assert_eq!(
        harness.app.network_mut().connect_calls,
        vec![("Home".to_string(), "ca".to_string())]
    );
    assert_eq!(
        harness.app.network_mut().connect_security,
        vec![SecurityClass::Wpa2]
    );
    assert_eq!(
        harness.last_screen(),
        Some(&Shown::Success {
            ssid: "Home".to_string(),
            address: "192.168.1.50".to_string(),
        })
    );

    harness.press(ButtonId::C);
    assert_eq!(harness.app.state(), DeviceState::Settings);

    harness.press(ButtonId::B);
    harness.press(ButtonId::A);
    harness.press(ButtonId::A);
    harness.press(ButtonId::A);
    assert_eq!(
        harness.last_screen(),
        Some(&Shown::Settings {
            cursor: 3,
            values: vec![
                "Eastern Standard Time".to_string(),
                "US Rules".to_string(),
                "75%".to_string(),
                "Save & sync".to_string(),
            ],
            first_run: true,
        })
    );

    harness.press(ButtonId::B);
    assert_eq!(harness.app.state(), DeviceState::ClockDisplay);
    assert_eq!(harness.app.time().status(), SyncStatus::Success);

    let saved = harness.app.settings().settings();
    assert_eq!(saved.timezone_offset_hours, -5);
    assert!(!saved.first_run);
    let stored = harness.app.settings().kv().clone().get_int(KEY_TIMEZONE);
    assert_eq!(stored, Ok(Some(-5)));

    assert!(harness.screens().contains(&Shown::Syncing));
    assert!(matches!(
        harness.last_screen(),
        Some(Shown::Clock {
            status: SyncStatus::Success,
            ..
        })
    ));
}

#[test]
fn open_network_skips_password_entry() {
    let mut harness = Harness::new(home_networks(), None, returning_user_store());
    harness.boot_to_list();

    harness.press(ButtonId::B);

    assert_eq!(harness.app.context().previous(), DeviceState::WifiConnecting);
    assert_eq!(
        harness.app.network_mut().connect_calls,
        vec![("Cafe".to_string(), String::new())]
    );
    assert_eq!(
        harness.app.network_mut().connect_security,
        vec![SecurityClass::Open]
    );
    assert!(harness.screens().contains(&Shown::Connecting("Cafe".to_string())));
    assert!(
        !harness
            .screens()
            .iter()
            .any(|shown| matches!(shown, Shown::Password { .. }))
    );
}

#[test]
fn connect_failure_offers_retry_new_password_and_back() {
    let mut network = home_networks();
    network.connect_results =
        VecDeque::from([Err(ConnectError::Timeout), Err(ConnectError::Rejected)]);
    let mut harness = Harness::new(network, None, returning_user_store());
    harness.boot_to_list();

    harness.press(ButtonId::A);
    harness.press(ButtonId::B);
    harness.press(ButtonId::B);
    harness.press(ButtonId::C);
    assert_eq!(harness.app.state(), DeviceState::WifiFailure);
    assert_eq!(harness.last_screen(), Some(&Shown::Failure("Home".to_string())));

    harness.press(ButtonId::A);
    assert_eq!(harness.app.state(), DeviceState::WifiFailure);
    assert_eq!(harness.app.network_mut().connect_calls.len(), 2);
    assert_eq!(harness.app.network_mut().connect_calls[1].1, "a");

    harness.press(ButtonId::B);
    assert_eq!(harness.app.state(), DeviceState::PasswordEntry);
    assert_eq!(harness.app.context().password(), "");

    harness.press(ButtonId::C);
    assert_eq!(harness.app.state(), DeviceState::WifiSuccess);
    assert_eq!(harness.app.network_mut().connect_calls.len(), 3);
}

#[test]
fn failure_back_returns_to_list_without_rescanning() {
    let mut network = home_networks();
    network.connect_results = VecDeque::from([Err(ConnectError::Rejected)]);
    let mut harness = Harness::new(network, None, returning_user_store());
    harness.boot_to_list();

    harness.press(ButtonId::B);
    assert_eq!(harness.app.state(), DeviceState::WifiFailure);

    harness.press(ButtonId::C);
    assert_eq!(harness.app.state(), DeviceState::WifiList);
    assert_eq!(harness.app.network_mut().scan_calls, 1);
    assert_eq!(harness.app.networks().len(), 2);
}

#[test]
fn change_state_twice_is_a_single_transition() {
    let mut harness = Harness::new(FakeNetwork::default(), None, MemoryStore::new());
    harness.advance(TICK_MS);
    assert_eq!(harness.app.state(), DeviceState::LogoDisplay);

    assert!(harness.app.change_state(DeviceState::WifiList));
    assert!(!harness.app.change_state(DeviceState::WifiList));
    assert_eq!(harness.app.context().previous(), DeviceState::LogoDisplay);
    assert!(harness.app.context().changed());

    harness.advance(500);
    assert_eq!(
        harness.app.renderer().count(|shown| *shown == Shown::NoNetworks),
        1
    );
    assert!(!harness.app.context().changed());
    assert!(!harness.app.context().display_dirty());
}

#[test]
fn empty_scan_shows_no_networks_until_rescan() {
    let mut harness = Harness::new(FakeNetwork::default(), None, MemoryStore::new());
    harness.boot_to_list();
    assert_eq!(harness.last_screen(), Some(&Shown::NoNetworks));

    harness.press(ButtonId::A);
    harness.press(ButtonId::B);
    assert_eq!(harness.app.state(), DeviceState::WifiList);

    harness.app.network_mut().available = vec![NetworkCandidate::new(
        "Late",
        -70,
        SecurityClass::Wpa3,
    )];
    harness.press(ButtonId::C);

    assert_eq!(harness.app.state(), DeviceState::WifiList);
    assert_eq!(harness.app.network_mut().scan_calls, 2);
    assert_eq!(
        harness.last_screen(),
        Some(&Shown::Network {
            ssid: "Late".to_string(),
            index: 0,
            total: 1,
        })
    );
}

#[test]
fn scan_error_is_treated_as_empty() {
    let network = FakeNetwork {
        fail_scan: true,
        ..home_networks()
    };
    let mut harness = Harness::new(network, None, MemoryStore::new());
    harness.boot_to_list();

    assert!(harness.app.networks().is_empty());
    assert_eq!(harness.last_screen(), Some(&Shown::NoNetworks));
}

#[test]
fn password_cursor_wraps_over_alphabet() {
    let mut harness = Harness::new(home_networks(), None, MemoryStore::new());
    harness.boot_to_list();
    harness.press(ButtonId::A);
    harness.press(ButtonId::B);

    for _ in 0..PASSWORD_ALPHABET.len() - 1 {
        harness.press(ButtonId::A);
    }
    assert_eq!(
        harness.last_screen(),
        Some(&Shown::Password {
            entered: String::new(),
            candidate: ' ',
        })
    );

    harness.press(ButtonId::A);
    assert_eq!(harness.app.context().char_index(), 0);
}

#[test]
fn wifi_success_continues_on_its_own() {
    let mut harness = Harness::new(home_networks(), None, returning_user_store());
    harness.boot_to_list();
    harness.press(ButtonId::B);
    assert_eq!(harness.app.state(), DeviceState::WifiSuccess);

    harness.advance(5_100);
    assert_eq!(harness.app.state(), DeviceState::ClockDisplay);
}

#[test]
fn failed_sync_still_shows_clock_with_sentinel() {
    let harness = clock_display_harness(None);

    assert_eq!(harness.app.time().status(), SyncStatus::Failed);
    assert_eq!(
        harness.last_screen(),
        Some(&Shown::Clock {
            time: TIME_SENTINEL.to_string(),
            status: SyncStatus::Failed,
        })
    );
}

#[test]
fn failed_sync_is_retried_after_cooldown() {
    let mut harness = clock_display_harness(None);
    let requests = |harness: &mut Harness| harness.app.time.source_mut().requests;
    assert_eq!(requests(&mut harness), 1);

    harness.advance_by(30_000, 100);
    assert_eq!(requests(&mut harness), 1);

    harness.advance_by(31_000, 100);
    assert_eq!(requests(&mut harness), 2);
}

#[test]
fn clock_face_redraws_once_per_second() {
    let mut harness = clock_display_harness(Some(JULY_4_2024));
    let clock_renders =
        |harness: &Harness| harness.app.renderer().count(|shown| matches!(shown, Shown::Clock { .. }));

    let before = clock_renders(&harness);
    harness.advance(3_000);
    let after = clock_renders(&harness);

    assert!((3..=4).contains(&(after - before)), "renders {}", after - before);
    assert!(!harness.app.time().needs_resync(harness.now_ms));
}

#[test]
fn manual_sync_button_requests_time() {
    let mut harness = clock_display_harness(Some(JULY_4_2024));
    assert_eq!(harness.app.time.source_mut().requests, 1);

    harness.press(ButtonId::B);
    assert_eq!(harness.app.state(), DeviceState::ClockDisplay);
    assert_eq!(harness.app.time.source_mut().requests, 2);
}

#[test]
fn word_clock_mode_sync_and_settings_buttons() {
    let mut harness = clock_display_harness(Some(JULY_4_2024));
    harness.press(ButtonId::C);
    harness.advance(3_000);
    assert_eq!(harness.app.state(), DeviceState::WordClockDisplay);
    assert_eq!(harness.app.time.source_mut().requests, 1);

    harness.press(ButtonId::B);
    assert_eq!(harness.app.state(), DeviceState::WordClockDisplay);
    assert_eq!(harness.app.time.source_mut().requests, 2);
    assert_eq!(harness.app.time().status(), SyncStatus::Success);

    harness.press(ButtonId::A);
    assert_eq!(harness.app.state(), DeviceState::Settings);
}

#[test]
fn word_clock_mode_plays_intro_then_live_words() {
    let mut harness = clock_display_harness(Some(JULY_4_2024));
    assert_eq!(harness.frames().last(), Some(&MatrixFrame::BLANK));

    harness.press(ButtonId::C);
    assert_eq!(harness.app.state(), DeviceState::WordClockDisplay);
    let intro_frame = harness.frames().last().copied();
    assert_eq!(intro_frame.map(|frame| frame.mask), Some(Word::Signature.mask()));

    harness.advance(6_000);
    let local = harness.app.time().now(harness.now_ms);
    let Some(local) = local else {
        panic!("clock should be synced");
    };
    let Some(frame) = harness.frames().last().copied() else {
        panic!("matrix should have frames");
    };
    assert_eq!(frame.mask, encode(local.hour, local.minute));
    assert_eq!(frame.brightness, scheduled_brightness(75, Some(local.hour)));
    assert!(matches!(harness.last_screen(), Some(Shown::WordStatus { .. })));

    let phases: Vec<u16> = harness.frames()[harness.frames().len() - 3..]
        .iter()
        .map(|frame| frame.phase)
        .collect();
    assert_eq!(phases[1], phases[0] + 1);
    assert_eq!(phases[2], phases[1] + 1);

    harness.press(ButtonId::C);
    assert_eq!(harness.app.state(), DeviceState::ClockDisplay);
    assert_eq!(harness.frames().last(), Some(&MatrixFrame::BLANK));
}

#[test]
fn intro_plays_only_once() {
    let mut harness = clock_display_harness(Some(JULY_4_2024));
    harness.press(ButtonId::C);
    harness.advance(6_000);
    harness.press(ButtonId::C);
    harness.press(ButtonId::C);

    let signature_frames = harness
        .frames()
        .iter()
        .filter(|frame| frame.mask == Word::Signature.mask())
        .count();
    // 500 ms of signature at one frame per 100 ms.
    assert!(signature_frames <= 5, "signature frames {signature_frames}");
    assert_ne!(harness.frames().last().map(|frame| frame.mask), Some(Word::Signature.mask()));
}

#[test]
fn settings_cancel_discards_edits_for_returning_user() {
    let mut harness = clock_display_harness(Some(JULY_4_2024));

    harness.press(ButtonId::A);
    assert_eq!(harness.app.state(), DeviceState::Settings);
    harness.press(ButtonId::B);
    harness.press(ButtonId::A);
    harness.press(ButtonId::B);
    harness.press(ButtonId::C);

    assert_eq!(harness.app.state(), DeviceState::ClockDisplay);
    let settings = harness.app.settings().settings();
    assert_eq!(settings.timezone_offset_hours, -6);
    assert_eq!(settings.dst_rule, DstRule::Us);
}

#[test]
fn first_run_cancel_saves_and_syncs() {
    let mut harness = Harness::new(home_networks(), Some(JULY_4_2024), MemoryStore::new());
    harness.boot_to_list();
    harness.press(ButtonId::B);
    harness.press(ButtonId::B);
    assert_eq!(harness.app.state(), DeviceState::Settings);

    harness.press(ButtonId::A);
    harness.press(ButtonId::A);
    harness.press(ButtonId::B);
    harness.press(ButtonId::C);

    assert_eq!(harness.app.state(), DeviceState::ClockDisplay);
    let settings = harness.app.settings().settings();
    assert_eq!(settings.brightness_percent, 85);
    assert!(!settings.first_run);
    assert_eq!(
        harness.app.settings().kv().clone().get_bool(KEY_FIRST_RUN),
        Ok(Some(false))
    );
}

#[test]
fn saved_zone_changes_displayed_hour() {
    let mut harness = clock_display_harness(Some(JULY_4_2024));
    let before = harness.app.time().now(harness.now_ms).map(|t| t.hour);

    harness.press(ButtonId::A);
    harness.press(ButtonId::B);
    harness.press(ButtonId::A);
    harness.press(ButtonId::A);
    harness.press(ButtonId::A);
    harness.press(ButtonId::B);

    assert_eq!(harness.app.state(), DeviceState::ClockDisplay);
    let after = harness.app.time().now(harness.now_ms).map(|t| t.hour);
    assert_eq!(before, Some(13));
    assert_eq!(after, Some(14));
}

#[test]
fn buttons_are_ignored_during_timed_screens() {
    let mut harness = Harness::new(home_networks(), None, MemoryStore::new());
    harness.advance(100);
    harness.press(ButtonId::A);
    harness.press(ButtonId::C);
    assert_eq!(harness.app.state(), DeviceState::LogoDisplay);
}
