//! Device state machine: boot, WiFi setup, time sync and the two clock modes.

use heapless::String;
use log::{debug, info, warn};

use crate::{
    config::ClockConfig,
    input::{ButtonId, InputProvider},
    network::{AddressText, NetworkCandidate, NetworkList, NetworkProvider, PASSWORD_BYTES},
    render::{MatrixFrame, NetworkView, Renderer, Screen, SettingRowView, SettingValue},
    settings::{
        ClockSettings, KeyValueStore, SettingsStore, next_brightness, next_timezone_offset,
        timezone_label, timezone_name,
    },
    time::{ClockSource, TimeConfig, TimeService, ZoneRule, format_date, format_time},
    wordclock::{Phrase, WordClockEncoder, WordMask, intro_mask_at, scheduled_brightness},
};

pub const APP_TITLE: &str = "WordClock";

/// Letters offered by the password picker, in cycle order.
pub const PASSWORD_ALPHABET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()_+-=[]{}|;:,.<>? ";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeviceState {
    Init,
    LogoDisplay,
    StartupMessage,
    WifiScan,
    WifiList,
    PasswordEntry,
    WifiConnecting,
    WifiSuccess,
    WifiFailure,
    Settings,
    TimeSync,
    ClockDisplay,
    WordClockDisplay,
}

/// One-time work performed on the first tick after entering a state.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum EntryAction {
    LoadSettings,
    Render,
    Scan,
    ResetPassword,
    Connect,
    ReadAddress,
    OpenSettings,
    Sync,
    BlankMatrix,
    StartMatrix,
}

const fn entry_action(state: DeviceState) -> EntryAction {
    match state {
        DeviceState::Init => EntryAction::LoadSettings,
        DeviceState::LogoDisplay
        | DeviceState::StartupMessage
        | DeviceState::WifiList
        | DeviceState::WifiFailure => EntryAction::Render,
        DeviceState::WifiScan => EntryAction::Scan,
        DeviceState::PasswordEntry => EntryAction::ResetPassword,
        DeviceState::WifiConnecting => EntryAction::Connect,
        DeviceState::WifiSuccess => EntryAction::ReadAddress,
        DeviceState::Settings => EntryAction::OpenSettings,
        DeviceState::TimeSync => EntryAction::Sync,
        DeviceState::ClockDisplay => EntryAction::BlankMatrix,
        DeviceState::WordClockDisplay => EntryAction::StartMatrix,
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum SettingsRow {
    Timezone,
    Dst,
    Brightness,
    Save,
}

impl SettingsRow {
    const COUNT: u8 = 4;

    fn from_index(index: u8) -> Self {
        match index {
            0 => Self::Timezone,
            1 => Self::Dst,
            2 => Self::Brightness,
            _ => Self::Save,
        }
    }
}

/// Current/previous state plus the scratch data owned by setup screens.
#[derive(Clone, Debug)]
pub struct StateMachineContext {
    current: DeviceState,
    previous: DeviceState,
    changed: bool,
    display_dirty: bool,
    entered_at_ms: u64,
    password: String<PASSWORD_BYTES>,
    char_index: usize,
    selected: Option<NetworkCandidate>,
}

impl StateMachineContext {
    fn new() -> Self {
        Self {
            current: DeviceState::Init,
            previous: DeviceState::Init,
            changed: true,
            display_dirty: false,
            entered_at_ms: 0,
            password: String::new(),
            char_index: 0,
            selected: None,
        }
    }

    pub fn current(&self) -> DeviceState {
        self.current
    }

    pub fn previous(&self) -> DeviceState {
        self.previous
    }

    /// Entry action still pending for the current state.
    pub fn changed(&self) -> bool {
        self.changed
    }

    pub fn display_dirty(&self) -> bool {
        self.display_dirty
    }

    pub fn entered_at_ms(&self) -> u64 {
        self.entered_at_ms
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn char_index(&self) -> usize {
        self.char_index
    }

    pub fn selected(&self) -> Option<&NetworkCandidate> {
        self.selected.as_ref()
    }
}

pub struct ClockApp<IN, NET, SRC, KV, R>
where
    IN: InputProvider,
    NET: NetworkProvider,
    SRC: ClockSource,
    KV: KeyValueStore,
    R: Renderer,
{
    input: IN,
    network: NET,
    time: TimeService<SRC>,
    settings: SettingsStore<KV>,
    renderer: R,
    encoder: WordClockEncoder,
    config: ClockConfig,
    version: &'static str,
    ctx: StateMachineContext,
    networks: NetworkList,
    local_address: AddressText,
    settings_cursor: u8,
    draft: ClockSettings,
    last_sync_attempt_ms: Option<u64>,
    last_shown_second: Option<u64>,
    next_matrix_frame_ms: u64,
    intro_started_ms: Option<u64>,
    intro_played: bool,
}

include!("runtime.rs");
include!("entry.rs");
include!("input.rs");
include!("view.rs");

fn rotate_cw(cursor: u8, total: u8) -> u8 {
    if total == 0 { 0 } else { (cursor + 1) % total }
}

fn alphabet_char(index: usize) -> char {
    PASSWORD_ALPHABET
        .as_bytes()
        .get(index)
        .map_or(' ', |byte| *byte as char)
}

#[cfg(test)]
mod tests;
