//! App-level view models and the renderer seam.

use crate::{
    network::{NetworkCandidate, SecurityClass},
    time::SyncStatus,
    wordclock::WordMask,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SettingValue<'a> {
    Label(&'a str),
    Percent(u8),
    Action(&'a str),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SettingRowView<'a> {
    pub key: &'a str,
    pub value: SettingValue<'a>,
}

/// One network entry as shown in the picker.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NetworkView<'a> {
    pub ssid: &'a str,
    pub rssi: i8,
    pub signal_bars: u8,
    pub security: SecurityClass,
}

impl<'a> NetworkView<'a> {
    pub fn from_candidate(candidate: &'a NetworkCandidate) -> Self {
        Self {
            ssid: candidate.ssid.as_str(),
            rssi: candidate.rssi,
            signal_bars: candidate.signal_bars(),
            security: candidate.security,
        }
    }
}

/// Everything the LED matrix needs for one frame.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MatrixFrame {
    pub mask: WordMask,
    pub phase: u16,
    /// Driver scale, 0..=255.
    pub brightness: u8,
}

impl MatrixFrame {
    pub const BLANK: Self = Self {
        mask: WordMask::EMPTY,
        phase: 0,
        brightness: 0,
    };
}

/// Screen content for the status display. Text is unbounded; the renderer truncates.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Screen<'a> {
    Logo {
        title: &'a str,
        version: &'a str,
    },
    StartupMessage {
        title: &'a str,
        line1: &'a str,
        line2: &'a str,
    },
    Scanning,
    NetworkList {
        network: NetworkView<'a>,
        index: usize,
        total: usize,
    },
    NoNetworks,
    PasswordEntry {
        ssid: &'a str,
        entered: &'a str,
        candidate: char,
    },
    Connecting {
        ssid: &'a str,
    },
    ConnectSuccess {
        ssid: &'a str,
        address: &'a str,
    },
    ConnectFailure {
        ssid: &'a str,
    },
    Settings {
        rows: &'a [SettingRowView<'a>],
        cursor: usize,
        first_run: bool,
    },
    TimeSyncing,
    ClockFace {
        time: &'a str,
        date: &'a str,
        zone: &'a str,
        status: SyncStatus,
    },
    WordClockStatus {
        time: &'a str,
        phrase: &'a str,
        status: SyncStatus,
        brightness_percent: u8,
    },
}

/// Board display backend. Draw failures are the renderer's to handle.
pub trait Renderer {
    fn show(&mut self, screen: Screen<'_>);
    fn illuminate(&mut self, frame: MatrixFrame);
}
