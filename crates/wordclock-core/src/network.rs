//! WiFi scan results and the radio seam.

use heapless::{String, Vec};

pub const MAX_NETWORKS: usize = 16;
pub const SSID_BYTES: usize = 32;
pub const PASSWORD_BYTES: usize = 63;
pub const ADDRESS_BYTES: usize = 24;

pub type Ssid = String<SSID_BYTES>;
pub type Password = String<PASSWORD_BYTES>;
pub type AddressText = String<ADDRESS_BYTES>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SecurityClass {
    Open,
    Wep,
    Wpa,
    Wpa2,
    WpaWpa2,
    Wpa2Enterprise,
    Wpa3,
    Wpa2Wpa3,
    Unknown,
}

impl SecurityClass {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Wep => "WEP",
            Self::Wpa => "WPA",
            Self::Wpa2 => "WPA2",
            Self::WpaWpa2 => "WPA/WPA2",
            Self::Wpa2Enterprise => "WPA2-ENT",
            Self::Wpa3 => "WPA3",
            Self::Wpa2Wpa3 => "WPA2/WPA3",
            Self::Unknown => "Unknown",
        }
    }

    pub const fn needs_password(self) -> bool {
        !matches!(self, Self::Open)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NetworkCandidate {
    pub ssid: Ssid,
    pub rssi: i8,
    pub security: SecurityClass,
}

impl NetworkCandidate {
    /// Over-long names are cut at a char boundary.
    pub fn new(ssid: &str, rssi: i8, security: SecurityClass) -> Self {
        let mut owned = Ssid::new();
        for ch in ssid.chars() {
            if owned.push(ch).is_err() {
                break;
            }
        }
        Self {
            ssid: owned,
            rssi,
            security,
        }
    }

    pub fn signal_percent(&self) -> u8 {
        signal_percent(self.rssi)
    }

    pub fn signal_bars(&self) -> u8 {
        signal_bars(self.rssi)
    }
}

/// Linear map of -90..=-30 dBm onto 0..=100.
pub const fn signal_percent(rssi: i8) -> u8 {
    if rssi >= -30 {
        100
    } else if rssi <= -90 {
        0
    } else {
        ((rssi as i16 + 90) * 100 / 60) as u8
    }
}

pub const fn signal_bars(rssi: i8) -> u8 {
    if rssi > -50 {
        4
    } else if rssi > -60 {
        3
    } else if rssi > -70 {
        2
    } else if rssi > -80 {
        1
    } else {
        0
    }
}

/// Scan results with a wrapping cursor.
#[derive(Clone, Debug, Default)]
pub struct NetworkList {
    entries: Vec<NetworkCandidate, MAX_NETWORKS>,
    cursor: usize,
}

impl NetworkList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    /// Keeps the strongest [`MAX_NETWORKS`] candidates, strongest first.
    pub fn insert(&mut self, candidate: NetworkCandidate) {
        if self.entries.is_full() {
            let Some(weakest) = self.entries.last() else {
                return;
            };
            if candidate.rssi <= weakest.rssi {
                return;
            }
            self.entries.pop();
        }

        let position = self
            .entries
            .iter()
            .position(|entry| entry.rssi < candidate.rssi)
            .unwrap_or(self.entries.len());
        let _ = self.entries.insert(position, candidate);
        self.cursor = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&NetworkCandidate> {
        self.entries.get(self.cursor)
    }

    pub fn get(&self, index: usize) -> Option<&NetworkCandidate> {
        self.entries.get(index)
    }

    pub fn advance(&mut self) {
        if !self.entries.is_empty() {
            self.cursor = (self.cursor + 1) % self.entries.len();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &NetworkCandidate> {
        self.entries.iter()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConnectError {
    Timeout,
    Rejected,
}

/// Station-mode radio used by the state machine.
#[allow(async_fn_in_trait)]
pub trait NetworkProvider {
    type Error: core::fmt::Debug;

    /// Replace `results` with the networks currently in range.
    async fn scan(&mut self, results: &mut NetworkList) -> Result<(), Self::Error>;

    /// Join `ssid` using the `security` seen during the scan, giving up after `timeout_ms`.
    async fn connect(
        &mut self,
        ssid: &str,
        password: &str,
        security: SecurityClass,
        timeout_ms: u32,
    ) -> Result<(), ConnectError>;

    fn local_address(&self) -> AddressText;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(ssid: &str, rssi: i8) -> NetworkCandidate {
        NetworkCandidate::new(ssid, rssi, SecurityClass::Wpa2)
    }

    #[test]
    fn list_orders_by_signal_and_wraps_cursor() {
        let mut list = NetworkList::new();
        list.insert(candidate("far", -85));
        list.insert(candidate("near", -40));
        list.insert(candidate("mid", -65));

        let names: std::vec::Vec<&str> = list.iter().map(|entry| entry.ssid.as_str()).collect();
        assert_eq!(names, ["near", "mid", "far"]);

        assert_eq!(list.current().map(|entry| entry.ssid.as_str()), Some("near"));
        list.advance();
        list.advance();
        assert_eq!(list.cursor(), 2);
        list.advance();
        assert_eq!(list.cursor(), 0);
    }

    #[test]
    fn full_list_drops_weakest() {
        let mut list = NetworkList::new();
        for index in 0..MAX_NETWORKS {
            list.insert(candidate("net", -50 - index as i8));
        }
        list.insert(candidate("strong", -20));
        list.insert(candidate("weak", -99));

        assert_eq!(list.len(), MAX_NETWORKS);
        assert_eq!(list.get(0).map(|entry| entry.ssid.as_str()), Some("strong"));
        assert!(list.iter().all(|entry| entry.ssid.as_str() != "weak"));
    }

    #[test]
    fn empty_list_cursor_is_inert() {
        let mut list = NetworkList::new();
        list.advance();
        assert_eq!(list.cursor(), 0);
        assert!(list.current().is_none());
    }

    #[test]
    fn long_ssid_is_truncated() {
        let long = "a-very-long-network-name-that-overflows";
        let entry = NetworkCandidate::new(long, -60, SecurityClass::Open);
        assert_eq!(entry.ssid.len(), SSID_BYTES);
        assert!(!entry.security.needs_password());
    }

    #[test]
    fn signal_helpers_follow_thresholds() {
        assert_eq!(signal_percent(-20), 100);
        assert_eq!(signal_percent(-30), 100);
        assert_eq!(signal_percent(-60), 50);
        assert_eq!(signal_percent(-90), 0);
        assert_eq!(signal_bars(-45), 4);
        assert_eq!(signal_bars(-50), 3);
        assert_eq!(signal_bars(-75), 1);
        assert_eq!(signal_bars(-85), 0);
    }
}
