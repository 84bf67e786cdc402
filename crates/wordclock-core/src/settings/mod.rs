//! Persisted clock settings with validated accessors.

mod memory;
pub mod record;
mod zones;

use core::fmt::Write;

use heapless::String;
use log::{info, warn};

pub use memory::{MemoryStore, MemoryStoreError};
pub use zones::{TIMEZONES, TimeZoneInfo, timezone_label, timezone_name};

pub const SETTINGS_NAMESPACE: &str = "clocksettings";
pub const KEY_TIMEZONE: &str = "timezone";
pub const KEY_DST_RULE: &str = "dstRules";
pub const KEY_BRIGHTNESS: &str = "brightness";
pub const KEY_FIRST_RUN: &str = "firstTime";

pub const MIN_TIMEZONE_OFFSET: i8 = -12;
pub const MAX_TIMEZONE_OFFSET: i8 = 12;
pub const MAX_BRIGHTNESS_PERCENT: u8 = 100;
pub const BRIGHTNESS_STEP: u8 = 10;

const STATUS_LINE_BYTES: usize = 96;

/// Daylight-saving calendar applied on top of the fixed offset.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DstRule {
    Disabled,
    Us,
    Eu,
}

impl DstRule {
    pub const fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::Disabled),
            1 => Some(Self::Us),
            2 => Some(Self::Eu),
            _ => None,
        }
    }

    pub const fn as_raw(self) -> i32 {
        match self {
            Self::Disabled => 0,
            Self::Us => 1,
            Self::Eu => 2,
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::Disabled => Self::Us,
            Self::Us => Self::Eu,
            Self::Eu => Self::Disabled,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Disabled => "Disabled",
            Self::Us => "US Rules",
            Self::Eu => "EU Rules",
        }
    }
}

/// User-tunable settings that survive reboot.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ClockSettings {
    pub timezone_offset_hours: i8,
    pub dst_rule: DstRule,
    pub brightness_percent: u8,
    pub first_run: bool,
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            timezone_offset_hours: -6,
            dst_rule: DstRule::Us,
            brightness_percent: 75,
            first_run: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SettingField {
    Timezone,
    DstRule,
    Brightness,
}

/// Setter input outside the field's declared range.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InvalidSetting {
    pub field: SettingField,
    pub value: i32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SettingsError<E> {
    Storage(E),
}

/// What `load` found in storage.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadOutcome {
    /// Nothing stored yet; defaults were written.
    Initialized,
    Restored,
    /// Some stored fields were invalid and have been rewritten with defaults.
    Corrected { fields: u8 },
}

/// Namespaced key-value persistence backend.
pub trait KeyValueStore {
    type Error: core::fmt::Debug;

    fn get_int(&mut self, key: &str) -> Result<Option<i32>, Self::Error>;
    fn put_int(&mut self, key: &str, value: i32) -> Result<(), Self::Error>;
    fn get_bool(&mut self, key: &str) -> Result<Option<bool>, Self::Error>;
    fn put_bool(&mut self, key: &str, value: bool) -> Result<(), Self::Error>;
}

pub const fn is_valid_timezone_offset(hours: i32) -> bool {
    hours >= MIN_TIMEZONE_OFFSET as i32 && hours <= MAX_TIMEZONE_OFFSET as i32
}

pub const fn is_valid_brightness(percent: i32) -> bool {
    percent >= 0 && percent <= MAX_BRIGHTNESS_PERCENT as i32
}

pub const fn next_timezone_offset(hours: i8) -> i8 {
    if hours >= MAX_TIMEZONE_OFFSET {
        MIN_TIMEZONE_OFFSET
    } else if hours < MIN_TIMEZONE_OFFSET {
        MIN_TIMEZONE_OFFSET
    } else {
        hours + 1
    }
}

pub const fn prev_timezone_offset(hours: i8) -> i8 {
    if hours <= MIN_TIMEZONE_OFFSET {
        MAX_TIMEZONE_OFFSET
    } else if hours > MAX_TIMEZONE_OFFSET {
        MAX_TIMEZONE_OFFSET
    } else {
        hours - 1
    }
}

/// Brightness step used by the settings menu: `+10`, wrapping past 100 back to 0.
pub const fn next_brightness(percent: u8) -> u8 {
    if percent >= MAX_BRIGHTNESS_PERCENT {
        0
    } else {
        let stepped = percent.saturating_add(BRIGHTNESS_STEP);
        if stepped > MAX_BRIGHTNESS_PERCENT {
            MAX_BRIGHTNESS_PERCENT
        } else {
            stepped
        }
    }
}

/// Settings cache in front of a [`KeyValueStore`].
///
/// The in-memory copy is authoritative; storage is only touched by
/// [`load`](Self::load) and [`save`](Self::save).
pub struct SettingsStore<KV> {
    kv: KV,
    current: ClockSettings,
}

impl<KV> SettingsStore<KV>
where
    KV: KeyValueStore,
{
    pub fn new(kv: KV) -> Self {
        Self {
            kv,
            current: ClockSettings::default(),
        }
    }

    pub fn settings(&self) -> ClockSettings {
        self.current
    }

    pub fn kv(&self) -> &KV {
        &self.kv
    }

    pub fn kv_mut(&mut self) -> &mut KV {
        &mut self.kv
    }

    fn read_int(&mut self, key: &str) -> Option<i32> {
        match self.kv.get_int(key) {
            Ok(value) => value,
            Err(err) => {
                warn!("settings: read failed key={} err={:?}", key, err);
                None
            }
        }
    }

    fn read_bool(&mut self, key: &str) -> Option<bool> {
        match self.kv.get_bool(key) {
            Ok(value) => value,
            Err(err) => {
                warn!("settings: read failed key={} err={:?}", key, err);
                None
            }
        }
    }

    pub fn load(&mut self) -> Result<LoadOutcome, SettingsError<KV::Error>> {
        let defaults = ClockSettings::default();

        // A missing timezone key marks an empty namespace; an unreadable one is corrected below.
        let raw_timezone = match self.kv.get_int(KEY_TIMEZONE) {
            Ok(Some(value)) => Some(value),
            Ok(None) => {
                info!("settings: no stored settings, writing defaults");
                self.current = defaults;
                self.save()?;
                return Ok(LoadOutcome::Initialized);
            }
            Err(err) => {
                warn!("settings: read failed key={} err={:?}", KEY_TIMEZONE, err);
                None
            }
        };

        let mut corrected = 0u8;

        let timezone_offset_hours = match raw_timezone {
            Some(value) if is_valid_timezone_offset(value) => value as i8,
            other => {
                warn!("settings: stored timezone={:?} invalid, using default", other);
                corrected += 1;
                defaults.timezone_offset_hours
            }
        };

        let raw_dst = self.read_int(KEY_DST_RULE);
        let dst_rule = match raw_dst.and_then(DstRule::from_raw) {
            Some(rule) => rule,
            None => {
                warn!("settings: stored dst rule={:?} invalid, using default", raw_dst);
                corrected += 1;
                defaults.dst_rule
            }
        };

        let raw_brightness = self.read_int(KEY_BRIGHTNESS);
        let brightness_percent = match raw_brightness {
            Some(value) if is_valid_brightness(value) => value as u8,
            other => {
                warn!("settings: stored brightness={:?} invalid, using default", other);
                corrected += 1;
                defaults.brightness_percent
            }
        };

        let first_run = match self.read_bool(KEY_FIRST_RUN) {
            Some(flag) => flag,
            None => {
                corrected += 1;
                defaults.first_run
            }
        };

        self.current = ClockSettings {
            timezone_offset_hours,
            dst_rule,
            brightness_percent,
            first_run,
        };

        if corrected > 0 {
            self.save()?;
            return Ok(LoadOutcome::Corrected { fields: corrected });
        }

        info!(
            "settings: loaded tz={} dst={} brightness={} first_run={}",
            timezone_offset_hours,
            dst_rule.label(),
            brightness_percent,
            first_run
        );
        Ok(LoadOutcome::Restored)
    }

    pub fn save(&mut self) -> Result<(), SettingsError<KV::Error>> {
        let settings = self.current;
        self.kv
            .put_int(KEY_TIMEZONE, settings.timezone_offset_hours as i32)
            .map_err(SettingsError::Storage)?;
        self.kv
            .put_int(KEY_DST_RULE, settings.dst_rule.as_raw())
            .map_err(SettingsError::Storage)?;
        self.kv
            .put_int(KEY_BRIGHTNESS, settings.brightness_percent as i32)
            .map_err(SettingsError::Storage)?;
        self.kv
            .put_bool(KEY_FIRST_RUN, settings.first_run)
            .map_err(SettingsError::Storage)?;
        Ok(())
    }

    pub fn set_timezone_offset(&mut self, hours: i32) -> Result<(), InvalidSetting> {
        if !is_valid_timezone_offset(hours) {
            return Err(InvalidSetting {
                field: SettingField::Timezone,
                value: hours,
            });
        }
        self.current.timezone_offset_hours = hours as i8;
        Ok(())
    }

    pub fn set_dst_rule(&mut self, raw: i32) -> Result<(), InvalidSetting> {
        let Some(rule) = DstRule::from_raw(raw) else {
            return Err(InvalidSetting {
                field: SettingField::DstRule,
                value: raw,
            });
        };
        self.current.dst_rule = rule;
        Ok(())
    }

    pub fn set_brightness(&mut self, percent: i32) -> Result<(), InvalidSetting> {
        if !is_valid_brightness(percent) {
            return Err(InvalidSetting {
                field: SettingField::Brightness,
                value: percent,
            });
        }
        self.current.brightness_percent = percent as u8;
        Ok(())
    }

    pub fn set_first_run(&mut self, first_run: bool) {
        self.current.first_run = first_run;
    }

    /// Replace every field at once; nothing changes unless all fields validate.
    pub fn apply(&mut self, settings: ClockSettings) -> Result<(), InvalidSetting> {
        let previous = self.current;
        let result = self
            .set_timezone_offset(settings.timezone_offset_hours as i32)
            .and_then(|()| self.set_dst_rule(settings.dst_rule.as_raw()))
            .and_then(|()| self.set_brightness(settings.brightness_percent as i32));
        match result {
            Ok(()) => {
                self.current.first_run = settings.first_run;
                Ok(())
            }
            Err(err) => {
                self.current = previous;
                Err(err)
            }
        }
    }

    pub fn next_timezone(&mut self) {
        self.current.timezone_offset_hours = next_timezone_offset(self.current.timezone_offset_hours);
    }

    pub fn prev_timezone(&mut self) {
        self.current.timezone_offset_hours = prev_timezone_offset(self.current.timezone_offset_hours);
    }

    pub fn next_dst_rule(&mut self) {
        self.current.dst_rule = self.current.dst_rule.next();
    }

    pub fn reset_to_defaults(&mut self) {
        self.current = ClockSettings::default();
    }

    pub fn status_line(&self) -> String<STATUS_LINE_BYTES> {
        let mut line = String::new();
        let _ = write!(
            line,
            "TZ: {}, DST: {}, Brightness: {}%",
            timezone_name(self.current.timezone_offset_hours),
            self.current.dst_rule.label(),
            self.current.brightness_percent
        );
        line
    }
}
