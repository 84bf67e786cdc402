//! Network-anchored wall-clock time.
//!
//! A successful sync stores the UTC epoch together with the monotonic tick it
//! was received at; every later query extrapolates from that anchor.

mod civil;
mod dst;
mod format;
pub mod ntp;

use log::{info, warn};

use crate::settings::{ClockSettings, DstRule};

pub use civil::{
    CivilDate, LocalTime, civil_from_days, date_from_epoch_seconds, day_of_week, days_from_civil,
    days_in_month, is_leap_year, last_sunday, nth_sunday,
};
pub use dst::{dst_offset_seconds, is_dst_active, is_eu_dst, is_us_dst};
pub use format::{DATE_SENTINEL, DateText, TIME_SENTINEL, TimeText, format_date, format_time};

/// 2020-01-01T00:00:00Z. Replies before this are treated as an unset server clock.
pub const MIN_VALID_EPOCH: u64 = 1_577_836_800;

/// One-shot UTC time request against an external server.
#[allow(async_fn_in_trait)]
pub trait ClockSource {
    /// Single round trip; `None` when nothing usable arrived within `timeout_ms`.
    async fn request_time(&mut self, timeout_ms: u32) -> Option<u64>;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SyncStatus {
    NotSynced,
    Syncing,
    Success,
    Failed,
}

impl SyncStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotSynced => "Not Synced",
            Self::Syncing => "Syncing...",
            Self::Success => "Synced",
            Self::Failed => "Sync Failed",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SyncError {
    Timeout,
    InvalidReply { epoch: u64 },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimeAnchor {
    pub utc_epoch_at_sync: u64,
    pub tick_ms_at_sync: u64,
    pub status: SyncStatus,
}

impl TimeAnchor {
    const fn unsynced() -> Self {
        Self {
            utc_epoch_at_sync: 0,
            tick_ms_at_sync: 0,
            status: SyncStatus::NotSynced,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimeConfig {
    pub sync_timeout_ms: u32,
    pub resync_interval_ms: u64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            sync_timeout_ms: 5_000,
            resync_interval_ms: 3_600_000,
        }
    }
}

/// Fixed offset plus DST calendar used to derive local time.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ZoneRule {
    pub offset_hours: i8,
    pub dst: DstRule,
}

impl ZoneRule {
    pub const UTC: Self = Self {
        offset_hours: 0,
        dst: DstRule::Disabled,
    };

    pub const fn from_settings(settings: &ClockSettings) -> Self {
        Self {
            offset_hours: settings.timezone_offset_hours,
            dst: settings.dst_rule,
        }
    }

    /// Local epoch seconds for a UTC epoch. DST is decided on the standard-time date.
    pub fn local_seconds(&self, utc_epoch: u64) -> i64 {
        let standard = utc_epoch as i64 + self.offset_hours as i64 * 3_600;
        standard + dst_offset_seconds(self.dst, date_from_epoch_seconds(standard))
    }
}

pub struct TimeService<C> {
    source: C,
    config: TimeConfig,
    anchor: TimeAnchor,
    zone: ZoneRule,
}

impl<C> TimeService<C>
where
    C: ClockSource,
{
    pub fn new(source: C, config: TimeConfig) -> Self {
        Self {
            source,
            config,
            anchor: TimeAnchor::unsynced(),
            zone: ZoneRule::UTC,
        }
    }

    pub fn source_mut(&mut self) -> &mut C {
        &mut self.source
    }

    pub fn set_zone(&mut self, zone: ZoneRule) {
        self.zone = zone;
    }

    pub fn zone(&self) -> ZoneRule {
        self.zone
    }

    pub fn anchor(&self) -> TimeAnchor {
        self.anchor
    }

    pub fn status(&self) -> SyncStatus {
        self.anchor.status
    }

    /// One request, bounded by the configured timeout. No retry.
    pub async fn sync(&mut self, now_ms: u64) -> Result<(), SyncError> {
        self.anchor.status = SyncStatus::Syncing;
        info!("time: sync requested timeout_ms={}", self.config.sync_timeout_ms);

        let reply = self.source.request_time(self.config.sync_timeout_ms).await;
        match reply {
            Some(epoch) if epoch >= MIN_VALID_EPOCH => {
                self.anchor = TimeAnchor {
                    utc_epoch_at_sync: epoch,
                    tick_ms_at_sync: now_ms,
                    status: SyncStatus::Success,
                };
                info!("time: sync ok epoch={}", epoch);
                Ok(())
            }
            Some(epoch) => {
                self.anchor.status = SyncStatus::Failed;
                warn!("time: sync rejected implausible epoch={}", epoch);
                Err(SyncError::InvalidReply { epoch })
            }
            None => {
                self.anchor.status = SyncStatus::Failed;
                warn!("time: sync timed out");
                Err(SyncError::Timeout)
            }
        }
    }

    pub fn utc_now(&self, now_ms: u64) -> Option<u64> {
        if self.anchor.status != SyncStatus::Success {
            return None;
        }
        let elapsed_s = now_ms.saturating_sub(self.anchor.tick_ms_at_sync) / 1_000;
        Some(self.anchor.utc_epoch_at_sync.saturating_add(elapsed_s))
    }

    pub fn now(&self, now_ms: u64) -> Option<LocalTime> {
        self.utc_now(now_ms)
            .map(|utc| LocalTime::from_epoch_seconds(self.zone.local_seconds(utc)))
    }

    pub fn needs_resync(&self, now_ms: u64) -> bool {
        if self.anchor.status != SyncStatus::Success {
            return true;
        }
        now_ms.saturating_sub(self.anchor.tick_ms_at_sync) > self.config.resync_interval_ms
    }

    pub fn seconds_since_sync(&self, now_ms: u64) -> Option<u64> {
        if self.anchor.status != SyncStatus::Success {
            return None;
        }
        Some(now_ms.saturating_sub(self.anchor.tick_ms_at_sync) / 1_000)
    }

    pub fn formatted_time(&self, now_ms: u64) -> TimeText {
        format_time(self.now(now_ms))
    }

    pub fn formatted_date(&self, now_ms: u64) -> DateText {
        format_date(self.now(now_ms))
    }
}
