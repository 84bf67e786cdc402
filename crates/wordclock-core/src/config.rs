//! Timing knobs for the device state machine.

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ClockConfig {
    pub logo_ms: u64,
    pub startup_message_ms: u64,
    /// Auto-continue delay on the connect-success banner.
    pub wifi_success_ms: u64,
    pub connect_timeout_ms: u32,
    pub sync_timeout_ms: u32,
    pub resync_interval_ms: u64,
    /// Minimum spacing between automatic sync attempts.
    pub resync_retry_ms: u64,
    pub matrix_frame_ms: u64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            logo_ms: 4_000,
            startup_message_ms: 3_000,
            wifi_success_ms: 5_000,
            connect_timeout_ms: 10_000,
            sync_timeout_ms: 5_000,
            resync_interval_ms: 3_600_000,
            resync_retry_ms: 60_000,
            matrix_frame_ms: 100,
        }
    }
}
