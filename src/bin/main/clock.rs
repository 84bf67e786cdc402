use embassy_time::Instant;

/// Monotonic milliseconds since boot, the tick fed to the app.
#[derive(Clone, Copy, Debug)]
pub struct BootClock {
    start: Instant,
}

impl BootClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis()
    }
}
