//! Input abstraction for the three-button front panel.

mod debounce;
mod mock;

pub use debounce::{ButtonLevels, DebounceConfig, SharedCooldownDebouncer};
pub use mock::{MockInput, ScriptedInput};

/// Physical button, in scan priority order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ButtonId {
    A,
    B,
    C,
}

impl ButtonId {
    pub const ALL: [Self; 3] = [Self::A, Self::B, Self::C];

    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
        }
    }
}

/// Source of debounced press events.
pub trait InputProvider {
    type Error: core::fmt::Debug;

    /// At most one press per call.
    fn poll_event(&mut self, now_ms: u64) -> Result<Option<ButtonId>, Self::Error>;
}
