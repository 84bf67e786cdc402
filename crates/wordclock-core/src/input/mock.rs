use core::convert::Infallible;

use super::{ButtonId, InputProvider};

/// No-hardware input source used during bring-up.
#[derive(Default, Debug, Clone, Copy)]
pub struct MockInput;

impl MockInput {
    pub const fn new() -> Self {
        Self
    }
}

impl InputProvider for MockInput {
    type Error = Infallible;

    fn poll_event(&mut self, _now_ms: u64) -> Result<Option<ButtonId>, Self::Error> {
        Ok(None)
    }
}

/// Replays `(at_ms, button)` presses once their timestamp has been reached.
#[derive(Debug, Clone, Copy)]
pub struct ScriptedInput<'a> {
    presses: &'a [(u64, ButtonId)],
    cursor: usize,
}

impl<'a> ScriptedInput<'a> {
    pub const fn new(presses: &'a [(u64, ButtonId)]) -> Self {
        Self { presses, cursor: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.presses.len().saturating_sub(self.cursor)
    }
}

impl InputProvider for ScriptedInput<'_> {
    type Error = Infallible;

    fn poll_event(&mut self, now_ms: u64) -> Result<Option<ButtonId>, Self::Error> {
        let Some(&(at_ms, button)) = self.presses.get(self.cursor) else {
            return Ok(None);
        };
        if now_ms < at_ms {
            return Ok(None);
        }
        self.cursor = self.cursor.saturating_add(1);
        Ok(Some(button))
    }
}
