use super::ButtonId;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DebounceConfig {
    pub cooldown_ms: u64,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self { cooldown_ms: 200 }
    }
}

impl DebounceConfig {
    pub const fn with_cooldown_ms(mut self, cooldown_ms: u64) -> Self {
        self.cooldown_ms = cooldown_ms;
        self
    }
}

/// Logical pressed state of each button, already corrected for polarity.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ButtonLevels {
    pub pressed: [bool; 3],
}

impl ButtonLevels {
    pub const fn new(a: bool, b: bool, c: bool) -> Self {
        Self { pressed: [a, b, c] }
    }

    pub const fn is_pressed(&self, button: ButtonId) -> bool {
        self.pressed[button.index()]
    }
}

/// Press-edge detector with one cooldown window shared by every button.
///
/// A reported press blocks detection on all buttons until the cooldown has
/// elapsed. Levels are not sampled during the cooldown, so a button released
/// and pressed again inside the window stays latched until a release is seen.
#[derive(Clone, Copy, Debug)]
pub struct SharedCooldownDebouncer {
    config: DebounceConfig,
    last_press_ms: Option<u64>,
    latched: [bool; 3],
}

impl SharedCooldownDebouncer {
    pub const fn new(config: DebounceConfig) -> Self {
        Self {
            config,
            last_press_ms: None,
            latched: [false; 3],
        }
    }

    pub fn in_cooldown(&self, now_ms: u64) -> bool {
        self.last_press_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < self.config.cooldown_ms)
    }

    pub fn update(&mut self, levels: ButtonLevels, now_ms: u64) -> Option<ButtonId> {
        if self.in_cooldown(now_ms) {
            return None;
        }

        for button in ButtonId::ALL {
            let slot = button.index();
            if levels.is_pressed(button) {
                if !self.latched[slot] {
                    self.latched[slot] = true;
                    self.last_press_ms = Some(now_ms);
                    return Some(button);
                }
            } else {
                self.latched[slot] = false;
            }
        }

        None
    }
}
