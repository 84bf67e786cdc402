use embedded_hal::digital::InputPin;

use wordclock_core::input::{
    ButtonId, ButtonLevels, DebounceConfig, InputProvider, SharedCooldownDebouncer,
};

#[derive(Debug, Clone, Copy)]
pub struct ButtonConfig {
    active_low: [bool; 3],
    cooldown_ms: u64,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            active_low: [true; 3],
            cooldown_ms: DebounceConfig::default().cooldown_ms,
        }
    }
}

impl ButtonConfig {
    /// Sets the polarity of one button; buttons default to pull-up wiring.
    pub const fn with_active_low(mut self, button: ButtonId, active_low: bool) -> Self {
        self.active_low[button.index()] = active_low;
        self
    }

    pub const fn with_cooldown_ms(mut self, cooldown_ms: u64) -> Self {
        self.cooldown_ms = cooldown_ms;
        self
    }
}

#[derive(Debug)]
pub enum ButtonInputError<AErr, BErr, CErr> {
    A(AErr),
    B(BErr),
    C(CErr),
}

type ButtonResult<AErr, BErr, CErr, T> = Result<T, ButtonInputError<AErr, BErr, CErr>>;

/// Three push buttons sharing one press cooldown.
#[derive(Debug)]
pub struct ButtonTrio<A, B, C> {
    a: A,
    b: B,
    c: C,
    config: ButtonConfig,
    debouncer: SharedCooldownDebouncer,
}

impl<A, B, C> ButtonTrio<A, B, C>
where
    A: InputPin,
    B: InputPin,
    C: InputPin,
{
    pub fn new(a: A, b: B, c: C, config: ButtonConfig) -> Self {
        let debounce = DebounceConfig::default().with_cooldown_ms(config.cooldown_ms);
        Self {
            a,
            b,
            c,
            config,
            debouncer: SharedCooldownDebouncer::new(debounce),
        }
    }

    fn read_levels(&mut self) -> ButtonResult<A::Error, B::Error, C::Error, ButtonLevels> {
        let a_high = self.a.is_high().map_err(ButtonInputError::A)?;
        let b_high = self.b.is_high().map_err(ButtonInputError::B)?;
        let c_high = self.c.is_high().map_err(ButtonInputError::C)?;
        let [a_low, b_low, c_low] = self.config.active_low;

        Ok(ButtonLevels::new(
            pressed_from_level(a_high, a_low),
            pressed_from_level(b_high, b_low),
            pressed_from_level(c_high, c_low),
        ))
    }
}

impl<A, B, C> InputProvider for ButtonTrio<A, B, C>
where
    A: InputPin,
    B: InputPin,
    C: InputPin,
{
    type Error = ButtonInputError<A::Error, B::Error, C::Error>;

    fn poll_event(&mut self, now_ms: u64) -> Result<Option<ButtonId>, Self::Error> {
        if self.debouncer.in_cooldown(now_ms) {
            return Ok(None);
        }

        let levels = self.read_levels()?;
        Ok(self.debouncer.update(levels, now_ms))
    }
}

#[inline]
fn pressed_from_level(high: bool, active_low: bool) -> bool {
    if active_low { !high } else { high }
}
