//! Time-to-words encoding for the 8x8 letter matrix.
//!
//! Cell `i` (row-major from the top-left) is bit `63 - i` of a [`WordMask`].

mod color;
mod intro;
mod layout;

use core::ops::{BitOr, BitOrAssign};

use heapless::String;

pub use color::{
    DAY_START_HOUR, NIGHT_START_HOUR, cell_color, color_wheel, is_night_hour, scheduled_brightness,
};
pub use intro::{INTRO_DURATION_MS, INTRO_STEPS, IntroStep, intro_mask_at};
pub use layout::{CELL_COUNT, GRID, GRID_SIZE, cell_bit, letter_at, spell};

/// Animation phase wraps after five full trips around the colour wheel.
pub const PHASE_PERIOD: u16 = 256 * 5;

/// Minutes added before bucketing so the phrase changes slightly ahead of the hand.
pub const MINUTE_BIAS: u8 = 2;

const PHRASE_TEXT_BYTES: usize = 32;

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct WordMask(u64);

impl WordMask {
    pub const EMPTY: Self = Self(0);

    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn overlaps(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    pub const fn is_lit(self, cell: u8) -> bool {
        cell < CELL_COUNT && self.0 & cell_bit(cell) != 0
    }

    pub fn lit_cells(self) -> impl Iterator<Item = u8> {
        (0..CELL_COUNT).filter(move |&cell| self.is_lit(cell))
    }
}

impl BitOr for WordMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for WordMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Matrix row band a word lives in. Regions only share letters within a band.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Band {
    Minute,
    Connector,
    Hour,
    Decoration,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Word {
    MinuteFive,
    MinuteTen,
    AQuarter,
    Twenty,
    Half,
    Past,
    To,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Eleven,
    Twelve,
    Signature,
}

impl Word {
    pub const HOURS: [Self; 12] = [
        Self::One,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
        Self::Nine,
        Self::Ten,
        Self::Eleven,
        Self::Twelve,
    ];

    pub const fn mask(self) -> WordMask {
        WordMask::from_bits(match self {
            Self::MinuteFive => 0x0000_F000_0000_0000,
            Self::MinuteTen => 0x5800_0000_0000_0000,
            Self::AQuarter => 0x80FE_0000_0000_0000,
            Self::Twenty => 0x7E00_0000_0000_0000,
            Self::Half => 0x0000_0F00_0000_0000,
            Self::Past => 0x0000_0078_0000_0000,
            Self::To => 0x0000_000C_0000_0000,
            Self::One => 0x0000_0000_0000_0043,
            Self::Two => 0x0000_0000_0000_C040,
            Self::Three => 0x0000_0000_001F_0000,
            Self::Four => 0x0000_0000_0000_00F0,
            Self::Five => 0x0000_0000_F000_0000,
            Self::Six => 0x0000_0000_00E0_0000,
            Self::Seven => 0x0000_0000_0080_0F00,
            Self::Eight => 0x0000_0000_1F00_0000,
            Self::Nine => 0x0000_0000_0000_000F,
            Self::Ten => 0x0000_0000_0101_0100,
            Self::Eleven => 0x0000_0000_0000_3F00,
            Self::Twelve => 0x0000_0000_0000_FE00,
            Self::Signature => 0x8901_0087_0000_0000,
        })
    }

    pub const fn band(self) -> Band {
        match self {
            Self::MinuteFive | Self::MinuteTen | Self::AQuarter | Self::Twenty | Self::Half => {
                Band::Minute
            }
            Self::Past | Self::To => Band::Connector,
            Self::Signature => Band::Decoration,
            _ => Band::Hour,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::MinuteFive | Self::Five => "FIVE",
            Self::MinuteTen | Self::Ten => "TEN",
            Self::AQuarter => "A QUARTER",
            Self::Twenty => "TWENTY",
            Self::Half => "HALF",
            Self::Past => "PAST",
            Self::To => "TO",
            Self::One => "ONE",
            Self::Two => "TWO",
            Self::Three => "THREE",
            Self::Four => "FOUR",
            Self::Six => "SIX",
            Self::Seven => "SEVEN",
            Self::Eight => "EIGHT",
            Self::Nine => "NINE",
            Self::Eleven => "ELEVEN",
            Self::Twelve => "TWELVE",
            Self::Signature => "ANDYDORO",
        }
    }

    /// Hour word for a 24-hour value: `hour % 12`, with 0 shown as twelve.
    pub const fn for_hour(hour: u8) -> Self {
        match hour % 12 {
            0 => Self::Twelve,
            h => Self::HOURS[(h - 1) as usize],
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MinutePhrase {
    OClock,
    Five,
    Ten,
    Quarter,
    Twenty,
    TwentyFive,
    Half,
}

impl MinutePhrase {
    const BUCKETS: [Self; 12] = [
        Self::OClock,
        Self::Five,
        Self::Ten,
        Self::Quarter,
        Self::Twenty,
        Self::TwentyFive,
        Self::Half,
        Self::TwentyFive,
        Self::Twenty,
        Self::Quarter,
        Self::Ten,
        Self::Five,
    ];

    /// Phrase for an already-biased minute in `0..60`.
    pub const fn for_biased_minute(minute: u8) -> Self {
        Self::BUCKETS[(minute / 5) as usize % 12]
    }

    pub const fn words(self) -> &'static [Word] {
        match self {
            Self::OClock => &[],
            Self::Five => &[Word::MinuteFive],
            Self::Ten => &[Word::MinuteTen],
            Self::Quarter => &[Word::AQuarter],
            Self::Twenty => &[Word::Twenty],
            Self::TwentyFive => &[Word::Twenty, Word::MinuteFive],
            Self::Half => &[Word::Half],
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Connector {
    Past,
    To,
}

impl Connector {
    pub const fn word(self) -> Word {
        match self {
            Self::Past => Word::Past,
            Self::To => Word::To,
        }
    }
}

/// Decoded sentence for one (hour, minute).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Phrase {
    pub minute: MinutePhrase,
    pub connector: Option<Connector>,
    pub hour: Word,
}

impl Phrase {
    pub fn for_time(hour: u8, minute: u8) -> Self {
        let mut hour = hour % 24;
        let mut biased = minute.min(59) + MINUTE_BIAS;
        if biased >= 60 {
            biased -= 60;
            hour = (hour + 1) % 24;
        }

        let connector = if biased < 5 {
            None
        } else if biased < 35 {
            Some(Connector::Past)
        } else {
            hour = (hour + 1) % 24;
            Some(Connector::To)
        };

        Self {
            minute: MinutePhrase::for_biased_minute(biased),
            connector,
            hour: Word::for_hour(hour),
        }
    }

    pub fn mask(&self) -> WordMask {
        let mut mask = self.hour.mask();
        for word in self.minute.words() {
            mask |= word.mask();
        }
        if let Some(connector) = self.connector {
            mask |= connector.word().mask();
        }
        mask
    }

    /// Human-readable sentence, e.g. `"TWENTY FIVE PAST TWO"`.
    pub fn text(&self) -> String<PHRASE_TEXT_BYTES> {
        let mut text = String::new();
        let words = self
            .minute
            .words()
            .iter()
            .copied()
            .chain(self.connector.map(Connector::word))
            .chain(core::iter::once(self.hour));
        for word in words {
            if !text.is_empty() {
                let _ = text.push(' ');
            }
            let _ = text.push_str(word.label());
        }
        text
    }
}

/// Illumination mask for a 24-hour wall-clock time. Pure.
pub fn encode(hour: u8, minute: u8) -> WordMask {
    Phrase::for_time(hour, minute).mask()
}

/// Owner of the colour-cycle phase fed to the matrix renderer.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct WordClockEncoder {
    phase: u16,
}

impl WordClockEncoder {
    pub const fn new() -> Self {
        Self { phase: 0 }
    }

    pub const fn phase(&self) -> u16 {
        self.phase
    }

    /// Advance once per rendered frame; returns the new phase.
    pub fn advance_phase(&mut self) -> u16 {
        self.phase = (self.phase + 1) % PHASE_PERIOD;
        self.phase
    }

    pub fn encode(&self, hour: u8, minute: u8) -> WordMask {
        encode(hour, minute)
    }
}

#[cfg(test)]
mod tests;
