use super::{Word, WordMask};

/// One frame of the power-on word flash.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IntroStep {
    pub mask: WordMask,
    pub duration_ms: u16,
}

const fn step(word: Word, duration_ms: u16) -> IntroStep {
    IntroStep {
        mask: word.mask(),
        duration_ms,
    }
}

pub const INTRO_STEPS: [IntroStep; 21] = [
    step(Word::Signature, 500),
    step(Word::MinuteFive, 250),
    step(Word::MinuteTen, 250),
    step(Word::AQuarter, 250),
    step(Word::Twenty, 250),
    step(Word::Half, 250),
    step(Word::To, 250),
    step(Word::Past, 250),
    step(Word::One, 250),
    step(Word::Two, 250),
    step(Word::Three, 250),
    step(Word::Four, 250),
    step(Word::Five, 250),
    step(Word::Six, 250),
    step(Word::Seven, 250),
    step(Word::Eight, 250),
    step(Word::Nine, 250),
    step(Word::Ten, 250),
    step(Word::Eleven, 250),
    step(Word::Twelve, 250),
    IntroStep {
        mask: WordMask::EMPTY,
        duration_ms: 250,
    },
];

pub const INTRO_DURATION_MS: u64 = {
    let mut total = 0u64;
    let mut index = 0;
    while index < INTRO_STEPS.len() {
        total += INTRO_STEPS[index].duration_ms as u64;
        index += 1;
    }
    total
};

/// Mask to show `elapsed_ms` into the intro, `None` once it has finished.
pub fn intro_mask_at(elapsed_ms: u64) -> Option<WordMask> {
    let mut start = 0u64;
    for step in INTRO_STEPS.iter() {
        let end = start + step.duration_ms as u64;
        if elapsed_ms < end {
            return Some(step.mask);
        }
        start = end;
    }
    None
}
