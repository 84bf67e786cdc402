use super::*;

const MINUTE_WORDS: [Word; 5] = [
    Word::MinuteFive,
    Word::MinuteTen,
    Word::AQuarter,
    Word::Twenty,
    Word::Half,
];

fn mask_of(words: &[Word]) -> WordMask {
    words
        .iter()
        .fold(WordMask::EMPTY, |mask, word| mask | word.mask())
}

#[test]
fn scenario_times_encode_to_expected_words() {
    assert_eq!(encode(14, 7), mask_of(&[Word::MinuteFive, Word::Past, Word::Two]));
    assert_eq!(encode(0, 1), Word::Twelve.mask());
    assert_eq!(encode(14, 57), mask_of(&[Word::MinuteFive, Word::To, Word::Three]));
    // The bias carries 14:58 over into the next hour.
    assert_eq!(encode(14, 58), Word::Three.mask());
}

#[test]
fn quarter_half_and_twenty_five() {
    assert_eq!(encode(9, 15), mask_of(&[Word::AQuarter, Word::Past, Word::Nine]));
    assert_eq!(encode(9, 30), mask_of(&[Word::Half, Word::Past, Word::Nine]));
    assert_eq!(
        encode(9, 25),
        mask_of(&[Word::Twenty, Word::MinuteFive, Word::Past, Word::Nine])
    );
    assert_eq!(
        encode(9, 35),
        mask_of(&[Word::Twenty, Word::MinuteFive, Word::To, Word::Ten])
    );
    assert_eq!(encode(9, 45), mask_of(&[Word::AQuarter, Word::To, Word::Ten]));
}

#[test]
fn bias_moves_bucket_two_minutes_early() {
    assert_eq!(Phrase::for_time(10, 2).minute, MinutePhrase::OClock);
    assert_eq!(Phrase::for_time(10, 3).minute, MinutePhrase::Five);
    assert_eq!(Phrase::for_time(10, 32).connector, Some(Connector::Past));
    assert_eq!(Phrase::for_time(10, 33).connector, Some(Connector::To));
    assert_eq!(Phrase::for_time(10, 33).hour, Word::Eleven);
}

#[test]
fn every_minute_hits_at_most_one_phrase() {
    for minute in 0..60 {
        let phrase = Phrase::for_time(7, minute);
        let mask = encode(7, minute);

        let biased = (minute + MINUTE_BIAS) % 60;
        let expected = MinutePhrase::for_biased_minute(biased);
        assert_eq!(phrase.minute, expected, "minute {minute}");

        let lit_minute_words = MINUTE_WORDS
            .iter()
            .filter(|word| mask.contains(word.mask()))
            .count();
        let expected_words = match expected {
            MinutePhrase::OClock => 0,
            MinutePhrase::TwentyFive => 2,
            _ => 1,
        };
        // TEN is a subset of TWENTY, so it reads as lit whenever TWENTY is.
        let overlap = usize::from(mask.contains(Word::Twenty.mask()));
        assert_eq!(lit_minute_words, expected_words + overlap, "minute {minute}");
    }
}

#[test]
fn every_hour_shows_twelve_hour_word() {
    for hour in 0..24u8 {
        let phrase = Phrase::for_time(hour, 0);
        let expected = if hour % 12 == 0 { 12 } else { hour % 12 };
        assert_eq!(phrase.hour, Word::HOURS[(expected - 1) as usize], "hour {hour}");
        assert_eq!(phrase.connector, None);
    }
}

#[test]
fn hour_wraps_at_midnight() {
    assert_eq!(Phrase::for_time(23, 59).hour, Word::Twelve);
    assert_eq!(Phrase::for_time(23, 40).hour, Word::Twelve);
    assert_eq!(Phrase::for_time(11, 58).hour, Word::Twelve);
}

#[test]
fn bands_never_collide() {
    for hour in 0..24 {
        for minute in 0..60 {
            let phrase = Phrase::for_time(hour, minute);
            let minute_mask = mask_of(phrase.minute.words());
            let connector_mask = phrase
                .connector
                .map_or(WordMask::EMPTY, |connector| connector.word().mask());
            let hour_mask = phrase.hour.mask();

            assert!(!minute_mask.overlaps(connector_mask));
            assert!(!minute_mask.overlaps(hour_mask));
            assert!(!connector_mask.overlaps(hour_mask));
        }
    }
}

#[test]
fn regions_spell_their_words() {
    assert_eq!(spell(Word::Twenty.mask()).as_str(), "TWENTY");
    assert_eq!(spell(Word::AQuarter.mask()).as_str(), "AQUARTER");
    assert_eq!(spell(Word::Past.mask()).as_str(), "PAST");
    assert_eq!(spell(Word::To.mask()).as_str(), "TO");
    assert_eq!(spell(Word::Eight.mask()).as_str(), "EIGHT");
    assert_eq!(spell(Word::Ten.mask()).as_str(), "TEN");
    assert_eq!(spell(Word::Signature.mask()).as_str(), "ANDYDORO");
}

#[test]
fn phrase_text_reads_naturally() {
    assert_eq!(Phrase::for_time(14, 27).text().as_str(), "TWENTY FIVE PAST TWO");
    assert_eq!(Phrase::for_time(6, 0).text().as_str(), "SIX");
    assert_eq!(Phrase::for_time(6, 44).text().as_str(), "A QUARTER TO SEVEN");
}

#[test]
fn phase_wraps_after_five_wheel_turns() {
    let mut encoder = WordClockEncoder::new();
    for _ in 0..PHASE_PERIOD - 1 {
        encoder.advance_phase();
    }
    assert_eq!(encoder.phase(), PHASE_PERIOD - 1);
    assert_eq!(encoder.advance_phase(), 0);
}

#[test]
fn color_wheel_hits_primaries() {
    assert_eq!(color_wheel(0), [255, 0, 0]);
    assert_eq!(color_wheel(85), [0, 255, 0]);
    assert_eq!(color_wheel(170), [0, 0, 255]);
    assert_eq!(color_wheel(255), [255, 0, 0]);
    assert_eq!(cell_color(1, 0), color_wheel(4));
    assert_eq!(cell_color(0, 256), color_wheel(0));
}

#[test]
fn brightness_halves_at_night() {
    assert_eq!(scheduled_brightness(100, Some(12)), 255);
    assert_eq!(scheduled_brightness(100, Some(23)), 127);
    assert_eq!(scheduled_brightness(100, Some(6)), 127);
    assert_eq!(scheduled_brightness(100, Some(7)), 255);
    assert_eq!(scheduled_brightness(1, Some(2)), 1);
    assert_eq!(scheduled_brightness(0, Some(2)), 0);
    assert_eq!(scheduled_brightness(50, None), 127);
}

#[test]
fn intro_walks_every_word_then_blanks() {
    assert_eq!(intro_mask_at(0), Some(Word::Signature.mask()));
    assert_eq!(intro_mask_at(499), Some(Word::Signature.mask()));
    assert_eq!(intro_mask_at(500), Some(Word::MinuteFive.mask()));
    assert_eq!(intro_mask_at(INTRO_DURATION_MS - 1), Some(WordMask::EMPTY));
    assert_eq!(intro_mask_at(INTRO_DURATION_MS), None);
    assert_eq!(INTRO_DURATION_MS, 5_500);
}
