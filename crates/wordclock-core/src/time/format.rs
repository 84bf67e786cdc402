use core::fmt::Write;

use heapless::String;

use super::civil::LocalTime;

pub const TIME_SENTINEL: &str = "--:--:--";
pub const DATE_SENTINEL: &str = "----/--/--";

pub type TimeText = String<8>;
pub type DateText = String<10>;

pub fn format_time(time: Option<LocalTime>) -> TimeText {
    let mut text = String::new();
    match time {
        Some(time) => {
            let _ = write!(
                text,
                "{:02}:{:02}:{:02}",
                time.hour, time.minute, time.second
            );
        }
        None => {
            let _ = text.push_str(TIME_SENTINEL);
        }
    }
    text
}

pub fn format_date(time: Option<LocalTime>) -> DateText {
    let mut text = String::new();
    match time {
        Some(time) if (0..=9_999).contains(&time.date.year) => {
            let _ = write!(
                text,
                "{:04}-{:02}-{:02}",
                time.date.year, time.date.month, time.date.day
            );
        }
        _ => {
            let _ = text.push_str(DATE_SENTINEL);
        }
    }
    text
}
