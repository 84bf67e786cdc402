//! Daylight-saving calendars, evaluated at date granularity.

use super::civil::{CivilDate, last_sunday, nth_sunday};
use crate::settings::DstRule;

/// Second Sunday of March (inclusive) until the first Sunday of November (exclusive).
pub fn is_us_dst(date: CivilDate) -> bool {
    let start = nth_sunday(date.year, 3, 2);
    let end = nth_sunday(date.year, 11, 1);
    date >= start && date < end
}

/// Last Sunday of March (inclusive) until the last Sunday of October (exclusive).
pub fn is_eu_dst(date: CivilDate) -> bool {
    let start = last_sunday(date.year, 3);
    let end = last_sunday(date.year, 10);
    date >= start && date < end
}

pub fn is_dst_active(rule: DstRule, date: CivilDate) -> bool {
    match rule {
        DstRule::Disabled => false,
        DstRule::Us => is_us_dst(date),
        DstRule::Eu => is_eu_dst(date),
    }
}

pub fn dst_offset_seconds(rule: DstRule, date: CivilDate) -> i64 {
    if is_dst_active(rule, date) { 3_600 } else { 0 }
}
