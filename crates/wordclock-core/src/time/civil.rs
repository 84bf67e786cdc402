//! Proleptic Gregorian calendar arithmetic on Unix epoch seconds.

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct CivilDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl CivilDate {
    pub const fn new(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }
}

/// Broken-down wall-clock time.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LocalTime {
    pub date: CivilDate,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// 0 = Sunday.
    pub weekday: u8,
}

impl LocalTime {
    pub fn from_epoch_seconds(seconds: i64) -> Self {
        let days = seconds.div_euclid(SECONDS_PER_DAY);
        let second_of_day = seconds.rem_euclid(SECONDS_PER_DAY);
        Self {
            date: civil_from_days(days),
            hour: (second_of_day / 3_600) as u8,
            minute: ((second_of_day % 3_600) / 60) as u8,
            second: (second_of_day % 60) as u8,
            weekday: weekday_from_days(days),
        }
    }
}

pub fn date_from_epoch_seconds(seconds: i64) -> CivilDate {
    civil_from_days(seconds.div_euclid(SECONDS_PER_DAY))
}

/// Days since 1970-01-01 for a civil date.
pub fn days_from_civil(date: CivilDate) -> i64 {
    let month = date.month as i64;
    let day = date.day as i64;
    let year = date.year as i64 - i64::from(month <= 2);
    let era = year.div_euclid(400);
    let year_of_era = year - era * 400;
    let shifted_month = (month + 9) % 12;
    let day_of_year = (153 * shifted_month + 2) / 5 + day - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * 146_097 + day_of_era - 719_468
}

pub fn civil_from_days(days: i64) -> CivilDate {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let day_of_era = z - era * 146_097;
    let year_of_era =
        (day_of_era - day_of_era / 1_460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let shifted_month = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * shifted_month + 2) / 5 + 1;
    let month = if shifted_month < 10 {
        shifted_month + 3
    } else {
        shifted_month - 9
    };
    let year = year_of_era + era * 400 + i64::from(month <= 2);
    CivilDate {
        year: year as i32,
        month: month as u8,
        day: day as u8,
    }
}

fn weekday_from_days(days: i64) -> u8 {
    // 1970-01-01 was a Thursday.
    (days + 4).rem_euclid(7) as u8
}

/// Sakamoto's day-of-week, 0 = Sunday.
pub fn day_of_week(date: CivilDate) -> u8 {
    const OFFSETS: [i32; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
    let month = date.month.clamp(1, 12);
    let year = if month < 3 { date.year - 1 } else { date.year };
    let sum = year + year.div_euclid(4) - year.div_euclid(100)
        + year.div_euclid(400)
        + OFFSETS[(month - 1) as usize]
        + date.day as i32;
    sum.rem_euclid(7) as u8
}

pub const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub const fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// `nth` Sunday (1-based) of a month.
pub fn nth_sunday(year: i32, month: u8, nth: u8) -> CivilDate {
    let first = day_of_week(CivilDate::new(year, month, 1));
    let first_sunday = 1 + (7 - first) % 7;
    CivilDate::new(year, month, first_sunday + 7 * nth.saturating_sub(1))
}

pub fn last_sunday(year: i32, month: u8) -> CivilDate {
    let last_day = days_in_month(year, month);
    let weekday = day_of_week(CivilDate::new(year, month, last_day));
    CivilDate::new(year, month, last_day - weekday)
}
