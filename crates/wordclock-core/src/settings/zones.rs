/// One selectable fixed-offset zone.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimeZoneInfo {
    pub offset_hours: i8,
    pub label: &'static str,
    pub name: &'static str,
}

const fn zone(offset_hours: i8, label: &'static str, name: &'static str) -> TimeZoneInfo {
    TimeZoneInfo {
        offset_hours,
        label,
        name,
    }
}

/// Ordered UTC-12 ... UTC+12.
pub const TIMEZONES: [TimeZoneInfo; 25] = [
    zone(-12, "UTC-12", "Baker Island Time"),
    zone(-11, "UTC-11", "Hawaii-Aleutian Standard Time"),
    zone(-10, "UTC-10", "Hawaii Standard Time"),
    zone(-9, "UTC-9", "Alaska Standard Time"),
    zone(-8, "UTC-8", "Pacific Standard Time"),
    zone(-7, "UTC-7", "Mountain Standard Time"),
    zone(-6, "UTC-6", "Central Standard Time"),
    zone(-5, "UTC-5", "Eastern Standard Time"),
    zone(-4, "UTC-4", "Atlantic Standard Time"),
    zone(-3, "UTC-3", "Argentina Time"),
    zone(-2, "UTC-2", "South Georgia Time"),
    zone(-1, "UTC-1", "Azores Time"),
    zone(0, "UTC+0", "Greenwich Mean Time"),
    zone(1, "UTC+1", "Central European Time"),
    zone(2, "UTC+2", "Eastern European Time"),
    zone(3, "UTC+3", "Moscow Time"),
    zone(4, "UTC+4", "Gulf Standard Time"),
    zone(5, "UTC+5", "Pakistan Standard Time"),
    zone(6, "UTC+6", "Bangladesh Standard Time"),
    zone(7, "UTC+7", "Indochina Time"),
    zone(8, "UTC+8", "China Standard Time"),
    zone(9, "UTC+9", "Japan Standard Time"),
    zone(10, "UTC+10", "Australian Eastern Standard Time"),
    zone(11, "UTC+11", "Solomon Islands Time"),
    zone(12, "UTC+12", "New Zealand Standard Time"),
];

fn lookup(offset_hours: i8) -> Option<&'static TimeZoneInfo> {
    TIMEZONES
        .iter()
        .find(|zone| zone.offset_hours == offset_hours)
}

pub fn timezone_name(offset_hours: i8) -> &'static str {
    lookup(offset_hours).map_or("Unknown", |zone| zone.name)
}

pub fn timezone_label(offset_hours: i8) -> &'static str {
    lookup(offset_hours).map_or("UTC?", |zone| zone.label)
}
