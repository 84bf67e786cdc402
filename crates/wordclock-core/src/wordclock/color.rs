use super::{CELL_COUNT, PHASE_PERIOD};

/// From 23:00 local the matrix runs at half brightness.
pub const NIGHT_START_HOUR: u8 = 23;
pub const DAY_START_HOUR: u8 = 7;

/// Rainbow lookup; 0 is red, 85 green, 170 blue.
pub const fn color_wheel(pos: u8) -> [u8; 3] {
    let pos = 255 - pos;
    if pos < 85 {
        [255 - pos * 3, 0, pos * 3]
    } else if pos < 170 {
        let pos = pos - 85;
        [0, pos * 3, 255 - pos * 3]
    } else {
        let pos = pos - 170;
        [pos * 3, 255 - pos * 3, 0]
    }
}

/// Colour of one matrix cell for an animation phase.
pub const fn cell_color(cell: u8, phase: u16) -> [u8; 3] {
    let spread = (cell as u16 % CELL_COUNT as u16) * (256 / CELL_COUNT as u16);
    let pos = (spread + phase % PHASE_PERIOD) & 0xFF;
    color_wheel(pos as u8)
}

pub const fn is_night_hour(hour: u8) -> bool {
    hour >= NIGHT_START_HOUR || hour < DAY_START_HOUR
}

/// Driver brightness (0..=255) for a user percentage and the current local hour.
pub const fn scheduled_brightness(percent: u8, local_hour: Option<u8>) -> u8 {
    let percent = if percent > 100 { 100 } else { percent };
    let day = (percent as u16 * 255 / 100) as u8;
    match local_hour {
        Some(hour) if is_night_hour(hour) && day > 0 => {
            let night = day / 2;
            if night == 0 { 1 } else { night }
        }
        _ => day,
    }
}
