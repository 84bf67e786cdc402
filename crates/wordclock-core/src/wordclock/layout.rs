use heapless::String;

use super::WordMask;

pub const GRID_SIZE: u8 = 8;
pub const CELL_COUNT: u8 = GRID_SIZE * GRID_SIZE;

/// Letter faceplate, top row first.
pub const GRID: [&str; GRID_SIZE as usize] = [
    "ATWENTYD", "QUARTERY", "FIVEHALF", "DPASTORO", "FIVEIGHT", "SIXTHREE", "TWELEVEN", "FOURNINE",
];

pub const fn cell_bit(cell: u8) -> u64 {
    1u64 << (63 - (cell % CELL_COUNT) as u32)
}

pub fn letter_at(cell: u8) -> Option<char> {
    let row = GRID.get((cell / GRID_SIZE) as usize)?;
    row.as_bytes()
        .get((cell % GRID_SIZE) as usize)
        .map(|byte| *byte as char)
}

/// Lit letters in reading order.
pub fn spell(mask: WordMask) -> String<64> {
    let mut text = String::new();
    for letter in mask.lit_cells().filter_map(letter_at) {
        let _ = text.push(letter);
    }
    text
}
