use smart_leds::{RGB8, SmartLedsWrite, brightness};
use wordclock_core::{
    render::MatrixFrame,
    wordclock::{CELL_COUNT, GRID_SIZE, cell_color},
};

/// Physical chain order of the 8x8 panel.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ChainLayout {
    /// Every row runs left to right.
    #[default]
    Progressive,
    /// Odd rows run right to left.
    Serpentine,
}

impl ChainLayout {
    const fn cell_for_led(self, led: u8) -> u8 {
        let row = led / GRID_SIZE;
        let col = led % GRID_SIZE;
        match self {
            Self::Serpentine if row % 2 == 1 => row * GRID_SIZE + (GRID_SIZE - 1 - col),
            _ => led,
        }
    }
}

/// Word-clock LED panel on a WS2812-style chain.
#[derive(Debug)]
pub struct LedMatrix<W> {
    writer: W,
    layout: ChainLayout,
}

impl<W> LedMatrix<W>
where
    W: SmartLedsWrite<Color = RGB8>,
{
    pub fn new(writer: W, layout: ChainLayout) -> Self {
        Self { writer, layout }
    }

    pub fn show(&mut self, frame: MatrixFrame) -> Result<(), W::Error> {
        let pixels = frame_pixels(frame, self.layout);
        self.writer
            .write(brightness(pixels.iter().copied(), frame.brightness))
    }

    pub fn blank(&mut self) -> Result<(), W::Error> {
        self.show(MatrixFrame::BLANK)
    }
}

/// Full-scale colours in chain order; unlit cells are black.
pub fn frame_pixels(frame: MatrixFrame, layout: ChainLayout) -> [RGB8; CELL_COUNT as usize] {
    let mut pixels = [RGB8::default(); CELL_COUNT as usize];
    for (led, pixel) in pixels.iter_mut().enumerate() {
        let cell = layout.cell_for_led(led as u8);
        if frame.mask.is_lit(cell) {
            let [r, g, b] = cell_color(cell, frame.phase);
            *pixel = RGB8::new(r, g, b);
        }
    }
    pixels
}
