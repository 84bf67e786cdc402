pub mod matrix;
pub mod status;

use core::fmt::Debug;

use embedded_graphics::{draw_target::DrawTarget, pixelcolor::Rgb565};
use log::{info, warn};
use smart_leds::{RGB8, SmartLedsWrite};
use wordclock_core::render::{MatrixFrame, Renderer, Screen};

use matrix::LedMatrix;
use status::StatusDisplay;

/// TFT plus LED matrix behind the app's renderer seam.
///
/// Draw errors are logged once per device and otherwise dropped.
#[derive(Debug)]
pub struct BoardRenderer<D, W> {
    display: StatusDisplay<D>,
    matrix: LedMatrix<W>,
    display_fault_logged: bool,
    matrix_fault_logged: bool,
    first_flush_logged: bool,
}

impl<D, W> BoardRenderer<D, W>
where
    D: DrawTarget<Color = Rgb565>,
    D::Error: Debug,
    W: SmartLedsWrite<Color = RGB8>,
    W::Error: Debug,
{
    pub fn new(display: StatusDisplay<D>, matrix: LedMatrix<W>) -> Self {
        Self {
            display,
            matrix,
            display_fault_logged: false,
            matrix_fault_logged: false,
            first_flush_logged: false,
        }
    }

    pub fn display_mut(&mut self) -> &mut StatusDisplay<D> {
        &mut self.display
    }
}

impl<D, W> Renderer for BoardRenderer<D, W>
where
    D: DrawTarget<Color = Rgb565>,
    D::Error: Debug,
    W: SmartLedsWrite<Color = RGB8>,
    W::Error: Debug,
{
    fn show(&mut self, screen: Screen<'_>) {
        match self.display.draw(screen) {
            Ok(()) if !self.first_flush_logged => {
                info!("display: first draw ok");
                self.first_flush_logged = true;
            }
            Ok(()) => {}
            Err(err) if !self.display_fault_logged => {
                warn!("display: draw failed err={:?}", err);
                self.display_fault_logged = true;
            }
            Err(_) => {}
        }
    }

    fn illuminate(&mut self, frame: MatrixFrame) {
        if let Err(err) = self.matrix.show(frame)
            && !self.matrix_fault_logged
        {
            warn!("matrix: write failed err={:?}", err);
            self.matrix_fault_logged = true;
        }
    }
}
