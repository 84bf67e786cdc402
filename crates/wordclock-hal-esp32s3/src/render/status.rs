use core::fmt::Write;

use embedded_graphics::{
    Drawable,
    draw_target::DrawTarget,
    mono_font::{
        MonoTextStyle,
        ascii::{FONT_6X10, FONT_10X20},
    },
    pixelcolor::Rgb565,
    prelude::{Point, Primitive, RgbColor, Size},
    primitives::{Circle, Line, PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use heapless::String;
use wordclock_core::{
    render::{NetworkView, Screen, SettingRowView, SettingValue},
    time::SyncStatus,
};

pub const WIDTH: u32 = 240;
pub const HEIGHT: u32 = 135;

const MARGIN_X: i32 = 10;
const LARGE_CHARS: usize = ((WIDTH as i32 - 2 * MARGIN_X) / 10) as usize;
const SMALL_CHARS: usize = ((WIDTH as i32 - 2 * MARGIN_X) / 6) as usize;
const LINE_BYTES: usize = 48;

type Line48 = String<LINE_BYTES>;

/// Draws app screens on the 240x135 landscape TFT.
#[derive(Debug)]
pub struct StatusDisplay<D> {
    target: D,
}

impl<D> StatusDisplay<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub fn new(target: D) -> Self {
        Self { target }
    }

    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    pub fn draw(&mut self, screen: Screen<'_>) -> Result<(), D::Error> {
        self.target.clear(Rgb565::BLACK)?;

        match screen {
            Screen::Logo { title, version } => {
                self.large(title, Point::new(30, 10), Rgb565::WHITE)?;
                self.clock_glyph(Point::new(120, 67), 30)?;
                let mut line = Line48::new();
                let _ = write!(line, "Version {}", version);
                self.small(&line, Point::new(75, 110), Rgb565::WHITE)
            }
            Screen::StartupMessage {
                title,
                line1,
                line2,
            } => {
                self.large(title, Point::new(MARGIN_X, 10), Rgb565::WHITE)?;
                self.small(line1, Point::new(MARGIN_X, 70), Rgb565::WHITE)?;
                self.small(line2, Point::new(MARGIN_X, 85), Rgb565::WHITE)
            }
            Screen::Scanning => {
                self.large("Scanning WiFi", Point::new(MARGIN_X, 40), Rgb565::WHITE)?;
                self.small("Please wait...", Point::new(MARGIN_X, 75), Rgb565::YELLOW)
            }
            Screen::NetworkList {
                network,
                index,
                total,
            } => self.draw_network(network, index, total),
            Screen::NoNetworks => {
                self.large("No networks", Point::new(MARGIN_X, 30), Rgb565::RED)?;
                self.small("C: scan again", Point::new(MARGIN_X, 80), Rgb565::WHITE)
            }
            Screen::PasswordEntry {
                ssid,
                entered,
                candidate,
            } => {
                self.small("Password for", Point::new(MARGIN_X, 8), Rgb565::WHITE)?;
                self.small(ssid, Point::new(MARGIN_X, 22), Rgb565::CYAN)?;
                self.large(tail(entered, LARGE_CHARS - 2), Point::new(MARGIN_X, 45), Rgb565::WHITE)?;

                let mut pick = Line48::new();
                let _ = write!(pick, "[{}]", candidate);
                self.large(&pick, Point::new(MARGIN_X, 75), Rgb565::YELLOW)?;
                self.small("A: next  B: add  C: connect", Point::new(MARGIN_X, 115), Rgb565::WHITE)
            }
            Screen::Connecting { ssid } => {
                self.large("Connecting", Point::new(MARGIN_X, 30), Rgb565::YELLOW)?;
                self.small(ssid, Point::new(MARGIN_X, 70), Rgb565::WHITE)
            }
            Screen::ConnectSuccess { ssid, address } => {
                self.large("Connected!", Point::new(MARGIN_X, 20), Rgb565::GREEN)?;
                self.small(ssid, Point::new(MARGIN_X, 60), Rgb565::WHITE)?;
                let mut line = Line48::new();
                let _ = write!(line, "IP: {}", address);
                self.small(&line, Point::new(MARGIN_X, 78), Rgb565::WHITE)?;
                self.small("Press any button", Point::new(MARGIN_X, 110), Rgb565::WHITE)
            }
            Screen::ConnectFailure { ssid } => {
                self.large("Connect failed", Point::new(MARGIN_X, 20), Rgb565::RED)?;
                self.small(ssid, Point::new(MARGIN_X, 60), Rgb565::WHITE)?;
                self.small(
                    "A: retry  B: password  C: list",
                    Point::new(MARGIN_X, 110),
                    Rgb565::WHITE,
                )
            }
            Screen::Settings {
                rows,
                cursor,
                first_run,
            } => self.draw_settings(rows, cursor, first_run),
            Screen::TimeSyncing => {
                self.large("Syncing time", Point::new(MARGIN_X, 40), Rgb565::YELLOW)?;
                self.small("Contacting NTP server...", Point::new(MARGIN_X, 75), Rgb565::WHITE)
            }
            Screen::ClockFace {
                time,
                date,
                zone,
                status,
            } => {
                self.large(time, Point::new(60, 25), Rgb565::WHITE)?;
                self.small(date, Point::new(90, 60), Rgb565::WHITE)?;
                self.small(zone, Point::new(MARGIN_X, 95), Rgb565::CYAN)?;
                self.small(status.label(), Point::new(MARGIN_X, 115), status_color(status))
            }
            Screen::WordClockStatus {
                time,
                phrase,
                status,
                brightness_percent,
            } => {
                self.large("Word clock", Point::new(MARGIN_X, 8), Rgb565::WHITE)?;
                self.small(phrase, Point::new(MARGIN_X, 45), Rgb565::YELLOW)?;
                self.small(time, Point::new(MARGIN_X, 65), Rgb565::WHITE)?;
                let mut line = Line48::new();
                let _ = write!(line, "Brightness: {}%", brightness_percent);
                self.small(&line, Point::new(MARGIN_X, 95), Rgb565::WHITE)?;
                self.small(status.label(), Point::new(MARGIN_X, 115), status_color(status))
            }
        }
    }

    fn draw_network(
        &mut self,
        network: NetworkView<'_>,
        index: usize,
        total: usize,
    ) -> Result<(), D::Error> {
        let mut counter = Line48::new();
        let _ = write!(counter, "Network {}/{}", index + 1, total);
        self.small(&counter, Point::new(MARGIN_X, 8), Rgb565::WHITE)?;
        self.large(network.ssid, Point::new(MARGIN_X, 30), Rgb565::CYAN)?;

        let mut detail = Line48::new();
        let _ = write!(
            detail,
            "{} dBm  {}",
            network.rssi,
            network.security.label()
        );
        self.small(&detail, Point::new(MARGIN_X, 65), Rgb565::WHITE)?;
        self.signal_bars(network.signal_bars, Point::new(190, 62))?;
        self.small("A: next  B: select  C: rescan", Point::new(MARGIN_X, 115), Rgb565::WHITE)
    }

    fn draw_settings(
        &mut self,
        rows: &[SettingRowView<'_>],
        cursor: usize,
        first_run: bool,
    ) -> Result<(), D::Error> {
        let title = if first_run { "Setup" } else { "Settings" };
        self.large(title, Point::new(MARGIN_X, 4), Rgb565::WHITE)?;

        for (i, row) in rows.iter().enumerate() {
            let selected = i == cursor;
            let mut line = Line48::new();
            let marker = if selected { '>' } else { ' ' };
            let _ = match row.value {
                SettingValue::Label(value) => write!(line, "{} {}: {}", marker, row.key, value),
                SettingValue::Percent(value) => write!(line, "{} {}: {}%", marker, row.key, value),
                SettingValue::Action(label) => write!(line, "{} {}", marker, label),
            };
            let color = if selected { Rgb565::YELLOW } else { Rgb565::WHITE };
            self.small(&line, Point::new(MARGIN_X, 32 + 18 * i as i32), color)?;
        }

        self.small("A: next  B: change  C: cancel", Point::new(MARGIN_X, 122), Rgb565::WHITE)
    }

    fn large(&mut self, text: &str, at: Point, color: Rgb565) -> Result<(), D::Error> {
        let style = MonoTextStyle::new(&FONT_10X20, color);
        Text::with_baseline(fit(text, LARGE_CHARS), at, style, Baseline::Top)
            .draw(&mut self.target)?;
        Ok(())
    }

    fn small(&mut self, text: &str, at: Point, color: Rgb565) -> Result<(), D::Error> {
        let style = MonoTextStyle::new(&FONT_6X10, color);
        Text::with_baseline(fit(text, SMALL_CHARS), at, style, Baseline::Top)
            .draw(&mut self.target)?;
        Ok(())
    }

    fn signal_bars(&mut self, bars: u8, origin: Point) -> Result<(), D::Error> {
        for i in 0..4u8 {
            let color = if i < bars { Rgb565::GREEN } else { Rgb565::RED };
            let height = (i as u32 + 1) * 3;
            Rectangle::new(
                Point::new(origin.x + i as i32 * 8, origin.y + 12 - height as i32),
                Size::new(6, height),
            )
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(&mut self.target)?;
        }
        Ok(())
    }

    fn clock_glyph(&mut self, center: Point, radius: u32) -> Result<(), D::Error> {
        let outline = PrimitiveStyle::with_stroke(Rgb565::WHITE, 2);
        Circle::with_center(center, radius * 2)
            .into_styled(outline)
            .draw(&mut self.target)?;
        Line::new(center, center - Point::new(0, 15))
            .into_styled(PrimitiveStyle::with_stroke(Rgb565::WHITE, 3))
            .draw(&mut self.target)?;
        Line::new(center, center - Point::new(0, 25))
            .into_styled(PrimitiveStyle::with_stroke(Rgb565::WHITE, 1))
            .draw(&mut self.target)?;
        Circle::with_center(center, 5)
            .into_styled(PrimitiveStyle::with_fill(Rgb565::WHITE))
            .draw(&mut self.target)?;
        Ok(())
    }
}

fn status_color(status: SyncStatus) -> Rgb565 {
    match status {
        SyncStatus::Success => Rgb565::GREEN,
        SyncStatus::Failed => Rgb565::RED,
        SyncStatus::Syncing => Rgb565::YELLOW,
        SyncStatus::NotSynced => Rgb565::WHITE,
    }
}

/// Longest prefix of at most `max_chars` characters.
fn fit(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Longest suffix of at most `max_chars` characters.
fn tail(text: &str, max_chars: usize) -> &str {
    let count = text.chars().count();
    if count <= max_chars {
        return text;
    }
    match text.char_indices().nth(count - max_chars) {
        Some((start, _)) => &text[start..],
        None => text,
    }
}
