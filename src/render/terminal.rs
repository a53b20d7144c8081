use crossterm::style::Color;
use serde::Deserialize;

use super::canvas::{Canvas, Dimensions, Rgb};

/// How terminal cells map onto canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    /// Unicode braille characters (2x4 pixels per cell)
    Braille,
    /// Half-block characters (1x2 pixels per cell, full color per pixel)
    #[default]
    HalfBlock,
}

impl RenderMode {
    /// Canvas size for a grid of `cols` x `rows` terminal cells.
    pub fn pixel_dimensions(self, cols: usize, rows: usize) -> Dimensions {
        match self {
            RenderMode::Braille => Dimensions::new(cols * 2, rows * 4),
            RenderMode::HalfBlock => Dimensions::new(cols, rows * 2),
        }
    }

    pub fn next(self) -> Self {
        match self {
            RenderMode::HalfBlock => RenderMode::Braille,
            RenderMode::Braille => RenderMode::HalfBlock,
        }
    }
}

/// Terminal color capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorDepth {
    /// No color
    Mono,
    /// ANSI 16 colors
    Ansi16,
    /// 256-color palette
    Ansi256,
    /// 24-bit RGB
    #[default]
    TrueColor,
}

impl ColorDepth {
    pub fn next(self) -> Self {
        match self {
            ColorDepth::TrueColor => ColorDepth::Ansi256,
            ColorDepth::Ansi256 => ColorDepth::Ansi16,
            ColorDepth::Ansi16 => ColorDepth::Mono,
            ColorDepth::Mono => ColorDepth::TrueColor,
        }
    }

    /// Nearest terminal color for `rgb` at this depth.
    pub fn map(self, (r, g, b): Rgb) -> Color {
        match self {
            ColorDepth::Mono => Color::Reset,
            ColorDepth::TrueColor => Color::Rgb { r, g, b },
            ColorDepth::Ansi256 => {
                // 6x6x6 cube starting at index 16
                let level = |c: u8| (c as u16 * 5 + 127) / 255;
                Color::AnsiValue((16 + 36 * level(r) + 6 * level(g) + level(b)) as u8)
            }
            ColorDepth::Ansi16 => ANSI16
                .iter()
                .min_by_key(|(_, p)| super::color::distance(*p, (r, g, b)))
                .map(|(c, _)| *c)
                .unwrap_or(Color::Reset),
        }
    }
}

const ANSI16: [(Color, Rgb); 16] = [
    (Color::Black, (0, 0, 0)),
    (Color::DarkRed, (128, 0, 0)),
    (Color::DarkGreen, (0, 128, 0)),
    (Color::DarkYellow, (128, 128, 0)),
    (Color::DarkBlue, (0, 0, 128)),
    (Color::DarkMagenta, (128, 0, 128)),
    (Color::DarkCyan, (0, 128, 128)),
    (Color::Grey, (192, 192, 192)),
    (Color::DarkGrey, (128, 128, 128)),
    (Color::Red, (255, 0, 0)),
    (Color::Green, (0, 255, 0)),
    (Color::Yellow, (255, 255, 0)),
    (Color::Blue, (0, 0, 255)),
    (Color::Magenta, (255, 0, 255)),
    (Color::Cyan, (0, 255, 255)),
    (Color::White, (255, 255, 255)),
];

#[derive(Clone, Copy)]
pub(super) enum Layer {
    Fg,
    Bg,
}

/// SGR parameters selecting `color` as foreground or background.
pub(super) fn sgr(color: Color, layer: Layer) -> String {
    let (ext, base, bright) = match layer {
        Layer::Fg => (38, 30, 90),
        Layer::Bg => (48, 40, 100),
    };
    let named = |offset: u8, is_bright: bool| {
        let start = if is_bright { bright } else { base };
        (start + offset).to_string()
    };
    match color {
        Color::Rgb { r, g, b } => format!("{ext};2;{r};{g};{b}"),
        Color::AnsiValue(v) => format!("{ext};5;{v}"),
        Color::Black => named(0, false),
        Color::DarkRed => named(1, false),
        Color::DarkGreen => named(2, false),
        Color::DarkYellow => named(3, false),
        Color::DarkBlue => named(4, false),
        Color::DarkMagenta => named(5, false),
        Color::DarkCyan => named(6, false),
        Color::Grey => named(7, false),
        Color::DarkGrey => named(0, true),
        Color::Red => named(1, true),
        Color::Green => named(2, true),
        Color::Yellow => named(3, true),
        Color::Blue => named(4, true),
        Color::Magenta => named(5, true),
        Color::Cyan => named(6, true),
        Color::White => named(7, true),
        _ => match layer {
            Layer::Fg => "39".into(),
            Layer::Bg => "49".into(),
        },
    }
}

/// Writes SGR sequences only when the active colors change.
pub(super) struct SgrWriter {
    fg: String,
    bg: String,
}

impl SgrWriter {
    pub(super) fn new() -> Self {
        SgrWriter {
            fg: String::new(),
            bg: String::new(),
        }
    }

    pub(super) fn set(&mut self, out: &mut String, fg: String, bg: String) {
        let fg_changed = fg != self.fg;
        let bg_changed = bg != self.bg;
        if !fg_changed && !bg_changed {
            return;
        }
        out.push_str("\x1b[");
        match (fg_changed, bg_changed) {
            (true, true) => {
                out.push_str(&fg);
                out.push(';');
                out.push_str(&bg);
            }
            (true, false) => out.push_str(&fg),
            _ => out.push_str(&bg),
        }
        out.push('m');
        self.fg = fg;
        self.bg = bg;
    }

    /// Reset attributes and move to the start of terminal row `next_row` (0-based).
    pub(super) fn end_row(&mut self, out: &mut String, next_row: usize) {
        if !self.fg.is_empty() || !self.bg.is_empty() {
            out.push_str("\x1b[0m");
            self.fg.clear();
            self.bg.clear();
        }
        out.push_str(&format!("\x1b[{};1H", next_row + 1));
    }
}

/// Encode the whole canvas as a terminal frame starting at the cursor home.
pub fn encode(canvas: &Canvas, mode: RenderMode, depth: ColorDepth) -> String {
    match mode {
        RenderMode::Braille => super::braille::encode(canvas, depth),
        RenderMode::HalfBlock => super::halfblock::encode(canvas, depth),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_dimensions_per_mode() {
        assert_eq!(RenderMode::Braille.pixel_dimensions(80, 24), Dimensions::new(160, 96));
        assert_eq!(RenderMode::HalfBlock.pixel_dimensions(80, 24), Dimensions::new(80, 48));
    }

    #[test]
    fn ansi256_cube_corners() {
        assert_eq!(ColorDepth::Ansi256.map((0, 0, 0)), Color::AnsiValue(16));
        assert_eq!(ColorDepth::Ansi256.map((255, 255, 255)), Color::AnsiValue(231));
        assert_eq!(ColorDepth::Ansi256.map((255, 0, 0)), Color::AnsiValue(196));
    }

    #[test]
    fn ansi16_picks_nearest() {
        assert_eq!(ColorDepth::Ansi16.map((250, 10, 5)), Color::Red);
        assert_eq!(ColorDepth::Ansi16.map((5, 5, 5)), Color::Black);
        assert_eq!(ColorDepth::Ansi16.map((240, 240, 250)), Color::White);
    }

    #[test]
    fn sgr_layers() {
        assert_eq!(sgr(Color::Rgb { r: 1, g: 2, b: 3 }, Layer::Fg), "38;2;1;2;3");
        assert_eq!(sgr(Color::AnsiValue(42), Layer::Bg), "48;5;42");
        assert_eq!(sgr(Color::Red, Layer::Fg), "91");
        assert_eq!(sgr(Color::DarkBlue, Layer::Bg), "44");
    }

    #[test]
    fn sgr_writer_skips_repeats() {
        let mut out = String::new();
        let mut w = SgrWriter::new();
        w.set(&mut out, "31".into(), "40".into());
        w.set(&mut out, "31".into(), "40".into());
        assert_eq!(out, "\x1b[31;40m");
        w.set(&mut out, "32".into(), "40".into());
        assert_eq!(out, "\x1b[31;40m\x1b[32m");
    }

    #[test]
    fn depth_and_mode_cycles_return_to_start() {
        let mut d = ColorDepth::TrueColor;
        for _ in 0..4 {
            d = d.next();
        }
        assert_eq!(d, ColorDepth::TrueColor);
        assert_eq!(RenderMode::Braille.next().next(), RenderMode::Braille);
    }
}
