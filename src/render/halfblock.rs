use super::canvas::Canvas;
use super::color::distance;
use super::terminal::{ColorDepth, Layer, SgrWriter, sgr};

/// Channel distance from the background below which a pixel counts as empty
/// in mono output.
const MONO_THRESHOLD: u32 = 60;

/// Each cell shows two vertically stacked pixels: `▀` with the top pixel as
/// foreground and the bottom pixel as background.
pub fn encode(canvas: &Canvas, depth: ColorDepth) -> String {
    let cols = canvas.width;
    let rows = canvas.height / 2;
    let mut out = String::with_capacity(cols * rows * 24);
    let mut writer = SgrWriter::new();

    for row in 0..rows {
        let top_row = &canvas.pixels[row * 2 * cols..(row * 2 + 1) * cols];
        let bot_row = &canvas.pixels[(row * 2 + 1) * cols..(row * 2 + 2) * cols];

        for (&top, &bot) in top_row.iter().zip(bot_row) {
            if depth == ColorDepth::Mono {
                let top_lit = distance(top, canvas.background) > MONO_THRESHOLD;
                let bot_lit = distance(bot, canvas.background) > MONO_THRESHOLD;
                out.push(match (top_lit, bot_lit) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                });
                continue;
            }
            let fg = sgr(depth.map(top), Layer::Fg);
            let bg = sgr(depth.map(bot), Layer::Bg);
            writer.set(&mut out, fg, bg);
            out.push('▀');
        }
        writer.end_row(&mut out, row + 1);
    }
    out
}
