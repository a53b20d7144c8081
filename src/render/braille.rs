use super::canvas::Canvas;
use super::color::distance;
use super::terminal::{ColorDepth, Layer, SgrWriter, sgr};

/// Braille dot bits for each (dx, dy) inside a 2x4 cell, in Unicode order:
/// dots 1-3 and 7 on the left column, 4-6 and 8 on the right.
const DOTS: [(usize, usize, u32); 8] = [
    (0, 0, 0x01),
    (0, 1, 0x02),
    (0, 2, 0x04),
    (1, 0, 0x08),
    (1, 1, 0x10),
    (1, 2, 0x20),
    (0, 3, 0x40),
    (1, 3, 0x80),
];

const BLANK: u32 = 0x2800;

/// Channel distance from the background above which a dot is raised.
const LIT_THRESHOLD: u32 = 48;

pub fn encode(canvas: &Canvas, depth: ColorDepth) -> String {
    let cols = canvas.width / 2;
    let rows = canvas.height / 4;
    let mut out = String::with_capacity(cols * rows * 24);
    let mut writer = SgrWriter::new();
    let bg = sgr(depth.map(canvas.background), Layer::Bg);

    for row in 0..rows {
        for col in 0..cols {
            let mut bits = 0u32;
            let mut sum = [0u32; 3];
            let mut lit = 0u32;

            for &(dx, dy, bit) in &DOTS {
                let Some(p) = canvas.get(col * 2 + dx, row * 4 + dy) else {
                    continue;
                };
                if distance(p, canvas.background) > LIT_THRESHOLD {
                    bits |= bit;
                    sum[0] += p.0 as u32;
                    sum[1] += p.1 as u32;
                    sum[2] += p.2 as u32;
                    lit += 1;
                }
            }

            let ch = char::from_u32(BLANK + bits).unwrap_or(' ');
            if depth != ColorDepth::Mono {
                let fg = if lit > 0 {
                    let avg = ((sum[0] / lit) as u8, (sum[1] / lit) as u8, (sum[2] / lit) as u8);
                    sgr(depth.map(avg), Layer::Fg)
                } else {
                    sgr(depth.map(canvas.background), Layer::Fg)
                };
                writer.set(&mut out, fg, bg.clone());
            }
            out.push(ch);
        }
        writer.end_row(&mut out, row + 1);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Dimensions;

    #[test]
    fn empty_canvas_is_blank_braille() {
        let mut canvas = Canvas::new(Dimensions::new(4, 4));
        canvas.clear((0, 0, 0));
        let out = encode(&canvas, ColorDepth::Mono);
        assert!(out.starts_with("\u{2800}\u{2800}"));
    }

    #[test]
    fn corner_dots_map_to_unicode_bits() {
        let mut canvas = Canvas::new(Dimensions::new(2, 4));
        canvas.clear((0, 0, 0));
        canvas.blend(0, 0, (255, 255, 255), 1.0);
        canvas.blend(1, 3, (255, 255, 255), 1.0);
        let out = encode(&canvas, ColorDepth::Mono);
        assert!(out.starts_with('\u{2881}'));
    }

    #[test]
    fn lit_cells_use_average_color() {
        let mut canvas = Canvas::new(Dimensions::new(2, 4));
        canvas.clear((0, 0, 0));
        canvas.blend(0, 0, (200, 0, 0), 1.0);
        canvas.blend(1, 0, (100, 0, 0), 1.0);
        let out = encode(&canvas, ColorDepth::TrueColor);
        assert!(out.starts_with("\x1b[38;2;150;0;0;48;2;0;0;0m"));
    }
}
