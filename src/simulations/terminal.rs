use super::{SimRng, Simulation};
use crate::render::{Canvas, ColorMode, Dimensions};
use rand::RngExt;

pub const COUNT: usize = 32;

const MARGIN: f64 = 10.0;

/// Left edge of each indentation level, as a fraction of the width
const INDENTS: [f64; 5] = [0.04, 0.08, 0.12, 0.16, 0.2];

/// Keyword, string, number, comment, identifier
const SYNTAX_HUES: [f64; 5] = [290.0, 95.0, 30.0, 210.0, 185.0];

struct Token {
    x: f64,
    y: f64,
    width: f64,
    vy: f64,
    hue: f64,
    life: u32,
    max_life: u32,
}

/// Syntax-highlighted code lines scrolling upward like a busy editor
pub struct Terminal {
    dims: Dimensions,
    tokens: Vec<Token>,
    /// Tokens emitted since initialization, including the first batch
    emitted: u64,
}

/// A new line of code. `line` picks the indentation, so consecutive lines
/// step in and out like nested blocks.
fn token(dims: Dimensions, rng: &mut SimRng, y: f64, line: u64) -> Token {
    let indent = INDENTS[(line % INDENTS.len() as u64) as usize];
    let life = rng.random_range(120..400u32);
    Token {
        x: dims.w() * indent,
        y,
        width: dims.w() * rng.random_range(0.08..0.4),
        vy: rng.random_range(-0.8..-0.3),
        hue: SYNTAX_HUES[rng.random_range(0..SYNTAX_HUES.len())],
        life,
        max_life: life,
    }
}

impl Terminal {
    pub fn new(dims: Dimensions, rng: &mut SimRng) -> Self {
        let tokens = (0..COUNT)
            .map(|i| {
                let y = rng.random_range(0.0..dims.h());
                token(dims, rng, y, i as u64)
            })
            .collect();
        Terminal {
            dims,
            tokens,
            emitted: COUNT as u64,
        }
    }

    #[cfg(test)]
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl Simulation for Terminal {
    fn name(&self) -> &'static str {
        "terminal"
    }

    fn advance(&mut self, canvas: &mut Canvas, mode: ColorMode, rng: &mut SimRng) {
        for t in &mut self.tokens {
            t.y += t.vy;
            t.life = t.life.saturating_sub(1);

            if t.life == 0 || t.y < -MARGIN {
                let y = self.dims.h() + rng.random_range(0.0..4.0);
                *t = token(self.dims, rng, y, self.emitted);
                self.emitted += 1;
                continue;
            }

            // Fade in at birth and out near expiry
            let age = t.max_life - t.life;
            let alpha = (age.min(t.life) as f64 / 30.0).min(1.0) * 0.85;
            let color = mode.tint(t.hue, 70.0);
            canvas.line(t.x, t.y, t.x + t.width, t.y, color, alpha);
        }
    }

    fn record_count(&self) -> usize {
        self.tokens.len()
    }

    #[cfg(test)]
    fn positions(&self) -> Vec<(f64, f64)> {
        self.tokens.iter().map(|t| (t.x, t.y)).collect()
    }

    #[cfg(test)]
    fn overflow_margin(&self) -> f64 {
        MARGIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn emitted_counter_lives_in_state() {
        let dims = Dimensions::new(120, 60);
        let mut rng = SimRng::seed_from_u64(5);
        let mut canvas = Canvas::new(dims);
        let mut first = Terminal::new(dims, &mut rng);
        for _ in 0..500 {
            first.advance(&mut canvas, ColorMode::Dark, &mut rng);
        }
        assert!(first.emitted() > COUNT as u64);

        // A fresh instance starts counting from scratch
        let second = Terminal::new(dims, &mut rng);
        assert_eq!(second.emitted(), COUNT as u64);
        assert_eq!(first.record_count(), second.record_count());
    }
}
