use super::{SimRng, Simulation, wrap};
use crate::render::{Canvas, ColorMode, Dimensions, mix};
use rand::RngExt;

pub const COUNT: usize = 64;

/// Longest trail. Drops wrap to the top once the whole trail has left.
const MARGIN: f64 = 24.0;

struct Drop {
    x: f64,
    y: f64,
    speed: f64,
    length: f64,
}

/// Matrix digital rain
pub struct Matrix {
    dims: Dimensions,
    drops: Vec<Drop>,
}

impl Matrix {
    pub fn new(dims: Dimensions, rng: &mut SimRng) -> Self {
        let columns = (dims.width / 2).max(1);
        let drops = (0..COUNT)
            .map(|_| Drop {
                x: (rng.random_range(0..columns) * 2) as f64,
                y: rng.random_range(0.0..dims.h()),
                speed: rng.random_range(0.5..2.5),
                length: rng.random_range(6.0..MARGIN),
            })
            .collect();
        Matrix { dims, drops }
    }
}

impl Simulation for Matrix {
    fn name(&self) -> &'static str {
        "matrix"
    }

    fn advance(&mut self, canvas: &mut Canvas, mode: ColorMode, _rng: &mut SimRng) {
        let trail = mode.tint(125.0, 85.0);
        let head = mode.pick((10, 70, 20), (210, 255, 210));

        for drop in &mut self.drops {
            drop.y = wrap(drop.y + drop.speed, self.dims.h(), MARGIN);

            let steps = drop.length as usize;
            for i in 1..steps {
                let fade = 1.0 - i as f64 / drop.length;
                // Every other pixel darker, to read as glyph rows
                let color = if i % 2 == 0 { trail } else { mix(trail, canvas.background, 0.35) };
                canvas.plot(drop.x, drop.y - i as f64, color, fade * fade);
            }
            canvas.plot(drop.x, drop.y, head, 1.0);
        }
    }

    fn record_count(&self) -> usize {
        self.drops.len()
    }

    #[cfg(test)]
    fn positions(&self) -> Vec<(f64, f64)> {
        self.drops.iter().map(|d| (d.x, d.y)).collect()
    }

    #[cfg(test)]
    fn overflow_margin(&self) -> f64 {
        MARGIN
    }
}
