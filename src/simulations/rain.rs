use super::{SimRng, Simulation, wrap};
use crate::render::{Canvas, ColorMode, Dimensions, mix};
use rand::RngExt;

pub const COUNT: usize = 120;

/// Horizontal drift per unit of fall
const SLANT: f64 = 0.25;

const MARGIN: f64 = 10.0;

struct Raindrop {
    x: f64,
    y: f64,
    speed: f64,
    length: f64,
    /// 0.0 = far back, 1.0 = foreground
    depth: f64,
}

/// Slanted rain at several depths; near drops are longer, faster and brighter
pub struct Rain {
    dims: Dimensions,
    drops: Vec<Raindrop>,
}

impl Rain {
    pub fn new(dims: Dimensions, rng: &mut SimRng) -> Self {
        let drops = (0..COUNT)
            .map(|_| {
                let depth = rng.random_range(0.0..1.0);
                Raindrop {
                    x: rng.random_range(0.0..dims.w()),
                    y: rng.random_range(0.0..dims.h()),
                    speed: 3.0 + depth * 4.0,
                    length: 3.0 + depth * 5.0,
                    depth,
                }
            })
            .collect();
        Rain { dims, drops }
    }
}

impl Simulation for Rain {
    fn name(&self) -> &'static str {
        "rain"
    }

    fn advance(&mut self, canvas: &mut Canvas, mode: ColorMode, _rng: &mut SimRng) {
        let far = mode.pick((150, 160, 185), (50, 65, 100));
        let near = mode.pick((60, 85, 140), (150, 180, 230));

        for drop in &mut self.drops {
            drop.x = wrap(drop.x + drop.speed * SLANT, self.dims.w(), MARGIN);
            drop.y = wrap(drop.y + drop.speed, self.dims.h(), MARGIN);

            let color = mix(far, near, drop.depth);
            canvas.line(
                drop.x - SLANT * drop.length,
                drop.y - drop.length,
                drop.x,
                drop.y,
                color,
                0.3 + 0.6 * drop.depth,
            );
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
