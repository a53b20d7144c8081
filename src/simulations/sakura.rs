use super::{SimRng, Simulation, wrap};
use crate::render::{Canvas, ColorMode, Dimensions, hsl};
use rand::RngExt;
use std::f64::consts::TAU;

pub const COUNT: usize = 40;

const MARGIN: f64 = 6.0;

struct Petal {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    angle: f64,
    spin: f64,
    size: f64,
    hue: f64,
}

/// Cherry blossom petals tumbling across on the wind
pub struct Sakura {
    dims: Dimensions,
    petals: Vec<Petal>,
}

impl Sakura {
    pub fn new(dims: Dimensions, rng: &mut SimRng) -> Self {
        let petals = (0..COUNT)
            .map(|_| Petal {
                x: rng.random_range(0.0..dims.w()),
                y: rng.random_range(0.0..dims.h()),
                vx: rng.random_range(0.3..1.0),
                vy: rng.random_range(0.2..0.6),
                angle: rng.random_range(0.0..TAU),
                spin: rng.random_range(-0.05..0.05),
                size: rng.random_range(1.5..3.0),
                hue: rng.random_range(330.0..352.0),
            })
            .collect();
        Sakura { dims, petals }
    }
}

impl Simulation for Sakura {
    fn name(&self) -> &'static str {
        "sakura"
    }

    fn advance(&mut self, canvas: &mut Canvas, mode: ColorMode, _rng: &mut SimRng) {
        for p in &mut self.petals {
            p.angle = (p.angle + p.spin).rem_euclid(TAU);
            // Tumbling petals catch more air when flat to the wind
            let lift = p.angle.sin().abs();
            p.x = wrap(p.x + p.vx * (0.6 + lift * 0.4), self.dims.w(), MARGIN);
            p.y = wrap(p.y + p.vy * (1.0 - lift * 0.3), self.dims.h(), MARGIN);

            let color = hsl(p.hue, 80.0, mode.pick(60.0, 80.0));
            let (dx, dy) = (p.angle.cos() * p.size, p.angle.sin() * p.size * 0.5);
            canvas.line(p.x - dx, p.y - dy, p.x + dx, p.y + dy, color, 0.85);
            canvas.disc(p.x, p.y, p.size * 0.4, color, 0.9);
        }
    }

    fn record_count(&self) -> usize {
        self.petals.len()
    }

    #[cfg(test)]
    fn positions(&self) -> Vec<(f64, f64)> {
        self.petals.iter().map(|p| (p.x, p.y)).collect()
    }

    #[cfg(test)]
    fn overflow_margin(&self) -> f64 {
        MARGIN
    }
}
