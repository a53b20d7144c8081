use super::{SimRng, Simulation, wrap};
use crate::render::{Canvas, ColorMode, Dimensions};
use rand::RngExt;
use std::f64::consts::TAU;

pub const COUNT: usize = 36;

const MAX_RADIUS: f64 = 4.0;
const MARGIN: f64 = MAX_RADIUS + 2.0;

struct Bubble {
    x: f64,
    y: f64,
    vy: f64,
    radius: f64,
    phase: f64,
    wobble: f64,
    hue: f64,
}

/// Bubbles rising from the bottom and wobbling side to side
pub struct Bubbles {
    dims: Dimensions,
    bubbles: Vec<Bubble>,
}

impl Bubbles {
    pub fn new(dims: Dimensions, rng: &mut SimRng) -> Self {
        let bubbles = (0..COUNT)
            .map(|_| Bubble {
                x: rng.random_range(0.0..dims.w()),
                y: rng.random_range(0.0..dims.h()),
                vy: rng.random_range(-1.0..-0.3),
                radius: rng.random_range(1.0..MAX_RADIUS),
                phase: rng.random_range(0.0..TAU),
                wobble: rng.random_range(0.1..0.5),
                hue: rng.random_range(180.0..210.0),
            })
            .collect();
        Bubbles { dims, bubbles }
    }
}

impl Simulation for Bubbles {
    fn name(&self) -> &'static str {
        "bubbles"
    }

    fn advance(&mut self, canvas: &mut Canvas, mode: ColorMode, _rng: &mut SimRng) {
        let highlight = mode.pick((255, 255, 255), (230, 250, 255));
        for b in &mut self.bubbles {
            b.phase = (b.phase + 0.05) % TAU;
            b.x = wrap(b.x + b.phase.sin() * b.wobble, self.dims.w(), MARGIN);
            // Small bubbles rise slower
            b.y = wrap(b.y + b.vy * (b.radius / MAX_RADIUS + 0.5), self.dims.h(), MARGIN);

            let rim = mode.tint(b.hue, 70.0);
            canvas.ring(b.x, b.y, b.radius, rim, 0.8);
            canvas.plot(b.x - b.radius * 0.4, b.y - b.radius * 0.4, highlight, 0.9);
        }
    }

    fn record_count(&self) -> usize {
        self.bubbles.len()
    }

    #[cfg(test)]
    fn positions(&self) -> Vec<(f64, f64)> {
        self.bubbles.iter().map(|b| (b.x, b.y)).collect()
    }

    #[cfg(test)]
    fn overflow_margin(&self) -> f64 {
        MARGIN
    }
}
