use super::{SimRng, Simulation, wrap};
use crate::render::{Canvas, ColorMode, Dimensions, hsl};
use rand::RngExt;
use std::f64::consts::TAU;

pub const COUNT: usize = 45;

const MARGIN: f64 = 4.0;

struct Leaf {
    x: f64,
    y: f64,
    vy: f64,
    sway_phase: f64,
    sway_amp: f64,
    sway_speed: f64,
    size: f64,
    hue: f64,
}

/// Leaves swaying down through the canopy
pub struct Forest {
    dims: Dimensions,
    leaves: Vec<Leaf>,
}

impl Forest {
    pub fn new(dims: Dimensions, rng: &mut SimRng) -> Self {
        let leaves = (0..COUNT)
            .map(|_| Leaf {
                x: rng.random_range(0.0..dims.w()),
                y: rng.random_range(0.0..dims.h()),
                vy: rng.random_range(0.3..1.0),
                sway_phase: rng.random_range(0.0..TAU),
                sway_amp: rng.random_range(0.3..1.2),
                sway_speed: rng.random_range(0.02..0.06),
                size: rng.random_range(1.0..2.5),
                // Greens with the odd autumn leaf
                hue: if rng.random_bool(0.2) {
                    rng.random_range(20.0..45.0)
                } else {
                    rng.random_range(80.0..140.0)
                },
            })
            .collect();
        Forest { dims, leaves }
    }
}

impl Simulation for Forest {
    fn name(&self) -> &'static str {
        "forest"
    }

    fn advance(&mut self, canvas: &mut Canvas, mode: ColorMode, _rng: &mut SimRng) {
        for leaf in &mut self.leaves {
            leaf.sway_phase = (leaf.sway_phase + leaf.sway_speed) % TAU;
            let sway = leaf.sway_phase.sin() * leaf.sway_amp;
            leaf.x = wrap(leaf.x + sway, self.dims.w(), MARGIN);
            // Leaves fall slower at the turning points of their sway
            let drift = leaf.vy * (0.5 + 0.5 * leaf.sway_phase.cos().abs());
            leaf.y = wrap(leaf.y + drift, self.dims.h(), MARGIN);

            let color = hsl(leaf.hue, 60.0, mode.lightness() - 10.0);
            canvas.disc(leaf.x, leaf.y, leaf.size, color, 0.85);
        }
    }

    fn record_count(&self) -> usize {
        self.leaves.len()
    }

    #[cfg(test)]
    fn positions(&self) -> Vec<(f64, f64)> {
        self.leaves.iter().map(|l| (l.x, l.y)).collect()
    }

    #[cfg(test)]
    fn overflow_margin(&self) -> f64 {
        MARGIN
    }
}
