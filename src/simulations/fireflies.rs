use super::{SimRng, Simulation, wrap};
use crate::render::{Canvas, ColorMode, Dimensions};
use rand::RngExt;
use std::f64::consts::TAU;

pub const COUNT: usize = 40;

struct Firefly {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    phase: f64,
    blink_speed: f64,
    glow_radius: f64,
}

/// Fireflies wandering and blinking
pub struct Fireflies {
    dims: Dimensions,
    flies: Vec<Firefly>,
}

impl Fireflies {
    pub fn new(dims: Dimensions, rng: &mut SimRng) -> Self {
        let flies = (0..COUNT)
            .map(|_| Firefly {
                x: rng.random_range(0.0..dims.w()),
                y: rng.random_range(0.0..dims.h()),
                vx: rng.random_range(-0.3..0.3),
                vy: rng.random_range(-0.3..0.3),
                phase: rng.random_range(0.0..TAU),
                blink_speed: rng.random_range(0.03..0.12),
                glow_radius: rng.random_range(2.0..5.0),
            })
            .collect();
        Fireflies { dims, flies }
    }
}

impl Simulation for Fireflies {
    fn name(&self) -> &'static str {
        "fireflies"
    }

    fn advance(&mut self, canvas: &mut Canvas, mode: ColorMode, rng: &mut SimRng) {
        let color = mode.pick((130, 150, 0), (200, 255, 70));

        for fly in &mut self.flies {
            // Wandering movement
            fly.vx = (fly.vx + rng.random_range(-0.06..0.06)) * 0.98;
            fly.vy = (fly.vy + rng.random_range(-0.06..0.06)) * 0.98;
            fly.x = wrap(fly.x + fly.vx, self.dims.w(), 0.0);
            fly.y = wrap(fly.y + fly.vy, self.dims.h(), 0.0);
            fly.phase = (fly.phase + fly.blink_speed) % TAU;

            // Sharp on/off with a smooth glow while lit
            let blink = (fly.phase.sin() + 0.3).clamp(0.0, 1.0);
            if blink <= 0.6 {
                canvas.plot(fly.x, fly.y, color, 0.15);
                continue;
            }
            let intensity = ((blink - 0.6) / 0.4).clamp(0.0, 1.0);
            canvas.glow(fly.x, fly.y, fly.glow_radius * intensity, color, intensity);
        }
    }

    fn record_count(&self) -> usize {
        self.flies.len()
    }

    #[cfg(test)]
    fn positions(&self) -> Vec<(f64, f64)> {
        self.flies.iter().map(|f| (f.x, f.y)).collect()
    }
}
