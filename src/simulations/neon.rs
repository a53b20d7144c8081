use super::{SimRng, Simulation, wrap};
use crate::render::{Canvas, ColorMode, Dimensions, hsl};
use rand::RngExt;

pub const COUNT: usize = 48;

/// Longest streak tail; streaks wrap once fully off-screen.
const MARGIN: f64 = 20.0;

struct Streak {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    length: f64,
    hue: f64,
    hue_speed: f64,
}

/// Neon light streaks drifting diagonally, cycling through the spectrum
pub struct Neon {
    dims: Dimensions,
    streaks: Vec<Streak>,
}

impl Neon {
    pub fn new(dims: Dimensions, rng: &mut SimRng) -> Self {
        let streaks = (0..COUNT)
            .map(|_| {
                let angle = rng.random_range(0.55..1.0f64);
                let speed = rng.random_range(0.6..2.0);
                Streak {
                    x: rng.random_range(0.0..dims.w()),
                    y: rng.random_range(0.0..dims.h()),
                    vx: angle.cos() * speed,
                    vy: angle.sin() * speed,
                    length: rng.random_range(6.0..MARGIN),
                    hue: rng.random_range(0.0..360.0),
                    hue_speed: rng.random_range(0.3..1.5),
                }
            })
            .collect();
        Neon { dims, streaks }
    }
}

impl Simulation for Neon {
    fn name(&self) -> &'static str {
        "neon"
    }

    fn advance(&mut self, canvas: &mut Canvas, mode: ColorMode, _rng: &mut SimRng) {
        for s in &mut self.streaks {
            s.x = wrap(s.x + s.vx, self.dims.w(), MARGIN);
            s.y = wrap(s.y + s.vy, self.dims.h(), MARGIN);
            s.hue = (s.hue + s.hue_speed) % 360.0;

            let speed = s.vx.hypot(s.vy);
            let tail_x = s.x - s.vx / speed * s.length;
            let tail_y = s.y - s.vy / speed * s.length;
            let core = hsl(s.hue, 100.0, mode.pick(45.0, 65.0));
            canvas.line(tail_x, tail_y, s.x, s.y, core, mode.pick(0.7, 0.55));
            canvas.glow(s.x, s.y, 2.5, core, 0.9);
        }
    }

    fn record_count(&self) -> usize {
        self.streaks.len()
    }

    #[cfg(test)]
    fn positions(&self) -> Vec<(f64, f64)> {
        self.streaks.iter().map(|s| (s.x, s.y)).collect()
    }

    #[cfg(test)]
    fn overflow_margin(&self) -> f64 {
        MARGIN
    }
}
