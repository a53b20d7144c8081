use super::{SimRng, Simulation, life_frac};
use crate::render::{Canvas, ColorMode, Dimensions, hsl};
use rand::RngExt;

pub const COUNT: usize = 150;

/// Distance past an edge at which an ember is considered gone.
const MARGIN: f64 = 10.0;

struct Spark {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    base_radius: f64,
    radius: f64,
    life: u32,
    max_life: u32,
    hue: f64,
}

/// Embers rising from the bottom edge, shrinking as they burn out
pub struct Ember {
    dims: Dimensions,
    sparks: Vec<Spark>,
}

fn spawn(dims: Dimensions, rng: &mut SimRng, y: f64) -> Spark {
    let life = rng.random_range(40..160u32);
    let base_radius = rng.random_range(0.8..2.6);
    Spark {
        x: rng.random_range(0.0..dims.w()),
        y,
        vx: rng.random_range(-0.3..0.3),
        vy: rng.random_range(-1.6..-0.4),
        base_radius,
        radius: base_radius,
        life,
        max_life: life,
        hue: rng.random_range(10.0..45.0),
    }
}

impl Ember {
    pub fn new(dims: Dimensions, rng: &mut SimRng) -> Self {
        let sparks = (0..COUNT)
            .map(|_| {
                let y = rng.random_range(0.0..dims.h());
                spawn(dims, rng, y)
            })
            .collect();
        Ember { dims, sparks }
    }
}

impl Simulation for Ember {
    fn name(&self) -> &'static str {
        "ember"
    }

    fn advance(&mut self, canvas: &mut Canvas, mode: ColorMode, rng: &mut SimRng) {
        let (w, h) = (self.dims.w(), self.dims.h());

        for s in &mut self.sparks {
            s.life = s.life.saturating_sub(1);
            s.vx = (s.vx + rng.random_range(-0.05..0.05)).clamp(-0.6, 0.6);
            s.x += s.vx;
            s.y += s.vy;
            s.radius = s.base_radius * life_frac(s.life, s.max_life);

            if s.life == 0 || s.y < -MARGIN || s.x < -MARGIN || s.x > w + MARGIN {
                let y = h + rng.random_range(0.0..MARGIN * 0.4);
                *s = spawn(self.dims, rng, y);
                continue;
            }

            let heat = life_frac(s.life, s.max_life);
            let color = hsl(s.hue, 100.0, mode.pick(45.0, 50.0 + heat * 15.0));
            canvas.glow(s.x, s.y, s.radius * 2.0, color, 0.3 + heat * 0.7);
        }
    }

    fn record_count(&self) -> usize {
        self.sparks.len()
    }

    #[cfg(test)]
    fn positions(&self) -> Vec<(f64, f64)> {
        self.sparks.iter().map(|s| (s.x, s.y)).collect()
    }

    #[cfg(test)]
    fn overflow_margin(&self) -> f64 {
        MARGIN
    }
}
