use super::{SimRng, Simulation, life_frac};
use crate::render::{Canvas, ColorMode, Dimensions};
use rand::RngExt;

pub const COUNT: usize = 8;

struct Ring {
    x: f64,
    y: f64,
    radius: f64,
    speed: f64,
    life: u32,
    max_life: u32,
    hue: f64,
}

/// Rings expanding from random drop points, fading out as they grow
pub struct Ripple {
    dims: Dimensions,
    rings: Vec<Ring>,
}

fn drop_point(dims: Dimensions, rng: &mut SimRng) -> Ring {
    let speed = rng.random_range(0.3..0.9);
    let max_radius = dims.w().min(dims.h()) * rng.random_range(0.2..0.45);
    let max_life = ((max_radius / speed) as u32).max(1);
    Ring {
        x: rng.random_range(0.0..dims.w()),
        y: rng.random_range(0.0..dims.h()),
        radius: 0.0,
        speed,
        life: max_life,
        max_life,
        hue: rng.random_range(170.0..230.0),
    }
}

impl Ripple {
    pub fn new(dims: Dimensions, rng: &mut SimRng) -> Self {
        let rings = (0..COUNT)
            .map(|_| {
                // Start part way through so the rings are out of step
                let mut ring = drop_point(dims, rng);
                let elapsed = rng.random_range(0..ring.max_life);
                ring.life -= elapsed;
                ring.radius = ring.speed * elapsed as f64;
                ring
            })
            .collect();
        Ripple { dims, rings }
    }
}

impl Simulation for Ripple {
    fn name(&self) -> &'static str {
        "ripple"
    }

    fn advance(&mut self, canvas: &mut Canvas, mode: ColorMode, rng: &mut SimRng) {
        for ring in &mut self.rings {
            ring.radius += ring.speed;
            ring.life = ring.life.saturating_sub(1);
            if ring.life == 0 {
                *ring = drop_point(self.dims, rng);
            }

            let fade = life_frac(ring.life, ring.max_life);
            let color = mode.tint(ring.hue, 65.0);
            canvas.ring(ring.x, ring.y, ring.radius, color, fade * 0.9);
            // Faint inner echo
            if ring.radius > 4.0 {
                canvas.ring(ring.x, ring.y, ring.radius - 3.0, color, fade * 0.35);
            }
        }
    }

    fn record_count(&self) -> usize {
        self.rings.len()
    }

    #[cfg(test)]
    fn positions(&self) -> Vec<(f64, f64)> {
        self.rings.iter().map(|r| (r.x, r.y)).collect()
    }
}
