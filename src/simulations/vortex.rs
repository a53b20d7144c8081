use super::{SimRng, Simulation};
use crate::render::{Canvas, ColorMode, Dimensions, hsl};
use rand::RngExt;
use std::f64::consts::TAU;

pub const COUNT: usize = 140;

/// Vertical squash of the orbits, for a tilted-disk look
const TILT: f64 = 0.6;

/// Particles closer than this to the center are swallowed and respawn at the rim.
const CORE: f64 = 3.0;

struct Orbiter {
    angle: f64,
    radius: f64,
    spin: f64,
    hue: f64,
}

/// Particles orbiting a central well, pulled inward until they fall in
pub struct Vortex {
    dims: Dimensions,
    rim: f64,
    orbiters: Vec<Orbiter>,
}

fn orbiter(rng: &mut SimRng, min_r: f64, max_r: f64) -> Orbiter {
    Orbiter {
        angle: rng.random_range(0.0..TAU),
        radius: rng.random_range(min_r..max_r),
        spin: rng.random_range(0.01..0.03),
        hue: rng.random_range(250.0..320.0),
    }
}

impl Vortex {
    pub fn new(dims: Dimensions, rng: &mut SimRng) -> Self {
        let rim = (dims.w().min(dims.h() / TILT) * 0.5).max(CORE + 1.0);
        let orbiters = (0..COUNT).map(|_| orbiter(rng, CORE, rim)).collect();
        Vortex {
            dims,
            rim,
            orbiters,
        }
    }

    fn position(&self, o: &Orbiter) -> (f64, f64) {
        (
            self.dims.w() * 0.5 + o.angle.cos() * o.radius,
            self.dims.h() * 0.5 + o.angle.sin() * o.radius * TILT,
        )
    }
}

impl Simulation for Vortex {
    fn name(&self) -> &'static str {
        "vortex"
    }

    fn advance(&mut self, canvas: &mut Canvas, mode: ColorMode, rng: &mut SimRng) {
        let rim = self.rim;
        for o in &mut self.orbiters {
            // Faster near the center, and the pull grows as it closes in
            o.angle = (o.angle + o.spin * (rim / o.radius).min(4.0)) % TAU;
            o.radius -= 0.05 + 1.2 / o.radius;
            if o.radius < CORE {
                *o = orbiter(rng, rim * 0.8, rim);
            }
        }

        let (cx, cy) = (self.dims.w() * 0.5, self.dims.h() * 0.5);
        canvas.glow(cx, cy, CORE * 2.5, mode.pick((40, 20, 60), (200, 170, 255)), 0.8);
        for o in &self.orbiters {
            let (x, y) = self.position(o);
            let closeness = 1.0 - o.radius / rim;
            let color = hsl(o.hue, 80.0, mode.pick(35.0, 50.0 + closeness * 30.0));
            canvas.plot(x, y, color, 0.4 + closeness * 0.6);
        }
    }

    fn record_count(&self) -> usize {
        self.orbiters.len()
    }

    #[cfg(test)]
    fn positions(&self) -> Vec<(f64, f64)> {
        self.orbiters.iter().map(|o| self.position(o)).collect()
    }

    #[cfg(test)]
    fn overflow_margin(&self) -> f64 {
        // Only non-zero on canvases smaller than the minimum rim
        (self.rim - self.dims.w().min(self.dims.h() / TILT) * 0.5).max(0.0)
    }
}
