use super::{SimRng, Simulation, wrap};
use crate::render::{Canvas, ColorMode, Dimensions, hsl};
use rand::RngExt;
use std::f64::consts::TAU;

pub const COUNT: usize = 70;

const MARGIN: f64 = 4.0;

struct Mote {
    x: f64,
    y: f64,
    vy: f64,
    phase: f64,
    amp: f64,
    size: f64,
    hue: f64,
}

/// Low sun glow with dust motes drifting up through the warm light
pub struct Sunset {
    dims: Dimensions,
    motes: Vec<Mote>,
    tick: u64,
}

impl Sunset {
    pub fn new(dims: Dimensions, rng: &mut SimRng) -> Self {
        let motes = (0..COUNT)
            .map(|_| Mote {
                x: rng.random_range(0.0..dims.w()),
                y: rng.random_range(0.0..dims.h()),
                vy: rng.random_range(-0.5..-0.1),
                phase: rng.random_range(0.0..TAU),
                amp: rng.random_range(0.1..0.6),
                size: rng.random_range(0.5..1.6),
                hue: rng.random_range(0.0..50.0),
            })
            .collect();
        Sunset {
            dims,
            motes,
            tick: 0,
        }
    }
}

impl Simulation for Sunset {
    fn name(&self) -> &'static str {
        "sunset"
    }

    fn advance(&mut self, canvas: &mut Canvas, mode: ColorMode, _rng: &mut SimRng) {
        self.tick += 1;
        let (w, h) = (self.dims.w(), self.dims.h());

        // The sun breathes slightly
        let pulse = 1.0 + (self.tick as f64 * 0.01).sin() * 0.04;
        let sun = hsl(28.0, 95.0, mode.pick(60.0, 55.0));
        canvas.glow(w * 0.5, h * 0.72, h * 0.45 * pulse, sun, mode.pick(0.5, 0.6));
        canvas.disc(w * 0.5, h * 0.72, h * 0.12, hsl(40.0, 100.0, mode.pick(62.0, 70.0)), 0.9);

        for m in &mut self.motes {
            m.phase = (m.phase + 0.02) % TAU;
            m.x = wrap(m.x + m.phase.sin() * m.amp, w, MARGIN);
            m.y = wrap(m.y + m.vy, h, MARGIN);
            let twinkle = 0.5 + 0.5 * (m.phase * 3.0).sin();
            let color = hsl(m.hue, 90.0, mode.pick(40.0, 75.0));
            canvas.disc(m.x, m.y, m.size, color, 0.3 + 0.5 * twinkle);
        }
    }

    fn record_count(&self) -> usize {
        self.motes.len()
    }

    #[cfg(test)]
    fn positions(&self) -> Vec<(f64, f64)> {
        self.motes.iter().map(|m| (m.x, m.y)).collect()
    }

    #[cfg(test)]
    fn overflow_margin(&self) -> f64 {
        MARGIN
    }
}
