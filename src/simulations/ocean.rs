use super::{SimRng, Simulation};
use crate::render::{Canvas, ColorMode, Dimensions, hsl};
use rand::RngExt;
use std::f64::consts::TAU;

pub const COUNT: usize = 6;

struct Swell {
    base_y: f64,
    amplitude: f64,
    wavelength: f64,
    phase: f64,
    speed: f64,
    hue: f64,
}

/// Ocean swells stacked toward the bottom, farther layers first
pub struct Ocean {
    swells: Vec<Swell>,
}

impl Ocean {
    pub fn new(dims: Dimensions, rng: &mut SimRng) -> Self {
        let (w, h) = (dims.w(), dims.h());
        let swells = (0..COUNT)
            .map(|i| Swell {
                base_y: h * (0.45 + i as f64 * 0.09) + rng.random_range(-h * 0.02..h * 0.02),
                amplitude: rng.random_range(h * 0.015..h * 0.045),
                wavelength: rng.random_range(w * 0.25..w * 0.7),
                phase: rng.random_range(0.0..TAU),
                speed: rng.random_range(0.015..0.04) * if i % 2 == 0 { 1.0 } else { -1.0 },
                hue: rng.random_range(188.0..222.0),
            })
            .collect();
        Ocean { swells }
    }
}

impl Simulation for Ocean {
    fn name(&self) -> &'static str {
        "ocean"
    }

    fn advance(&mut self, canvas: &mut Canvas, mode: ColorMode, _rng: &mut SimRng) {
        let height = canvas.height as isize;
        let depth_alpha = mode.pick(0.1, 0.14);

        for (i, swell) in self.swells.iter_mut().enumerate() {
            swell.phase = (swell.phase + swell.speed).rem_euclid(TAU);
            let near = i as f64 / (COUNT - 1) as f64;
            let water = hsl(swell.hue, 70.0, mode.pick(55.0 - near * 15.0, 25.0 + near * 20.0));
            let foam = mode.pick((255, 255, 255), (200, 230, 245));

            for x in 0..canvas.width {
                let fx = x as f64;
                let arg = fx / swell.wavelength * TAU + swell.phase;
                let crest = swell.base_y + arg.sin() * swell.amplitude;
                let top = crest as isize;
                for y in top..height {
                    canvas.blend(x as isize, y, water, depth_alpha);
                }
                // Foam where the wave front is steepest going down
                let slope = arg.cos();
                canvas.blend(x as isize, top, foam, 0.25 + slope.max(0.0) * 0.5);
            }
        }
    }

    fn record_count(&self) -> usize {
        self.swells.len()
    }

    #[cfg(test)]
    fn positions(&self) -> Vec<(f64, f64)> {
        self.swells.iter().map(|s| (0.0, s.base_y)).collect()
    }
}
