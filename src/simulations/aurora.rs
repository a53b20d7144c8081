use super::{SimRng, Simulation};
use crate::render::{Canvas, ColorMode, Dimensions};
use noise::{NoiseFn, Perlin};
use rand::RngExt;
use std::f64::consts::TAU;

pub const COUNT: usize = 5;

struct Wave {
    base_y: f64,
    amplitude: f64,
    wavelength: f64,
    phase: f64,
    speed: f64,
    hue: f64,
}

/// Aurora curtains: sine ribbons with a soft fall-off below each crest
pub struct Aurora {
    dims: Dimensions,
    waves: Vec<Wave>,
    noise: Perlin,
    tick: u64,
}

impl Aurora {
    pub fn new(dims: Dimensions, rng: &mut SimRng) -> Self {
        let (w, h) = (dims.w(), dims.h());
        let waves = (0..COUNT)
            .map(|i| Wave {
                base_y: rng.random_range(h * 0.15..h * 0.6),
                amplitude: rng.random_range(h * 0.04..h * 0.1),
                wavelength: rng.random_range(w * 0.3..w * 0.8),
                phase: rng.random_range(0.0..TAU),
                speed: rng.random_range(0.01..0.03),
                hue: 120.0 + i as f64 * 28.0 + rng.random_range(-10.0..10.0),
            })
            .collect();
        Aurora {
            dims,
            waves,
            noise: Perlin::new(rng.random()),
            tick: 0,
        }
    }
}

impl Simulation for Aurora {
    fn name(&self) -> &'static str {
        "aurora"
    }

    fn advance(&mut self, canvas: &mut Canvas, mode: ColorMode, _rng: &mut SimRng) {
        self.tick += 1;
        let t = self.tick as f64 * 0.004;
        let band = (self.dims.h() * 0.18).max(1.0);
        let peak_alpha = mode.pick(0.45, 0.35);

        for (i, wave) in self.waves.iter_mut().enumerate() {
            wave.phase = (wave.phase + wave.speed) % TAU;
            let layer = i as f64 * 3.7;

            for x in 0..canvas.width {
                let fx = x as f64;
                let shimmer = self.noise.get([fx * 0.02, t, layer]);
                let crest = wave.base_y
                    + (fx / wave.wavelength * TAU + wave.phase).sin() * wave.amplitude
                    + shimmer * wave.amplitude * 0.6;
                let color = mode.tint(wave.hue + shimmer * 30.0, 75.0);
                let strength = (0.6 + shimmer * 0.4).clamp(0.0, 1.0);

                for dy in 0..band as usize {
                    let fade = 1.0 - dy as f64 / band;
                    let alpha = fade * fade * peak_alpha * strength;
                    canvas.blend(x as isize, crest as isize + dy as isize, color, alpha);
                }
            }
        }
    }

    fn record_count(&self) -> usize {
        self.waves.len()
    }

    #[cfg(test)]
    fn positions(&self) -> Vec<(f64, f64)> {
        self.waves.iter().map(|w| (0.0, w.base_y)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn five_waves_inside_canvas_height() {
        let mut rng = SimRng::seed_from_u64(1);
        let aurora = Aurora::new(Dimensions::new(800, 600), &mut rng);
        assert_eq!(aurora.record_count(), 5);
        for wave in &aurora.waves {
            assert!((0.0..=600.0).contains(&wave.base_y));
        }
    }

    #[test]
    fn mode_changes_only_color() {
        let dims = Dimensions::new(120, 80);
        let mut rng = SimRng::seed_from_u64(2);
        let mut aurora = Aurora::new(dims, &mut rng);
        let mut canvas = Canvas::new(dims);
        canvas.clear(ColorMode::Dark.background());
        aurora.advance(&mut canvas, ColorMode::Dark, &mut rng);
        let before = aurora.positions();
        canvas.clear(ColorMode::Light.background());
        aurora.advance(&mut canvas, ColorMode::Light, &mut rng);
        assert_eq!(aurora.positions(), before);
    }
}
