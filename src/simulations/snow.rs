use super::{SimRng, Simulation, wrap};
use crate::render::{Canvas, ColorMode, Dimensions};
use rand::RngExt;
use std::f64::consts::TAU;

pub const COUNT: usize = 110;

const MARGIN: f64 = 4.0;

struct Snowflake {
    x: f64,
    y: f64,
    vy: f64,
    wobble_phase: f64,
    wobble_amp: f64,
    size: f64,
}

/// Snowfall drifting in a slowly shifting breeze
pub struct Snow {
    dims: Dimensions,
    flakes: Vec<Snowflake>,
    tick: u64,
}

impl Snow {
    pub fn new(dims: Dimensions, rng: &mut SimRng) -> Self {
        let flakes = (0..COUNT)
            .map(|_| Snowflake {
                x: rng.random_range(0.0..dims.w()),
                y: rng.random_range(0.0..dims.h()),
                vy: rng.random_range(0.2..0.9),
                wobble_phase: rng.random_range(0.0..TAU),
                wobble_amp: rng.random_range(0.1..0.5),
                size: rng.random_range(0.5..1.8),
            })
            .collect();
        Snow {
            dims,
            flakes,
            tick: 0,
        }
    }
}

impl Simulation for Snow {
    fn name(&self) -> &'static str {
        "snow"
    }

    fn advance(&mut self, canvas: &mut Canvas, mode: ColorMode, _rng: &mut SimRng) {
        self.tick += 1;
        let wind = (self.tick as f64 * 0.005).sin() * 0.3;
        let color = mode.pick((120, 140, 175), (230, 235, 255));

        for flake in &mut self.flakes {
            flake.wobble_phase = (flake.wobble_phase + 0.03) % TAU;
            flake.x = wrap(
                flake.x + wind + flake.wobble_phase.sin() * flake.wobble_amp,
                self.dims.w(),
                MARGIN,
            );
            // Bigger flakes fall faster
            flake.y = wrap(flake.y + flake.vy * (0.6 + flake.size * 0.4), self.dims.h(), MARGIN);

            if flake.size > 1.2 {
                canvas.disc(flake.x, flake.y, 1.0, color, 0.8);
            } else {
                canvas.plot(flake.x, flake.y, color, 0.6 + flake.size * 0.2);
            }
        }
    }

    fn record_count(&self) -> usize {
        self.flakes.len()
    }

    #[cfg(test)]
    fn positions(&self) -> Vec<(f64, f64)> {
        self.flakes.iter().map(|f| (f.x, f.y)).collect()
    }

    #[cfg(test)]
    fn overflow_margin(&self) -> f64 {
        MARGIN
    }
}
