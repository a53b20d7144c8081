use super::{SimRng, Simulation};
use crate::render::{Canvas, ColorMode, Dimensions, hsl};
use rand::RngExt;

pub const PELLETS: usize = 24;
/// The walker plus its row of pellets.
#[cfg(test)]
pub const COUNT: usize = PELLETS + 1;

struct Pellet {
    x: f64,
    eaten: bool,
}

/// A chomping walker crossing the screen and eating a row of pellets.
/// Pellets come back each time the walker wraps around.
pub struct Arcade {
    dims: Dimensions,
    lane_y: f64,
    walker_x: f64,
    speed: f64,
    radius: f64,
    /// Frames since initialization; drives the mouth animation
    tick: u64,
    laps: u64,
    pellets: Vec<Pellet>,
}

impl Arcade {
    pub fn new(dims: Dimensions, rng: &mut SimRng) -> Self {
        let radius = (dims.h() * 0.06).max(2.0);
        let spacing = dims.w() / PELLETS as f64;
        let pellets = (0..PELLETS)
            .map(|i| Pellet {
                x: (i as f64 + 0.5) * spacing,
                eaten: false,
            })
            .collect();
        Arcade {
            dims,
            lane_y: dims.h() * rng.random_range(0.35..0.65),
            walker_x: -radius,
            speed: (dims.w() / 240.0).max(0.5),
            radius,
            tick: 0,
            laps: 0,
            pellets,
        }
    }

    #[cfg(test)]
    pub fn laps(&self) -> u64 {
        self.laps
    }

    #[cfg(test)]
    pub fn remaining(&self) -> usize {
        self.pellets.iter().filter(|p| !p.eaten).count()
    }

    fn paint_walker(&self, canvas: &mut Canvas, mode: ColorMode) {
        let color = mode.pick((205, 150, 0), (255, 221, 0));
        let mouth = (self.tick as f64 * 0.25).sin().abs() * 0.8;
        let r = self.radius.ceil() as isize;
        let (cx, cy) = (self.walker_x, self.lane_y);
        for dy in -r..=r {
            for dx in -r..=r {
                let (fx, fy) = (dx as f64, dy as f64);
                if fx * fx + fy * fy > self.radius * self.radius {
                    continue;
                }
                // Facing right: skip the wedge around angle 0
                if dx > 0 && fy.atan2(fx).abs() < mouth {
                    continue;
                }
                canvas.blend(cx as isize + dx, cy as isize + dy, color, 1.0);
            }
        }
    }
}

impl Simulation for Arcade {
    fn name(&self) -> &'static str {
        "arcade"
    }

    fn advance(&mut self, canvas: &mut Canvas, mode: ColorMode, _rng: &mut SimRng) {
        self.tick += 1;
        self.walker_x += self.speed;

        if self.walker_x > self.dims.w() + self.radius {
            self.walker_x = -self.radius;
            self.laps += 1;
            for p in &mut self.pellets {
                p.eaten = false;
            }
        }

        // Pellets change color every lap
        let pellet_hue = (20 + self.laps * 47) % 360;
        let pellet_color = hsl(pellet_hue as f64, 60.0, mode.pick(45.0, 78.0));
        let pellet_r = (self.radius * 0.3).max(0.5);
        for p in &mut self.pellets {
            if !p.eaten && (p.x - self.walker_x).abs() < self.radius * 0.5 {
                p.eaten = true;
            }
            if !p.eaten {
                canvas.disc(p.x, self.lane_y, pellet_r, pellet_color, 1.0);
            }
        }

        self.paint_walker(canvas, mode);
    }

    fn record_count(&self) -> usize {
        1 + self.pellets.len()
    }

    #[cfg(test)]
    fn positions(&self) -> Vec<(f64, f64)> {
        std::iter::once((self.walker_x, self.lane_y))
            .chain(self.pellets.iter().map(|p| (p.x, self.lane_y)))
            .collect()
    }

    #[cfg(test)]
    fn overflow_margin(&self) -> f64 {
        self.radius + self.speed
    }
}
