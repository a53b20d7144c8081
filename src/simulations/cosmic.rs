use super::{SimRng, Simulation};
use crate::render::{Canvas, ColorMode, Dimensions, hsl};
use rand::RngExt;

pub const COUNT: usize = 120;

struct Star {
    x: f64,
    y: f64,
    z: f64,
    speed: f64,
    hue: f64,
}

/// Starfield with depth parallax; stars respawn far away once they pass the viewer
pub struct Cosmic {
    dims: Dimensions,
    stars: Vec<Star>,
}

fn new_star(rng: &mut SimRng, far: bool) -> Star {
    Star {
        x: rng.random_range(-0.5..0.5),
        y: rng.random_range(-0.5..0.5),
        z: if far {
            rng.random_range(0.5..1.0)
        } else {
            rng.random_range(0.05..1.0)
        },
        speed: rng.random_range(0.004..0.012),
        hue: rng.random_range(200.0..260.0),
    }
}

impl Star {
    /// Project onto the canvas; `None` once the star leaves the view.
    fn project(&self, dims: Dimensions) -> Option<(f64, f64)> {
        let (cx, cy) = (dims.w() / 2.0, dims.h() / 2.0);
        let px = self.x / self.z * cx + cx;
        let py = self.y / self.z * cy + cy;
        if self.z <= 0.01 || px < 0.0 || py < 0.0 || px >= dims.w() || py >= dims.h() {
            None
        } else {
            Some((px, py))
        }
    }
}

impl Cosmic {
    pub fn new(dims: Dimensions, rng: &mut SimRng) -> Self {
        let stars = (0..COUNT)
            .map(|_| {
                let mut star = new_star(rng, false);
                while star.project(dims).is_none() {
                    star = new_star(rng, true);
                }
                star
            })
            .collect();
        Cosmic { dims, stars }
    }
}

impl Simulation for Cosmic {
    fn name(&self) -> &'static str {
        "cosmic"
    }

    fn advance(&mut self, canvas: &mut Canvas, mode: ColorMode, rng: &mut SimRng) {
        for star in &mut self.stars {
            star.z -= star.speed;
            let (px, py) = loop {
                if let Some(p) = star.project(self.dims) {
                    break p;
                }
                *star = new_star(rng, true);
            };
            let near = (1.0 - star.z).clamp(0.0, 1.0);
            let color = hsl(star.hue, mode.pick(60.0, 30.0), mode.pick(30.0, 70.0 + near * 30.0));
            canvas.plot(px, py, color, 0.3 + near * 0.7);
            if near > 0.7 {
                canvas.glow(px, py, 1.0 + near * 1.5, color, near * 0.6);
            }
        }
    }

    fn record_count(&self) -> usize {
        self.stars.len()
    }

    #[cfg(test)]
    fn positions(&self) -> Vec<(f64, f64)> {
        // Every star projects inside the view between frames
        self.stars
            .iter()
            .map(|s| s.project(self.dims).unwrap_or_default())
            .collect()
    }
}
