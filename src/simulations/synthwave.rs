use super::{SimRng, Simulation};
use crate::render::{Canvas, ColorMode, Dimensions, hsl};
use rand::RngExt;

pub const COUNT: usize = 24;

/// Vertical position of the horizon, as a fraction of the height
const HORIZON: f64 = 0.55;

/// Rays fanning out from the vanishing point
const RAYS: usize = 14;

/// A horizontal grid row at normalized depth `d` (0 = horizon, 1 = viewer).
struct Row {
    depth: f64,
}

/// Retro perspective grid rolling toward the viewer under a striped sun
pub struct Synthwave {
    dims: Dimensions,
    rows: Vec<Row>,
}

impl Synthwave {
    pub fn new(dims: Dimensions, rng: &mut SimRng) -> Self {
        let rows = (0..COUNT)
            .map(|i| Row {
                depth: ((i as f64 + rng.random_range(0.0..0.5)) / COUNT as f64).min(0.999),
            })
            .collect();
        Synthwave { dims, rows }
    }

    fn horizon(&self) -> f64 {
        self.dims.h() * HORIZON
    }

    fn row_y(&self, depth: f64) -> f64 {
        let horizon = self.horizon();
        horizon + (self.dims.h() - horizon) * depth * depth
    }
}

impl Simulation for Synthwave {
    fn name(&self) -> &'static str {
        "synthwave"
    }

    fn advance(&mut self, canvas: &mut Canvas, mode: ColorMode, rng: &mut SimRng) {
        let (w, h) = (self.dims.w(), self.dims.h());
        let horizon = self.horizon();
        let grid = hsl(305.0, 90.0, mode.pick(45.0, 60.0));
        let sun = hsl(30.0, 100.0, mode.pick(55.0, 60.0));

        // Striped sun sitting on the horizon
        let sun_r = h * 0.3;
        for dy in 0..sun_r as isize {
            let y = horizon - dy as f64;
            if dy % 4 == 1 {
                continue;
            }
            let half = (sun_r * sun_r - (dy * dy) as f64).sqrt();
            canvas.line(w * 0.5 - half, y, w * 0.5 + half, y, sun, 0.8);
        }

        for i in 0..=RAYS {
            let bottom_x = -w * 0.5 + 2.0 * w * i as f64 / RAYS as f64;
            canvas.line(w * 0.5, horizon, bottom_x, h, grid, 0.4);
        }

        for row in &mut self.rows {
            // Accelerate as rows come closer
            row.depth += 0.002 + row.depth * 0.01;
            if row.depth >= 1.0 {
                row.depth = rng.random_range(0.0..0.02);
            }
        }
        for row in &self.rows {
            let y = self.row_y(row.depth);
            canvas.line(0.0, y, w, y, grid, 0.25 + row.depth * 0.7);
        }
    }

    fn record_count(&self) -> usize {
        self.rows.len()
    }

    #[cfg(test)]
    fn positions(&self) -> Vec<(f64, f64)> {
        self.rows
            .iter()
            .map(|r| (self.dims.w() * 0.5, self.row_y(r.depth)))
            .collect()
    }
}
