use super::{SimRng, Simulation};
use crate::render::{Canvas, ColorMode};

/// Stand-in for unrecognized theme keys. Holds no records and paints nothing.
pub struct Noop;

impl Simulation for Noop {
    fn name(&self) -> &'static str {
        "none"
    }

    fn advance(&mut self, _canvas: &mut Canvas, _mode: ColorMode, _rng: &mut SimRng) {}

    fn record_count(&self) -> usize {
        0
    }

    #[cfg(test)]
    fn positions(&self) -> Vec<(f64, f64)> {
        Vec::new()
    }
}
