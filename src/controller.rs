use std::time::{Duration, Instant};

use rand::{RngExt, SeedableRng};
use tracing::{debug, info};

use crate::clock::FrameClock;
use crate::render::{Canvas, ColorMode, Dimensions};
use crate::simulations::{self, SimRng, Simulation, ThemeKey};

/// Owns the canvas, the running simulation and the frame clock.
///
/// The controller is `Idle` when it holds no simulation and `Active`
/// otherwise. Every transition runs to completion inside the call that
/// requests it, so the next [`Controller::frame`] always sees either the old
/// state or the new one, never a mix.
pub struct Controller {
    /// Requested theme name, kept verbatim even when it is not registered
    theme: String,
    mode: ColorMode,
    enabled: bool,
    /// Last size reported by the host
    size: Dimensions,
    /// Pixel buffer, allocated while active
    canvas: Option<Canvas>,
    simulation: Option<Box<dyn Simulation>>,
    clock: FrameClock,
    rng: SimRng,
}

impl Controller {
    pub fn new(theme: &str, mode: ColorMode, fps: u32, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        debug!(seed, fps, "controller created");
        Controller {
            theme: theme.trim().to_string(),
            mode,
            enabled: false,
            size: Dimensions::new(0, 0),
            canvas: None,
            simulation: None,
            clock: FrameClock::new(fps),
            rng: SimRng::seed_from_u64(seed),
        }
    }

    /// Idle → Active. Stays idle while there is no canvas to draw on.
    pub fn enable(&mut self) {
        self.enabled = true;
        if self.simulation.is_none() {
            self.activate();
        }
    }

    /// Active → Idle. Cancels the pending frame, drops the state and
    /// releases the canvas.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.deactivate();
        self.canvas = None;
        debug!("animation disabled");
    }

    pub fn set_theme(&mut self, key: &str) {
        let key = key.trim();
        if key == self.theme && self.simulation.is_some() {
            return;
        }
        self.theme = key.to_string();
        if self.simulation.is_some() {
            self.deactivate();
            self.activate();
        }
    }

    /// Switch the palette. The running state is kept as is.
    pub fn set_mode(&mut self, mode: ColorMode) {
        if mode != self.mode {
            debug!(?mode, "color mode changed");
            self.mode = mode;
        }
    }

    /// New canvas size. Reinitializes the running simulation at the new
    /// dimensions; sizes too small to draw on leave the controller idle.
    pub fn resize(&mut self, dimensions: Dimensions) {
        if dimensions == self.size {
            return;
        }
        debug!(width = dimensions.width, height = dimensions.height, "canvas resized");
        self.size = dimensions;
        self.deactivate();
        self.canvas = None;
        self.activate();
    }

    /// Step to the next (or previous, for negative `step`) registered theme.
    pub fn cycle_theme(&mut self, step: isize) {
        let all = ThemeKey::ALL;
        let current = self
            .theme
            .parse::<ThemeKey>()
            .ok()
            .and_then(|k| all.iter().position(|&t| t == k));
        let next = match current {
            Some(i) => (i as isize + step).rem_euclid(all.len() as isize) as usize,
            None => 0,
        };
        self.set_theme(all[next].as_str());
    }

    /// Run one frame if the clock says one is due. Returns the painted canvas.
    pub fn frame(&mut self, now: Instant) -> Option<&Canvas> {
        if !self.clock.is_due(now) {
            return None;
        }
        let (Some(sim), Some(canvas)) = (self.simulation.as_mut(), self.canvas.as_mut()) else {
            return None;
        };
        canvas.clear(self.mode.background());
        sim.advance(canvas, self.mode, &mut self.rng);
        self.clock.complete(now);
        Some(canvas)
    }

    fn activate(&mut self) {
        if !self.enabled {
            return;
        }
        if !self.size.is_drawable() {
            debug!("no canvas available, staying idle");
            return;
        }
        let size = self.size;
        let dimensions = self.canvas.get_or_insert_with(|| Canvas::new(size)).dimensions();
        let entry = simulations::lookup(&self.theme);
        if entry.key == simulations::NOOP.key {
            info!(theme = %self.theme, "unknown theme, drawing nothing");
        } else {
            info!(theme = entry.key, mode = ?self.mode, "starting simulation");
        }
        let sim = (entry.initialize)(dimensions, self.mode, &mut self.rng);
        self.simulation = Some(sim);
        self.clock.start();
    }

    fn deactivate(&mut self) {
        self.clock.cancel();
        self.simulation = None;
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.simulation.is_some()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[cfg(test)]
    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    /// Name of the running simulation, `None` while idle.
    pub fn simulation_name(&self) -> Option<&'static str> {
        self.simulation.as_ref().map(|s| s.name())
    }

    pub fn record_count(&self) -> usize {
        self.simulation.as_ref().map_or(0, |s| s.record_count())
    }

    #[cfg(test)]
    pub fn positions(&self) -> Vec<(f64, f64)> {
        self.simulation.as_ref().map(|s| s.positions()).unwrap_or_default()
    }

    #[cfg(test)]
    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    pub fn frame_index(&self) -> u64 {
        self.clock.frame_index()
    }

    pub fn measured_fps(&self) -> f64 {
        self.clock.measured_fps()
    }

    pub fn until_due(&self, now: Instant) -> Option<Duration> {
        self.clock.until_due(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulations::{aurora, ember, neon};

    fn active(theme: &str, dims: Dimensions) -> Controller {
        let mut c = Controller::new(theme, ColorMode::Dark, 30, Some(42));
        c.resize(dims);
        c.enable();
        c
    }

    /// Run `n` frames, pretending each one became due.
    fn run(c: &mut Controller, n: usize) {
        let mut now = Instant::now();
        for _ in 0..n {
            now += Duration::from_millis(40);
            c.frame(now);
        }
    }

    #[test]
    fn starts_idle_and_stays_idle_without_canvas() {
        let mut c = Controller::new("aurora", ColorMode::Dark, 30, Some(1));
        assert!(!c.is_active());
        c.enable();
        assert!(c.is_enabled());
        assert!(!c.is_active());
        assert!(c.frame(Instant::now()).is_none());
        assert_eq!(c.until_due(Instant::now()), None);
    }

    #[test]
    fn canvas_arriving_later_activates() {
        let mut c = Controller::new("aurora", ColorMode::Dark, 30, Some(1));
        c.enable();
        c.resize(Dimensions::new(800, 600));
        assert!(c.is_active());
        assert_eq!(c.record_count(), aurora::COUNT);
        for (_, y) in c.positions() {
            assert!((0.0..=600.0).contains(&y));
        }
    }

    #[test]
    fn first_frame_paints_and_advances_index() {
        let mut c = active("ember", Dimensions::new(200, 100));
        let canvas = c.frame(Instant::now()).expect("frame due after enable");
        assert!(canvas.painted_pixels() > 0);
        assert_eq!(c.frame_index(), 1);
    }

    #[test]
    fn no_second_frame_before_interval() {
        let mut c = active("snow", Dimensions::new(100, 60));
        let now = Instant::now();
        assert!(c.frame(now).is_some());
        assert!(c.frame(now).is_none());
        assert!(c.frame(now + Duration::from_millis(40)).is_some());
    }

    #[test]
    fn mode_change_keeps_state() {
        let mut c = active("ember", Dimensions::new(300, 200));
        run(&mut c, 10);
        let before = c.positions();
        c.set_mode(ColorMode::Light);
        assert_eq!(c.mode(), ColorMode::Light);
        assert_eq!(c.positions(), before);
        assert_eq!(c.record_count(), ember::COUNT);

        // The next frame is painted on the light background
        let canvas = c.frame(Instant::now() + Duration::from_secs(10)).expect("frame due");
        assert_eq!(canvas.background, ColorMode::Light.background());
    }

    #[test]
    fn theme_change_discards_old_state() {
        let mut c = active("aurora", Dimensions::new(300, 200));
        run(&mut c, 5);
        c.set_theme("neon");
        assert_eq!(c.simulation_name(), Some("neon"));
        assert_eq!(c.record_count(), neon::COUNT);
        c.set_theme("ember");
        assert_eq!(c.record_count(), ember::COUNT);
    }

    #[test]
    fn unknown_theme_draws_nothing() {
        let mut c = active("aurora", Dimensions::new(300, 200));
        c.set_theme("neon");
        c.set_theme("not-a-theme");
        assert_eq!(c.theme(), "not-a-theme");
        assert_eq!(c.record_count(), 0);
        assert_eq!(c.simulation_name(), Some("none"));
        let canvas = c.frame(Instant::now()).expect("noop still ticks");
        assert_eq!(canvas.painted_pixels(), 0);
    }

    #[test]
    fn resize_keeps_count_and_spans_new_size() {
        let mut c = active("ember", Dimensions::new(800, 600));
        run(&mut c, 3);
        let count = c.record_count();
        c.resize(Dimensions::new(1600, 1200));
        assert!(c.is_active());
        assert_eq!(c.record_count(), count);
        let max_x = c.positions().iter().map(|p| p.0).fold(0.0, f64::max);
        assert!(max_x > 800.0);
        assert_eq!(c.canvas().map(Canvas::dimensions), Some(Dimensions::new(1600, 1200)));
    }

    #[test]
    fn same_size_resize_is_ignored() {
        let mut c = active("ember", Dimensions::new(200, 100));
        run(&mut c, 3);
        let before = c.positions();
        c.resize(Dimensions::new(200, 100));
        assert_eq!(c.positions(), before);
    }

    #[test]
    fn disable_cancels_pending_frame() {
        let mut c = active("rain", Dimensions::new(100, 60));
        c.disable();
        assert!(!c.is_active());
        assert_eq!(c.record_count(), 0);
        assert!(c.frame(Instant::now() + Duration::from_secs(5)).is_none());
        assert_eq!(c.until_due(Instant::now()), None);

        c.enable();
        assert!(c.is_active());
        assert_eq!(c.simulation_name(), Some("rain"));
    }

    #[test]
    fn shrinking_below_drawable_goes_idle_until_it_grows() {
        let mut c = active("bubbles", Dimensions::new(100, 60));
        c.resize(Dimensions::new(1, 0));
        assert!(!c.is_active());
        assert!(c.canvas().is_none());
        c.resize(Dimensions::new(80, 40));
        assert!(c.is_active());
    }

    #[test]
    fn theme_change_while_idle_waits_for_enable() {
        let mut c = Controller::new("aurora", ColorMode::Dark, 30, Some(3));
        c.resize(Dimensions::new(100, 60));
        c.set_theme("matrix");
        assert!(!c.is_active());
        c.enable();
        assert_eq!(c.simulation_name(), Some("matrix"));
    }

    #[test]
    fn cycling_wraps_around_registry() {
        let mut c = active("aurora", Dimensions::new(100, 60));
        c.cycle_theme(-1);
        assert_eq!(c.theme(), "ripple");
        c.cycle_theme(1);
        assert_eq!(c.theme(), "aurora");
        c.set_theme("bogus");
        c.cycle_theme(1);
        assert_eq!(c.theme(), "aurora");
    }

    #[test]
    fn same_seed_same_run() {
        let mut a = active("vortex", Dimensions::new(120, 80));
        let mut b = active("vortex", Dimensions::new(120, 80));
        run(&mut a, 50);
        run(&mut b, 50);
        assert_eq!(a.positions(), b.positions());
    }
}
