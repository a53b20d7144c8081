use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    /// No frame requested
    None,
    /// Fire on the next check, whatever the time
    Immediate,
    At(Instant),
}

/// Fixed-rate frame scheduler. At most one frame is pending at a time; the
/// next one is only scheduled when the current one completes.
#[derive(Debug)]
pub struct FrameClock {
    interval: Duration,
    pending: Pending,
    frame_index: u64,
    measured_fps: f64,
    window_start: Option<Instant>,
    window_frames: u32,
}

impl FrameClock {
    pub const MIN_FPS: u32 = 1;
    pub const MAX_FPS: u32 = 120;

    pub fn new(fps: u32) -> Self {
        let fps = fps.clamp(Self::MIN_FPS, Self::MAX_FPS);
        FrameClock {
            interval: Duration::from_secs_f64(1.0 / fps as f64),
            pending: Pending::None,
            frame_index: 0,
            measured_fps: 0.0,
            window_start: None,
            window_frames: 0,
        }
    }

    #[cfg(test)]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Request a frame as soon as possible unless one is already pending.
    pub fn start(&mut self) {
        if self.pending == Pending::None {
            self.pending = Pending::Immediate;
        }
    }

    /// Drop the pending frame. Nothing fires until `start` is called again.
    pub fn cancel(&mut self) {
        self.pending = Pending::None;
        self.window_start = None;
        self.measured_fps = 0.0;
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.pending != Pending::None
    }

    pub fn is_due(&self, now: Instant) -> bool {
        match self.pending {
            Pending::None => false,
            Pending::Immediate => true,
            Pending::At(due) => now >= due,
        }
    }

    /// Time left until the pending frame, `None` when nothing is scheduled.
    pub fn until_due(&self, now: Instant) -> Option<Duration> {
        match self.pending {
            Pending::None => None,
            Pending::Immediate => Some(Duration::ZERO),
            Pending::At(due) => Some(due.saturating_duration_since(now)),
        }
    }

    /// Mark the pending frame as rendered and schedule the next one. If the
    /// loop fell behind by more than a frame, the schedule restarts from `now`
    /// instead of bursting to catch up.
    pub fn complete(&mut self, now: Instant) {
        let due = match self.pending {
            Pending::None => return,
            Pending::Immediate => now,
            Pending::At(due) => due,
        };
        self.frame_index += 1;
        let next = due + self.interval;
        self.pending = Pending::At(if next < now { now } else { next });

        match self.window_start {
            None => {
                self.window_start = Some(now);
                self.window_frames = 0;
            }
            Some(start) => {
                self.window_frames += 1;
                let elapsed = now.saturating_duration_since(start);
                if elapsed >= Duration::from_secs(1) {
                    self.measured_fps = self.window_frames as f64 / elapsed.as_secs_f64();
                    self.window_start = Some(now);
                    self.window_frames = 0;
                }
            }
        }
    }

    /// Frames completed since the clock was created.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Frames per second over the last full measuring window.
    pub fn measured_fps(&self) -> f64 {
        self.measured_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_is_clamped() {
        assert_eq!(FrameClock::new(0).interval(), Duration::from_secs(1));
        assert_eq!(FrameClock::new(10_000).interval(), Duration::from_secs_f64(1.0 / 120.0));
    }

    #[test]
    fn first_frame_is_due_immediately() {
        let now = Instant::now();
        let mut clock = FrameClock::new(30);
        assert!(!clock.is_due(now));
        assert_eq!(clock.until_due(now), None);
        clock.start();
        assert!(clock.is_due(now));
        assert_eq!(clock.until_due(now), Some(Duration::ZERO));
    }

    #[test]
    fn complete_schedules_one_interval_later() {
        let now = Instant::now();
        let mut clock = FrameClock::new(10);
        clock.start();
        clock.complete(now);
        assert_eq!(clock.frame_index(), 1);
        assert!(!clock.is_due(now));
        assert!(clock.is_due(now + Duration::from_millis(100)));
    }

    #[test]
    fn start_does_not_reschedule_a_pending_frame() {
        let now = Instant::now();
        let mut clock = FrameClock::new(10);
        clock.start();
        clock.complete(now);
        clock.start();
        assert!(!clock.is_due(now));
    }

    #[test]
    fn falling_behind_does_not_burst() {
        let now = Instant::now();
        let mut clock = FrameClock::new(10);
        clock.start();
        clock.complete(now);
        let late = now + Duration::from_secs(5);
        clock.complete(late);
        assert_eq!(clock.until_due(late), Some(Duration::ZERO));
        clock.complete(late);
        assert!(!clock.is_due(late));
    }

    #[test]
    fn cancel_drops_pending_frame() {
        let now = Instant::now();
        let mut clock = FrameClock::new(30);
        clock.start();
        clock.cancel();
        assert!(!clock.is_pending());
        assert!(!clock.is_due(now + Duration::from_secs(1)));
        // Completing with nothing pending is a no-op
        clock.complete(now);
        assert_eq!(clock.frame_index(), 0);
    }

    #[test]
    fn measures_fps_over_a_second() {
        let start = Instant::now();
        let mut clock = FrameClock::new(10);
        clock.start();
        clock.complete(start);
        for i in 1..=10 {
            clock.complete(start + Duration::from_millis(100 * i));
        }
        assert!((clock.measured_fps() - 10.0).abs() < 0.01);
    }
}
