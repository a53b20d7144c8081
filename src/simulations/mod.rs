pub mod arcade;
pub mod aurora;
pub mod bubbles;
pub mod cosmic;
pub mod ember;
pub mod fireflies;
pub mod forest;
pub mod matrix;
pub mod neon;
pub mod noop;
pub mod ocean;
pub mod rain;
pub mod ripple;
pub mod sakura;
pub mod snow;
pub mod sunset;
pub mod synthwave;
pub mod terminal;
pub mod vortex;

use std::fmt;
use std::str::FromStr;

use crate::render::{Canvas, ColorMode, Dimensions};

/// Random source threaded through every simulation. Seedable so runs can be
/// reproduced.
pub type SimRng = rand::rngs::StdRng;

/// A running particle/wave simulation. The value *is* the simulation state;
/// it is built by its registry entry's `initialize` and dropped wholesale on
/// theme change or resize.
pub trait Simulation {
    /// Theme key this simulation was registered under
    fn name(&self) -> &'static str;

    /// Advance every record by one frame and paint it into the canvas.
    fn advance(&mut self, canvas: &mut Canvas, mode: ColorMode, rng: &mut SimRng);

    /// Number of live particle/wave records. Constant for the lifetime of
    /// the value.
    fn record_count(&self) -> usize;

    /// One anchor point per record, in canvas pixels.
    #[cfg(test)]
    fn positions(&self) -> Vec<(f64, f64)>;

    /// How far outside the canvas a record may sit between frames.
    #[cfg(test)]
    fn overflow_margin(&self) -> f64 {
        0.0
    }
}

/// Builds a fresh simulation for the given canvas size and palette.
pub type Initialize = fn(Dimensions, ColorMode, &mut SimRng) -> Box<dyn Simulation>;

/// One row of the registry.
pub struct SimulationEntry {
    pub key: &'static str,
    pub description: &'static str,
    pub initialize: Initialize,
}

impl fmt::Debug for SimulationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationEntry").field("key", &self.key).finish()
    }
}

/// Identifier of one of the built-in themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeKey {
    Aurora,
    Ember,
    Neon,
    Matrix,
    Terminal,
    Arcade,
    Ocean,
    Forest,
    Sunset,
    Synthwave,
    Cosmic,
    Snow,
    Sakura,
    Rain,
    Bubbles,
    Fireflies,
    Vortex,
    Ripple,
}

impl ThemeKey {
    pub const ALL: [ThemeKey; 18] = [
        ThemeKey::Aurora,
        ThemeKey::Ember,
        ThemeKey::Neon,
        ThemeKey::Matrix,
        ThemeKey::Terminal,
        ThemeKey::Arcade,
        ThemeKey::Ocean,
        ThemeKey::Forest,
        ThemeKey::Sunset,
        ThemeKey::Synthwave,
        ThemeKey::Cosmic,
        ThemeKey::Snow,
        ThemeKey::Sakura,
        ThemeKey::Rain,
        ThemeKey::Bubbles,
        ThemeKey::Fireflies,
        ThemeKey::Vortex,
        ThemeKey::Ripple,
    ];

    pub fn as_str(self) -> &'static str {
        self.entry().key
    }

    pub fn entry(self) -> &'static SimulationEntry {
        &THEMES[self as usize]
    }
}

impl fmt::Display for ThemeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTheme(pub String);

impl fmt::Display for UnknownTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown theme: {}", self.0)
    }
}

impl std::error::Error for UnknownTheme {}

impl FromStr for ThemeKey {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ThemeKey::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownTheme(s.to_string()))
    }
}

/// All themes, indexed by `ThemeKey as usize`.
pub static THEMES: [SimulationEntry; 18] = [
    SimulationEntry {
        key: "aurora",
        description: "Layered aurora curtains with shimmering wave bands",
        initialize: |d, _, rng| Box::new(aurora::Aurora::new(d, rng)),
    },
    SimulationEntry {
        key: "ember",
        description: "Glowing embers rising and burning out",
        initialize: |d, _, rng| Box::new(ember::Ember::new(d, rng)),
    },
    SimulationEntry {
        key: "neon",
        description: "Color-cycling neon streaks sliding diagonally",
        initialize: |d, _, rng| Box::new(neon::Neon::new(d, rng)),
    },
    SimulationEntry {
        key: "matrix",
        description: "Digital rain columns with bright heads",
        initialize: |d, _, rng| Box::new(matrix::Matrix::new(d, rng)),
    },
    SimulationEntry {
        key: "terminal",
        description: "Syntax-highlighted code lines scrolling upward",
        initialize: |d, _, rng| Box::new(terminal::Terminal::new(d, rng)),
    },
    SimulationEntry {
        key: "arcade",
        description: "A chomping walker clearing a row of pellets",
        initialize: |d, _, rng| Box::new(arcade::Arcade::new(d, rng)),
    },
    SimulationEntry {
        key: "ocean",
        description: "Stacked ocean swells with foam crests",
        initialize: |d, _, rng| Box::new(ocean::Ocean::new(d, rng)),
    },
    SimulationEntry {
        key: "forest",
        description: "Leaves swaying down through the canopy",
        initialize: |d, _, rng| Box::new(forest::Forest::new(d, rng)),
    },
    SimulationEntry {
        key: "sunset",
        description: "Warm sun glow with drifting dust motes",
        initialize: |d, _, rng| Box::new(sunset::Sunset::new(d, rng)),
    },
    SimulationEntry {
        key: "synthwave",
        description: "Retro perspective grid racing toward the viewer",
        initialize: |d, _, rng| Box::new(synthwave::Synthwave::new(d, rng)),
    },
    SimulationEntry {
        key: "cosmic",
        description: "Starfield flying through deep space",
        initialize: |d, _, rng| Box::new(cosmic::Cosmic::new(d, rng)),
    },
    SimulationEntry {
        key: "snow",
        description: "Snowflakes wobbling in a shifting breeze",
        initialize: |d, _, rng| Box::new(snow::Snow::new(d, rng)),
    },
    SimulationEntry {
        key: "sakura",
        description: "Spinning cherry blossom petals on the wind",
        initialize: |d, _, rng| Box::new(sakura::Sakura::new(d, rng)),
    },
    SimulationEntry {
        key: "rain",
        description: "Slanted rain streaks at several depths",
        initialize: |d, _, rng| Box::new(rain::Rain::new(d, rng)),
    },
    SimulationEntry {
        key: "bubbles",
        description: "Bubbles wobbling up from the bottom",
        initialize: |d, _, rng| Box::new(bubbles::Bubbles::new(d, rng)),
    },
    SimulationEntry {
        key: "fireflies",
        description: "Fireflies wandering and blinking",
        initialize: |d, _, rng| Box::new(fireflies::Fireflies::new(d, rng)),
    },
    SimulationEntry {
        key: "vortex",
        description: "Particles spiralling into a central well",
        initialize: |d, _, rng| Box::new(vortex::Vortex::new(d, rng)),
    },
    SimulationEntry {
        key: "ripple",
        description: "Expanding rings from random drop points",
        initialize: |d, _, rng| Box::new(ripple::Ripple::new(d, rng)),
    },
];

/// Fallback for keys that are not registered: draws nothing.
pub static NOOP: SimulationEntry = SimulationEntry {
    key: "none",
    description: "No animation",
    initialize: |_, _, _| Box::new(noop::Noop),
};

/// Resolve a theme name. Unknown names resolve to [`NOOP`].
pub fn lookup(key: &str) -> &'static SimulationEntry {
    match key.parse::<ThemeKey>() {
        Ok(k) => k.entry(),
        Err(_) => &NOOP,
    }
}

/// Wrap `v` into `[-margin, extent + margin)`.
#[inline]
pub(crate) fn wrap(v: f64, extent: f64, margin: f64) -> f64 {
    let span = extent + 2.0 * margin;
    (v + margin).rem_euclid(span) - margin
}

/// Remaining fraction of a frame-counted lifetime.
#[inline]
pub(crate) fn life_frac(life: u32, max_life: u32) -> f64 {
    if max_life == 0 {
        0.0
    } else {
        (life as f64 / max_life as f64).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> SimRng {
        SimRng::seed_from_u64(0x5eed)
    }

    #[test]
    fn registry_order_matches_keys() {
        for (i, key) in ThemeKey::ALL.iter().enumerate() {
            assert_eq!(*key as usize, i);
            assert_eq!(key.as_str().parse::<ThemeKey>(), Ok(*key));
        }
    }

    #[test]
    fn theme_names_parse_loosely() {
        assert_eq!("  Aurora ".parse::<ThemeKey>(), Ok(ThemeKey::Aurora));
        assert_eq!("NEON".parse::<ThemeKey>(), Ok(ThemeKey::Neon));
        assert!("not-a-real-theme".parse::<ThemeKey>().is_err());
    }

    #[test]
    fn unknown_key_resolves_to_noop() {
        let entry = lookup("not-a-real-theme");
        assert_eq!(entry.key, NOOP.key);
        let sim = (entry.initialize)(Dimensions::new(800, 600), ColorMode::Dark, &mut rng());
        assert_eq!(sim.record_count(), 0);
        assert!(lookup("").key == "none");
    }

    #[test]
    fn every_theme_initializes_under_its_key() {
        let mut rng = rng();
        for key in ThemeKey::ALL {
            let sim = (lookup(key.as_str()).initialize)(Dimensions::new(120, 80), ColorMode::Dark, &mut rng);
            assert_eq!(sim.name(), key.as_str());
            assert!(sim.record_count() > 0, "{key} has no records");
            assert_eq!(sim.positions().len(), sim.record_count());
        }
    }

    #[test]
    fn record_count_is_constant_across_frames() {
        let mut rng = rng();
        let dims = Dimensions::new(96, 64);
        let mut canvas = Canvas::new(dims);
        for key in ThemeKey::ALL {
            let mut sim = (key.entry().initialize)(dims, ColorMode::Dark, &mut rng);
            let initial = sim.record_count();
            for frame in 0..500 {
                canvas.clear(ColorMode::Dark.background());
                sim.advance(&mut canvas, if frame % 2 == 0 { ColorMode::Dark } else { ColorMode::Light }, &mut rng);
                assert_eq!(sim.record_count(), initial, "{key} changed count at frame {frame}");
            }
            assert_eq!(sim.positions().len(), initial);
        }
    }

    #[test]
    fn reinitialization_has_same_count_and_bounds() {
        let dims = Dimensions::new(200, 150);
        let mut rng = rng();
        for key in ThemeKey::ALL {
            let a = (key.entry().initialize)(dims, ColorMode::Light, &mut rng);
            let b = (key.entry().initialize)(dims, ColorMode::Light, &mut rng);
            assert_eq!(a.record_count(), b.record_count(), "{key}");
            for sim in [&a, &b] {
                let m = sim.overflow_margin();
                for (x, y) in sim.positions() {
                    assert!(x >= -m && x <= dims.w() + m, "{key} x={x}");
                    assert!(y >= -m && y <= dims.h() + m, "{key} y={y}");
                }
            }
        }
    }

    #[test]
    fn records_stay_within_bounds_over_long_runs() {
        let dims = Dimensions::new(64, 40);
        let mut canvas = Canvas::new(dims);
        let mut rng = rng();
        for key in ThemeKey::ALL {
            let mut sim = (key.entry().initialize)(dims, ColorMode::Dark, &mut rng);
            let m = sim.overflow_margin();
            for _ in 0..3_000 {
                canvas.clear(ColorMode::Dark.background());
                sim.advance(&mut canvas, ColorMode::Dark, &mut rng);
            }
            for (x, y) in sim.positions() {
                assert!(x.is_finite() && y.is_finite(), "{key} produced NaN");
                assert!(x >= -m && x <= dims.w() + m, "{key} x={x} margin={m}");
                assert!(y >= -m && y <= dims.h() + m, "{key} y={y} margin={m}");
            }
        }
    }

    #[test]
    fn counts_do_not_depend_on_canvas_size() {
        let mut rng = rng();
        for key in ThemeKey::ALL {
            let small = (key.entry().initialize)(Dimensions::new(800, 600), ColorMode::Dark, &mut rng);
            let large = (key.entry().initialize)(Dimensions::new(1600, 1200), ColorMode::Dark, &mut rng);
            assert_eq!(small.record_count(), large.record_count(), "{key}");
        }
    }

    #[test]
    fn simulations_paint_something() {
        let dims = Dimensions::new(120, 80);
        let mut canvas = Canvas::new(dims);
        let mut rng = rng();
        for key in ThemeKey::ALL {
            let mut sim = (key.entry().initialize)(dims, ColorMode::Dark, &mut rng);
            let mut painted = 0;
            for _ in 0..60 {
                canvas.clear(ColorMode::Dark.background());
                sim.advance(&mut canvas, ColorMode::Dark, &mut rng);
                painted = painted.max(canvas.painted_pixels());
            }
            assert!(painted > 0, "{key} never painted");
        }
    }

    #[test]
    fn wrap_keeps_values_in_range() {
        assert_eq!(wrap(5.0, 10.0, 0.0), 5.0);
        assert_eq!(wrap(10.5, 10.0, 0.0), 0.5);
        assert_eq!(wrap(-0.5, 10.0, 0.0), 9.5);
        assert_eq!(wrap(-3.0, 10.0, 2.0), 11.0);
        assert_eq!(life_frac(5, 10), 0.5);
        assert_eq!(life_frac(1, 0), 0.0);
    }
}
