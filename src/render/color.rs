use serde::Deserialize;

use super::canvas::Rgb;

/// Light or dark palette. Only changes colors, never motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorMode {
    Light,
    #[default]
    Dark,
}

impl ColorMode {
    pub fn toggled(self) -> Self {
        match self {
            ColorMode::Light => ColorMode::Dark,
            ColorMode::Dark => ColorMode::Light,
        }
    }

    /// Background the canvas is cleared to before each frame.
    pub fn background(self) -> Rgb {
        match self {
            ColorMode::Light => (242, 240, 234),
            ColorMode::Dark => (8, 9, 16),
        }
    }

    #[inline]
    pub fn pick<T>(self, light: T, dark: T) -> T {
        match self {
            ColorMode::Light => light,
            ColorMode::Dark => dark,
        }
    }

    /// Lightness (percent) for the foreground hue. Light backgrounds need
    /// darker strokes to stay visible.
    #[inline]
    pub fn lightness(self) -> f64 {
        self.pick(42.0, 62.0)
    }

    /// Foreground color for `hue` (degrees) at the mode's lightness.
    #[inline]
    pub fn tint(self, hue: f64, saturation: f64) -> Rgb {
        hsl(hue, saturation, self.lightness())
    }
}

/// CSS-style `hsl()`: hue in degrees, saturation and lightness in percent.
pub fn hsl(h: f64, s: f64, l: f64) -> Rgb {
    let h = h.rem_euclid(360.0);
    let s = (s / 100.0).clamp(0.0, 1.0);
    let l = (l / 100.0).clamp(0.0, 1.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
    let m = l - c / 2.0;

    let (r1, g1, b1) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (
        ((r1 + m) * 255.0).round().clamp(0.0, 255.0) as u8,
        ((g1 + m) * 255.0).round().clamp(0.0, 255.0) as u8,
        ((b1 + m) * 255.0).round().clamp(0.0, 255.0) as u8,
    )
}

/// Linear interpolation from `a` to `b`.
#[inline]
pub fn mix(a: Rgb, b: Rgb, t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    (lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

/// Sum of per-channel differences, used to decide whether a pixel is lit.
#[inline]
pub fn distance(a: Rgb, b: Rgb) -> u32 {
    a.0.abs_diff(b.0) as u32 + a.1.abs_diff(b.1) as u32 + a.2.abs_diff(b.2) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsl_primaries() {
        assert_eq!(hsl(0.0, 100.0, 50.0), (255, 0, 0));
        assert_eq!(hsl(120.0, 100.0, 50.0), (0, 255, 0));
        assert_eq!(hsl(240.0, 100.0, 50.0), (0, 0, 255));
        assert_eq!(hsl(360.0, 100.0, 50.0), (255, 0, 0));
    }

    #[test]
    fn hsl_greys_ignore_hue() {
        assert_eq!(hsl(77.0, 0.0, 0.0), (0, 0, 0));
        assert_eq!(hsl(200.0, 0.0, 100.0), (255, 255, 255));
    }

    #[test]
    fn modes_differ_in_palette() {
        assert_ne!(ColorMode::Light.background(), ColorMode::Dark.background());
        assert_ne!(ColorMode::Light.tint(200.0, 80.0), ColorMode::Dark.tint(200.0, 80.0));
        assert_eq!(ColorMode::Light.toggled(), ColorMode::Dark);
        assert_eq!(ColorMode::Dark.toggled(), ColorMode::Light);
    }

    #[test]
    fn mix_endpoints() {
        assert_eq!(mix((0, 0, 0), (255, 255, 255), 0.0), (0, 0, 0));
        assert_eq!(mix((0, 0, 0), (255, 255, 255), 1.0), (255, 255, 255));
        assert_eq!(distance((10, 20, 30), (13, 18, 30)), 5);
    }
}
