/// An RGB triple.
pub type Rgb = (u8, u8, u8);

/// Canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}

impl Dimensions {
    /// Smallest side length a canvas can be allocated with.
    pub const MIN_SIDE: usize = 2;

    pub const fn new(width: usize, height: usize) -> Self {
        Dimensions { width, height }
    }

    /// Whether a canvas of this size can be drawn on at all.
    pub fn is_drawable(&self) -> bool {
        self.width >= Self::MIN_SIDE && self.height >= Self::MIN_SIDE
    }

    #[inline]
    pub fn w(&self) -> f64 {
        self.width as f64
    }

    #[inline]
    pub fn h(&self) -> f64 {
        self.height as f64
    }
}

/// A full-frame pixel buffer. Simulations paint into it with alpha blending,
/// the terminal encoders read it back cell by cell.
pub struct Canvas {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Rgb>,
    /// Color the canvas was last cleared to. Encoders treat pixels close to
    /// it as unlit.
    pub background: Rgb,
}

impl Canvas {
    pub fn new(dimensions: Dimensions) -> Self {
        let size = dimensions.width * dimensions.height;
        Canvas {
            width: dimensions.width,
            height: dimensions.height,
            pixels: vec![(0, 0, 0); size],
            background: (0, 0, 0),
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    pub fn clear(&mut self, background: Rgb) {
        self.background = background;
        self.pixels.fill(background);
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Blend `color` over the pixel at (x, y). Out-of-bounds writes are dropped.
    #[inline]
    pub fn blend(&mut self, x: isize, y: isize, color: Rgb, alpha: f64) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let a = alpha.clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.pixels[idx] = super::color::mix(self.pixels[idx], color, a);
    }

    /// Blend a single point at floating point coordinates.
    #[inline]
    pub fn plot(&mut self, x: f64, y: f64, color: Rgb, alpha: f64) {
        self.blend(x.floor() as isize, y.floor() as isize, color, alpha);
    }

    /// Solid disc.
    pub fn disc(&mut self, cx: f64, cy: f64, radius: f64, color: Rgb, alpha: f64) {
        if radius <= 0.5 {
            self.plot(cx, cy, color, alpha);
            return;
        }
        let r = radius.ceil() as isize;
        let (ix, iy) = (cx.floor() as isize, cy.floor() as isize);
        let r2 = radius * radius;
        for dy in -r..=r {
            for dx in -r..=r {
                if (dx * dx + dy * dy) as f64 <= r2 {
                    self.blend(ix + dx, iy + dy, color, alpha);
                }
            }
        }
    }

    /// Disc with quadratic falloff from the center, like a point light.
    pub fn glow(&mut self, cx: f64, cy: f64, radius: f64, color: Rgb, alpha: f64) {
        if radius <= 0.5 {
            self.plot(cx, cy, color, alpha);
            return;
        }
        let r = radius.ceil() as isize;
        let (ix, iy) = (cx.floor() as isize, cy.floor() as isize);
        for dy in -r..=r {
            for dx in -r..=r {
                let dist = ((dx * dx + dy * dy) as f64).sqrt();
                if dist <= radius {
                    let falloff = 1.0 - dist / radius;
                    self.blend(ix + dx, iy + dy, color, alpha * falloff * falloff);
                }
            }
        }
    }

    /// One-pixel circle outline.
    pub fn ring(&mut self, cx: f64, cy: f64, radius: f64, color: Rgb, alpha: f64) {
        if radius <= 0.5 {
            self.plot(cx, cy, color, alpha);
            return;
        }
        // Enough steps that neighbouring samples land on adjacent pixels
        let steps = (radius * std::f64::consts::TAU).ceil().max(8.0) as usize;
        for i in 0..steps {
            let a = i as f64 / steps as f64 * std::f64::consts::TAU;
            self.plot(cx + a.cos() * radius, cy + a.sin() * radius, color, alpha);
        }
    }

    /// Straight line, sampled once per pixel along the longer axis.
    pub fn line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgb, alpha: f64) {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            self.plot(x0 + dx * t, y0 + dy * t, color, alpha);
        }
    }

    /// Number of pixels that differ from the background.
    #[cfg(test)]
    pub fn painted_pixels(&self) -> usize {
        self.pixels.iter().filter(|&&p| p != self.background).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_fills_background() {
        let mut canvas = Canvas::new(Dimensions::new(4, 3));
        canvas.clear((10, 20, 30));
        assert!(canvas.pixels.iter().all(|&p| p == (10, 20, 30)));
        assert_eq!(canvas.painted_pixels(), 0);
    }

    #[test]
    fn blend_ignores_out_of_bounds() {
        let mut canvas = Canvas::new(Dimensions::new(4, 4));
        canvas.clear((0, 0, 0));
        canvas.blend(-1, 0, (255, 255, 255), 1.0);
        canvas.blend(0, 4, (255, 255, 255), 1.0);
        canvas.plot(100.0, 100.0, (255, 255, 255), 1.0);
        assert_eq!(canvas.painted_pixels(), 0);
    }

    #[test]
    fn blend_full_alpha_replaces_pixel() {
        let mut canvas = Canvas::new(Dimensions::new(4, 4));
        canvas.clear((0, 0, 0));
        canvas.blend(1, 2, (200, 100, 50), 1.0);
        assert_eq!(canvas.get(1, 2), Some((200, 100, 50)));
        assert_eq!(canvas.painted_pixels(), 1);
    }

    #[test]
    fn half_alpha_mixes_with_existing() {
        let mut canvas = Canvas::new(Dimensions::new(2, 2));
        canvas.clear((0, 0, 0));
        canvas.blend(0, 0, (200, 100, 0), 0.5);
        assert_eq!(canvas.get(0, 0), Some((100, 50, 0)));
    }

    #[test]
    fn line_touches_both_endpoints() {
        let mut canvas = Canvas::new(Dimensions::new(10, 10));
        canvas.clear((0, 0, 0));
        canvas.line(1.0, 1.0, 8.0, 5.0, (255, 0, 0), 1.0);
        assert_eq!(canvas.get(1, 1), Some((255, 0, 0)));
        assert_eq!(canvas.get(8, 5), Some((255, 0, 0)));
    }

    #[test]
    fn disc_stays_inside_radius() {
        let mut canvas = Canvas::new(Dimensions::new(20, 20));
        canvas.clear((0, 0, 0));
        canvas.disc(10.0, 10.0, 3.0, (0, 255, 0), 1.0);
        assert_eq!(canvas.get(10, 10), Some((0, 255, 0)));
        assert_eq!(canvas.get(10, 14), Some((0, 0, 0)));
    }

    #[test]
    fn drawability_requires_min_side() {
        assert!(Dimensions::new(2, 2).is_drawable());
        assert!(!Dimensions::new(0, 600).is_drawable());
        assert!(!Dimensions::new(800, 1).is_drawable());
    }
}
