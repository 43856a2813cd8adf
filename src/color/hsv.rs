//! HSV (Hue-Saturation-Value) conversions for 8-bit colors.

use crate::image::quantize;

/// A color in HSV representation.
///
/// - `h`: hue in degrees, `0.0..360.0`
/// - `s`: saturation, `0.0..=255.0`
/// - `v`: value, `0.0..=255.0`
///
/// Saturation and value use the same scale as 8-bit channels, so thresholds and mixing factors
/// can be expressed in familiar units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

impl Hsv {
    pub fn from_rgb8([r, g, b]: [u8; 3]) -> Self {
        let (r, g, b) = (f32::from(r), f32::from(g), f32::from(b));
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        if delta == 0.0 {
            return Self { h: 0.0, s: 0.0, v: max };
        }

        let h = if max == r {
            let h = (g - b) / delta;
            if h < 0.0 {
                h + 6.0
            } else {
                h
            }
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };

        Self {
            h: (h * 60.0) % 360.0,
            s: delta / max * 255.0,
            v: max,
        }
    }

    pub fn to_rgb8(self) -> [u8; 3] {
        let s = (self.s / 255.0).clamp(0.0, 1.0);
        let v = self.v.clamp(0.0, 255.0);
        if s == 0.0 {
            let v = quantize(v);
            return [v, v, v];
        }

        let h = self.h.rem_euclid(360.0) / 60.0;
        let sector = h.floor();
        let frac = h - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * frac);
        let t = v * (1.0 - s * (1.0 - frac));

        let (r, g, b) = match sector as u32 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        [quantize(r), quantize(g), quantize(b)]
    }
}
