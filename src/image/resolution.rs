//! Types for representing image resolutions.

use std::fmt;

/// Resolution (`width x height`) of an image or mask.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    width: u32,
    height: u32,
}

impl Resolution {
    /// Creates a new [`Resolution`] of `width x height`.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the width of this [`Resolution`].
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of this [`Resolution`].
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn num_pixels(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Returns whether this resolution covers no pixels at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_pixels() == 0
    }

    /// Scales both dimensions by `factor`, truncating towards zero.
    ///
    /// Returns the scaled `(width, height)` as signed values, since a negative or zero factor
    /// produces a size that is not a valid [`Resolution`]. Use [`Resolution::scale`] to get a
    /// checked result.
    pub fn scale_unchecked(&self, factor: f32) -> (i64, i64) {
        let w = (self.width as f64 * f64::from(factor)).trunc();
        let h = (self.height as f64 * f64::from(factor)).trunc();
        (w as i64, h as i64)
    }

    /// Scales both dimensions by `factor`.
    ///
    /// If the scaled width or height is not positive (or does not fit into a `u32`), `None` is
    /// returned.
    pub fn scale(&self, factor: f32) -> Option<Self> {
        let (w, h) = self.scale_unchecked(factor);
        let w = u32::try_from(w).ok().filter(|&w| w > 0)?;
        let h = u32::try_from(h).ok().filter(|&h| h > 0)?;
        Some(Self::new(w, h))
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale() {
        let res = Resolution::new(100, 50);
        assert_eq!(res.scale(1.0), Some(res));
        assert_eq!(res.scale(0.5), Some(Resolution::new(50, 25)));
        assert_eq!(res.scale(0.015), None);
        assert_eq!(res.scale(0.0), None);
        assert_eq!(res.scale(-1.0), None);
        assert_eq!(res.scale_unchecked(-1.0), (-100, -50));
        assert_eq!(res.scale(f32::NAN), None);
    }
}
