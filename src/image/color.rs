use std::{fmt, ops::Index};

/// An 8-bit RGBA color.
///
/// Colors are always in the non-linear sRGB color space and use non-premultiplied alpha.
#[derive(PartialEq, Eq, Clone, Copy, Hash)]
pub struct Color(pub(crate) [u8; 4]);

impl Color {
    /// Fully transparent black (all components are 0).
    pub const NONE: Self = Self([0, 0, 0, 0]);
    pub const BLACK: Self = Self([0, 0, 0, 255]);
    pub const WHITE: Self = Self([255, 255, 255, 255]);
    pub const RED: Self = Self([255, 0, 0, 255]);
    pub const GREEN: Self = Self([0, 255, 0, 255]);
    pub const BLUE: Self = Self([0, 0, 255, 255]);
    pub const YELLOW: Self = Self([255, 255, 0, 255]);
    pub const MAGENTA: Self = Self([255, 0, 255, 255]);
    pub const CYAN: Self = Self([0, 255, 255, 255]);

    #[inline]
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    #[inline]
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    #[inline]
    pub fn r(&self) -> u8 {
        self.0[0]
    }

    #[inline]
    pub fn g(&self) -> u8 {
        self.0[1]
    }

    #[inline]
    pub fn b(&self) -> u8 {
        self.0[2]
    }

    #[inline]
    pub fn a(&self) -> u8 {
        self.0[3]
    }

    /// Returns the red, green and blue components, dropping alpha.
    #[inline]
    pub fn rgb(&self) -> [u8; 3] {
        [self.r(), self.g(), self.b()]
    }

    pub fn with_alpha(mut self, a: u8) -> Color {
        self.0[3] = a;
        self
    }

    /// Replaces the color components while keeping alpha.
    pub fn with_rgb(self, [r, g, b]: [u8; 3]) -> Color {
        Self([r, g, b, self.a()])
    }

    /// Returns the ITU-R 601-2 luma of this color, the weighting used for grayscale
    /// conversion.
    pub fn luma(&self) -> f32 {
        f32::from(self.r()) * 0.299 + f32::from(self.g()) * 0.587 + f32::from(self.b()) * 0.114
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r(),
            self.g(),
            self.b(),
            self.a(),
        )
    }
}

impl Index<usize> for Color {
    type Output = u8;

    #[inline]
    fn index(&self, index: usize) -> &u8 {
        &self.0[index]
    }
}

/// Rounds and saturates a floating-point channel value into the `u8` range.
#[inline]
pub(crate) fn quantize(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
