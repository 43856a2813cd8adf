//! CIE L\*a\*b\* conversions for 8-bit sRGB colors (D65 white point).

use crate::image::quantize;

/// A color in the CIE L\*a\*b\* color space.
///
/// - `l`: lightness, `0.0..=100.0`
/// - `a`: green-red axis, roughly `-128.0..=128.0`
/// - `b`: blue-yellow axis, roughly `-128.0..=128.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f32,
    pub a: f32,
    pub b: f32,
}

const D65_X: f32 = 0.95047;
const D65_Y: f32 = 1.00000;
const D65_Z: f32 = 1.08883;

const SRGB_TO_XYZ: [[f32; 3]; 3] = [
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.119_192, 0.9503041],
];

const XYZ_TO_SRGB: [[f32; 3]; 3] = [
    [3.2404542, -1.5371385, -0.4985314],
    [-0.969_266, 1.8760108, 0.0415560],
    [0.0556434, -0.2040259, 1.0572252],
];

const DELTA: f32 = 6.0 / 29.0;

impl Lab {
    pub const L_RANGE: (f32, f32) = (0.0, 100.0);
    pub const AB_RANGE: (f32, f32) = (-127.0, 127.0);

    /// Converts an 8-bit sRGB color.
    pub fn from_srgb8([r, g, b]: [u8; 3]) -> Self {
        let [r, g, b] = [r, g, b].map(|c| srgb_to_linear(f32::from(c) / 255.0));
        let [x, y, z] = mul(&SRGB_TO_XYZ, [r, g, b]);

        let fx = lab_f(x / D65_X);
        let fy = lab_f(y / D65_Y);
        let fz = lab_f(z / D65_Z);

        Self {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }

    /// Converts back to 8-bit sRGB, clipping out-of-gamut colors.
    pub fn to_srgb8(self) -> [u8; 3] {
        let fy = (self.l + 16.0) / 116.0;
        let fx = fy + self.a / 500.0;
        let fz = fy - self.b / 200.0;

        let xyz = [
            lab_f_inv(fx) * D65_X,
            lab_f_inv(fy) * D65_Y,
            lab_f_inv(fz) * D65_Z,
        ];
        mul(&XYZ_TO_SRGB, xyz).map(|c| quantize(linear_to_srgb(c.clamp(0.0, 1.0)) * 255.0))
    }

    /// Clips all components into the range representable by 8-bit Lab encodings.
    pub fn clip(self) -> Self {
        Self {
            l: self.l.clamp(Self::L_RANGE.0, Self::L_RANGE.1),
            a: self.a.clamp(Self::AB_RANGE.0, Self::AB_RANGE.1),
            b: self.b.clamp(Self::AB_RANGE.0, Self::AB_RANGE.1),
        }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.l, self.a, self.b]
    }

    #[inline]
    pub fn from_array([l, a, b]: [f32; 3]) -> Self {
        Self { l, a, b }
    }
}

#[inline]
fn mul(m: &[[f32; 3]; 3], [x, y, z]: [f32; 3]) -> [f32; 3] {
    [
        m[0][0] * x + m[0][1] * y + m[0][2] * z,
        m[1][0] * x + m[1][1] * y + m[1][2] * z,
        m[2][0] * x + m[2][1] * y + m[2][2] * z,
    ]
}

#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

#[inline]
fn lab_f(t: f32) -> f32 {
    if t > DELTA * DELTA * DELTA {
        t.cbrt()
    } else {
        t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
    }
}

#[inline]
fn lab_f_inv(t: f32) -> f32 {
    if t > DELTA {
        t * t * t
    } else {
        3.0 * DELTA * DELTA * (t - 4.0 / 29.0)
    }
}
