//! Whole-image fashion filters.
//!
//! Every filter is a short chain of classic photo enhancements. An enhancement with factor `f`
//! interpolates (or extrapolates) between a *degenerate* version of the image and the image
//! itself: `degenerate * (1 - f) + image * f`. A factor of 1 leaves the image unchanged.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::image::{quantize, Color, Image};

/// A fashion filter style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FashionStyle {
    /// Slightly more saturated and brighter.
    Casual,
    /// Sepia toned, washed out and slightly darker.
    Vintage,
    /// More contrast and sharpness, muted colors.
    Elegant,
    /// Grayscale with boosted contrast.
    Monochrome,
}

impl FashionStyle {
    pub const ALL: [FashionStyle; 4] = [
        FashionStyle::Casual,
        FashionStyle::Vintage,
        FashionStyle::Elegant,
        FashionStyle::Monochrome,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FashionStyle::Casual => "casual",
            FashionStyle::Vintage => "vintage",
            FashionStyle::Elegant => "elegant",
            FashionStyle::Monochrome => "monochrome",
        }
    }
}

impl fmt::Display for FashionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown fashion style '{0}' (expected casual, vintage, elegant or monochrome)")]
pub struct UnknownStyle(String);

impl FromStr for FashionStyle {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownStyle(s.to_string()))
    }
}

/// Applies a fashion filter with the given intensity (usually in `[0, 1]`).
///
/// An intensity of 0 returns an unmodified copy. Alpha is preserved.
pub fn apply(image: &Image, style: FashionStyle, intensity: f32) -> Image {
    if intensity == 0.0 {
        return image.clone();
    }
    let i = intensity;
    log::debug!("applying {style} filter at intensity {i}");

    match style {
        FashionStyle::Casual => {
            let img = saturation(image, 1.0 + 0.15 * i);
            brightness(&img, 1.0 + 0.1 * i)
        }
        FashionStyle::Vintage => {
            let img = sepia(image, i.clamp(0.0, 1.0));
            let img = saturation(&img, 1.0 - 0.2 * i);
            let img = contrast(&img, 1.0 + 0.15 * i);
            brightness(&img, 1.0 - 0.05 * i)
        }
        FashionStyle::Elegant => {
            let img = contrast(image, 1.0 + 0.25 * i);
            let img = sharpness(&img, 1.0 + 0.4 * i);
            let img = brightness(&img, 1.0 + 0.05 * i);
            saturation(&img, 1.0 - 0.1 * i)
        }
        FashionStyle::Monochrome => contrast(&grayscale(image), 1.0 + 0.3 * i),
    }
}

/// Per-pixel `degenerate * (1 - factor) + pixel * factor`, keeping alpha.
fn blend_towards(
    image: &Image,
    factor: f32,
    mut degenerate: impl FnMut(u32, u32, Color) -> [f32; 3],
) -> Image {
    let mut out = image.clone();
    for y in 0..image.height() {
        for x in 0..image.width() {
            let c = image.get(x, y);
            let d = degenerate(x, y, c);
            let rgb = c.rgb();
            let mut blended = [0; 3];
            for i in 0..3 {
                blended[i] = quantize(d[i] + (f32::from(rgb[i]) - d[i]) * factor);
            }
            out.set(x, y, c.with_rgb(blended));
        }
    }
    out
}

fn luma8(c: Color) -> u8 {
    quantize(c.luma())
}

/// Converts to gray, keeping alpha.
fn grayscale(image: &Image) -> Image {
    let mut out = image.clone();
    out.map_pixels(|c| {
        let l = luma8(c);
        c.with_rgb([l, l, l])
    });
    out
}

fn saturation(image: &Image, factor: f32) -> Image {
    blend_towards(image, factor, |_, _, c| [f32::from(luma8(c)); 3])
}

fn brightness(image: &Image, factor: f32) -> Image {
    blend_towards(image, factor, |_, _, _| [0.0; 3])
}

fn contrast(image: &Image, factor: f32) -> Image {
    let n = image.resolution().num_pixels().max(1) as f64;
    let mean = image.pixels().map(|c| f64::from(luma8(c))).sum::<f64>() / n;
    let mean = (mean + 0.5).floor() as f32;
    blend_towards(image, factor, |_, _, _| [mean; 3])
}

/// Sharpens (or softens) against a 3x3 smoothed copy. Border pixels are left as they are.
fn sharpness(image: &Image, factor: f32) -> Image {
    const KERNEL: [[f32; 3]; 3] = [[1.0, 1.0, 1.0], [1.0, 5.0, 1.0], [1.0, 1.0, 1.0]];
    const KERNEL_SUM: f32 = 13.0;

    let (w, h) = (image.width(), image.height());
    blend_towards(image, factor, |x, y, c| {
        let rgb = c.rgb().map(f32::from);
        if x == 0 || y == 0 || x + 1 >= w || y + 1 >= h {
            return rgb;
        }
        let mut acc = [0.0; 3];
        for (ky, row) in KERNEL.iter().enumerate() {
            for (kx, weight) in row.iter().enumerate() {
                let n = image.get(x + kx as u32 - 1, y + ky as u32 - 1).rgb();
                for i in 0..3 {
                    acc[i] += f32::from(n[i]) * weight;
                }
            }
        }
        acc.map(|v| f32::from(quantize(v / KERNEL_SUM)))
    })
}

/// Applies a sepia tone, interpolating the color matrix with identity by `amount`.
fn sepia(image: &Image, amount: f32) -> Image {
    const SEPIA: [[f32; 3]; 3] = [
        [0.272, 0.534, 0.131],
        [0.349, 0.686, 0.168],
        [0.393, 0.769, 0.189],
    ];

    let mut matrix = [[0.0; 3]; 3];
    for (r, row) in matrix.iter_mut().enumerate() {
        for (c, v) in row.iter_mut().enumerate() {
            let identity = if r == c { 1.0 } else { 0.0 };
            *v = identity * (1.0 - amount) + SEPIA[r][c] * amount;
        }
    }

    let mut out = image.clone();
    out.map_pixels(|c| {
        let rgb = c.rgb().map(f32::from);
        let row = |r: usize| {
            quantize(matrix[r][0] * rgb[0] + matrix[r][1] * rgb[1] + matrix[r][2] * rgb[2])
        };
        c.with_rgb([row(0), row(1), row(2)])
    });
    out
}
