use super::{color::quantize, Color, Image, Mask};

/// Describes how to blend pixels together in a [`Blend`] operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// All destination pixels will be overwritten with the corresponding source pixel.
    Overwrite,

    /// Performs alpha blending between source and destination pixels to make the source image
    /// appear in front of the destination image ("over" compositing).
    Alpha,

    /// Linearly interpolates every channel (including alpha) between destination and source.
    ///
    /// The weight is taken from the [`Mask`] set with [`Blend::mask`], or from the source's
    /// alpha channel if there is none. This is how a sprite is pasted onto a photo, and how a
    /// recolored copy is merged back into its original.
    Weighted,
}

/// A blending operation between two images.
///
/// Returned by [`Image::blend_from`]. The blend is performed when this value is dropped.
pub struct Blend<'a> {
    dest: &'a mut Image,
    src: &'a Image,
    mode: BlendMode,
    x: i64,
    y: i64,
    mask: Option<&'a Mask>,
}

impl<'a> Blend<'a> {
    pub(super) fn new(dest: &'a mut Image, src: &'a Image) -> Self {
        Self {
            dest,
            src,
            mode: BlendMode::Alpha,
            x: 0,
            y: 0,
            mask: None,
        }
    }

    /// Sets the blend mode to use.
    pub fn mode(&mut self, mode: BlendMode) -> &mut Self {
        self.mode = mode;
        self
    }

    /// Places the top left corner of the source image at `(x, y)` in the destination.
    ///
    /// The position may be negative or lie beyond the destination; source pixels that fall
    /// outside of the destination are clipped.
    pub fn at(&mut self, x: i64, y: i64) -> &mut Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Uses `mask` as the per-pixel weight of a [`BlendMode::Weighted`] blend.
    ///
    /// The mask is indexed with source coordinates and must be at least as large as the
    /// source image.
    pub fn mask(&mut self, mask: &'a Mask) -> &mut Self {
        self.mask = Some(mask);
        self
    }
}

impl Drop for Blend<'_> {
    fn drop(&mut self) {
        let (dest_w, dest_h) = (i64::from(self.dest.width()), i64::from(self.dest.height()));

        // Only visit the part of the source that overlaps the destination.
        let src_x0 = (-self.x).clamp(0, i64::from(self.src.width()));
        let src_y0 = (-self.y).clamp(0, i64::from(self.src.height()));
        let src_x1 = (dest_w - self.x).clamp(0, i64::from(self.src.width()));
        let src_y1 = (dest_h - self.y).clamp(0, i64::from(self.src.height()));

        for src_y in src_y0..src_y1 {
            for src_x in src_x0..src_x1 {
                let (sx, sy) = (src_x as u32, src_y as u32);
                let (dx, dy) = ((src_x + self.x) as u32, (src_y + self.y) as u32);

                let src_pix = self.src.get(sx, sy);
                let dest_pix = self.dest.get(dx, dy);
                let result = match self.mode {
                    BlendMode::Overwrite => blend_overwrite(dest_pix, src_pix),
                    BlendMode::Alpha => blend_alpha(dest_pix, src_pix),
                    BlendMode::Weighted => {
                        let weight = match self.mask {
                            Some(mask) => mask.get(sx, sy),
                            None => src_pix.a(),
                        };
                        blend_weighted(dest_pix, src_pix, weight)
                    }
                };
                self.dest.set(dx, dy, result);
            }
        }
    }
}

fn blend_overwrite(_dest: Color, src: Color) -> Color {
    src
}

/// Composites `src` over `dest` in non-linear sRGB space.
pub(crate) fn blend_alpha(dest: Color, src: Color) -> Color {
    match src.a() {
        0 => return dest,
        255 => return src,
        _ => {}
    }

    let src_a = f32::from(src.a()) / 255.0;
    let dest_a = f32::from(dest.a()) / 255.0;
    let result_a = src_a + dest_a * (1.0 - src_a);

    let blend_channel = |d: u8, s: u8| {
        let (d, s) = (f32::from(d), f32::from(s));
        quantize((s * src_a + d * dest_a * (1.0 - src_a)) / result_a)
    };

    Color([
        blend_channel(dest.r(), src.r()),
        blend_channel(dest.g(), src.g()),
        blend_channel(dest.b(), src.b()),
        quantize(result_a * 255.0),
    ])
}

fn blend_weighted(dest: Color, src: Color, weight: u8) -> Color {
    match weight {
        0 => return dest,
        255 => return src,
        _ => {}
    }

    let w = f32::from(weight) / 255.0;
    let mut out = [0; 4];
    for (i, out) in out.iter_mut().enumerate() {
        *out = quantize(f32::from(src[i]) * w + f32::from(dest[i]) * (1.0 - w));
    }
    Color(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_extremes_are_exact() {
        let dest = Color::from_rgb8(12, 34, 56);
        let src = Color::from_rgb8(200, 100, 7);
        assert_eq!(blend_alpha(dest, src), src);
        assert_eq!(blend_alpha(dest, src.with_alpha(0)), dest);
    }

    #[test]
    fn alpha_over_opaque_stays_opaque() {
        let dest = Color::from_rgb8(0, 0, 0);
        let src = Color::from_rgba8(255, 255, 255, 128);
        let out = blend_alpha(dest, src);
        assert_eq!(out.a(), 255);
        assert_eq!(out.r(), 128);
    }

    #[test]
    fn alpha_over_transparent_keeps_source_color() {
        let src = Color::from_rgba8(230, 78, 107, 143);
        let out = blend_alpha(Color::NONE, src);
        assert_eq!(out, src);
    }

    #[test]
    fn weighted() {
        let dest = Color::from_rgb8(0, 100, 200);
        let src = Color::from_rgb8(255, 100, 0);
        assert_eq!(blend_weighted(dest, src, 0), dest);
        assert_eq!(blend_weighted(dest, src, 255), src);
        assert_eq!(blend_weighted(dest, src, 51), Color::from_rgb8(51, 100, 160));
    }
}
