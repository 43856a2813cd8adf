//! Garment recoloring and virtual try-on.

use serde::{Deserialize, Serialize};

use crate::{
    color::{self, Hsv},
    config::RecolorPresets,
    error::{ErrorKind, Outcome},
    image::{BlendMode, Color, Image},
};

/// Changes the hue of a garment sprite to the hue of `target`.
///
/// Only pixels that are part of the fabric are recolored: transparent background, near-gray
/// pixels and dark shadows keep their color, as does the alpha channel of every pixel.
/// Saturation and value are moved towards those of `target` instead of being replaced, so that
/// the shading of the fabric survives.
pub fn recolor(sprite: &Image, target: Color, presets: &RecolorPresets) -> Image {
    let target = Hsv::from_rgb8(target.rgb());
    let mut out = sprite.clone();
    let mut recolored = 0usize;
    out.map_pixels(|c| {
        if c.a() <= presets.alpha_threshold {
            return c;
        }
        let hsv = Hsv::from_rgb8(c.rgb());
        if hsv.s <= f32::from(presets.saturation_threshold)
            || hsv.v <= f32::from(presets.value_threshold)
        {
            return c;
        }

        recolored += 1;
        let mix = |orig: f32, target: f32, factor: f32| orig * (1.0 - factor) + target * factor;
        let changed = Hsv {
            h: target.h,
            s: mix(hsv.s, target.s, presets.saturation_mix),
            v: mix(hsv.v, target.v, presets.value_mix),
        };
        c.with_rgb(changed.to_rgb8())
    });
    log::debug!(
        "recolored {recolored} of {} sprite pixels",
        sprite.resolution().num_pixels()
    );
    out
}

/// Like [`recolor`], but takes a hex color specification.
///
/// An invalid specification is replaced by [`color::DEFAULT_COLOR`], and reported in the
/// [`Outcome`]'s notes.
pub fn recolor_hex(sprite: &Image, target: &str, presets: &RecolorPresets) -> Outcome {
    let (color, notes) = match color::parse_hex(target) {
        Ok(color) => (color, Vec::new()),
        Err(e) => {
            log::warn!("{e}, using {:?}", color::DEFAULT_COLOR);
            (color::DEFAULT_COLOR, vec![e])
        }
    };
    Outcome::applied(recolor(sprite, color, presets)).with_notes(notes)
}

/// Position and size of a garment on a photo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placement {
    /// Horizontal offset of the garment's top left corner, in photo pixels.
    pub x: i64,
    /// Vertical offset of the garment's top left corner, in photo pixels.
    pub y: i64,
    /// Uniform scale factor applied to the garment before placing it.
    pub scale: f32,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            scale: 1.0,
        }
    }
}

/// Composites `garment` onto `photo`.
///
/// The garment is resized by [`Placement::scale`] and pasted with its top left corner at
/// `(x, y)`, weighted by its alpha channel. Parts that fall outside of the photo are clipped.
/// The result is flattened to an opaque image.
///
/// If the scaled garment would have no pixels, an unmodified copy of `photo` is returned with a
/// [`ErrorKind::InvalidScale`] degradation.
pub fn place(photo: &Image, garment: &Image, placement: Placement) -> Outcome {
    let garment_res = garment.resolution();
    let Some(res) = garment_res.scale(placement.scale) else {
        let (width, height) = garment_res.scale_unchecked(placement.scale);
        return Outcome::degraded(photo.clone(), ErrorKind::InvalidScale { width, height });
    };

    let scaled;
    let garment = if res == garment_res {
        garment
    } else {
        scaled = garment.resize(res);
        &scaled
    };
    log::debug!(
        "placing {:?} garment at ({}, {}) on {:?}",
        res,
        placement.x,
        placement.y,
        photo,
    );

    let mut out = photo.clone();
    out.blend_from(garment)
        .mode(BlendMode::Weighted)
        .at(placement.x, placement.y);
    Outcome::applied(out.flatten())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::Status, image::Resolution};

    fn sprite() -> Image {
        let mut img = Image::new(4, 2);
        // fabric
        img.set(0, 0, Color::from_rgb8(200, 40, 40));
        img.set(1, 0, Color::from_rgba8(40, 200, 40, 120));
        // gray seam
        img.set(2, 0, Color::from_rgb8(120, 118, 121));
        // shadow
        img.set(3, 0, Color::from_rgb8(15, 0, 3));
        // background
        img.set(0, 1, Color::from_rgba8(200, 40, 40, 50));
        img.set(1, 1, Color::NONE);
        img.set(2, 1, Color::from_rgba8(10, 250, 10, 0));
        img.set(3, 1, Color::from_rgba8(200, 40, 40, 51));
        img
    }

    #[test]
    fn recolor_eligibility() {
        let img = sprite();
        let out = recolor(&img, Color::BLUE, &RecolorPresets::default());

        for (x, y) in [(2, 0), (3, 0), (0, 1), (1, 1), (2, 1)] {
            assert_eq!(out.get(x, y), img.get(x, y), "({x}, {y})");
        }
        for (x, y) in [(0, 0), (1, 0), (3, 1)] {
            let (before, after) = (img.get(x, y), out.get(x, y));
            assert_eq!(after.a(), before.a());
            let hsv = Hsv::from_rgb8(after.rgb());
            assert!((hsv.h - 240.0).abs() < 2.0, "({x}, {y}): {after:?}");
        }
    }

    #[test]
    fn recolor_mixes_saturation_and_value() {
        let mut img = Image::new(1, 1);
        img.set(0, 0, Color::from_rgb8(100, 50, 50));
        let out = recolor(&img, Color::from_rgb8(0, 0, 255), &RecolorPresets::default());
        // s: 127.5 * 0.3 + 255 * 0.7, v: 100 * 0.4 + 255 * 0.6
        let hsv = Hsv::from_rgb8(out.get(0, 0).rgb());
        approx::assert_abs_diff_eq!(hsv.v, 193.0, epsilon = 1.0);
        approx::assert_abs_diff_eq!(hsv.s, 216.75, epsilon = 2.0);
    }

    #[test]
    fn transparent_sprite_is_untouched() {
        let mut img = Image::new(8, 8);
        let mut rng = fastrand::Rng::with_seed(3);
        img.map_pixels(|_| Color::from_rgba8(rng.u8(..), rng.u8(..), rng.u8(..), 0));
        assert_eq!(recolor(&img, Color::GREEN, &RecolorPresets::default()), img);
    }

    #[test]
    fn invalid_hex() {
        let img = sprite();
        let out = recolor_hex(&img, "#12", &RecolorPresets::default());
        assert_eq!(out.notes, [ErrorKind::InvalidColorSpec("#12".into())]);
        assert_eq!(out.image, recolor(&img, color::DEFAULT_COLOR, &RecolorPresets::default()));
    }

    #[test]
    fn opaque_full_size_garment_replaces_photo() {
        let res = Resolution::new(6, 5);
        let photo = Image::filled(res, Color::from_rgb8(1, 2, 3));
        let mut garment = Image::filled(res, Color::WHITE);
        garment.set(2, 2, Color::MAGENTA);

        let out = place(&photo, &garment, Placement::default());
        assert_eq!(out.status, Status::Applied);
        assert_eq!(out.image, garment);
    }

    #[test]
    fn invalid_scale_is_a_noop() {
        let photo = Image::filled(Resolution::new(6, 5), Color::from_rgb8(1, 2, 3));
        let garment = Image::filled(Resolution::new(10, 10), Color::WHITE);
        for scale in [0.0, -1.0, 0.05] {
            let out = place(
                &photo,
                &garment,
                Placement {
                    scale,
                    ..Default::default()
                },
            );
            assert!(out.success());
            assert!(matches!(
                out.status,
                Status::Degraded(ErrorKind::InvalidScale { .. })
            ));
            assert_eq!(out.image, photo);
        }
    }

    #[test]
    fn clipped_and_weighted_by_alpha() {
        let photo = Image::filled(Resolution::new(4, 4), Color::BLACK);
        let mut garment = Image::filled(Resolution::new(2, 2), Color::WHITE);
        garment.set(1, 1, Color::WHITE.with_alpha(0));
        garment.set(0, 1, Color::WHITE.with_alpha(51));

        let out = place(
            &photo,
            &garment,
            Placement {
                x: 3,
                y: -1,
                scale: 1.0,
            },
        )
        .image;
        assert_eq!(out.get(3, 0), Color::from_rgb8(51, 51, 51));
        assert_eq!(out.get(2, 0), Color::BLACK);
        assert_eq!(out.get(3, 1), Color::BLACK);

        let out = place(
            &photo,
            &garment,
            Placement {
                x: -1,
                y: 3,
                scale: 1.0,
            },
        )
        .image;
        assert_eq!(out.get(0, 3), Color::WHITE);
        assert_eq!(out.get(1, 3), Color::BLACK);
    }

    #[test]
    fn scaled() {
        let photo = Image::filled(Resolution::new(8, 8), Color::BLACK);
        let garment = Image::filled(Resolution::new(2, 2), Color::WHITE);
        let out = place(
            &photo,
            &garment,
            Placement {
                x: 1,
                y: 1,
                scale: 2.0,
            },
        )
        .image;
        assert_eq!(out.get(0, 0), Color::BLACK);
        for (x, y) in [(1, 1), (2, 2), (4, 4)] {
            assert!(out.get(x, y).r() > 250, "({x}, {y})");
        }
        assert_eq!(out.get(5, 5), Color::BLACK);
    }

    #[test]
    fn scaled_edges_keep_garment_color() {
        let photo = Image::filled(Resolution::new(16, 8), Color::WHITE);
        let mut garment = Image::new(8, 4);
        for y in 0..4 {
            for x in 0..4 {
                garment.set(x, y, Color::WHITE);
            }
        }

        let out = place(
            &photo,
            &garment,
            Placement {
                scale: 2.0,
                ..Default::default()
            },
        );
        assert_eq!(out.status, Status::Applied);
        let darkest = out.image.pixels().map(|c| c.r().min(c.g()).min(c.b())).min();
        assert_eq!(darkest, Some(255));
    }
}
