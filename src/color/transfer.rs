use crate::{error::ErrorKind, image::Image};

use super::Lab;

/// Lower bound for standard deviations, so that flat-colored images don't cause a division by
/// zero.
pub const STD_EPSILON: f32 = 1e-6;

/// Per-channel mean and standard deviation of an image in Lab space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStats {
    pub mean: [f32; 3],
    /// Population standard deviation, floored to [`STD_EPSILON`].
    pub std: [f32; 3],
}

impl ColorStats {
    /// Computes the statistics of the Lab values in `pixels`.
    ///
    /// Returns `None` if `pixels` is empty.
    pub fn from_lab(pixels: &[Lab]) -> Option<Self> {
        if pixels.is_empty() {
            return None;
        }

        let n = pixels.len() as f64;
        let mut sum = [0.0f64; 3];
        let mut sum_sq = [0.0f64; 3];
        for lab in pixels {
            for (i, c) in lab.to_array().into_iter().enumerate() {
                let c = f64::from(c);
                sum[i] += c;
                sum_sq[i] += c * c;
            }
        }

        let mut mean = [0.0; 3];
        let mut std = [0.0; 3];
        for i in 0..3 {
            let m = sum[i] / n;
            let var = (sum_sq[i] / n - m * m).max(0.0);
            mean[i] = m as f32;
            std[i] = (var.sqrt() as f32).max(STD_EPSILON);
        }
        Some(Self { mean, std })
    }

    /// Computes the statistics of an image's colors. Alpha is ignored.
    pub fn of(image: &Image) -> Option<Self> {
        Self::from_lab(&to_lab(image))
    }
}

fn to_lab(image: &Image) -> Vec<Lab> {
    image.pixels().map(|c| Lab::from_srgb8(c.rgb())).collect()
}

/// Transfers the color statistics of `source` onto `target`.
///
/// Every Lab channel of `target` is shifted and scaled so that its mean and standard deviation
/// match those of `source`. The structure (and alpha channel) of `target` is kept.
pub fn try_transfer(source: &Image, target: &Image) -> Result<Image, ErrorKind> {
    let source_stats = ColorStats::of(source)
        .ok_or(ErrorKind::ColorTransferFailed("empty source image"))?;
    let target_lab = to_lab(target);
    let target_stats = ColorStats::from_lab(&target_lab)
        .ok_or(ErrorKind::ColorTransferFailed("empty target image"))?;
    log::trace!("source {:?}, target {:?}", source_stats, target_stats);

    let mut scale = [0.0; 3];
    for (i, scale) in scale.iter_mut().enumerate() {
        *scale = source_stats.std[i] / target_stats.std[i];
        if !scale.is_finite() || !source_stats.mean[i].is_finite() {
            return Err(ErrorKind::ColorTransferFailed("non-finite color statistics"));
        }
    }

    let mut out = target.clone();
    let mut labs = target_lab.into_iter();
    out.map_pixels(|color| {
        let Some(lab) = labs.next() else {
            return color;
        };
        let mut channels = lab.to_array();
        for (i, c) in channels.iter_mut().enumerate() {
            *c = (*c - target_stats.mean[i]) * scale[i] + source_stats.mean[i];
        }
        color.with_rgb(Lab::from_array(channels).clip().to_srgb8())
    });
    Ok(out)
}

/// Transfers the color statistics of `source` onto `target`, returning an unmodified copy of
/// `target` if that fails.
pub fn transfer(source: &Image, target: &Image) -> Image {
    try_transfer(source, target).unwrap_or_else(|e| {
        log::warn!("{e}, keeping target colors");
        target.clone()
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::image::{Color, Resolution};

    fn noise(seed: u64, res: Resolution) -> Image {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut image = Image::new(res.width(), res.height());
        image.map_pixels(|_| Color::from_rgb8(rng.u8(..), rng.u8(40..200), rng.u8(..)));
        image
    }

    #[test]
    fn identical_statistics_are_neutral() {
        let image = noise(1, Resolution::new(32, 24));
        assert_eq!(transfer(&image, &image), image);
    }

    #[test]
    fn flat_source_floods_target() {
        let color = Color::from_rgb8(120, 60, 200);
        let source = Image::filled(Resolution::new(4, 4), color);
        let target = noise(2, Resolution::new(16, 16));
        let out = transfer(&source, &target);
        assert!(out.pixels().all(|c| c == color));
    }

    #[test]
    fn flat_target_takes_source_mean() {
        let target = Image::filled(Resolution::new(8, 8), Color::from_rgb8(10, 200, 30));
        let source = noise(3, Resolution::new(20, 20));
        let out = try_transfer(&source, &target).unwrap();

        let mean = ColorStats::of(&source).unwrap().mean;
        let expected = Lab::from_array(mean).clip().to_srgb8();
        assert!(out.pixels().all(|c| c.rgb() == expected));
    }

    #[test]
    fn result_matches_source_statistics() {
        let source = noise(4, Resolution::new(40, 40));
        let target = noise(5, Resolution::new(30, 50));
        let out = transfer(&source, &target);

        let want = ColorStats::of(&source).unwrap();
        let got = ColorStats::of(&out).unwrap();
        // gamut clipping and quantization keep this from being exact
        assert_abs_diff_eq!(got.mean[0], want.mean[0], epsilon = 2.0);
        assert_abs_diff_eq!(got.std[0], want.std[0], epsilon = 2.0);
    }

    #[test]
    fn keeps_alpha() {
        let mut target = noise(6, Resolution::new(4, 4));
        target.set(1, 1, target.get(1, 1).with_alpha(17));
        let out = transfer(&noise(7, Resolution::new(4, 4)), &target);
        assert_eq!(out.get(1, 1).a(), 17);
        assert_eq!(out.get(0, 0).a(), 255);
    }

    #[test]
    fn empty_images_fall_back() {
        let empty = Image::new(0, 0);
        let target = noise(8, Resolution::new(3, 3));
        assert_eq!(
            try_transfer(&empty, &target),
            Err(ErrorKind::ColorTransferFailed("empty source image"))
        );
        assert_eq!(transfer(&empty, &target), target);
        assert_eq!(transfer(&target, &empty), empty);
    }
}
