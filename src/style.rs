//! Makeup style transfer.
//!
//! Adopts the color grading of a reference image, confined to the face: the reference's color
//! statistics are transferred onto the photo, and the result is blended back into the original
//! through a soft whole-face mask so hair, clothes and background keep their colors.

use crate::{
    color,
    config::Presets,
    error::{ErrorKind, Outcome},
    image::{BlendMode, Image},
    landmark::LandmarkDetector,
    mask,
    timer::Timer,
};

/// Transfers the color grading of `reference` onto the face in `photo`.
///
/// If no face is found, or the face mask can't be built, the colors of the whole photo are
/// transferred instead and the result is marked as degraded. The operation only fails if the
/// color transfer itself is impossible (for example because an image is empty).
pub fn transfer<D: LandmarkDetector + ?Sized>(
    detector: &mut D,
    photo: &Image,
    reference: &Image,
    presets: &Presets,
) -> Outcome {
    if photo.resolution().is_empty() || reference.resolution().is_empty() {
        return Outcome::failed(photo.clone(), ErrorKind::ColorTransferFailed("empty image"));
    }

    let mut t_detect = Timer::new("detect");
    let mut t_transfer = Timer::new("transfer");
    let mut t_mask = Timer::new("mask");

    let Some(landmarks) = t_detect.time(|| detector.detect(photo)) else {
        log::info!("no face found, transferring colors of the whole image");
        return match t_transfer.time(|| color::try_transfer(reference, photo)) {
            Ok(transferred) => Outcome::degraded(transferred.flatten(), ErrorKind::NoFaceDetected),
            Err(e) => Outcome::failed(photo.clone(), e),
        };
    };

    let res = photo.resolution();
    let transferred = t_transfer.time(|| {
        let reference = reference.resize(res);
        color::try_transfer(&reference, photo)
    });
    let transferred = match transferred {
        Ok(image) => image,
        Err(e) => return Outcome::failed(photo.clone(), e),
    };

    let face_mask = t_mask.time(|| mask::face_mask(&landmarks, res, &presets.face_mask));
    log::debug!("{t_detect}, {t_transfer}, {t_mask}");
    let face_mask = match face_mask {
        Ok(mask) => mask,
        Err(e) => return Outcome::degraded(transferred.flatten(), e),
    };

    let mut out = photo.clone();
    out.blend_from(&transferred)
        .mode(BlendMode::Weighted)
        .mask(&face_mask);
    Outcome::applied(out.flatten())
}
