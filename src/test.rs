//! Shared test fixtures: a synthetic portrait with matching face mesh landmarks.

use std::{f32::consts::TAU, sync::OnceLock};

use crate::{
    face::{regions, Region, NUM_LANDMARKS},
    image::{Color, Image, Mask, Resolution},
    landmark::{Landmarks, Precomputed},
    mask,
};

pub const PHOTO_RES: Resolution = Resolution::new(256, 256);
pub const SKIN: Color = Color::from_rgb8(224, 172, 150);
pub const BACKGROUND: Color = Color::from_rgb8(40, 60, 90);

/// Regions that get their own small contour, with center and radii in normalized coordinates.
const FEATURES: &[(Region, [f32; 2], [f32; 2])] = &[
    (regions::LIPS_OUTER, [0.5, 0.63], [0.06, 0.025]),
    (regions::LEFT_EYE, [0.4, 0.45], [0.045, 0.02]),
    (regions::RIGHT_EYE, [0.6, 0.45], [0.045, 0.02]),
    (regions::LEFT_EYEBROW, [0.4, 0.39], [0.05, 0.01]),
    (regions::RIGHT_EYEBROW, [0.6, 0.39], [0.05, 0.01]),
    (regions::LEFT_CHEEK, [0.37, 0.56], [0.03, 0.03]),
    (regions::RIGHT_CHEEK, [0.63, 0.56], [0.03, 0.03]),
];

/// Center and radii of the face oval.
pub const FACE: ([f32; 2], [f32; 2]) = ([0.5, 0.5], [0.2, 0.25]);

fn on_ellipse(center: [f32; 2], radii: [f32; 2], t: f32) -> [f32; 2] {
    let angle = t * TAU;
    [
        center[0] + radii[0] * angle.cos(),
        center[1] + radii[1] * angle.sin(),
    ]
}

/// Landmarks of the synthetic face.
///
/// Landmarks of the named regions are laid out on small ellipses, in contour order; every other
/// landmark sits on the face oval.
pub fn face_landmarks() -> &'static Landmarks {
    static LANDMARKS: OnceLock<Landmarks> = OnceLock::new();
    LANDMARKS.get_or_init(|| {
        let (center, radii) = FACE;
        let mut positions = (0..NUM_LANDMARKS)
            .map(|i| on_ellipse(center, radii, i as f32 / NUM_LANDMARKS as f32))
            .collect::<Vec<_>>();
        for (region, center, radii) in FEATURES {
            let n = region.indices.len();
            for (k, &i) in region.indices.iter().enumerate() {
                positions[i] = on_ellipse(*center, *radii, k as f32 / n as f32);
            }
        }
        Landmarks::new(positions)
    })
}

/// A detector that finds the synthetic face.
pub fn face_detector() -> Precomputed {
    Precomputed::new(Some(face_landmarks().clone()))
}

/// A 256x256 portrait: a skin colored face oval with darker lips and eyes on a blue background.
pub fn face_photo() -> &'static Image {
    static IMG: OnceLock<Image> = OnceLock::new();
    IMG.get_or_init(|| {
        let mut img = Image::filled(PHOTO_RES, BACKGROUND);
        let landmarks = face_landmarks();

        let face = landmarks.pixel_points(0..NUM_LANDMARKS, PHOTO_RES);
        let face = imageproc::geometry::convex_hull(&face);
        paint(&mut img, &mask::hard_polygon(PHOTO_RES, &face, 255), SKIN);

        for (region, color) in [
            (regions::LIPS_OUTER, Color::from_rgb8(180, 100, 100)),
            (regions::LEFT_EYE, Color::from_rgb8(60, 40, 30)),
            (regions::RIGHT_EYE, Color::from_rgb8(60, 40, 30)),
        ] {
            let points = landmarks.pixel_points(region.indices.iter().copied(), PHOTO_RES);
            paint(&mut img, &mask::hard_polygon(PHOTO_RES, &points, 255), color);
        }

        // some texture, so that color statistics aren't degenerate
        let mut rng = fastrand::Rng::with_seed(0xface);
        img.map_pixels(|c| {
            let n = rng.i16(-6..=6);
            let [r, g, b] = c.rgb().map(|v| (i16::from(v) + n).clamp(0, 255) as u8);
            Color::from_rgb8(r, g, b)
        });
        img
    })
}

/// A warm, reddish style reference with a different size than [`face_photo`].
pub fn style_reference() -> &'static Image {
    static IMG: OnceLock<Image> = OnceLock::new();
    IMG.get_or_init(|| {
        let mut img = Image::new(96, 64);
        for y in 0..img.height() {
            for x in 0..img.width() {
                let r = 150 + (x * 100 / 96) as u8;
                let g = 60 + (y * 60 / 64) as u8;
                img.set(x, y, Color::from_rgb8(r, g, 70));
            }
        }
        img
    })
}

fn paint(img: &mut Image, mask: &Mask, color: Color) {
    let layer = Image::from_mask(color, mask);
    img.blend_from(&layer);
}
