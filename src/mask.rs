//! Soft region masks derived from landmark polygons.
//!
//! Lips get a hard-edged mask, eyeshadow and blush are blurred proportionally to the image (or
//! face) size so that the effect looks the same at any resolution, and the whole-face mask used
//! by style transfer is expanded and feathered past the outermost landmarks.

use imageproc::point::Point;
use nalgebra::Vector2;

use crate::{
    config::{FaceMaskPresets, MakeupPresets},
    error::ErrorKind,
    image::{draw, kernel_sigma, Mask, Resolution},
    landmark::Landmarks,
};

/// Fills a polygon with `value`, without any softening.
pub fn hard_polygon(res: Resolution, points: &[Point<i32>], value: u8) -> Mask {
    let mut mask = Mask::new(res);
    draw::polygon(&mut mask, points).value(value);
    mask
}

/// Fills the union of `polygons` with `value` and blurs the result.
pub fn soft_polygons(res: Resolution, polygons: &[&[Point<i32>]], value: u8, sigma: f32) -> Mask {
    let mut mask = Mask::new(res);
    for points in polygons {
        draw::polygon(&mut mask, points).value(value);
    }
    mask.blur(sigma)
}

/// Returns the eyeshadow blur radius for an image of the given width.
pub fn eyeshadow_sigma(width: u32, presets: &MakeupPresets) -> f32 {
    let scaled = (width as f32 * presets.eyeshadow_blur_width_fraction) as u32;
    scaled.max(presets.eyeshadow_min_blur) as f32
}

/// Placement of the two blush ellipses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlushGeometry {
    pub left_center: Point<i32>,
    pub right_center: Point<i32>,
    /// Horizontal radius of both ellipses, in pixels.
    pub radius: i32,
}

impl BlushGeometry {
    /// Derives the blush placement from the cheek contours.
    ///
    /// The ellipses are centered on the cheek centroids. The distance between the eye centers
    /// serves as a measure of the face size; if the eyes could not be located, a radius
    /// proportional to the image width is used instead.
    pub fn new(
        left_cheek: &[Point<i32>],
        right_cheek: &[Point<i32>],
        eyes: Option<(&[Point<i32>], &[Point<i32>])>,
        width: u32,
        intensity: f32,
        presets: &MakeupPresets,
    ) -> Self {
        let width = width as f32;
        let eye_distance = eyes.and_then(|(left, right)| {
            let left = centroid(left)?;
            let right = centroid(right)?;
            Some((left - right).norm())
        });
        let radius = match eye_distance {
            Some(dist) => {
                (dist * presets.blush_eye_factor * intensity + width * presets.blush_width_fraction)
                    as i32
            }
            None => {
                log::debug!("eyes unavailable, estimating blush size from image width");
                (width * presets.blush_fallback_width_fraction * intensity
                    + presets.blush_fallback_offset) as i32
            }
        };

        let to_point = |c: Option<Vector2<f32>>| {
            let c = c.unwrap_or_else(Vector2::zeros);
            Point::new(c.x as i32, c.y as i32)
        };
        Self {
            left_center: to_point(centroid(left_cheek)),
            right_center: to_point(centroid(right_cheek)),
            radius: radius.max(presets.blush_min_radius as i32),
        }
    }

    /// Vertical radius of the ellipses.
    pub fn radius_y(&self, presets: &MakeupPresets) -> i32 {
        (self.radius as f32 * presets.blush_aspect) as i32
    }

    /// Blur radius used to feather the ellipses.
    pub fn sigma(&self, presets: &MakeupPresets) -> f32 {
        self.radius as f32 * presets.blush_blur_factor
    }

    /// Renders both blush ellipses filled with `value` and feathers them.
    pub fn mask(&self, res: Resolution, value: u8, presets: &MakeupPresets) -> Mask {
        let mut mask = Mask::new(res);
        let ry = self.radius_y(presets);
        for center in [self.left_center, self.right_center] {
            draw::ellipse(&mut mask, center.x, center.y, self.radius, ry).value(value);
        }
        mask.blur(self.sigma(presets))
    }
}

/// Returns the mean of `points`, or `None` if there are none.
pub fn centroid(points: &[Point<i32>]) -> Option<Vector2<f32>> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vector2::zeros(), |acc: Vector2<f32>, p| {
            acc + Vector2::new(p.x as f32, p.y as f32)
        });
    Some(sum / points.len() as f32)
}

/// Builds the soft mask covering the whole face.
///
/// The convex hull of all landmarks is filled, dilated and then blurred, so that the mask
/// reaches a bit past the jaw line and hairline and fades out smoothly.
pub fn face_mask(
    landmarks: &Landmarks,
    res: Resolution,
    presets: &FaceMaskPresets,
) -> Result<Mask, ErrorKind> {
    let points = landmarks.pixel_points(0..landmarks.len(), res);
    if !spans_area(&points) {
        return Err(ErrorKind::DegenerateGeometry("landmarks do not span an area"));
    }

    let hull = imageproc::geometry::convex_hull(&points);
    if hull.len() < 3 {
        return Err(ErrorKind::DegenerateGeometry("convex hull has fewer than 3 vertices"));
    }
    log::trace!("face hull: {} of {} points", hull.len(), points.len());

    let mask = hard_polygon(res, &hull, 255)
        .dilate(presets.dilate_kernel, presets.dilate_iterations)
        .blur(kernel_sigma(presets.blur_kernel));
    Ok(mask)
}

/// Returns whether `points` contains three points that are not collinear.
fn spans_area(points: &[Point<i32>]) -> bool {
    let Some(&a) = points.first() else {
        return false;
    };
    let Some(&b) = points.iter().find(|&&p| p != a) else {
        return false;
    };
    points.iter().any(|c| {
        let cross = i64::from(b.x - a.x) * i64::from(c.y - a.y)
            - i64::from(b.y - a.y) * i64::from(c.x - a.x);
        cross != 0
    })
}
