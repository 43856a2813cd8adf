//! Face landmarks and their mapping to pixel coordinates.
//!
//! Landmark detection is performed by an external detector, wrapped in a [`LandmarkDetector`].
//! The detector is constructed once by the caller and then passed into every compositing call.
//!
//! [`Precomputed`] is a detector that returns landmarks which were computed ahead of time (for
//! example by a MediaPipe Face Mesh script), stored as JSON:
//!
//! ```json
//! { "landmarks": [[0.412, 0.655], [0.417, 0.701], ...] }
//! ```
//!
//! `{"landmarks": null}` describes an image in which no face was found.

use std::{fs, ops::Index, path::Path};

use imageproc::point::Point;
use serde::{Deserialize, Serialize};

use crate::{
    error::ErrorKind,
    face::Region,
    image::{draw, Color, Image, Resolution},
};

/// Minimum number of usable points for a region to be drawable as a polygon.
pub const MIN_REGION_POINTS: usize = 3;

/// Landmarks of a single face, in normalized image coordinates.
///
/// Positions are `[x, y]` pairs where `[0.0, 0.0]` is the top left and `[1.0, 1.0]` the bottom
/// right corner of the image. Detectors may report points slightly outside of that range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Landmarks {
    positions: Vec<[f32; 2]>,
}

impl Landmarks {
    pub fn new(positions: Vec<[f32; 2]>) -> Self {
        Self { positions }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<[f32; 2]> {
        self.positions.get(index).copied()
    }

    pub fn positions(&self) -> &[[f32; 2]] {
        &self.positions
    }

    /// Maps the landmarks at `indices` to pixel coordinates in an image of size `res`.
    ///
    /// Indices that don't exist and points outside the normalized `[0, 1]` range are skipped.
    /// Coordinates are rounded to the nearest pixel and clamped to the image.
    pub fn pixel_points<I>(&self, indices: I, res: Resolution) -> Vec<Point<i32>>
    where
        I: IntoIterator<Item = usize>,
    {
        if res.is_empty() {
            return Vec::new();
        }

        indices
            .into_iter()
            .filter_map(|i| self.get(i))
            .filter(|&[x, y]| (0.0..=1.0).contains(&x) && (0.0..=1.0).contains(&y))
            .map(|[x, y]| Point::new(to_pixel(x, res.width()), to_pixel(y, res.height())))
            .collect()
    }

    /// Draws a marker at every landmark position.
    pub fn draw(&self, image: &mut Image) {
        self.draw_markers(image, 0..self.len(), Color::GREEN);
    }

    /// Draws markers at the landmarks of a single region.
    pub fn draw_region(&self, image: &mut Image, region: &Region) {
        self.draw_markers(image, region.indices.iter().copied(), Color::RED);
    }

    fn draw_markers<I>(&self, image: &mut Image, indices: I, color: Color)
    where
        I: IntoIterator<Item = usize>,
    {
        let res = image.resolution();
        for p in self.pixel_points(indices, res) {
            draw::marker(image, p.x, p.y).size(3).color(color);
        }
    }
}

impl Index<usize> for Landmarks {
    type Output = [f32; 2];

    fn index(&self, index: usize) -> &[f32; 2] {
        &self.positions[index]
    }
}

fn to_pixel(norm: f32, dim: u32) -> i32 {
    let max = dim.saturating_sub(1).min(i32::MAX as u32) as i32;
    ((norm * dim as f32).round() as i32).clamp(0, max)
}

/// Maps a named region to pixel coordinates.
///
/// Returns [`ErrorKind::NoFaceDetected`] if `landmarks` is `None`, and
/// [`ErrorKind::RegionUnavailable`] if fewer than [`MIN_REGION_POINTS`] usable points remain,
/// so that callers can tell a missing face apart from a single missing region.
pub fn region_points(
    landmarks: Option<&Landmarks>,
    region: &Region,
    res: Resolution,
) -> Result<Vec<Point<i32>>, ErrorKind> {
    let landmarks = landmarks.ok_or(ErrorKind::NoFaceDetected)?;
    let points = landmarks.pixel_points(region.indices.iter().copied(), res);
    if points.len() < MIN_REGION_POINTS {
        return Err(ErrorKind::RegionUnavailable {
            region: region.name,
            found: points.len(),
        });
    }
    Ok(points)
}

/// A face landmark detector.
///
/// Implementations find at most one face; `None` means that no face was found in `image`.
/// Detection must be deterministic for a given image.
pub trait LandmarkDetector {
    fn detect(&mut self, image: &Image) -> Option<Landmarks>;
}

impl<D: LandmarkDetector + ?Sized> LandmarkDetector for &mut D {
    fn detect(&mut self, image: &Image) -> Option<Landmarks> {
        (**self).detect(image)
    }
}

impl<D: LandmarkDetector + ?Sized> LandmarkDetector for Box<D> {
    fn detect(&mut self, image: &Image) -> Option<Landmarks> {
        (**self).detect(image)
    }
}

/// A [`LandmarkDetector`] returning a fixed, previously computed result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Precomputed {
    landmarks: Option<Landmarks>,
}

impl Precomputed {
    pub fn new(landmarks: Option<Landmarks>) -> Self {
        Self { landmarks }
    }

    /// A detector that never finds a face.
    pub fn no_face() -> Self {
        Self { landmarks: None }
    }

    /// Loads a precomputed detection result from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let this = Self::from_json(&fs::read_to_string(path)?)?;
        log::debug!(
            "loaded {} landmark(s) from '{}'",
            this.landmarks.as_ref().map_or(0, |lms| lms.len()),
            path.display(),
        );
        Ok(this)
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn landmarks(&self) -> Option<&Landmarks> {
        self.landmarks.as_ref()
    }
}

impl LandmarkDetector for Precomputed {
    fn detect(&mut self, _image: &Image) -> Option<Landmarks> {
        self.landmarks.clone()
    }
}
