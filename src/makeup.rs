//! Landmark-guided makeup.
//!
//! Every enabled effect is rendered into its own colored layer, and the layers are composited
//! onto one transparent overlay in [`LAYER_ORDER`]. The overlay is then composited onto the
//! photo once, so overlapping effects stack the same way regardless of how they were enabled.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    color,
    config::{MakeupPresets, Presets},
    error::{ErrorKind, Outcome},
    face::regions,
    image::{Color, Image, Mask, Resolution},
    landmark::{region_points, LandmarkDetector, Landmarks},
    mask::{self, BlushGeometry},
    timer::Timer,
};

/// A makeup effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    Lips,
    Eyeshadow,
    Blush,
}

/// The order in which effect layers are stacked; later layers end up on top.
pub const LAYER_ORDER: [Effect; 3] = [Effect::Lips, Effect::Eyeshadow, Effect::Blush];

impl Effect {
    pub fn name(self) -> &'static str {
        match self {
            Effect::Lips => "lips",
            Effect::Eyeshadow => "eyeshadow",
            Effect::Blush => "blush",
        }
    }

    /// Layer opacity of this effect at full intensity, as a fraction of 255.
    fn alpha_factor(self, presets: &MakeupPresets) -> f32 {
        match self {
            Effect::Lips => presets.lip_alpha,
            Effect::Eyeshadow => presets.eyeshadow_alpha,
            Effect::Blush => presets.blush_alpha,
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Makeup settings, as provided by a user.
///
/// Colors are hex specifications (`#RRGGBB` or `#RGB`). Per-effect intensities default to the
/// global [`intensity`](Self::intensity). Deserializing accepts both `lip_*` and `lips_*`
/// spellings of the lip fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MakeupOptions {
    pub intensity: f32,

    #[serde(alias = "apply_lip")]
    pub apply_lips: bool,
    #[serde(alias = "lips_color")]
    pub lip_color: String,
    #[serde(alias = "lips_intensity")]
    pub lip_intensity: Option<f32>,

    pub apply_eyeshadow: bool,
    pub eyeshadow_color: String,
    pub eyeshadow_intensity: Option<f32>,

    pub apply_blush: bool,
    pub blush_color: String,
    pub blush_intensity: Option<f32>,
}

impl Default for MakeupOptions {
    fn default() -> Self {
        Self {
            intensity: 0.5,
            apply_lips: false,
            lip_color: "#E64E6B".into(),
            lip_intensity: None,
            apply_eyeshadow: false,
            eyeshadow_color: "#8A5A94".into(),
            eyeshadow_intensity: None,
            apply_blush: false,
            blush_color: "#F08080".into(),
            blush_intensity: None,
        }
    }
}

impl MakeupOptions {
    fn settings(&self, effect: Effect) -> (bool, &str, Option<f32>) {
        match effect {
            Effect::Lips => (self.apply_lips, &self.lip_color, self.lip_intensity),
            Effect::Eyeshadow => (
                self.apply_eyeshadow,
                &self.eyeshadow_color,
                self.eyeshadow_intensity,
            ),
            Effect::Blush => (self.apply_blush, &self.blush_color, self.blush_intensity),
        }
    }

    /// Validates the options, producing the list of effect layers to render.
    ///
    /// Invalid colors are replaced by [`color::DEFAULT_COLOR`] and recorded in
    /// [`MakeupPlan::notes`]. Intensities are clamped to `[0, 1]`.
    pub fn resolve(&self) -> MakeupPlan {
        let mut notes = Vec::new();
        let layers = LAYER_ORDER
            .into_iter()
            .filter_map(|effect| {
                let (enabled, spec, intensity) = self.settings(effect);
                if !enabled {
                    return None;
                }
                let color = color::parse_hex(spec).unwrap_or_else(|e| {
                    log::warn!("{effect}: {e}, using {:?}", color::DEFAULT_COLOR);
                    notes.push(e);
                    color::DEFAULT_COLOR
                });
                Some(Layer {
                    effect,
                    color,
                    intensity: clamp_intensity(intensity.unwrap_or(self.intensity)),
                })
            })
            .collect();
        MakeupPlan { layers, notes }
    }
}

fn clamp_intensity(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// A single effect layer to render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer {
    pub effect: Effect,
    pub color: Color,
    pub intensity: f32,
}

impl Layer {
    /// Returns the layer opacity.
    pub fn alpha(&self, presets: &MakeupPresets) -> u8 {
        (255.0 * self.intensity * self.effect.alpha_factor(presets)) as u8
    }
}

/// Validated makeup settings, produced by [`MakeupOptions::resolve`].
#[derive(Debug, Clone, PartialEq)]
pub struct MakeupPlan {
    /// Enabled layers, in [`LAYER_ORDER`].
    pub layers: Vec<Layer>,
    /// Issues found while validating the options.
    pub notes: Vec<ErrorKind>,
}

/// Applies makeup to the face in `photo`.
///
/// Fails with [`ErrorKind::NoFaceDetected`] if `detector` finds no face. Effects whose landmarks
/// are unusable are skipped and noted, while the remaining effects are still applied. If no
/// effect was enabled or applicable, the result is an unchanged copy of `photo`.
pub fn apply<D: LandmarkDetector + ?Sized>(
    detector: &mut D,
    photo: &Image,
    options: &MakeupOptions,
    presets: &Presets,
) -> Outcome {
    let MakeupPlan { layers, mut notes } = options.resolve();

    let mut t_detect = Timer::new("detect");
    let mut t_render = Timer::new("render");
    let Some(landmarks) = t_detect.time(|| detector.detect(photo)) else {
        return Outcome::failed(photo.clone(), ErrorKind::NoFaceDetected).with_notes(notes);
    };

    let res = photo.resolution();
    let mut overlay = Image::new(res.width(), res.height());
    let mut applied = Vec::new();
    for layer in &layers {
        let mask = t_render.time(|| layer_mask(layer, &landmarks, res, &presets.makeup));
        match mask {
            Ok(mask) => {
                let layer_image = Image::from_mask(layer.color, &mask);
                overlay.blend_from(&layer_image);
                applied.push(layer.effect);
            }
            Err(e) => {
                log::warn!("skipping {}: {e}", layer.effect);
                notes.push(e);
            }
        }
    }
    log::debug!("{t_detect}, {t_render}");

    if applied.is_empty() {
        log::debug!("no makeup applied");
        return Outcome::unchanged(photo.clone()).with_notes(notes);
    }
    log::debug!("applied {}", itertools::join(&applied, ", "));

    let mut out = photo.clone();
    out.blend_from(&overlay);
    Outcome::applied(out.flatten()).with_notes(notes)
}

/// Renders the opacity mask of a single layer.
fn layer_mask(
    layer: &Layer,
    landmarks: &Landmarks,
    res: Resolution,
    presets: &MakeupPresets,
) -> Result<Mask, ErrorKind> {
    let points = |region| region_points(Some(landmarks), &region, res);
    let alpha = layer.alpha(presets);

    match layer.effect {
        Effect::Lips => {
            let lips = points(regions::LIPS_OUTER)?;
            Ok(mask::hard_polygon(res, &lips, alpha))
        }
        Effect::Eyeshadow => {
            let left = points(regions::LEFT_EYE)?;
            let right = points(regions::RIGHT_EYE)?;
            let sigma = mask::eyeshadow_sigma(res.width(), presets);
            Ok(mask::soft_polygons(
                res,
                &[left.as_slice(), right.as_slice()],
                alpha,
                sigma,
            ))
        }
        Effect::Blush => {
            let left = points(regions::LEFT_CHEEK)?;
            let right = points(regions::RIGHT_CHEEK)?;
            let left_eye = points(regions::LEFT_EYE).ok();
            let right_eye = points(regions::RIGHT_EYE).ok();
            let eyes = match (&left_eye, &right_eye) {
                (Some(l), Some(r)) => Some((l.as_slice(), r.as_slice())),
                _ => None,
            };
            let geometry =
                BlushGeometry::new(&left, &right, eyes, res.width(), layer.intensity, presets);
            log::trace!("blush: {geometry:?}");
            Ok(geometry.mask(res, alpha, presets))
        }
    }
}
