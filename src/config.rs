//! Tunable compositing presets.
//!
//! Every empirically chosen constant used by the compositors lives here, so that it can be
//! adjusted from a JSON file without touching the algorithms. All fields have defaults, so a
//! preset file only needs to list what it changes:
//!
//! ```json
//! { "face_mask": { "dilate_iterations": 2 }, "recolor": { "value_mix": 0.5 } }
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

/// The complete set of tunable presets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Presets {
    pub makeup: MakeupPresets,
    pub face_mask: FaceMaskPresets,
    pub recolor: RecolorPresets,
}

/// Opacity and softening of the makeup regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MakeupPresets {
    /// Layer alpha of a fully intense lip color, as a fraction of 255.
    pub lip_alpha: f32,
    /// Layer alpha of fully intense eyeshadow.
    pub eyeshadow_alpha: f32,
    /// Layer alpha of fully intense blush.
    pub blush_alpha: f32,
    /// Eyeshadow blur radius as a fraction of the image width.
    pub eyeshadow_blur_width_fraction: f32,
    /// Minimum eyeshadow blur radius, in pixels.
    pub eyeshadow_min_blur: u32,
    /// Inter-eye distance multiplier of the blush radius (scaled by intensity).
    pub blush_eye_factor: f32,
    /// Image width fraction added to the blush radius.
    pub blush_width_fraction: f32,
    /// Image width fraction of the blush radius when the eyes can't be located (scaled by
    /// intensity).
    pub blush_fallback_width_fraction: f32,
    /// Constant added to the fallback blush radius.
    pub blush_fallback_offset: f32,
    /// Minimum blush radius, in pixels.
    pub blush_min_radius: u32,
    /// Vertical radius of the blush ellipse relative to its horizontal radius.
    pub blush_aspect: f32,
    /// Blush blur radius relative to the blush radius.
    pub blush_blur_factor: f32,
}

impl Default for MakeupPresets {
    fn default() -> Self {
        Self {
            lip_alpha: 0.8,
            eyeshadow_alpha: 0.6,
            blush_alpha: 0.45,
            eyeshadow_blur_width_fraction: 0.02,
            eyeshadow_min_blur: 5,
            blush_eye_factor: 0.4,
            blush_width_fraction: 0.03,
            blush_fallback_width_fraction: 0.06,
            blush_fallback_offset: 10.0,
            blush_min_radius: 10,
            blush_aspect: 1.2,
            blush_blur_factor: 2.0,
        }
    }
}

/// Construction of the soft whole-face mask used by style transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceMaskPresets {
    /// Side length of the square dilation element, in pixels.
    pub dilate_kernel: u32,
    pub dilate_iterations: u32,
    /// Gaussian kernel size (odd) of the final blur.
    pub blur_kernel: u32,
}

impl Default for FaceMaskPresets {
    fn default() -> Self {
        Self {
            dilate_kernel: 15,
            dilate_iterations: 3,
            blur_kernel: 31,
        }
    }
}

/// Garment recoloring thresholds and mixing factors.
///
/// Saturation and value are on a 0-255 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecolorPresets {
    /// Pixels with an alpha at or below this are background.
    pub alpha_threshold: u8,
    /// Pixels with a saturation at or below this are gray and keep their color.
    pub saturation_threshold: u8,
    /// Pixels with a value at or below this are shadows and keep their color.
    pub value_threshold: u8,
    /// How far saturation moves towards the target color (0 keeps the original).
    pub saturation_mix: f32,
    /// How far value moves towards the target color (0 keeps the original).
    pub value_mix: f32,
}

impl Default for RecolorPresets {
    fn default() -> Self {
        Self {
            alpha_threshold: 50,
            saturation_threshold: 25,
            value_threshold: 20,
            saturation_mix: 0.7,
            value_mix: 0.6,
        }
    }
}

impl Presets {
    /// Loads presets from a JSON file.
    ///
    /// Missing fields take their default values; out-of-range values are clamped.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Self::load_impl(path.as_ref())
    }

    fn load_impl(path: &Path) -> anyhow::Result<Self> {
        let json = fs::read_to_string(path)?;
        let presets = Self::from_json(&json)?;
        log::debug!("loaded presets from '{}'", path.display());
        Ok(presets)
    }

    /// Parses presets from a JSON string.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let presets: Presets = serde_json::from_str(json)?;
        Ok(presets.sanitize())
    }

    fn sanitize(mut self) -> Self {
        let m = &mut self.makeup;
        for factor in [&mut m.lip_alpha, &mut m.eyeshadow_alpha, &mut m.blush_alpha] {
            *factor = sanitize_unit(*factor);
        }
        for value in [
            &mut m.eyeshadow_blur_width_fraction,
            &mut m.blush_eye_factor,
            &mut m.blush_width_fraction,
            &mut m.blush_fallback_width_fraction,
            &mut m.blush_fallback_offset,
            &mut m.blush_aspect,
            &mut m.blush_blur_factor,
        ] {
            *value = sanitize_non_negative(*value);
        }

        let r = &mut self.recolor;
        r.saturation_mix = sanitize_unit(r.saturation_mix);
        r.value_mix = sanitize_unit(r.value_mix);
        self
    }
}

fn sanitize_unit(v: f32) -> f32 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn sanitize_non_negative(v: f32) -> f32 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file() {
        let presets =
            Presets::from_json(r#"{ "face_mask": { "dilate_iterations": 1 } }"#).unwrap();
        assert_eq!(presets.face_mask.dilate_iterations, 1);
        assert_eq!(presets.face_mask.dilate_kernel, 15);
        assert_eq!(presets.makeup, MakeupPresets::default());
        assert_eq!(presets.recolor, RecolorPresets::default());
    }

    #[test]
    fn clamps_out_of_range() {
        let presets = Presets::from_json(
            r#"{ "makeup": { "lip_alpha": 3.0, "blush_aspect": -1.0 }, "recolor": { "value_mix": -0.5 } }"#,
        )
        .unwrap();
        assert_eq!(presets.makeup.lip_alpha, 1.0);
        assert_eq!(presets.makeup.blush_aspect, 0.0);
        assert_eq!(presets.recolor.value_mix, 0.0);
    }

    #[test]
    fn malformed() {
        assert!(Presets::from_json("{ \"makeup\": 5 }").is_err());
        assert!(Presets::load("/nonexistent/presets.json").is_err());
    }
}
