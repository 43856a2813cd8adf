//! Face-landmark guided photo compositing.
//!
//! `makeover` applies synthetic makeup to portraits, transfers the color grading of a reference
//! image onto a face, recolors garment sprites and places them onto photos.
//!
//! # Landmarks
//!
//! Face landmarks are produced by an external detector and handed to this crate through the
//! [`LandmarkDetector`] trait. Landmarks use the 468-point MediaPipe face mesh numbering, and
//! all coordinates are *normalized*: `(0.0, 0.0)` is the top left corner of the image and
//! `(1.0, 1.0)` the bottom right one. The named regions used for makeup are listed in
//! [`face::regions`].
//!
//! # Results
//!
//! Compositing operations never fail hard on bad input. They return an [`Outcome`], which
//! always carries a usable image, a [`Status`] describing whether the effect was applied, and
//! notes about any issue that was recovered from along the way. Only I/O and codec errors are
//! reported as [`anyhow::Error`]s.
//!
//! # Environment Variables
//!
//! * `RUST_LOG`: overrides the log filter set up by [`init_logger!`].
//!
//! [`LandmarkDetector`]: landmark::LandmarkDetector
//! [`Outcome`]: error::Outcome
//! [`Status`]: error::Status

use log::LevelFilter;

pub mod assets;
pub mod color;
pub mod config;
pub mod error;
pub mod face;
pub mod fashion;
pub mod garment;
pub mod image;
pub mod landmark;
pub mod makeup;
pub mod mask;
pub mod style;
pub mod timer;

#[cfg(test)]
mod test;

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = if cfg!(debug_assertions) {
        LevelFilter::Trace
    } else {
        LevelFilter::Debug
    };
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_CRATE_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// If `cfg!(debug_assertions)` is enabled, the calling crate and `makeover` will log at *trace*
/// level. Otherwise, they will log at *debug* level. Everything else logs at *info* level.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
