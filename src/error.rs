//! Recoverable error kinds and the result type of compositing operations.

use std::fmt;

use thiserror::Error;

use crate::image::Image;

/// A condition a compositing operation recovered from.
///
/// None of these are hard errors: every operation has a documented fallback for each kind, and
/// the kind is reported through [`Outcome`] so callers can tell a degraded result from an
/// untouched one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorKind {
    #[error("no face detected")]
    NoFaceDetected,

    #[error("region '{region}' has {found} usable landmark(s), at least 3 are needed")]
    RegionUnavailable { region: &'static str, found: usize },

    #[error("invalid color '{0}'")]
    InvalidColorSpec(String),

    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(&'static str),

    #[error("invalid scaled size {width}x{height}")]
    InvalidScale { width: i64, height: i64 },

    #[error("color transfer failed: {0}")]
    ColorTransferFailed(&'static str),
}

/// Describes what a compositing operation did to its input.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    /// The requested effect was applied.
    Applied,
    /// Nothing was requested (or nothing could be applied); the output equals the input.
    Unchanged,
    /// A fallback variant of the effect was applied instead.
    Degraded(ErrorKind),
    /// The operation failed; the output is an unmodified copy of the input.
    Failed(ErrorKind),
}

/// The result of a compositing operation.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub image: Image,
    pub status: Status,
    /// Issues that were recovered from, in the order they were encountered.
    pub notes: Vec<ErrorKind>,
}

impl Outcome {
    pub fn applied(image: Image) -> Self {
        Self::new(image, Status::Applied)
    }

    pub fn unchanged(image: Image) -> Self {
        Self::new(image, Status::Unchanged)
    }

    pub fn degraded(image: Image, kind: ErrorKind) -> Self {
        log::warn!("degraded result: {kind}");
        Self::new(image, Status::Degraded(kind))
    }

    pub fn failed(image: Image, kind: ErrorKind) -> Self {
        log::warn!("operation failed: {kind}");
        Self::new(image, Status::Failed(kind))
    }

    fn new(image: Image, status: Status) -> Self {
        Self {
            image,
            status,
            notes: Vec::new(),
        }
    }

    /// Attaches the recovered issues in `notes` to this outcome.
    pub fn with_notes(mut self, notes: Vec<ErrorKind>) -> Self {
        self.notes = notes;
        self
    }

    /// Returns `false` if the operation failed, `true` otherwise (including degraded results).
    pub fn success(&self) -> bool {
        !matches!(self.status, Status::Failed(_))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Applied => f.write_str("applied"),
            Status::Unchanged => f.write_str("unchanged"),
            Status::Degraded(kind) => write!(f, "degraded ({kind})"),
            Status::Failed(kind) => write!(f, "failed ({kind})"),
        }
    }
}
