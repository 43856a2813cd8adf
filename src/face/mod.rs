//! Face mesh topology.
//!
//! Landmark detection itself is performed by an external detector (see
//! [`LandmarkDetector`](crate::landmark::LandmarkDetector)); this module only knows which
//! landmarks make up which part of the face.

pub mod regions;

pub use regions::{Region, NUM_LANDMARKS};
