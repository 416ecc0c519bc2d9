//! Geometric pipeline for osteoview.
//!
//! This crate holds the data structures and algorithms the four views are
//! built from:
//! - [`VolumetricField`], the regular scalar grid loaded from a scan
//! - [`Mesh`] and [`ScalarRange`], immutable triangle surfaces
//! - [`marching_cubes::extract`], isosurface extraction
//! - [`clip::clip`] and [`contour::cut`], slicing surfaces against
//!   implicit primitives
//! - [`tube::tube`], thickening contours into renderable tubes
//! - [`distance::compute_distance`], point-to-surface distance fields
//! - [`artifact`], lossless on-disk mesh serialization

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Grid math converts between index and world space throughout
#![allow(clippy::cast_precision_loss)]

pub mod artifact;
pub mod clip;
pub mod contour;
pub mod distance;
pub mod marching_cubes;
pub mod mesh;
pub mod tube;
pub mod volume;

pub use artifact::{read_artifact, write_artifact, MeshArtifact};
pub use clip::clip;
pub use contour::{cut, generate_values, Contour};
pub use distance::compute_distance;
pub use marching_cubes::extract;
pub use mesh::{Mesh, ScalarRange};
pub use tube::tube;
pub use volume::VolumetricField;
