//! Core abstractions for osteoview.
//!
//! This crate provides the leaf types shared across the pipeline:
//! - [`OsteoviewError`] and the crate-wide [`Result`] alias
//! - [`PipelineConfig`], the explicit configuration passed into the pipeline
//! - [`ImplicitPrimitive`], closed-form scalar functions used for clipping
//!   and cutting
//! - [`CameraParameters`], the fixed camera shared by all viewports
//! - [`ColorMap`], scalar-to-color lookup

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod camera;
pub mod color_map;
pub mod config;
pub mod error;
pub mod implicit;

pub use camera::CameraParameters;
pub use color_map::ColorMap;
pub use config::PipelineConfig;
pub use error::{OsteoviewError, Result};
pub use implicit::ImplicitPrimitive;

// Re-export glam types for convenience
pub use glam::{Mat4, UVec3, Vec3};
