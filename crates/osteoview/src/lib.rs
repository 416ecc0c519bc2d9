//! osteoview: a four-view anatomical surface visualization pipeline.
//!
//! Given a volumetric scan, osteoview extracts the bone and skin
//! isosurfaces and composes four synchronized viewports, each applying a
//! different technique to the same pair of surfaces:
//!
//! - **Tube cross-sections** - the skin sliced into evenly spaced
//!   horizontal bands, each thickened into a tube
//! - **Semi-transparency** - the skin clipped open at a sphere, front
//!   layer opaque and back layer translucent
//! - **Sphere reveal** - the clip sphere itself contoured and shown as a
//!   faint surface around the opened skin
//! - **Distance coloring** - the bone colored by its distance to the skin
//!
//! # Quick start
//!
//! ```no_run
//! use glam::{UVec3, Vec3};
//! use osteoview::{build_frame, PipelineConfig, VolumetricField};
//!
//! fn main() -> osteoview::Result<()> {
//!     let samples = vec![0.0; 64 * 64 * 64];
//!     let field = VolumetricField::new(
//!         UVec3::splat(64),
//!         Vec3::ONE,
//!         Vec3::ZERO,
//!         samples,
//!     )?;
//!     let frame = build_frame(&field, &PipelineConfig::default())?;
//!     println!("{} viewports ready", frame.viewports().len());
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod pipeline;
pub mod scene;
pub mod viewport;

// Re-export core types
pub use osteoview_core::{
    camera::CameraParameters,
    color_map::ColorMap,
    config::PipelineConfig,
    error::{OsteoviewError, Result},
    implicit::ImplicitPrimitive,
};

// Re-export geometry types
pub use osteoview_geometry::{
    artifact::MeshArtifact, clip::clip, contour::Contour, contour::cut,
    contour::generate_values, distance::compute_distance, marching_cubes::extract, mesh::Mesh,
    mesh::ScalarRange, tube::tube, volume::VolumetricField,
};

pub use cache::CacheKey;
pub use pipeline::build_frame;
pub use scene::{DrawStyle, Drawable, FaceCulling, Geometry, SceneNode};
pub use viewport::{quad_layout, Frame, Viewport, ViewportRect};

// Re-export glam types for convenience
pub use glam::{UVec3, Vec3};

/// Initializes logging for binaries and examples. Safe to call more than
/// once.
pub fn init_logging() {
    let _ = env_logger::try_init();
}
