//! Pipeline configuration.
//!
//! All tunable constants of the pipeline live in one immutable struct that
//! is passed explicitly into the entry point. There is no module-level
//! state: the cache path, thresholds, colors and camera all travel
//! together.

use std::path::PathBuf;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::CameraParameters;

/// Configuration for the four-view visualization pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Iso-value separating bone from soft tissue.
    pub bone_threshold: f32,
    /// Iso-value separating skin from air.
    pub skin_threshold: f32,

    /// Center of the clip/reveal sphere.
    pub sphere_center: Vec3,
    /// Radius of the clip/reveal sphere.
    pub sphere_radius: f32,

    /// Shared camera for all four viewports.
    pub camera: CameraParameters,

    /// Radius of the cross-section tubes.
    pub tube_radius: f32,
    /// Number of sides of the tube cross-section polygon. No upper bound is
    /// enforced; the caller supplies a sane value.
    pub tube_sides: u32,
    /// Physical distance between consecutive cross-section bands.
    pub band_spacing: f32,

    /// Node count per axis of the auxiliary grid used to contour the reveal
    /// sphere.
    pub sphere_sample_dims: u32,
    /// Half-extent of the auxiliary grid's model bounds, centered on the
    /// origin.
    pub sphere_sample_extent: f32,

    /// Path of the persisted bone-to-skin distance mesh.
    pub cache_path: PathBuf,

    /// Render target size in pixels (width, height).
    pub render_size: (u32, u32),

    /// Background colors of the four viewports, in layout order
    /// (bottom-left, bottom-right, top-left, top-right).
    pub backgrounds: [Vec3; 4],

    /// Skin surface color.
    pub skin_color: Vec3,
    /// Bone surface color.
    pub bone_color: Vec3,
    /// Reveal sphere color.
    pub sphere_color: Vec3,
    /// Outline box color.
    pub outline_color: Vec3,
    /// Opacity of the back-face skin copy in the semi-transparency view.
    pub skin_back_opacity: f32,
    /// Opacity of the reveal sphere surface.
    pub sphere_opacity: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            bone_threshold: 73.0,
            skin_threshold: 52.0,

            sphere_center: Vec3::new(80.0, 120.0, 120.0),
            sphere_radius: 60.0,

            camera: CameraParameters::new(
                Vec3::new(-600.0, -5.0, 300.0),
                Vec3::new(70.0, 70.0, 100.0),
                -90.0,
            ),

            tube_radius: 1.0,
            tube_sides: 1000,
            band_spacing: 10.0,

            sphere_sample_dims: 100,
            sphere_sample_extent: 1000.0,

            cache_path: PathBuf::from("data/bone_distance.json"),

            render_size: (1024, 700),

            backgrounds: [
                Vec3::new(0.0, 1.0, 1.0),    // cyan
                Vec3::new(0.75, 0.75, 0.75), // grey
                Vec3::new(1.0, 0.75, 0.79),  // pink
                Vec3::new(0.6, 0.98, 0.6),   // pale green
            ],

            skin_color: Vec3::new(1.0, 0.75, 0.79),
            bone_color: Vec3::new(1.0, 1.0, 1.0),
            sphere_color: Vec3::new(1.0, 0.65, 0.0),
            outline_color: Vec3::new(0.0, 0.0, 0.0),
            skin_back_opacity: 0.5,
            sphere_opacity: 0.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds_are_ordered() {
        let config = PipelineConfig::default();
        // Bone sits above skin in scan intensity.
        assert!(config.bone_threshold > config.skin_threshold);
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = PipelineConfig::default();
        let text = serde_json::to_string(&config).unwrap();
        let back: PipelineConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back.cache_path, config.cache_path);
        assert!((back.bone_threshold - config.bone_threshold).abs() < f32::EPSILON);
        assert_eq!(back.render_size, config.render_size);
    }
}
