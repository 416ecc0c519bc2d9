//! Volumetric scalar field on a regular grid.

use glam::{UVec3, Vec3};
use osteoview_core::error::{OsteoviewError, Result};
use osteoview_core::implicit::ImplicitPrimitive;

/// A regular 3D grid of scalar intensity samples.
///
/// Loaded once at startup and read-only thereafter; every extraction call
/// borrows it immutably. Samples are stored in C-contiguous order with the
/// z index fastest: the value for node `(i, j, k)` lives at
/// `(i * ny + j) * nz + k`.
#[derive(Debug, Clone)]
pub struct VolumetricField {
    dims: UVec3,
    spacing: Vec3,
    origin: Vec3,
    samples: Vec<f32>,
}

impl VolumetricField {
    /// Creates a field from dimensions, spacing, origin and samples.
    ///
    /// # Errors
    /// `MalformedVolume` when a spacing component is not strictly positive
    /// or when `samples.len()` differs from `nx * ny * nz`.
    pub fn new(dims: UVec3, spacing: Vec3, origin: Vec3, samples: Vec<f32>) -> Result<Self> {
        if spacing.min_element() <= 0.0 {
            return Err(OsteoviewError::MalformedVolume(format!(
                "spacing must be strictly positive, got {spacing:?}"
            )));
        }
        let expected = dims.x as usize * dims.y as usize * dims.z as usize;
        if samples.len() != expected {
            return Err(OsteoviewError::MalformedVolume(format!(
                "sample count {} does not match dimensions {}x{}x{} = {}",
                samples.len(),
                dims.x,
                dims.y,
                dims.z,
                expected
            )));
        }
        Ok(Self {
            dims,
            spacing,
            origin,
            samples,
        })
    }

    /// Samples an implicit primitive on a dense regular grid spanning
    /// `[bound_min, bound_max]` with `dims` nodes per axis.
    ///
    /// # Errors
    /// `MalformedVolume` when a bound is inverted or a dimension is below 2.
    pub fn sample_implicit(
        primitive: &ImplicitPrimitive,
        bound_min: Vec3,
        bound_max: Vec3,
        dims: UVec3,
    ) -> Result<Self> {
        if dims.min_element() < 2 {
            return Err(OsteoviewError::MalformedVolume(format!(
                "implicit sampling needs at least 2 nodes per axis, got {dims:?}"
            )));
        }
        let extent = bound_max - bound_min;
        if extent.min_element() <= 0.0 {
            return Err(OsteoviewError::MalformedVolume(format!(
                "inverted sample bounds: {bound_min:?}..{bound_max:?}"
            )));
        }
        let spacing = extent / (dims - UVec3::ONE).as_vec3();

        let mut samples = Vec::with_capacity(dims.x as usize * dims.y as usize * dims.z as usize);
        for i in 0..dims.x {
            for j in 0..dims.y {
                for k in 0..dims.z {
                    let p = bound_min + Vec3::new(i as f32, j as f32, k as f32) * spacing;
                    samples.push(primitive.eval(p));
                }
            }
        }
        Self::new(dims, spacing, bound_min, samples)
    }

    /// Node counts per axis.
    #[must_use]
    pub fn dims(&self) -> UVec3 {
        self.dims
    }

    /// Physical distance between adjacent nodes per axis.
    #[must_use]
    pub fn spacing(&self) -> Vec3 {
        self.spacing
    }

    /// World position of node `(0, 0, 0)`.
    #[must_use]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// The raw sample slice.
    #[must_use]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Flattens a 3D node index into the sample slice.
    #[inline]
    #[must_use]
    pub fn node_index(&self, i: u32, j: u32, k: u32) -> usize {
        (i as usize * self.dims.y as usize + j as usize) * self.dims.z as usize + k as usize
    }

    /// The sample at node `(i, j, k)`.
    #[inline]
    #[must_use]
    pub fn sample(&self, i: u32, j: u32, k: u32) -> f32 {
        self.samples[self.node_index(i, j, k)]
    }

    /// World position of node `(i, j, k)`.
    #[must_use]
    pub fn position_of_node(&self, i: u32, j: u32, k: u32) -> Vec3 {
        self.origin + Vec3::new(i as f32, j as f32, k as f32) * self.spacing
    }

    /// Minimum corner of the physical bounds.
    #[must_use]
    pub fn bound_min(&self) -> Vec3 {
        self.origin
    }

    /// Maximum corner of the physical bounds.
    #[must_use]
    pub fn bound_max(&self) -> Vec3 {
        self.origin + (self.dims.saturating_sub(UVec3::ONE)).as_vec3() * self.spacing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive_spacing() {
        let err = VolumetricField::new(
            UVec3::splat(2),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::ZERO,
            vec![0.0; 8],
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_rejects_sample_count_mismatch() {
        let err = VolumetricField::new(UVec3::splat(2), Vec3::ONE, Vec3::ZERO, vec![0.0; 7]);
        assert!(err.is_err());
    }

    #[test]
    fn test_bounds_and_positions() {
        let field = VolumetricField::new(
            UVec3::new(3, 4, 5),
            Vec3::new(2.0, 1.0, 0.5),
            Vec3::new(10.0, 0.0, -1.0),
            vec![0.0; 60],
        )
        .unwrap();
        assert_eq!(field.bound_min(), Vec3::new(10.0, 0.0, -1.0));
        assert_eq!(field.bound_max(), Vec3::new(14.0, 3.0, 1.0));
        assert_eq!(field.position_of_node(1, 2, 4), Vec3::new(12.0, 2.0, 1.0));
    }

    #[test]
    fn test_index_layout_z_fastest() {
        let samples: Vec<f32> = (0..8).map(|v| v as f32).collect();
        let field = VolumetricField::new(UVec3::splat(2), Vec3::ONE, Vec3::ZERO, samples).unwrap();
        assert!((field.sample(0, 0, 1) - 1.0).abs() < f32::EPSILON);
        assert!((field.sample(0, 1, 0) - 2.0).abs() < f32::EPSILON);
        assert!((field.sample(1, 0, 0) - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_sample_implicit_sphere() {
        let sphere = ImplicitPrimitive::sphere(Vec3::ZERO, 1.0);
        let field = VolumetricField::sample_implicit(
            &sphere,
            Vec3::splat(-2.0),
            Vec3::splat(2.0),
            UVec3::splat(5),
        )
        .unwrap();
        // Center node (2,2,2) sits at the origin, well inside the sphere.
        assert!(field.sample(2, 2, 2) < 0.0);
        // Corner node is far outside.
        assert!(field.sample(0, 0, 0) > 0.0);
        assert_eq!(field.spacing(), Vec3::ONE);
    }
}
