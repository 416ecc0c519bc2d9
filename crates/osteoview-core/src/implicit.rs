//! Implicit geometric primitives.
//!
//! An implicit primitive is a shape defined as the zero set of a scalar
//! function over 3D space: `eval(p) < 0` inside, `eval(p) > 0` outside,
//! `eval(p) == 0` exactly on the boundary surface. Primitives are stateless
//! values, cheap to clone and reusable across any number of clip and cut
//! calls.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A closed-form scalar function over 3D space.
///
/// Modeled as a closed tagged enum evaluated by a single recursive
/// evaluator, so every variant is handled exhaustively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ImplicitPrimitive {
    /// An infinite plane through `origin` with the given `normal`.
    ///
    /// Evaluates to the signed distance scaled by `|normal|`: negative
    /// behind the normal, positive in front.
    Plane { origin: Vec3, normal: Vec3 },

    /// A sphere of the given `center` and `radius`.
    ///
    /// Evaluates to `|p - center|^2 - radius^2`: negative inside,
    /// positive outside.
    Sphere { center: Vec3, radius: f32 },

    /// Boolean difference of the listed primitives: the first operand minus
    /// the union of the rest. A single-element list evaluates to its
    /// element; an empty list evaluates to `0.0` everywhere.
    Difference(Vec<ImplicitPrimitive>),
}

impl ImplicitPrimitive {
    /// Creates a plane through `origin` with unit-normalized `normal`.
    #[must_use]
    pub fn plane(origin: Vec3, normal: Vec3) -> Self {
        Self::Plane {
            origin,
            normal: normal.normalize(),
        }
    }

    /// Creates a sphere from center and radius.
    #[must_use]
    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Self::Sphere { center, radius }
    }

    /// Evaluates the primitive's scalar function at `p`.
    #[must_use]
    pub fn eval(&self, p: Vec3) -> f32 {
        match self {
            Self::Plane { origin, normal } => (p - *origin).dot(*normal),
            Self::Sphere { center, radius } => (p - *center).length_squared() - radius * radius,
            Self::Difference(operands) => {
                let mut value = 0.0_f32;
                for (i, operand) in operands.iter().enumerate() {
                    let f = operand.eval(p);
                    let f = if i == 0 { f } else { -f };
                    value = if i == 0 { f } else { value.max(f) };
                }
                value
            }
        }
    }

    /// Returns whether `p` lies strictly inside the primitive.
    #[must_use]
    pub fn contains(&self, p: Vec3) -> bool {
        self.eval(p) < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_signs() {
        let plane = ImplicitPrimitive::plane(Vec3::ZERO, Vec3::Z);
        assert!(plane.eval(Vec3::new(3.0, -2.0, 1.0)) > 0.0);
        assert!(plane.eval(Vec3::new(3.0, -2.0, -1.0)) < 0.0);
        assert!(plane.eval(Vec3::new(7.0, 9.0, 0.0)).abs() < 1e-6);
    }

    #[test]
    fn test_plane_evaluates_height_along_z() {
        // The cross-section recipe relies on a +Z plane at the origin
        // evaluating to the z coordinate itself.
        let plane = ImplicitPrimitive::plane(Vec3::ZERO, Vec3::Z);
        assert!((plane.eval(Vec3::new(40.0, 55.0, 120.5)) - 120.5).abs() < 1e-4);
    }

    #[test]
    fn test_sphere_signs() {
        let sphere = ImplicitPrimitive::sphere(Vec3::new(1.0, 0.0, 0.0), 2.0);
        assert!(sphere.contains(Vec3::new(1.0, 0.5, 0.0)));
        assert!(!sphere.contains(Vec3::new(4.0, 0.0, 0.0)));
        // Exactly on the boundary
        assert!(sphere.eval(Vec3::new(3.0, 0.0, 0.0)).abs() < 1e-5);
    }

    #[test]
    fn test_single_operand_difference_is_identity() {
        let sphere = ImplicitPrimitive::sphere(Vec3::ZERO, 1.5);
        let diff = ImplicitPrimitive::Difference(vec![sphere.clone()]);
        for p in [Vec3::ZERO, Vec3::ONE, Vec3::new(2.0, 0.0, 0.0)] {
            assert!((diff.eval(p) - sphere.eval(p)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_difference_subtracts() {
        let base = ImplicitPrimitive::sphere(Vec3::ZERO, 2.0);
        let hole = ImplicitPrimitive::sphere(Vec3::ZERO, 1.0);
        let shell = ImplicitPrimitive::Difference(vec![base, hole]);
        // Inside the hole: outside the difference
        assert!(!shell.contains(Vec3::new(0.5, 0.0, 0.0)));
        // Between the two radii: inside
        assert!(shell.contains(Vec3::new(1.5, 0.0, 0.0)));
        // Beyond the base: outside
        assert!(!shell.contains(Vec3::new(3.0, 0.0, 0.0)));
    }

    #[test]
    fn test_empty_difference() {
        let empty = ImplicitPrimitive::Difference(Vec::new());
        assert!(empty.eval(Vec3::new(5.0, -3.0, 2.0)).abs() < f32::EPSILON);
    }
}
