//! Camera parameters shared by all viewports.

use glam::{Mat3, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Fixed camera parameters: position, focal point and roll.
///
/// The four viewports of a frame all reference the same camera so that
/// rotation and zoom stay visually synchronized across panels. The values
/// arrive as external configuration and are never computed by the pipeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CameraParameters {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera is looking at.
    pub focal_point: Vec3,
    /// Roll around the view axis, in degrees.
    pub roll_degrees: f32,
}

impl CameraParameters {
    /// Creates camera parameters from position, focal point and roll.
    #[must_use]
    pub fn new(position: Vec3, focal_point: Vec3, roll_degrees: f32) -> Self {
        Self {
            position,
            focal_point,
            roll_degrees,
        }
    }

    /// The normalized view direction, from the camera toward the focal point.
    #[must_use]
    pub fn look_dir(&self) -> Vec3 {
        (self.focal_point - self.position).normalize()
    }

    /// The camera frame as `(look, up, right)`, with roll applied.
    #[must_use]
    pub fn camera_frame(&self) -> (Vec3, Vec3, Vec3) {
        let look = self.look_dir();

        // World up, unless the view axis is (nearly) parallel to it.
        let world_up = if look.dot(Vec3::Y).abs() > 0.999 {
            Vec3::X
        } else {
            Vec3::Y
        };
        let up = Quat::from_axis_angle(look, self.roll_degrees.to_radians()) * world_up;

        let right = look.cross(up).normalize();
        let up = right.cross(look).normalize();
        (look, up, right)
    }

    /// Returns the view matrix (world to camera space).
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        let (look, up, right) = self.camera_frame();
        // Camera looks down -Z in eye space
        let rotation = Mat3::from_cols(right, up, -look);
        let rotation = rotation.transpose();
        let translation = -(rotation * self.position);
        Mat4::from_cols(
            rotation.col(0).extend(0.0),
            rotation.col(1).extend(0.0),
            rotation.col(2).extend(0.0),
            translation.extend(1.0),
        )
    }
}

impl Default for CameraParameters {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 10.0),
            focal_point: Vec3::ZERO,
            roll_degrees: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_look_dir() {
        let cam = CameraParameters::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, 0.0);
        assert!((cam.look_dir() - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_frame_is_orthonormal() {
        let cam = CameraParameters::new(
            Vec3::new(-600.0, -5.0, 300.0),
            Vec3::new(70.0, 70.0, 100.0),
            -90.0,
        );
        let (look, up, right) = cam.camera_frame();
        assert!(look.dot(up).abs() < 1e-5);
        assert!(look.dot(right).abs() < 1e-5);
        assert!(up.dot(right).abs() < 1e-5);
        assert!((look.length() - 1.0).abs() < 1e-5);
        assert!((up.length() - 1.0).abs() < 1e-5);
        assert!((right.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_view_matrix_maps_focal_point_onto_view_axis() {
        let cam = CameraParameters::new(Vec3::new(3.0, 2.0, 8.0), Vec3::new(1.0, -1.0, 0.5), 30.0);
        let eye = cam.view_matrix().transform_point3(cam.focal_point);
        // The focal point lies straight ahead: on the -Z axis in eye space.
        assert!(eye.x.abs() < 1e-4);
        assert!(eye.y.abs() < 1e-4);
        let expected = (cam.focal_point - cam.position).length();
        assert!((eye.z + expected).abs() < 1e-4);
    }

    #[test]
    fn test_camera_position_maps_to_origin() {
        let cam = CameraParameters::new(Vec3::new(-4.0, 7.0, 2.0), Vec3::ZERO, -45.0);
        let eye = cam.view_matrix().transform_point3(cam.position);
        assert!(eye.length() < 1e-4);
    }

    #[test]
    fn test_roll_rotates_up_vector() {
        let flat = CameraParameters::new(Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO, 0.0);
        let rolled = CameraParameters::new(Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO, 90.0);
        let (_, up_flat, _) = flat.camera_frame();
        let (_, up_rolled, _) = rolled.camera_frame();
        assert!(up_flat.dot(up_rolled).abs() < 1e-5);
    }
}
