//! Thickening contours into tube meshes.

use glam::{Quat, Vec3};

use crate::contour::Contour;
use crate::mesh::Mesh;

/// Sweeps a regular `sides`-gon of the given `radius` along `contour`,
/// stitching consecutive rings into a closed side surface.
///
/// The cross-section is kept perpendicular to the local tangent by parallel
/// transporting the ring frame along the polyline, which avoids the sudden
/// twists a fixed reference vector would produce at steep tangents. Open
/// contours get one ring per point and no end caps: a straight 2-point
/// contour with `sides = 8` produces exactly 16 vertices and 16 triangles.
/// Closed contours additionally stitch the last ring back to the first.
///
/// `sides` is not bounded above; the caller supplies a sane value. Contours
/// with fewer than 2 distinct points yield an empty mesh.
#[must_use]
pub fn tube(contour: &Contour, radius: f32, sides: u32) -> Mesh {
    let points = dedup_points(contour);
    if points.len() < 2 || sides < 3 {
        return Mesh::empty();
    }
    let closed = contour.is_closed();
    let tangents = point_tangents(&points, closed);

    // Initial frame: any unit vector perpendicular to the first tangent.
    let mut normal = perpendicular(tangents[0]);

    let mut vertices = Vec::with_capacity(points.len() * sides as usize);
    for (i, (&p, &t)) in points.iter().zip(&tangents).enumerate() {
        if i > 0 {
            // Transport the frame across the tangent change.
            let rotation = Quat::from_rotation_arc(tangents[i - 1], t);
            normal = (rotation * normal).normalize();
        }
        let binormal = t.cross(normal).normalize();
        for k in 0..sides {
            let theta = std::f32::consts::TAU * k as f32 / sides as f32;
            vertices.push(p + radius * (theta.cos() * normal + theta.sin() * binormal));
        }
    }

    let ring = |i: usize, k: u32| (i as u32 * sides) + (k % sides);
    let mut triangles = Vec::new();
    let spans = if closed { points.len() } else { points.len() - 1 };
    for i in 0..spans {
        let j = (i + 1) % points.len();
        for k in 0..sides {
            triangles.push([ring(i, k), ring(i, k + 1), ring(j, k)]);
            triangles.push([ring(j, k), ring(i, k + 1), ring(j, k + 1)]);
        }
    }

    Mesh::new(vertices, triangles)
}

/// Drops consecutive duplicate points, and the duplicated closing point of
/// a closed contour.
fn dedup_points(contour: &Contour) -> Vec<Vec3> {
    let mut points: Vec<Vec3> = Vec::with_capacity(contour.len());
    for &p in contour.points() {
        if points.last().map_or(true, |&last| (p - last).length() > 1e-7) {
            points.push(p);
        }
    }
    if contour.is_closed() && points.len() > 1 {
        if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            if (first - last).length() <= 1e-7 {
                points.pop();
            }
        }
    }
    points
}

/// Per-point unit tangents: segment directions at the ends, averaged
/// adjacent directions at interior points (wrapping when closed).
fn point_tangents(points: &[Vec3], closed: bool) -> Vec<Vec3> {
    let n = points.len();
    let seg_dir = |i: usize| (points[(i + 1) % n] - points[i]).normalize_or_zero();

    (0..n)
        .map(|i| {
            let t = if closed {
                seg_dir((i + n - 1) % n) + seg_dir(i)
            } else if i == 0 {
                seg_dir(0)
            } else if i == n - 1 {
                seg_dir(n - 2)
            } else {
                seg_dir(i - 1) + seg_dir(i)
            };
            let t = t.normalize_or_zero();
            // Collapsed tangent (a hairpin): fall back to one side.
            if t.length_squared() < 0.5 {
                seg_dir(i.min(n - 2))
            } else {
                t
            }
        })
        .collect()
}

/// Any unit vector perpendicular to `v`.
fn perpendicular(v: Vec3) -> Vec3 {
    let axis = if v.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
    v.cross(axis).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_point_contour_counts() {
        let contour = Contour::new(
            vec![Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0)],
            false,
        );
        let mesh = tube(&contour, 1.0, 8);
        assert_eq!(mesh.num_vertices(), 16);
        assert_eq!(mesh.num_triangles(), 16);
    }

    #[test]
    fn test_ring_vertices_sit_at_radius() {
        let contour = Contour::new(
            vec![Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0)],
            false,
        );
        let mesh = tube(&contour, 2.0, 16);
        for (i, v) in mesh.vertices().iter().enumerate() {
            let ring_center = if i < 16 { Vec3::ZERO } else { Vec3::new(0.0, 0.0, 5.0) };
            let d = (*v - ring_center).length();
            assert!((d - 2.0).abs() < 1e-5, "vertex {i} at distance {d}");
            // Rings are perpendicular to the +Z tangent.
            assert!((v.z - ring_center.z).abs() < 1e-5);
        }
    }

    #[test]
    fn test_degenerate_contours_yield_empty() {
        assert!(tube(&Contour::new(vec![], false), 1.0, 8).is_empty());
        assert!(tube(&Contour::new(vec![Vec3::ONE], false), 1.0, 8).is_empty());
        assert!(tube(
            &Contour::new(vec![Vec3::ONE, Vec3::ONE, Vec3::ONE], false),
            1.0,
            8
        )
        .is_empty());
    }

    #[test]
    fn test_closed_contour_wraps_around() {
        // A closed square loop: 4 rings, stitched 4 times.
        let contour = Contour::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(10.0, 0.0, 0.0),
                Vec3::new(10.0, 10.0, 0.0),
                Vec3::new(0.0, 10.0, 0.0),
            ],
            true,
        );
        let mesh = tube(&contour, 0.5, 6);
        assert_eq!(mesh.num_vertices(), 4 * 6);
        assert_eq!(mesh.num_triangles(), 4 * 6 * 2);
    }

    #[test]
    fn test_bent_polyline_rings_follow_tangent() {
        let contour = Contour::new(
            vec![
                Vec3::ZERO,
                Vec3::new(10.0, 0.0, 0.0),
                Vec3::new(10.0, 10.0, 0.0),
            ],
            false,
        );
        let mesh = tube(&contour, 1.0, 12);
        assert_eq!(mesh.num_vertices(), 3 * 12);
        assert_eq!(mesh.num_triangles(), 2 * 12 * 2);
        // Every ring vertex stays within radius of its ring center.
        for (i, v) in mesh.vertices().iter().enumerate() {
            let center = contour.points()[i / 12];
            assert!((*v - center).length() < 1.0 + 1e-4);
        }
    }

    #[test]
    fn test_more_sides_make_rounder_tubes() {
        let contour = Contour::new(vec![Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0)], false);
        let coarse = tube(&contour, 1.0, 8);
        let fine = tube(&contour, 1.0, 64);
        assert!(fine.num_triangles() > coarse.num_triangles());
        // The side surface area approaches the cylinder's 2*pi*r*h.
        let exact = std::f32::consts::TAU;
        let err_coarse = (coarse.surface_area() - exact).abs();
        let err_fine = (fine.surface_area() - exact).abs();
        assert!(err_fine < err_coarse);
    }
}
