//! Cutting a mesh into level-set contours.
//!
//! A cut does not discard geometry: it extracts the polyline where the
//! implicit function crosses a given level across the mesh surface. Each
//! straddled triangle contributes one line segment; segments are chained
//! into open or closed polylines by matching endpoints.

use std::collections::HashMap;

use glam::Vec3;
use osteoview_core::implicit::ImplicitPrimitive;

use crate::mesh::Mesh;

/// Quantization step for endpoint matching during contour chaining.
const CHAIN_TOLERANCE: f32 = 1e-5;

/// A polyline in 3D space, open or closed.
#[derive(Debug, Clone)]
pub struct Contour {
    points: Vec<Vec3>,
    closed: bool,
}

impl Contour {
    /// Creates a contour from ordered points.
    #[must_use]
    pub fn new(points: Vec<Vec3>, closed: bool) -> Self {
        Self { points, closed }
    }

    /// The ordered points of the polyline.
    #[must_use]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Whether the polyline loops back onto its first point.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the contour has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total polyline length, including the closing segment when closed.
    #[must_use]
    pub fn arc_length(&self) -> f32 {
        let mut total: f32 = self
            .points
            .windows(2)
            .map(|w| (w[1] - w[0]).length())
            .sum();
        if self.closed && self.points.len() > 2 {
            total += (self.points[0] - self.points[self.points.len() - 1]).length();
        }
        total
    }
}

/// Cuts `mesh` at the level set `primitive == level`, returning the
/// crossing contours.
///
/// Every triangle edge whose endpoint values straddle `level` contributes a
/// linearly interpolated crossing point; the per-triangle segments are
/// linked into polylines. Triangles lying entirely in the level set
/// contribute nothing (the degenerate-case policy: they belong to the
/// surface, not the curve).
#[must_use]
pub fn cut(mesh: &Mesh, primitive: &ImplicitPrimitive, level: f32) -> Vec<Contour> {
    let values: Vec<f32> = mesh
        .vertices()
        .iter()
        .map(|&v| primitive.eval(v) - level)
        .collect();

    let mut segments: Vec<[Vec3; 2]> = Vec::new();

    for tri in mesh.triangles() {
        let mut crossings: Vec<Vec3> = Vec::with_capacity(2);
        for i in 0..3 {
            let a = tri[i] as usize;
            let b = tri[(i + 1) % 3] as usize;
            let ga = values[a];
            let gb = values[b];
            if (ga < 0.0) != (gb < 0.0) {
                let t = ga / (ga - gb);
                let pa = mesh.vertices()[a];
                let pb = mesh.vertices()[b];
                crossings.push(pa.lerp(pb, t));
            }
        }
        if crossings.len() == 2 {
            segments.push([crossings[0], crossings[1]]);
        }
    }

    chain_segments(&segments)
}

/// Cuts at `count` evenly spaced levels between `low` and `high`
/// inclusive, concatenating the contours of every level.
///
/// `count = 1` cuts at `low` alone; `count = 0` yields nothing.
#[must_use]
pub fn generate_values(
    mesh: &Mesh,
    primitive: &ImplicitPrimitive,
    count: u32,
    low: f32,
    high: f32,
) -> Vec<Contour> {
    let mut contours = Vec::new();
    for i in 0..count {
        let level = if count == 1 {
            low
        } else {
            low + (high - low) * i as f32 / (count - 1) as f32
        };
        contours.extend(cut(mesh, primitive, level));
    }
    contours
}

/// Links unordered segments into polylines by hashing quantized endpoints,
/// following each chain until it closes on its start or runs out of
/// unused segments.
fn chain_segments(segments: &[[Vec3; 2]]) -> Vec<Contour> {
    if segments.is_empty() {
        return Vec::new();
    }

    let mut endpoint_map: HashMap<PointKey, Vec<usize>> = HashMap::new();
    for (i, seg) in segments.iter().enumerate() {
        endpoint_map.entry(PointKey::new(seg[0])).or_default().push(i);
        endpoint_map.entry(PointKey::new(seg[1])).or_default().push(i);
    }

    let mut used = vec![false; segments.len()];
    let mut contours = Vec::new();

    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        used[start] = true;

        let start_point = segments[start][0];
        let mut points = vec![start_point];
        let mut current = segments[start][1];
        let mut closed = false;

        loop {
            points.push(current);

            if (current - start_point).length() < CHAIN_TOLERANCE {
                points.pop();
                closed = true;
                break;
            }

            let next = endpoint_map
                .get(&PointKey::new(current))
                .and_then(|candidates| candidates.iter().find(|&&i| !used[i]).copied());

            let Some(next) = next else { break };
            used[next] = true;

            // Continue out the far end of the next segment.
            let seg = segments[next];
            current = if (seg[0] - current).length() < CHAIN_TOLERANCE {
                seg[1]
            } else {
                seg[0]
            };
        }

        if points.len() >= 2 {
            contours.push(Contour::new(points, closed));
        }
    }

    contours
}

/// Quantized point for endpoint hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PointKey {
    x: i64,
    y: i64,
    z: i64,
}

impl PointKey {
    fn new(p: Vec3) -> Self {
        Self {
            x: (p.x / CHAIN_TOLERANCE).round() as i64,
            y: (p.y / CHAIN_TOLERANCE).round() as i64,
            z: (p.z / CHAIN_TOLERANCE).round() as i64,
        }
    }
}
