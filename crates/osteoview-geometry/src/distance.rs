//! Point-to-surface distance fields between two meshes.
//!
//! For every vertex of mesh A this computes the Euclidean distance to the
//! closest point anywhere on mesh B's triangles (a true closest-point
//! query, not nearest-vertex). A uniform grid over B's triangles keeps
//! each query local instead of scanning every triangle.

use glam::{UVec3, Vec3};
use osteoview_core::error::{OsteoviewError, Result};

use crate::mesh::Mesh;

/// Computes the per-vertex distance field from `mesh_a` to `mesh_b`.
///
/// Returns a copy of `mesh_a` carrying the distances as its scalar
/// attribute, with the scalar range recomputed. All distances are
/// non-negative, and a vertex lying exactly on `mesh_b` maps to zero
/// within numerical tolerance.
///
/// # Errors
/// `EmptyMesh` when `mesh_b` has no triangles to measure against.
pub fn compute_distance(mesh_a: &Mesh, mesh_b: &Mesh) -> Result<Mesh> {
    if mesh_b.is_empty() {
        return Err(OsteoviewError::EmptyMesh(
            "distance target has no triangles".into(),
        ));
    }

    let index = TriangleGrid::build(mesh_b);
    let distances: Vec<f32> = mesh_a
        .vertices()
        .iter()
        .map(|&v| index.distance_to_surface(v))
        .collect();

    mesh_a.with_scalars(distances)
}

/// Returns the closest point to `p` on triangle `(a, b, c)`.
///
/// The standard Voronoi-region walk: test the corner, edge and face
/// regions of the triangle in turn.
#[must_use]
pub fn closest_point_on_triangle(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }

    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return a + ab * v;
    }

    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return a + ac * w;
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + (c - b) * w;
    }

    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    a + ab * v + ac * w
}

/// Uniform spatial grid binning a mesh's triangles by bounding box.
struct TriangleGrid {
    vertices: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    bound_min: Vec3,
    cell_size: Vec3,
    res: UVec3,
    cells: Vec<Vec<u32>>,
}

impl TriangleGrid {
    /// Bins `mesh`'s triangles into a grid sized to roughly one triangle
    /// per cell.
    fn build(mesh: &Mesh) -> Self {
        let (bound_min, bound_max) = mesh.bounds();
        let extent = (bound_max - bound_min).max(Vec3::splat(1e-6));

        let target = (mesh.num_triangles() as f32).cbrt().ceil();
        let res = UVec3::new(
            (target.min(64.0) as u32).max(1),
            (target.min(64.0) as u32).max(1),
            (target.min(64.0) as u32).max(1),
        );
        let cell_size = extent / res.as_vec3();

        let mut grid = Self {
            vertices: mesh.vertices().to_vec(),
            triangles: mesh.triangles().to_vec(),
            bound_min,
            cell_size,
            res,
            cells: vec![Vec::new(); (res.x * res.y * res.z) as usize],
        };

        for (ti, tri) in grid.triangles.iter().enumerate() {
            let a = grid.vertices[tri[0] as usize];
            let b = grid.vertices[tri[1] as usize];
            let c = grid.vertices[tri[2] as usize];
            let lo = grid.cell_of(a.min(b).min(c));
            let hi = grid.cell_of(a.max(b).max(c));
            for i in lo.x..=hi.x {
                for j in lo.y..=hi.y {
                    for k in lo.z..=hi.z {
                        let slot = ((i * grid.res.y + j) * grid.res.z + k) as usize;
                        grid.cells[slot].push(ti as u32);
                    }
                }
            }
        }

        grid
    }

    /// The grid cell containing `p`, clamped to the grid.
    fn cell_of(&self, p: Vec3) -> UVec3 {
        let t = (p - self.bound_min) / self.cell_size;
        UVec3::new(
            (t.x.floor().max(0.0) as u32).min(self.res.x - 1),
            (t.y.floor().max(0.0) as u32).min(self.res.y - 1),
            (t.z.floor().max(0.0) as u32).min(self.res.z - 1),
        )
    }

    /// Distance from `p` to the nearest point on any indexed triangle.
    ///
    /// Searches expanding shells of cells around `p`'s cell; a shell at
    /// Chebyshev ring `r` cannot contain anything closer than
    /// `(r - 1) * min_cell_edge`, so the walk stops as soon as that lower
    /// bound exceeds the best distance found.
    fn distance_to_surface(&self, p: Vec3) -> f32 {
        let home = self.cell_of(p);
        let min_edge = self.cell_size.min_element();
        let max_ring = self.res.max_element();

        let mut best_sq = f32::INFINITY;

        for ring in 0..=max_ring {
            if best_sq.is_finite() {
                let lower = (ring.saturating_sub(1)) as f32 * min_edge;
                if lower * lower > best_sq {
                    break;
                }
            }
            self.scan_ring(home, ring, p, &mut best_sq);
        }

        best_sq.sqrt()
    }

    /// Tests every triangle in the cells of the given Chebyshev ring.
    fn scan_ring(&self, home: UVec3, ring: u32, p: Vec3, best_sq: &mut f32) {
        let r = ring as i64;
        let (hx, hy, hz) = (home.x as i64, home.y as i64, home.z as i64);

        for di in -r..=r {
            for dj in -r..=r {
                for dk in -r..=r {
                    // Ring surface only; inner cells were already scanned.
                    if di.abs().max(dj.abs()).max(dk.abs()) != r {
                        continue;
                    }
                    let (i, j, k) = (hx + di, hy + dj, hz + dk);
                    if i < 0
                        || j < 0
                        || k < 0
                        || i >= i64::from(self.res.x)
                        || j >= i64::from(self.res.y)
                        || k >= i64::from(self.res.z)
                    {
                        continue;
                    }
                    let slot = ((i as u32 * self.res.y + j as u32) * self.res.z + k as u32)
                        as usize;
                    for &ti in &self.cells[slot] {
                        let tri = self.triangles[ti as usize];
                        let closest = closest_point_on_triangle(
                            p,
                            self.vertices[tri[0] as usize],
                            self.vertices[tri[1] as usize],
                            self.vertices[tri[2] as usize],
                        );
                        *best_sq = best_sq.min((p - closest).length_squared());
                    }
                }
            }
        }
    }
}
