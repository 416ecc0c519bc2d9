//! Clipping a mesh against an implicit primitive.

use std::collections::HashMap;

use glam::Vec3;
use osteoview_core::implicit::ImplicitPrimitive;

use crate::mesh::Mesh;

/// Clips `mesh` against `primitive`, keeping the requested side.
///
/// With `keep_negative` set, the portion where the primitive evaluates
/// negative (inside) is kept; otherwise the positive (outside) portion.
/// Triangles entirely on the kept side pass through unchanged; triangles
/// entirely on the discarded side are dropped; triangles straddling the
/// boundary are re-triangulated with new vertices interpolated exactly onto
/// the zero crossing. Vertices evaluating to exactly zero count as kept, so
/// a triangle with all three vertices on the boundary survives instead of
/// opening a spurious hole.
///
/// A per-vertex scalar attribute, when present, is carried through and
/// interpolated onto boundary vertices.
#[must_use]
pub fn clip(mesh: &Mesh, primitive: &ImplicitPrimitive, keep_negative: bool) -> Mesh {
    let vertices = mesh.vertices();
    let scalars = mesh.scalars();

    // Signed "keep" value per vertex: non-negative means kept.
    let keep_values: Vec<f32> = vertices
        .iter()
        .map(|&v| {
            let f = primitive.eval(v);
            if keep_negative {
                -f
            } else {
                f
            }
        })
        .collect();

    let mut builder = ClipBuilder::new(vertices, scalars, &keep_values);

    for tri in mesh.triangles() {
        let kept = [
            keep_values[tri[0] as usize] >= 0.0,
            keep_values[tri[1] as usize] >= 0.0,
            keep_values[tri[2] as usize] >= 0.0,
        ];
        match kept.iter().filter(|&&k| k).count() {
            3 => builder.push_triangle(*tri),
            0 => {}
            _ => builder.push_clipped(*tri),
        }
    }

    builder.finish()
}

/// Accumulates the clipped mesh, deduplicating original vertices by index
/// and boundary vertices by the edge they were born on.
struct ClipBuilder<'a> {
    src_vertices: &'a [Vec3],
    src_scalars: Option<&'a [f32]>,
    keep_values: &'a [f32],
    vertices: Vec<Vec3>,
    scalars: Vec<f32>,
    triangles: Vec<[u32; 3]>,
    // Original vertex index -> output index.
    vertex_map: HashMap<u32, u32>,
    // Sorted source edge -> output index of its boundary crossing.
    edge_map: HashMap<(u32, u32), u32>,
}

impl<'a> ClipBuilder<'a> {
    fn new(
        src_vertices: &'a [Vec3],
        src_scalars: Option<&'a [f32]>,
        keep_values: &'a [f32],
    ) -> Self {
        Self {
            src_vertices,
            src_scalars,
            keep_values,
            vertices: Vec::new(),
            scalars: Vec::new(),
            triangles: Vec::new(),
            vertex_map: HashMap::new(),
            edge_map: HashMap::new(),
        }
    }

    fn map_vertex(&mut self, src: u32) -> u32 {
        if let Some(&idx) = self.vertex_map.get(&src) {
            return idx;
        }
        let idx = self.vertices.len() as u32;
        self.vertices.push(self.src_vertices[src as usize]);
        if let Some(values) = self.src_scalars {
            self.scalars.push(values[src as usize]);
        }
        self.vertex_map.insert(src, idx);
        idx
    }

    fn boundary_vertex(&mut self, a: u32, b: u32) -> u32 {
        let key = if a < b { (a, b) } else { (b, a) };
        if let Some(&idx) = self.edge_map.get(&key) {
            return idx;
        }
        let da = self.keep_values[key.0 as usize];
        let db = self.keep_values[key.1 as usize];
        let t = da / (da - db);
        let pa = self.src_vertices[key.0 as usize];
        let pb = self.src_vertices[key.1 as usize];
        let idx = self.vertices.len() as u32;
        self.vertices.push(pa.lerp(pb, t));
        if let Some(values) = self.src_scalars {
            let sa = values[key.0 as usize];
            let sb = values[key.1 as usize];
            self.scalars.push(sa + t * (sb - sa));
        }
        self.edge_map.insert(key, idx);
        idx
    }

    fn push_triangle(&mut self, tri: [u32; 3]) {
        let mapped = [
            self.map_vertex(tri[0]),
            self.map_vertex(tri[1]),
            self.map_vertex(tri[2]),
        ];
        self.triangles.push(mapped);
    }

    /// Clips one straddling triangle against the kept half-space and fan
    /// triangulates the resulting polygon, preserving winding.
    fn push_clipped(&mut self, tri: [u32; 3]) {
        let mut polygon: Vec<u32> = Vec::with_capacity(4);

        for i in 0..3 {
            let a = tri[i];
            let b = tri[(i + 1) % 3];
            let da = self.keep_values[a as usize];
            let db = self.keep_values[b as usize];

            if da >= 0.0 {
                let idx = self.map_vertex(a);
                polygon.push(idx);
            }
            if (da >= 0.0) != (db >= 0.0) {
                let idx = self.boundary_vertex(a, b);
                polygon.push(idx);
            }
        }

        for i in 1..polygon.len().saturating_sub(1) {
            self.triangles.push([polygon[0], polygon[i], polygon[i + 1]]);
        }
    }

    fn finish(self) -> Mesh {
        let mesh = Mesh::new(self.vertices, self.triangles);
        if self.src_scalars.is_some() {
            // The scalar vector was filled in lockstep with the vertices.
            mesh.with_scalars(self.scalars)
                .expect("scalar count tracks vertex count")
        } else {
            mesh
        }
    }
}
