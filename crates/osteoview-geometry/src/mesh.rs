//! Triangle mesh with an optional per-vertex scalar attribute.

use glam::Vec3;
use osteoview_core::error::{OsteoviewError, Result};
use serde::{Deserialize, Serialize};

/// The (min, max) range of a per-vertex scalar attribute.
///
/// Recomputed whenever the attribute is attached; `min <= max` always
/// holds for a non-empty attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalarRange {
    pub min: f32,
    pub max: f32,
}

impl ScalarRange {
    /// Computes the range of a value slice. Returns `None` for an empty
    /// slice.
    #[must_use]
    pub fn from_values(values: &[f32]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let min = values.iter().copied().fold(f32::INFINITY, f32::min);
        let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        Some(Self { min, max })
    }

    /// Width of the range.
    #[must_use]
    pub fn span(&self) -> f32 {
        self.max - self.min
    }
}

/// An immutable triangle mesh.
///
/// Vertices are 3D points; triangles index into the vertex list with
/// consistent winding. Every pipeline operation produces a new independent
/// `Mesh` rather than mutating one in place; a mesh already constructed
/// never changes.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    vertex_normals: Vec<Vec3>,
    scalars: Option<Vec<f32>>,
    scalar_range: Option<ScalarRange>,
}

impl Mesh {
    /// Creates a mesh from vertices and triangle index triples.
    ///
    /// # Panics
    /// In debug builds, panics when a triangle index is out of bounds.
    #[must_use]
    pub fn new(vertices: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Self {
        debug_assert!(
            triangles
                .iter()
                .flatten()
                .all(|&i| (i as usize) < vertices.len()),
            "triangle index out of bounds"
        );
        let vertex_normals = compute_vertex_normals(&vertices, &triangles);
        Self {
            vertices,
            triangles,
            vertex_normals,
            scalars: None,
            scalar_range: None,
        }
    }

    /// Creates an empty mesh.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns a copy of this mesh carrying the given per-vertex scalar
    /// attribute; the scalar range is recomputed from the values.
    ///
    /// # Errors
    /// `SizeMismatch` when `values.len()` differs from the vertex count.
    pub fn with_scalars(&self, values: Vec<f32>) -> Result<Self> {
        if values.len() != self.vertices.len() {
            return Err(OsteoviewError::SizeMismatch {
                expected: self.vertices.len(),
                actual: values.len(),
            });
        }
        let scalar_range = ScalarRange::from_values(&values);
        Ok(Self {
            vertices: self.vertices.clone(),
            triangles: self.triangles.clone(),
            vertex_normals: self.vertex_normals.clone(),
            scalars: Some(values),
            scalar_range,
        })
    }

    /// Concatenates several meshes into one, offsetting triangle indices.
    /// Scalar attributes are dropped (the parts need not agree on one).
    #[must_use]
    pub fn merged(parts: &[Mesh]) -> Self {
        let mut vertices = Vec::new();
        let mut triangles = Vec::new();
        for part in parts {
            let base = vertices.len() as u32;
            vertices.extend_from_slice(&part.vertices);
            triangles.extend(
                part.triangles
                    .iter()
                    .map(|t| [t[0] + base, t[1] + base, t[2] + base]),
            );
        }
        Self::new(vertices, triangles)
    }

    /// Returns the vertices.
    #[must_use]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Returns the triangle index triples.
    #[must_use]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Returns the per-vertex normals (area-weighted, unit length).
    #[must_use]
    pub fn vertex_normals(&self) -> &[Vec3] {
        &self.vertex_normals
    }

    /// Returns the per-vertex scalar attribute, if any.
    #[must_use]
    pub fn scalars(&self) -> Option<&[f32]> {
        self.scalars.as_deref()
    }

    /// Returns the range of the scalar attribute, if any.
    #[must_use]
    pub fn scalar_range(&self) -> Option<ScalarRange> {
        self.scalar_range
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles.
    #[must_use]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if the mesh has no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Returns the axis-aligned bounds `(min, max)` of the vertices.
    /// An empty mesh yields `(Vec3::ZERO, Vec3::ZERO)`.
    #[must_use]
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let Some(first) = self.vertices.first() else {
            return (Vec3::ZERO, Vec3::ZERO);
        };
        let mut min = *first;
        let mut max = *first;
        for v in &self.vertices {
            min = min.min(*v);
            max = max.max(*v);
        }
        (min, max)
    }

    /// Total surface area.
    #[must_use]
    pub fn surface_area(&self) -> f32 {
        self.triangles
            .iter()
            .map(|t| {
                let a = self.vertices[t[0] as usize];
                let b = self.vertices[t[1] as usize];
                let c = self.vertices[t[2] as usize];
                (b - a).cross(c - a).length() * 0.5
            })
            .sum()
    }
}

/// Computes per-vertex normals as the area-weighted average of incident
/// face normals.
fn compute_vertex_normals(vertices: &[Vec3], triangles: &[[u32; 3]]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; vertices.len()];

    for tri in triangles {
        let v0 = vertices[tri[0] as usize];
        let v1 = vertices[tri[1] as usize];
        let v2 = vertices[tri[2] as usize];
        // Cross product length is twice the area, so this is area-weighted.
        let weighted = (v1 - v0).cross(v2 - v0);
        for &vi in tri {
            normals[vi as usize] += weighted;
        }
    }

    for normal in &mut normals {
        *normal = normal.normalize_or_zero();
    }
    normals
}
