//! On-disk mesh artifact with one scalar channel.
//!
//! A flat record of vertices, triangle connectivity and a per-vertex
//! scalar, serialized as JSON. `serde_json` prints floats in their
//! shortest round-trippable form, so a write/read cycle reproduces the
//! exact vertex positions, connectivity and attribute values.

use std::fs;
use std::path::Path;

use glam::Vec3;
use osteoview_core::error::Result;
use serde::{Deserialize, Serialize};

use crate::mesh::Mesh;

/// Serializable polygon-mesh record: vertices, triangles and one scalar
/// attribute per vertex.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshArtifact {
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
    pub scalars: Vec<f32>,
}

impl MeshArtifact {
    /// Captures a mesh into an artifact record. A mesh without a scalar
    /// attribute stores an empty scalar channel.
    #[must_use]
    pub fn from_mesh(mesh: &Mesh) -> Self {
        Self {
            vertices: mesh.vertices().to_vec(),
            triangles: mesh.triangles().to_vec(),
            scalars: mesh.scalars().map(<[f32]>::to_vec).unwrap_or_default(),
        }
    }

    /// Rebuilds the mesh, reattaching the scalar channel when present.
    pub fn into_mesh(self) -> Result<Mesh> {
        let mesh = Mesh::new(self.vertices, self.triangles);
        if self.scalars.is_empty() {
            Ok(mesh)
        } else {
            mesh.with_scalars(self.scalars)
        }
    }
}

/// Writes an artifact to `path`, creating parent directories as needed.
pub fn write_artifact(path: &Path, artifact: &MeshArtifact) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let text = serde_json::to_string(artifact)?;
    fs::write(path, text)?;
    Ok(())
}

/// Reads an artifact back from `path`.
pub fn read_artifact(path: &Path) -> Result<MeshArtifact> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_mesh() -> Mesh {
        Mesh::new(
            vec![
                Vec3::new(0.25, -1.5, 3.125),
                Vec3::new(0.1, 0.2, 0.3),
                Vec3::new(7.0, 8.0, 9.0),
                Vec3::new(-0.333, 0.666, -0.999),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
        .with_scalars(vec![0.0, 1.5, -2.25, 1e-7])
        .unwrap()
    }

    #[test]
    fn test_round_trip_is_lossless() {
        let mesh = sample_mesh();
        let dir = std::env::temp_dir().join(format!("osteoview-artifact-{}", std::process::id()));
        let path = dir.join("mesh.json");

        write_artifact(&path, &MeshArtifact::from_mesh(&mesh)).unwrap();
        let restored = read_artifact(&path).unwrap().into_mesh().unwrap();
        let _ = fs::remove_dir_all(&dir);

        assert_eq!(restored.num_vertices(), mesh.num_vertices());
        assert_eq!(restored.triangles(), mesh.triangles());
        assert_eq!(restored.vertices(), mesh.vertices());
        assert_eq!(restored.scalars(), mesh.scalars());
        assert_eq!(restored.scalar_range(), mesh.scalar_range());
    }

    #[test]
    fn test_mesh_without_scalars_round_trips() {
        let mesh = Mesh::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![[0, 1, 2]],
        );
        let artifact = MeshArtifact::from_mesh(&mesh);
        let text = serde_json::to_string(&artifact).unwrap();
        let back: MeshArtifact = serde_json::from_str(&text).unwrap();
        let restored = back.into_mesh().unwrap();
        assert!(restored.scalars().is_none());
        assert_eq!(restored.vertices(), mesh.vertices());
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let missing = Path::new("/nonexistent/osteoview/mesh.json");
        assert!(read_artifact(missing).is_err());
    }
}
