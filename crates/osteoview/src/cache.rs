//! On-disk cache for the bone-to-skin distance mesh.
//!
//! The distance field is by far the most expensive computation in the
//! pipeline, so its result is persisted and reused across runs. The
//! artifact carries a key derived from the extraction inputs; a cached
//! file whose key no longer matches the current thresholds or volume is
//! recomputed rather than silently served stale. Cache writes are
//! best-effort: a failed write is logged and the in-memory result is used
//! for the current run.

use std::path::Path;

use glam::{UVec3, Vec3};
use osteoview_core::error::Result;
use osteoview_core::PipelineConfig;
use osteoview_geometry::artifact::MeshArtifact;
use osteoview_geometry::mesh::Mesh;
use osteoview_geometry::volume::VolumetricField;
use serde::{Deserialize, Serialize};

/// Identifies the inputs a cached distance mesh was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheKey {
    pub bone_threshold: f32,
    pub skin_threshold: f32,
    pub volume_dims: UVec3,
    pub volume_spacing: Vec3,
}

impl CacheKey {
    /// Derives the key for the given configuration and volume.
    #[must_use]
    pub fn derive(config: &PipelineConfig, field: &VolumetricField) -> Self {
        Self {
            bone_threshold: config.bone_threshold,
            skin_threshold: config.skin_threshold,
            volume_dims: field.dims(),
            volume_spacing: field.spacing(),
        }
    }
}

/// The cached file: key plus mesh record.
#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    key: CacheKey,
    mesh: MeshArtifact,
}

/// Loads the cached distance mesh when present and still valid, otherwise
/// runs `compute` and persists its result.
///
/// Only computation failures propagate as errors; any cache I/O problem
/// degrades to recomputing (and, on write, to recomputing again next run).
pub fn load_or_compute(
    path: &Path,
    key: &CacheKey,
    compute: impl FnOnce() -> Result<Mesh>,
) -> Result<Mesh> {
    if path.exists() {
        match load(path, key) {
            Ok(Some(mesh)) => {
                log::info!("reusing cached distance mesh from {}", path.display());
                return Ok(mesh);
            }
            Ok(None) => {
                log::info!(
                    "cached distance mesh at {} was built from different inputs, recomputing",
                    path.display()
                );
            }
            Err(err) => {
                log::warn!(
                    "failed to read cached distance mesh from {}: {err}, recomputing",
                    path.display()
                );
            }
        }
    }

    let mesh = compute()?;
    store(path, key, &mesh);
    Ok(mesh)
}

/// Reads and validates the cache file. `Ok(None)` means the key no longer
/// matches.
fn load(path: &Path, key: &CacheKey) -> Result<Option<Mesh>> {
    let file: CacheFile = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    if &file.key != key {
        return Ok(None);
    }
    Ok(Some(file.mesh.into_mesh()?))
}

/// Persists the computed mesh, best-effort.
fn store(path: &Path, key: &CacheKey, mesh: &Mesh) {
    let file = CacheFile {
        key: key.clone(),
        mesh: MeshArtifact::from_mesh(mesh),
    };
    let result = (|| -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_string(&file)?)?;
        Ok(())
    })();

    match result {
        Ok(()) => log::info!("wrote distance mesh cache to {}", path.display()),
        Err(err) => log::warn!(
            "failed to write distance mesh cache to {}: {err}",
            path.display()
        ),
    }
}
