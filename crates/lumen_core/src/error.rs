//! Errors raised while building or loading a scene.

use thiserror::Error;

/// Input-validation errors detected at scene-build time.
///
/// The renderer assumes pre-validated geometry, so every problem is reported
/// here rather than discovered mid-trace.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Sphere {index} has invalid radius {radius} (must be positive and finite)")]
    InvalidSphereRadius { index: usize, radius: f32 },

    #[error("Sphere {index} has a non-finite center")]
    NonFiniteCenter { index: usize },

    #[error("Triangle {index} has zero area")]
    DegenerateTriangle { index: usize },

    #[error("Triangle {index} has a non-finite vertex")]
    NonFiniteVertex { index: usize },

    #[error("Mesh chunk {index} does not continue the triangle partition")]
    ChunkPartition { index: usize },

    #[error("Mesh chunk {index} contains no triangles")]
    EmptyChunk { index: usize },

    #[error("Mesh chunks cover {covered} of {total} triangles")]
    UncoveredTriangles { covered: usize, total: usize },

    #[error("Bounds of mesh chunk {index} do not contain all of its triangles")]
    ChunkBoundsTooSmall { index: usize },

    #[error("Mesh '{mesh}' has {count} indices (must be a multiple of 3)")]
    MeshIndexCount { mesh: String, count: usize },

    #[error("Mesh '{mesh}' references vertex {index} but has {vertex_count} vertices")]
    MeshIndexOutOfRange {
        mesh: String,
        index: u32,
        vertex_count: usize,
    },

    #[error("Mesh '{mesh}' has {normals} normals for {positions} positions")]
    NormalCountMismatch {
        mesh: String,
        normals: usize,
        positions: usize,
    },
}

/// Errors that can occur while loading a scene description from disk.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid scene: {0}")]
    Scene(#[from] SceneError),
}

/// Result type for scene loading.
pub type LoadResult<T> = Result<T, LoadError>;
