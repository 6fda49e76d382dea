//! Lumen Core - scene geometry for the Lumen path tracer.
//!
//! This crate provides:
//!
//! - **Scene description**: serializable spheres, meshes, transforms, materials
//! - **Scene marshalling**: `SceneBuilder` flattens meshes into world-space
//!   triangles grouped into bounded chunks
//! - **Scene snapshot**: the validated, immutable arrays the renderer reads
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::load_scene;
//!
//! let snapshot = load_scene("scene.json")?.build()?;
//! println!("{} spheres, {} chunks", snapshot.spheres().len(), snapshot.chunks().len());
//! ```

pub mod builder;
pub mod error;
pub mod material;
pub mod mesh;
pub mod scene;
pub mod snapshot;

// Re-export commonly used types
pub use builder::{SceneBuilder, DEFAULT_MAX_TRIANGLES_PER_CHUNK};
pub use error::{LoadError, LoadResult, SceneError};
pub use material::{Color, Material};
pub use mesh::Mesh;
pub use scene::{load_scene, MeshDescription, SceneDescription, SphereDescription, Transform};
pub use snapshot::{MeshChunk, SceneSnapshot, Sphere, Triangle};
