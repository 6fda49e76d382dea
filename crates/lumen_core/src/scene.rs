//! Serializable scene description.
//!
//! This is the external, authoring-side view of a scene: spheres and meshes
//! with transforms and materials. `SceneDescription::build` marshals it into
//! the flat [`SceneSnapshot`] the renderer consumes.

use std::path::Path;

use lumen_math::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::builder::{SceneBuilder, DEFAULT_MAX_TRIANGLES_PER_CHUNK};
use crate::error::{LoadResult, SceneError};
use crate::material::Material;
use crate::mesh::Mesh;
use crate::snapshot::SceneSnapshot;

/// Transform components that can be composed into a matrix.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    /// Translation
    pub translation: Vec3,

    /// Rotation (as quaternion, `[x, y, z, w]`)
    pub rotation: Quat,

    /// Scale
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Convert to a 4x4 transformation matrix.
    ///
    /// Order: Scale -> Rotate -> Translate (SRT)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation.normalize(), self.translation)
    }
}

/// A sphere entry in a scene description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SphereDescription {
    pub center: Vec3,
    pub radius: f32,
    #[serde(default)]
    pub material: Material,
}

/// A mesh entry in a scene description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshDescription {
    #[serde(default)]
    pub name: String,
    pub positions: Vec<Vec3>,
    #[serde(default)]
    pub normals: Option<Vec<Vec3>>,
    pub indices: Vec<u32>,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub material: Material,
}

impl MeshDescription {
    /// Convert to a mesh, computing smooth normals when none are given or
    /// their count does not match the positions.
    pub fn to_mesh(&self) -> Mesh {
        let mut mesh = Mesh::new(self.positions.clone(), self.indices.clone(), self.normals.clone());
        mesh.ensure_normals();
        mesh
    }
}

fn default_max_triangles_per_chunk() -> usize {
    DEFAULT_MAX_TRIANGLES_PER_CHUNK
}

/// A complete scene: spheres plus transformed meshes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub spheres: Vec<SphereDescription>,

    #[serde(default)]
    pub meshes: Vec<MeshDescription>,

    /// Upper bound on triangles per mesh chunk
    #[serde(default = "default_max_triangles_per_chunk")]
    pub max_triangles_per_chunk: usize,
}

impl Default for SceneDescription {
    fn default() -> Self {
        Self {
            spheres: Vec::new(),
            meshes: Vec::new(),
            max_triangles_per_chunk: DEFAULT_MAX_TRIANGLES_PER_CHUNK,
        }
    }
}

impl SceneDescription {
    /// Parse a scene description from JSON text.
    pub fn from_json_str(json: &str) -> LoadResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Marshal into a validated snapshot. Materials are copied by value into
    /// each sphere and mesh chunk.
    pub fn build(&self) -> Result<SceneSnapshot, SceneError> {
        let mut builder =
            SceneBuilder::new().with_max_triangles_per_chunk(self.max_triangles_per_chunk);

        for sphere in &self.spheres {
            builder.add_sphere(sphere.center, sphere.radius, sphere.material);
        }

        for (i, desc) in self.meshes.iter().enumerate() {
            let name = if desc.name.is_empty() {
                format!("mesh{}", i)
            } else {
                desc.name.clone()
            };
            builder.add_mesh(&name, &desc.to_mesh(), desc.transform.to_matrix(), desc.material)?;
        }

        builder.build()
    }
}

/// Load a scene description from a JSON file.
pub fn load_scene(path: impl AsRef<Path>) -> LoadResult<SceneDescription> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let description = SceneDescription::from_json_str(&text)?;
    log::info!(
        "Loaded scene description {}: {} spheres, {} meshes",
        path.display(),
        description.spheres.len(),
        description.meshes.len()
    );
    Ok(description)
}
