//! Render job configuration: scene, camera and render sections.

use std::path::Path;

use anyhow::{Context, Result};
use lumen_core::{Color, Material, MeshDescription, SceneDescription, SphereDescription, Transform};
use lumen_math::Vec3;
use lumen_renderer::{Camera, RenderParams};
use serde::{Deserialize, Serialize};

/// Camera placement as written in a job file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub vertical_fov: f32,
    pub near_plane: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.0, -4.0),
            target: Vec3::new(0.0, 0.5, 0.0),
            up: Vec3::Y,
            vertical_fov: 50.0,
            near_plane: 1.0,
        }
    }
}

impl CameraConfig {
    pub fn to_camera(&self) -> Camera {
        Camera {
            vertical_fov: self.vertical_fov,
            near_plane: self.near_plane,
            ..Camera::look_at(self.position, self.target, self.up)
        }
    }
}

/// Everything needed to render one image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    pub scene: SceneDescription,
    pub camera: CameraConfig,
    pub render: RenderParams,
}

impl JobConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read job file {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("Failed to parse job file {}", path.display()))
    }

    /// Built-in scene: a light, a diffuse and a glossy sphere over a ground quad.
    pub fn demo() -> Self {
        let light = Material::new(Color::ONE).with_emission(Color::new(1.0, 0.9, 0.7), 6.0);
        let diffuse = Material::new(Color::new(0.8, 0.25, 0.2));
        let glossy = Material::new(Color::new(0.2, 0.3, 0.8)).with_specular(0.95, Color::ONE, 0.4);
        let ground = Material::new(Color::splat(0.6)).with_specular(0.3, Color::ONE, 0.05);

        let spheres = vec![
            SphereDescription {
                center: Vec3::new(0.0, 2.6, 1.0),
                radius: 0.6,
                material: light,
            },
            SphereDescription {
                center: Vec3::new(-0.8, 0.5, 0.4),
                radius: 0.5,
                material: diffuse,
            },
            SphereDescription {
                center: Vec3::new(0.8, 0.6, 0.8),
                radius: 0.6,
                material: glossy,
            },
        ];

        let floor = MeshDescription {
            name: "ground".to_string(),
            positions: vec![
                Vec3::new(-1.0, 0.0, -1.0),
                Vec3::new(-1.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, -1.0),
            ],
            normals: None,
            indices: vec![0, 1, 2, 0, 2, 3],
            transform: Transform {
                scale: Vec3::new(6.0, 1.0, 6.0),
                ..Default::default()
            },
            material: ground,
        };

        Self {
            scene: SceneDescription {
                spheres,
                meshes: vec![floor],
                ..Default::default()
            },
            camera: CameraConfig::default(),
            render: RenderParams::default(),
        }
    }
}
