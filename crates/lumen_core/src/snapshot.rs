//! Flat, immutable scene representation consumed by the renderer.
//!
//! A snapshot is three ordered arrays: spheres, triangles, and mesh chunks
//! that partition the triangles into runs sharing one material and one
//! bounding box. It is validated once on construction and never mutated
//! afterwards; a changed scene is a new snapshot.

use std::ops::Range;

use lumen_math::{Aabb, Vec3};

use crate::error::SceneError;
use crate::material::Material;

/// A sphere primitive with its own copy of a material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub material: Material,
}

impl Sphere {
    /// Create a new sphere. Validation happens when the snapshot is built.
    pub fn new(center: Vec3, radius: f32, material: Material) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }
}

/// A triangle with per-vertex normals for smooth shading.
///
/// The front face is the side `(b - a) x (c - a)` points to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
    pub normal_a: Vec3,
    pub normal_b: Vec3,
    pub normal_c: Vec3,
}

impl Triangle {
    /// Create a triangle with explicit vertex normals.
    pub fn new(a: Vec3, b: Vec3, c: Vec3, normal_a: Vec3, normal_b: Vec3, normal_c: Vec3) -> Self {
        Self {
            a,
            b,
            c,
            normal_a,
            normal_b,
            normal_c,
        }
    }

    /// Create a flat-shaded triangle (all vertex normals equal the face normal).
    pub fn flat(a: Vec3, b: Vec3, c: Vec3) -> Self {
        let n = (b - a).cross(c - a).normalize_or_zero();
        Self::new(a, b, c, n, n, n)
    }

    /// Unnormalized geometric normal; its length is twice the area.
    #[inline]
    pub fn face_normal(&self) -> Vec3 {
        (self.b - self.a).cross(self.c - self.a)
    }

    /// Tight (unpadded) bounds of the three vertices.
    pub fn bounds(&self) -> Aabb {
        Aabb::EMPTY.grow(self.a).grow(self.b).grow(self.c)
    }

    pub fn centroid(&self) -> Vec3 {
        (self.a + self.b + self.c) / 3.0
    }
}

/// A contiguous run of triangles sharing a material and a bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshChunk {
    pub first_triangle: usize,
    pub triangle_count: usize,
    pub material: Material,
    pub bounds: Aabb,
}

impl MeshChunk {
    /// Create a chunk over `triangles`, which start at `first_triangle` in the
    /// scene's triangle list. Bounds are the union of the triangles' bounds.
    pub fn new(first_triangle: usize, triangles: &[Triangle], material: Material) -> Self {
        let tight = triangles
            .iter()
            .fold(Aabb::EMPTY, |acc, tri| Aabb::surrounding(&acc, &tri.bounds()));
        let bounds = if triangles.is_empty() {
            Aabb::EMPTY
        } else {
            Aabb::from_points(tight.min(), tight.max())
        };

        Self {
            first_triangle,
            triangle_count: triangles.len(),
            material,
            bounds,
        }
    }

    /// Index range of this chunk's triangles.
    pub fn range(&self) -> Range<usize> {
        self.first_triangle..self.first_triangle + self.triangle_count
    }
}

/// Immutable per-frame scene: spheres, triangles, and mesh chunks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneSnapshot {
    spheres: Vec<Sphere>,
    triangles: Vec<Triangle>,
    chunks: Vec<MeshChunk>,
}

impl SceneSnapshot {
    /// Build a snapshot, validating every invariant the renderer relies on.
    ///
    /// Sphere and chunk materials are re-sanitized so deserialized values
    /// obey the same ranges as constructed ones.
    pub fn new(
        spheres: Vec<Sphere>,
        triangles: Vec<Triangle>,
        chunks: Vec<MeshChunk>,
    ) -> Result<Self, SceneError> {
        for (index, sphere) in spheres.iter().enumerate() {
            if !sphere.center.is_finite() {
                return Err(SceneError::NonFiniteCenter { index });
            }
            if !(sphere.radius > 0.0 && sphere.radius.is_finite()) {
                return Err(SceneError::InvalidSphereRadius {
                    index,
                    radius: sphere.radius,
                });
            }
        }

        for (index, tri) in triangles.iter().enumerate() {
            if !(tri.a.is_finite() && tri.b.is_finite() && tri.c.is_finite()) {
                return Err(SceneError::NonFiniteVertex { index });
            }
            if !(tri.face_normal().length_squared() > 0.0) {
                return Err(SceneError::DegenerateTriangle { index });
            }
        }

        let mut next = 0;
        for (index, chunk) in chunks.iter().enumerate() {
            if chunk.first_triangle != next {
                return Err(SceneError::ChunkPartition { index });
            }
            if chunk.triangle_count == 0 {
                return Err(SceneError::EmptyChunk { index });
            }
            let Some(run) = triangles.get(chunk.range()) else {
                return Err(SceneError::UncoveredTriangles {
                    covered: chunk.range().end,
                    total: triangles.len(),
                });
            };
            if !run.iter().all(|tri| chunk.bounds.contains(&tri.bounds())) {
                return Err(SceneError::ChunkBoundsTooSmall { index });
            }
            next = chunk.range().end;
        }
        if next != triangles.len() {
            return Err(SceneError::UncoveredTriangles {
                covered: next,
                total: triangles.len(),
            });
        }

        let spheres = spheres
            .into_iter()
            .map(|s| Sphere {
                material: s.material.sanitized(),
                ..s
            })
            .collect();
        let chunks = chunks
            .into_iter()
            .map(|c| MeshChunk {
                material: c.material.sanitized(),
                ..c
            })
            .collect();

        Ok(Self {
            spheres,
            triangles,
            chunks,
        })
    }

    /// A scene with nothing in it. Valid; every ray escapes.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn chunks(&self) -> &[MeshChunk] {
        &self.chunks
    }

    /// Triangles belonging to one chunk.
    pub fn chunk_triangles(&self, chunk: &MeshChunk) -> &[Triangle] {
        &self.triangles[chunk.range()]
    }

    /// True when the scene has no primitives at all.
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty() && self.chunks.is_empty()
    }
}
