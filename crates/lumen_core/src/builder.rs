//! Scene marshalling: turns spheres and transformed meshes into a validated
//! [`SceneSnapshot`].
//!
//! Meshes are split into chunks of bounded size so each chunk's bounding box
//! is a useful reject test. The split is a recursive median split of triangle
//! centroids along the longest axis, which keeps chunk boxes spatially tight.

use lumen_math::{Aabb, Mat4, Vec3};

use crate::error::SceneError;
use crate::material::Material;
use crate::mesh::Mesh;
use crate::snapshot::{MeshChunk, SceneSnapshot, Sphere, Triangle};

/// Default maximum number of triangles per mesh chunk.
pub const DEFAULT_MAX_TRIANGLES_PER_CHUNK: usize = 256;

/// Accumulates primitives and builds an immutable snapshot.
#[derive(Debug)]
pub struct SceneBuilder {
    spheres: Vec<Sphere>,
    triangles: Vec<Triangle>,
    chunks: Vec<MeshChunk>,
    max_triangles_per_chunk: usize,
    mesh_count: usize,
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self {
            spheres: Vec::new(),
            triangles: Vec::new(),
            chunks: Vec::new(),
            max_triangles_per_chunk: DEFAULT_MAX_TRIANGLES_PER_CHUNK,
            mesh_count: 0,
        }
    }

    /// Set the chunk size limit for meshes added after this call (min 1).
    pub fn with_max_triangles_per_chunk(mut self, max: usize) -> Self {
        self.max_triangles_per_chunk = max.max(1);
        self
    }

    /// Add a sphere; the material is copied.
    pub fn add_sphere(&mut self, center: Vec3, radius: f32, material: Material) -> &mut Self {
        self.spheres.push(Sphere::new(center, radius, material));
        self
    }

    /// Add a mesh placed in the world by `matrix`, split into chunks.
    ///
    /// The mesh is validated here so index errors carry the mesh name.
    pub fn add_mesh(
        &mut self,
        name: &str,
        mesh: &Mesh,
        matrix: Mat4,
        material: Material,
    ) -> Result<&mut Self, SceneError> {
        mesh.validate(name)?;

        let mut triangles = mesh.world_triangles(matrix);
        if triangles.is_empty() {
            log::debug!("Mesh '{}' has no triangles, skipping", name);
            return Ok(self);
        }

        let first_chunk = self.chunks.len();
        let base = self.triangles.len();
        split_into_chunks(&mut triangles, self.max_triangles_per_chunk, &mut |run, offset| {
            self.chunks.push(MeshChunk::new(base + offset, run, material));
        });
        log::debug!(
            "Mesh '{}': {} triangles in {} chunks",
            name,
            triangles.len(),
            self.chunks.len() - first_chunk
        );

        self.triangles.append(&mut triangles);
        self.mesh_count += 1;
        Ok(self)
    }

    /// Validate everything and produce the snapshot.
    pub fn build(self) -> Result<SceneSnapshot, SceneError> {
        let (sphere_count, triangle_count, chunk_count) =
            (self.spheres.len(), self.triangles.len(), self.chunks.len());

        let snapshot = SceneSnapshot::new(self.spheres, self.triangles, self.chunks)?;
        log::info!(
            "Built scene snapshot: {} spheres, {} meshes, {} triangles in {} chunks",
            sphere_count,
            self.mesh_count,
            triangle_count,
            chunk_count
        );
        Ok(snapshot)
    }
}

/// Reorder `triangles` in place so every run of at most `max` triangles is
/// spatially coherent, calling `emit(run, offset)` for each run in order.
fn split_into_chunks(
    triangles: &mut [Triangle],
    max: usize,
    emit: &mut dyn FnMut(&[Triangle], usize),
) {
    split_recursive(triangles, 0, max, emit);
}

fn split_recursive(
    triangles: &mut [Triangle],
    offset: usize,
    max: usize,
    emit: &mut dyn FnMut(&[Triangle], usize),
) {
    let n = triangles.len();
    if n <= max {
        emit(triangles, offset);
        return;
    }

    // Choose split axis based on centroid spread
    let centroid_bounds = triangles
        .iter()
        .fold(Aabb::EMPTY, |acc, tri| acc.grow(tri.centroid()));
    let axis = centroid_bounds.longest_axis();

    triangles.sort_unstable_by(|a, b| {
        a.centroid()[axis]
            .partial_cmp(&b.centroid()[axis])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mid = n / 2;
    let (left, right) = triangles.split_at_mut(mid);
    split_recursive(left, offset, max, emit);
    split_recursive(right, offset + mid, max, emit);
}
