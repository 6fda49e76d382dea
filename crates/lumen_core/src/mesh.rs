//! Indexed triangle mesh, the host-side input the scene builder flattens
//! into world-space triangles.

use lumen_math::{Mat3, Mat4, Vec3};

use crate::error::SceneError;
use crate::snapshot::Triangle;

/// A mesh consisting of vertex positions, optional normals, and triangle indices.
///
/// Winding: the face normal of `[i0, i1, i2]` is `(p1 - p0) x (p2 - p0)` and
/// marks the front face. Triangles are one-sided when rendered.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Vertex normals (optional - computed by `ensure_normals` if missing)
    pub normals: Option<Vec<Vec3>>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new mesh from positions and indices, optionally with normals.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>, normals: Option<Vec<Vec3>>) -> Self {
        Self {
            positions,
            normals,
            indices,
        }
    }

    /// A square in the XZ plane centered at the origin, facing +Y.
    pub fn plane(half_extent: f32) -> Self {
        let h = half_extent;
        let positions = vec![
            Vec3::new(-h, 0.0, -h),
            Vec3::new(-h, 0.0, h),
            Vec3::new(h, 0.0, h),
            Vec3::new(h, 0.0, -h),
        ];
        let normals = vec![Vec3::Y; 4];
        Self::new(positions, vec![0, 1, 2, 0, 2, 3], Some(normals))
    }

    /// Compute smooth vertex normals by averaging face normals.
    ///
    /// Face normals are left unnormalized before accumulation, so larger
    /// faces weigh more. Indices out of range are skipped here; `validate`
    /// reports them.
    pub fn compute_normals(&mut self) {
        let vertex_count = self.positions.len();
        let mut normals = vec![Vec3::ZERO; vertex_count];

        for face in self.indices.chunks_exact(3) {
            let i0 = face[0] as usize;
            let i1 = face[1] as usize;
            let i2 = face[2] as usize;

            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                continue;
            }

            let p0 = self.positions[i0];
            let edge1 = self.positions[i1] - p0;
            let edge2 = self.positions[i2] - p0;
            let face_normal = edge1.cross(edge2);

            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        for normal in &mut normals {
            // Default up normal for unreferenced or degenerate vertices
            *normal = normal.try_normalize().unwrap_or(Vec3::Y);
        }

        self.normals = Some(normals);
    }

    /// Ensure the mesh has one normal per vertex, computing them if necessary.
    pub fn ensure_normals(&mut self) {
        let should_compute = match &self.normals {
            None => true,
            Some(normals) => normals.len() != self.positions.len(),
        };

        if should_compute {
            if let Some(normals) = &self.normals {
                log::debug!(
                    "Normals array length ({}) doesn't match vertex count ({}), computing smooth normals",
                    normals.len(),
                    self.positions.len()
                );
            }
            self.compute_normals();
        }
    }

    /// Get the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check that indices form whole triangles and stay within the vertex list,
    /// and that supplied normals match the vertex count.
    pub fn validate(&self, name: &str) -> Result<(), SceneError> {
        if self.indices.len() % 3 != 0 {
            return Err(SceneError::MeshIndexCount {
                mesh: name.to_string(),
                count: self.indices.len(),
            });
        }

        if let Some(&index) = self
            .indices
            .iter()
            .find(|&&i| i as usize >= self.positions.len())
        {
            return Err(SceneError::MeshIndexOutOfRange {
                mesh: name.to_string(),
                index,
                vertex_count: self.positions.len(),
            });
        }

        if let Some(normals) = &self.normals {
            if normals.len() != self.positions.len() {
                return Err(SceneError::NormalCountMismatch {
                    mesh: name.to_string(),
                    normals: normals.len(),
                    positions: self.positions.len(),
                });
            }
        }

        Ok(())
    }

    /// Flatten into world-space triangles.
    ///
    /// Positions go through `matrix`; normals go through its inverse-transpose
    /// so non-uniform scale keeps them perpendicular. Assumes `validate` has
    /// passed. Without normals, every triangle is flat-shaded.
    pub fn world_triangles(&self, matrix: Mat4) -> Vec<Triangle> {
        let normal_matrix = Mat3::from_mat4(matrix).inverse().transpose();
        let to_world_normal = |n: Vec3| (normal_matrix * n).try_normalize().unwrap_or(Vec3::Y);

        self.indices
            .chunks_exact(3)
            .map(|face| {
                let [i0, i1, i2] = [face[0] as usize, face[1] as usize, face[2] as usize];
                let a = matrix.transform_point3(self.positions[i0]);
                let b = matrix.transform_point3(self.positions[i1]);
                let c = matrix.transform_point3(self.positions[i2]);

                match &self.normals {
                    Some(normals) => Triangle::new(
                        a,
                        b,
                        c,
                        to_world_normal(normals[i0]),
                        to_world_normal(normals[i1]),
                        to_world_normal(normals[i2]),
                    ),
                    None => Triangle::flat(a, b, c),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_math::Quat;

    #[test]
    fn test_mesh_creation() {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let mesh = Mesh::new(positions, vec![0, 1, 2], None);

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(mesh.normals.is_none());
    }

    #[test]
    fn test_compute_normals() {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        // 0,1,2 is counter-clockwise viewed from +Z, so the normal is +Z
        let mut mesh = Mesh::new(positions, vec![0, 1, 2], None);
        mesh.compute_normals();

        let normals = mesh.normals.as_ref().expect("normals computed");
        for normal in normals {
            assert!((normal.z - 1.0).abs() < 0.001);
        }
    }

    #[test]
    fn test_ensure_normals_replaces_mismatched() {
        let mut mesh = Mesh::plane(1.0);
        mesh.normals = Some(vec![Vec3::X]);
        mesh.ensure_normals();
        let normals = mesh.normals.as_ref().expect("normals computed");
        assert_eq!(normals.len(), 4);
        assert!(normals.iter().all(|n| (*n - Vec3::Y).length() < 1e-6));
    }

    #[test]
    fn test_validate() {
        let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1], None);
        assert!(matches!(
            mesh.validate("m"),
            Err(SceneError::MeshIndexCount { count: 2, .. })
        ));

        let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 7], None);
        assert!(matches!(
            mesh.validate("m"),
            Err(SceneError::MeshIndexOutOfRange { index: 7, .. })
        ));

        let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 2], Some(vec![Vec3::Z]));
        assert!(matches!(
            mesh.validate("m"),
            Err(SceneError::NormalCountMismatch { normals: 1, positions: 3, .. })
        ));

        assert!(Mesh::plane(2.0).validate("plane").is_ok());
    }

    #[test]
    fn test_plane_faces_up() {
        let tris = Mesh::plane(1.0).world_triangles(Mat4::IDENTITY);
        assert_eq!(tris.len(), 2);
        for tri in &tris {
            assert!(tri.face_normal().normalize().dot(Vec3::Y) > 0.999);
        }
    }

    #[test]
    fn test_world_triangles_transform() {
        let matrix = Mat4::from_scale_rotation_translation(
            Vec3::new(2.0, 1.0, 1.0),
            Quat::from_rotation_x(std::f32::consts::FRAC_PI_2),
            Vec3::new(0.0, 0.0, 5.0),
        );
        let tris = Mesh::plane(1.0).world_triangles(matrix);

        // Rotating +Y by 90 degrees about X gives +Z
        for tri in &tris {
            assert!((tri.normal_a - Vec3::Z).length() < 1e-5);
            assert!((tri.a.z - 5.0).abs() < 1e-5);
            assert!(tri.a.x.abs() <= 2.0 + 1e-5);
        }
    }
}
