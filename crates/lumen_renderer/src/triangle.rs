//! Ray-triangle intersection.
//!
//! Möller-Trumbore style, one-sided: the determinant is taken against the
//! geometric face normal, and rays arriving from behind (or nearly parallel)
//! are rejected. The reported normal interpolates the vertex normals.

use lumen_core::{Material, Triangle};
use lumen_math::Ray;

use crate::hittable::HitRecord;

/// Determinants below this are parallel or back-facing hits.
pub const DETERMINANT_EPSILON: f32 = 1e-6;

/// Barycentric intersection result: distance and weights for (a, b, c).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    pub distance: f32,
    pub weights: [f32; 3],
}

/// Intersect a ray with the front face of a triangle.
///
/// Returns the ray parameter and the barycentric weights of the hit point
/// for vertices `a`, `b` and `c`, or `None` on a miss.
pub fn barycentric_hit(ray: &Ray, tri: &Triangle) -> Option<TriangleHit> {
    let edge_ab = tri.b - tri.a;
    let edge_ac = tri.c - tri.a;
    let normal = edge_ab.cross(edge_ac);
    let ao = ray.origin - tri.a;
    let dao = ao.cross(ray.direction);

    let determinant = -ray.direction.dot(normal);
    // Also rejects a NaN determinant
    if !(determinant >= DETERMINANT_EPSILON) {
        return None;
    }
    let inv_det = 1.0 / determinant;

    let distance = ao.dot(normal) * inv_det;
    let u = edge_ac.dot(dao) * inv_det;
    let v = -edge_ab.dot(dao) * inv_det;
    let w = 1.0 - u - v;

    if distance >= 0.0 && u >= 0.0 && v >= 0.0 && w >= 0.0 {
        Some(TriangleHit {
            distance,
            weights: [w, u, v],
        })
    } else {
        None
    }
}

/// Intersect a ray with a triangle that carries `material`.
pub fn intersect_triangle(ray: &Ray, tri: &Triangle, material: &Material) -> HitRecord {
    let Some(hit) = barycentric_hit(ray, tri) else {
        return HitRecord::MISS;
    };

    let [w, u, v] = hit.weights;
    let normal = tri.normal_a * w + tri.normal_b * u + tri.normal_c * v;

    HitRecord {
        did_hit: true,
        distance: hit.distance,
        point: ray.at(hit.distance),
        normal: normal.try_normalize().unwrap_or_else(|| tri.face_normal().normalize()),
        material: *material,
    }
}
