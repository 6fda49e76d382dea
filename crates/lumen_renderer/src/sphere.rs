//! Ray-sphere intersection.

use lumen_core::Material;
use lumen_math::{Ray, Vec3};

use crate::hittable::HitRecord;

/// Intersect a ray with a sphere.
///
/// Solves the quadratic and keeps only the smaller root; it must be
/// non-negative. A ray starting inside the sphere therefore misses it.
pub fn intersect_sphere(ray: &Ray, center: Vec3, radius: f32, material: &Material) -> HitRecord {
    let oc = ray.origin - center;
    let a = ray.direction.length_squared();
    let b = 2.0 * oc.dot(ray.direction);
    let c = oc.length_squared() - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return HitRecord::MISS;
    }

    let distance = (-b - discriminant.sqrt()) / (2.0 * a);
    // Also rejects NaN from a zero-length direction
    if !(distance >= 0.0) {
        return HitRecord::MISS;
    }

    let point = ray.at(distance);
    HitRecord {
        did_hit: true,
        distance,
        point,
        normal: (point - center).normalize(),
        material: *material,
    }
}
