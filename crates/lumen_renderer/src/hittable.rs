//! HitRecord and closest-hit aggregation over a scene snapshot.

use lumen_core::{Material, SceneSnapshot};
use lumen_math::{Aabb, Interval, Ray, Vec3};

use crate::sphere::intersect_sphere;
use crate::triangle::intersect_triangle;

/// Record of a ray-primitive intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Whether anything was hit
    pub did_hit: bool,
    /// Ray parameter of the hit (+inf when nothing was hit)
    pub distance: f32,
    /// Point of intersection
    pub point: Vec3,
    /// Unit surface normal at the intersection
    pub normal: Vec3,
    /// Material at the intersection point (copied)
    pub material: Material,
}

impl HitRecord {
    /// The no-hit state. Any real hit compares as closer.
    pub const MISS: HitRecord = HitRecord {
        did_hit: false,
        distance: f32::INFINITY,
        point: Vec3::ZERO,
        normal: Vec3::ZERO,
        material: Material {
            color: Vec3::ZERO,
            emission_color: Vec3::ZERO,
            emission_strength: 0.0,
            smoothness: 0.0,
            specular_color: Vec3::ZERO,
            specular_probability: 0.0,
        },
    };

    /// True when `self` is a hit strictly closer than `other`.
    #[inline]
    pub fn is_closer_than(&self, other: &HitRecord) -> bool {
        self.did_hit && self.distance < other.distance
    }
}

impl Default for HitRecord {
    fn default() -> Self {
        Self::MISS
    }
}

/// Slab test of a ray against an axis-aligned box, for t >= 0.
///
/// Used only to skip whole mesh chunks; it never produces a HitRecord.
#[inline]
pub fn intersect_aabb(ray: &Ray, bounds_min: Vec3, bounds_max: Vec3) -> bool {
    Aabb::from_points(bounds_min, bounds_max).hit(ray, Interval::FORWARD)
}

/// Find the nearest hit over every sphere and every mesh chunk.
///
/// Spheres are scanned first, then chunks in order; a chunk whose bounds are
/// missed is skipped entirely. A candidate only replaces the current best
/// when strictly closer, so equal distances keep the first primitive found.
pub fn closest_hit(ray: &Ray, scene: &SceneSnapshot) -> HitRecord {
    let mut closest = HitRecord::MISS;

    for sphere in scene.spheres() {
        let hit = intersect_sphere(ray, sphere.center, sphere.radius, &sphere.material);
        if hit.is_closer_than(&closest) {
            closest = hit;
        }
    }

    for chunk in scene.chunks() {
        if !chunk.bounds.hit(ray, Interval::FORWARD) {
            continue;
        }

        for triangle in scene.chunk_triangles(chunk) {
            let hit = intersect_triangle(ray, triangle, &chunk.material);
            if hit.is_closer_than(&closest) {
                closest = hit;
            }
        }
    }

    closest
}
