//! Monte Carlo path integrator.
//!
//! Follows one path per call through the scene, collecting emitted light
//! weighted by the running throughput. The bounce budget is fixed; there is
//! no Russian roulette.

use lumen_core::{Color, SceneSnapshot};
use lumen_math::Ray;

use crate::environment::EnvironmentParams;
use crate::hittable::closest_hit;
use crate::material::scatter;
use crate::random::RandomStream;

/// Compute the radiance carried back along `ray`.
///
/// Traces at most `max_bounces + 1` segments; segment 0 is the primary ray.
/// An escaping ray picks up the environment and ends the path. The result is
/// linear and unclamped.
pub fn trace(
    ray: &Ray,
    scene: &SceneSnapshot,
    environment: &EnvironmentParams,
    max_bounces: u32,
    rng: &mut RandomStream,
) -> Color {
    let mut ray = *ray;
    let mut throughput = Color::ONE;
    let mut radiance = Color::ZERO;

    for _ in 0..=max_bounces {
        let hit = closest_hit(&ray, scene);
        if !hit.did_hit {
            radiance += environment.sample(ray.direction) * throughput;
            break;
        }

        let bounce = scatter(&hit.material, ray.direction, hit.normal, rng);
        radiance += bounce.emitted * throughput;
        throughput *= bounce.attenuation;

        ray.origin = hit.point;
        ray.direction = bounce.direction;
    }

    radiance
}

/// Average `rays_per_pixel` independent paths along the same camera ray.
///
/// All paths draw from one stream, so each continues where the previous
/// one left off.
pub fn sample_pixel(
    ray: &Ray,
    scene: &SceneSnapshot,
    environment: &EnvironmentParams,
    rays_per_pixel: u32,
    max_bounces: u32,
    mut rng: RandomStream,
) -> Color {
    let rays = rays_per_pixel.max(1);
    let mut total = Color::ZERO;
    for _ in 0..rays {
        total += trace(ray, scene, environment, max_bounces, &mut rng);
    }
    total / rays as f32
}
