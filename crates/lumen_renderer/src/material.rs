//! Scatter rule implied by the material parameters.
//!
//! Each bounce is either specular or diffuse, chosen by one Bernoulli draw
//! against `specular_probability`. The two behaviours are never mixed
//! within a single path segment.

use lumen_core::{Color, Material};
use lumen_math::{reflect, Vec3};

use crate::random::RandomStream;

/// Outcome of one surface interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scatter {
    /// New unit ray direction
    pub direction: Vec3,
    /// Factor applied to the path throughput
    pub attenuation: Color,
    /// Radiance emitted by the surface
    pub emitted: Color,
    /// Whether this bounce took the specular branch
    pub is_specular: bool,
}

/// Scatter an incoming ray at a surface with unit `normal`.
///
/// The new direction blends the diffuse direction towards the mirror
/// direction by `smoothness` on specular bounces only; diffuse bounces use
/// the diffuse direction unchanged.
pub fn scatter(material: &Material, incoming: Vec3, normal: Vec3, rng: &mut RandomStream) -> Scatter {
    let is_specular = material.specular_probability >= rng.next_scalar();
    let specular_weight = if is_specular { 1.0 } else { 0.0 };

    // Catch degenerate scatter direction
    let diffuse_dir = (normal + rng.next_direction())
        .try_normalize()
        .unwrap_or(normal);
    let specular_dir = reflect(incoming, normal);

    let direction = diffuse_dir
        .lerp(specular_dir, material.smoothness * specular_weight)
        .try_normalize()
        .unwrap_or(normal);

    Scatter {
        direction,
        attenuation: material.color.lerp(material.specular_color, specular_weight),
        emitted: material.emitted(),
        is_specular,
    }
}
