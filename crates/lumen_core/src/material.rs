//! Surface material parameters.
//!
//! These are artist-tunable scalars, not an SI-correct BRDF. The scatter rule
//! they imply lives in the renderer; this module only owns the data and its
//! range invariants.

use lumen_math::Vec3;
use serde::{Deserialize, Serialize};

/// Color type alias (linear RGB, non-negative)
pub type Color = Vec3;

/// A surface material, copied by value into every primitive that uses it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Base (diffuse) color
    pub color: Color,

    /// Emission color, multiplied by `emission_strength`
    pub emission_color: Color,

    /// Emission strength (>= 0)
    pub emission_strength: f32,

    /// 0 = fully diffuse, 1 = mirror-like (specular bounces only)
    pub smoothness: f32,

    /// Tint applied on specular bounces
    pub specular_color: Color,

    /// Chance that a bounce is treated as specular rather than diffuse
    pub specular_probability: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::splat(0.8),
            emission_color: Color::ZERO,
            emission_strength: 0.0,
            smoothness: 0.0,
            specular_color: Color::ONE,
            specular_probability: 0.0,
        }
    }
}

impl Material {
    /// Create a fully diffuse, non-emissive material.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
        .sanitized()
    }

    /// Set the emission color and strength.
    pub fn with_emission(mut self, color: Color, strength: f32) -> Self {
        self.emission_color = color;
        self.emission_strength = strength;
        self.sanitized()
    }

    /// Set the specular response.
    pub fn with_specular(mut self, smoothness: f32, specular_color: Color, probability: f32) -> Self {
        self.smoothness = smoothness;
        self.specular_color = specular_color;
        self.specular_probability = probability;
        self.sanitized()
    }

    /// Clamp every field into its valid range.
    ///
    /// Negative (or NaN) color channels become zero; smoothness and specular
    /// probability are clamped to [0, 1].
    pub fn sanitized(self) -> Self {
        Self {
            color: non_negative(self.color),
            emission_color: non_negative(self.emission_color),
            emission_strength: nan_to_zero(self.emission_strength).max(0.0),
            smoothness: nan_to_zero(self.smoothness).clamp(0.0, 1.0),
            specular_color: non_negative(self.specular_color),
            specular_probability: nan_to_zero(self.specular_probability).clamp(0.0, 1.0),
        }
    }

    /// Emitted radiance (`emission_color * emission_strength`).
    #[inline]
    pub fn emitted(&self) -> Color {
        self.emission_color * self.emission_strength
    }

    /// Check if this material is emissive.
    pub fn is_emissive(&self) -> bool {
        self.emitted().max_element() > 0.0
    }
}

fn nan_to_zero(x: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x
    }
}

fn non_negative(c: Color) -> Color {
    Color::new(
        nan_to_zero(c.x).max(0.0),
        nan_to_zero(c.y).max(0.0),
        nan_to_zero(c.z).max(0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_diffuse() {
        let m = Material::new(Color::new(0.2, 0.4, 0.6));
        assert_eq!(m.color, Color::new(0.2, 0.4, 0.6));
        assert_eq!(m.smoothness, 0.0);
        assert_eq!(m.specular_probability, 0.0);
        assert!(!m.is_emissive());
    }

    #[test]
    fn test_emission() {
        let m = Material::new(Color::ONE).with_emission(Color::ONE, 2.0);
        assert_eq!(m.emitted(), Color::splat(2.0));
        assert!(m.is_emissive());
    }

    #[test]
    fn test_clamped_at_construction() {
        let m = Material::new(Color::new(-1.0, 0.5, 2.0))
            .with_emission(Color::new(1.0, -3.0, 0.0), -4.0)
            .with_specular(1.5, Color::new(-0.1, 1.0, 1.0), -0.2);

        assert_eq!(m.color, Color::new(0.0, 0.5, 2.0));
        assert_eq!(m.emission_color, Color::new(1.0, 0.0, 0.0));
        assert_eq!(m.emission_strength, 0.0);
        assert_eq!(m.smoothness, 1.0);
        assert_eq!(m.specular_color, Color::new(0.0, 1.0, 1.0));
        assert_eq!(m.specular_probability, 0.0);
    }

    #[test]
    fn test_sanitized_nan() {
        let m = Material {
            smoothness: f32::NAN,
            color: Color::new(f32::NAN, 1.0, 1.0),
            ..Default::default()
        }
        .sanitized();
        assert_eq!(m.smoothness, 0.0);
        assert_eq!(m.color.x, 0.0);
    }

    #[test]
    fn test_deserialize_partial() {
        let m: Material = serde_json::from_str(r#"{ "color": [1.0, 0.0, 0.0], "smoothness": 0.5 }"#)
            .expect("valid material json");
        assert_eq!(m.color, Color::new(1.0, 0.0, 0.0));
        assert_eq!(m.smoothness, 0.5);
        assert_eq!(m.specular_color, Color::ONE);
    }
}
