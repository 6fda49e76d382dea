//! Procedural sky, ground and sun seen by escaping rays.

use lumen_core::Color;
use lumen_math::{smoothstep, Vec3};
use serde::{Deserialize, Serialize};

/// Parameters of the procedural environment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentParams {
    /// When false every escaping ray carries zero radiance
    pub enabled: bool,
    pub ground_color: Color,
    pub horizon_color: Color,
    pub zenith_color: Color,
    /// Unit vector pointing towards the sun
    pub sun_direction: Vec3,
    /// Exponent shaping the sun disc (>= 1)
    pub sun_focus: f32,
    /// Sun radiance added to every channel (>= 0)
    pub sun_intensity: f32,
}

impl Default for EnvironmentParams {
    fn default() -> Self {
        Self {
            enabled: true,
            ground_color: Color::new(0.35, 0.3, 0.35),
            horizon_color: Color::ONE,
            zenith_color: Color::new(0.08, 0.37, 0.73),
            sun_direction: Vec3::new(0.4, 0.8, -0.45).normalize(),
            sun_focus: 500.0,
            sun_intensity: 10.0,
        }
    }
}

impl EnvironmentParams {
    /// A disabled environment: escaping rays contribute nothing.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Radiance arriving along `direction` (unit length) from infinity.
    pub fn sample(&self, direction: Vec3) -> Color {
        if !self.enabled {
            return Color::ZERO;
        }

        let sky_t = smoothstep(0.0, 0.4, direction.y).powf(0.35);
        let ground_t = smoothstep(-0.01, 0.0, direction.y);
        let sky = self.horizon_color.lerp(self.zenith_color, sky_t);

        // Sun only above the horizon blend zone
        let sun = if ground_t >= 1.0 {
            direction.dot(self.sun_direction).max(0.0).powf(self.sun_focus) * self.sun_intensity
        } else {
            0.0
        };

        self.ground_color.lerp(sky, ground_t) + Color::splat(sun)
    }

    /// Copy with every field pulled into its valid range.
    pub fn clamped(&self) -> Self {
        let finite_or = |x: f32, fallback: f32| if x.is_finite() { x } else { fallback };
        let color = |c: Color| if c.is_finite() { c.max(Color::ZERO) } else { Color::ZERO };

        Self {
            enabled: self.enabled,
            ground_color: color(self.ground_color),
            horizon_color: color(self.horizon_color),
            zenith_color: color(self.zenith_color),
            sun_direction: self.sun_direction.try_normalize().unwrap_or(Vec3::Y),
            sun_focus: finite_or(self.sun_focus, 1.0).max(1.0),
            sun_intensity: finite_or(self.sun_intensity, 0.0).max(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blue_sky() -> EnvironmentParams {
        EnvironmentParams {
            ground_color: Color::ZERO,
            zenith_color: Color::new(0.0, 0.0, 1.0),
            sun_intensity: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_straight_up_is_zenith() {
        let c = blue_sky().sample(Vec3::Y);
        assert!((c - Color::new(0.0, 0.0, 1.0)).length() < 1e-5, "{:?}", c);
    }

    #[test]
    fn test_straight_down_is_ground() {
        assert_eq!(blue_sky().sample(Vec3::NEG_Y), Color::ZERO);
    }

    #[test]
    fn test_disabled_is_black() {
        let env = EnvironmentParams::disabled();
        assert_eq!(env.sample(Vec3::Y), Color::ZERO);
        assert_eq!(env.sample(env.sun_direction), Color::ZERO);
    }

    #[test]
    fn test_horizon() {
        let env = blue_sky();
        // Exactly on the horizon the ground blend is complete but the sky is all horizon
        let c = env.sample(Vec3::X);
        assert!((c - env.horizon_color).length() < 1e-5);
    }

    #[test]
    fn test_sun_only_above_blend_zone() {
        let env = EnvironmentParams {
            ground_color: Color::ZERO,
            sun_direction: Vec3::new(1.0, -0.005, 0.0).normalize(),
            sun_focus: 1.0,
            sun_intensity: 5.0,
            ..Default::default()
        };
        let toward_sun = env.sun_direction;
        let c = env.sample(toward_sun);
        // Inside the blend zone: no sun, just a ground/sky mix no brighter than the horizon
        assert!(c.max_element() <= 1.0 + 1e-5, "{:?}", c);
    }

    #[test]
    fn test_sun_adds_to_every_channel() {
        let env = EnvironmentParams {
            sun_direction: Vec3::Y,
            sun_focus: 1.0,
            sun_intensity: 2.0,
            ..blue_sky()
        };
        let c = env.sample(Vec3::Y);
        assert!((c - Color::new(2.0, 2.0, 3.0)).length() < 1e-5, "{:?}", c);
    }

    #[test]
    fn test_clamped() {
        let env = EnvironmentParams {
            ground_color: Color::new(-1.0, 0.5, f32::NAN),
            sun_direction: Vec3::ZERO,
            sun_focus: 0.0,
            sun_intensity: -3.0,
            ..Default::default()
        }
        .clamped();
        assert_eq!(env.ground_color, Color::ZERO);
        assert_eq!(env.sun_direction, Vec3::Y);
        assert_eq!(env.sun_focus, 1.0);
        assert_eq!(env.sun_intensity, 0.0);
    }
}
