//! Pinhole camera for primary ray generation.

use lumen_math::{Mat3, Ray, Vec3};
use serde::{Deserialize, Serialize};

/// Smallest and largest vertical field of view, in degrees.
pub const MIN_FOV: f32 = 1.0;
pub const MAX_FOV: f32 = 179.0;

/// Pinhole camera. Rays leave `origin` through a virtual image plane at
/// `near_plane` along the forward axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    /// Camera position in world space
    pub origin: Vec3,
    /// Columns are the right, up and forward axes
    pub basis: Mat3,
    /// Vertical field of view in degrees
    pub vertical_fov: f32,
    /// Distance to the image plane
    pub near_plane: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            basis: Mat3::IDENTITY,
            vertical_fov: 60.0,
            near_plane: 1.0,
        }
    }
}

impl Camera {
    /// Camera at `from` looking towards `at`.
    ///
    /// The basis is right-handed in screen space: right = up x forward.
    /// Falls back to the default orientation when the view direction is
    /// degenerate or parallel to `up`.
    pub fn look_at(from: Vec3, at: Vec3, up: Vec3) -> Self {
        let forward = (at - from).try_normalize().unwrap_or(Vec3::Z);
        let right = up.cross(forward).try_normalize().unwrap_or(Vec3::X);
        let up = forward.cross(right);

        Self {
            origin: from,
            basis: Mat3::from_cols(right, up, forward),
            ..Default::default()
        }
    }

    /// Set the vertical field of view in degrees.
    pub fn with_fov(mut self, vertical_fov: f32) -> Self {
        self.vertical_fov = vertical_fov;
        self
    }

    pub fn right(&self) -> Vec3 {
        self.basis.x_axis
    }

    pub fn up(&self) -> Vec3 {
        self.basis.y_axis
    }

    pub fn forward(&self) -> Vec3 {
        self.basis.z_axis
    }

    /// Copy with the field of view and near plane pulled into range.
    ///
    /// A non-finite origin or basis falls back to the default. A finite
    /// basis is used as given.
    pub fn clamped(&self) -> Self {
        let defaults = Self::default();
        let origin = if self.origin.is_finite() {
            self.origin
        } else {
            defaults.origin
        };
        let basis = if self.basis.is_finite() {
            self.basis
        } else {
            defaults.basis
        };
        let fov = if self.vertical_fov.is_finite() {
            self.vertical_fov.clamp(MIN_FOV, MAX_FOV)
        } else {
            defaults.vertical_fov
        };
        let near_plane = if self.near_plane.is_finite() && self.near_plane > 0.0 {
            self.near_plane
        } else {
            defaults.near_plane
        };

        Self {
            origin,
            basis,
            vertical_fov: fov,
            near_plane,
        }
    }

    /// Primary ray through the centre of pixel (x, y); row 0 is the top.
    pub fn ray_for_pixel(&self, x: u32, y: u32, width: u32, height: u32) -> Ray {
        let plane_height = 2.0 * self.near_plane * (self.vertical_fov.to_radians() * 0.5).tan();
        let plane_width = plane_height * (width as f32 / height as f32);

        let u = (x as f32 + 0.5) / width as f32;
        let v = 1.0 - (y as f32 + 0.5) / height as f32;

        let local = Vec3::new((u - 0.5) * plane_width, (v - 0.5) * plane_height, self.near_plane);
        let direction = (self.basis * local).try_normalize().unwrap_or(self.forward());

        Ray::new(self.origin, direction)
    }
}
