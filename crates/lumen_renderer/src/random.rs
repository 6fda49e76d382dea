//! Deterministic per-pixel random numbers.
//!
//! A `RandomStream` is a single `u32` of state advanced by an integer-only
//! PCG-style hash. It is seeded from the pixel index and the frame number,
//! so every pixel of every frame has its own reproducible sequence and
//! parallel pixel evaluation needs no shared state at all.

use lumen_math::Vec3;
use std::f32::consts::TAU;

/// Multiplier applied to the frame number when deriving a pixel seed.
pub const FRAME_SEED_STRIDE: u32 = 719_393;

/// Hash-based random stream. Cheap to copy; the state is an explicit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomStream {
    state: u32,
}

impl RandomStream {
    /// Create a stream from a raw seed.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Seed for a pixel (`y * width + x`) in a given frame.
    pub fn for_pixel(pixel_index: u32, frame: u32) -> Self {
        Self::new(pixel_index.wrapping_add(frame.wrapping_mul(FRAME_SEED_STRIDE)))
    }

    /// Current state, e.g. to resume a stream elsewhere.
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Advance the state and return 32 hashed bits.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(747_796_405).wrapping_add(2_891_336_987);
        let word = ((self.state >> ((self.state >> 28) + 4)) ^ self.state).wrapping_mul(277_803_737);
        (word >> 22) ^ word
    }

    /// Uniform scalar in [0, 1).
    ///
    /// Uses the top 24 bits so the result is exactly representable and never
    /// rounds up to 1.0.
    #[inline]
    pub fn next_scalar(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 * (1.0 / 16_777_216.0)
    }

    /// Standard normal sample (Box-Muller, cosine branch).
    #[inline]
    pub fn next_normal(&mut self) -> f32 {
        let theta = TAU * self.next_scalar();
        // 1 - u lies in (0, 1], so the logarithm stays finite
        let rho = (-2.0 * (1.0 - self.next_scalar()).ln()).sqrt();
        rho * theta.cos()
    }

    /// Direction uniformly distributed on the unit sphere.
    #[inline]
    pub fn next_direction(&mut self) -> Vec3 {
        let x = self.next_normal();
        let y = self.next_normal();
        let z = self.next_normal();
        Vec3::new(x, y, z).try_normalize().unwrap_or(Vec3::Y)
    }

    /// Direction on the hemisphere around `normal`.
    ///
    /// A sphere sample with its sign flipped when it points below the
    /// surface. This is not cosine-weighted.
    #[inline]
    pub fn next_hemisphere_direction(&mut self, normal: Vec3) -> Vec3 {
        let dir = self.next_direction();
        if dir.dot(normal) < 0.0 {
            -dir
        } else {
            dir
        }
    }
}
