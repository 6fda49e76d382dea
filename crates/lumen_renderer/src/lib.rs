//! Lumen renderer - progressive CPU path tracing
//!
//! A Monte Carlo path tracer over an immutable scene snapshot. Each frame
//! traces a fixed sample set per pixel in parallel buckets and folds the
//! result into a running average that restarts whenever the scene, camera
//! or parameters change.

mod accumulation;
mod bucket;
mod camera;
mod environment;
mod error;
mod hittable;
mod integrator;
mod material;
mod random;
mod renderer;
mod sphere;
mod triangle;

pub use accumulation::{color_to_rgba, linear_to_gamma, merge_pixel, AccumulationBuffer, ColorBuffer};
pub use bucket::{generate_buckets, render_bucket, render_buckets, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::{Camera, MAX_FOV, MIN_FOV};
pub use environment::EnvironmentParams;
pub use error::{RenderError, RenderResult};
pub use hittable::{closest_hit, intersect_aabb, HitRecord};
pub use integrator::{sample_pixel, trace};
pub use material::{scatter, Scatter};
pub use random::{RandomStream, FRAME_SEED_STRIDE};
pub use renderer::{render_pixel, FrameMode, RenderParams, Renderer};
pub use sphere::intersect_sphere;
pub use triangle::{barycentric_hit, intersect_triangle, TriangleHit, DETERMINANT_EPSILON};

/// Re-export common types used in the public API
pub use lumen_core::{Color, Material, SceneSnapshot};
pub use lumen_math::{Ray, Vec3};
