//! Progressive frame loop.
//!
//! The `Renderer` owns the camera, the render parameters and the
//! accumulation state, and shares the immutable scene snapshot with every
//! pixel job. Each call to `render_frame` traces one sample set per pixel
//! in parallel buckets and folds it into the running average.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};
use lumen_core::{Color, SceneSnapshot};
use serde::{Deserialize, Serialize};

use crate::accumulation::{AccumulationBuffer, ColorBuffer};
use crate::bucket::{render_buckets, DEFAULT_BUCKET_SIZE};
use crate::camera::Camera;
use crate::environment::EnvironmentParams;
use crate::error::{RenderError, RenderResult};
use crate::integrator::sample_pixel;
use crate::random::RandomStream;

/// Render configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderParams {
    /// Extra segments after the primary ray
    pub max_bounces: u32,
    /// Paths traced per pixel per frame (>= 1)
    pub rays_per_pixel: u32,
    /// Light seen by escaping rays
    pub environment: EnvironmentParams,
    /// Tile edge length in pixels (>= 1)
    pub bucket_size: u32,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            max_bounces: 8,
            rays_per_pixel: 4,
            environment: EnvironmentParams::default(),
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

impl RenderParams {
    /// Copy with every field pulled into its valid range.
    pub fn clamped(&self) -> Self {
        Self {
            max_bounces: self.max_bounces,
            rays_per_pixel: self.rays_per_pixel.max(1),
            environment: self.environment.clamped(),
            bucket_size: self.bucket_size.max(1),
        }
    }
}

/// Whether rendered frames feed the running average.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameMode {
    /// Merge every frame and advance the frame counter
    #[default]
    Progressive,
    /// Blend each frame into the average without advancing the frame counter
    Still,
}

/// Radiance estimate for one pixel of frame `frame`.
///
/// Depends only on its arguments, so pixels can be evaluated in any order
/// or in parallel.
#[allow(clippy::too_many_arguments)]
pub fn render_pixel(
    scene: &SceneSnapshot,
    camera: &Camera,
    params: &RenderParams,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    frame: u32,
) -> Color {
    let ray = camera.ray_for_pixel(x, y, width, height);
    let pixel_index = y.wrapping_mul(width).wrapping_add(x);
    sample_pixel(
        &ray,
        scene,
        &params.environment,
        params.rays_per_pixel,
        params.max_bounces,
        RandomStream::for_pixel(pixel_index, frame),
    )
}

/// Progressive path tracing renderer.
pub struct Renderer {
    scene: Arc<SceneSnapshot>,
    camera: Camera,
    params: RenderParams,
    mode: FrameMode,
    accumulation: AccumulationBuffer,
}

impl Renderer {
    pub fn new(scene: Arc<SceneSnapshot>, camera: Camera, params: RenderParams) -> Self {
        Self {
            scene,
            camera: clamp_logged(camera, camera.clamped(), "camera"),
            params: clamp_logged(params, params.clamped(), "render parameters"),
            mode: FrameMode::default(),
            accumulation: AccumulationBuffer::new(0, 0),
        }
    }

    /// Swap in a new scene snapshot. Always restarts accumulation.
    pub fn set_scene(&mut self, scene: Arc<SceneSnapshot>) {
        info!(
            "Scene swapped: {} spheres, {} triangles in {} chunks",
            scene.spheres().len(),
            scene.triangles().len(),
            scene.chunks().len()
        );
        self.scene = scene;
        self.reset("scene changed");
    }

    /// Replace the camera; restarts accumulation if it differs.
    pub fn set_camera(&mut self, camera: Camera) {
        let camera = clamp_logged(camera, camera.clamped(), "camera");
        if camera != self.camera {
            self.camera = camera;
            self.reset("camera changed");
        }
    }

    /// Replace the render parameters; restarts accumulation if they differ.
    pub fn set_parameters(&mut self, params: RenderParams) {
        let params = clamp_logged(params, params.clamped(), "render parameters");
        if params != self.params {
            self.params = params;
            self.reset("parameters changed");
        }
    }

    pub fn set_mode(&mut self, mode: FrameMode) {
        self.mode = mode;
    }

    /// Discard the running average.
    pub fn reset(&mut self, reason: &str) {
        debug!(
            "Accumulation reset after {} frames: {}",
            self.accumulation.frame_count(),
            reason
        );
        self.accumulation.reset();
    }

    pub fn scene(&self) -> &Arc<SceneSnapshot> {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn params(&self) -> &RenderParams {
        &self.params
    }

    pub fn mode(&self) -> FrameMode {
        self.mode
    }

    /// Frames merged since the last reset.
    pub fn frame_count(&self) -> u32 {
        self.accumulation.frame_count()
    }

    /// Running average of all merged frames.
    pub fn accumulated(&self) -> &ColorBuffer {
        self.accumulation.average()
    }

    /// Render one frame. See [`Renderer::render_frame_cancellable`].
    pub fn render_frame(&mut self, width: u32, height: u32) -> RenderResult<&ColorBuffer> {
        self.render_frame_cancellable(width, height, &AtomicBool::new(false))
    }

    /// Render one frame, giving up as soon as `cancel` is raised.
    ///
    /// The frame is merged into the running average, which is returned.
    /// Progressive mode then advances the frame counter. Still mode keeps
    /// it, so the next frame reuses the same seed and merge weight. A
    /// cancelled frame is discarded.
    pub fn render_frame_cancellable(
        &mut self,
        width: u32,
        height: u32,
        cancel: &AtomicBool,
    ) -> RenderResult<&ColorBuffer> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidResolution { width, height });
        }
        if self.accumulation.dimensions() != (width, height) {
            debug!("Accumulation reset: resolution is now {}x{}", width, height);
            self.accumulation.resize(width, height);
        }

        let frame = self.accumulation.frame_count();
        let start = Instant::now();

        let scene = self.scene.as_ref();
        let camera = &self.camera;
        let params = &self.params;
        let image = render_buckets(width, height, params.bucket_size, cancel, |x, y| {
            render_pixel(scene, camera, params, x, y, width, height, frame)
        });

        let Some(image) = image else {
            warn!("Frame {} cancelled", frame);
            return Err(RenderError::Cancelled { frame });
        };
        debug!("Frame {} rendered in {:.2?}", frame, start.elapsed());

        match self.mode {
            FrameMode::Progressive => self.accumulation.merge_frame(&image)?,
            FrameMode::Still => self.accumulation.blend_frame(&image)?,
        }
        Ok(self.accumulation.average())
    }
}

fn clamp_logged<T: PartialEq + std::fmt::Debug>(given: T, clamped: T, what: &str) -> T {
    if given != clamped {
        warn!("Clamped {}: {:?} -> {:?}", what, given, clamped);
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulation::merge_pixel;
    use lumen_core::{Material, Mesh, SceneBuilder};
    use lumen_math::{Mat4, Vec3};
    use std::sync::atomic::Ordering;

    fn sphere_scene(material: Material) -> Arc<SceneSnapshot> {
        let mut builder = SceneBuilder::new();
        builder.add_sphere(Vec3::new(0.0, 0.0, 5.0), 1.0, material);
        Arc::new(builder.build().expect("valid scene"))
    }

    fn dark_params() -> RenderParams {
        RenderParams {
            max_bounces: 0,
            rays_per_pixel: 1,
            environment: EnvironmentParams::disabled(),
            bucket_size: 2,
        }
    }

    /// A small scene with bounces and sky light, so frames are noisy.
    fn busy_renderer() -> Renderer {
        let mut builder = SceneBuilder::new();
        builder
            .add_sphere(Vec3::new(0.0, 0.0, 5.0), 1.0, Material::new(Vec3::new(0.8, 0.3, 0.3)))
            .add_sphere(
                Vec3::new(1.5, 0.5, 6.0),
                0.7,
                Material::new(Vec3::ONE).with_emission(Vec3::ONE, 3.0),
            );
        builder
            .add_mesh(
                "floor",
                &Mesh::plane(10.0),
                Mat4::from_translation(Vec3::new(0.0, -1.0, 5.0)),
                Material::new(Vec3::splat(0.6)).with_specular(0.9, Vec3::ONE, 0.2),
            )
            .expect("valid mesh");
        let scene = Arc::new(builder.build().expect("valid scene"));

        let params = RenderParams {
            max_bounces: 3,
            rays_per_pixel: 2,
            bucket_size: 3,
            ..Default::default()
        };
        Renderer::new(scene, Camera::default(), params)
    }

    #[test]
    fn test_black_sphere_scene() {
        let mut renderer = Renderer::new(sphere_scene(Material::new(Vec3::ONE)), Camera::default(), dark_params());
        let image = renderer.render_frame(5, 5).expect("frame renders");
        assert!(image.pixels().iter().all(|&c| c == Color::ZERO));
    }

    #[test]
    fn test_emissive_sphere_scene() {
        let material = Material::new(Vec3::ONE).with_emission(Vec3::ONE, 2.0);
        let mut renderer = Renderer::new(sphere_scene(material), Camera::default(), dark_params());
        let image = renderer.render_frame(5, 5).expect("frame renders");

        assert_eq!(image.get(2, 2), Color::splat(2.0));
        assert_eq!(image.get(0, 0), Color::ZERO);
        for &c in image.pixels() {
            assert!(c == Color::ZERO || c == Color::splat(2.0), "{:?}", c);
        }
    }

    #[test]
    fn test_empty_scene_sky_and_ground() {
        let params = RenderParams {
            environment: EnvironmentParams {
                ground_color: Color::ZERO,
                zenith_color: Color::new(0.0, 0.0, 1.0),
                sun_intensity: 0.0,
                ..Default::default()
            },
            ..dark_params()
        };
        let up = Camera::look_at(Vec3::ZERO, Vec3::Y, Vec3::Z);
        let mut renderer = Renderer::new(Arc::new(SceneSnapshot::empty()), up, params);
        let c = renderer.render_frame(1, 1).expect("frame renders").get(0, 0);
        assert!((c - Color::new(0.0, 0.0, 1.0)).length() < 1e-5, "{:?}", c);

        renderer.set_camera(Camera::look_at(Vec3::ZERO, Vec3::NEG_Y, Vec3::Z));
        let c = renderer.render_frame(1, 1).expect("frame renders").get(0, 0);
        assert_eq!(c, Color::ZERO);
    }

    #[test]
    fn test_reverse_order_matches_parallel() {
        let (width, height) = (13, 9);
        let mut renderer = busy_renderer();
        let parallel = renderer.render_frame(width, height).expect("frame renders").clone();

        let mut reversed = ColorBuffer::new(width, height);
        for y in (0..height).rev() {
            for x in (0..width).rev() {
                let c = render_pixel(
                    renderer.scene(),
                    renderer.camera(),
                    renderer.params(),
                    x,
                    y,
                    width,
                    height,
                    0,
                );
                reversed.set(x, y, c);
            }
        }
        assert_eq!(parallel, reversed);
    }

    #[test]
    fn test_progressive_average() {
        let (width, height) = (6, 4);
        let mut renderer = busy_renderer();
        renderer.render_frame(width, height).expect("frame renders");
        renderer.render_frame(width, height).expect("frame renders");
        assert_eq!(renderer.frame_count(), 2);

        for y in 0..height {
            for x in 0..width {
                let pixel = |frame| {
                    render_pixel(
                        renderer.scene(),
                        renderer.camera(),
                        renderer.params(),
                        x,
                        y,
                        width,
                        height,
                        frame,
                    )
                };
                let mean = (pixel(0) + pixel(1)) * 0.5;
                assert!((renderer.accumulated().get(x, y) - mean).length() < 1e-4);
            }
        }
    }

    #[test]
    fn test_set_camera_resets() {
        let moved = Camera::look_at(Vec3::new(0.5, 0.5, 0.0), Vec3::new(0.0, 0.0, 5.0), Vec3::Y);

        let mut renderer = busy_renderer();
        for _ in 0..3 {
            renderer.render_frame(8, 8).expect("frame renders");
        }
        renderer.set_camera(moved);
        assert_eq!(renderer.frame_count(), 0);
        let after = renderer.render_frame(8, 8).expect("frame renders").clone();

        let mut fresh = busy_renderer();
        fresh.set_camera(moved);
        let expected = fresh.render_frame(8, 8).expect("frame renders");
        assert_eq!(&after, expected);
    }

    #[test]
    fn test_unchanged_settings_keep_accumulating() {
        let mut renderer = busy_renderer();
        renderer.render_frame(4, 4).expect("frame renders");
        renderer.set_camera(*renderer.camera());
        renderer.set_parameters(*renderer.params());
        assert_eq!(renderer.frame_count(), 1);

        renderer.set_parameters(RenderParams {
            max_bounces: 1,
            ..*renderer.params()
        });
        assert_eq!(renderer.frame_count(), 0);
    }

    #[test]
    fn test_set_scene_and_resolution_reset() {
        let mut renderer = busy_renderer();
        renderer.render_frame(4, 4).expect("frame renders");
        renderer.render_frame(4, 4).expect("frame renders");
        renderer.render_frame(5, 4).expect("frame renders");
        assert_eq!(renderer.frame_count(), 1);

        let scene = renderer.scene().clone();
        renderer.set_scene(scene);
        assert_eq!(renderer.frame_count(), 0);
    }

    #[test]
    fn test_parameters_clamped() {
        let mut renderer = busy_renderer();
        renderer.set_parameters(RenderParams {
            rays_per_pixel: 0,
            bucket_size: 0,
            ..Default::default()
        });
        assert_eq!(renderer.params().rays_per_pixel, 1);
        assert_eq!(renderer.params().bucket_size, 1);
    }

    #[test]
    fn test_invalid_resolution() {
        let mut renderer = busy_renderer();
        assert_eq!(
            renderer.render_frame(0, 4).unwrap_err(),
            RenderError::InvalidResolution { width: 0, height: 4 }
        );
    }

    #[test]
    fn test_cancelled_frame_is_discarded() {
        let mut renderer = busy_renderer();
        let first = renderer.render_frame(6, 6).expect("frame renders").clone();

        let cancel = AtomicBool::new(false);
        cancel.store(true, Ordering::Relaxed);
        let err = renderer.render_frame_cancellable(6, 6, &cancel).unwrap_err();
        assert_eq!(err, RenderError::Cancelled { frame: 1 });
        assert_eq!(renderer.frame_count(), 1);
        assert_eq!(renderer.accumulated(), &first);
    }

    #[test]
    fn test_still_mode_blends_without_advancing() {
        let mut renderer = busy_renderer();
        for _ in 0..4 {
            renderer.render_frame(6, 6).expect("frame renders");
        }
        let before = renderer.accumulated().clone();

        renderer.set_mode(FrameMode::Still);
        let still = renderer.render_frame(6, 6).expect("frame renders").clone();
        assert_eq!(renderer.frame_count(), 4);
        assert_eq!(renderer.accumulated(), &still);

        let scene = renderer.scene().clone();
        for y in 0..6 {
            for x in 0..6 {
                let new = render_pixel(&scene, renderer.camera(), renderer.params(), x, y, 6, 6, 4);
                let expected = merge_pixel(new, before.get(x, y), 4);
                assert!((still.get(x, y) - expected).length() < 1e-4, "pixel {} {}", x, y);
            }
        }
    }

    #[test]
    fn test_still_mode_first_frame_matches_progressive() {
        let mut progressive = busy_renderer();
        let first = progressive.render_frame(6, 6).expect("frame renders").clone();

        let mut still = busy_renderer();
        still.set_mode(FrameMode::Still);
        assert_eq!(still.render_frame(6, 6).expect("frame renders"), &first);
        assert_eq!(still.frame_count(), 0);
    }
}
