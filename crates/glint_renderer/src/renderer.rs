//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive radiance estimation with a depth bound
//! - Importance sampled diffuse bounces
//! - Anti-aliasing via jittered multi-sampling
//! - Row-parallel rendering with rayon and throttled progress reports

use std::time::Instant;

use glint_math::{ColorSpace, Interval};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rayon::prelude::*;

use crate::output::NUM_COMPONENTS;
use crate::progress::ProgressTracker;
use crate::sampling::stream_seed;
use crate::{
    Camera, Color, HemisphereSampling, HitRecord, Hittable, ImageBuffer, Lambertian,
    ProgressSink, Ray, RenderConfig, RenderResult, Sampler, SkyGradient,
};

/// Minimum parameter of bounce rays, suppressing self-intersection.
pub const RAY_OFFSET: f32 = 1e-4;

/// Scale from `[0, 1]` to byte values; truncation maps 1.0 to 255.
const COMPONENT_SCALE: f32 = 255.99;

/// Keeps the jitter streams apart from the sampler streams of the same row.
const JITTER_SEED_MASK: u64 = 0x5DEE_CE66_D1CE_4E5B;

/// Radiance estimator for the rendering equation over a diffuse scene.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Integrator {
    /// Material shared by every surface
    pub material: Lambertian,
    /// Radiance for rays leaving the scene
    pub sky: SkyGradient,
    /// Distribution of bounce directions
    pub hemisphere: HemisphereSampling,
}

impl Integrator {
    pub fn new(hemisphere: HemisphereSampling) -> Self {
        Self {
            hemisphere,
            ..Self::default()
        }
    }

    /// Estimate the radiance arriving along `ray` with a single path.
    ///
    /// `depth` bounds the number of path segments; at zero the estimate is
    /// black. Each hit draws one direction from the sampler and recurses,
    /// weighting the incoming radiance by `brdf * cos(theta) / pdf`.
    pub fn radiance(
        &self,
        ray: &Ray,
        world: &dyn Hittable,
        depth: u32,
        sampler: &mut dyn Sampler,
    ) -> Color {
        if depth == 0 {
            return Color::ZERO;
        }

        let mut rec = HitRecord::default();
        if !world.hit(ray, &mut rec) {
            return self.sky.color(ray.direction());
        }

        let (direction, pdf) = self.hemisphere.sample(sampler.next_2d(), rec.normal);
        let cos_theta = rec.normal.dot(direction);
        debug_assert!(cos_theta > 0.0, "bounce below the surface: cos = {cos_theta}");

        let brdf = self.material.brdf();

        // The offset goes into t_min, the origin stays on the surface.
        let bounce = Ray::with_range(rec.position, direction, RAY_OFFSET, f32::INFINITY);
        let incoming = self.radiance(&bounce, world, depth - 1, sampler);

        brdf * incoming * cos_theta / pdf
    }
}

/// Convert a linear color to gamma corrected 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let c = color.linear_to_srgb();
    [
        (Interval::UNIT.clamp(c.x) * COMPONENT_SCALE) as u8,
        (Interval::UNIT.clamp(c.y) * COMPONENT_SCALE) as u8,
        (Interval::UNIT.clamp(c.z) * COMPONENT_SCALE) as u8,
    ]
}

/// Average `config.samples_per_pixel` radiance estimates for one pixel.
///
/// `y` counts up from the bottom of the image. With a single sample the
/// pixel is sampled at its center; otherwise each sample is jittered by a
/// uniform offset drawn from `jitter`.
#[allow(clippy::too_many_arguments)]
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    integrator: &Integrator,
    config: &RenderConfig,
    x: u32,
    y: u32,
    sampler: &mut dyn Sampler,
    jitter: &mut dyn RngCore,
) -> Color {
    let samples = config.samples_per_pixel;
    let mut pixel_color = Color::ZERO;

    sampler.start_pixel(x, y);
    for sample in 0..samples {
        sampler.start_sample(sample);

        let (jx, jy) = if samples == 1 {
            (0.5, 0.5)
        } else {
            (jitter.gen::<f32>(), jitter.gen::<f32>())
        };
        let u = (x as f32 + jx) / config.width as f32;
        let v = (y as f32 - jy) / config.height as f32;

        let ray = camera.get_ray(u, v);
        pixel_color += integrator.radiance(&ray, world, config.max_depth, sampler);
    }

    // Average the samples
    pixel_color / samples as f32
}

/// Render one output row. Row 0 is the top of the image.
fn render_line(
    line: usize,
    row: &mut [u8],
    camera: &Camera,
    world: &dyn Hittable,
    integrator: &Integrator,
    config: &RenderConfig,
) {
    let y = config.height - 1 - line as u32;
    let mut sampler = config.sampler.create(config.seed, line as u64);
    let mut jitter = StdRng::seed_from_u64(stream_seed(config.seed ^ JITTER_SEED_MASK, line as u64));

    for (x, pixel) in row.chunks_exact_mut(NUM_COMPONENTS).enumerate() {
        let color = render_pixel(
            camera,
            world,
            integrator,
            config,
            x as u32,
            y,
            sampler.as_mut(),
            &mut jitter,
        );
        pixel.copy_from_slice(&color_to_rgb(color));
    }

    log::trace!("Finished line {line}");
}

/// Render the scene with the default diffuse material and sky.
pub fn render(
    world: &dyn Hittable,
    camera: &Camera,
    config: &RenderConfig,
    progress: &dyn ProgressSink,
) -> RenderResult<ImageBuffer> {
    let integrator = Integrator::new(config.hemisphere);
    render_with(world, camera, &integrator, config, progress)
}

/// Render the scene to an RGB image buffer.
///
/// Rows are distributed over a rayon pool. Every row writes only its own
/// slice of the buffer and draws from its own seeded streams, so the image
/// is identical for any thread count or scheduling order.
pub fn render_with(
    world: &dyn Hittable,
    camera: &Camera,
    integrator: &Integrator,
    config: &RenderConfig,
    progress: &dyn ProgressSink,
) -> RenderResult<ImageBuffer> {
    config.validate()?;

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = config.threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build()?;

    log::info!(
        "Rendering {}x{} at {} samples per pixel ({} sampler, depth {}) on {} threads...",
        config.width,
        config.height,
        config.samples_per_pixel,
        config.sampler,
        config.max_depth,
        pool.current_num_threads()
    );

    let start = Instant::now();
    let mut image = ImageBuffer::new(config.width, config.height);
    let stride = image.stride();
    let tracker = ProgressTracker::new(progress, config.height as usize);

    pool.install(|| {
        image
            .as_bytes_mut()
            .par_chunks_mut(stride)
            .enumerate()
            .for_each(|(line, row)| {
                render_line(line, row, camera, world, integrator, config);
                tracker.complete_one();
            });
    });
    tracker.finish();

    debug_assert_eq!(tracker.completed(), config.height as usize);
    log::info!("Completed in {:.3} seconds", start.elapsed().as_secs_f32());

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RandomSampler, RenderError, SamplerKind, Scene, Vec3};
    use std::sync::Mutex;

    fn center_sphere_scene() -> Scene {
        Scene::new().with_sphere(Vec3::new(0.0, 0.0, -1.0), 0.5)
    }

    fn demo_scene() -> Scene {
        Scene::new()
            .with_sphere(Vec3::new(0.0, 0.0, -1.0), 0.5)
            .with_sphere(Vec3::new(0.0, -100.5, -1.0), 100.0)
    }

    fn forward_ray() -> Ray {
        Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn test_depth_zero_is_black() {
        let integrator = Integrator::default();
        let mut sampler = RandomSampler::new(1);

        for world in [Scene::new(), center_sphere_scene()] {
            let color = integrator.radiance(&forward_ray(), &world, 0, &mut sampler);
            assert_eq!(color, Color::ZERO);
        }
    }

    #[test]
    fn test_miss_returns_sky() {
        let integrator = Integrator::default();
        let world = Scene::new();
        let mut sampler = RandomSampler::new(1);

        for depth in [1, 5, 10] {
            let up = integrator.radiance(&Ray::new(Vec3::ZERO, Vec3::Y), &world, depth, &mut sampler);
            assert!((up - integrator.sky.zenith).length() < 1e-6);

            let down =
                integrator.radiance(&Ray::new(Vec3::ZERO, -Vec3::Y), &world, depth, &mut sampler);
            assert!((down - integrator.sky.horizon).length() < 1e-6);
        }
    }

    #[test]
    fn test_hit_at_depth_one_is_black() {
        let integrator = Integrator::default();
        let mut sampler = RandomSampler::new(1);

        let color = integrator.radiance(&forward_ray(), &center_sphere_scene(), 1, &mut sampler);
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn test_single_bounce_cosine_estimate() {
        // A convex sphere cannot see itself, so every bounce reaches the sky
        // and the cosine-weighted estimate reduces to albedo * sky.
        let integrator = Integrator::default();
        let world = center_sphere_scene();
        let mut sampler = RandomSampler::new(2);
        let albedo = integrator.material.albedo();

        for _ in 0..100 {
            let color = integrator.radiance(&forward_ray(), &world, 2, &mut sampler);
            // Horizon and zenith agree on blue
            assert!((color.z - albedo.z).abs() < 1e-4, "{color:?}");
            assert!(color.x >= albedo.x * integrator.sky.zenith.x - 1e-4);
            assert!(color.x <= albedo.x + 1e-4);
        }
    }

    #[test]
    fn test_uniform_and_cosine_agree() {
        let world = center_sphere_scene();
        let n = 20_000;

        let mean = |hemisphere| {
            let integrator = Integrator::new(hemisphere);
            let mut sampler = RandomSampler::new(17);
            let mut sum = Color::ZERO;
            for _ in 0..n {
                sum += integrator.radiance(&forward_ray(), &world, 2, &mut sampler);
            }
            sum / n as f32
        };

        let cosine = mean(HemisphereSampling::Cosine);
        let uniform = mean(HemisphereSampling::Uniform);
        assert!(
            (cosine - uniform).abs().max_element() < 0.02,
            "cosine {cosine:?} vs uniform {uniform:?}"
        );
    }

    #[test]
    fn test_color_to_rgb() {
        assert_eq!(color_to_rgb(Color::ZERO), [0, 0, 0]);
        assert_eq!(color_to_rgb(Color::ONE), [255, 255, 255]);
        assert_eq!(color_to_rgb(Color::new(4.0, -1.0, 0.5)), [255, 0, 186]);
    }

    #[test]
    fn test_render_pixel_single_sample_uses_center() {
        let config = RenderConfig::default()
            .with_resolution(4, 4)
            .with_quality(1, 3);
        let camera = Camera::for_image(config.width, config.height);
        let integrator = Integrator::default();
        let world = Scene::new();
        let mut sampler = RandomSampler::new(0);
        let mut jitter = StdRng::seed_from_u64(0);

        let color = render_pixel(
            &camera, &world, &integrator, &config, 1, 2, &mut sampler, &mut jitter,
        );

        let ray = camera.get_ray(1.5 / 4.0, 1.5 / 4.0);
        let expected = integrator.sky.color(ray.direction());
        assert!((color - expected).length() < 1e-6);
    }

    #[test]
    fn test_render_golden_black() {
        // The eye sits inside a sphere that fills the frame; at depth 1 every
        // primary ray hits and terminates black.
        let world = Scene::new().with_sphere(Vec3::new(0.0, 0.0, -1.0), 10.0);
        let config = RenderConfig::default()
            .with_resolution(2, 2)
            .with_quality(1, 1);
        let camera = Camera::for_image(2, 2);

        let image = render(&world, &camera, &config, &()).unwrap();
        assert_eq!(image.as_bytes(), &[0u8; 12]);
    }

    #[test]
    fn test_render_pinned_pixels() {
        // A convex sphere fills the frame and the sky is constant, so every
        // path hits once and escapes with exactly albedo * sky, whatever the
        // jitter and bounce streams draw.
        let world = Scene::new().with_sphere(Vec3::new(0.0, 0.0, -1.02), 1.0);
        let sky = Color::new(0.6, 0.4, 0.2);
        let integrator = Integrator {
            sky: SkyGradient::from_srgb(sky, sky),
            ..Integrator::default()
        };
        let camera = Camera::for_image(4, 2);

        #[rustfmt::skip]
        let expected: [u8; 24] = [
            115, 76, 38, 115, 76, 38, 115, 76, 38, 115, 76, 38,
            115, 76, 38, 115, 76, 38, 115, 76, 38, 115, 76, 38,
        ];

        for sampler in [SamplerKind::Random, SamplerKind::QuasiRandom] {
            let config = RenderConfig::default()
                .with_resolution(4, 2)
                .with_quality(4, 3)
                .with_seed(7)
                .with_sampler(sampler);

            let image = render_with(&world, &camera, &integrator, &config, &()).unwrap();
            assert_eq!(image.as_bytes(), &expected, "{sampler} sampler");
        }
    }

    #[test]
    fn test_negative_radius_sphere_stays_finite() {
        // Inward normals send every bounce into the sphere, so paths run out
        // of depth without ever seeing the sky.
        let integrator = Integrator::default();
        let world = Scene::new().with_sphere(Vec3::new(0.0, 0.0, -1.0), -0.5);
        let mut sampler = RandomSampler::new(3);

        for _ in 0..100 {
            let color = integrator.radiance(&forward_ray(), &world, 3, &mut sampler);
            assert_eq!(color, Color::ZERO);
        }
    }

    #[test]
    fn test_render_empty_scene_is_sky() {
        let config = RenderConfig::default()
            .with_resolution(4, 3)
            .with_quality(1, 4);
        let camera = Camera::for_image(config.width, config.height);
        let sky = SkyGradient::default();

        let image = render(&Scene::new(), &camera, &config, &()).unwrap();

        for line in 0..config.height {
            let y = config.height - 1 - line;
            for x in 0..config.width {
                let u = (x as f32 + 0.5) / config.width as f32;
                let v = (y as f32 - 0.5) / config.height as f32;
                let expected = color_to_rgb(sky.color(camera.get_ray(u, v).direction()));
                assert_eq!(image.pixel(x, line), expected, "pixel ({x}, {line})");
            }
        }

        // Top row is closer to the zenith, so bluer (less red) than the bottom
        assert!(image.pixel(0, 0)[0] <= image.pixel(0, config.height - 1)[0]);
    }

    #[test]
    fn test_render_is_deterministic() {
        let world = demo_scene();

        for sampler in [SamplerKind::Random, SamplerKind::QuasiRandom] {
            let config = RenderConfig::default()
                .with_resolution(16, 9)
                .with_quality(4, 4)
                .with_seed(1234)
                .with_sampler(sampler);
            let camera = Camera::for_image(config.width, config.height);

            let first = render(&world, &camera, &config.clone().with_threads(1), &()).unwrap();
            let second = render(&world, &camera, &config.clone().with_threads(4), &()).unwrap();
            let third = render(&world, &camera, &config, &()).unwrap();

            assert_eq!(first, second, "{sampler} output depends on thread count");
            assert_eq!(first, third);
        }
    }

    #[test]
    fn test_render_seed_changes_noise() {
        let world = demo_scene();
        let config = RenderConfig::default()
            .with_resolution(16, 9)
            .with_quality(2, 4)
            .with_sampler(SamplerKind::Random);
        let camera = Camera::for_image(config.width, config.height);

        let a = render(&world, &camera, &config.clone().with_seed(1), &()).unwrap();
        let b = render(&world, &camera, &config.clone().with_seed(2), &()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_render_rejects_invalid_config() {
        let world = demo_scene();
        let camera = Camera::new(1.0);

        let config = RenderConfig::default().with_resolution(0, 4);
        assert!(matches!(
            render(&world, &camera, &config, &()),
            Err(RenderError::InvalidDimensions { .. })
        ));

        let config = RenderConfig::default().with_quality(0, 4);
        assert!(matches!(
            render(&world, &camera, &config, &()),
            Err(RenderError::ZeroSamples)
        ));
    }

    #[test]
    fn test_render_reports_completion() {
        struct Recorder(Mutex<Vec<f32>>);
        impl ProgressSink for Recorder {
            fn update(&self, fraction: f32) {
                self.0.lock().unwrap().push(fraction);
            }
        }

        let recorder = Recorder(Mutex::new(Vec::new()));
        let config = RenderConfig::default()
            .with_resolution(8, 8)
            .with_quality(1, 2);
        let camera = Camera::for_image(8, 8);

        render(&demo_scene(), &camera, &config, &recorder).unwrap();

        let updates = recorder.0.lock().unwrap();
        assert_eq!(updates.last(), Some(&1.0));
        assert!(updates.iter().all(|f| (0.0..=1.0).contains(f)));
        assert!(updates.windows(2).all(|w| w[0] <= w[1]));
    }
}
