//! Simple path tracer example.
//!
//! Renders a row of spheres on a ground sphere and saves a PNG.

use glint_renderer::{render, Camera, RenderConfig, SamplerKind, Scene, Vec3};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Build the scene
    let start = std::time::Instant::now();
    let scene = build_scene();
    println!("Scene with {} spheres built in {:?}", scene.len(), start.elapsed());

    let config = RenderConfig::default()
        .with_resolution(320, 180)
        .with_quality(64, 10)
        .with_sampler(SamplerKind::QuasiRandom);
    let camera = Camera::for_image(config.width, config.height);

    // Render
    let start = std::time::Instant::now();
    let image = render(&scene, &camera, &config, &())?;
    println!("Rendered in {:?}", start.elapsed());

    let filename = "simple_render.png";
    image.save_png(filename, 4)?;
    println!("Saved to {}", filename);

    Ok(())
}

fn build_scene() -> Scene {
    // Ground
    let mut scene = Scene::new().with_sphere(Vec3::new(0.0, -100.5, -1.0), 100.0);

    // Three spheres side by side
    for x in [-1.1_f32, 0.0, 1.1] {
        scene = scene.with_sphere(Vec3::new(x, 0.0, -1.5), 0.5);
    }

    scene
}
