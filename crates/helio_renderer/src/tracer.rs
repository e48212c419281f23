//! The per-pixel trace loop.
//!
//! For every pixel: cast, shade with every enabled light (shadow rays
//! decide occlusion), follow mirror bounces up to the configured depth,
//! average the supersamples, write bytes. Misses are background black.

use helio_core::Color;
use helio_math::{Ray, Vec3};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::buffer::ImageBuffer;
use crate::camera::{Camera, PixelRay, RayGrid};
use crate::geometry::Intersection;
use crate::scene::Scene;

/// Offset applied along secondary-ray directions so a shadow or bounce ray
/// cannot re-hit the surface it starts on.
pub const EPSILON: f32 = 1e-3;

/// Rows between progress log lines.
const PROGRESS_ROWS: u32 = 64;

/// Tunable trace parameters.
///
/// These are plain public fields; the input layer adjusts them directly
/// between trace calls.
#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    /// Supersampling factor: antialias² sub-rays per pixel.
    pub antialias: u32,
    /// Sub-ray perturbation fraction in [0, 1]; 0 disables jitter.
    pub jitter: f32,
    /// Mirror bounce count; 0 gives plain Phong.
    pub reflections: u32,
    /// Seed for the per-pixel jitter RNG.
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            antialias: 1,
            jitter: 0.0,
            reflections: 1,
            seed: 0,
        }
    }
}

/// Owns the output buffer and orchestrates the pixel loop.
pub struct Tracer {
    pub img: ImageBuffer,
    pub config: RenderConfig,
}

impl Tracer {
    /// Create a tracer with a buffer of the given resolution and default
    /// settings.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            img: ImageBuffer::new(width, height),
            config: RenderConfig::default(),
        }
    }

    /// Render the scene through the camera into the image buffer.
    ///
    /// Runs to completion on the calling thread; there is no cancellation.
    pub fn trace(&mut self, camera: &Camera, scene: &Scene) {
        let mut grid = camera.ray_grid(self.img.width(), self.img.height());
        while let Some(pixel) = grid.next() {
            let color = render_pixel(&grid, &pixel, scene, &self.config);
            self.img.set(pixel.x, pixel.y, color_to_rgb(color));
            if pixel.x == 0 && (pixel.y + 1) % PROGRESS_ROWS == 0 {
                log::debug!("traced {} of {} rows", pixel.y + 1, self.img.height());
            }
        }
    }

    /// Row-parallel variant of [`Tracer::trace`] with identical output.
    ///
    /// Each pixel re-seeds its own RNG, so the result does not depend on
    /// which worker renders which row.
    pub fn trace_parallel(&mut self, camera: &Camera, scene: &Scene) {
        use rayon::prelude::*;

        let grid = camera.ray_grid(self.img.width(), self.img.height());
        let config = self.config;
        let width = self.img.width();

        self.img
            .data_mut()
            .par_chunks_mut(3 * width as usize)
            .enumerate()
            .for_each(|(y, row)| {
                let y = y as u32;
                for x in (0..width).rev() {
                    let pixel = PixelRay {
                        x,
                        y,
                        ray: grid.ray_at(x, y),
                    };
                    let color = render_pixel(&grid, &pixel, scene, &config);
                    let i = (3 * x) as usize;
                    row[i..i + 3].copy_from_slice(&color_to_rgb(color));
                }
            });
    }
}

/// Average the supersampled colors for one pixel.
pub fn render_pixel(
    grid: &RayGrid,
    pixel: &PixelRay,
    scene: &Scene,
    config: &RenderConfig,
) -> Color {
    let antialias = config.antialias.max(1);
    let mut rng = SmallRng::seed_from_u64(
        config.seed ^ (((pixel.y as u64) << 32) | pixel.x as u64),
    );
    let scale = 1.0 / (antialias * antialias) as f32;

    let mut average = Color::ZERO;
    for a in 0..antialias {
        for b in 0..antialias {
            let ray = grid.subsample(&pixel.ray, antialias, a, b, config.jitter, &mut rng);
            average += ray_color(&ray, scene, config.reflections) * scale;
        }
    }
    average
}

/// Compute the color seen by a ray: Phong shading at the nearest hit plus
/// up to `reflections` mirror bounces, black on a miss.
pub fn ray_color(ray: &Ray, scene: &Scene, reflections: u32) -> Color {
    let Some(hit) = scene.root.intersect(ray.origin, ray.direction) else {
        return Color::ZERO;
    };

    let incoming = ray.direction.normalize();
    let mut normal = hit.surface.surface_normal(hit.point);
    let mut color = shade_surface(&hit, incoming, normal, scene);

    // Each bounce blends the next surface's Phong color in by the current
    // mix, then scales the mix by that surface's own mirror coefficient so
    // deeper bounces contribute less.
    let mut mix = hit.surface.material().mirror;
    let mut point = hit.point;
    let mut direction = incoming;
    for _ in 0..reflections {
        let reflected = reflect(direction, normal);
        let origin = point + reflected * EPSILON;
        let Some(bounce) = scene.root.intersect(origin, reflected) else {
            break;
        };

        let bounce_normal = bounce.surface.surface_normal(bounce.point);
        let secondary = shade_surface(&bounce, reflected, bounce_normal, scene);
        color = color * (1.0 - mix) + secondary * mix;

        mix *= bounce.surface.material().mirror;
        point = bounce.point;
        direction = reflected;
        normal = bounce_normal;
    }

    color
}

/// Phong-shade one surface point against every enabled, unoccluded light.
fn shade_surface(hit: &Intersection, view: Vec3, normal: Vec3, scene: &Scene) -> Color {
    let material = hit.surface.material();
    let mut color = Color::ZERO;

    for light in scene.lights.iter().filter(|l| l.enabled) {
        let to_light = light.position - hit.point;
        let light_distance = to_light.length();
        let light_direction = to_light / light_distance;

        // An occluded light contributes nothing, ambient included.
        let shadow_origin = hit.point + light_direction * EPSILON;
        if let Some(blocker) = scene.root.intersect(shadow_origin, light_direction) {
            if blocker.distance < light_distance {
                continue;
            }
        }

        let n_dot_l = normal.dot(light_direction).max(0.0);
        let reflected = reflect(-light_direction, normal);
        let specular_term = (-reflected.dot(view)).max(0.0).powf(material.shiny);
        material.add_phong(light, n_dot_l, specular_term, &mut color);
    }

    color
}

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Convert an accumulated color to bytes, clamping each channel.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    [
        (255.0 * color.x.clamp(0.0, 1.0)) as u8,
        (255.0 * color.y.clamp(0.0, 1.0)) as u8,
        (255.0 * color.z.clamp(0.0, 1.0)) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Perspective;
    use crate::geometry::{Composite, Disc, Geometry, GridPlane, Plane, Sphere};
    use helio_core::{Light, Material};
    use helio_math::Vec3;
    use std::sync::Arc;

    fn downward_camera(height: f32) -> Camera {
        Camera::new(
            Vec3::new(0.0, 0.0, height),
            Vec3::Y,
            Vec3::NEG_Z,
            Perspective::new(35.0, 1.0, 1.0, 100.0),
        )
    }

    fn white_light(position: Vec3) -> Light {
        Light::new(
            position,
            Vec3::splat(0.3),
            Vec3::splat(0.75),
            Vec3::splat(0.5),
        )
    }

    #[test]
    fn test_miss_is_black() {
        let scene = Scene::new(
            Geometry::Sphere(Sphere::new(Vec3::ZERO, 1.0, Material::basic())),
            vec![white_light(Vec3::new(0.0, 0.0, 5.0))],
        );
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert_eq!(ray_color(&ray, &scene, 1), Color::ZERO);
    }

    #[test]
    fn test_shadow_occlusion_zeroes_the_light() {
        let plane: Geometry = Plane::new(Vec3::ZERO, Vec3::Z, Material::matte()).into();
        let occluder: Geometry =
            Sphere::new(Vec3::new(0.0, 0.0, 2.0), 0.5, Material::basic()).into();
        let light = white_light(Vec3::new(0.0, 0.0, 5.0));

        // Primary ray hits the plane at the origin without touching the
        // occluder; the shadow segment from there to the light does.
        let ray = Ray::new(Vec3::new(3.0, 0.0, 3.0), Vec3::new(-1.0, 0.0, -1.0));

        let shadowed = Scene::new(
            Geometry::Composite(Composite::new(vec![
                Plane::new(Vec3::ZERO, Vec3::Z, Material::matte()).into(),
                occluder,
            ])),
            vec![light.clone()],
        );
        assert_eq!(ray_color(&ray, &shadowed, 0), Color::ZERO);

        let open = Scene::new(plane, vec![light]);
        let lit = ray_color(&ray, &open, 0);
        assert!(lit.max_element() > 0.0);
    }

    #[test]
    fn test_disabled_light_contributes_nothing() {
        let mut light = white_light(Vec3::new(0.0, 0.0, 5.0));
        light.enabled = false;
        let scene = Scene::new(
            Geometry::Plane(Plane::new(Vec3::ZERO, Vec3::Z, Material::matte())),
            vec![light],
        );

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert_eq!(ray_color(&ray, &scene, 0), Color::ZERO);
    }

    #[test]
    fn test_lights_sum_across_the_list() {
        let scene_one = Scene::new(
            Geometry::Plane(Plane::new(Vec3::ZERO, Vec3::Z, Material::matte())),
            vec![white_light(Vec3::new(0.0, 0.0, 5.0))],
        );
        let scene_two = Scene::new(
            Geometry::Plane(Plane::new(Vec3::ZERO, Vec3::Z, Material::matte())),
            vec![
                white_light(Vec3::new(0.0, 0.0, 5.0)),
                white_light(Vec3::new(4.0, 0.0, 5.0)),
            ],
        );

        let ray = Ray::new(Vec3::new(1.0, 0.0, 5.0), Vec3::NEG_Z);
        let one = ray_color(&ray, &scene_one, 0);
        let two = ray_color(&ray, &scene_two, 0);
        assert!(two.min_element() >= one.min_element());
        assert!(two.max_element() > one.max_element());
    }

    /// A mirror floor below a matte red ceiling, lit from between them.
    fn mirror_box() -> (Scene, Ray) {
        let floor = Material::new(
            Vec3::splat(0.1),
            Vec3::splat(0.2),
            Vec3::splat(0.8),
            40.0,
            0.8,
        );
        let scene = Scene::new(
            Geometry::Composite(Composite::new(vec![
                Plane::new(Vec3::ZERO, Vec3::Z, Arc::new(floor)).into(),
                Plane::new(Vec3::new(0.0, 0.0, 4.0), Vec3::NEG_Z, Material::red()).into(),
            ])),
            vec![white_light(Vec3::new(0.0, 0.0, 2.0))],
        );
        let ray = Ray::new(Vec3::new(1.0, 1.0, 2.0), Vec3::NEG_Z);
        (scene, ray)
    }

    #[test]
    fn test_mirror_bounce_changes_the_color() {
        let (scene, ray) = mirror_box();
        let direct = ray_color(&ray, &scene, 0);
        let bounced = ray_color(&ray, &scene, 1);
        assert_ne!(direct, bounced);
    }

    #[test]
    fn test_bounce_miss_equals_no_bounce() {
        // Without the ceiling the bounce ray escapes, so one allowed
        // reflection shades exactly like zero.
        let floor = Material::new(
            Vec3::splat(0.1),
            Vec3::splat(0.2),
            Vec3::splat(0.8),
            40.0,
            0.8,
        );
        let open = Scene::new(
            Geometry::Plane(Plane::new(Vec3::ZERO, Vec3::Z, Arc::new(floor))),
            vec![white_light(Vec3::new(0.0, 0.0, 2.0))],
        );
        let ray = Ray::new(Vec3::new(1.0, 1.0, 2.0), Vec3::NEG_Z);

        assert_eq!(ray_color(&ray, &open, 1), ray_color(&ray, &open, 0));
    }

    #[test]
    fn test_matte_bounce_kills_deeper_reflections() {
        // The red ceiling has mirror 0, so after the first bounce the mix
        // attenuates to zero and further depth changes nothing.
        let (scene, ray) = mirror_box();
        let one = ray_color(&ray, &scene, 1);
        assert_ne!(one, ray_color(&ray, &scene, 0));
        assert_eq!(one, ray_color(&ray, &scene, 2));
    }

    #[test]
    fn test_mirror_bounces_attenuate() {
        // Two facing mirrors: the ray ping-pongs, each blend weighted by
        // the product of the mirror coefficients so far.
        let floor = Material::new(
            Vec3::splat(0.1),
            Vec3::splat(0.2),
            Vec3::splat(0.8),
            40.0,
            0.8,
        );
        let scene = Scene::new(
            Geometry::Composite(Composite::new(vec![
                Plane::new(Vec3::ZERO, Vec3::Z, Arc::new(floor)).into(),
                Plane::new(Vec3::new(0.0, 0.0, 4.0), Vec3::NEG_Z, Material::mirror_red()).into(),
            ])),
            vec![white_light(Vec3::new(0.0, 0.0, 2.0))],
        );
        let ray = Ray::new(Vec3::new(1.0, 1.0, 2.0), Vec3::NEG_Z);

        let at_depth: Vec<Color> = (0..4).map(|n| ray_color(&ray, &scene, n)).collect();
        let steps: Vec<f32> = at_depth
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).length())
            .collect();

        assert!(steps[0] > steps[1]);
        assert!(steps[1] > steps[2]);
        assert!(steps[2] > 0.0);
    }

    #[test]
    fn test_antialias_idempotent_on_uniform_color() {
        // Ambient-only material: every sample is identical, so averaging
        // four of them changes nothing.
        let ambient_only = Material::new(
            Vec3::new(0.6, 0.4, 0.2),
            Vec3::ZERO,
            Vec3::ZERO,
            1.0,
            0.0,
        );
        let scene = Scene::new(
            Geometry::Plane(Plane::new(Vec3::ZERO, Vec3::Z, Arc::new(ambient_only))),
            vec![Light::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ONE, Vec3::ONE, Vec3::ONE)],
        );
        let camera = downward_camera(5.0);

        let mut single = Tracer::new(16, 16);
        single.config.antialias = 1;
        single.trace(&camera, &scene);

        let mut multi = Tracer::new(16, 16);
        multi.config.antialias = 2;
        multi.trace(&camera, &scene);

        assert_eq!(single.img.data(), multi.img.data());
        assert_eq!(single.img.get(8, 8), [153, 102, 51]);
    }

    #[test]
    fn test_parallel_trace_matches_serial() {
        let scene = Scene::new(
            Geometry::Composite(Composite::new(vec![
                GridPlane::new(Vec3::new(0.0, 0.0, -1.0), Vec3::Z, Material::matte()).into(),
                Sphere::new(Vec3::new(0.0, 0.0, 1.0), 0.5, Material::mirror_blue()).into(),
                Disc::new(Vec3::new(2.0, 0.0, 1.0), Vec3::X, 1.0, Material::red()).into(),
            ])),
            vec![white_light(Vec3::new(0.0, 0.0, 5.0))],
        );
        let camera = downward_camera(10.0);

        let mut serial = Tracer::new(32, 32);
        serial.config.antialias = 2;
        serial.config.jitter = 0.5;
        serial.config.seed = 42;
        serial.trace(&camera, &scene);

        let mut parallel = Tracer::new(32, 32);
        parallel.config = serial.config;
        parallel.trace_parallel(&camera, &scene);

        assert_eq!(serial.img.data(), parallel.img.data());
    }

    #[test]
    fn test_grid_scene_end_to_end() {
        let scene = Scene::new(
            Geometry::GridPlane(GridPlane::new(
                Vec3::new(0.0, 0.0, -1.0),
                Vec3::Z,
                Material::matte(),
            )),
            vec![white_light(Vec3::new(0.0, 0.0, 5.0))],
        );
        let camera = downward_camera(10.0);

        let mut tracer = Tracer::new(64, 64);
        tracer.config.reflections = 0;
        tracer.trace(&camera, &scene);

        // Every pixel agrees with the analytic band test at its own hit
        // point, and both populations exist.
        let grid = camera.ray_grid(64, 64);
        let mut lit = 0;
        let mut dark = 0;
        for y in 0..64 {
            for x in 0..64 {
                let ray = grid.ray_at(x, y);
                let expected_hit = scene.root.intersect(ray.origin, ray.direction);
                let pixel = tracer.img.get(x, y);
                match expected_hit {
                    Some(_) => {
                        assert_ne!(pixel, [0, 0, 0], "line pixel ({x}, {y}) is black");
                        lit += 1;
                    }
                    None => {
                        assert_eq!(pixel, [0, 0, 0], "gap pixel ({x}, {y}) is lit");
                        dark += 1;
                    }
                }
            }
        }
        assert!(lit > 0);
        assert!(dark > 0);
    }
}
