//! The built-in demo scenes.
//!
//! Each scene pairs a composite of geometry with its two lights. Model
//! meshes stand in for externally packaged assets, generated procedurally
//! with the same interleaved vertex layout.

use helio_core::{shapes, Light, Material};
use helio_renderer::{Composite, Geometry, GridPlane, Mesh, Scene, Sphere, Vec3};

pub const SCENE_COUNT: usize = 5;

/// Triangles per mesh chunk before it splits into sub-meshes.
const CHUNK_SIZE: usize = 1000;

fn ground() -> Geometry {
    GridPlane::new(Vec3::new(0.0, 0.0, -1.0), Vec3::Z, Material::matte()).into()
}

fn model(radius: f32, offset: Vec3, material: &std::sync::Arc<Material>) -> Geometry {
    let soup = shapes::uv_sphere(radius, 12, 16);
    Mesh::build(&soup, offset, CHUNK_SIZE, material).into()
}

fn gem(radius: f32, offset: Vec3, material: &std::sync::Arc<Material>) -> Geometry {
    let soup = shapes::octahedron(radius);
    Mesh::build(&soup, offset, CHUNK_SIZE, material).into()
}

/// Build demo scene `index` (0..SCENE_COUNT).
pub fn build(index: usize) -> Scene {
    match index {
        0 => Scene::new(
            Composite::new(vec![
                model(1.0, Vec3::new(0.0, 8.0, 0.0), &Material::matte()),
                ground(),
            ])
            .into(),
            vec![
                Light::new(
                    Vec3::new(-5.0, 8.0, 0.0),
                    Vec3::splat(0.1),
                    Vec3::new(1.0, 0.5, 0.5),
                    Vec3::splat(0.5),
                ),
                Light::new(
                    Vec3::new(5.0, 8.0, 0.0),
                    Vec3::ZERO,
                    Vec3::new(0.5, 0.5, 1.0),
                    Vec3::splat(0.5),
                ),
            ],
        ),
        1 => Scene::new(
            Composite::new(vec![
                model(1.0, Vec3::new(0.0, 8.0, 0.0), &Material::basic()),
                Sphere::new(Vec3::new(-3.0, 10.0, 0.0), 1.0, Material::matte()).into(),
                Sphere::new(Vec3::new(3.0, 10.0, 0.0), 1.0, Material::basic()).into(),
                ground(),
            ])
            .into(),
            vec![
                Light::new(
                    Vec3::new(0.0, 0.0, 5.0),
                    Vec3::splat(0.1),
                    Vec3::splat(0.75),
                    Vec3::splat(0.5),
                ),
                Light::new(
                    Vec3::new(5.0, 8.0, 5.0),
                    Vec3::ZERO,
                    Vec3::new(0.0, 0.75, 0.0),
                    Vec3::new(0.0, 0.5, 0.0),
                ),
            ],
        ),
        2 => Scene::new(
            Composite::new(vec![
                gem(1.0, Vec3::new(0.0, 3.0, 0.0), &Material::mirror_blue()),
                model(1.0, Vec3::new(0.0, 4.0, 1.0), &Material::metal_purple()),
                gem(0.7, Vec3::new(1.5, 5.0, 0.0), &Material::red()),
                ground(),
            ])
            .into(),
            vec![
                Light::new(
                    Vec3::new(0.0, 0.0, 5.0),
                    Vec3::splat(0.1),
                    Vec3::splat(0.75),
                    Vec3::splat(0.5),
                ),
                Light::new(
                    Vec3::new(0.0, 10.0, 0.0),
                    Vec3::splat(0.1),
                    Vec3::ONE,
                    Vec3::splat(0.5),
                ),
            ],
        ),
        3 => Scene::new(
            Composite::new(vec![
                Sphere::new(Vec3::new(-3.0, 10.0, 0.0), 1.0, Material::mirror_blue()).into(),
                Sphere::new(Vec3::new(3.0, 10.0, 0.0), 1.0, Material::basic()).into(),
                Sphere::new(Vec3::new(0.0, 8.0, 0.0), 1.0, Material::mirror_red()).into(),
                ground(),
            ])
            .into(),
            vec![
                Light::new(
                    Vec3::new(0.0, 0.0, 5.0),
                    Vec3::splat(0.1),
                    Vec3::new(0.4, 0.4, 1.0),
                    Vec3::splat(0.5),
                ),
                Light::new(
                    Vec3::new(3.0, 0.0, 5.0),
                    Vec3::splat(0.1),
                    Vec3::new(1.0, 0.4, 0.4),
                    Vec3::splat(0.5),
                ),
            ],
        ),
        _ => Scene::new(
            Composite::new(vec![
                Sphere::new(Vec3::new(0.0, 5.0, 0.0), 1.0, Material::perfect_mirror()).into(),
                Sphere::new(Vec3::new(-3.0, -4.0, 0.0), 1.0, Material::basic()).into(),
                Sphere::new(Vec3::new(4.0, -3.0, 0.0), 1.0, Material::basic()).into(),
                ground(),
            ])
            .into(),
            vec![
                Light::new(
                    Vec3::new(0.0, 0.0, 5.0),
                    Vec3::splat(0.1),
                    Vec3::ONE,
                    Vec3::splat(0.25),
                ),
                Light::new(Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO),
            ],
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_scene_builds_with_two_lights() {
        for index in 0..SCENE_COUNT {
            let scene = build(index);
            assert_eq!(scene.lights.len(), 2, "scene {index}");
            assert!(matches!(scene.root, Geometry::Composite(_)));
        }
    }
}
