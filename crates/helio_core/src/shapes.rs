//! Procedural vertex data.
//!
//! Model assets (teapots, scanned meshes) are loaded by external tooling;
//! these generators produce the same interleaved layout for demo scenes
//! and tests. Layout per vertex: x, y, z, w, nx, ny, nz (stride 7, the
//! convention of the packaged model files).

use helio_math::Vec3;

use crate::soup::TriangleSoup;

/// Floats per generated vertex: homogeneous position + normal.
pub const FLOATS_PER_VERTEX: usize = 7;

fn push_vertex(data: &mut Vec<f32>, position: Vec3, normal: Vec3) {
    data.extend_from_slice(&[
        position.x, position.y, position.z, 1.0, normal.x, normal.y, normal.z,
    ]);
}

fn push_triangle(data: &mut Vec<f32>, a: Vec3, b: Vec3, c: Vec3) {
    let normal = (b - a).cross(c - a).normalize_or_zero();
    push_vertex(data, a, normal);
    push_vertex(data, b, normal);
    push_vertex(data, c, normal);
}

fn soup(data: Vec<f32>) -> TriangleSoup {
    TriangleSoup::new(data, FLOATS_PER_VERTEX).expect("generated vertex data is aligned")
}

/// A square quad in the plane z = `height`, spanning ±`half` on x and y,
/// normal up.
pub fn ground_quad(half: f32, height: f32) -> TriangleSoup {
    let mut data = Vec::with_capacity(2 * 3 * FLOATS_PER_VERTEX);
    let a = Vec3::new(-half, -half, height);
    let b = Vec3::new(half, -half, height);
    let c = Vec3::new(half, half, height);
    let d = Vec3::new(-half, half, height);
    push_triangle(&mut data, a, b, c);
    push_triangle(&mut data, a, c, d);
    soup(data)
}

/// A regular octahedron of the given radius centered at the origin.
pub fn octahedron(radius: f32) -> TriangleSoup {
    let px = Vec3::new(radius, 0.0, 0.0);
    let nx = -px;
    let py = Vec3::new(0.0, radius, 0.0);
    let ny = -py;
    let pz = Vec3::new(0.0, 0.0, radius);
    let nz = -pz;

    let faces = [
        (px, py, pz),
        (py, nx, pz),
        (nx, ny, pz),
        (ny, px, pz),
        (py, px, nz),
        (nx, py, nz),
        (ny, nx, nz),
        (px, ny, nz),
    ];

    let mut data = Vec::with_capacity(faces.len() * 3 * FLOATS_PER_VERTEX);
    for (a, b, c) in faces {
        push_triangle(&mut data, a, b, c);
    }
    soup(data)
}

/// A latitude/longitude sphere of the given radius centered at the origin.
///
/// Pole caps emit single triangles; interior bands emit quads split in two.
pub fn uv_sphere(radius: f32, rings: usize, sectors: usize) -> TriangleSoup {
    use std::f32::consts::PI;

    let rings = rings.max(2);
    let sectors = sectors.max(3);

    let point = |ring: usize, sector: usize| {
        let phi = PI * ring as f32 / rings as f32;
        let theta = 2.0 * PI * sector as f32 / sectors as f32;
        Vec3::new(
            radius * phi.sin() * theta.cos(),
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
        )
    };

    let mut data = Vec::new();
    for ring in 0..rings {
        for sector in 0..sectors {
            let a = point(ring, sector);
            let b = point(ring + 1, sector);
            let c = point(ring + 1, sector + 1);
            let d = point(ring, sector + 1);
            if ring != 0 {
                push_triangle(&mut data, a, b, d);
            }
            if ring != rings - 1 {
                push_triangle(&mut data, b, c, d);
            }
        }
    }
    soup(data)
}
