//! Geometry variants and ray-surface intersection.
//!
//! The variant set is closed: every shape the tracer can see is a case of
//! [`Geometry`], and each operation dispatches with a single `match`, so a
//! new variant fails to compile until every operation handles it.

use std::sync::Arc;

use helio_core::Material;
use helio_math::{SphereBounds, Vec3};

use crate::mesh::Mesh;

/// Result of a ray-scene query: the nearest forward hit point, its distance
/// from the ray origin, and the surface that was hit.
///
/// This is the only channel intersection results travel through; `None`
/// from [`Geometry::intersect`] is a miss.
#[derive(Debug, Clone, Copy)]
pub struct Intersection<'a> {
    pub point: Vec3,
    pub distance: f32,
    pub surface: &'a Geometry,
}

impl<'a> Intersection<'a> {
    pub fn new(point: Vec3, ray_origin: Vec3, surface: &'a Geometry) -> Self {
        Self {
            point,
            distance: (point - ray_origin).length(),
            surface,
        }
    }
}

/// Width of the lit band around each integer grid line.
const GRID_LINE_WIDTH: f32 = 0.05;

/// An infinite plane through `offset` with unit normal.
#[derive(Debug)]
pub struct Plane {
    pub offset: Vec3,
    pub normal: Vec3,
    material: Arc<Material>,
}

impl Plane {
    pub fn new(offset: Vec3, normal: Vec3, material: Arc<Material>) -> Self {
        Self {
            offset,
            normal: normal.normalize(),
            material,
        }
    }
}

/// A plane that is only visible in periodic bands along x and y.
///
/// Off-band points are a full miss: the ray does not stop here, so a
/// farther object (or the background) shows through the gaps.
#[derive(Debug)]
pub struct GridPlane {
    pub offset: Vec3,
    pub normal: Vec3,
    material: Arc<Material>,
}

impl GridPlane {
    pub fn new(offset: Vec3, normal: Vec3, material: Arc<Material>) -> Self {
        Self {
            offset,
            normal: normal.normalize(),
            material,
        }
    }

    fn on_band(point: Vec3) -> bool {
        let near_line = |v: f32| (v + 0.5).rem_euclid(1.0) < GRID_LINE_WIDTH;
        near_line(point.x) || near_line(point.y)
    }
}

/// A plane restricted to a disc of `radius` around `center`.
#[derive(Debug)]
pub struct Disc {
    pub center: Vec3,
    pub normal: Vec3,
    pub radius: f32,
    material: Arc<Material>,
}

impl Disc {
    pub fn new(center: Vec3, normal: Vec3, radius: f32, material: Arc<Material>) -> Self {
        Self {
            center,
            normal: normal.normalize(),
            radius,
            material,
        }
    }
}

/// A sphere of `radius` around `center`.
#[derive(Debug)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    material: Arc<Material>,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: Arc<Material>) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }
}

/// A triangle with precomputed edge dot products for the barycentric
/// containment test.
#[derive(Debug)]
pub struct Triangle {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
    side0: Vec3,
    side1: Vec3,
    raw_normal: Vec3,
    dot00: f32,
    dot01: f32,
    dot11: f32,
    inv_denom: f32,
    material: Arc<Material>,
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Arc<Material>) -> Self {
        let side0 = v1 - v0;
        let side1 = v2 - v0;
        let dot00 = side0.dot(side0);
        let dot01 = side0.dot(side1);
        let dot11 = side1.dot(side1);
        Self {
            v0,
            v1,
            v2,
            side0,
            side1,
            raw_normal: side0.cross(side1),
            dot00,
            dot01,
            dot11,
            inv_denom: 1.0 / (dot00 * dot11 - dot01 * dot01),
            material,
        }
    }

    fn contains(&self, point: Vec3) -> bool {
        let w = point - self.v0;
        let dot0w = self.side0.dot(w);
        let dot1w = self.side1.dot(w);
        let u = (self.dot11 * dot0w - self.dot01 * dot1w) * self.inv_denom;
        let v = (self.dot00 * dot1w - self.dot01 * dot0w) * self.inv_denom;
        u >= 0.0 && v >= 0.0 && u + v <= 1.0
    }
}

/// Non-renderable sphere used only to reject rays early; asking it for a
/// surface normal or material is a programming error.
#[derive(Debug)]
pub struct BoundingSphere {
    pub bounds: SphereBounds,
}

impl BoundingSphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            bounds: SphereBounds::new(center, radius),
        }
    }
}

/// An unordered group of child geometry; a ray sees the nearest child hit.
#[derive(Debug)]
pub struct Composite {
    pub children: Vec<Geometry>,
}

impl Composite {
    pub fn new(children: Vec<Geometry>) -> Self {
        Self { children }
    }

    fn intersect(&self, origin: Vec3, direction: Vec3) -> Option<Intersection<'_>> {
        closest_of(self.children.iter(), origin, direction)
    }
}

/// Nearest forward hit among a sequence of geometry; ties keep the first
/// encountered.
pub(crate) fn closest_of<'a>(
    children: impl Iterator<Item = &'a Geometry>,
    origin: Vec3,
    direction: Vec3,
) -> Option<Intersection<'a>> {
    let mut closest: Option<Intersection<'a>> = None;
    for child in children {
        if let Some(hit) = child.intersect(origin, direction) {
            match &closest {
                Some(best) if hit.distance >= best.distance => {}
                _ => closest = Some(hit),
            }
        }
    }
    closest
}

/// The closed set of shapes the tracer understands.
#[derive(Debug)]
pub enum Geometry {
    Plane(Plane),
    GridPlane(GridPlane),
    Disc(Disc),
    Sphere(Sphere),
    Triangle(Triangle),
    Bounding(BoundingSphere),
    Mesh(Mesh),
    Composite(Composite),
}

impl Geometry {
    /// Nearest valid forward intersection of the ray with this geometry.
    ///
    /// The direction need not be unit length; reported distances are
    /// metric regardless.
    pub fn intersect(&self, origin: Vec3, direction: Vec3) -> Option<Intersection<'_>> {
        match self {
            Geometry::Plane(plane) => plane_intersect(plane.offset, plane.normal, origin, direction)
                .map(|p| Intersection::new(p, origin, self)),
            Geometry::GridPlane(grid) => {
                plane_intersect(grid.offset, grid.normal, origin, direction)
                    .filter(|p| GridPlane::on_band(*p))
                    .map(|p| Intersection::new(p, origin, self))
            }
            Geometry::Disc(disc) => disc_intersect(disc.center, disc.normal, disc.radius, origin, direction)
                .map(|p| Intersection::new(p, origin, self)),
            Geometry::Sphere(sphere) => {
                sphere_intersect(sphere.center, sphere.radius, origin, direction)
                    .map(|p| Intersection::new(p, origin, self))
            }
            Geometry::Triangle(triangle) => {
                plane_intersect(triangle.v0, triangle.raw_normal, origin, direction)
                    .filter(|p| triangle.contains(*p))
                    .map(|p| Intersection::new(p, origin, self))
            }
            Geometry::Bounding(bounding) => {
                sphere_intersect(bounding.bounds.center, bounding.bounds.radius, origin, direction)
                    .map(|p| Intersection::new(p, origin, self))
            }
            Geometry::Mesh(mesh) => mesh.intersect(origin, direction),
            Geometry::Composite(composite) => composite.intersect(origin, direction),
        }
    }

    /// Outward unit normal of the surface at `point`.
    ///
    /// Panics for geometry that has no single surface; such variants must
    /// never become shading targets.
    pub fn surface_normal(&self, point: Vec3) -> Vec3 {
        match self {
            Geometry::Plane(plane) => plane.normal,
            Geometry::GridPlane(grid) => grid.normal,
            Geometry::Disc(disc) => disc.normal,
            Geometry::Sphere(sphere) => (point - sphere.center).normalize(),
            Geometry::Triangle(triangle) => triangle.raw_normal.normalize(),
            Geometry::Bounding(_) => {
                panic!("surface normal requested for a bounding sphere; it is not renderable")
            }
            Geometry::Mesh(_) => {
                panic!("surface normal requested for a mesh; shade the intersected triangle")
            }
            Geometry::Composite(_) => {
                panic!("surface normal requested for a composite; shade the intersected child")
            }
        }
    }

    /// Material of the surface.
    ///
    /// Same restrictions as [`Geometry::surface_normal`].
    pub fn material(&self) -> &Arc<Material> {
        match self {
            Geometry::Plane(plane) => &plane.material,
            Geometry::GridPlane(grid) => &grid.material,
            Geometry::Disc(disc) => &disc.material,
            Geometry::Sphere(sphere) => &sphere.material,
            Geometry::Triangle(triangle) => &triangle.material,
            Geometry::Bounding(_) => {
                panic!("material requested for a bounding sphere; it is not renderable")
            }
            Geometry::Mesh(_) => {
                panic!("material requested for a mesh; shade the intersected triangle")
            }
            Geometry::Composite(_) => {
                panic!("material requested for a composite; shade the intersected child")
            }
        }
    }
}

impl From<Plane> for Geometry {
    fn from(plane: Plane) -> Self {
        Geometry::Plane(plane)
    }
}

impl From<GridPlane> for Geometry {
    fn from(grid: GridPlane) -> Self {
        Geometry::GridPlane(grid)
    }
}

impl From<Disc> for Geometry {
    fn from(disc: Disc) -> Self {
        Geometry::Disc(disc)
    }
}

impl From<Sphere> for Geometry {
    fn from(sphere: Sphere) -> Self {
        Geometry::Sphere(sphere)
    }
}

impl From<Triangle> for Geometry {
    fn from(triangle: Triangle) -> Self {
        Geometry::Triangle(triangle)
    }
}

impl From<BoundingSphere> for Geometry {
    fn from(bounding: BoundingSphere) -> Self {
        Geometry::Bounding(bounding)
    }
}

impl From<Mesh> for Geometry {
    fn from(mesh: Mesh) -> Self {
        Geometry::Mesh(mesh)
    }
}

impl From<Composite> for Geometry {
    fn from(composite: Composite) -> Self {
        Geometry::Composite(composite)
    }
}

/// Ray-plane intersection point.
///
/// Parallel rays miss. A ray whose origin already lies on the plane
/// (numerator zero) returns the projection of the plane offset onto the
/// normal instead of the origin itself; downstream shading relies on this
/// exact point for coplanar rays, so it is kept as-is.
fn plane_intersect(offset: Vec3, normal: Vec3, origin: Vec3, direction: Vec3) -> Option<Vec3> {
    let numerator = (offset - origin).dot(normal);
    let denominator = direction.dot(normal);
    if denominator == 0.0 {
        return None;
    }
    if numerator == 0.0 {
        return Some(normal * (offset.dot(normal) / normal.dot(normal)));
    }
    let t = numerator / denominator;
    if t < 0.0 {
        return None;
    }
    Some(origin + direction * t)
}

fn disc_intersect(
    center: Vec3,
    normal: Vec3,
    radius: f32,
    origin: Vec3,
    direction: Vec3,
) -> Option<Vec3> {
    plane_intersect(center, normal, origin, direction)
        .filter(|p| (*p - center).length() < radius)
}

/// Ray-sphere intersection via the silhouette disc: a disc through the
/// center facing the ray catches exactly the rays that pierce the sphere,
/// and the hit point is pulled back onto the near surface along the ray.
fn sphere_intersect(center: Vec3, radius: f32, origin: Vec3, direction: Vec3) -> Option<Vec3> {
    let silhouette = disc_intersect(center, direction, radius, origin, direction)?;
    let offcenter = (silhouette - center).length();
    let depth = (radius * radius - offcenter * offcenter).sqrt();
    Some(silhouette - direction.normalize() * depth)
}
