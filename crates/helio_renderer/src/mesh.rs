//! Triangle meshes with nested bounding spheres.
//!
//! A mesh is a flat arena of nodes referenced by index. Leaves own a
//! contiguous range of triangles; branches own child node indices. Every
//! node carries a bounding sphere, so a ray that misses a node's sphere
//! skips the whole subtree. The spheres are the only acceleration: within
//! a leaf the scan is linear, which is why construction keeps leaves small.

use std::ops::Range;
use std::sync::Arc;

use helio_core::{Material, TriangleSoup};
use helio_math::{SphereBounds, Vec3};

use crate::geometry::{closest_of, Geometry, Intersection, Triangle};

/// How many pieces an oversized triangle range splits into per level.
const SHRINK_FACTOR: usize = 4;

#[derive(Debug)]
enum NodeKind {
    Leaf { triangles: Range<usize> },
    Branch { children: Vec<usize> },
}

#[derive(Debug)]
struct MeshNode {
    bounds: SphereBounds,
    kind: NodeKind,
}

/// A composite of triangles wrapped in nested bounding spheres.
#[derive(Debug)]
pub struct Mesh {
    nodes: Vec<MeshNode>,
    triangles: Vec<Geometry>,
    root: usize,
}

impl Mesh {
    /// Build a mesh from interleaved vertex data.
    ///
    /// Consecutive vertex triples form triangles, translated by `offset`
    /// into world space and all sharing `material`. Ranges larger than
    /// `chunk_size` split recursively until every leaf fits.
    pub fn build(
        soup: &TriangleSoup,
        offset: Vec3,
        chunk_size: usize,
        material: &Arc<Material>,
    ) -> Self {
        let mut triangles = Vec::with_capacity(soup.triangle_count());
        for index in 0..soup.triangle_count() {
            let v0 = soup.position(3 * index) + offset;
            let v1 = soup.position(3 * index + 1) + offset;
            let v2 = soup.position(3 * index + 2) + offset;
            triangles.push(Geometry::Triangle(Triangle::new(
                v0,
                v1,
                v2,
                Arc::clone(material),
            )));
        }

        let mut mesh = Self {
            nodes: Vec::new(),
            triangles,
            root: 0,
        };
        let count = mesh.triangles.len();
        mesh.root = mesh.build_node(0..count, chunk_size.max(1));
        mesh
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// The bounding sphere enclosing the whole mesh.
    pub fn bounds(&self) -> SphereBounds {
        self.nodes[self.root].bounds
    }

    fn build_node(&mut self, range: Range<usize>, chunk_size: usize) -> usize {
        if range.len() <= chunk_size {
            let bounds = self.leaf_bounds(&range);
            return self.push_node(MeshNode {
                bounds,
                kind: NodeKind::Leaf { triangles: range },
            });
        }

        let piece = range.len().div_ceil(SHRINK_FACTOR);
        let mut children = Vec::with_capacity(SHRINK_FACTOR);
        let mut start = range.start;
        while start < range.end {
            let end = (start + piece).min(range.end);
            children.push(self.build_node(start..end, chunk_size));
            start = end;
        }

        let child_bounds: Vec<SphereBounds> =
            children.iter().map(|&c| self.nodes[c].bounds).collect();
        self.push_node(MeshNode {
            bounds: SphereBounds::surrounding(&child_bounds),
            kind: NodeKind::Branch { children },
        })
    }

    fn leaf_bounds(&self, range: &Range<usize>) -> SphereBounds {
        let mut vertices = Vec::with_capacity(range.len() * 3);
        for geometry in &self.triangles[range.clone()] {
            if let Geometry::Triangle(t) = geometry {
                vertices.extend_from_slice(&[t.v0, t.v1, t.v2]);
            }
        }
        SphereBounds::from_points(&vertices)
    }

    fn push_node(&mut self, node: MeshNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Nearest triangle hit, pruned by the bounding-sphere tree.
    ///
    /// The returned intersection references the triangle itself, so the
    /// mesh never becomes a shading target.
    pub fn intersect(&self, origin: Vec3, direction: Vec3) -> Option<Intersection<'_>> {
        self.intersect_node(self.root, origin, direction)
    }

    fn intersect_node(
        &self,
        index: usize,
        origin: Vec3,
        direction: Vec3,
    ) -> Option<Intersection<'_>> {
        let node = &self.nodes[index];
        if !node.bounds.intersected_by(origin, direction) {
            return None;
        }

        match &node.kind {
            NodeKind::Leaf { triangles } => {
                closest_of(self.triangles[triangles.clone()].iter(), origin, direction)
            }
            NodeKind::Branch { children } => {
                let mut closest: Option<Intersection<'_>> = None;
                for &child in children {
                    if let Some(hit) = self.intersect_node(child, origin, direction) {
                        match &closest {
                            Some(best) if hit.distance >= best.distance => {}
                            _ => closest = Some(hit),
                        }
                    }
                }
                closest
            }
        }
    }

    /// Nearest triangle hit with no sphere pruning at all.
    ///
    /// Exists to check that pruning never changes the answer; the render
    /// path always goes through [`Mesh::intersect`].
    #[doc(hidden)]
    pub fn intersect_unpruned(&self, origin: Vec3, direction: Vec3) -> Option<Intersection<'_>> {
        closest_of(self.triangles.iter(), origin, direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helio_core::shapes;

    fn build_octahedron(chunk_size: usize) -> Mesh {
        let soup = shapes::octahedron(1.0);
        Mesh::build(&soup, Vec3::ZERO, chunk_size, &Material::basic())
    }

    #[test]
    fn test_build_counts_triangles() {
        let mesh = build_octahedron(1000);
        assert_eq!(mesh.triangle_count(), 8);
        // Everything fits one leaf.
        assert_eq!(mesh.nodes.len(), 1);
    }

    #[test]
    fn test_build_chunks_recursively() {
        let mesh = build_octahedron(2);
        // 8 triangles with chunk size 2: one branch over four leaves.
        assert_eq!(mesh.nodes.len(), 5);
        assert!(mesh.bounds().radius >= 1.0 - 1e-6);
    }

    #[test]
    fn test_bounds_cover_all_vertices() {
        let soup = shapes::uv_sphere(2.0, 6, 8);
        let mesh = Mesh::build(&soup, Vec3::new(5.0, 0.0, 0.0), 10, &Material::basic());
        let bounds = mesh.bounds();

        for p in soup.positions() {
            let world = p + Vec3::new(5.0, 0.0, 0.0);
            assert!(
                (world - bounds.center).length() <= bounds.radius + 1e-4,
                "vertex {world} escapes bounds"
            );
        }
    }

    #[test]
    fn test_intersect_returns_triangle_surface() {
        let mesh = build_octahedron(1000);
        let hit = mesh
            .intersect(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0))
            .unwrap();

        assert!(matches!(hit.surface, Geometry::Triangle(_)));
        // The +Z apex of the octahedron is its nearest point from above.
        assert!((hit.point.z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_far_ray_pruned_to_miss() {
        let mesh = build_octahedron(2);
        assert!(mesh
            .intersect(Vec3::new(50.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0))
            .is_none());
    }

    #[test]
    fn test_pruning_is_observationally_transparent() {
        let mesh = build_octahedron(2);

        // Sweep a fan of rays across and past the mesh; pruned and
        // unpruned scans must agree exactly.
        for ix in -12..=12 {
            for iy in -12..=12 {
                let origin = Vec3::new(ix as f32 * 0.25, iy as f32 * 0.25, 5.0);
                let direction = Vec3::new(0.0, 0.0, -1.0);

                let pruned = mesh.intersect(origin, direction);
                let unpruned = mesh.intersect_unpruned(origin, direction);

                match (pruned, unpruned) {
                    (None, None) => {}
                    (Some(a), Some(b)) => {
                        assert_eq!(a.point, b.point);
                        assert_eq!(a.distance, b.distance);
                    }
                    (a, b) => panic!(
                        "pruning changed the outcome at {origin}: {:?} vs {:?}",
                        a.map(|h| h.point),
                        b.map(|h| h.point)
                    ),
                }
            }
        }
    }
}
