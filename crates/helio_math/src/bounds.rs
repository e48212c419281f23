use crate::Vec3;

/// Bounding sphere for mesh pruning.
///
/// A sphere is defined by a center and a radius that enclose a set of
/// vertices or a group of child spheres. The ray test is conservative: it
/// may accept rays that miss the enclosed geometry, never the reverse.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SphereBounds {
    pub center: Vec3,
    pub radius: f32,
}

impl SphereBounds {
    /// Create bounds from an explicit center and radius.
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Bounds enclosing a set of points: the centroid plus the maximum
    /// point-to-centroid distance.
    pub fn from_points(points: &[Vec3]) -> Self {
        if points.is_empty() {
            return Self::new(Vec3::ZERO, 0.0);
        }

        let centroid = points.iter().copied().sum::<Vec3>() / points.len() as f32;
        let radius = points
            .iter()
            .map(|p| (*p - centroid).length())
            .fold(0.0, f32::max);

        Self::new(centroid, radius)
    }

    /// Bounds enclosing a set of child spheres: centers are averaged, and
    /// the radius is max(distance-to-child-center + child radius).
    pub fn surrounding(children: &[SphereBounds]) -> Self {
        if children.is_empty() {
            return Self::new(Vec3::ZERO, 0.0);
        }

        let center =
            children.iter().map(|c| c.center).sum::<Vec3>() / children.len() as f32;
        let radius = children
            .iter()
            .map(|c| (c.center - center).length() + c.radius)
            .fold(0.0, f32::max);

        Self::new(center, radius)
    }

    /// True if the point lies inside (or on) the sphere.
    pub fn contains(&self, point: Vec3) -> bool {
        (point - self.center).length() <= self.radius
    }

    /// Conservative ray test: does the ray come within `radius` of the
    /// center at some forward parameter?
    ///
    /// The closest approach lies on the plane through the center whose
    /// normal is the ray direction; an origin inside the sphere always
    /// passes.
    pub fn intersected_by(&self, origin: Vec3, direction: Vec3) -> bool {
        if self.contains(origin) {
            return true;
        }

        let denominator = direction.dot(direction);
        if denominator == 0.0 {
            return false;
        }
        let t = (self.center - origin).dot(direction) / denominator;
        if t < 0.0 {
            return false;
        }

        (origin + direction * t - self.center).length() <= self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_centroid_and_radius() {
        let points = [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
        ];
        let bounds = SphereBounds::from_points(&points);

        assert_eq!(bounds.center, Vec3::ZERO);
        assert!((bounds.radius - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_points_empty() {
        let bounds = SphereBounds::from_points(&[]);
        assert_eq!(bounds.radius, 0.0);
    }

    #[test]
    fn test_surrounding_covers_children() {
        let a = SphereBounds::new(Vec3::new(-2.0, 0.0, 0.0), 1.0);
        let b = SphereBounds::new(Vec3::new(2.0, 0.0, 0.0), 1.0);
        let parent = SphereBounds::surrounding(&[a, b]);

        assert_eq!(parent.center, Vec3::ZERO);
        // Must reach the far side of both children.
        assert!((parent.radius - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_ray_hit_and_miss() {
        let bounds = SphereBounds::new(Vec3::new(0.0, 5.0, 0.0), 1.0);

        assert!(bounds.intersected_by(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0)));
        // Pointing away
        assert!(!bounds.intersected_by(Vec3::ZERO, Vec3::new(0.0, -1.0, 0.0)));
        // Parallel offset miss
        assert!(!bounds.intersected_by(
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0)
        ));
    }

    #[test]
    fn test_ray_from_inside_passes() {
        let bounds = SphereBounds::new(Vec3::ZERO, 2.0);
        assert!(bounds.intersected_by(Vec3::new(0.5, 0.0, 0.0), Vec3::new(0.0, -1.0, 0.0)));
    }

    #[test]
    fn test_unnormalized_direction() {
        let bounds = SphereBounds::new(Vec3::new(0.0, 10.0, 0.0), 1.0);
        assert!(bounds.intersected_by(Vec3::ZERO, Vec3::new(0.0, 25.0, 0.0)));
    }
}
