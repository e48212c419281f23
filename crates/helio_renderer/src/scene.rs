//! Render context.

use helio_core::Light;

use crate::geometry::Geometry;

/// Everything a trace call reads: the root geometry and the active lights.
///
/// Scenes are assembled externally and passed by reference into each trace
/// invocation; switching scenes means passing a different one, not mutating
/// tracer state. Only a light's `enabled` flag changes between traces.
pub struct Scene {
    pub root: Geometry,
    pub lights: Vec<Light>,
}

impl Scene {
    pub fn new(root: Geometry, lights: Vec<Light>) -> Self {
        Self { root, lights }
    }
}
