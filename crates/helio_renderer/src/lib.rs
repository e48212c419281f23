//! Helio renderer - CPU Whitted ray tracing.
//!
//! Casts one ray per pixel (or an antialiasing sub-grid of them) from the
//! camera through the image plane, finds the nearest surface, shades it
//! with every enabled light under the Phong model with hard shadows, and
//! follows mirror reflections to a configurable depth. Output is a plain
//! RGB byte buffer for whatever wants to display it.

mod buffer;
mod camera;
mod geometry;
mod mesh;
mod scene;
mod tracer;

pub use buffer::ImageBuffer;
pub use camera::{Camera, MotionKey, Perspective, PixelRay, RayGrid};
pub use geometry::{
    BoundingSphere, Composite, Disc, Geometry, GridPlane, Intersection, Plane, Sphere, Triangle,
};
pub use mesh::Mesh;
pub use scene::Scene;
pub use tracer::{color_to_rgb, ray_color, render_pixel, RenderConfig, Tracer, EPSILON};

/// Re-export the math and scene-content types callers assemble scenes from.
pub use helio_core::{Color, Light, Material};
pub use helio_math::{Ray, SphereBounds, Vec3};
