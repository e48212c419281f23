//! Helio core - scene content for the ray tracer.
//!
//! This crate provides:
//!
//! - **Surface and light definitions**: [`Material`], [`Light`]
//! - **Vertex data**: [`TriangleSoup`], the flat interleaved buffer meshes
//!   are built from, plus procedural generators standing in for external
//!   model assets

pub mod light;
pub mod material;
pub mod shapes;
pub mod soup;

// Re-export commonly used types
pub use light::Light;
pub use material::{Color, Material};
pub use soup::{SoupError, TriangleSoup};
