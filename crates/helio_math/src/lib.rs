// Re-export glam for convenience
pub use glam::*;

// Helio math types
mod bounds;
mod ray;
pub use bounds::SphereBounds;
pub use ray::Ray;
