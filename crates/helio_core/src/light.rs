//! Point lights.

use helio_math::Vec3;

use crate::material::Color;

/// A point light with independent ambient, diffuse, and specular emission.
///
/// Lights sum independently in the shading loop; a disabled light
/// contributes nothing. The `enabled` flag is the only mutable piece of
/// scene state, toggled externally between trace calls.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub enabled: bool,
}

impl Light {
    /// Create an enabled light.
    pub fn new(position: Vec3, ambient: Color, diffuse: Color, specular: Color) -> Self {
        Self {
            position,
            ambient,
            diffuse,
            specular,
            enabled: true,
        }
    }
}
