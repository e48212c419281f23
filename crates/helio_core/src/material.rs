//! Phong surface descriptions.

use std::sync::Arc;

use helio_math::Vec3;

use crate::light::Light;

/// Color type alias (RGB channels in [0, 1])
pub type Color = Vec3;

/// Reflectance coefficients for a Phong-shaded surface.
///
/// Materials are immutable after construction and shared across geometry
/// instances behind an `Arc`, so a scene full of objects with the same
/// finish carries a single copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    /// Phong exponent
    pub shiny: f32,
    /// Fraction of the reflected-ray color blended into the surface color,
    /// in [0, 1]. Zero disables mirror bounces for this surface.
    pub mirror: f32,
}

impl Material {
    /// Create a new material.
    pub fn new(ambient: Color, diffuse: Color, specular: Color, shiny: f32, mirror: f32) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            shiny,
            mirror,
        }
    }

    /// Accumulate one light's Phong contribution into `color`.
    ///
    /// `n_dot_l` is the clamped surface-incidence term and `specular_term`
    /// the already-exponentiated highlight term. Each channel saturates at
    /// 1.0 on every call, so one strong light cannot be washed out by a
    /// later dim one.
    pub fn add_phong(&self, light: &Light, n_dot_l: f32, specular_term: f32, color: &mut Color) {
        *color = (*color
            + self.ambient * light.ambient
            + self.diffuse * light.diffuse * n_dot_l
            + self.specular * light.specular * specular_term)
            .min(Vec3::ONE);
    }

    /// White surface with moderate shine and a light mirror mix.
    pub fn basic() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Diffuse-only surface: no highlight, no mirror.
    pub fn matte() -> Arc<Self> {
        Arc::new(Self::new(
            Vec3::new(0.8, 0.8, 0.8),
            Vec3::ONE,
            Vec3::ZERO,
            1.0,
            0.0,
        ))
    }

    /// Matte red.
    pub fn red() -> Arc<Self> {
        Arc::new(Self::new(
            Vec3::new(0.8, 0.1, 0.1),
            Vec3::new(1.0, 0.2, 0.2),
            Vec3::new(0.3, 0.3, 0.3),
            5.0,
            0.0,
        ))
    }

    /// Green metal: tight highlight, some mirror.
    pub fn metal_green() -> Arc<Self> {
        Arc::new(Self::new(
            Vec3::new(0.1, 0.4, 0.1),
            Vec3::new(0.2, 0.8, 0.2),
            Vec3::new(0.9, 0.9, 0.9),
            40.0,
            0.4,
        ))
    }

    /// Purple metal: tight highlight, some mirror.
    pub fn metal_purple() -> Arc<Self> {
        Arc::new(Self::new(
            Vec3::new(0.3, 0.1, 0.4),
            Vec3::new(0.6, 0.2, 0.8),
            Vec3::new(0.9, 0.9, 0.9),
            40.0,
            0.4,
        ))
    }

    /// Blue-tinted mirror.
    pub fn mirror_blue() -> Arc<Self> {
        Arc::new(Self::new(
            Vec3::new(0.1, 0.1, 0.3),
            Vec3::new(0.2, 0.2, 0.6),
            Vec3::new(1.0, 1.0, 1.0),
            80.0,
            0.8,
        ))
    }

    /// Red-tinted mirror.
    pub fn mirror_red() -> Arc<Self> {
        Arc::new(Self::new(
            Vec3::new(0.3, 0.1, 0.1),
            Vec3::new(0.6, 0.2, 0.2),
            Vec3::new(1.0, 1.0, 1.0),
            80.0,
            0.8,
        ))
    }

    /// Nearly pure reflector: direct shading barely contributes.
    pub fn perfect_mirror() -> Arc<Self> {
        Arc::new(Self::new(
            Vec3::new(0.05, 0.05, 0.05),
            Vec3::new(0.1, 0.1, 0.1),
            Vec3::new(1.0, 1.0, 1.0),
            100.0,
            1.0,
        ))
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(Vec3::ONE, Vec3::ONE, Vec3::ONE, 10.0, 0.25)
    }
}
