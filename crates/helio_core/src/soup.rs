//! Flat interleaved vertex buffers.
//!
//! Model data arrives as a single `f32` array with a fixed stride per
//! vertex, position in the first three floats and any further attributes
//! (homogeneous w, normals, colors) after. Every three consecutive
//! vertices form one triangle; the tracer never indexes.

use helio_math::Vec3;
use thiserror::Error;

/// Structural problems in a vertex buffer.
///
/// Only the layout is validated here. Degenerate numeric content
/// (zero-area triangles, NaNs) passes through untouched and is the scene
/// author's responsibility.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SoupError {
    #[error("vertex stride must be at least 3 floats, got {0}")]
    StrideTooSmall(usize),

    #[error("buffer length {len} is not a multiple of the vertex stride {stride}")]
    MisalignedBuffer { len: usize, stride: usize },
}

/// An unindexed triangle list in a flat interleaved buffer.
#[derive(Debug, Clone)]
pub struct TriangleSoup {
    data: Vec<f32>,
    floats_per_vertex: usize,
}

impl TriangleSoup {
    /// Wrap a raw buffer, checking the layout.
    pub fn new(data: Vec<f32>, floats_per_vertex: usize) -> Result<Self, SoupError> {
        if floats_per_vertex < 3 {
            return Err(SoupError::StrideTooSmall(floats_per_vertex));
        }
        if data.len() % floats_per_vertex != 0 {
            return Err(SoupError::MisalignedBuffer {
                len: data.len(),
                stride: floats_per_vertex,
            });
        }
        Ok(Self {
            data,
            floats_per_vertex,
        })
    }

    pub fn floats_per_vertex(&self) -> usize {
        self.floats_per_vertex
    }

    pub fn vertex_count(&self) -> usize {
        self.data.len() / self.floats_per_vertex
    }

    /// Number of whole triangles; a trailing partial group is ignored.
    pub fn triangle_count(&self) -> usize {
        self.vertex_count() / 3
    }

    /// Position of vertex `index` (the first three floats of its record).
    pub fn position(&self, index: usize) -> Vec3 {
        let base = index * self.floats_per_vertex;
        Vec3::new(self.data[base], self.data[base + 1], self.data[base + 2])
    }

    /// All vertex positions in buffer order.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        (0..self.vertex_count()).map(|i| self.position(i))
    }

    /// The raw interleaved floats.
    pub fn data(&self) -> &[f32] {
        &self.data
    }
}
