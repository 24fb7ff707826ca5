//! # Procedural Geometry Generation
//!
//! This module synthesizes vertex/index buffers for primitive shapes, removing
//! the need for an external model file for the textured cuboid.
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Vector3;
//! use meshview::gfx::geometry::build_cuboid;
//!
//! let cube = build_cuboid(Vector3::new(1.0, 1.0, 1.0), false);
//! assert_eq!(cube.vertex_count(), 24);
//! assert_eq!(cube.triangle_count(), 12);
//! ```

pub mod cuboid;

pub use cuboid::build_cuboid;

use cgmath::{InnerSpace, Vector3};

use crate::gfx::scene::vertex::TexturedVertex;

/// Generated geometry ready for GPU upload.
///
/// Triangles wind clockwise as seen from outside the surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<TexturedVertex>,
    pub indices: Vec<u16>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of vertices in this mesh
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this mesh
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterates the triangles as triples of vertex references.
    pub fn triangles(&self) -> impl Iterator<Item = [&TexturedVertex; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            [
                &self.vertices[tri[0] as usize],
                &self.vertices[tri[1] as usize],
                &self.vertices[tri[2] as usize],
            ]
        })
    }

    /// Checks the buffer invariants: indices come in triples and every index
    /// refers to an emitted vertex.
    pub fn is_well_formed(&self) -> bool {
        self.indices.len() % 3 == 0
            && self
                .indices
                .iter()
                .all(|&index| (index as usize) < self.vertices.len())
    }
}

/// Unnormalized face normal of a triangle (right-hand rule over the given order).
pub fn triangle_cross(a: &TexturedVertex, b: &TexturedVertex, c: &TexturedVertex) -> Vector3<f32> {
    let a = Vector3::from(a.position);
    let b = Vector3::from(b.position);
    let c = Vector3::from(c.position);
    (b - a).cross(c - a)
}

/// Area of a triangle, zero for degenerate input.
pub fn triangle_area(a: &TexturedVertex, b: &TexturedVertex, c: &TexturedVertex) -> f32 {
    triangle_cross(a, b, c).magnitude() * 0.5
}
