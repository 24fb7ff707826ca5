//! # Scene Module
//!
//! Vertex layout shared by every pipeline and the [`Drawable`] that pairs a
//! GPU mesh with its texture, transform and shading parameters.
//!
//! [`Drawable`]: drawable::Drawable

pub mod drawable;
pub mod vertex;

pub use drawable::{DrawLayouts, Drawable, GpuMesh, Transform};
pub use vertex::TexturedVertex;
