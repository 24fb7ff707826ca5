//! GPU resources shared across draws.

pub mod global_bindings;
pub mod texture_resource;

pub use global_bindings::GlobalBindings;
pub use texture_resource::TextureResource;
