//! # Graphics Module
//!
//! Everything that touches wgpu: the stage camera, procedural geometry,
//! pipelines and the render engine, GPU resources, drawables and the ImGui
//! overlay.
//!
//! ## Architecture Overview
//!
//! - **Camera** ([`camera`]) - Orthographic projection over the pixel stage
//! - **Geometry** ([`geometry`]) - CPU-side mesh generation
//! - **Rendering** ([`rendering`]) - Backdrop, model and overlay pipelines
//! - **Resources** ([`resources`]) - Global uniforms and textures
//! - **Scene** ([`scene`]) - Vertex format and drawables
//! - **UI** ([`ui`]) - ImGui integration and the control panel

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;
pub mod ui;

// Re-export commonly used types
pub use camera::StageCamera;
pub use rendering::render_engine::RenderEngine;
