// src/lib.rs
//! Meshview
//!
//! An interactive viewer for textured OBJ models on a 2D stage, built on wgpu
//! and winit. Models spin on their own, can be rotated by dragging, and are
//! lit by a light that is either fixed or dragged around as an on-screen
//! proxy.

pub mod animation;
pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod gfx;
pub mod interaction;
pub mod lighting;
pub mod view;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::MeshViewApp;
pub use config::ViewerConfig;
pub use error::{Result, ViewerError};
