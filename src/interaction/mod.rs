//! # Touch Interaction
//!
//! Single-pointer gesture handling for the viewer: entity classification,
//! the gesture state machine and the controller that maps gestures onto
//! model rotation, light dragging and animation play state.

pub mod controller;
pub mod entity;
pub mod pointer;
pub mod state;

pub use controller::{orientation_from_rotation, InteractionController, ModelEntry, ViewerHost};
pub use entity::{EntityId, EntityRegistry, EntityTag, ScreenRect};
pub use pointer::{PointerEvent, PointerTracker};
pub use state::{ActiveEntity, GesturePhase, InteractionState, TouchPhase};
