//! Presentation: asset loading, drawable assembly and the button wiring
//! between the control panel and the interaction controller.

pub mod assembler;
pub mod controls;
pub mod loader;

pub use assembler::{StageScene, StageState, ViewAssembler};
pub use controls::{dispatch, ControlAction, ControlLabels};
