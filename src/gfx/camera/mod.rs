pub mod stage_camera;

pub use stage_camera::{StageCamera, OPENGL_TO_WGPU_MATRIX};
