//! Frame rendering: pipelines, the stage shader and the render engine.

pub mod pipeline_manager;
pub mod render_engine;

pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::{
    DrawBatch, RenderEngine, BACKDROP_PIPELINE, MODEL_PIPELINE, OVERLAY_PIPELINE,
};
