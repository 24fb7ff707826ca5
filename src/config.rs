//! Viewer configuration
//!
//! Tuning values and asset locations for the viewer. Every field has a working
//! default; override individual values with the `with_*` builders or pick up
//! environment overrides with [`ViewerConfig::from_env`].

use cgmath::Vector2;
use std::path::{Path, PathBuf};

use crate::catalog::{ModelAsset, ModelCatalog};
use crate::lighting::FIXED_LIGHT_DEPTH_FACTOR;

/// Pixels of horizontal drag per radian of yaw.
pub const X_ROTATION_DISPLACEMENT_FACTOR: f32 = 60.0;
/// Pixels of vertical drag per radian of pitch.
pub const Y_ROTATION_DISPLACEMENT_FACTOR: f32 = 60.0;
/// Main model size relative to the stage.
pub const MODEL_SCALE: f32 = 0.75;
/// Light proxy size relative to the shorter stage side.
pub const LIGHT_SCALE: f32 = 0.15;
/// Seconds per autonomous spin.
pub const SPIN_PERIOD: f32 = 15.0;

/// Where a model slot sits on the stage.
///
/// `parent_origin` is a point on the stage and `anchor_point` the matching
/// point on the slot, both as fractions of their respective sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelSlot {
    pub scale: f32,
    pub parent_origin: Vector2<f32>,
    pub anchor_point: Vector2<f32>,
}

impl ModelSlot {
    /// Slot centred on the stage.
    pub fn centered(scale: f32) -> Self {
        Self {
            scale,
            parent_origin: Vector2::new(0.5, 0.5),
            anchor_point: Vector2::new(0.5, 0.5),
        }
    }

    /// Slot hanging from its top-left corner at `offset` from the stage corner.
    pub fn top_left(scale: f32, offset: Vector2<f32>) -> Self {
        Self {
            scale,
            parent_origin: offset,
            anchor_point: Vector2::new(0.0, 0.0),
        }
    }

    /// Slot size in pixels for a stage of `stage_extent`.
    pub fn size(&self, stage_extent: Vector2<f32>) -> Vector2<f32> {
        stage_extent * self.scale
    }

    /// Top-left corner in stage pixels.
    pub fn origin(&self, stage_extent: Vector2<f32>) -> Vector2<f32> {
        let size = self.size(stage_extent);
        Vector2::new(
            stage_extent.x * self.parent_origin.x - size.x * self.anchor_point.x,
            stage_extent.y * self.parent_origin.y - size.y * self.anchor_point.y,
        )
    }

    /// Centre in stage pixels.
    pub fn center(&self, stage_extent: Vector2<f32>) -> Vector2<f32> {
        self.origin(stage_extent) + self.size(stage_extent) * 0.5
    }
}

/// The textured cuboid drawn behind the models.
#[derive(Debug, Clone, PartialEq)]
pub struct BackdropConfig {
    /// Cube edge relative to the shorter stage side
    pub width_scale: f32,
    /// Distance toward the viewer
    pub depth: f32,
    pub texture: String,
    pub color: [f32; 4],
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            width_scale: 2.0,
            depth: 960.0,
            texture: "people-medium-1.jpg".to_string(),
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// Everything the viewer needs to know before it opens a window.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub title: String,
    pub window_size: (u32, u32),
    pub background_color: [f64; 4],
    pub vsync: bool,
    /// `(x, y)` drag pixels per radian of yaw and pitch respectively.
    pub rotation_sensitivity: Vector2<f32>,
    pub fixed_light_depth_factor: f32,
    pub light_scale: f32,
    pub light_icon_front: String,
    pub light_icon_back: String,
    pub spin_period: f32,
    pub model_slots: Vec<ModelSlot>,
    pub initial_model_index: usize,
    pub initial_shading_index: usize,
    pub model_dir: PathBuf,
    pub image_dir: PathBuf,
    pub models: Vec<ModelAsset>,
    pub backdrop: BackdropConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Mesh Visual".to_string(),
            window_size: (1200, 800),
            background_color: [0.0, 0.5, 1.0, 1.0],
            vsync: true,
            rotation_sensitivity: Vector2::new(
                X_ROTATION_DISPLACEMENT_FACTOR,
                Y_ROTATION_DISPLACEMENT_FACTOR,
            ),
            fixed_light_depth_factor: FIXED_LIGHT_DEPTH_FACTOR,
            light_scale: LIGHT_SCALE,
            light_icon_front: "light-icon-front.png".to_string(),
            light_icon_back: "light-icon-back.png".to_string(),
            spin_period: SPIN_PERIOD,
            model_slots: vec![
                ModelSlot::centered(MODEL_SCALE),
                ModelSlot::top_left(MODEL_SCALE / 3.0, Vector2::new(0.05, 0.03)),
            ],
            // Metal robot first
            initial_model_index: 1,
            initial_shading_index: 0,
            model_dir: PathBuf::from("assets/models"),
            image_dir: PathBuf::from("assets/images"),
            models: vec![
                ModelAsset::new("Dino", "Dino.obj", "Dino.mtl"),
                ModelAsset::new("ToyRobot-Metal", "ToyRobot-Metal.obj", "ToyRobot-Metal.mtl"),
                ModelAsset::new(
                    "Toyrobot-Plastic",
                    "Toyrobot-Plastic.obj",
                    "Toyrobot-Plastic.mtl",
                ),
            ],
            backdrop: BackdropConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Default configuration with environment overrides applied.
    ///
    /// * `MESHVIEW_ASSET_DIR` - root holding `models/` and `images/`
    /// * `MESHVIEW_VSYNC` - `0`/`false` disables vsync
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("MESHVIEW_ASSET_DIR") {
            log::info!("Using asset directory {}", dir);
            config = config.with_asset_dir(dir);
        }

        if let Ok(value) = std::env::var("MESHVIEW_VSYNC") {
            let enabled = !matches!(value.trim(), "0" | "false" | "off");
            config = config.with_vsync(enabled);
        }

        config
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Sets both model and image directories below `root`.
    pub fn with_asset_dir(mut self, root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        self.model_dir = root.join("models");
        self.image_dir = root.join("images");
        self
    }

    pub fn with_rotation_sensitivity(mut self, x: f32, y: f32) -> Self {
        self.rotation_sensitivity = Vector2::new(x, y);
        self
    }

    pub fn with_fixed_light_depth_factor(mut self, factor: f32) -> Self {
        self.fixed_light_depth_factor = factor;
        self
    }

    pub fn with_initial_model(mut self, index: usize) -> Self {
        self.initial_model_index = index;
        self
    }

    pub fn with_initial_shading(mut self, index: usize) -> Self {
        self.initial_shading_index = index;
        self
    }

    /// Catalog over the configured models, starting at the configured indices.
    pub fn catalog(&self) -> ModelCatalog {
        ModelCatalog::new(
            self.models.clone(),
            self.initial_model_index,
            self.initial_shading_index,
        )
    }

    /// Resolves a model-relative path.
    pub fn model_path(&self, file: &str) -> PathBuf {
        self.model_dir.join(file)
    }

    /// Resolves an image-relative path.
    pub fn image_path(&self, file: &str) -> PathBuf {
        self.image_dir.join(file)
    }

    /// Spin direction for a slot; neighbours turn opposite ways.
    pub fn spin_direction(slot: usize) -> f32 {
        if slot % 2 == 0 {
            1.0
        } else {
            -1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_tuning_constants() {
        let config = ViewerConfig::default();
        assert_eq!(config.rotation_sensitivity, Vector2::new(60.0, 60.0));
        assert_eq!(config.fixed_light_depth_factor, 5.0);
        assert_eq!(config.models.len(), 3);
        assert_eq!(config.initial_model_index, 1);
        assert_eq!(config.model_slots.len(), 2);
    }

    #[test]
    fn test_centered_slot_geometry() {
        let stage = Vector2::new(1000.0, 800.0);
        let slot = ModelSlot::centered(0.5);
        assert_eq!(slot.size(stage), Vector2::new(500.0, 400.0));
        assert_eq!(slot.origin(stage), Vector2::new(250.0, 200.0));
        assert_eq!(slot.center(stage), Vector2::new(500.0, 400.0));
    }

    #[test]
    fn test_top_left_slot_geometry() {
        let stage = Vector2::new(1000.0, 1000.0);
        let slot = ModelSlot::top_left(0.25, Vector2::new(0.5, 0.25));
        assert_eq!(slot.origin(stage), Vector2::new(500.0, 250.0));
        assert_eq!(slot.center(stage), Vector2::new(625.0, 375.0));
    }

    #[test]
    fn test_asset_dir_override() {
        let config = ViewerConfig::default().with_asset_dir("/data/demo");
        assert_eq!(config.model_path("Dino.obj"), PathBuf::from("/data/demo/models/Dino.obj"));
        assert_eq!(
            config.image_path("light-icon-front.png"),
            PathBuf::from("/data/demo/images/light-icon-front.png")
        );
    }

    #[test]
    fn test_spin_directions_alternate() {
        assert_eq!(ViewerConfig::spin_direction(0), 1.0);
        assert_eq!(ViewerConfig::spin_direction(1), -1.0);
        assert_eq!(ViewerConfig::spin_direction(2), 1.0);
    }
}
