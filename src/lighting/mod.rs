//! # Light Placement
//!
//! The scene is lit by a single point light. It either sits at a fixed spot
//! far in front of (or behind) the stage centre, or follows a proxy the user
//! drags around the screen.
//!
//! All positions are stage coordinates: pixels from the top-left corner, with
//! z pointing out of the screen toward the viewer.

use cgmath::{Vector2, Vector3};

/// Depth multiplier for the fixed light, relative to the larger stage side.
///
/// Large enough that the light acts almost like a directional source.
pub const FIXED_LIGHT_DEPTH_FACTOR: f32 = 5.0;

/// Proxy start position as a fraction of the stage extent.
pub const DEFAULT_PROXY_ANCHOR: Vector2<f32> = Vector2::new(0.85, 0.125);

/// How the light is placed.
///
/// `fixed` and `front` are independent switches; the proxy is shown exactly
/// when the light is not fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightPlacementMode {
    /// Fixed above the stage centre instead of following the proxy.
    pub fixed: bool,
    /// In front of the models rather than behind them.
    pub front: bool,
}

impl Default for LightPlacementMode {
    fn default() -> Self {
        Self {
            fixed: true,
            front: true,
        }
    }
}

impl LightPlacementMode {
    /// `+1.0` in front of the stage, `-1.0` behind it.
    pub fn depth_sign(&self) -> f32 {
        if self.front {
            1.0
        } else {
            -1.0
        }
    }

    /// Whether the draggable proxy should be visible.
    pub fn proxy_visible(&self) -> bool {
        !self.fixed
    }
}

/// Computes the light position for `mode`.
///
/// * Fixed: centred on the stage, `max(w, h) * FIXED_LIGHT_DEPTH_FACTOR` deep.
/// * Manual: at the proxy's screen position, half the stage width deep.
pub fn compute_light_position(
    mode: LightPlacementMode,
    stage_extent: Vector2<f32>,
    proxy_screen_pos: Vector2<f32>,
) -> Vector3<f32> {
    compute_light_position_with_depth(
        mode,
        stage_extent,
        proxy_screen_pos,
        FIXED_LIGHT_DEPTH_FACTOR,
    )
}

/// [`compute_light_position`] with an explicit fixed-light depth factor.
pub fn compute_light_position_with_depth(
    mode: LightPlacementMode,
    stage_extent: Vector2<f32>,
    proxy_screen_pos: Vector2<f32>,
    fixed_depth_factor: f32,
) -> Vector3<f32> {
    let sign = mode.depth_sign();

    if mode.fixed {
        Vector3::new(
            stage_extent.x / 2.0,
            stage_extent.y / 2.0,
            sign * stage_extent.x.max(stage_extent.y) * fixed_depth_factor,
        )
    } else {
        Vector3::new(
            proxy_screen_pos.x,
            proxy_screen_pos.y,
            sign * stage_extent.x / 2.0,
        )
    }
}

/// Light mode plus the proxy's current screen position.
///
/// Mode setters never recompute anything; callers ask for
/// [`position`](LightModel::position) on their next update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightModel {
    mode: LightPlacementMode,
    proxy_position: Vector2<f32>,
    fixed_depth_factor: f32,
}

impl LightModel {
    /// Creates a fixed, front light with the proxy parked at its default spot.
    pub fn new(stage_extent: Vector2<f32>) -> Self {
        Self {
            mode: LightPlacementMode::default(),
            proxy_position: Vector2::new(
                stage_extent.x * DEFAULT_PROXY_ANCHOR.x,
                stage_extent.y * DEFAULT_PROXY_ANCHOR.y,
            ),
            fixed_depth_factor: FIXED_LIGHT_DEPTH_FACTOR,
        }
    }

    pub fn with_fixed_depth_factor(mut self, factor: f32) -> Self {
        self.fixed_depth_factor = factor;
        self
    }

    pub fn with_mode(mut self, mode: LightPlacementMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> LightPlacementMode {
        self.mode
    }

    pub fn is_fixed(&self) -> bool {
        self.mode.fixed
    }

    pub fn is_front(&self) -> bool {
        self.mode.front
    }

    pub fn set_fixed(&mut self, fixed: bool) {
        self.mode.fixed = fixed;
    }

    pub fn set_front(&mut self, front: bool) {
        self.mode.front = front;
    }

    /// Flips fixed/manual and returns the new `fixed` value.
    pub fn toggle_fixed(&mut self) -> bool {
        self.mode.fixed = !self.mode.fixed;
        self.mode.fixed
    }

    /// Flips front/back and returns the new `front` value.
    pub fn toggle_front(&mut self) -> bool {
        self.mode.front = !self.mode.front;
        self.mode.front
    }

    pub fn proxy_position(&self) -> Vector2<f32> {
        self.proxy_position
    }

    pub fn proxy_visible(&self) -> bool {
        self.mode.proxy_visible()
    }

    /// Moves the proxy 1:1 with the pointer.
    pub fn move_proxy(&mut self, screen_pos: Vector2<f32>) {
        self.proxy_position = screen_pos;
    }

    /// Light position for the current mode and proxy.
    pub fn position(&self, stage_extent: Vector2<f32>) -> Vector3<f32> {
        compute_light_position_with_depth(
            self.mode,
            stage_extent,
            self.proxy_position,
            self.fixed_depth_factor,
        )
    }
}
