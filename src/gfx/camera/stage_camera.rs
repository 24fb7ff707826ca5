use cgmath::{Matrix4, Vector2};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Depth of the view volume on each side of the screen plane, relative to the
/// larger stage side. Has to enclose the backdrop and the light proxy.
const DEPTH_RANGE_FACTOR: f32 = 8.0;

/// Orthographic projection over the stage.
///
/// Stage space is in pixels with the origin at the top-left corner, y down and
/// z toward the viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageCamera {
    extent: Vector2<f32>,
}

impl StageCamera {
    pub fn new(extent: Vector2<f32>) -> Self {
        Self { extent }
    }

    pub fn extent(&self) -> Vector2<f32> {
        self.extent
    }

    pub fn resize(&mut self, extent: Vector2<f32>) {
        self.extent = extent;
    }

    pub fn depth_range(&self) -> f32 {
        self.extent.x.max(self.extent.y) * DEPTH_RANGE_FACTOR
    }

    pub fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let depth = self.depth_range();
        OPENGL_TO_WGPU_MATRIX
            * cgmath::ortho(0.0, self.extent.x, self.extent.y, 0.0, -depth, depth)
    }
}
