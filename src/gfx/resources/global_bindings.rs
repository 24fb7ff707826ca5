//! Per-frame uniforms shared by every draw: projection and light.
//!
//! Bound at group 0 in all pipelines. Must match `Globals` in `viewer.wgsl`.

use cgmath::{Matrix4, Vector3};

use crate::wgpu_utils::{binding_types, UniformBuffer};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniformContent {
    view_proj: [[f32; 4]; 4],
    /// xyz in stage space, w unused
    light_position: [f32; 4],
}

impl GlobalUniformContent {
    pub fn new(view_proj: Matrix4<f32>, light_position: Vector3<f32>) -> Self {
        Self {
            view_proj: view_proj.into(),
            light_position: [light_position.x, light_position.y, light_position.z, 1.0],
        }
    }
}

pub type GlobalUniform = UniformBuffer<GlobalUniformContent>;

pub struct GlobalBindings {
    ubo: GlobalUniform,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let ubo = GlobalUniform::new(device);
        let bind_group_layout =
            binding_types::sequential_layout(device, "Globals Layout", &[binding_types::uniform()]);
        let bind_group = binding_types::sequential_bind_group(
            device,
            "Globals Bind Group",
            &bind_group_layout,
            vec![ubo.binding_resource()],
        );

        Self {
            ubo,
            bind_group_layout,
            bind_group,
        }
    }

    pub fn update(
        &mut self,
        queue: &wgpu::Queue,
        view_proj: Matrix4<f32>,
        light_position: Vector3<f32>,
    ) {
        self.ubo
            .update_content(queue, GlobalUniformContent::new(view_proj, light_position));
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_layout_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<GlobalUniformContent>(), 80);
        assert_eq!(std::mem::size_of::<GlobalUniformContent>() % 16, 0);
    }
}
