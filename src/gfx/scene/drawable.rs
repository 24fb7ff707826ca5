//! GPU-side meshes and the per-draw uniform block.

use std::rc::Rc;

use cgmath::{Matrix, Matrix4, Quaternion, SquareMatrix, Vector3};
use wgpu::util::DeviceExt;

use super::vertex::TexturedVertex;
use crate::gfx::geometry::Mesh;
use crate::gfx::resources::TextureResource;
use crate::wgpu_utils::{binding_types, UniformBuffer};

/// Shader mode code for unlit, texture-times-color drawing.
pub const SHADING_UNLIT: u32 = 3;

/// Matches `DrawUniform` in `viewer.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniformContent {
    model: [[f32; 4]; 4],
    normal_matrix: [[f32; 4]; 4],
    color: [f32; 4],
    shading_mode: u32,
    _padding: [u32; 3],
}

/// Placement of a drawable on the stage.
///
/// Meshes are authored y-up; the y scale is negated so they stand upright in
/// the y-down stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub center: Vector3<f32>,
    pub orientation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            center: Vector3::new(0.0, 0.0, 0.0),
            orientation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.center)
            * Matrix4::from(self.orientation)
            * Matrix4::from_nonuniform_scale(self.scale.x, -self.scale.y, self.scale.z)
    }

    /// Inverse-transpose of [`matrix`](Transform::matrix), identity if singular.
    pub fn normal_matrix(&self) -> Matrix4<f32> {
        self.matrix()
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Matrix4::identity)
    }
}

/// Vertex and index buffers on the GPU.
pub struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    index_format: wgpu::IndexFormat,
}

impl GpuMesh {
    pub fn from_mesh(device: &wgpu::Device, mesh: &Mesh, label: &str) -> Self {
        Self::upload(
            device,
            &mesh.vertices,
            bytemuck::cast_slice(&mesh.indices),
            mesh.indices.len() as u32,
            wgpu::IndexFormat::Uint16,
            label,
        )
    }

    pub fn from_indexed(
        device: &wgpu::Device,
        vertices: &[TexturedVertex],
        indices: &[u32],
        label: &str,
    ) -> Self {
        Self::upload(
            device,
            vertices,
            bytemuck::cast_slice(indices),
            indices.len() as u32,
            wgpu::IndexFormat::Uint32,
            label,
        )
    }

    fn upload(
        device: &wgpu::Device,
        vertices: &[TexturedVertex],
        index_bytes: &[u8],
        index_count: u32,
        index_format: wgpu::IndexFormat,
        label: &str,
    ) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: index_bytes,
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count,
            index_format,
        }
    }
}

/// Bind group layouts a [`Drawable`] needs, shared across all drawables.
#[derive(Clone)]
pub struct DrawLayouts {
    pub draw: wgpu::BindGroupLayout,
    pub texture: wgpu::BindGroupLayout,
}

impl DrawLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            draw: binding_types::sequential_layout(
                device,
                "Draw Uniform Layout",
                &[binding_types::uniform()],
            ),
            texture: TextureResource::bind_group_layout(device),
        }
    }
}

/// A mesh plus its texture, transform and shading parameters.
pub struct Drawable {
    mesh: Rc<GpuMesh>,
    uniform: UniformBuffer<DrawUniformContent>,
    uniform_bind_group: wgpu::BindGroup,
    texture_bind_group: wgpu::BindGroup,
    pub transform: Transform,
    pub color: [f32; 4],
    pub shading_mode: u32,
    pub visible: bool,
}

impl Drawable {
    pub fn new(
        device: &wgpu::Device,
        layouts: &DrawLayouts,
        mesh: Rc<GpuMesh>,
        texture: &TextureResource,
        label: &str,
    ) -> Self {
        let uniform = UniformBuffer::<DrawUniformContent>::new(device);
        let uniform_bind_group = binding_types::sequential_bind_group(
            device,
            &format!("{} Draw Bind Group", label),
            &layouts.draw,
            vec![uniform.binding_resource()],
        );
        let texture_bind_group =
            texture.bind_group(device, &layouts.texture, &format!("{} Texture Bind Group", label));

        Self {
            mesh,
            uniform,
            uniform_bind_group,
            texture_bind_group,
            transform: Transform::default(),
            color: [1.0, 1.0, 1.0, 1.0],
            shading_mode: 0,
            visible: true,
        }
    }

    /// Swaps in another texture.
    pub fn set_texture(
        &mut self,
        device: &wgpu::Device,
        layouts: &DrawLayouts,
        texture: &TextureResource,
    ) {
        self.texture_bind_group =
            texture.bind_group(device, &layouts.texture, "Drawable Texture Bind Group");
    }

    /// Writes transform and shading parameters to the GPU.
    pub fn prepare(&mut self, queue: &wgpu::Queue) {
        let content = DrawUniformContent {
            model: self.transform.matrix().into(),
            normal_matrix: self.transform.normal_matrix().into(),
            color: self.color,
            shading_mode: self.shading_mode,
            _padding: [0; 3],
        };
        self.uniform.update_content(queue, content);
    }

    /// Issues the draw into a pass that already has group 0 and a pipeline set.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if !self.visible {
            return;
        }
        render_pass.set_bind_group(1, &self.uniform_bind_group, &[]);
        render_pass.set_bind_group(2, &self.texture_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.mesh.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.mesh.index_buffer.slice(..), self.mesh.index_format);
        render_pass.draw_indexed(0..self.mesh.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Rad, Rotation3, Transform as _, Vector4};

    #[test]
    fn test_uniform_size() {
        assert_eq!(std::mem::size_of::<DrawUniformContent>(), 160);
    }

    #[test]
    fn test_transform_flips_y_into_stage() {
        let transform = Transform {
            center: Vector3::new(100.0, 200.0, 0.0),
            scale: Vector3::new(10.0, 10.0, 10.0),
            ..Default::default()
        };
        let top = transform.matrix() * Vector4::new(0.0, 0.5, 0.0, 1.0);
        // Model-space up lands above the centre on a y-down stage.
        assert_eq!(top, Vector4::new(100.0, 195.0, 0.0, 1.0));
    }

    #[test]
    fn test_normal_matrix_keeps_normals_perpendicular() {
        let transform = Transform {
            center: Vector3::new(5.0, 5.0, 5.0),
            orientation: Quaternion::from_angle_y(Rad(0.7)),
            scale: Vector3::new(2.0, 5.0, 1.0),
        };
        let model = transform.matrix();
        let normal_matrix = transform.normal_matrix();

        // Tangent along the plane x + y = 0, normal (1, 1, 0).
        let tangent = model.transform_vector(Vector3::new(1.0, -1.0, 0.0));
        let normal = normal_matrix.transform_vector(Vector3::new(1.0, 1.0, 0.0));
        assert!(cgmath::dot(tangent, normal).abs() < 1e-4);
    }
}
