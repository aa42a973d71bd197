//! Vertex and index buffer management for scene meshes.

use bytemuck::{Pod, Zeroable};
use orrery_scene::{MeshData, MeshVertex, Topology};

/// Vertices of one star billboard, expanded in the vertex shader.
pub const QUAD_VERTEX_COUNT: u32 = 6;

/// GPU vertex format with position, normal, and UV coordinates.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct VertexPositionNormalUv {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl From<&MeshVertex> for VertexPositionNormalUv {
    fn from(v: &MeshVertex) -> Self {
        Self {
            position: v.position,
            normal: v.normal,
            uv: v.uv,
        }
    }
}

impl VertexPositionNormalUv {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
        wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: (std::mem::size_of::<[f32; 3]>() * 2) as wgpu::BufferAddress,
            shader_location: 2,
            format: wgpu::VertexFormat::Float32x2,
        },
    ];

    /// Per-vertex layout for triangle meshes.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<VertexPositionNormalUv>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    /// The same buffer read once per instance, so each point becomes a quad.
    pub fn instance_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            step_mode: wgpu::VertexStepMode::Instance,
            ..Self::layout()
        }
    }
}

/// An uploaded mesh ready to draw.
pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    /// `None` for point clouds.
    pub index_buffer: Option<wgpu::Buffer>,
    pub vertex_count: u32,
    pub index_count: u32,
    pub topology: Topology,
}

impl MeshBuffer {
    /// Bind vertex and index buffers to a render pass.
    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        if let Some(index_buffer) = &self.index_buffer {
            render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        }
    }

    /// Indexed triangles, or one instanced quad per point.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        match self.topology {
            Topology::Triangles => render_pass.draw_indexed(0..self.index_count, 0, 0..1),
            Topology::Points => render_pass.draw(0..QUAD_VERTEX_COUNT, 0..self.vertex_count),
        }
    }
}

/// GPU buffer allocator for scene meshes.
pub struct BufferAllocator<'a> {
    device: &'a wgpu::Device,
}

impl<'a> BufferAllocator<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }

    /// Upload a mesh. Point meshes skip the index buffer.
    pub fn create_mesh(&self, label: &str, mesh: &MeshData) -> MeshBuffer {
        let vertices: Vec<VertexPositionNormalUv> =
            mesh.vertices.iter().map(VertexPositionNormalUv::from).collect();
        let vertex_buffer = self.create_vertex_buffer(
            &format!("{label}-vertices"),
            bytemuck::cast_slice(&vertices),
        );

        let index_buffer = match mesh.topology {
            Topology::Triangles if !mesh.indices.is_empty() => Some(
                self.create_index_buffer_u32(&format!("{label}-indices"), &mesh.indices),
            ),
            _ => None,
        };

        MeshBuffer {
            vertex_buffer,
            index_count: if index_buffer.is_some() {
                mesh.indices.len() as u32
            } else {
                0
            },
            index_buffer,
            vertex_count: mesh.vertices.len() as u32,
            topology: mesh.topology,
        }
    }

    pub fn create_vertex_buffer(&self, label: &str, data: &[u8]) -> wgpu::Buffer {
        use wgpu::util::DeviceExt;

        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: data,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            })
    }

    pub fn create_index_buffer_u32(&self, label: &str, data: &[u32]) -> wgpu::Buffer {
        use wgpu::util::DeviceExt;

        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(data),
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::create_test_device_queue;
    use glam::Vec3;
    use orrery_scene::geometry;

    #[test]
    fn test_vertex_layout_stride() {
        assert_eq!(std::mem::size_of::<VertexPositionNormalUv>(), 32);
        let layout = VertexPositionNormalUv::layout();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);
        assert_eq!(layout.attributes.len(), 3);
        assert_eq!(layout.attributes[2].offset, 24);
    }

    #[test]
    fn test_instance_layout_steps_per_instance() {
        let layout = VertexPositionNormalUv::instance_layout();
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Instance);
        assert_eq!(layout.array_stride, 32);
    }

    #[test]
    fn test_vertex_conversion_copies_fields() {
        let mesh = geometry::uv_sphere(2.0, 4, 3);
        let gpu = VertexPositionNormalUv::from(&mesh.vertices[5]);
        assert_eq!(gpu.position, mesh.vertices[5].position);
        assert_eq!(gpu.normal, mesh.vertices[5].normal);
        assert_eq!(gpu.uv, mesh.vertices[5].uv);
    }

    #[test]
    fn test_sphere_upload_is_indexed() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let mesh = geometry::uv_sphere(1.0, 8, 6);
        let buffer = BufferAllocator::new(&device).create_mesh("sphere", &mesh);
        assert!(buffer.index_buffer.is_some());
        assert_eq!(buffer.index_count as usize, mesh.index_count());
        assert_eq!(buffer.vertex_buffer.size(), (mesh.vertex_count() * 32) as u64);
    }

    #[test]
    fn test_points_upload_has_no_index_buffer() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let mesh = geometry::points(&[Vec3::ZERO, Vec3::ONE, Vec3::X]);
        let buffer = BufferAllocator::new(&device).create_mesh("stars", &mesh);
        assert!(buffer.index_buffer.is_none());
        assert_eq!(buffer.vertex_count, 3);
        assert_eq!(buffer.index_count, 0);
    }
}
