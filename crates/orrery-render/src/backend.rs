//! [`RenderBackend`] implementation on top of wgpu.

use std::sync::Arc;

use image::RgbaImage;
use orrery_scene::{
    CameraRig, Material, MeshData, MeshHandle, RenderBackend, Rgb, Scene, SurfaceSize,
    TextureHandle,
};
use winit::window::Window;

use crate::buffer::{BufferAllocator, MeshBuffer};
use crate::depth::DepthBuffer;
use crate::gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
use crate::pass::{FrameEncoder, RenderPassBuilder, SPACE_BLACK, clear_color_from_srgb};
use crate::pipeline::{FrameUniform, NodeUniform, NodeUniformBuffer, PipelineKind, ScenePipelines};
use crate::texture::{TextureError, TextureStore};

/// Errors raised while uploading or drawing.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("surface unavailable: {0}")]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error("mesh has no vertices")]
    EmptyMesh,

    #[error("node `{node}` references unknown mesh {mesh}")]
    UnknownMesh { node: String, mesh: u32 },
}

impl RenderError {
    /// Whether the window can no longer be drawn to.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RenderError::Surface(e) if e.is_fatal())
    }
}

struct DrawCall {
    kind: PipelineKind,
    mesh: usize,
    texture: Option<TextureHandle>,
    slot: usize,
}

/// Draws a [`Scene`] into a window surface.
pub struct WgpuBackend {
    gpu: RenderContext,
    queue: Arc<wgpu::Queue>,
    depth: DepthBuffer,
    pipelines: ScenePipelines,
    textures: TextureStore,
    meshes: Vec<MeshBuffer>,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    node_uniforms: NodeUniformBuffer,
    clear_color: wgpu::Color,
    size: SurfaceSize,
    draws: Vec<DrawCall>,
    uniforms: Vec<NodeUniform>,
}

impl WgpuBackend {
    /// Initialize the GPU for `window`, blocking until the device is ready.
    pub fn new(window: Arc<Window>, vsync: bool) -> Result<Self, RenderContextError> {
        let scale_factor = window.scale_factor();
        let gpu = init_render_context_blocking(window, vsync)?;
        let size = SurfaceSize::new(
            gpu.surface_config.width,
            gpu.surface_config.height,
            scale_factor,
        );

        let device = &gpu.device;
        let textures = TextureStore::new(device, &gpu.queue);
        let pipelines = ScenePipelines::new(device, gpu.surface_format, textures.bind_group_layout());
        let depth = DepthBuffer::new(device, size.width, size.height);

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame-uniform"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame-bind-group"),
            layout: &pipelines.frame_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });
        let node_uniforms = NodeUniformBuffer::new(device, &pipelines.node_bind_group_layout);

        log::info!(
            "Renderer ready: {}x{} {:?}",
            size.width,
            size.height,
            gpu.surface_format
        );

        Ok(Self {
            queue: Arc::new(gpu.queue.clone()),
            gpu,
            depth,
            pipelines,
            textures,
            meshes: Vec::new(),
            frame_buffer,
            frame_bind_group,
            node_uniforms,
            clear_color: SPACE_BLACK,
            size,
            draws: Vec::new(),
            uniforms: Vec::new(),
        })
    }

    pub fn context(&self) -> &RenderContext {
        &self.gpu
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Resolve every node to a draw call, opaque kinds first.
    fn collect_draws(&mut self, scene: &Scene) -> Result<(), RenderError> {
        self.draws.clear();
        self.uniforms.clear();

        for (slot, (_, node)) in scene.iter().enumerate() {
            let mesh = node.mesh.raw() as usize;
            if mesh >= self.meshes.len() {
                return Err(RenderError::UnknownMesh {
                    node: node.name.clone(),
                    mesh: node.mesh.raw(),
                });
            }
            let texture = match node.material {
                Material::Phong { texture, .. } => texture,
                _ => None,
            };
            self.draws.push(DrawCall {
                kind: PipelineKind::for_material(&node.material),
                mesh,
                texture,
                slot,
            });
            self.uniforms.push(NodeUniform::from_node(node));
        }

        self.draws.sort_by_key(|draw| draw.kind);
        Ok(())
    }
}

impl RenderBackend for WgpuBackend {
    type Error = RenderError;

    fn surface_size(&self) -> SurfaceSize {
        self.size
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
        self.gpu.resize(size.width, size.height);
        self.depth.resize(&self.gpu.device, size.width, size.height);
    }

    fn set_clear_color(&mut self, color: Rgb) {
        self.clear_color = clear_color_from_srgb(color);
    }

    fn create_mesh(&mut self, mesh: &MeshData) -> Result<MeshHandle, RenderError> {
        if mesh.is_empty() {
            return Err(RenderError::EmptyMesh);
        }
        let handle = MeshHandle::from_raw(self.meshes.len() as u32);
        let buffer = BufferAllocator::new(&self.gpu.device)
            .create_mesh(&format!("mesh-{}", handle.raw()), mesh);
        self.meshes.push(buffer);
        Ok(handle)
    }

    fn create_texture(&mut self, image: &RgbaImage) -> Result<TextureHandle, RenderError> {
        Ok(self
            .textures
            .create_from_image(&self.gpu.device, &self.gpu.queue, image)?)
    }

    fn render(&mut self, scene: &Scene, camera: &CameraRig) -> Result<(), RenderError> {
        self.collect_draws(scene)?;
        let surface_texture = self.gpu.get_current_texture()?;

        let frame = FrameUniform::new(camera, scene.lights(), (self.size.width, self.size.height));
        self.gpu
            .queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame));
        self.node_uniforms.write(
            &self.gpu.device,
            &self.gpu.queue,
            &self.pipelines.node_bind_group_layout,
            &self.uniforms,
        );

        let mut encoder = FrameEncoder::new(&self.gpu.device, Arc::clone(&self.queue), surface_texture);
        let builder = RenderPassBuilder::new()
            .clear_color(self.clear_color)
            .depth(self.depth.view.clone(), DepthBuffer::CLEAR_VALUE)
            .label("scene-pass");

        if let Some(mut pass) = encoder.begin_render_pass(&builder) {
            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            for draw in &self.draws {
                pass.set_pipeline(self.pipelines.get(draw.kind));
                pass.set_bind_group(
                    1,
                    self.node_uniforms.bind_group(),
                    &[self.node_uniforms.offset(draw.slot)],
                );
                if draw.kind != PipelineKind::Stars {
                    pass.set_bind_group(2, self.textures.bind_group(draw.texture), &[]);
                }
                let mesh = &self.meshes[draw.mesh];
                mesh.bind(&mut pass);
                mesh.draw(&mut pass);
            }
        }

        encoder.submit();
        Ok(())
    }
}
