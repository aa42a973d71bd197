//! Scene pipelines: lit and unlit meshes, translucent overlays, and stars.
//!
//! Every draw binds the frame uniform at group 0 and a per-node uniform at
//! group 1 through a dynamic offset. Meshes additionally bind their surface
//! texture at group 2.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use orrery_scene::{CameraRig, Light, Material, Node, Rgb};

use crate::buffer::VertexPositionNormalUv;
use crate::depth::DepthBuffer;

/// Per-frame camera and lighting state.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    /// Summed ambient light, premultiplied by intensity.
    pub ambient: [f32; 4],
    /// xyz position, w range.
    pub light_position: [f32; 4],
    /// Point light color premultiplied by intensity; zero when absent.
    pub light_color: [f32; 4],
    /// Surface width and height in pixels.
    pub viewport: [f32; 4],
}

impl FrameUniform {
    pub fn new(camera: &CameraRig, lights: &[Light], viewport: (u32, u32)) -> Self {
        let mut ambient = [0.0f32; 3];
        let mut light_position = [0.0; 4];
        let mut light_color = [0.0; 4];
        let mut has_point = false;

        for light in lights {
            match *light {
                Light::Ambient { color, intensity } => {
                    let linear = srgb_to_linear(color);
                    for (acc, c) in ambient.iter_mut().zip(linear) {
                        *acc += c * intensity;
                    }
                }
                Light::Point {
                    color,
                    intensity,
                    range,
                    position,
                } if !has_point => {
                    has_point = true;
                    light_position = [position.x, position.y, position.z, range];
                    let [r, g, b] = srgb_to_linear(color);
                    light_color = [r * intensity, g * intensity, b * intensity, 0.0];
                }
                Light::Point { .. } => {
                    log::debug!("Only the first point light is shaded, ignoring extra");
                }
            }
        }

        let p = camera.position;
        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            camera_position: [p.x, p.y, p.z, 1.0],
            ambient: [ambient[0], ambient[1], ambient[2], 0.0],
            light_position,
            light_color,
            viewport: [viewport.0 as f32, viewport.1 as f32, 0.0, 0.0],
        }
    }
}

/// Shading modes understood by the mesh shader.
const MODE_BASIC: f32 = 0.0;
const MODE_PHONG: f32 = 1.0;
const MODE_POINTS: f32 = 2.0;

/// Per-node transform and material.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct NodeUniform {
    pub model: [[f32; 4]; 4],
    /// Linear rgb, alpha is opacity.
    pub color: [f32; 4],
    pub emissive: [f32; 4],
    /// rgb specular color, w shininess.
    pub specular: [f32; 4],
    /// x shading mode, y point size.
    pub params: [f32; 4],
}

impl NodeUniform {
    pub fn from_node(node: &Node) -> Self {
        let model = node.transform.to_matrix().to_cols_array_2d();
        let rgba = |color: Rgb, alpha: f32| {
            let [r, g, b] = srgb_to_linear(color);
            [r, g, b, alpha]
        };

        match node.material {
            Material::Basic { color, opacity, .. } => Self {
                model,
                color: rgba(color, opacity),
                emissive: [0.0; 4],
                specular: [0.0; 4],
                params: [MODE_BASIC, 0.0, 0.0, 0.0],
            },
            Material::Phong {
                color,
                emissive,
                specular,
                shininess,
                ..
            } => {
                let [sr, sg, sb] = srgb_to_linear(specular);
                Self {
                    model,
                    color: rgba(color, 1.0),
                    emissive: rgba(emissive, 0.0),
                    specular: [sr, sg, sb, shininess],
                    params: [MODE_PHONG, 0.0, 0.0, 0.0],
                }
            }
            Material::Points { color, size } => Self {
                model,
                color: rgba(color, 1.0),
                emissive: [0.0; 4],
                specular: [0.0; 4],
                params: [MODE_POINTS, size, 0.0, 0.0],
            },
        }
    }
}

/// sRGB transfer function applied per channel.
pub fn srgb_to_linear(color: Rgb) -> [f32; 3] {
    let f = |c: f32| {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [f(color.r), f(color.g), f(color.b)]
}

/// Which pipeline draws a material. Variants are listed in draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineKind {
    Opaque,
    OpaqueDoubleSided,
    Stars,
    /// Alpha blended, no depth writes, drawn last.
    Translucent,
}

impl PipelineKind {
    pub fn for_material(material: &Material) -> Self {
        match material {
            m if m.is_transparent() => PipelineKind::Translucent,
            Material::Basic {
                double_sided: true,
                ..
            } => PipelineKind::OpaqueDoubleSided,
            Material::Points { .. } => PipelineKind::Stars,
            _ => PipelineKind::Opaque,
        }
    }
}

/// Byte distance between node uniforms in the dynamic buffer.
pub fn node_uniform_stride(device: &wgpu::Device) -> u64 {
    let align = device.limits().min_uniform_buffer_offset_alignment as u64;
    let size = std::mem::size_of::<NodeUniform>() as u64;
    size.div_ceil(align) * align
}

/// Growable uniform buffer holding one [`NodeUniform`] per drawn node.
pub struct NodeUniformBuffer {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    capacity: usize,
    stride: u64,
    staging: Vec<u8>,
}

impl NodeUniformBuffer {
    const INITIAL_CAPACITY: usize = 32;

    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout) -> Self {
        let stride = node_uniform_stride(device);
        let (buffer, bind_group) = Self::allocate(device, layout, Self::INITIAL_CAPACITY, stride);
        Self {
            buffer,
            bind_group,
            capacity: Self::INITIAL_CAPACITY,
            stride,
            staging: Vec::new(),
        }
    }

    fn allocate(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        capacity: usize,
        stride: u64,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("node-uniforms"),
            size: capacity as u64 * stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("node-bind-group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: NonZeroU64::new(std::mem::size_of::<NodeUniform>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    /// Upload `nodes`, growing the buffer when needed.
    pub fn write(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        nodes: &[NodeUniform],
    ) {
        if nodes.len() > self.capacity {
            let capacity = nodes.len().next_power_of_two();
            (self.buffer, self.bind_group) = Self::allocate(device, layout, capacity, self.stride);
            self.capacity = capacity;
            log::debug!("Grew node uniform buffer to {capacity} slots");
        }
        if nodes.is_empty() {
            return;
        }

        let size = std::mem::size_of::<NodeUniform>();
        self.staging.clear();
        self.staging.resize(nodes.len() * self.stride as usize, 0);
        for (i, node) in nodes.iter().enumerate() {
            let start = i * self.stride as usize;
            self.staging[start..start + size].copy_from_slice(bytemuck::bytes_of(node));
        }
        queue.write_buffer(&self.buffer, 0, &self.staging);
    }

    /// Dynamic offset of slot `index`.
    pub fn offset(&self, index: usize) -> u32 {
        (index as u64 * self.stride) as u32
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// All pipelines and layouts needed to draw a scene.
pub struct ScenePipelines {
    pub frame_bind_group_layout: wgpu::BindGroupLayout,
    pub node_bind_group_layout: wgpu::BindGroupLayout,
    opaque: wgpu::RenderPipeline,
    opaque_double_sided: wgpu::RenderPipeline,
    translucent: wgpu::RenderPipeline,
    stars: wgpu::RenderPipeline,
}

impl ScenePipelines {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        texture_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let frame_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("frame-bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(
                            std::mem::size_of::<FrameUniform>() as u64
                        ),
                    },
                    count: None,
                }],
            });

        let node_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("node-bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: NonZeroU64::new(
                            std::mem::size_of::<NodeUniform>() as u64
                        ),
                    },
                    count: None,
                }],
            });

        let mesh_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh-pipeline-layout"),
            bind_group_layouts: &[
                &frame_bind_group_layout,
                &node_bind_group_layout,
                texture_layout,
            ],
            immediate_size: 0,
        });
        let star_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("star-pipeline-layout"),
            bind_group_layouts: &[&frame_bind_group_layout, &node_bind_group_layout],
            immediate_size: 0,
        });

        let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh-shader"),
            source: wgpu::ShaderSource::Wgsl(MESH_SHADER_SOURCE.into()),
        });
        let star_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("star-shader"),
            source: wgpu::ShaderSource::Wgsl(STAR_SHADER_SOURCE.into()),
        });

        let build = |kind: PipelineKind| {
            let (layout, shader, buffers) = match kind {
                PipelineKind::Stars => (
                    &star_layout,
                    &star_shader,
                    [VertexPositionNormalUv::instance_layout()],
                ),
                _ => (
                    &mesh_layout,
                    &mesh_shader,
                    [VertexPositionNormalUv::layout()],
                ),
            };
            create_pipeline(device, kind, layout, shader, &buffers, surface_format)
        };

        Self {
            opaque: build(PipelineKind::Opaque),
            opaque_double_sided: build(PipelineKind::OpaqueDoubleSided),
            translucent: build(PipelineKind::Translucent),
            stars: build(PipelineKind::Stars),
            frame_bind_group_layout,
            node_bind_group_layout,
        }
    }

    pub fn get(&self, kind: PipelineKind) -> &wgpu::RenderPipeline {
        match kind {
            PipelineKind::Opaque => &self.opaque,
            PipelineKind::OpaqueDoubleSided => &self.opaque_double_sided,
            PipelineKind::Translucent => &self.translucent,
            PipelineKind::Stars => &self.stars,
        }
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    kind: PipelineKind,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    buffers: &[wgpu::VertexBufferLayout<'_>],
    surface_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let (label, cull_mode, depth_write_enabled, blend) = match kind {
        PipelineKind::Opaque => ("opaque-pipeline", Some(wgpu::Face::Back), true, None),
        PipelineKind::OpaqueDoubleSided => ("opaque-double-sided-pipeline", None, true, None),
        PipelineKind::Stars => ("star-pipeline", None, true, None),
        PipelineKind::Translucent => (
            "translucent-pipeline",
            None,
            false,
            Some(wgpu::BlendState::ALPHA_BLENDING),
        ),
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DepthBuffer::FORMAT,
            depth_write_enabled,
            depth_compare: DepthBuffer::COMPARE_FUNCTION,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview_mask: None,
        cache: None,
    })
}

macro_rules! uniform_declarations {
    () => {
        r#"
struct FrameUniform {
    view_proj: mat4x4<f32>,
    camera_position: vec4<f32>,
    ambient: vec4<f32>,
    light_position: vec4<f32>,
    light_color: vec4<f32>,
    viewport: vec4<f32>,
};

struct NodeUniform {
    model: mat4x4<f32>,
    color: vec4<f32>,
    emissive: vec4<f32>,
    specular: vec4<f32>,
    params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: FrameUniform;

@group(1) @binding(0)
var<uniform> node: NodeUniform;
"#
    };
}

/// WGSL for textured meshes: unlit when `params.x` is 0, Blinn-Phong when 1.
pub const MESH_SHADER_SOURCE: &str = concat!(
    uniform_declarations!(),
    r#"
@group(2) @binding(0)
var surface_texture: texture_2d<f32>;
@group(2) @binding(1)
var surface_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    let world = node.model * vec4<f32>(in.position, 1.0);
    var out: VertexOutput;
    out.clip_position = frame.view_proj * world;
    out.world_position = world.xyz;
    out.normal = (node.model * vec4<f32>(in.normal, 0.0)).xyz;
    out.uv = in.uv;
    return out;
}

// Linear falloff reaching zero at the light's range.
fn range_attenuation(dist: f32, range: f32) -> f32 {
    if range <= 0.0 {
        return 1.0;
    }
    return clamp(1.0 - dist / range, 0.0, 1.0);
}

@fragment
fn fs_main(in: VertexOutput, @builtin(front_facing) front_facing: bool) -> @location(0) vec4<f32> {
    let texel = textureSample(surface_texture, surface_sampler, in.uv);
    let base = node.color.rgb * texel.rgb;
    if node.params.x < 0.5 {
        return vec4<f32>(base, node.color.a);
    }

    var n = normalize(in.normal);
    if !front_facing {
        n = -n;
    }
    let to_light = frame.light_position.xyz - in.world_position;
    let dist = length(to_light);
    let l = to_light / max(dist, 1e-4);
    let v = normalize(frame.camera_position.xyz - in.world_position);
    let h = normalize(l + v);

    let n_dot_l = max(dot(n, l), 0.0);
    let radiance = frame.light_color.rgb * range_attenuation(dist, frame.light_position.w);
    let diffuse = base * (frame.ambient.rgb + radiance * n_dot_l);

    var specular = vec3<f32>(0.0);
    if n_dot_l > 0.0 {
        specular = node.specular.rgb * radiance * pow(max(dot(n, h), 0.0), node.specular.w);
    }

    return vec4<f32>(diffuse + specular + node.emissive.rgb, node.color.a);
}
"#
);

/// WGSL for stars: each instance expands to a screen-facing quad whose pixel
/// size shrinks with view depth.
pub const STAR_SHADER_SOURCE: &str = concat!(
    uniform_declarations!(),
    r#"
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) position: vec3<f32>,
) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );
    let corner = corners[vertex_index];

    var clip = frame.view_proj * node.model * vec4<f32>(position, 1.0);
    let pixels = max(node.params.y * frame.viewport.y * 0.5 / max(clip.w, 1e-4), 1.0);
    clip.x += corner.x * pixels / frame.viewport.x * clip.w;
    clip.y += corner.y * pixels / frame.viewport.y * clip.w;

    var out: VertexOutput;
    out.clip_position = clip;
    return out;
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(node.color.rgb, 1.0);
}
"#
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::{TextureStore, create_test_device_queue};
    use glam::{Quat, Vec3};
    use orrery_scene::{MeshHandle, Transform};

    fn node(material: Material) -> Node {
        Node {
            name: "test".into(),
            mesh: MeshHandle::from_raw(0),
            material,
            transform: Transform {
                translation: Vec3::new(1.0, 2.0, 3.0),
                rotation: Quat::IDENTITY,
            },
        }
    }

    #[test]
    fn test_uniform_sizes_are_16_byte_multiples() {
        assert_eq!(std::mem::size_of::<FrameUniform>(), 144);
        assert_eq!(std::mem::size_of::<NodeUniform>(), 128);
    }

    #[test]
    fn test_srgb_to_linear_endpoints() {
        assert_eq!(srgb_to_linear(Rgb::BLACK), [0.0; 3]);
        let [r, _, _] = srgb_to_linear(Rgb::WHITE);
        assert!((r - 1.0).abs() < 1e-6);
        let [mid, _, _] = srgb_to_linear(Rgb::new(0.5, 0.0, 0.0));
        assert!((mid - 0.214).abs() < 1e-3, "mid grey linearizes to ~0.214, got {mid}");
    }

    #[test]
    fn test_pipeline_kind_for_material() {
        assert_eq!(
            PipelineKind::for_material(&Material::basic(Rgb::WHITE)),
            PipelineKind::Opaque
        );
        let ring = Material::Basic {
            color: Rgb::WHITE,
            opacity: 0.1,
            double_sided: true,
        };
        assert_eq!(PipelineKind::for_material(&ring), PipelineKind::Translucent);
        let double = Material::Basic {
            color: Rgb::WHITE,
            opacity: 1.0,
            double_sided: true,
        };
        assert_eq!(
            PipelineKind::for_material(&double),
            PipelineKind::OpaqueDoubleSided
        );
        let stars = Material::Points {
            color: Rgb::WHITE,
            size: 2.0,
        };
        assert_eq!(PipelineKind::for_material(&stars), PipelineKind::Stars);
    }

    #[test]
    fn test_translucent_sorts_last() {
        let mut kinds = vec![
            PipelineKind::Translucent,
            PipelineKind::Stars,
            PipelineKind::Opaque,
        ];
        kinds.sort();
        assert_eq!(kinds.last(), Some(&PipelineKind::Translucent));
        assert_eq!(kinds.first(), Some(&PipelineKind::Opaque));
    }

    #[test]
    fn test_node_uniform_packs_material() {
        let phong = node(Material::Phong {
            color: Rgb::WHITE,
            emissive: Rgb::BLACK,
            specular: Rgb::WHITE,
            shininess: 30.0,
            texture: None,
        });
        let uniform = NodeUniform::from_node(&phong);
        assert_eq!(uniform.params[0], MODE_PHONG);
        assert_eq!(uniform.specular[3], 30.0);
        assert_eq!(uniform.model[3][..3], [1.0, 2.0, 3.0]);

        let ring = node(Material::Basic {
            color: Rgb::WHITE,
            opacity: 0.1,
            double_sided: true,
        });
        assert_eq!(NodeUniform::from_node(&ring).color[3], 0.1);

        let stars = node(Material::Points {
            color: Rgb::WHITE,
            size: 2.0,
        });
        let uniform = NodeUniform::from_node(&stars);
        assert_eq!(uniform.params[..2], [MODE_POINTS, 2.0]);
    }

    #[test]
    fn test_frame_uniform_collects_lights() {
        let camera = CameraRig::new(75.0, 16.0 / 9.0, 0.1, 1000.0);
        let lights = [
            Light::Ambient {
                color: Rgb::WHITE,
                intensity: 0.4,
            },
            Light::Point {
                color: Rgb::WHITE,
                intensity: 2.0,
                range: 1000.0,
                position: Vec3::ZERO,
            },
        ];
        let uniform = FrameUniform::new(&camera, &lights, (1280, 720));
        assert!((uniform.ambient[0] - 0.4).abs() < 1e-6);
        assert!((uniform.light_color[0] - 2.0).abs() < 1e-6);
        assert_eq!(uniform.light_position[3], 1000.0);
        assert_eq!(uniform.viewport[..2], [1280.0, 720.0]);
    }

    #[test]
    fn test_frame_uniform_without_point_light_is_dark() {
        let camera = CameraRig::new(75.0, 1.0, 0.1, 1000.0);
        let uniform = FrameUniform::new(&camera, &[], (1, 1));
        assert_eq!(uniform.light_color, [0.0; 4]);
        assert_eq!(uniform.ambient, [0.0; 4]);
    }

    #[test]
    fn test_pipelines_compile() {
        let Some((device, queue)) = create_test_device_queue() else {
            return;
        };
        let textures = TextureStore::new(&device, &queue);
        let pipelines = ScenePipelines::new(
            &device,
            wgpu::TextureFormat::Bgra8UnormSrgb,
            textures.bind_group_layout(),
        );
        let _ = pipelines.get(PipelineKind::Translucent);
    }

    #[test]
    fn test_node_buffer_grows() {
        let Some((device, queue)) = create_test_device_queue() else {
            return;
        };
        let textures = TextureStore::new(&device, &queue);
        let pipelines = ScenePipelines::new(
            &device,
            wgpu::TextureFormat::Bgra8UnormSrgb,
            textures.bind_group_layout(),
        );
        let layout = &pipelines.node_bind_group_layout;
        let mut buffer = NodeUniformBuffer::new(&device, layout);
        let uniforms = vec![NodeUniform::zeroed(); 40];
        buffer.write(&device, &queue, layout, &uniforms);
        assert_eq!(buffer.capacity(), 64);
        assert_eq!(buffer.offset(1) as u64, node_uniform_stride(&device));
    }
}
