//! wgpu renderer for orrery scenes: surface management, GPU buffers, pipelines,
//! and the [`WgpuBackend`] that draws a [`orrery_scene::Scene`] each frame.

pub mod backend;
pub mod buffer;
pub mod depth;
pub mod gpu;
pub mod pass;
pub mod pipeline;
pub mod surface;
pub mod texture;

pub use backend::{RenderError, WgpuBackend};
pub use buffer::{BufferAllocator, MeshBuffer, VertexPositionNormalUv};
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use pass::{FrameEncoder, RenderPassBuilder, SPACE_BLACK};
pub use pipeline::{FrameUniform, NodeUniform, PipelineKind, ScenePipelines};
pub use surface::SurfaceWrapper;
pub use texture::{TextureError, TextureStore};
