//! In-memory render backend for tests and the `--headless-frames` driver.

use glam::Vec3;
use image::RgbaImage;

use crate::backend::{MeshHandle, RenderBackend, SurfaceSize, TextureHandle};
use crate::camera::CameraRig;
use crate::color::Rgb;
use crate::geometry::MeshData;
use crate::scene::Scene;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum HeadlessError {
    #[error("mesh has no vertices")]
    EmptyMesh,
    #[error("texture has zero area")]
    EmptyTexture,
    #[error("scene references unknown mesh {0}")]
    UnknownMesh(u32),
    #[error("injected failure")]
    InjectedFailure,
}

/// What the last successful `render` call saw.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRecord {
    pub node_count: usize,
    pub camera_position: Vec3,
    pub camera_target: Vec3,
    pub aspect_ratio: f32,
}

/// Records uploads and frames without touching a GPU.
#[derive(Debug)]
pub struct HeadlessBackend {
    size: SurfaceSize,
    clear_color: Rgb,
    meshes: Vec<(usize, usize)>,
    textures: Vec<(u32, u32)>,
    frames: u64,
    last_frame: Option<FrameRecord>,
    fail_renders: bool,
    fail_uploads: bool,
}

impl HeadlessBackend {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            clear_color: Rgb::BLACK,
            meshes: Vec::new(),
            textures: Vec::new(),
            frames: 0,
            last_frame: None,
            fail_renders: false,
            fail_uploads: false,
        }
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    pub fn last_frame(&self) -> Option<&FrameRecord> {
        self.last_frame.as_ref()
    }

    pub fn clear_color(&self) -> Rgb {
        self.clear_color
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Vertex and index counts of an uploaded mesh.
    pub fn mesh_info(&self, handle: MeshHandle) -> Option<(usize, usize)> {
        self.meshes.get(handle.raw() as usize).copied()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn texture_size(&self, handle: TextureHandle) -> Option<(u32, u32)> {
        self.textures.get(handle.raw() as usize).copied()
    }

    /// Make every subsequent `render` fail until switched off.
    pub fn set_fail_renders(&mut self, fail: bool) {
        self.fail_renders = fail;
    }

    /// Make every subsequent mesh or texture upload fail.
    pub fn set_fail_uploads(&mut self, fail: bool) {
        self.fail_uploads = fail;
    }
}

impl RenderBackend for HeadlessBackend {
    type Error = HeadlessError;

    fn surface_size(&self) -> SurfaceSize {
        self.size
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
    }

    fn set_clear_color(&mut self, color: Rgb) {
        self.clear_color = color;
    }

    fn create_mesh(&mut self, mesh: &MeshData) -> Result<MeshHandle, HeadlessError> {
        if self.fail_uploads {
            return Err(HeadlessError::InjectedFailure);
        }
        if mesh.is_empty() {
            return Err(HeadlessError::EmptyMesh);
        }
        self.meshes.push((mesh.vertex_count(), mesh.index_count()));
        Ok(MeshHandle::from_raw(self.meshes.len() as u32 - 1))
    }

    fn create_texture(&mut self, image: &RgbaImage) -> Result<TextureHandle, HeadlessError> {
        if self.fail_uploads {
            return Err(HeadlessError::InjectedFailure);
        }
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(HeadlessError::EmptyTexture);
        }
        self.textures.push((width, height));
        Ok(TextureHandle::from_raw(self.textures.len() as u32 - 1))
    }

    fn render(&mut self, scene: &Scene, camera: &CameraRig) -> Result<(), HeadlessError> {
        if self.fail_renders {
            return Err(HeadlessError::InjectedFailure);
        }
        if let Some((_, node)) = scene
            .iter()
            .find(|(_, node)| node.mesh.raw() as usize >= self.meshes.len())
        {
            return Err(HeadlessError::UnknownMesh(node.mesh.raw()));
        }

        self.frames += 1;
        self.last_frame = Some(FrameRecord {
            node_count: scene.len(),
            camera_position: camera.position,
            camera_target: camera.target,
            aspect_ratio: camera.aspect_ratio(),
        });
        Ok(())
    }
}
