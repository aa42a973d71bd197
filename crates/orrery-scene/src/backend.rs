//! The seam between scene logic and a concrete renderer.

use image::RgbaImage;

use crate::camera::CameraRig;
use crate::color::Rgb;
use crate::geometry::MeshData;
use crate::scene::Scene;

/// Backend-issued mesh handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(u32);

impl MeshHandle {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Backend-issued texture handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(u32);

impl TextureHandle {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Size of the drawable surface.
///
/// Width and height are physical pixels and never zero. Layout decisions use
/// the logical width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
    pub scale_factor: f64,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32, scale_factor: f64) -> Self {
        let scale_factor = if scale_factor.is_finite() && scale_factor > 0.0 {
            scale_factor
        } else {
            1.0
        };
        Self {
            width: width.max(1),
            height: height.max(1),
            scale_factor,
        }
    }

    pub fn logical_width(&self) -> f64 {
        self.width as f64 / self.scale_factor
    }

    pub fn logical_height(&self) -> f64 {
        self.height as f64 / self.scale_factor
    }
}

/// A renderer bound to one drawable surface.
pub trait RenderBackend {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Current surface size.
    fn surface_size(&self) -> SurfaceSize;

    /// Reconfigure for a new surface size.
    fn resize(&mut self, size: SurfaceSize);

    /// Background color used to clear each frame.
    fn set_clear_color(&mut self, color: Rgb);

    /// Upload geometry and return a handle nodes can reference.
    fn create_mesh(&mut self, mesh: &MeshData) -> Result<MeshHandle, Self::Error>;

    /// Upload an sRGB image and return a handle materials can reference.
    fn create_texture(&mut self, image: &RgbaImage) -> Result<TextureHandle, Self::Error>;

    /// Draw one frame of `scene` as seen by `camera`.
    fn render(&mut self, scene: &Scene, camera: &CameraRig) -> Result<(), Self::Error>;
}
