//! GPU texture storage for synthesized planet surfaces.
//!
//! [`TextureStore`] uploads RGBA images once and hands back a
//! [`TextureHandle`] whose bind group is ready for draw calls. Untextured
//! materials bind a 1×1 white fallback so a single pipeline serves both.

use image::RgbaImage;
use orrery_scene::TextureHandle;

/// Format for all surface textures; sampling yields linear color.
pub const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// A GPU texture with its view and bind group.
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub bind_group: wgpu::BindGroup,
    pub dimensions: (u32, u32),
}

/// Errors that can occur during texture creation.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    /// Pixel data length doesn't match the expected size for the given dimensions.
    #[error("texture data size ({actual}) does not match expected ({expected}) for {width}x{height}")]
    DataSizeMismatch {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
    },

    /// Width or height is zero.
    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },
}

pub struct TextureStore {
    textures: Vec<GpuTexture>,
    fallback: GpuTexture,
    sampler: wgpu::Sampler,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl TextureStore {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        // Longitude wraps across the sphere seam; latitude clamps at the poles.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("surface-sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture-bind-group-layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let fallback = upload(
            device,
            queue,
            &bind_group_layout,
            &sampler,
            "white-fallback",
            &[255; 4],
            1,
            1,
        );

        Self {
            textures: Vec::new(),
            fallback,
            sampler,
            bind_group_layout,
        }
    }

    /// Upload tightly packed RGBA8 pixels.
    pub fn create_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[u8],
        width: u32,
        height: u32,
    ) -> Result<TextureHandle, TextureError> {
        validate_dimensions(width, height)?;
        validate_data_size(data, width, height)?;

        let handle = TextureHandle::from_raw(self.textures.len() as u32);
        let label = format!("surface-texture-{}", handle.raw());
        let texture = upload(
            device,
            queue,
            &self.bind_group_layout,
            &self.sampler,
            &label,
            data,
            width,
            height,
        );
        self.textures.push(texture);
        log::debug!("Created texture '{label}' ({width}x{height})");
        Ok(handle)
    }

    pub fn create_from_image(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &RgbaImage,
    ) -> Result<TextureHandle, TextureError> {
        self.create_texture(device, queue, image.as_raw(), image.width(), image.height())
    }

    pub fn get(&self, handle: TextureHandle) -> Option<&GpuTexture> {
        self.textures.get(handle.raw() as usize)
    }

    /// Bind group for `handle`, or the white fallback when absent or unknown.
    pub fn bind_group(&self, handle: Option<TextureHandle>) -> &wgpu::BindGroup {
        handle
            .and_then(|h| self.get(h))
            .map_or(&self.fallback.bind_group, |t| &t.bind_group)
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

#[allow(clippy::too_many_arguments)]
fn upload(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    label: &str,
    data: &[u8],
    width: u32,
    height: u32,
) -> GpuTexture {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TEXTURE_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(width * 4),
            rows_per_image: None,
        },
        size,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{label}-bind-group")),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });

    GpuTexture {
        texture,
        view,
        bind_group,
        dimensions: (width, height),
    }
}

fn validate_dimensions(width: u32, height: u32) -> Result<(), TextureError> {
    if width == 0 || height == 0 {
        return Err(TextureError::ZeroDimensions { width, height });
    }
    Ok(())
}

fn validate_data_size(data: &[u8], width: u32, height: u32) -> Result<(), TextureError> {
    let expected = width as usize * height as usize * 4;
    if data.len() != expected {
        return Err(TextureError::DataSizeMismatch {
            actual: data.len(),
            expected,
            width,
            height,
        });
    }
    Ok(())
}

/// Create a test GPU device and queue. Returns `None` if no GPU is available.
#[cfg(test)]
pub(crate) fn create_test_device_queue() -> Option<(wgpu::Device, wgpu::Queue)> {
    pollster::block_on(async {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok()?;

        adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: Default::default(),
                ..Default::default()
            })
            .await
            .ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            validate_dimensions(0, 256),
            Err(TextureError::ZeroDimensions { width: 0, height: 256 })
        ));
        assert!(validate_dimensions(512, 256).is_ok());
    }

    #[test]
    fn test_data_size_mismatch_rejected() {
        let err = validate_data_size(&[0; 12], 2, 2).unwrap_err();
        assert!(matches!(
            err,
            TextureError::DataSizeMismatch {
                actual: 12,
                expected: 16,
                ..
            }
        ));
    }

    #[test]
    fn test_create_from_image_returns_sequential_handles() {
        let Some((device, queue)) = create_test_device_queue() else {
            return;
        };
        let mut store = TextureStore::new(&device, &queue);
        assert!(store.is_empty());

        let image = RgbaImage::new(8, 4);
        let a = store.create_from_image(&device, &queue, &image).unwrap();
        let b = store.create_from_image(&device, &queue, &image).unwrap();
        assert_eq!(a.raw(), 0);
        assert_eq!(b.raw(), 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(b).map(|t| t.dimensions), Some((8, 4)));
    }

    #[test]
    fn test_unknown_handle_uses_fallback() {
        let Some((device, queue)) = create_test_device_queue() else {
            return;
        };
        let store = TextureStore::new(&device, &queue);
        assert!(store.get(TextureHandle::from_raw(3)).is_none());
        // Both resolve without panicking; the fallback serves either case.
        let _ = store.bind_group(None);
        let _ = store.bind_group(Some(TextureHandle::from_raw(3)));
    }

    #[test]
    fn test_gpu_rejects_bad_data() {
        let Some((device, queue)) = create_test_device_queue() else {
            return;
        };
        let mut store = TextureStore::new(&device, &queue);
        let result = store.create_texture(&device, &queue, &[0; 3], 1, 1);
        assert!(result.is_err());
        assert!(store.is_empty(), "failed upload must not consume a handle");
    }
}
