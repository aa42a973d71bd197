//! Surface size tracking that normalizes platform-specific resize behavior.
//!
//! Wayland can report zero-size windows before the compositor assigns a size,
//! and DPI changes alter the physical size without a logical change. The
//! wrapper absorbs both and hands the scene a [`SurfaceSize`].

use orrery_scene::SurfaceSize;

/// Minimum surface dimension (prevents zero-size panics).
pub const MIN_SURFACE_DIMENSION: u32 = 1;

/// Tracks the physical size and scale factor of the window surface.
pub struct SurfaceWrapper {
    physical_width: u32,
    physical_height: u32,
    scale_factor: f64,
    /// Whether the surface has been sized at least once with valid dimensions.
    configured: bool,
}

impl SurfaceWrapper {
    /// Zero initial dimensions are clamped to 1 and leave the wrapper unconfigured.
    pub fn new(physical_width: u32, physical_height: u32, scale_factor: f64) -> Self {
        let has_valid_size = physical_width > 0 && physical_height > 0;
        Self {
            physical_width: physical_width.max(MIN_SURFACE_DIMENSION),
            physical_height: physical_height.max(MIN_SURFACE_DIMENSION),
            scale_factor,
            configured: has_valid_size,
        }
    }

    /// Handle a window resize. Returns the new size only if it changed.
    pub fn handle_resize(&mut self, physical_width: u32, physical_height: u32) -> Option<SurfaceSize> {
        let width = physical_width.max(MIN_SURFACE_DIMENSION);
        let height = physical_height.max(MIN_SURFACE_DIMENSION);

        if width == self.physical_width && height == self.physical_height && self.configured {
            return None;
        }

        self.physical_width = width;
        self.physical_height = height;
        self.configured = true;
        Some(self.size())
    }

    /// Handle a DPI change. The logical width moves even when the physical
    /// size does not, so this always reports the new size.
    pub fn handle_scale_factor_changed(
        &mut self,
        new_scale_factor: f64,
        new_physical_width: u32,
        new_physical_height: u32,
    ) -> SurfaceSize {
        self.scale_factor = new_scale_factor;
        self.physical_width = new_physical_width.max(MIN_SURFACE_DIMENSION);
        self.physical_height = new_physical_height.max(MIN_SURFACE_DIMENSION);
        self.configured = true;
        self.size()
    }

    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.physical_width, self.physical_height, self.scale_factor)
    }

    pub fn physical_width(&self) -> u32 {
        self.physical_width
    }

    pub fn physical_height(&self) -> u32 {
        self.physical_height
    }

    pub fn logical_width(&self) -> f64 {
        self.size().logical_width()
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_wrapper_reports_physical_pixels() {
        let wrapper = SurfaceWrapper::new(2560, 1440, 2.0);
        assert_eq!(wrapper.physical_width(), 2560);
        assert_eq!(wrapper.physical_height(), 1440);
        assert_eq!(wrapper.logical_width(), 1280.0);
        assert!(wrapper.is_configured());
    }

    #[test]
    fn test_zero_size_surface_handled_gracefully() {
        let mut wrapper = SurfaceWrapper::new(0, 0, 1.0);
        assert_eq!(wrapper.physical_width(), 1);
        assert_eq!(wrapper.physical_height(), 1);
        assert!(!wrapper.is_configured(), "zero initial size is not configured");

        let size = wrapper.handle_resize(800, 600).expect("real size should emit");
        assert_eq!((size.width, size.height), (800, 600));
        assert!(wrapper.is_configured());
    }

    #[test]
    fn test_no_event_on_same_dimensions() {
        let mut wrapper = SurfaceWrapper::new(800, 600, 1.0);
        assert!(wrapper.handle_resize(800, 600).is_none());
        assert!(wrapper.handle_resize(1024, 768).is_some());
    }

    #[test]
    fn test_first_resize_to_one_pixel_still_configures() {
        let mut wrapper = SurfaceWrapper::new(0, 0, 1.0);
        let size = wrapper.handle_resize(1, 1);
        assert!(size.is_some(), "unconfigured wrapper should report even a 1x1 size");
    }

    #[test]
    fn test_scale_factor_change_moves_logical_width() {
        let mut wrapper = SurfaceWrapper::new(1536, 1024, 1.0);
        assert_eq!(wrapper.logical_width(), 1536.0);

        let size = wrapper.handle_scale_factor_changed(2.0, 1536, 1024);
        assert_eq!(size.logical_width(), 768.0);
        assert_eq!(wrapper.scale_factor(), 2.0);
    }

    #[test]
    fn test_zero_dimensions_clamped_to_one() {
        let mut wrapper = SurfaceWrapper::new(800, 600, 1.0);
        let size = wrapper.handle_resize(0, 0).expect("clamped size differs");
        assert_eq!((size.width, size.height), (1, 1));
    }
}
