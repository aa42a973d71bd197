//! Perspective camera aimed at a point, plus the viewport-dependent start positions.

use glam::{Mat4, Vec3};
use orrery_config::SceneConfig;

/// A look-at perspective camera.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    /// Eye position in world space.
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Vertical field of view in radians.
    fov_y: f32,
    /// Width / height.
    aspect_ratio: f32,
    /// Near clip plane distance (always positive).
    near: f32,
    /// Far clip plane distance (always positive, > near).
    far: f32,
}

impl CameraRig {
    pub fn new(fov_y_degrees: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 1.0),
            target: Vec3::ZERO,
            fov_y: fov_y_degrees.to_radians(),
            aspect_ratio,
            near,
            far,
        }
    }

    /// Camera configured from the scene settings, aspect derived from the viewport.
    pub fn from_config(config: &SceneConfig, width: u32, height: u32) -> Self {
        let mut rig = Self::new(config.fov_degrees, 1.0, config.near, config.far);
        rig.set_aspect_ratio(width, height);
        rig
    }

    /// Re-aim at `target` without moving.
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Move to `position` and aim at `target`.
    pub fn place(&mut self, position: Vec3, target: Vec3) {
        self.position = position;
        self.target = target;
    }

    /// Update the aspect ratio. Zero extents are treated as 1.
    pub fn set_aspect_ratio(&mut self, width: u32, height: u32) {
        self.aspect_ratio = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    /// Unit vector from the eye toward the target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Z)
    }

    pub fn view_matrix(&self) -> Mat4 {
        let forward = self.forward();
        // Looking straight down Y needs a different up vector.
        let up = if forward.cross(Vec3::Y).length_squared() < 1e-8 {
            Vec3::NEG_Z
        } else {
            Vec3::Y
        };
        Mat4::look_to_rh(self.position, forward, up)
    }

    /// Projection with reverse-Z: near maps to depth 1, far to depth 0.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.far, self.near)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Start positions chosen by logical viewport width.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraPresets {
    pub desktop: Vec3,
    pub mobile: Vec3,
    /// Widths strictly below this use the mobile preset.
    pub breakpoint: f64,
}

impl CameraPresets {
    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            desktop: Vec3::from_array(config.desktop_camera),
            mobile: Vec3::from_array(config.mobile_camera),
            breakpoint: config.mobile_breakpoint,
        }
    }

    pub fn is_mobile(&self, logical_width: f64) -> bool {
        logical_width < self.breakpoint
    }

    pub fn position_for_width(&self, logical_width: f64) -> Vec3 {
        if self.is_mobile(logical_width) {
            self.mobile
        } else {
            self.desktop
        }
    }
}

impl Default for CameraPresets {
    fn default() -> Self {
        Self::from_config(&SceneConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn test_config_camera_uses_degrees() {
        let rig = CameraRig::from_config(&SceneConfig::default(), 1600, 800);
        assert!(approx_eq(rig.fov_y(), 75f32.to_radians(), 1e-6));
        assert_eq!(rig.aspect_ratio(), 2.0);
        assert_eq!(rig.near(), 0.1);
        assert_eq!(rig.far(), 1000.0);
    }

    #[test]
    fn test_zero_height_does_not_divide_by_zero() {
        let mut rig = CameraRig::new(75.0, 1.0, 0.1, 1000.0);
        rig.set_aspect_ratio(800, 0);
        assert_eq!(rig.aspect_ratio(), 800.0);
        assert!(rig.projection_matrix().is_finite());
    }

    #[test]
    fn test_reverse_z_depth_range() {
        let mut rig = CameraRig::new(75.0, 1.0, 0.1, 1000.0);
        rig.place(Vec3::ZERO, Vec3::NEG_Z);
        let vp = rig.view_projection_matrix();

        let near = vp.project_point3(Vec3::new(0.0, 0.0, -0.1));
        let far = vp.project_point3(Vec3::new(0.0, 0.0, -1000.0));
        assert!(approx_eq(near.z, 1.0, 1e-4), "near plane depth {}", near.z);
        assert!(approx_eq(far.z, 0.0, 1e-4), "far plane depth {}", far.z);
    }

    #[test]
    fn test_target_projects_to_screen_center() {
        let mut rig = CameraRig::new(75.0, 16.0 / 9.0, 0.1, 1000.0);
        rig.place(Vec3::new(0.0, 50.0, 80.0), Vec3::ZERO);
        let ndc = rig.view_projection_matrix().project_point3(Vec3::ZERO);
        assert!(approx_eq(ndc.x, 0.0, 1e-5));
        assert!(approx_eq(ndc.y, 0.0, 1e-5));
    }

    #[test]
    fn test_view_from_directly_above_is_finite() {
        let mut rig = CameraRig::new(75.0, 1.0, 0.1, 1000.0);
        rig.place(Vec3::new(0.0, 100.0, 0.0), Vec3::ZERO);
        assert!(rig.view_matrix().is_finite());
    }

    #[test]
    fn test_presets_by_breakpoint() {
        let presets = CameraPresets::default();
        assert_eq!(presets.position_for_width(767.9), Vec3::new(0.0, 40.0, 60.0));
        assert_eq!(presets.position_for_width(768.0), Vec3::new(0.0, 50.0, 80.0));
        assert_eq!(presets.position_for_width(1920.0), Vec3::new(0.0, 50.0, 80.0));
    }
}
