//! The live scene: everything the animation loop, speed controls, and camera
//! focus act on, owned in one place and driven once per display frame.

use std::collections::HashMap;
use std::f64::consts::TAU;
use std::time::Instant;

use glam::Vec3;
use orrery_config::{AnimationConfig, FocusConfig};

use crate::animation::{AnimationLoop, LoopState};
use crate::backend::{RenderBackend, SurfaceSize};
use crate::body::{BodyId, CelestialBody, Sun};
use crate::camera::{CameraPresets, CameraRig};
use crate::error::SceneError;
use crate::focus::{CameraFocusController, FocusHandle, FocusStep, FocusTransition};
use crate::scene::Scene;
use crate::speed::{SpeedRegistry, SpeedUpdate};

pub(crate) struct SceneParts<B> {
    pub backend: B,
    pub scene: Scene,
    pub camera: CameraRig,
    pub presets: CameraPresets,
    pub sun: Sun,
    pub bodies: Vec<CelestialBody>,
    pub speeds: SpeedRegistry,
    pub animation: AnimationLoop,
    pub focus: CameraFocusController,
    pub seed: u64,
}

/// What one call to [`SceneContext::frame`] did.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameReport {
    /// The animation loop advanced the bodies.
    pub ticked: bool,
    /// A frame was submitted to the backend.
    pub rendered: bool,
    /// The focus transition stepped this frame.
    pub focus: Option<FocusStep>,
}

/// Owns the scene, its bodies, and the renderer.
///
/// Single-threaded: the host calls [`frame`](Self::frame) once per display
/// refresh. Within a frame the camera focus steps before the bodies advance.
pub struct SceneContext<B: RenderBackend> {
    backend: B,
    scene: Scene,
    camera: CameraRig,
    presets: CameraPresets,
    sun: Sun,
    /// Indexed by [`BodyId::index`].
    bodies: Vec<CelestialBody>,
    speeds: SpeedRegistry,
    animation: AnimationLoop,
    focus: CameraFocusController,
    seed: u64,
    /// A still frame is owed because the view changed while stopped.
    dirty: bool,
}

impl<B: RenderBackend> SceneContext<B> {
    pub(crate) fn from_parts(parts: SceneParts<B>) -> Self {
        Self {
            backend: parts.backend,
            scene: parts.scene,
            camera: parts.camera,
            presets: parts.presets,
            sun: parts.sun,
            bodies: parts.bodies,
            speeds: parts.speeds,
            animation: parts.animation,
            focus: parts.focus,
            seed: parts.seed,
            dirty: true,
        }
    }

    /// Begin ticking on subsequent frames.
    pub fn start_loop(&mut self) {
        self.animation.start();
        tracing::info!("animation loop started");
    }

    pub fn pause(&mut self) {
        if self.animation.is_running() {
            tracing::debug!(ticks = self.animation.ticks(), "animation paused");
        }
        self.animation.stop();
    }

    /// Resume ticking. The next frame advances the bodies.
    pub fn resume(&mut self) {
        if !self.animation.is_running() {
            tracing::debug!("animation resumed");
        }
        self.animation.start();
    }

    pub fn loop_state(&self) -> LoopState {
        self.animation.state()
    }

    pub fn is_running(&self) -> bool {
        self.animation.is_running()
    }

    /// Replace all speed multipliers. Takes effect on the next tick.
    pub fn set_speeds(&mut self, mapping: &HashMap<String, f32>) -> SpeedUpdate {
        let update = self
            .speeds
            .set_all(mapping.iter().map(|(name, value)| (name.as_str(), *value)));
        tracing::debug!(applied = update.applied, unknown = update.unknown.len(), "speeds updated");
        update
    }

    /// Start a focus transition toward the named planet. Unknown names do nothing.
    pub fn focus(&mut self, name: &str, now: Instant) -> Option<FocusHandle> {
        match BodyId::from_name(name) {
            Some(id) => Some(self.focus_body(id, now)),
            None => {
                tracing::debug!(name, "ignoring focus on unknown body");
                None
            }
        }
    }

    /// Start a focus transition toward `id`, cancelling any in flight.
    pub fn focus_body(&mut self, id: BodyId, now: Instant) -> FocusHandle {
        let body_position = self.body(id).position();
        tracing::info!(body = %id, "focusing camera");
        self.focus.begin(id, body_position, self.camera.position, now)
    }

    /// Cancel the running focus transition, leaving the camera where it is.
    pub fn cancel_focus(&mut self) -> bool {
        self.focus.cancel_active().is_some()
    }

    /// Cancel a specific transition if it is still the active one.
    pub fn cancel_focus_handle(&mut self, handle: FocusHandle) -> bool {
        self.focus.cancel(handle)
    }

    pub fn active_focus(&self) -> Option<&FocusTransition> {
        self.focus.active()
    }

    /// Apply reloaded spin rates and focus timing without rebuilding the scene.
    pub fn retune(&mut self, animation: &AnimationConfig, focus: &FocusConfig) {
        self.animation.set_spins(animation);
        self.focus.retime(focus);
        tracing::info!(
            sun_spin = animation.sun_spin,
            planet_spin = animation.planet_spin,
            focus_ms = focus.duration_ms,
            "scene retuned"
        );
    }

    /// React to a new surface size: aspect ratio, backend, and camera preset.
    ///
    /// Any focus transition is cancelled so the preset position sticks.
    pub fn resize(&mut self, surface: SurfaceSize) {
        self.backend.resize(surface);
        self.camera.set_aspect_ratio(surface.width, surface.height);
        if self.focus.cancel_active().is_some() {
            tracing::debug!("resize cancelled focus transition");
        }
        let logical_width = surface.logical_width();
        self.camera
            .place(self.presets.position_for_width(logical_width), Vec3::ZERO);
        self.dirty = true;
        tracing::debug!(
            width = surface.width,
            height = surface.height,
            mobile = self.presets.is_mobile(logical_width),
            "scene resized"
        );
    }

    /// Run one display frame at time `now`.
    ///
    /// Steps the focus transition, then ticks the animation loop. While the
    /// loop is stopped, a still frame is rendered only if the camera moved or
    /// the surface changed.
    pub fn frame(&mut self, now: Instant) -> Result<FrameReport, SceneError> {
        let bodies = &self.bodies;
        let focus = self
            .focus
            .step(now, &mut self.camera, |id| bodies[id.index()].position());

        let ticked = self.tick()?;
        let mut rendered = ticked;
        if !ticked && (focus.is_some() || self.dirty) {
            self.render()?;
            rendered = true;
        }

        Ok(FrameReport {
            ticked,
            rendered,
            focus,
        })
    }

    /// Advance every body once and render. Returns `false` without touching
    /// anything while the loop is stopped.
    pub fn tick(&mut self) -> Result<bool, SceneError> {
        if !self
            .animation
            .advance(&mut self.sun, &mut self.bodies, &self.speeds)
        {
            return Ok(false);
        }
        self.sync_nodes();
        self.render()?;
        Ok(true)
    }

    fn sync_nodes(&mut self) {
        self.scene
            .set_pose(self.sun.node(), Vec3::ZERO, self.sun.rotation().rem_euclid(TAU) as f32);
        for body in &self.bodies {
            self.scene.set_pose(
                body.node(),
                body.position(),
                body.rotation().rem_euclid(TAU) as f32,
            );
        }
    }

    fn render(&mut self) -> Result<(), SceneError> {
        self.backend
            .render(&self.scene, &self.camera)
            .map_err(SceneError::backend)?;
        self.dirty = false;
        Ok(())
    }

    pub fn body(&self, id: BodyId) -> &CelestialBody {
        &self.bodies[id.index()]
    }

    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    pub fn sun(&self) -> &Sun {
        &self.sun
    }

    pub fn speeds(&self) -> &SpeedRegistry {
        &self.speeds
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Seed the scene was built from; pass it back via config to reproduce.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Ticks that advanced the scene since initialization.
    pub fn ticks(&self) -> u64 {
        self.animation.ticks()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SceneBuilder;
    use crate::headless::HeadlessBackend;
    use orrery_config::Config;
    use std::time::Duration;

    fn context(width: u32) -> SceneContext<HeadlessBackend> {
        let mut config = Config::default();
        config.scene.seed = Some(11);
        config.scene.star_count = 16;
        let surface = SurfaceSize::new(width, 720, 1.0);
        SceneBuilder::new(&config)
            .initialize(HeadlessBackend::new(surface), surface)
            .unwrap()
    }

    #[test]
    fn test_retune_keeps_loop_and_focus_in_flight() {
        let mut ctx = context(1280);
        ctx.start_loop();
        ctx.tick().unwrap();
        let t0 = Instant::now();
        ctx.focus_body(BodyId::Mars, t0);
        let in_flight = ctx.active_focus().unwrap().duration();

        let animation = AnimationConfig {
            sun_spin: 0.0,
            planet_spin: 0.0,
        };
        let focus = FocusConfig {
            duration_ms: 250,
            offset: [0.0, 5.0, 5.0],
        };
        ctx.retune(&animation, &focus);

        assert!(ctx.is_running());
        assert_eq!(ctx.ticks(), 1);
        assert_eq!(ctx.active_focus().unwrap().duration(), in_flight);

        let spin_before = ctx.sun().rotation();
        ctx.tick().unwrap();
        assert_eq!(ctx.sun().rotation(), spin_before);

        ctx.focus_body(BodyId::Venus, t0);
        let next = ctx.active_focus().unwrap();
        assert_eq!(next.duration(), Duration::from_millis(250));
        assert_eq!(
            next.target(),
            ctx.body(BodyId::Venus).position() + Vec3::new(0.0, 5.0, 5.0)
        );
    }

    #[test]
    fn test_bodies_indexed_by_id() {
        let ctx = context(1280);
        for id in BodyId::ALL {
            assert_eq!(ctx.body(id).id(), id);
        }
    }

    #[test]
    fn test_tick_syncs_node_transforms() {
        let mut ctx = context(1280);
        ctx.start_loop();
        assert!(ctx.tick().unwrap());

        let earth = ctx.body(BodyId::Earth);
        let node = ctx.scene().get(earth.node()).unwrap();
        assert!(node.transform.translation.abs_diff_eq(earth.position(), 1e-5));
        assert_eq!(ctx.backend().frames_rendered(), 1);
    }

    #[test]
    fn test_first_frame_renders_even_when_stopped() {
        let mut ctx = context(1280);
        let report = ctx.frame(Instant::now()).unwrap();
        assert!(!report.ticked);
        assert!(report.rendered, "initial still frame");

        let report = ctx.frame(Instant::now()).unwrap();
        assert!(!report.rendered, "nothing changed");
    }

    #[test]
    fn test_focus_moves_camera_while_paused() {
        let mut ctx = context(1280);
        let t0 = Instant::now();
        ctx.focus("jupiter", t0).unwrap();
        let report = ctx.frame(t0 + Duration::from_millis(500)).unwrap();
        assert!(report.rendered);
        assert!(!report.ticked);
        assert_eq!(ctx.camera().target, ctx.body(BodyId::Jupiter).position());
    }

    #[test]
    fn test_resize_applies_preset_and_cancels_focus() {
        let mut ctx = context(1280);
        ctx.focus_body(BodyId::Venus, Instant::now());
        ctx.resize(SurfaceSize::new(600, 900, 1.0));

        assert!(ctx.active_focus().is_none());
        assert_eq!(ctx.camera().position, Vec3::new(0.0, 40.0, 60.0));
        assert_eq!(ctx.camera().target, Vec3::ZERO);
        assert!((ctx.camera().aspect_ratio() - 600.0 / 900.0).abs() < 1e-6);
        assert_eq!(ctx.backend().surface_size().width, 600);
    }

    #[test]
    fn test_render_failure_propagates() {
        let mut ctx = context(1280);
        ctx.start_loop();
        ctx.backend_mut().set_fail_renders(true);
        assert!(ctx.frame(Instant::now()).is_err());
    }
}
