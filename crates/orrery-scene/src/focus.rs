//! Eased camera transitions toward a planet.
//!
//! Only one transition is ever in flight. Starting a new one cancels the
//! previous transition, so no two transitions write the camera in one frame.

use std::time::{Duration, Instant};

use glam::Vec3;
use orrery_config::FocusConfig;

use crate::body::BodyId;
use crate::camera::CameraRig;

/// Cubic ease-out: `1 - (1 - t)^3`, with `t` clamped to [0, 1].
pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// Identifies one transition. Stale handles cancel nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FocusHandle(u64);

/// A camera move toward a fixed destination, captured at request time.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusTransition {
    handle: FocusHandle,
    body: BodyId,
    start: Vec3,
    target: Vec3,
    started_at: Instant,
    duration: Duration,
}

impl FocusTransition {
    pub fn handle(&self) -> FocusHandle {
        self.handle
    }

    pub fn body(&self) -> BodyId {
        self.body
    }

    /// Camera position when the transition began.
    pub fn start(&self) -> Vec3 {
        self.start
    }

    /// Camera destination.
    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Elapsed fraction of the duration, clamped to [0, 1].
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0) as f32
    }

    /// Camera position at `progress`.
    pub fn position_at(&self, progress: f32) -> Vec3 {
        self.start.lerp(self.target, ease_out_cubic(progress))
    }
}

/// Result of stepping the active transition for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusStep {
    pub handle: FocusHandle,
    pub body: BodyId,
    pub progress: f32,
    pub finished: bool,
}

/// Owns the in-flight focus transition, if any.
#[derive(Debug, Clone)]
pub struct CameraFocusController {
    active: Option<FocusTransition>,
    next_handle: u64,
    offset: Vec3,
    duration: Duration,
}

impl CameraFocusController {
    pub fn new(offset: Vec3, duration: Duration) -> Self {
        Self {
            active: None,
            next_handle: 0,
            offset,
            duration,
        }
    }

    pub fn from_config(config: &FocusConfig) -> Self {
        Self::new(
            Vec3::from_array(config.offset),
            Duration::from_millis(config.duration_ms),
        )
    }

    /// Offset added to the body position to get the camera destination.
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Change offset and duration for transitions started from now on.
    pub fn retime(&mut self, config: &FocusConfig) {
        self.offset = Vec3::from_array(config.offset);
        self.duration = Duration::from_millis(config.duration_ms);
    }

    /// Start moving from `camera_position` toward `body_position + offset`,
    /// replacing any transition already running.
    pub fn begin(
        &mut self,
        body: BodyId,
        body_position: Vec3,
        camera_position: Vec3,
        now: Instant,
    ) -> FocusHandle {
        if let Some(previous) = self.active.take() {
            tracing::debug!(from = %previous.body, to = %body, "replacing focus transition");
        }

        let handle = FocusHandle(self.next_handle);
        self.next_handle += 1;
        self.active = Some(FocusTransition {
            handle,
            body,
            start: camera_position,
            target: body_position + self.offset,
            started_at: now,
            duration: self.duration,
        });
        handle
    }

    pub fn active(&self) -> Option<&FocusTransition> {
        self.active.as_ref()
    }

    pub fn is_active(&self, handle: FocusHandle) -> bool {
        self.active.as_ref().is_some_and(|t| t.handle == handle)
    }

    /// Cancel the transition identified by `handle`. Returns `false` if it
    /// already finished or was replaced.
    pub fn cancel(&mut self, handle: FocusHandle) -> bool {
        if self.is_active(handle) {
            self.active = None;
            true
        } else {
            false
        }
    }

    /// Cancel whatever is running.
    pub fn cancel_active(&mut self) -> Option<FocusHandle> {
        self.active.take().map(|t| t.handle)
    }

    /// Move the camera for this frame and re-aim it at the body's current
    /// position. The transition ends once progress reaches 1.
    pub fn step<F>(&mut self, now: Instant, camera: &mut CameraRig, body_position: F) -> Option<FocusStep>
    where
        F: Fn(BodyId) -> Vec3,
    {
        let transition = self.active.as_ref()?;
        let progress = transition.progress(now);
        camera.place(transition.position_at(progress), body_position(transition.body));

        let step = FocusStep {
            handle: transition.handle,
            body: transition.body,
            progress,
            finished: progress >= 1.0,
        };
        if step.finished {
            tracing::debug!(body = %step.body, "focus transition complete");
            self.active = None;
        }
        Some(step)
    }
}

impl Default for CameraFocusController {
    fn default() -> Self {
        Self::from_config(&FocusConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_at(position: Vec3) -> CameraRig {
        let mut rig = CameraRig::new(75.0, 1.0, 0.1, 1000.0);
        rig.place(position, Vec3::ZERO);
        rig
    }

    #[test]
    fn test_ease_endpoints_and_midpoint() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-6);
        assert_eq!(ease_out_cubic(-1.0), 0.0, "clamped below");
        assert_eq!(ease_out_cubic(3.0), 1.0, "clamped above");
    }

    #[test]
    fn test_ease_is_monotonic() {
        let mut last = 0.0;
        for i in 1..=100 {
            let eased = ease_out_cubic(i as f32 / 100.0);
            assert!(eased >= last, "ease went backwards at step {i}");
            last = eased;
        }
    }

    #[test]
    fn test_step_follows_curve() {
        let t0 = Instant::now();
        let start = Vec3::new(0.0, 50.0, 80.0);
        let mars = Vec3::new(30.0, 0.0, 0.0);
        let mut controller = CameraFocusController::default();
        let mut camera = camera_at(start);
        controller.begin(BodyId::Mars, mars, start, t0);

        let step = controller.step(t0, &mut camera, |_| mars).unwrap();
        assert_eq!(step.progress, 0.0);
        assert_eq!(camera.position, start);
        assert_eq!(camera.target, mars, "camera aims at the body from the first step");

        let target = mars + Vec3::new(0.0, 10.0, 20.0);
        let step = controller
            .step(t0 + Duration::from_millis(250), &mut camera, |_| mars)
            .unwrap();
        assert!((step.progress - 0.25).abs() < 1e-6);
        let expected = start.lerp(target, 1.0 - 0.75f32.powi(3));
        assert!(camera.position.abs_diff_eq(expected, 1e-4));
        assert!(!step.finished);

        let step = controller
            .step(t0 + Duration::from_millis(1000), &mut camera, |_| mars)
            .unwrap();
        assert!(step.finished);
        assert!(camera.position.abs_diff_eq(target, 1e-4));
        assert!(controller.active().is_none());
    }

    #[test]
    fn test_step_tracks_moving_body() {
        let t0 = Instant::now();
        let mut controller = CameraFocusController::default();
        let mut camera = camera_at(Vec3::new(0.0, 50.0, 80.0));
        controller.begin(BodyId::Earth, Vec3::new(25.0, 0.0, 0.0), camera.position, t0);

        let moved = Vec3::new(0.0, 0.0, 25.0);
        controller.step(t0 + Duration::from_millis(500), &mut camera, |_| moved);
        assert_eq!(camera.target, moved);
        assert!(
            controller
                .active()
                .unwrap()
                .target()
                .abs_diff_eq(Vec3::new(25.0, 10.0, 20.0), 1e-6),
            "destination stays fixed at request time"
        );
    }

    #[test]
    fn test_new_focus_cancels_previous() {
        let t0 = Instant::now();
        let mut controller = CameraFocusController::default();
        let first = controller.begin(BodyId::Venus, Vec3::X * 20.0, Vec3::ZERO, t0);
        let second = controller.begin(BodyId::Saturn, Vec3::X * 50.0, Vec3::ZERO, t0);

        assert_ne!(first, second);
        assert!(!controller.is_active(first));
        assert!(controller.is_active(second));
        assert!(!controller.cancel(first), "stale handle cancels nothing");
        assert_eq!(controller.active().unwrap().body(), BodyId::Saturn);
        assert!(controller.cancel(second));
        assert!(controller.active().is_none());
    }

    #[test]
    fn test_step_without_transition_leaves_camera() {
        let mut controller = CameraFocusController::default();
        let mut camera = camera_at(Vec3::new(1.0, 2.0, 3.0));
        let before = camera.clone();
        assert!(controller.step(Instant::now(), &mut camera, |_| Vec3::ZERO).is_none());
        assert_eq!(camera, before);
    }

    #[test]
    fn test_clock_before_start_reads_zero_progress() {
        let t0 = Instant::now() + Duration::from_secs(1);
        let mut controller = CameraFocusController::default();
        controller.begin(BodyId::Mars, Vec3::ZERO, Vec3::ONE, t0);
        assert_eq!(controller.active().unwrap().progress(Instant::now()), 0.0);
    }
}
