//! Window creation and event handling via winit.
//!
//! Provides [`AppState`] which implements winit's [`ApplicationHandler`] trait,
//! and [`run_with_config`] to start the event loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use orrery_config::Config;
use orrery_render::{RenderContextError, RenderError, SurfaceError, SurfaceWrapper, WgpuBackend};
use orrery_scene::{SceneBuilder, SceneContext, SceneError};
use tracing::{debug, error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::controls::{ControlPanel, PanelCommand, PanelKey};

/// Failures while bringing up the renderer and scene.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("GPU initialization failed: {0}")]
    Gpu(#[from] RenderContextError),

    #[error("scene initialization failed: {0}")]
    Scene(#[from] SceneError),
}

/// Build [`WindowAttributes`] from the window section of the config.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
        .with_fullscreen(
            config
                .window
                .fullscreen
                .then_some(Fullscreen::Borderless(None)),
        )
}

/// What the host does after a frame error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameErrorAction {
    /// Drop this frame and try again next redraw.
    Skip,
    /// The surface is gone; shut down.
    Exit,
}

/// Classify a frame error. Only a lost surface or exhausted GPU memory is fatal.
pub fn frame_error_action(err: &SceneError) -> FrameErrorAction {
    match err.backend_error::<RenderError>() {
        Some(render) if render.is_fatal() => FrameErrorAction::Exit,
        _ => FrameErrorAction::Skip,
    }
}

/// Application state: window, surface tracking, live scene, and controls.
pub struct AppState {
    config: Config,
    /// Where `config.ron` lives; `None` disables reloading.
    config_dir: Option<PathBuf>,
    window: Option<Arc<Window>>,
    surface: Option<SurfaceWrapper>,
    scene: Option<SceneContext<WgpuBackend>>,
    panel: ControlPanel,
}

impl AppState {
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            config_dir: None,
            window: None,
            surface: None,
            scene: None,
            panel: ControlPanel::new(),
        }
    }

    /// Reload `config.ron` from this directory when the window regains focus.
    pub fn with_config_dir(mut self, dir: PathBuf) -> Self {
        self.config_dir = Some(dir);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Re-read `config.ron` and apply the sections that can change live:
    /// the window title, spin rates, and focus timing. Everything else keeps
    /// its startup value, CLI overrides included. Returns whether anything
    /// was applied.
    pub fn reload_config(&mut self) -> bool {
        let Some(dir) = self.config_dir.as_deref() else {
            return false;
        };
        let reloaded = match self.config.reload(dir) {
            Ok(Some(reloaded)) => reloaded,
            Ok(None) => return false,
            Err(e) => {
                warn!("Keeping current config: {e}");
                return false;
            }
        };

        let live_changed = reloaded.animation != self.config.animation
            || reloaded.focus != self.config.focus
            || reloaded.window.title != self.config.window.title;
        if reloaded.window != self.config.window
            || reloaded.render != self.config.render
            || reloaded.scene != self.config.scene
        {
            debug!("Window, render, and scene settings apply on next launch");
        }
        if !live_changed {
            return false;
        }

        self.config.animation = reloaded.animation;
        self.config.focus = reloaded.focus;
        self.config.window.title = reloaded.window.title;
        if let Some(ctx) = self.scene.as_mut() {
            ctx.retune(&self.config.animation, &self.config.focus);
        }
        self.refresh_title();
        true
    }

    fn start_scene(
        &self,
        window: Arc<Window>,
        surface: &SurfaceWrapper,
    ) -> Result<SceneContext<WgpuBackend>, StartupError> {
        let backend = WgpuBackend::new(window, self.config.window.vsync)?;
        let mut ctx = SceneBuilder::new(&self.config).initialize(backend, surface.size())?;
        ctx.start_loop();
        Ok(ctx)
    }

    fn handle_key(&mut self, event: &KeyEvent, event_loop: &ActiveEventLoop) {
        if event.state != ElementState::Pressed {
            return;
        }
        let Some(key) = PanelKey::from_winit(&event.logical_key) else {
            return;
        };
        if event.repeat && !key.repeats() {
            return;
        }
        if let Some(command) = self.panel.handle(key) {
            self.apply(command, event_loop);
        }
    }

    fn apply(&mut self, command: PanelCommand, event_loop: &ActiveEventLoop) {
        if command == PanelCommand::Quit {
            info!("Quit requested");
            event_loop.exit();
            return;
        }
        let Some(ctx) = self.scene.as_mut() else {
            return;
        };

        match command {
            PanelCommand::Focus(id) => {
                ctx.focus_body(id, Instant::now());
            }
            PanelCommand::TogglePause => {
                if ctx.is_running() {
                    ctx.pause();
                    info!("Animation paused");
                } else {
                    ctx.resume();
                    info!("Animation resumed");
                }
            }
            PanelCommand::SetSpeeds(mapping) => {
                let update = ctx.set_speeds(&mapping);
                debug!(applied = update.applied, "speeds updated");
            }
            PanelCommand::ClearSelection => debug!("selection cleared"),
            PanelCommand::Quit => {}
        }
        self.refresh_title();
    }

    fn refresh_title(&self) {
        if let Some(window) = &self.window {
            window.set_title(&self.panel.title(&self.config.window.title));
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(ctx) = self.scene.as_mut() else {
            return;
        };
        if let Err(e) = ctx.frame(Instant::now()) {
            match frame_error_action(&e) {
                FrameErrorAction::Exit => {
                    error!("Rendering cannot continue: {e}");
                    event_loop.exit();
                    return;
                }
                FrameErrorAction::Skip => {
                    let timeout = e.backend_error::<RenderError>().is_some_and(|r| {
                        matches!(r, RenderError::Surface(SurfaceError::Timeout))
                    });
                    if timeout {
                        debug!("Surface timeout, skipping frame");
                    } else {
                        warn!("Frame skipped: {e}");
                    }
                }
            }
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = window_attributes_from_config(&self.config);
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let scale_factor = window.scale_factor();
        let inner_size = window.inner_size();
        let surface = SurfaceWrapper::new(inner_size.width, inner_size.height, scale_factor);
        info!(
            "Surface wrapper initialized: {}x{} (scale: {:.2})",
            inner_size.width, inner_size.height, scale_factor
        );

        match self.start_scene(window.clone(), &surface) {
            Ok(ctx) => {
                info!(seed = ctx.seed(), "Scene ready");
                self.scene = Some(ctx);
            }
            Err(e) => {
                error!("{e}");
                event_loop.exit();
                return;
            }
        }

        window.request_redraw();
        self.surface = Some(surface);
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                let Some(surface) = self.surface.as_mut() else {
                    return;
                };
                if let Some(new_size) = surface.handle_resize(size.width, size.height) {
                    if let Some(ctx) = self.scene.as_mut() {
                        ctx.resize(new_size);
                    }
                    info!(
                        "Resized to {}x{} (logical width {:.0})",
                        new_size.width,
                        new_size.height,
                        new_size.logical_width()
                    );
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let (Some(surface), Some(window)) = (self.surface.as_mut(), &self.window) else {
                    return;
                };
                let inner = window.inner_size();
                let new_size =
                    surface.handle_scale_factor_changed(scale_factor, inner.width, inner.height);
                if let Some(ctx) = self.scene.as_mut() {
                    ctx.resize(new_size);
                }
                info!("Scale factor changed to {scale_factor:.2}");
            }
            WindowEvent::Focused(true) => {
                if self.reload_config() {
                    info!("Config changes applied");
                }
            }
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(&event, event_loop),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

/// Open the window and run until it is closed.
#[instrument(skip(config))]
pub fn run_with_config(config: Config, config_dir: PathBuf) {
    let event_loop = EventLoop::new().expect("Failed to create event loop");
    let mut app = AppState::with_config(config).with_config_dir(config_dir);
    event_loop.run_app(&mut app).expect("Event loop failed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_scene::HeadlessError;

    #[test]
    fn test_window_attributes_from_config() {
        let mut config = Config::default();
        config.window.width = 800;
        config.window.height = 600;
        let attrs = window_attributes_from_config(&config);
        assert_eq!(attrs.title, "Solar System Explorer");
        assert!(attrs.fullscreen.is_none());
        match attrs.inner_size {
            Some(winit::dpi::Size::Logical(size)) => {
                assert_eq!(size.width, 800.0);
                assert_eq!(size.height, 600.0);
            }
            other => panic!("expected logical size, got {other:?}"),
        }
    }

    #[test]
    fn test_fullscreen_config_requests_borderless() {
        let mut config = Config::default();
        config.window.fullscreen = true;
        let attrs = window_attributes_from_config(&config);
        assert_eq!(attrs.fullscreen, Some(Fullscreen::Borderless(None)));
    }

    #[test]
    fn test_reload_applies_live_sections_only() {
        let dir = tempfile::tempdir().unwrap();
        Config::default().save(dir.path()).unwrap();

        let mut startup = Config::default();
        startup.scene.seed = Some(42);
        let mut app = AppState::with_config(startup).with_config_dir(dir.path().to_path_buf());

        let mut edited = Config::default();
        edited.animation.planet_spin = 0.03;
        edited.focus.duration_ms = 400;
        edited.window.width = 1920;
        edited.save(dir.path()).unwrap();

        assert!(app.reload_config());
        assert_eq!(app.config().animation.planet_spin, 0.03);
        assert_eq!(app.config().focus.duration_ms, 400);
        assert_eq!(app.config().window.width, 1280, "size needs a restart");
        assert_eq!(app.config().scene.seed, Some(42), "CLI seed survives");

        assert!(!app.reload_config(), "nothing new on disk");
    }

    #[test]
    fn test_reload_keeps_config_on_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "(animation: (sun_spin: ").unwrap();
        let mut app =
            AppState::with_config(Config::default()).with_config_dir(dir.path().to_path_buf());

        assert!(!app.reload_config());
        assert_eq!(app.config(), &Config::default());
    }

    #[test]
    fn test_reload_without_dir_is_noop() {
        let mut app = AppState::with_config(Config::default());
        assert!(!app.reload_config());
    }

    #[test]
    fn test_lost_surface_exits() {
        let err = SceneError::backend(RenderError::Surface(SurfaceError::Lost));
        assert_eq!(frame_error_action(&err), FrameErrorAction::Exit);
    }

    #[test]
    fn test_timeout_skips() {
        let err = SceneError::backend(RenderError::Surface(SurfaceError::Timeout));
        assert_eq!(frame_error_action(&err), FrameErrorAction::Skip);
    }

    #[test]
    fn test_foreign_backend_error_skips() {
        let err = SceneError::backend(HeadlessError::InjectedFailure);
        assert_eq!(frame_error_action(&err), FrameErrorAction::Skip);
    }
}
