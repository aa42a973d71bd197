//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Rendering settings.
    pub render: RenderConfig,
    /// Scene construction settings.
    pub scene: SceneConfig,
    /// Per-frame animation increments.
    pub animation: AnimationConfig,
    /// Camera focus transition settings.
    pub focus: FocusConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Start in fullscreen mode.
    pub fullscreen: bool,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Window title.
    pub title: String,
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Background clear color as `0xRRGGBB`.
    pub clear_color: u32,
    /// Width and height segment count for planet and sun spheres.
    pub sphere_segments: u32,
    /// Segment count for orbital path rings.
    pub ring_segments: u32,
}

/// Scene construction configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for initial orbital angles, starfield, and textures.
    /// `None` picks a time-based seed at startup.
    pub seed: Option<u64>,
    /// Number of starfield points.
    pub star_count: u32,
    /// Half-extent of the starfield cube in scene units.
    pub star_extent: f32,
    /// Starfield point size in pixels.
    pub star_size: f32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Near clip plane.
    pub near: f32,
    /// Far clip plane.
    pub far: f32,
    /// Logical viewport widths below this use the mobile camera preset.
    pub mobile_breakpoint: f64,
    /// Camera position used on wide viewports.
    pub desktop_camera: [f32; 3],
    /// Camera position used on narrow viewports.
    pub mobile_camera: [f32; 3],
}

/// Per-tick rotation increments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    /// Sun self-rotation per tick in radians.
    pub sun_spin: f32,
    /// Planet self-rotation per tick in radians.
    pub planet_spin: f32,
}

/// Camera focus transition configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FocusConfig {
    /// Transition length in milliseconds.
    pub duration_ms: u64,
    /// Offset from the focused body to the camera's destination.
    pub offset: [f32; 3],
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
            title: "Solar System Explorer".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: 0x000011,
            sphere_segments: 32,
            ring_segments: 64,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: None,
            star_count: 2000,
            star_extent: 1000.0,
            star_size: 2.0,
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            mobile_breakpoint: 768.0,
            desktop_camera: [0.0, 50.0, 80.0],
            mobile_camera: [0.0, 40.0, 60.0],
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            sun_spin: 0.005,
            planet_spin: 0.01,
        }
    }
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            duration_ms: 1000,
            offset: [0.0, 10.0, 20.0],
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        new_config.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Reject values that would produce a degenerate camera or scene.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scene = &self.scene;
        if !(scene.near > 0.0 && scene.near < scene.far) {
            return Err(ConfigError::InvalidValue {
                field: "scene.near",
                reason: format!("must satisfy 0 < near < far, got {} / {}", scene.near, scene.far),
            });
        }
        if !(scene.fov_degrees > 0.0 && scene.fov_degrees < 180.0) {
            return Err(ConfigError::InvalidValue {
                field: "scene.fov_degrees",
                reason: format!("must be in (0, 180), got {}", scene.fov_degrees),
            });
        }
        if scene.star_extent < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "scene.star_extent",
                reason: format!("must be non-negative, got {}", scene.star_extent),
            });
        }
        if self.render.sphere_segments < 3 || self.render.ring_segments < 3 {
            return Err(ConfigError::InvalidValue {
                field: "render.sphere_segments",
                reason: "sphere and ring segment counts must be at least 3".to_string(),
            });
        }
        if self.focus.duration_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "focus.duration_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
