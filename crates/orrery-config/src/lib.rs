//! Configuration system for Orrery.
//!
//! Provides runtime-configurable settings that persist to disk as RON files.
//! Supports CLI overrides via clap, change detection for reloading the file
//! while running, and forward/backward compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    AnimationConfig, Config, DebugConfig, FocusConfig, RenderConfig, SceneConfig, WindowConfig,
};
pub use error::ConfigError;
