//! Solar system scene model for Orrery.
//!
//! Builds the sun, eight planets, orbit rings, lights, and starfield on top of
//! a [`RenderBackend`], then animates them one display frame at a time through
//! a [`SceneContext`]. Orbital speeds are adjusted through a
//! [`SpeedRegistry`]; the camera glides between planets via the
//! [`CameraFocusController`].

pub mod animation;
pub mod backend;
pub mod body;
pub mod builder;
pub mod camera;
pub mod color;
pub mod context;
mod error;
pub mod focus;
pub mod geometry;
pub mod headless;
pub mod scene;
pub mod speed;
pub mod starfield;
pub mod texture;

pub use animation::{AnimationLoop, LoopState};
pub use backend::{MeshHandle, RenderBackend, SurfaceSize, TextureHandle};
pub use body::{BodyId, CelestialBody, PLANETS, PlanetSpec, Sun};
pub use builder::SceneBuilder;
pub use camera::{CameraPresets, CameraRig};
pub use color::Rgb;
pub use context::{FrameReport, SceneContext};
pub use error::SceneError;
pub use focus::{CameraFocusController, FocusHandle, FocusStep, FocusTransition, ease_out_cubic};
pub use geometry::{MeshData, MeshVertex, Topology};
pub use headless::{HeadlessBackend, HeadlessError};
pub use scene::{Light, Material, Node, NodeId, Scene, Transform};
pub use speed::{SPEED_MAX, SPEED_MIN, SPEED_STEP, SpeedRegistry, SpeedUpdate};
pub use texture::{SurfaceTexture, TextureSynthesizer};
