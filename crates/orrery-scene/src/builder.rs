//! Builds the initial solar system and hands back a [`SceneContext`].

use std::f64::consts::TAU;
use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec3;
use orrery_config::Config;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::animation::AnimationLoop;
use crate::backend::{RenderBackend, SurfaceSize};
use crate::body::{CelestialBody, PLANETS, SUN_COLOR, SUN_RADIUS, Sun, orbital_position};
use crate::camera::{CameraPresets, CameraRig};
use crate::color::Rgb;
use crate::context::{SceneContext, SceneParts};
use crate::error::SceneError;
use crate::focus::CameraFocusController;
use crate::geometry;
use crate::scene::{Light, Material, Node, Scene, Transform};
use crate::speed::SpeedRegistry;
use crate::starfield::StarfieldGenerator;
use crate::texture::TextureSynthesizer;

pub const AMBIENT_COLOR: Rgb = Rgb::from_hex(0x404040);
pub const AMBIENT_INTENSITY: f32 = 0.4;
pub const SUN_LIGHT_INTENSITY: f32 = 2.0;
pub const SUN_LIGHT_RANGE: f32 = 1000.0;
pub const ORBIT_COLOR: Rgb = Rgb::from_hex(0x333333);
pub const ORBIT_OPACITY: f32 = 0.1;
/// Half-width of an orbit ring around the orbital distance.
pub const ORBIT_HALF_WIDTH: f32 = 0.1;
pub const PLANET_SPECULAR: Rgb = Rgb::from_hex(0x222222);
pub const PLANET_SHININESS: f32 = 30.0;
/// Fraction of the base color a planet emits on its own.
pub const PLANET_EMISSIVE_SCALE: f32 = 0.1;

/// Independent random streams derived from one scene seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SeedStreams {
    angles: u64,
    stars: u64,
    textures: u64,
}

impl SeedStreams {
    fn derive(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self {
            angles: rng.random(),
            stars: rng.random(),
            textures: rng.random(),
        }
    }
}

/// The configured seed, or one taken from the wall clock.
pub fn resolve_seed(configured: Option<u64>) -> u64 {
    configured.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    })
}

/// Constructs the sun, planets, orbit rings, lights, and starfield.
pub struct SceneBuilder<'a> {
    config: &'a Config,
}

impl<'a> SceneBuilder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Build the scene on `backend`, bound to a surface of size `surface`.
    ///
    /// The animation loop starts stopped; call
    /// [`SceneContext::start_loop`] to begin ticking.
    pub fn initialize<B: RenderBackend>(
        &self,
        mut backend: B,
        surface: SurfaceSize,
    ) -> Result<SceneContext<B>, SceneError> {
        let scene_config = &self.config.scene;
        let render_config = &self.config.render;
        let seed = resolve_seed(scene_config.seed);
        let streams = SeedStreams::derive(seed);

        if backend.surface_size() != surface {
            backend.resize(surface);
        }
        backend.set_clear_color(Rgb::from_hex(render_config.clear_color));

        let mut scene = Scene::new();
        scene.add_light(Light::Ambient {
            color: AMBIENT_COLOR,
            intensity: AMBIENT_INTENSITY,
        });
        scene.add_light(Light::Point {
            color: Rgb::WHITE,
            intensity: SUN_LIGHT_INTENSITY,
            range: SUN_LIGHT_RANGE,
            position: Vec3::ZERO,
        });

        let stars = StarfieldGenerator::new(
            streams.stars,
            scene_config.star_count,
            scene_config.star_extent,
        )
        .generate();
        if !stars.is_empty() {
            let mesh = backend
                .create_mesh(&geometry::points(&stars))
                .map_err(SceneError::backend)?;
            scene.add(Node {
                name: "starfield".to_string(),
                mesh,
                material: Material::Points {
                    color: Rgb::WHITE,
                    size: scene_config.star_size,
                },
                transform: Transform::IDENTITY,
            });
        }

        let segments = render_config.sphere_segments;
        let sun_mesh = backend
            .create_mesh(&geometry::uv_sphere(SUN_RADIUS, segments, segments))
            .map_err(SceneError::backend)?;
        let sun = Sun::new(scene.add(Node {
            name: "sun".to_string(),
            mesh: sun_mesh,
            material: Material::basic(SUN_COLOR),
            transform: Transform::IDENTITY,
        }));

        let mut angle_rng = ChaCha8Rng::seed_from_u64(streams.angles);
        let mut textures = TextureSynthesizer::new(streams.textures);
        let mut bodies = Vec::with_capacity(PLANETS.len());

        for spec in PLANETS {
            let name = spec.id.name();
            let sphere = backend
                .create_mesh(&geometry::uv_sphere(spec.radius, segments, segments))
                .map_err(SceneError::backend)?;
            let surface_texture = textures.synthesize(name, spec.color);
            let texture = backend
                .create_texture(&surface_texture.image)
                .map_err(SceneError::backend)?;

            let angle = angle_rng.random::<f64>() * TAU;
            let node = scene.add(Node {
                name: name.to_string(),
                mesh: sphere,
                material: Material::Phong {
                    color: spec.color,
                    emissive: spec.color.scale(PLANET_EMISSIVE_SCALE),
                    specular: PLANET_SPECULAR,
                    shininess: PLANET_SHININESS,
                    texture: Some(texture),
                },
                transform: Transform::from_translation(orbital_position(spec.distance, angle)),
            });
            bodies.push(CelestialBody::new(spec, angle, node));

            let ring = backend
                .create_mesh(&geometry::ring(
                    spec.distance - ORBIT_HALF_WIDTH,
                    spec.distance + ORBIT_HALF_WIDTH,
                    render_config.ring_segments,
                ))
                .map_err(SceneError::backend)?;
            scene.add(Node {
                name: format!("{name}-orbit"),
                mesh: ring,
                material: Material::Basic {
                    color: ORBIT_COLOR,
                    opacity: ORBIT_OPACITY,
                    double_sided: true,
                },
                transform: Transform::IDENTITY,
            });
        }

        let presets = CameraPresets::from_config(scene_config);
        let mut camera = CameraRig::from_config(scene_config, surface.width, surface.height);
        camera.place(presets.position_for_width(surface.logical_width()), Vec3::ZERO);

        tracing::info!(
            seed,
            nodes = scene.len(),
            stars = stars.len(),
            mobile = presets.is_mobile(surface.logical_width()),
            "solar system initialized"
        );

        Ok(SceneContext::from_parts(SceneParts {
            backend,
            scene,
            camera,
            presets,
            sun,
            bodies,
            speeds: SpeedRegistry::new(),
            animation: AnimationLoop::from_config(&self.config.animation),
            focus: CameraFocusController::from_config(&self.config.focus),
            seed,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use crate::headless::{HeadlessBackend, HeadlessError};

    fn seeded_config(seed: u64) -> Config {
        let mut config = Config::default();
        config.scene.seed = Some(seed);
        config
    }

    #[test]
    fn test_seed_streams_differ() {
        let streams = SeedStreams::derive(1);
        assert_ne!(streams.angles, streams.stars);
        assert_ne!(streams.stars, streams.textures);
        assert_eq!(streams, SeedStreams::derive(1));
    }

    #[test]
    fn test_resolve_seed_prefers_configured() {
        assert_eq!(resolve_seed(Some(5)), 5);
    }

    #[test]
    fn test_uploads_every_resource() {
        let config = seeded_config(3);
        let surface = SurfaceSize::new(1280, 720, 1.0);
        let ctx = SceneBuilder::new(&config)
            .initialize(HeadlessBackend::new(surface), surface)
            .unwrap();

        // starfield + sun + 8 spheres + 8 rings
        assert_eq!(ctx.backend().mesh_count(), 18);
        assert_eq!(ctx.backend().texture_count(), 8);
        assert_eq!(ctx.scene().len(), 18);
        assert_eq!(ctx.scene().lights().len(), 2);
        assert_eq!(ctx.backend().clear_color(), Rgb::from_hex(0x000011));
    }

    #[test]
    fn test_each_planet_gets_its_own_texture() {
        let config = seeded_config(3);
        let surface = SurfaceSize::new(1280, 720, 1.0);
        let ctx = SceneBuilder::new(&config)
            .initialize(HeadlessBackend::new(surface), surface)
            .unwrap();

        let mut handles = HashSet::new();
        for body in ctx.bodies() {
            let node = ctx.scene().get(body.node()).unwrap();
            match node.material {
                Material::Phong {
                    texture: Some(handle),
                    ..
                } => assert!(handles.insert(handle), "{} shares a texture", node.name),
                ref other => panic!("{} has no surface texture: {other:?}", node.name),
            }
        }
        assert_eq!(handles.len(), 8);
    }

    #[test]
    fn test_no_stars_skips_starfield() {
        let mut config = seeded_config(3);
        config.scene.star_count = 0;
        let surface = SurfaceSize::new(1280, 720, 1.0);
        let ctx = SceneBuilder::new(&config)
            .initialize(HeadlessBackend::new(surface), surface)
            .unwrap();
        assert_eq!(ctx.scene().len(), 17);
    }

    #[test]
    fn test_backend_resized_to_surface() {
        let config = seeded_config(3);
        let ctx = SceneBuilder::new(&config)
            .initialize(
                HeadlessBackend::new(SurfaceSize::new(10, 10, 1.0)),
                SurfaceSize::new(640, 480, 1.0),
            )
            .unwrap();
        assert_eq!(ctx.backend().surface_size().width, 640);
    }

    #[test]
    fn test_backend_errors_propagate() {
        let config = seeded_config(3);
        let surface = SurfaceSize::new(1280, 720, 1.0);
        let mut backend = HeadlessBackend::new(surface);
        backend.set_fail_uploads(true);

        let err = match SceneBuilder::new(&config).initialize(backend, surface) {
            Ok(_) => panic!("upload failure must abort initialization"),
            Err(err) => err,
        };
        assert_eq!(
            err.backend_error::<HeadlessError>(),
            Some(&HeadlessError::InjectedFailure)
        );
    }
}
