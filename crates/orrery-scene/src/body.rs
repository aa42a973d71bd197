//! The eight fixed planets, their orbital parameters, and per-body animation state.

use std::fmt;
use std::str::FromStr;

use glam::Vec3;

use crate::color::Rgb;
use crate::error::SceneError;
use crate::scene::NodeId;

/// Identifier of one of the eight planets, in orbital order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BodyId {
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

impl BodyId {
    /// Every planet, innermost first. This is the tick order.
    pub const ALL: [BodyId; 8] = [
        BodyId::Mercury,
        BodyId::Venus,
        BodyId::Earth,
        BodyId::Mars,
        BodyId::Jupiter,
        BodyId::Saturn,
        BodyId::Uranus,
        BodyId::Neptune,
    ];

    /// Lowercase identifier used by controls and speed mappings.
    pub const fn name(self) -> &'static str {
        match self {
            BodyId::Mercury => "mercury",
            BodyId::Venus => "venus",
            BodyId::Earth => "earth",
            BodyId::Mars => "mars",
            BodyId::Jupiter => "jupiter",
            BodyId::Saturn => "saturn",
            BodyId::Uranus => "uranus",
            BodyId::Neptune => "neptune",
        }
    }

    /// Display label.
    pub const fn label(self) -> &'static str {
        match self {
            BodyId::Mercury => "Mercury",
            BodyId::Venus => "Venus",
            BodyId::Earth => "Earth",
            BodyId::Mars => "Mars",
            BodyId::Jupiter => "Jupiter",
            BodyId::Saturn => "Saturn",
            BodyId::Uranus => "Uranus",
            BodyId::Neptune => "Neptune",
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Look up a body by its lowercase identifier. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }

    /// Static orbital parameters for this body.
    pub const fn spec(self) -> &'static PlanetSpec {
        &PLANETS[self as usize]
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BodyId {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| SceneError::UnknownBody(s.to_string()))
    }
}

/// Immutable orbital and visual parameters of a planet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetSpec {
    pub id: BodyId,
    /// Orbit radius in scene units.
    pub distance: f32,
    /// Sphere radius in scene units.
    pub radius: f32,
    pub color: Rgb,
    /// Radians per tick at multiplier 1.
    pub speed: f32,
}

const fn planet(id: BodyId, distance: f32, radius: f32, color: u32, speed: f32) -> PlanetSpec {
    PlanetSpec {
        id,
        distance,
        radius,
        color: Rgb::from_hex(color),
        speed,
    }
}

/// The fixed planet table, indexed by [`BodyId::index`].
pub const PLANETS: [PlanetSpec; 8] = [
    planet(BodyId::Mercury, 15.0, 0.8, 0x8C7853, 0.04),
    planet(BodyId::Venus, 20.0, 1.2, 0xFFC649, 0.03),
    planet(BodyId::Earth, 25.0, 1.3, 0x6B93D6, 0.02),
    planet(BodyId::Mars, 30.0, 1.0, 0xCD5C5C, 0.015),
    planet(BodyId::Jupiter, 40.0, 3.0, 0xD8CA9D, 0.01),
    planet(BodyId::Saturn, 50.0, 2.5, 0xFAD5A5, 0.008),
    planet(BodyId::Uranus, 60.0, 2.0, 0x4FD0E7, 0.006),
    planet(BodyId::Neptune, 70.0, 1.8, 0x4B70DD, 0.004),
];

/// Sun sphere radius.
pub const SUN_RADIUS: f32 = 5.0;
/// Sun color, rendered unlit.
pub const SUN_COLOR: Rgb = Rgb::from_hex(0xFFD700);

/// Position on the XZ orbital circle.
pub fn orbital_position(distance: f32, angle: f64) -> Vec3 {
    Vec3::new(
        (angle.cos() * distance as f64) as f32,
        0.0,
        (angle.sin() * distance as f64) as f32,
    )
}

/// A planet in the live scene.
///
/// Angles are kept in `f64` and never normalized so the orbital angle stays an
/// exact running sum of per-tick advances.
#[derive(Debug, Clone)]
pub struct CelestialBody {
    spec: PlanetSpec,
    angle: f64,
    rotation: f64,
    node: NodeId,
}

impl CelestialBody {
    pub fn new(spec: PlanetSpec, initial_angle: f64, node: NodeId) -> Self {
        Self {
            spec,
            angle: initial_angle,
            rotation: 0.0,
            node,
        }
    }

    pub fn id(&self) -> BodyId {
        self.spec.id
    }

    pub fn spec(&self) -> &PlanetSpec {
        &self.spec
    }

    /// Current orbital angle in radians.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Accumulated self-rotation about Y in radians.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Current world position, always on the orbit circle.
    pub fn position(&self) -> Vec3 {
        orbital_position(self.spec.distance, self.angle)
    }

    /// Advance one tick: the orbit by `speed * multiplier`, the spin by `spin`.
    /// Returns the orbital angle delta.
    pub(crate) fn advance(&mut self, multiplier: f32, spin: f32) -> f64 {
        let delta = self.spec.speed as f64 * multiplier as f64;
        self.angle += delta;
        self.rotation += spin as f64;
        delta
    }
}

/// The sun: fixed at the origin, spinning in place.
#[derive(Debug, Clone)]
pub struct Sun {
    rotation: f64,
    node: NodeId,
}

impl Sun {
    pub fn new(node: NodeId) -> Self {
        Self {
            rotation: 0.0,
            node,
        }
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub(crate) fn spin(&mut self, amount: f32) {
        self.rotation += amount as f64;
    }
}
