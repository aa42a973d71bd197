//! A flat scene graph: nodes referencing backend meshes, plus lights.

use glam::{Quat, Vec3};

use crate::backend::{MeshHandle, TextureHandle};
use crate::color::Rgb;

/// Handle to a node in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// How a node's surface is shaded.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Unlit flat color.
    Basic {
        color: Rgb,
        opacity: f32,
        double_sided: bool,
    },
    /// Lit with ambient, diffuse, and Blinn-Phong specular terms.
    Phong {
        color: Rgb,
        emissive: Rgb,
        specular: Rgb,
        shininess: f32,
        texture: Option<TextureHandle>,
    },
    /// Screen-space points of a fixed pixel size.
    Points { color: Rgb, size: f32 },
}

impl Material {
    /// Opaque unlit color.
    pub fn basic(color: Rgb) -> Self {
        Material::Basic {
            color,
            opacity: 1.0,
            double_sided: false,
        }
    }

    /// Needs blending and must be drawn after opaque geometry.
    pub fn is_transparent(&self) -> bool {
        matches!(self, Material::Basic { opacity, .. } if *opacity < 1.0)
    }
}

/// Position and orientation of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn to_matrix(&self) -> glam::Mat4 {
        glam::Mat4::from_rotation_translation(self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A drawable entry in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub mesh: MeshHandle,
    pub material: Material,
    pub transform: Transform,
}

/// Scene lighting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient {
        color: Rgb,
        intensity: f32,
    },
    Point {
        color: Rgb,
        intensity: f32,
        /// Distance at which the light's contribution reaches zero.
        range: f32,
        position: Vec3,
    },
}

/// Nodes and lights handed to [`RenderBackend::render`](crate::RenderBackend::render).
///
/// Removed slots are reused, so a [`NodeId`] is only valid until its node is removed.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: Vec<Option<Node>>,
    free: Vec<u32>,
    lights: Vec<Light>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: Node) -> NodeId {
        if let Some(slot) = self.free.pop() {
            self.nodes[slot as usize] = Some(node);
            NodeId(slot)
        } else {
            self.nodes.push(Some(node));
            NodeId(self.nodes.len() as u32 - 1)
        }
    }

    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        let node = self.nodes.get_mut(id.0 as usize)?.take()?;
        self.free.push(id.0);
        Some(node)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)?.as_mut()
    }

    /// Set translation and Y-axis spin of a node. Missing nodes are ignored.
    pub fn set_pose(&mut self, id: NodeId, translation: Vec3, spin_y: f32) {
        if let Some(node) = self.get_mut(id) {
            node.transform.translation = translation;
            node.transform.rotation = Quat::from_rotation_y(spin_y);
        }
    }

    /// Live nodes in insertion-slot order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|n| (NodeId(i as u32), n)))
    }

    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }
}
