//! CPU-side mesh generation for spheres, orbit rings, and point clouds.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

/// A vertex with position, normal, and texture coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// How the vertices are assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Indexed triangle list.
    Triangles,
    /// One point per vertex; indices are unused.
    Points,
}

/// Geometry ready for upload to a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
    pub topology: Topology,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Latitude/longitude sphere centred on the origin.
///
/// Produces `(width_segments + 1) * (height_segments + 1)` vertices with a seam
/// column so the texture wraps once around the equator. Pole rows emit a single
/// triangle per segment.
pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let row_len = width_segments + 1;

    let mut vertices = Vec::with_capacity((row_len * (height_segments + 1)) as usize);
    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let polar = v * PI;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let azimuth = u * TAU;
            let normal = Vec3::new(
                -azimuth.cos() * polar.sin(),
                polar.cos(),
                azimuth.sin() * polar.sin(),
            );
            vertices.push(MeshVertex {
                position: (normal * radius).to_array(),
                normal: normal.to_array(),
                uv: [u, v],
            });
        }
    }

    let mut indices = Vec::with_capacity((width_segments * height_segments * 6) as usize);
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row_len + ix + 1;
            let b = iy * row_len + ix;
            let c = (iy + 1) * row_len + ix;
            let d = (iy + 1) * row_len + ix + 1;
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    MeshData {
        vertices,
        indices,
        topology: Topology::Triangles,
    }
}

/// Flat annulus in the XZ plane, facing +Y.
pub fn ring(inner_radius: f32, outer_radius: f32, segments: u32) -> MeshData {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity(((segments + 1) * 2) as usize);
    for i in 0..=segments {
        let theta = i as f32 / segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        for (radius, v) in [(inner_radius, 0.0), (outer_radius, 1.0)] {
            vertices.push(MeshVertex {
                position: [cos * radius, 0.0, sin * radius],
                normal: [0.0, 1.0, 0.0],
                uv: [i as f32 / segments as f32, v],
            });
        }
    }

    let mut indices = Vec::with_capacity((segments * 6) as usize);
    for i in 0..segments {
        let inner = i * 2;
        let outer = inner + 1;
        let next_inner = inner + 2;
        let next_outer = inner + 3;
        indices.extend_from_slice(&[inner, next_inner, outer, outer, next_inner, next_outer]);
    }

    MeshData {
        vertices,
        indices,
        topology: Topology::Triangles,
    }
}

/// Point cloud, one vertex per position.
pub fn points(positions: &[Vec3]) -> MeshData {
    MeshData {
        vertices: positions
            .iter()
            .map(|p| MeshVertex {
                position: p.to_array(),
                normal: [0.0, 1.0, 0.0],
                uv: [0.0, 0.0],
            })
            .collect(),
        indices: Vec::new(),
        topology: Topology::Points,
    }
}
