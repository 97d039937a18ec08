//! Recursive sphere tessellation from the tetrahedral seed.
//!
//! Each subdivision level splits every triangle into four, projecting the
//! new edge midpoints back onto the unit sphere. Output is a triangle soup:
//! every triangle contributes three vertices of its own.

use std::sync::Arc;

use glam::Vec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::tetrahedron::{longest_edge, seed_triangles, Triangle, SEED_TRIANGLE_COUNT};
use crate::error::MeshError;

/// Depth cap for edge-length driven subdivision.
pub const MAX_ADAPTIVE_DEPTH: u32 = 10;

/// A unit sphere as a triangle soup with per-vertex normals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SphereMesh {
    /// Vertex positions, three per triangle.
    pub vertices: Vec<Vec3>,
    /// Vertex normals, 1:1 with `vertices`.
    pub normals: Vec<Vec3>,
}

impl SphereMesh {
    fn from_triangles(triangles: &[Triangle]) -> Self {
        let vertices: Vec<Vec3> = triangles.iter().flatten().copied().collect();
        // On the unit sphere the outward normal is the position itself.
        let normals = vertices.clone();
        Self { vertices, normals }
    }

    /// Number of triangles in the soup.
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Number of vertices (three per triangle).
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Positions as tightly packed `x, y, z` floats.
    pub fn position_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Normals as tightly packed `x, y, z` floats.
    pub fn normal_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.normals)
    }

    /// Wraps the mesh for sharing between sphere instances.
    pub fn into_shared(self) -> Arc<SphereMesh> {
        Arc::new(self)
    }
}

/// How far to subdivide the seed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SubdivisionLimit {
    /// Fixed number of levels applied to every triangle.
    Depth(u32),
    /// Subdivide until the longest edge of each triangle is at most this long.
    MaxEdge(f32),
}

/// Configuration for sphere generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IcosphereConfig {
    pub limit: SubdivisionLimit,
}

impl Default for IcosphereConfig {
    fn default() -> Self {
        Self {
            limit: SubdivisionLimit::Depth(5),
        }
    }
}

impl IcosphereConfig {
    /// Creates a configuration with a fixed subdivision depth.
    pub fn with_depth(depth: u32) -> Self {
        Self {
            limit: SubdivisionLimit::Depth(depth),
        }
    }

    /// Generates the sphere described by this configuration.
    pub fn build(&self) -> Result<SphereMesh, MeshError> {
        match self.limit {
            SubdivisionLimit::Depth(depth) => Ok(generate(depth)),
            SubdivisionLimit::MaxEdge(max_edge) => generate_with_max_edge(max_edge),
        }
    }
}

/// Number of triangles produced by `generate(depth)`, or `None` if it
/// does not fit in `usize`.
pub fn triangle_count_for_depth(depth: u32) -> Option<usize> {
    4usize
        .checked_pow(depth)
        .and_then(|n| n.checked_mul(SEED_TRIANGLE_COUNT))
}

/// Generates a unit sphere by subdividing each seed triangle `depth` times.
///
/// Depth grows the output as `4^depth`; values much above 7 are impractical
/// and are left to the caller to avoid. Any depth for which
/// [`triangle_count_for_depth`] returns `None` cannot be generated.
pub fn generate(depth: u32) -> SphereMesh {
    let triangles: Vec<Triangle> = seed_triangles()
        .par_iter()
        .map(|tri| subdivide(*tri, depth))
        .collect::<Vec<_>>()
        .concat();

    log::info!(
        "Icosphere: generated {} triangles at depth {}",
        triangles.len(),
        depth
    );
    SphereMesh::from_triangles(&triangles)
}

/// Generates a unit sphere whose triangles have no edge longer than `max_edge`.
pub fn generate_with_max_edge(max_edge: f32) -> Result<SphereMesh, MeshError> {
    if !max_edge.is_finite() || max_edge <= 0.0 {
        return Err(MeshError::InvalidEdgeLength(max_edge));
    }

    let triangles: Vec<Triangle> = seed_triangles()
        .par_iter()
        .map(|tri| subdivide_to_edge(*tri, max_edge, MAX_ADAPTIVE_DEPTH))
        .collect::<Vec<_>>()
        .concat();

    log::info!(
        "Icosphere: generated {} triangles for max edge {}",
        triangles.len(),
        max_edge
    );
    Ok(SphereMesh::from_triangles(&triangles))
}

/// Midpoint of two unit vectors, projected back onto the unit sphere.
fn sphere_midpoint(a: Vec3, b: Vec3) -> Vec3 {
    a.lerp(b, 0.5).normalize()
}

fn split(tri: Triangle) -> [Triangle; 4] {
    let [a, b, c] = tri;
    let ab = sphere_midpoint(a, b);
    let ac = sphere_midpoint(a, c);
    let bc = sphere_midpoint(b, c);
    [[a, ab, ac], [ab, b, bc], [bc, c, ac], [ab, bc, ac]]
}

/// Subdivides one triangle `depth` times and returns the resulting triangles.
pub fn subdivide(tri: Triangle, depth: u32) -> Vec<Triangle> {
    if depth == 0 {
        return vec![tri];
    }
    let mut out = Vec::with_capacity(4usize.checked_pow(depth).unwrap_or(0));
    for child in split(tri) {
        out.extend(subdivide(child, depth - 1));
    }
    out
}

fn subdivide_to_edge(tri: Triangle, max_edge: f32, depth_left: u32) -> Vec<Triangle> {
    if depth_left == 0 || longest_edge(&tri) <= max_edge {
        return vec![tri];
    }
    split(tri)
        .into_iter()
        .flat_map(|child| subdivide_to_edge(child, max_edge, depth_left - 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_unit_length(mesh: &SphereMesh) {
        for v in &mesh.vertices {
            assert!(
                (v.length() - 1.0).abs() < 1e-5,
                "Vertex {:?} has length {}",
                v,
                v.length()
            );
        }
    }

    #[test]
    fn test_depth_zero_is_seed() {
        let mesh = generate(0);
        assert_eq!(mesh.triangle_count(), 4);
        assert_eq!(mesh.vertex_count(), 12);
        assert_eq!(mesh.position_buffer().len(), 36);
        assert_unit_length(&mesh);

        let seed: Vec<Vec3> = seed_triangles().iter().flatten().copied().collect();
        assert_eq!(mesh.vertices, seed);
    }

    #[test]
    fn test_triangle_counts() {
        for depth in 0..=4 {
            let mesh = generate(depth);
            assert_eq!(Some(mesh.triangle_count()), triangle_count_for_depth(depth));
            assert_eq!(mesh.position_buffer().len(), 9 * 4 * 4usize.pow(depth));
            assert_eq!(mesh.normals.len(), mesh.vertices.len());
        }
    }

    #[test]
    fn test_vertices_on_unit_sphere() {
        assert_unit_length(&generate(3));
    }

    #[test]
    fn test_normals_match_positions() {
        let mesh = generate(2);
        assert_eq!(mesh.normals, mesh.vertices);
        assert_eq!(mesh.normal_buffer(), mesh.position_buffer());
    }

    #[test]
    fn test_subdivide_child_order() {
        let tri = seed_triangles()[0];
        let children = subdivide(tri, 1);
        assert_eq!(children.len(), 4);

        let [a, b, c] = tri;
        assert_eq!(children[0][0], a);
        assert_eq!(children[1][1], b);
        assert_eq!(children[2][1], c);
        // The centre triangle reuses the three midpoints.
        assert_eq!(children[3], [children[0][1], children[1][2], children[0][2]]);
    }

    #[test]
    fn test_generation_is_deterministic() {
        assert_eq!(generate(3), generate(3));
    }

    #[test]
    fn test_max_edge_respected() {
        let mesh = generate_with_max_edge(0.5).unwrap();
        assert!(mesh.triangle_count() > 4);
        assert_unit_length(&mesh);
        for tri in mesh.vertices.chunks_exact(3) {
            let tri = [tri[0], tri[1], tri[2]];
            assert!(longest_edge(&tri) <= 0.5 + 1e-6);
        }
    }

    #[test]
    fn test_max_edge_larger_than_seed() {
        let mesh = generate_with_max_edge(2.0).unwrap();
        assert_eq!(mesh.triangle_count(), 4);
    }

    #[test]
    fn test_invalid_max_edge() {
        assert_eq!(
            generate_with_max_edge(0.0),
            Err(MeshError::InvalidEdgeLength(0.0))
        );
        assert!(generate_with_max_edge(f32::NAN).is_err());
        assert!(generate_with_max_edge(-1.0).is_err());
    }

    #[test]
    fn test_config_build() {
        let mesh = IcosphereConfig::with_depth(1).build().unwrap();
        assert_eq!(mesh.triangle_count(), 16);

        let config = IcosphereConfig {
            limit: SubdivisionLimit::MaxEdge(-0.1),
        };
        assert!(config.build().is_err());
    }

    #[test]
    fn test_triangle_count_overflow() {
        assert_eq!(triangle_count_for_depth(0), Some(4));
        assert_eq!(triangle_count_for_depth(10), Some(4 * 1_048_576));
        assert_eq!(triangle_count_for_depth(32), None);
        assert_eq!(triangle_count_for_depth(u32::MAX), None);
    }
}
