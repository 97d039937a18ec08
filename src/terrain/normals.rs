//! Per-vertex normal accumulation for the perturbed terrain surface.

use glam::Vec3;

use super::grid::TerrainGrid;

/// Unit normal of a triangle, or zero if the triangle is degenerate.
pub fn face_normal(v0: Vec3, v1: Vec3, v2: Vec3) -> Vec3 {
    (v1 - v0).cross(v2 - v0).normalize_or_zero()
}

/// Recomputes vertex normals from the current surface.
///
/// Every triangle adds its unit face normal to each of its three corners.
/// Vertices shared by several triangles end up with the sum of those face
/// normals, not their normalized average; use
/// [`TerrainGrid::unit_normals`] when unit length is required.
pub fn recompute_normals(grid: &mut TerrainGrid) {
    let mut normals = vec![Vec3::ZERO; grid.vertex_count()];

    for &[a, b, c] in &grid.triangles {
        let (a, b, c) = (a as usize, b as usize, c as usize);
        let n = face_normal(grid.vertices[a], grid.vertices[b], grid.vertices[c]);
        normals[a] += n;
        normals[b] += n;
        normals[c] += n;
    }

    grid.normals = normals;
}
