//! Tetrahedral seed for sphere subdivision.

use glam::Vec3;

/// A triangle of three points.
pub type Triangle = [Vec3; 3];

/// Vertices of the seed tetrahedron, all on the unit sphere (to 6 digits).
pub const SEED_VERTICES: [Vec3; 4] = [
    Vec3::new(0.0, 0.0, -1.0),
    Vec3::new(0.0, 0.942809, 0.333333),
    Vec3::new(-0.816497, -0.471405, 0.333333),
    Vec3::new(0.816497, -0.471405, 0.333333),
];

/// Number of triangles in the seed.
pub const SEED_TRIANGLE_COUNT: usize = 4;

/// Returns the four seed triangles in emission order.
pub const fn seed_triangles() -> [Triangle; SEED_TRIANGLE_COUNT] {
    let [a, b, c, d] = SEED_VERTICES;
    [[a, b, c], [d, c, b], [a, d, b], [a, c, d]]
}

/// Length of the longest edge of a triangle.
pub fn longest_edge(tri: &Triangle) -> f32 {
    let [a, b, c] = *tri;
    a.distance(b).max(b.distance(c)).max(c.distance(a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_vertices_on_unit_sphere() {
        for v in SEED_VERTICES {
            assert!((v.length() - 1.0).abs() < 1e-5, "{:?} has length {}", v, v.length());
        }
    }

    #[test]
    fn test_seed_triangles_consistent_winding() {
        let facing: Vec<bool> = seed_triangles()
            .iter()
            .map(|&[a, b, c]| (b - a).cross(c - a).dot(a + b + c) > 0.0)
            .collect();
        assert!(facing.iter().all(|&f| f == facing[0]), "Mixed winding: {:?}", facing);
    }

    #[test]
    fn test_longest_edge() {
        let tri = [Vec3::ZERO, Vec3::X, Vec3::Y];
        assert!((longest_edge(&tri) - 2.0f32.sqrt()).abs() < 1e-6);
    }
}
