//! Sphere geometry module.
//!
//! Generates unit spheres by recursive subdivision of a tetrahedral seed,
//! projecting every new vertex onto the unit sphere.

mod tetrahedron;
mod icosphere;

pub use tetrahedron::{longest_edge, seed_triangles, Triangle, SEED_TRIANGLE_COUNT, SEED_VERTICES};
pub use icosphere::{
    generate, generate_with_max_edge, subdivide, triangle_count_for_depth,
    IcosphereConfig, SphereMesh, SubdivisionLimit, MAX_ADAPTIVE_DEPTH,
};
