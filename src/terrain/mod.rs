//! Terrain generation module.
//!
//! Provides the triangulated height grid, diamond-square perturbation of its
//! elevations, and normal recomputation from the perturbed surface.

mod grid;
mod config;
mod diamond_square;
mod normals;

pub use grid::TerrainGrid;
pub use config::{DiamondSquareConfig, TerrainConfig};
pub use diamond_square::{diamond_square, perturb};
pub use normals::{face_normal, recompute_normals};
