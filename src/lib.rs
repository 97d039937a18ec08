//! Procedural mesh generator.
//!
//! This crate builds unit spheres by recursive subdivision of a tetrahedron,
//! fractal terrain on a regular triangulated grid with the diamond-square
//! algorithm, and a bouncing-sphere simulation that instances the sphere mesh.

pub mod error;
pub mod geometry;
pub mod terrain;
pub mod pipeline;
pub mod physics;
pub mod export;

pub use error::MeshError;
pub use geometry::{IcosphereConfig, SphereMesh, SubdivisionLimit};
pub use terrain::{DiamondSquareConfig, TerrainConfig, TerrainGrid};
pub use pipeline::{generate_terrain, GenerationStage, Pipeline, PipelineError};
pub use physics::{BounceSimulation, FrameParams, SimulationConfig, SphereInstance};
