//! Argument errors shared by the mesh generators.

use thiserror::Error;

/// Errors raised before any generation work starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    #[error("Invalid divisions: {0} (must be at least 1)")]
    InvalidDivisions(u32),
    #[error("Invalid bounds: [{0}, {1}] x [{2}, {3}] (min must be finite and below max)")]
    InvalidBounds(f32, f32, f32, f32),
    #[error("Grid with {0} divisions needs more than 32-bit vertex indices")]
    IndexOverflow(u32),
    #[error("Invalid roughness parameter '{0}': {1}")]
    InvalidRoughness(&'static str, f32),
    #[error("Invalid maximum edge length: {0} (must be finite and positive)")]
    InvalidEdgeLength(f32),
    #[error("Invalid frame parameter '{0}': {1}")]
    InvalidFrameParams(&'static str, f32),
}
