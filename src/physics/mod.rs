//! Bouncing-sphere simulation.
//!
//! Sphere instances own their transform and motion state and share a single
//! generated unit-sphere mesh for rendering.

mod config;
mod instance;
mod simulation;

pub use config::{FrameParams, SimulationConfig};
pub use instance::{reflect, SphereInstance};
pub use simulation::BounceSimulation;
