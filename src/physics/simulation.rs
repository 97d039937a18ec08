//! Spheres bouncing inside an axis-aligned box.

use std::sync::Arc;

use glam::Vec3;
use rand::Rng;
use rayon::prelude::*;

use super::config::{FrameParams, SimulationConfig};
use super::instance::SphereInstance;
use crate::error::MeshError;
use crate::geometry::SphereMesh;

/// A set of sphere instances sharing one unit-sphere mesh.
pub struct BounceSimulation {
    mesh: Arc<SphereMesh>,
    config: SimulationConfig,
    spheres: Vec<SphereInstance>,
}

impl BounceSimulation {
    /// Creates an empty simulation rendering every sphere with `mesh`.
    pub fn new(mesh: Arc<SphereMesh>, config: SimulationConfig) -> Self {
        Self {
            mesh,
            config,
            spheres: Vec::new(),
        }
    }

    pub fn mesh(&self) -> &Arc<SphereMesh> {
        &self.mesh
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn spheres(&self) -> &[SphereInstance] {
        &self.spheres
    }

    /// Adds a sphere at a random position inside the box with a random velocity.
    pub fn spawn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &SphereInstance {
        let reach = (self.config.half_extent - self.config.sphere_radius).max(0.0);
        let speed = self.config.max_spawn_speed;
        let position = Vec3::new(
            symmetric(rng, reach),
            symmetric(rng, reach),
            symmetric(rng, reach),
        );
        let velocity = Vec3::new(
            symmetric(rng, speed),
            symmetric(rng, speed),
            symmetric(rng, speed),
        );
        self.push(SphereInstance::new(position, velocity, self.config.sphere_radius))
    }

    /// Adds a sphere as given.
    pub fn push(&mut self, sphere: SphereInstance) -> &SphereInstance {
        self.spheres.push(sphere);
        &self.spheres[self.spheres.len() - 1]
    }

    /// Removes every sphere.
    pub fn reset(&mut self) {
        self.spheres.clear();
    }

    /// Advances every sphere by one frame.
    ///
    /// # Returns
    /// The number of wall collisions during this frame.
    pub fn step(&mut self, params: &FrameParams) -> Result<usize, MeshError> {
        params.validate()?;

        let gravity = if params.gravity_enabled {
            self.config.gravity
        } else {
            0.0
        };
        let half_extent = self.config.half_extent;

        let collisions: usize = self
            .spheres
            .par_iter_mut()
            .map(|sphere| {
                sphere.acceleration.y = gravity;
                let hit = sphere.wall_contact(half_extent, params.speed_boost);
                if let Some(normal) = hit {
                    sphere.bounce(normal, params.energy_lost);
                }
                sphere.integrate(params.speed_boost);
                usize::from(hit.is_some())
            })
            .sum();

        log::debug!("Simulation: {} spheres, {} collisions", self.spheres.len(), collisions);
        Ok(collisions)
    }
}

/// Uniform sample in `[-extent, extent)` split into magnitude and sign.
fn symmetric<R: Rng + ?Sized>(rng: &mut R, extent: f32) -> f32 {
    let magnitude = rng.random::<f32>() * extent;
    if rng.random_bool(0.5) {
        magnitude
    } else {
        -magnitude
    }
}
