//! A sphere placed in the world, sharing the generated unit-sphere mesh.

use glam::{Mat3, Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Walls of the bounding box, checked in this order.
const WALLS: [(usize, f32); 6] = [
    (0, -1.0),
    (0, 1.0),
    (1, -1.0),
    (1, 1.0),
    (2, -1.0),
    (2, 1.0),
];

/// Position, motion and size of one rendered sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereInstance {
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
    pub radius: f32,
}

impl SphereInstance {
    /// Creates a sphere with no acceleration.
    pub fn new(position: Vec3, velocity: Vec3, radius: f32) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vec3::ZERO,
            radius,
        }
    }

    /// Scales the unit mesh to `radius` and moves it to `position`.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position) * Mat4::from_scale(Vec3::splat(self.radius))
    }

    /// Inverse transpose of the upper 3x3 of `view * model`.
    pub fn normal_matrix(&self, view: Mat4) -> Mat3 {
        Mat3::from_mat4(view * self.model_matrix()).inverse().transpose()
    }

    /// Inward normal of the first box wall the sphere would cross after
    /// moving by `velocity * speed_boost`, if any.
    ///
    /// Walls the sphere is already moving away from are ignored, so a sphere
    /// left inside a wall after a corner hit drifts back out.
    pub fn wall_contact(&self, half_extent: f32, speed_boost: f32) -> Option<Vec3> {
        let next = self.position + self.velocity * speed_boost;
        WALLS.iter().find_map(|&(axis, side)| {
            let edge = next[axis] + side * self.radius;
            let crossed = if side < 0.0 {
                edge < -half_extent
            } else {
                edge > half_extent
            };
            // Inward normal is `-side` along `axis`.
            let approaching = self.velocity[axis] * side > 0.0;
            (crossed && approaching).then(|| {
                let mut normal = Vec3::ZERO;
                normal[axis] = -side;
                normal
            })
        })
    }

    /// Reflects the velocity about `normal` and keeps `1 - energy_lost` of it.
    pub fn bounce(&mut self, normal: Vec3, energy_lost: f32) {
        self.velocity = reflect(self.velocity, normal) * (1.0 - energy_lost);
    }

    /// Advances position by the boosted velocity, then velocity by acceleration.
    pub fn integrate(&mut self, speed_boost: f32) {
        self.position += self.velocity * speed_boost;
        self.velocity += self.acceleration;
    }
}

/// Mirror `d` about the plane with unit normal `n`.
pub fn reflect(d: Vec3, n: Vec3) -> Vec3 {
    d - n * (2.0 * d.dot(n))
}
