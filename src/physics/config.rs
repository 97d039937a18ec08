//! Configuration for the bouncing-sphere simulation.

use serde::{Deserialize, Serialize};

use crate::error::MeshError;

/// Fixed parameters of a simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Half the side length of the bounding box centred on the origin.
    pub half_extent: f32,
    /// Radius given to spawned spheres.
    pub sphere_radius: f32,
    /// Vertical acceleration applied while gravity is enabled.
    pub gravity: f32,
    /// Largest per-axis speed given to spawned spheres.
    pub max_spawn_speed: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            half_extent: 20.0,
            sphere_radius: 1.0,
            gravity: -0.02,
            max_spawn_speed: 0.1,
        }
    }
}

/// Parameters that may change from one frame to the next.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FrameParams {
    pub gravity_enabled: bool,
    /// Fraction of speed lost per wall collision, in [0, 1].
    pub energy_lost: f32,
    /// Multiplier applied to velocity when integrating position.
    pub speed_boost: f32,
}

impl Default for FrameParams {
    fn default() -> Self {
        Self {
            gravity_enabled: false,
            energy_lost: 0.0,
            speed_boost: 1.0,
        }
    }
}

impl FrameParams {
    pub fn validate(&self) -> Result<(), MeshError> {
        if !(0.0..=1.0).contains(&self.energy_lost) {
            return Err(MeshError::InvalidFrameParams("energy_lost", self.energy_lost));
        }
        if !self.speed_boost.is_finite() || self.speed_boost < 0.0 {
            return Err(MeshError::InvalidFrameParams("speed_boost", self.speed_boost));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_frame_params_valid() {
        assert!(FrameParams::default().validate().is_ok());
    }

    #[test]
    fn test_energy_lost_range() {
        for energy_lost in [-0.1, 1.1, f32::NAN] {
            let params = FrameParams {
                energy_lost,
                ..Default::default()
            };
            assert!(params.validate().is_err());
        }
        let params = FrameParams {
            energy_lost: 1.0,
            ..Default::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_speed_boost_must_be_finite() {
        let params = FrameParams {
            speed_boost: f32::INFINITY,
            ..Default::default()
        };
        assert_eq!(
            params.validate(),
            Err(MeshError::InvalidFrameParams("speed_boost", f32::INFINITY))
        );
    }
}
