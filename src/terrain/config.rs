//! Configuration for terrain generation.

use serde::{Deserialize, Serialize};

use crate::error::MeshError;

/// Parameters of the diamond-square height perturbation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiamondSquareConfig {
    /// Offset amplitude used to seed the four grid corners.
    pub corner_roughness: f32,
    /// Offset amplitude of the first (coarsest) subdivision level.
    pub roughness: f32,
    /// Amplitude multiplier per level, in (0, 1).
    pub persistence: f32,
    /// Random seed for reproducible generation.
    pub seed: u64,
}

impl Default for DiamondSquareConfig {
    fn default() -> Self {
        Self {
            corner_roughness: 0.5,
            roughness: 0.4,
            persistence: 0.5,
            seed: 42,
        }
    }
}

impl DiamondSquareConfig {
    /// Creates a configuration with the given seed and default amplitudes.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Checks that amplitudes are usable and shrink every level.
    pub fn validate(&self) -> Result<(), MeshError> {
        if !self.corner_roughness.is_finite() || self.corner_roughness < 0.0 {
            return Err(MeshError::InvalidRoughness("corner_roughness", self.corner_roughness));
        }
        if !self.roughness.is_finite() || self.roughness < 0.0 {
            return Err(MeshError::InvalidRoughness("roughness", self.roughness));
        }
        if !(self.persistence > 0.0 && self.persistence < 1.0) {
            return Err(MeshError::InvalidRoughness("persistence", self.persistence));
        }
        Ok(())
    }
}

/// Full description of a terrain to generate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainConfig {
    /// Cells along each axis.
    pub divisions: u32,
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
    pub diamond_square: DiamondSquareConfig,
    /// Recompute normals from the perturbed surface.
    pub recompute_normals: bool,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            divisions: 64,
            min_x: -1.0,
            max_x: 1.0,
            min_y: -1.0,
            max_y: 1.0,
            diamond_square: DiamondSquareConfig::default(),
            recompute_normals: true,
        }
    }
}

impl TerrainConfig {
    /// Gentle terrain: low amplitudes that fall off quickly.
    pub fn rolling_hills(seed: u64) -> Self {
        Self {
            diamond_square: DiamondSquareConfig {
                corner_roughness: 0.2,
                roughness: 0.15,
                persistence: 0.4,
                seed,
            },
            ..Default::default()
        }
    }

    /// Jagged terrain: high amplitudes that persist into fine detail.
    pub fn rugged(seed: u64) -> Self {
        Self {
            divisions: 128,
            diamond_square: DiamondSquareConfig {
                corner_roughness: 0.8,
                roughness: 0.6,
                persistence: 0.65,
                seed,
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DiamondSquareConfig::default();
        assert_eq!(config.corner_roughness, 0.5);
        assert_eq!(config.roughness, 0.4);
        assert_eq!(config.persistence, 0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(TerrainConfig::default().diamond_square.validate().is_ok());
        assert!(TerrainConfig::rolling_hills(1).diamond_square.validate().is_ok());
        assert!(TerrainConfig::rugged(1).diamond_square.validate().is_ok());
        assert_eq!(TerrainConfig::rugged(9).diamond_square.seed, 9);
    }

    #[test]
    fn test_persistence_must_shrink() {
        for persistence in [0.0, 1.0, 1.5, -0.5, f32::NAN] {
            let config = DiamondSquareConfig {
                persistence,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "persistence {} accepted", persistence);
        }
    }

    #[test]
    fn test_negative_roughness_rejected() {
        let config = DiamondSquareConfig {
            roughness: -0.1,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(MeshError::InvalidRoughness("roughness", -0.1))
        );
    }
}
