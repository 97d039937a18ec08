//! Generation stage trait and pipeline orchestration.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::error::MeshError;
use crate::terrain::{diamond_square, recompute_normals, DiamondSquareConfig, TerrainConfig, TerrainGrid};

/// Unique identifier for generation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Diamond-square height perturbation.
    Heights,
    /// Vertex normal recomputation.
    Normals,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Heights => "heights",
            StageId::Normals => "normals",
        }
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid terrain parameters: {0}")]
    Mesh(#[from] MeshError),
    #[error("Missing dependency: stage '{0}' requires '{1}'")]
    MissingDependency(String, String),
}

/// A step that transforms a terrain grid in place.
pub trait GenerationStage: Send + Sync {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str;

    /// Returns the stage IDs that must be executed before this stage.
    fn dependencies(&self) -> &[StageId] {
        &[]
    }

    /// Executes the stage, modifying the grid in place.
    fn execute(&self, grid: &mut TerrainGrid) -> Result<(), PipelineError>;
}

/// Runs generation stages in insertion order.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn GenerationStage>>,
}

impl Pipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<S: GenerationStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Executes all stages in order on the given grid.
    pub fn run(&self, grid: &mut TerrainGrid) -> Result<(), PipelineError> {
        self.run_with_callbacks(grid, |_, _, _| {}, |_, _, _| {})
    }

    /// Executes all stages with progress callbacks.
    ///
    /// # Arguments
    /// * `grid` - The terrain grid to transform
    /// * `on_stage_start` - Called when each stage begins
    /// * `on_stage_complete` - Called when each stage finishes
    pub fn run_with_callbacks<F1, F2>(
        &self,
        grid: &mut TerrainGrid,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> Result<(), PipelineError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        let total = self.stages.len();
        let mut completed: Vec<StageId> = Vec::new();

        for (i, stage) in self.stages.iter().enumerate() {
            on_stage_start(stage.name(), i, total);

            for dep in stage.dependencies() {
                if !completed.contains(dep) {
                    return Err(PipelineError::MissingDependency(
                        stage.name().to_string(),
                        dep.name().to_string(),
                    ));
                }
            }

            stage.execute(grid)?;
            completed.push(stage.id());
            log::debug!("Pipeline: stage '{}' done", stage.id().name());

            on_stage_complete(stage.name(), i, total);
        }

        Ok(())
    }
}

/// Diamond-square height perturbation stage, seeded from its configuration.
pub struct DiamondSquareStage {
    pub config: DiamondSquareConfig,
}

impl DiamondSquareStage {
    /// Creates a new height stage with the given configuration.
    pub fn new(config: DiamondSquareConfig) -> Self {
        Self { config }
    }
}

impl GenerationStage for DiamondSquareStage {
    fn id(&self) -> StageId {
        StageId::Heights
    }

    fn name(&self) -> &str {
        "Diamond-Square Heights"
    }

    fn execute(&self, grid: &mut TerrainGrid) -> Result<(), PipelineError> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        diamond_square(grid, &self.config, &mut rng)?;
        Ok(())
    }
}

/// Normal recomputation stage; runs on the perturbed surface.
pub struct NormalStage;

impl GenerationStage for NormalStage {
    fn id(&self) -> StageId {
        StageId::Normals
    }

    fn name(&self) -> &str {
        "Normal Recomputation"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Heights]
    }

    fn execute(&self, grid: &mut TerrainGrid) -> Result<(), PipelineError> {
        recompute_normals(grid);
        Ok(())
    }
}

/// Builds the pipeline described by a terrain configuration.
pub fn terrain_pipeline(config: &TerrainConfig) -> Pipeline {
    let mut pipeline = Pipeline::new();
    pipeline.add_stage(DiamondSquareStage::new(config.diamond_square.clone()));
    if config.recompute_normals {
        pipeline.add_stage(NormalStage);
    }
    pipeline
}

/// Builds the grid and runs every configured stage on it.
pub fn generate_terrain(config: &TerrainConfig) -> Result<TerrainGrid, PipelineError> {
    config.diamond_square.validate()?;
    let mut grid = TerrainGrid::new(
        config.divisions,
        config.min_x,
        config.max_x,
        config.min_y,
        config.max_y,
    )?;
    terrain_pipeline(config).run(&mut grid)?;

    let (min, max) = grid.elevation_range();
    log::info!(
        "Terrain: generated {} vertices, {} triangles, elevation [{:.4}, {:.4}]",
        grid.vertex_count(),
        grid.triangle_count(),
        min,
        max
    );
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn flat_grid() -> TerrainGrid {
        TerrainGrid::new(8, -1.0, 1.0, -1.0, 1.0).unwrap()
    }

    #[test]
    fn test_pipeline_runs_in_order() {
        let mut pipeline = Pipeline::new();
        pipeline
            .add_stage(DiamondSquareStage::new(DiamondSquareConfig::with_seed(3)))
            .add_stage(NormalStage);
        assert_eq!(pipeline.stage_count(), 2);

        let mut grid = flat_grid();
        let mut started = Vec::new();
        let mut finished = Vec::new();
        pipeline
            .run_with_callbacks(
                &mut grid,
                |name, i, total| started.push((name.to_string(), i, total)),
                |name, i, _| finished.push((name.to_string(), i)),
            )
            .unwrap();

        assert_eq!(started[0], ("Diamond-Square Heights".to_string(), 0, 2));
        assert_eq!(finished[1], ("Normal Recomputation".to_string(), 1));
        assert!(grid.normals.iter().any(|&n| n != Vec3::Z));
    }

    #[test]
    fn test_missing_dependency() {
        let mut pipeline = Pipeline::new();
        pipeline.add_stage(NormalStage);

        let mut grid = flat_grid();
        let err = pipeline.run(&mut grid).unwrap_err();
        assert!(matches!(err, PipelineError::MissingDependency(ref s, ref d)
            if s == "Normal Recomputation" && d == "heights"));
    }

    #[test]
    fn test_stage_error_propagates() {
        let config = DiamondSquareConfig {
            persistence: 2.0,
            ..Default::default()
        };
        let mut pipeline = Pipeline::new();
        pipeline.add_stage(DiamondSquareStage::new(config));

        let mut grid = flat_grid();
        let err = pipeline.run(&mut grid).unwrap_err();
        assert!(matches!(err, PipelineError::Mesh(MeshError::InvalidRoughness("persistence", _))));
    }

    #[test]
    fn test_generate_terrain() {
        let config = TerrainConfig {
            divisions: 16,
            ..TerrainConfig::rolling_hills(8)
        };
        let grid = generate_terrain(&config).unwrap();
        assert_eq!(grid.vertex_count(), 17 * 17);
        let (min, max) = grid.elevation_range();
        assert!(min < max, "Should have height variation");
    }

    #[test]
    fn test_generate_terrain_reproducible() {
        let config = TerrainConfig::default();
        let a = generate_terrain(&config).unwrap();
        let b = generate_terrain(&config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_terrain_without_normals() {
        let config = TerrainConfig {
            divisions: 4,
            recompute_normals: false,
            ..Default::default()
        };
        let grid = generate_terrain(&config).unwrap();
        assert!(grid.normals.iter().all(|&n| n == Vec3::Z));
    }

    #[test]
    fn test_generate_terrain_rejects_zero_divisions() {
        let config = TerrainConfig {
            divisions: 0,
            ..Default::default()
        };
        assert!(matches!(
            generate_terrain(&config),
            Err(PipelineError::Mesh(MeshError::InvalidDivisions(0)))
        ));
    }
}
