//! Pipeline module for orchestrating terrain generation stages.
//!
//! Stages are composed into a pipeline that checks their ordering
//! dependencies before running each one on the terrain grid.

mod stage;

pub use stage::{
    generate_terrain, terrain_pipeline, DiamondSquareStage, GenerationStage, NormalStage,
    Pipeline, PipelineError, StageId,
};
