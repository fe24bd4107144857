//! Error types.
//!
//! Configuration problems are reported by [GA::initialize()](crate::GA::initialize)
//! and by the configuration loaders. Runtime problems are reported by
//! [GA::enhance()](crate::GA::enhance) and leave the engine's state as it was
//! before the call.

/// Invalid topology or migration settings.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("topology needs at least one population")]
    NoPopulations,

    #[error("topology needs at least one individual per population")]
    NoIndividuals,

    #[error("topology needs at least one gene per genome")]
    NoGenes,

    #[error("cluster count {clusters} not in range [1, {individuals}]")]
    ClusterCount { clusters: usize, individuals: usize },

    #[error("migration interval must be at least one generation")]
    MigrationInterval,

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Misuse of the engine, or a strategy which returned a malformed result.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("engine is not initialized")]
    NotInitialized,

    #[error("genome has {found} genes, expected {expected}")]
    GenomeLength { expected: usize, found: usize },

    #[error("population has {found} individuals, expected {expected}")]
    PopulationSize { expected: usize, found: usize },

    #[error("selector returned {found} individuals, expected {expected}")]
    SelectionSize { expected: usize, found: usize },

    #[error("fitness function returned {0}")]
    InvalidFitness(f64),

    #[error("crossover produced no offspring")]
    EmptyOffspring,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
