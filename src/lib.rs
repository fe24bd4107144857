//! Archipelago is an island model genetic algorithm. Several populations
//! ("islands") evolve independently and in parallel, and periodically
//! exchange individuals through a clustering based migration.
//!
//! The selection, crossover, mutation, initialization and fitness functions
//! are pluggable, see the [strategy] module for their interfaces and the
//! [operators] module for some common implementations.

pub mod config;
pub mod engine;
pub mod error;
pub mod individual;
pub mod migration;
pub mod model;
pub mod operators;
pub mod population;
mod serde_utils;
pub mod strategy;

pub use config::{Config, Exchange, Migration, Topology};
pub use engine::GA;
pub use error::{ConfigError, Error, Result, RuntimeError};
pub use individual::{Individual, Objective};
pub use migration::Migrator;
pub use model::{Generational, Model};
pub use population::{FitnessStats, Population, merge};
pub use strategy::{Crossover, Fitness, Genome, Initializer, Mutator, Selector};
