//! Structure of run configuration files.
//!
//! Configurations are JSON documents, for example:
//!
//! ```json
//! {
//!     "topology": {
//!         "nbr_populations": 4,
//!         "nbr_individuals": 30,
//!         "nbr_genes": 2,
//!         "nbr_clusters": 3
//!     },
//!     "migration": { "interval": 5, "exchange": "random", "shuffle": true },
//!     "objective": "minimize",
//!     "seed": 42
//! }
//! ```

use crate::error::ConfigError;
use crate::individual::Objective;
use crate::serde_utils::{default_one, deserialize_count};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Static shape of a run. Fixed once the engine is initialized.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Topology {
    /// Number of islands.
    #[serde(deserialize_with = "deserialize_count")]
    pub nbr_populations: usize,

    /// Number of individuals on each island.
    #[serde(deserialize_with = "deserialize_count")]
    pub nbr_individuals: usize,

    /// Number of genes in each genome.
    #[serde(deserialize_with = "deserialize_count")]
    pub nbr_genes: usize,

    /// Number of clusters each island is split into during migration.
    /// Must not exceed the number of individuals.
    #[serde(default = "default_one", deserialize_with = "deserialize_count")]
    pub nbr_clusters: usize,
}

impl Topology {
    pub fn new(nbr_populations: usize, nbr_individuals: usize, nbr_genes: usize, nbr_clusters: usize) -> Self {
        Self {
            nbr_populations,
            nbr_individuals,
            nbr_genes,
            nbr_clusters,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nbr_populations == 0 {
            return Err(ConfigError::NoPopulations);
        }
        if self.nbr_individuals == 0 {
            return Err(ConfigError::NoIndividuals);
        }
        if self.nbr_genes == 0 {
            return Err(ConfigError::NoGenes);
        }
        if self.nbr_clusters == 0 || self.nbr_clusters > self.nbr_individuals {
            return Err(ConfigError::ClusterCount {
                clusters: self.nbr_clusters,
                individuals: self.nbr_individuals,
            });
        }
        Ok(())
    }
}

/// Controls how the clusters of each island are redistributed.
#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Exchange {
    /// Cluster `j` of island `i` moves to island `(i + j) mod islands`.
    /// The first cluster of every island stays home.
    #[default]
    Ring,

    /// For each cluster index, a random permutation of the islands decides
    /// where the clusters go.
    Random,
}

/// Migration schedule and policy.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Migration {
    /// Number of generations between migration rounds.
    #[serde(default = "default_one", deserialize_with = "deserialize_count")]
    pub interval: usize,

    #[serde(default)]
    pub exchange: Exchange,

    /// Shuffle each island before clustering it, so that the migrating groups
    /// are random instead of contiguous.
    #[serde(default)]
    pub shuffle: bool,
}

impl Default for Migration {
    fn default() -> Self {
        Self {
            interval: 1,
            exchange: Exchange::default(),
            shuffle: false,
        }
    }
}

impl Migration {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval == 0 {
            Err(ConfigError::MigrationInterval)
        } else {
            Ok(())
        }
    }
}

/// Everything needed to run the engine, apart from the strategies.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub topology: Topology,

    #[serde(default)]
    pub migration: Migration,

    #[serde(default)]
    pub objective: Objective,

    /// Seed for reproducible runs, or None to seed from the operating system.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Config {
    pub fn new(topology: Topology) -> Self {
        Self {
            topology,
            migration: Migration::default(),
            objective: Objective::default(),
            seed: None,
        }
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.topology.validate()?;
        self.migration.validate()
    }
}
