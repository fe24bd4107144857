//! Migration exchanges individuals between islands.
//!
//! Each island is split into clusters with [Population::cluster()], the
//! clusters are handed to other islands according to the [Exchange] policy,
//! and each island merges the clusters it received with [merge()]. Every
//! island receives exactly one cluster for each cluster index, so island
//! sizes never change.

use crate::config::{Exchange, Migration, Topology};
use crate::error::{ConfigError, RuntimeError};
use crate::population::{Population, merge};
use rand::RngCore;
use rand::seq::SliceRandom;
use tracing::{info, trace};

/// Runs migration rounds between islands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migrator {
    migration: Migration,
    nbr_clusters: usize,
    rounds: u64,
}

impl Migrator {
    /// Rejects topologies with more clusters than individuals per island.
    pub fn new(topology: &Topology, migration: Migration) -> Result<Self, ConfigError> {
        topology.validate()?;
        migration.validate()?;
        Ok(Self {
            migration,
            nbr_clusters: topology.nbr_clusters,
            rounds: 0,
        })
    }

    pub fn migration(&self) -> &Migration {
        &self.migration
    }

    pub fn nbr_clusters(&self) -> usize {
        self.nbr_clusters
    }

    /// Get the number of completed migration rounds.
    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    /// Is a migration round scheduled after the given generation?
    pub fn is_due(&self, generation: u64) -> bool {
        generation > 0 && generation % self.migration.interval as u64 == 0
    }

    /// Run one migration round across all of the islands.
    ///
    /// All islands must have the same number of individuals, otherwise the
    /// islands are left untouched and an error is returned.
    pub fn migrate<G>(&mut self, islands: &mut [Population<G>], rng: &mut dyn RngCore) -> Result<(), RuntimeError> {
        let Some(expected) = islands.first().map(Population::len) else {
            return Ok(());
        };
        if let Some(island) = islands.iter().find(|island| island.len() != expected) {
            return Err(RuntimeError::PopulationSize {
                expected,
                found: island.len(),
            });
        }
        let nbr_islands = islands.len();

        // Split every island into clusters.
        let mut clustered = Vec::with_capacity(nbr_islands);
        for island in islands.iter_mut() {
            let mut population = std::mem::take(island);
            if self.migration.shuffle {
                population.shuffle(rng);
            }
            clustered.push(population.cluster(self.nbr_clusters));
        }
        // Equal sized islands are cut into the same number of clusters.
        let nbr_clusters = clustered.first().map_or(0, Vec::len);
        trace!(
            sizes = ?clustered.first().map(|clusters| clusters.iter().map(Population::len).collect::<Vec<_>>()),
            "clustered islands"
        );

        // Route each cluster to its destination island.
        let routes: Vec<Vec<usize>> = match self.migration.exchange {
            Exchange::Ring => (0..nbr_clusters)
                .map(|j| (0..nbr_islands).map(|i| (i + j) % nbr_islands).collect())
                .collect(),
            Exchange::Random => (0..nbr_clusters)
                .map(|_| {
                    let mut permutation: Vec<usize> = (0..nbr_islands).collect();
                    permutation.shuffle(rng);
                    permutation
                })
                .collect(),
        };
        let mut inbox: Vec<Vec<Option<Population<G>>>> = (0..nbr_islands)
            .map(|_| (0..nbr_clusters).map(|_| None).collect())
            .collect();
        for (source, clusters) in clustered.into_iter().enumerate() {
            for (j, cluster) in clusters.into_iter().enumerate() {
                inbox[routes[j][source]][j] = Some(cluster);
            }
        }

        for (island, received) in islands.iter_mut().zip(inbox) {
            *island = merge(received.into_iter().flatten());
        }
        self.rounds += 1;
        info!(
            round = self.rounds,
            islands = nbr_islands,
            clusters = nbr_clusters,
            exchange = ?self.migration.exchange,
            "migration"
        );
        Ok(())
    }
}
