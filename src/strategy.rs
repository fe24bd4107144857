//! Interfaces for the pluggable parts of a genetic algorithm.
//!
//! Every strategy receives its source of randomness as an argument. The engine
//! gives each island its own random number generator, so strategies must not
//! hold any random state of their own.

use crate::individual::{Individual, Objective};
use crate::population::Population;
use rand::RngCore;
use std::fmt::Debug;

/// Genetic parameters of a candidate solution.
pub trait Genome: Clone + Debug + Send + Sync {
    /// Number of genes, which must match the topology.
    fn nbr_genes(&self) -> usize;
}

impl<T: Clone + Debug + Send + Sync> Genome for Vec<T> {
    fn nbr_genes(&self) -> usize {
        self.len()
    }
}

/// Creates random genomes for the founding generation.
pub trait Initializer<G>: Send + Sync {
    fn apply(&self, nbr_genes: usize, rng: &mut dyn RngCore) -> G;
}

impl<G, F> Initializer<G> for F
where
    F: Fn(usize, &mut dyn RngCore) -> G + Send + Sync,
{
    fn apply(&self, nbr_genes: usize, rng: &mut dyn RngCore) -> G {
        self(nbr_genes, rng)
    }
}

/// Scores a genome. Must be a pure function of the genome.
///
/// NaN is not a valid fitness.
pub trait Fitness<G>: Send + Sync {
    fn evaluate(&self, genome: &G) -> f64;
}

impl<G, F> Fitness<G> for F
where
    F: Fn(&G) -> f64 + Send + Sync,
{
    fn evaluate(&self, genome: &G) -> f64 {
        self(genome)
    }
}

/// Chooses parents. Individuals may be selected more than once.
pub trait Selector<G>: Send + Sync {
    /// Returns exactly `count` individuals from a non-empty population.
    fn select(
        &self,
        population: &Population<G>,
        count: usize,
        objective: Objective,
        rng: &mut dyn RngCore,
    ) -> Vec<Individual<G>>;
}

/// Combines two parent genomes into one or more offspring genomes.
pub trait Crossover<G>: Send + Sync {
    fn cross(&self, mother: &G, father: &G, rng: &mut dyn RngCore) -> Vec<G>;
}

/// Randomly perturbs an offspring genome before it is evaluated.
pub trait Mutator<G>: Send + Sync {
    fn mutate(&self, genome: &mut G, rng: &mut dyn RngCore);
}
