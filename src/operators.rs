//! Stock initializers, selectors, crossovers and mutators.
//!
//! The floating point operators work on `Vec<f64>` genomes; [CrossPoint]
//! works on any vector.

use crate::individual::{Individual, Objective};
use crate::population::Population;
use crate::strategy::{Crossover, Initializer, Mutator, Selector};
use rand::{Rng, RngCore};
use rand_distr::{Distribution, Normal, NormalError};

/// Uniformly distributed floats in the range [lower, upper).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct InitUniformF {
    pub lower: f64,
    pub upper: f64,
}

impl Initializer<Vec<f64>> for InitUniformF {
    fn apply(&self, nbr_genes: usize, rng: &mut dyn RngCore) -> Vec<f64> {
        (0..nbr_genes)
            .map(|_| self.lower + (self.upper - self.lower) * rng.random::<f64>())
            .collect()
    }
}

/// Selects the best individuals, in order. Deterministic.
///
/// If more individuals are requested than exist then the ranking is repeated.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct SelElitism;

impl<G: Clone + Send + Sync> Selector<G> for SelElitism {
    fn select(
        &self,
        population: &Population<G>,
        count: usize,
        objective: Objective,
        _rng: &mut dyn RngCore,
    ) -> Vec<Individual<G>> {
        let mut ranked: Vec<&Individual<G>> = population.iter().collect();
        if ranked.is_empty() {
            return Vec::new();
        }
        ranked.sort_by(|a, b| objective.compare(a.fitness, b.fitness));
        ranked.iter().cycle().take(count).map(|&individual| individual.clone()).collect()
    }
}

/// Each pick is the best of `size` individuals drawn with replacement.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SelTournament {
    pub size: usize,
}

impl Default for SelTournament {
    fn default() -> Self {
        Self { size: 3 }
    }
}

impl<G: Clone + Send + Sync> Selector<G> for SelTournament {
    fn select(
        &self,
        population: &Population<G>,
        count: usize,
        objective: Objective,
        rng: &mut dyn RngCore,
    ) -> Vec<Individual<G>> {
        let individuals = population.individuals();
        if individuals.is_empty() {
            return Vec::new();
        }
        (0..count)
            .map(|_| {
                let mut winner = &individuals[rng.random_range(0..individuals.len())];
                for _ in 1..self.size {
                    let contender = &individuals[rng.random_range(0..individuals.len())];
                    if objective.is_better(contender.fitness, winner.fitness) {
                        winner = contender;
                    }
                }
                winner.clone()
            })
            .collect()
    }
}

/// Blends each pair of genes with a random weight, producing two offspring.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct CrossUniformF;

impl Crossover<Vec<f64>> for CrossUniformF {
    fn cross(&self, mother: &Vec<f64>, father: &Vec<f64>, rng: &mut dyn RngCore) -> Vec<Vec<f64>> {
        let mut daughter = Vec::with_capacity(mother.len());
        let mut son = Vec::with_capacity(mother.len());
        for (m, f) in mother.iter().zip(father) {
            let p = rng.random::<f64>();
            daughter.push(p * m + (1.0 - p) * f);
            son.push((1.0 - p) * m + p * f);
        }
        vec![daughter, son]
    }
}

/// Swaps the tails of the parents after a random cut point, producing two offspring.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct CrossPoint;

impl<T: Clone + Send + Sync> Crossover<Vec<T>> for CrossPoint {
    fn cross(&self, mother: &Vec<T>, father: &Vec<T>, rng: &mut dyn RngCore) -> Vec<Vec<T>> {
        let len = mother.len().min(father.len());
        if len < 2 {
            return vec![mother.clone(), father.clone()];
        }
        let cut = rng.random_range(1..len);
        let mut daughter = mother[..cut].to_vec();
        daughter.extend_from_slice(&father[cut..]);
        let mut son = father[..cut].to_vec();
        son.extend_from_slice(&mother[cut..]);
        vec![daughter, son]
    }
}

/// Adds gaussian noise to each gene with probability `rate`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MutNormalF {
    rate: f64,
    noise: Normal<f64>,
}

impl MutNormalF {
    /// Argument rate is clamped to the range [0, 1], NaN disables mutation.
    /// The standard deviation must be finite and not negative.
    pub fn new(rate: f64, std_dev: f64) -> Result<Self, NormalError> {
        if std_dev.is_nan() || std_dev < 0.0 {
            return Err(NormalError::BadVariance);
        }
        Ok(Self {
            rate: if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) },
            noise: Normal::new(0.0, std_dev)?,
        })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl Mutator<Vec<f64>> for MutNormalF {
    fn mutate(&self, genome: &mut Vec<f64>, rng: &mut dyn RngCore) {
        for gene in genome.iter_mut() {
            if rng.random_bool(self.rate) {
                *gene += self.noise.sample(rng);
            }
        }
    }
}
