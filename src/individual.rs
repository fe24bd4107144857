use crate::error::RuntimeError;
use crate::strategy::Fitness;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Random name for an individual, drawn from the caller's generator.
pub fn uuid4(rng: &mut dyn RngCore) -> String {
    let uuid = rng.random::<u128>();
    format!("{uuid:032X}")
}

/// Direction of optimization.
#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Objective {
    /// Higher fitness is better.
    #[default]
    Maximize,

    /// Lower fitness is better.
    Minimize,
}

impl Objective {
    /// Is fitness `a` strictly better than fitness `b`?
    pub fn is_better(self, a: f64, b: f64) -> bool {
        match self {
            Self::Maximize => a > b,
            Self::Minimize => a < b,
        }
    }

    /// Orders fitness values best first.
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        match self {
            Self::Maximize => b.total_cmp(&a),
            Self::Minimize => a.total_cmp(&b),
        }
    }
}

/// One candidate solution.
///
/// The fitness is computed once, when the individual is created, and the
/// genome is never modified afterwards. Variation operators produce new
/// individuals instead.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Individual<G> {
    /// UUID of this individual.
    pub name: String,

    /// Genetic parameters of this candidate solution.
    pub genome: G,

    /// Value of the fitness function for the genome.
    pub fitness: f64,

    /// Number of generations that passed before this individual was born.
    pub generation: u64,

    /// The names of this individual's parents.
    pub parents: Vec<String>,
}

impl<G> Individual<G> {
    /// Evaluate a genome and create a founding individual.
    pub fn new(genome: G, fitness: &dyn Fitness<G>, rng: &mut dyn RngCore) -> Result<Self, RuntimeError> {
        Self::child(uuid4(rng), genome, Vec::new(), 0, fitness)
    }

    /// Evaluate a genome produced by variation operators.
    ///
    /// The name is taken as an argument so that offspring can be named in
    /// order and then evaluated in parallel.
    pub fn child(
        name: String,
        genome: G,
        parents: Vec<String>,
        generation: u64,
        fitness: &dyn Fitness<G>,
    ) -> Result<Self, RuntimeError> {
        let score = fitness.evaluate(&genome);
        if score.is_nan() {
            return Err(RuntimeError::InvalidFitness(score));
        }
        Ok(Self {
            name,
            genome,
            fitness: score,
            generation,
            parents,
        })
    }
}
