//! The island model genetic algorithm.

use crate::config::{Config, Topology};
use crate::error::{Result, RuntimeError};
use crate::individual::{Individual, Objective};
use crate::migration::Migrator;
use crate::model::Model;
use crate::population::Population;
use crate::strategy::{Fitness, Genome, Initializer};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// State of an initialized run.
struct Run<G> {
    topology: Topology,
    objective: Objective,
    migrator: Migrator,
    islands: Vec<Population<G>>,
    /// One generator per island.
    island_rngs: Vec<StdRng>,
    /// Shuffles and routes the migrating clusters.
    migration_rng: StdRng,
    best: Individual<G>,
    generation: u64,
}

/// Genetic algorithm which evolves several islands in parallel and
/// periodically migrates individuals between them.
///
/// Call [initialize()](GA::initialize) to build the islands, then
/// [enhance()](GA::enhance) to advance them one generation at a time.
/// Changes to `config` take effect at the next call to `initialize()`.
pub struct GA<G> {
    pub config: Config,
    initializer: Box<dyn Initializer<G>>,
    fitness: Box<dyn Fitness<G>>,
    model: Box<dyn Model<G>>,
    run: Option<Run<G>>,
}

fn best_of<G>(islands: &[Population<G>], objective: Objective) -> Option<&Individual<G>> {
    let mut best: Option<&Individual<G>> = None;
    for candidate in islands.iter().filter_map(|island| island.best(objective)) {
        match best {
            Some(current) if !objective.is_better(candidate.fitness, current.fitness) => {}
            _ => best = Some(candidate),
        }
    }
    best
}

/// Check a population produced by a strategy against the topology.
fn check_island<G: Genome>(island: &Population<G>, topology: &Topology) -> Result<(), RuntimeError> {
    if island.len() != topology.nbr_individuals {
        return Err(RuntimeError::PopulationSize {
            expected: topology.nbr_individuals,
            found: island.len(),
        });
    }
    for individual in island.iter() {
        let found = individual.genome.nbr_genes();
        if found != topology.nbr_genes {
            return Err(RuntimeError::GenomeLength {
                expected: topology.nbr_genes,
                found,
            });
        }
    }
    Ok(())
}

impl<G: Genome> GA<G> {
    pub fn new(
        config: Config,
        initializer: impl Initializer<G> + 'static,
        fitness: impl Fitness<G> + 'static,
        model: impl Model<G> + 'static,
    ) -> Self {
        Self {
            config,
            initializer: Box::new(initializer),
            fitness: Box::new(fitness),
            model: Box::new(model),
            run: None,
        }
    }

    /// Build and evaluate the islands, discarding any previous run.
    ///
    /// If this fails then the engine keeps its previous state.
    pub fn initialize(&mut self) -> Result<()> {
        self.config.validate()?;
        let topology = self.config.topology.clone();
        let objective = self.config.objective;
        let migrator = Migrator::new(&topology, self.config.migration.clone())?;

        let mut master = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut island_rngs: Vec<StdRng> = (0..topology.nbr_populations)
            .map(|_| StdRng::from_rng(&mut master))
            .collect();
        let migration_rng = StdRng::from_rng(&mut master);

        let initializer = &*self.initializer;
        let fitness = &*self.fitness;
        let islands = island_rngs
            .par_iter_mut()
            .map(|rng| -> Result<Population<G>, RuntimeError> {
                let island = (0..topology.nbr_individuals)
                    .map(|_| {
                        let genome = initializer.apply(topology.nbr_genes, rng);
                        Individual::new(genome, fitness, rng)
                    })
                    .collect::<Result<Population<G>, RuntimeError>>()?;
                check_island(&island, &topology)?;
                Ok(island)
            })
            .collect::<Result<Vec<_>, RuntimeError>>()?;

        let best = best_of(&islands, objective)
            .ok_or(RuntimeError::PopulationSize {
                expected: topology.nbr_individuals,
                found: 0,
            })?
            .clone();
        info!(
            populations = topology.nbr_populations,
            individuals = topology.nbr_individuals,
            clusters = topology.nbr_clusters,
            best = best.fitness,
            "initialized"
        );
        self.run = Some(Run {
            topology,
            objective,
            migrator,
            islands,
            island_rngs,
            migration_rng,
            best,
            generation: 0,
        });
        Ok(())
    }

    /// Advance every island by one generation, migrate if it's due, and update
    /// the best individual.
    ///
    /// Islands evolve in parallel. If any strategy fails then nothing is
    /// committed: the islands, generation counter and best individual are
    /// left as they were.
    pub fn enhance(&mut self) -> Result<()> {
        let run = self.run.as_mut().ok_or(RuntimeError::NotInitialized)?;
        let model = &*self.model;
        let fitness = &*self.fitness;
        let topology = &run.topology;
        let objective = run.objective;

        let mut island_rngs = run.island_rngs.clone();
        let mut islands = run
            .islands
            .par_iter()
            .zip(island_rngs.par_iter_mut())
            .map(|(island, rng)| -> Result<Population<G>, RuntimeError> {
                let next = model.step(island, fitness, objective, rng)?;
                check_island(&next, topology)?;
                Ok(next)
            })
            .collect::<Result<Vec<_>, RuntimeError>>()?;

        let generation = run.generation + 1;
        let mut migration_rng = run.migration_rng.clone();
        let mut migrator = run.migrator.clone();
        if migrator.is_due(generation) {
            migrator.migrate(&mut islands, &mut migration_rng)?;
        }

        // Commit.
        run.islands = islands;
        run.island_rngs = island_rngs;
        run.migration_rng = migration_rng;
        run.migrator = migrator;
        run.generation = generation;
        if let Some(candidate) = best_of(&run.islands, objective) {
            if objective.is_better(candidate.fitness, run.best.fitness) {
                info!(generation, fitness = candidate.fitness, "new best");
                run.best = candidate.clone();
            }
        }
        debug!(generation, best = run.best.fitness, "enhanced");
        Ok(())
    }

    /// Call [enhance()](GA::enhance) repeatedly.
    ///
    /// The `cancel` flag is checked before each generation. Returns the number
    /// of generations which were completed.
    pub fn run(&mut self, generations: usize, cancel: &AtomicBool) -> Result<usize> {
        if self.run.is_none() {
            return Err(RuntimeError::NotInitialized.into());
        }
        for done in 0..generations {
            if cancel.load(Ordering::Relaxed) {
                info!(done, "cancelled");
                return Ok(done);
            }
            self.enhance()?;
        }
        Ok(generations)
    }

    pub fn is_initialized(&self) -> bool {
        self.run.is_some()
    }

    /// Get the number of generations since the last initialization.
    pub fn generation(&self) -> u64 {
        self.run.as_ref().map_or(0, |run| run.generation)
    }

    /// Get the best individual found since the last initialization.
    pub fn best(&self) -> Option<&Individual<G>> {
        self.run.as_ref().map(|run| &run.best)
    }

    /// Get the current populations of the islands.
    pub fn islands(&self) -> &[Population<G>] {
        match &self.run {
            Some(run) => &run.islands,
            None => &[],
        }
    }

    /// Get the topology of the current run.
    pub fn topology(&self) -> Option<&Topology> {
        self.run.as_ref().map(|run| &run.topology)
    }

    /// Get the number of migration rounds since the last initialization.
    pub fn migrations(&self) -> u64 {
        self.run.as_ref().map_or(0, |run| run.migrator.rounds())
    }
}
