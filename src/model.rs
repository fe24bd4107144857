//! Models advance a single island by one generation.

use crate::error::RuntimeError;
use crate::individual::{Individual, Objective, uuid4};
use crate::population::Population;
use crate::strategy::{Crossover, Fitness, Genome, Mutator, Selector};
use rand::RngCore;
use rayon::prelude::*;

/// One generational step of evolution within an island.
///
/// Implementations consume a fully evaluated population and must return a
/// new population of the same size in which every individual is evaluated.
pub trait Model<G>: Send + Sync {
    fn step(
        &self,
        population: &Population<G>,
        fitness: &dyn Fitness<G>,
        objective: Objective,
        rng: &mut dyn RngCore,
    ) -> Result<Population<G>, RuntimeError>;
}

/// Replaces the whole population with offspring every generation.
///
/// Parents are chosen by the selector and mated in consecutive pairs. The
/// offspring are optionally mutated and then evaluated in parallel. The best
/// `elites` members of the old generation survive unchanged.
pub struct Generational<G> {
    selector: Box<dyn Selector<G>>,
    crossover: Box<dyn Crossover<G>>,
    mutator: Option<Box<dyn Mutator<G>>>,
    elites: usize,
}

impl<G> Generational<G> {
    pub fn new(selector: impl Selector<G> + 'static, crossover: impl Crossover<G> + 'static) -> Self {
        Self {
            selector: Box::new(selector),
            crossover: Box::new(crossover),
            mutator: None,
            elites: 0,
        }
    }

    pub fn with_mutator(mut self, mutator: impl Mutator<G> + 'static) -> Self {
        self.mutator = Some(Box::new(mutator));
        self
    }

    pub fn with_elites(mut self, elites: usize) -> Self {
        self.elites = elites;
        self
    }
}

impl<G: Genome> Model<G> for Generational<G> {
    fn step(
        &self,
        population: &Population<G>,
        fitness: &dyn Fitness<G>,
        objective: Objective,
        rng: &mut dyn RngCore,
    ) -> Result<Population<G>, RuntimeError> {
        let size = population.len();
        if size == 0 {
            return Ok(Population::default());
        }
        let parents = self.selector.select(population, size, objective, rng);
        if parents.len() != size {
            return Err(RuntimeError::SelectionSize {
                expected: size,
                found: parents.len(),
            });
        }

        let elites = self.elites.min(size);
        let nbr_offspring = size - elites;
        let mut offspring = Vec::with_capacity(nbr_offspring);
        let mut pair = 0;
        while offspring.len() < nbr_offspring {
            let mother = &parents[pair % size];
            let father = &parents[(pair + 1) % size];
            pair += 2;
            let genomes = self.crossover.cross(&mother.genome, &father.genome, rng);
            if genomes.is_empty() {
                return Err(RuntimeError::EmptyOffspring);
            }
            let generation = mother.generation.max(father.generation) + 1;
            for mut genome in genomes.into_iter().take(nbr_offspring - offspring.len()) {
                if let Some(mutator) = &self.mutator {
                    mutator.mutate(&mut genome, rng);
                }
                let lineage = vec![mother.name.clone(), father.name.clone()];
                offspring.push((uuid4(rng), genome, lineage, generation));
            }
        }

        let mut next: Vec<Individual<G>> = Vec::with_capacity(size);
        if elites > 0 {
            let mut ranked = population.clone();
            ranked.sort(objective);
            next.extend(ranked.into_iter().take(elites));
        }
        let offspring = offspring
            .into_par_iter()
            .map(|(name, genome, lineage, generation)| Individual::child(name, genome, lineage, generation, fitness))
            .collect::<Result<Vec<_>, _>>()?;
        next.extend(offspring);
        Ok(next.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::{CrossPoint, CrossUniformF, MutNormalF, SelElitism, SelTournament};
    use crate::population::tests::numbered;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn first_gene(genome: &Vec<f64>) -> f64 {
        genome[0]
    }

    #[test]
    fn preserves_size() {
        let rng = &mut StdRng::seed_from_u64(1);
        let model: Generational<Vec<f64>> =
            Generational::new(SelTournament::default(), CrossUniformF).with_mutator(MutNormalF::new(0.5, 0.1).unwrap());
        for size in [1, 2, 7, 30] {
            let population = numbered(size);
            let next = model.step(&population, &first_gene, Objective::Maximize, rng).unwrap();
            assert_eq!(next.len(), size);
            for individual in next.iter() {
                assert_eq!(individual.fitness, first_gene(&individual.genome));
                assert_eq!(individual.generation, 1);
                assert_eq!(individual.parents.len(), 2);
            }
        }
        assert!(model.step(&numbered(0), &first_gene, Objective::Maximize, rng).unwrap().is_empty());
    }

    #[test]
    fn elitism_keeps_best() {
        let rng = &mut StdRng::seed_from_u64(2);
        let population = numbered(10);
        let model: Generational<Vec<f64>> = Generational::new(SelTournament::default(), CrossPoint).with_elites(2);
        let next = model.step(&population, &first_gene, Objective::Minimize, rng).unwrap();
        assert_eq!(next.len(), 10);
        assert_eq!(next.individuals()[0], population.individuals()[0]);
        assert_eq!(next.individuals()[1], population.individuals()[1]);

        // More elites than individuals copies the whole population, sorted.
        let model: Generational<Vec<f64>> = Generational::new(SelElitism, CrossPoint).with_elites(20);
        let next = model.step(&population, &first_gene, Objective::Maximize, rng).unwrap();
        let fitness: Vec<f64> = next.iter().map(|individual| individual.fitness).collect();
        assert_eq!(fitness, [9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0, 0.0]);
    }

    #[test]
    fn seeded_offspring() {
        let population = numbered(6);
        let model: Generational<Vec<f64>> = Generational::new(SelTournament::default(), CrossUniformF);
        let a = model.step(&population, &first_gene, Objective::Maximize, &mut StdRng::seed_from_u64(4)).unwrap();
        let b = model.step(&population, &first_gene, Objective::Maximize, &mut StdRng::seed_from_u64(4)).unwrap();
        assert_eq!(a, b);
        let c = model.step(&population, &first_gene, Objective::Maximize, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_ne!(a.individuals()[0].name, c.individuals()[0].name);
    }

    #[derive(Debug)]
    struct Stingy;

    impl Selector<Vec<f64>> for Stingy {
        fn select(
            &self,
            population: &Population<Vec<f64>>,
            _count: usize,
            _objective: Objective,
            _rng: &mut dyn RngCore,
        ) -> Vec<Individual<Vec<f64>>> {
            population.individuals()[..1].to_vec()
        }
    }

    #[derive(Debug)]
    struct Barren;

    impl Crossover<Vec<f64>> for Barren {
        fn cross(&self, _mother: &Vec<f64>, _father: &Vec<f64>, _rng: &mut dyn RngCore) -> Vec<Vec<f64>> {
            Vec::new()
        }
    }

    #[test]
    fn malformed_strategies() {
        let rng = &mut StdRng::seed_from_u64(3);
        let population = numbered(5);
        let result = Generational::<Vec<f64>>::new(Stingy, CrossUniformF).step(&population, &first_gene, Objective::Maximize, rng);
        assert_eq!(result, Err(RuntimeError::SelectionSize { expected: 5, found: 1 }));
        let result = Generational::<Vec<f64>>::new(SelElitism, Barren).step(&population, &first_gene, Objective::Maximize, rng);
        assert_eq!(result, Err(RuntimeError::EmptyOffspring));
        let nan = |_: &Vec<f64>| f64::NAN;
        let result = Generational::<Vec<f64>>::new(SelElitism, CrossUniformF).step(&population, &nan, Objective::Maximize, rng);
        assert!(matches!(result, Err(RuntimeError::InvalidFitness(_))));
    }
}
