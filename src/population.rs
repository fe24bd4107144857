use crate::individual::{Individual, Objective};
use rand::RngCore;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// An ordered group of individuals which evolve together.
///
/// The order carries no ranking, but clustering and merging preserve it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct Population<G> {
    individuals: Vec<Individual<G>>,
}

impl<G> Default for Population<G> {
    fn default() -> Self {
        Self {
            individuals: Vec::new(),
        }
    }
}

impl<G> From<Vec<Individual<G>>> for Population<G> {
    fn from(individuals: Vec<Individual<G>>) -> Self {
        Self { individuals }
    }
}

impl<G> FromIterator<Individual<G>> for Population<G> {
    fn from_iter<I: IntoIterator<Item = Individual<G>>>(iter: I) -> Self {
        Self {
            individuals: iter.into_iter().collect(),
        }
    }
}

impl<G> IntoIterator for Population<G> {
    type Item = Individual<G>;
    type IntoIter = std::vec::IntoIter<Individual<G>>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.into_iter()
    }
}

/// Summary of the fitness values in a population.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct FitnessStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl<G> Population<G> {
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn individuals(&self) -> &[Individual<G>] {
        &self.individuals
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Individual<G>> {
        self.individuals.iter()
    }

    /// Get the best individual. Ties go to the earliest one.
    pub fn best(&self, objective: Objective) -> Option<&Individual<G>> {
        let mut best: Option<&Individual<G>> = None;
        for individual in &self.individuals {
            match best {
                Some(current) if !objective.is_better(individual.fitness, current.fitness) => {}
                _ => best = Some(individual),
            }
        }
        best
    }

    /// Sort best first. The sort is stable.
    pub fn sort(&mut self, objective: Objective) {
        self.individuals
            .sort_by(|a, b| objective.compare(a.fitness, b.fitness));
    }

    pub fn shuffle(&mut self, rng: &mut dyn RngCore) {
        self.individuals.shuffle(rng);
    }

    /// Returns None for an empty population.
    pub fn fitness_stats(&self) -> Option<FitnessStats> {
        if self.is_empty() {
            return None;
        }
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for individual in &self.individuals {
            min = min.min(individual.fitness);
            max = max.max(individual.fitness);
            sum += individual.fitness;
        }
        Some(FitnessStats {
            min,
            max,
            mean: sum / self.len() as f64,
        })
    }

    /// Split the population into at most `k` contiguous clusters.
    ///
    /// Every cluster holds `m = min(ceil(n / k), n)` individuals except the
    /// last one, which holds the remainder. Clustering stops once the
    /// individuals run out, so fewer than `k` clusters may be returned. A `k`
    /// of zero is treated as one.
    ///
    /// Concatenating the clusters in order reproduces the population, see
    /// [merge()].
    pub fn cluster(self, k: usize) -> Vec<Population<G>> {
        let n = self.len();
        if n == 0 {
            return Vec::new();
        }
        let m = n.div_ceil(k.max(1)).min(n);
        let mut clusters = Vec::with_capacity(n.div_ceil(m));
        let mut remaining = self.individuals.into_iter();
        loop {
            let chunk: Vec<_> = remaining.by_ref().take(m).collect();
            if chunk.is_empty() {
                break;
            }
            clusters.push(Population::from(chunk));
        }
        clusters
    }
}

/// Concatenate populations into one, in order.
pub fn merge<G>(clusters: impl IntoIterator<Item = Population<G>>) -> Population<G> {
    let mut merged = Population::default();
    for cluster in clusters {
        merged.individuals.extend(cluster.individuals);
    }
    merged
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Individuals whose fitness is their position, for checking the order.
    pub(crate) fn numbered(n: usize) -> Population<Vec<f64>> {
        let rng = &mut StdRng::seed_from_u64(n as u64);
        (0..n)
            .map(|i| Individual::new(vec![i as f64], &|genome: &Vec<f64>| genome[0], rng).unwrap())
            .collect()
    }

    fn sizes(clusters: &[Population<Vec<f64>>]) -> Vec<usize> {
        clusters.iter().map(Population::len).collect()
    }

    fn positions(population: &Population<Vec<f64>>) -> Vec<f64> {
        population.iter().map(|individual| individual.fitness).collect()
    }

    #[test]
    fn cluster_sizes() {
        assert_eq!(sizes(&numbered(7).cluster(2)), [4, 3]);
        assert_eq!(sizes(&numbered(10).cluster(3)), [4, 4, 2]);
        assert_eq!(sizes(&numbered(10).cluster(1)), [10]);
        assert_eq!(sizes(&numbered(5).cluster(5)), [1, 1, 1, 1, 1]);
        assert_eq!(sizes(&numbered(30).cluster(10)), [3; 10]);
    }

    #[test]
    fn cluster_fewer_than_requested() {
        // m = ceil(9 / 6) = 2, and the individuals run out after 5 clusters.
        assert_eq!(sizes(&numbered(9).cluster(6)), [2, 2, 2, 2, 1]);
        assert_eq!(sizes(&numbered(4).cluster(3)), [2, 2]);
    }

    #[test]
    fn cluster_degenerate() {
        assert!(numbered(0).cluster(3).is_empty());
        assert_eq!(sizes(&numbered(4).cluster(0)), [4]);
        assert_eq!(sizes(&numbered(3).cluster(8)), [1, 1, 1]);
    }

    #[test]
    fn merge_sizes() {
        assert_eq!(merge([numbered(1), numbered(1), numbered(1)]).len(), 3);
        assert_eq!(merge([numbered(3), numbered(3), numbered(3)]).len(), 9);
        assert_eq!(merge([numbered(2), numbered(0), numbered(5)]).len(), 7);
        assert!(merge(Vec::<Population<Vec<f64>>>::new()).is_empty());
    }

    #[test]
    fn merge_order() {
        let merged = merge([numbered(2), numbered(3)]);
        assert_eq!(positions(&merged), [0.0, 1.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn best_and_sort() {
        let rng = &mut StdRng::seed_from_u64(9);
        let mut population: Population<Vec<f64>> = [3.0, 9.0, -1.0, 9.0]
            .into_iter()
            .map(|x| Individual::new(vec![x], &|genome: &Vec<f64>| genome[0], rng).unwrap())
            .collect();
        let first_nine = population.individuals()[1].name.clone();
        assert_eq!(population.best(Objective::Maximize).unwrap().name, first_nine);
        assert_eq!(population.best(Objective::Minimize).unwrap().fitness, -1.0);

        population.sort(Objective::Minimize);
        assert_eq!(positions(&population), [-1.0, 3.0, 9.0, 9.0]);
        population.sort(Objective::Maximize);
        assert_eq!(positions(&population), [9.0, 9.0, 3.0, -1.0]);
        assert_eq!(population.individuals()[0].name, first_nine);

        assert!(Population::<Vec<f64>>::default().best(Objective::Maximize).is_none());
    }

    #[test]
    fn stats() {
        let stats = numbered(5).fitness_stats().unwrap();
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.mean, 2.0);
        assert!(numbered(0).fitness_stats().is_none());
    }

    proptest! {
        #[test]
        fn cluster_size_law((n, k) in (1usize..200).prop_flat_map(|n| (Just(n), 1..=n))) {
            let m = n.div_ceil(k).min(n);
            let clusters = numbered(n).cluster(k);
            prop_assert!(clusters.len() <= k);
            for (i, cluster) in clusters.iter().enumerate() {
                prop_assert_eq!(cluster.len(), (n - i * m).min(m));
            }
            prop_assert_eq!(clusters.iter().map(Population::len).sum::<usize>(), n);
        }

        #[test]
        fn cluster_merge_roundtrip((n, k) in (1usize..200).prop_flat_map(|n| (Just(n), 1..=n))) {
            let population = numbered(n);
            let roundtrip = merge(population.clone().cluster(k));
            prop_assert_eq!(roundtrip, population);
        }

        #[test]
        fn merge_additive(counts in proptest::collection::vec(0usize..20, 0..10)) {
            let merged = merge(counts.iter().map(|&count| numbered(count)));
            prop_assert_eq!(merged.len(), counts.iter().sum::<usize>());
        }
    }
}
