//! Genetic algorithm over the boolean encoding: a population seeded one
//! third from deterministic construction and two thirds from beam
//! construction, recombined by producing one offspring for every unordered
//! pair of parents via the encoding's own crossover, mutated by `k2` uniform
//! `(request, vehicle)` reassignments, and carried forward by keeping the
//! `k1` best-objective offspring of each generation. Grounded on the
//! original `genetic.cpp` reference implementation.

use crate::constructors::{beam_construction, deterministic_construction};
use crate::encoding::{Encoding, DEFAULT_BEAM_WIDTH};
use crate::problem::Instance;
use crate::types::{Distance, RequestId};
use rand::Rng;

#[derive(Clone, Debug)]
pub struct GeneticParams {
    /// Population size, k1. Must be at least 3 for reproduction to produce
    /// more offspring than the population it replaces.
    pub population_size: usize,
    pub generations: usize,
    /// Number of uniformly random (request, vehicle) reassignments applied
    /// to each offspring, k2.
    pub mutation_draws: usize,
}

impl Default for GeneticParams {
    fn default() -> Self {
        GeneticParams { population_size: 10, generations: 100, mutation_draws: 2 }
    }
}

/// One third deterministic construction, two thirds beam construction
/// (a=0.9, width=5). Beam construction has no internal randomness, so
/// repeated calls legitimately produce duplicate encodings in the seeded
/// population.
fn seed_population<R: Rng>(instance: &Instance, size: usize, rng: &mut R) -> Vec<Encoding> {
    let mut population = Vec::with_capacity(size);
    let dc_count = size / 3;

    for _ in 0..dc_count {
        if let Ok(dc) = deterministic_construction(instance, rng) {
            population.push(Encoding::from_solution(instance, &dc, DEFAULT_BEAM_WIDTH));
        }
    }
    while population.len() < size {
        match beam_construction(instance, 0.9, 5) {
            Ok(bs) => population.push(Encoding::from_solution(instance, &bs, DEFAULT_BEAM_WIDTH)),
            Err(_) => break,
        }
    }

    population
}

/// k2 uniformly random (request, vehicle) reassignments.
fn mutate<R: Rng>(encoding: &mut Encoding, instance: &Instance, k2: usize, rng: &mut R) {
    if k2 == 0 {
        return;
    }
    for _ in 0..k2 {
        let r = RequestId::from_index(rng.random_range(0..instance.n));
        let vehicle = rng.random_range(0..encoding.num_vehicles());
        encoding.set_vehicle_for_request(r, vehicle);
    }
}

/// One offspring for every unordered pair (i, j) of parents.
fn reproduce<R: Rng>(parents: &[Encoding], instance: &Instance, rng: &mut R) -> Vec<Encoding> {
    let mut offspring = Vec::with_capacity(parents.len() * parents.len().saturating_sub(1) / 2);
    for i in 0..parents.len() {
        for j in (i + 1)..parents.len() {
            offspring.push(parents[i].add(&parents[j], instance, rng));
        }
    }
    offspring
}

fn best_of(population: &[Encoding], instance: &Instance) -> Option<(Distance, Encoding)> {
    population
        .iter()
        .filter_map(|e| e.decode(instance).objective(instance).ok().map(|cost| (cost, e.clone())))
        .fold(None, |acc, (cost, enc)| match &acc {
            Some((best_cost, _)) if *best_cost <= cost => acc,
            _ => Some((cost, enc)),
        })
}

pub fn genetic_algorithm<R: Rng>(
    instance: &Instance,
    params: &GeneticParams,
    rng: &mut R,
) -> Option<(Distance, Encoding)> {
    let population = seed_population(instance, params.population_size, rng);
    if population.len() < 3 {
        return None;
    }

    let mut best = best_of(&population, instance);
    if let Some((cost, _)) = &best {
        tracing::info!(objective = cost, population = population.len(), "genetic algorithm seeded initial population");
    }

    let mut population = population;
    for generation in 0..params.generations {
        let mut offspring = reproduce(&population, instance, rng);
        for child in &mut offspring {
            mutate(child, instance, params.mutation_draws, rng);
        }

        let mut scored: Vec<(Distance, Encoding)> = offspring
            .into_iter()
            .filter_map(|e| e.decode(instance).objective(instance).ok().map(|cost| (cost, e)))
            .collect();
        if scored.is_empty() {
            tracing::debug!(generation, "genetic algorithm generation produced no scoreable offspring");
            continue;
        }
        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        scored.truncate(params.population_size);

        let generation_best = scored[0].0;
        if best.as_ref().map(|(b, _)| generation_best < *b).unwrap_or(true) {
            best = Some(scored[0].clone());
            tracing::info!(generation, objective = generation_best, "genetic algorithm found new incumbent");
        } else {
            tracing::debug!(generation, objective = generation_best, "genetic algorithm generation complete");
        }

        population = scored.into_iter().map(|(_, e)| e).collect();
    }

    if let Some((cost, _)) = &best {
        tracing::info!(objective = cost, "genetic algorithm finished");
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Fairness;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn produces_a_feasible_best_encoding() {
        let coords = vec![
            (0.0, 0.0),
            (1.0, 0.0),
            (0.0, 1.0),
            (10.0, 10.0),
            (2.0, 0.0),
            (0.0, 2.0),
            (11.0, 10.0),
        ];
        let instance =
            Instance::from_raw(3, 1, 10, 2, 1.0, Fairness::Jain, vec![1, 1, 10], coords).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(6);
        let params = GeneticParams { population_size: 6, generations: 10, mutation_draws: 1 };
        let (_, encoding) = genetic_algorithm(&instance, &params, &mut rng).unwrap();
        assert!(encoding.is_encoding_correct());
        assert!(encoding.decode(&instance).is_feasible(&instance));
    }

    #[test]
    fn reproduce_yields_one_offspring_per_unordered_pair() {
        let coords = vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (2.0, 0.0), (0.0, 2.0)];
        let instance = Instance::from_raw(2, 1, 10, 2, 0.0, Fairness::Jain, vec![3, 5], coords).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(9);
        let parents = seed_population(&instance, 5, &mut rng);
        let offspring = reproduce(&parents, &instance, &mut rng);
        assert_eq!(offspring.len(), parents.len() * (parents.len() - 1) / 2);
    }
}
