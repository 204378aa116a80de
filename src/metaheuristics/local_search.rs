//! Plain hill climbing: repeatedly draw a random move from the best solution
//! found so far and keep it only if it improves. Mirrors the original
//! `local_search` reference loop, generalized from a single mutation
//! operator to the full set of neighborhood kinds.

use crate::neighborhoods::NeighborhoodKind;
use crate::problem::Instance;
use crate::solution::Solution;
use crate::step;
use crate::types::Distance;
use rand::Rng;

pub fn local_search<R: Rng>(
    instance: &Instance,
    initial_solution: Solution,
    kinds: &[NeighborhoodKind],
    max_iter: usize,
    rng: &mut R,
) -> (Distance, Solution) {
    let mut best_solution = initial_solution;
    let mut best_cost = best_solution
        .objective(instance)
        .expect("initial solution's fairness index must match the instance");

    tracing::info!(objective = best_cost, max_iter, "local search starting");

    for iteration in 0..max_iter {
        let Some((candidate, delta)) = step::random_step(instance, &best_solution, kinds, rng) else {
            continue;
        };
        if delta < 0.0 {
            let candidate_cost = candidate.objective(instance).expect("fairness index mismatch");
            if candidate_cost < best_cost {
                best_cost = candidate_cost;
                best_solution = candidate;
                tracing::info!(iteration, objective = best_cost, "local search found new incumbent");
            }
        }
        tracing::debug!(iteration, objective = best_cost, "local search iteration complete");
    }

    tracing::info!(objective = best_cost, "local search finished");
    (best_cost, best_solution)
}
