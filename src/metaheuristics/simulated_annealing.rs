//! Simulated annealing with a warm-up phase to derive the initial
//! temperature, grounded directly on the original annealing loop:
//! `T0 = -delta_avg / ln(p_accept)`, geometric cooling to a target final
//! temperature over the remaining iterations.

use crate::neighborhoods::NeighborhoodKind;
use crate::problem::Instance;
use crate::solution::Solution;
use crate::step;
use crate::types::Distance;
use rand::Rng;

pub fn simulated_annealing<R: Rng>(
    instance: &Instance,
    mut incumbent: Solution,
    kinds: &[NeighborhoodKind],
    max_iter: usize,
    warmup_iter: usize,
    final_temp: f64,
    p_accept: f64,
    rng: &mut R,
) -> (Distance, Solution) {
    let mut best_cost = incumbent.objective(instance).expect("fairness index mismatch");
    let mut best_solution = incumbent.clone();
    let mut incumbent_cost = best_cost;

    tracing::info!(objective = best_cost, warmup_iter, max_iter, "simulated annealing starting");

    let mut delta_sum = 0.0;
    let mut delta_count = 0usize;

    for iteration in 0..warmup_iter.min(max_iter) {
        let Some((candidate, _)) = step::random_step(instance, &incumbent, kinds, rng) else {
            continue;
        };
        let candidate_cost = candidate.objective(instance).expect("fairness index mismatch");
        let delta_e = candidate_cost - incumbent_cost;

        if delta_e < 0.0 {
            incumbent = candidate;
            incumbent_cost = candidate_cost;
            if incumbent_cost < best_cost {
                best_cost = incumbent_cost;
                best_solution = incumbent.clone();
                tracing::info!(iteration, objective = best_cost, "simulated annealing found new incumbent");
            }
        } else {
            if delta_e > 0.0 {
                delta_sum += delta_e;
                delta_count += 1;
            }
            if rng.random_bool(p_accept) {
                incumbent = candidate;
                incumbent_cost = candidate_cost;
            }
        }
        tracing::debug!(iteration, objective = incumbent_cost, phase = "warmup", "simulated annealing iteration complete");
    }

    let delta_avg = if delta_count > 0 { delta_sum / delta_count as f64 } else { 1.0 };
    let mut temp = -delta_avg / p_accept.ln();
    let remaining = max_iter.saturating_sub(warmup_iter).max(1);
    let alpha = (final_temp / temp).powf(1.0 / remaining as f64);

    tracing::info!(temperature = temp, "simulated annealing warmup complete, initial temperature derived");

    for iteration in warmup_iter..max_iter {
        let Some((candidate, _)) = step::random_step(instance, &incumbent, kinds, rng) else {
            temp *= alpha;
            continue;
        };
        let candidate_cost = candidate.objective(instance).expect("fairness index mismatch");
        let delta_e = candidate_cost - incumbent_cost;

        if delta_e < 0.0 {
            incumbent = candidate;
            incumbent_cost = candidate_cost;
            if incumbent_cost < best_cost {
                best_cost = incumbent_cost;
                best_solution = incumbent.clone();
                tracing::info!(iteration, objective = best_cost, "simulated annealing found new incumbent");
            }
        } else if rng.random_bool((-delta_e / temp).exp().min(1.0)) {
            incumbent = candidate;
            incumbent_cost = candidate_cost;
        }
        temp *= alpha;
        tracing::debug!(iteration, objective = incumbent_cost, temperature = temp, "simulated annealing iteration complete");
    }

    tracing::info!(objective = best_cost, "simulated annealing finished");
    (best_cost, best_solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neighborhoods::ALL_KINDS;
    use crate::solution::Route;
    use crate::types::{Fairness, RequestId};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn finds_a_solution_at_least_as_good_as_the_start() {
        let coords = vec![
            (0.0, 0.0),
            (5.0, 0.0),
            (0.0, 5.0),
            (5.2, 0.0),
            (0.0, 5.2),
        ];
        let instance =
            Instance::from_raw(2, 1, 10, 2, 1.0, Fairness::Jain, vec![1, 1], coords).unwrap();
        let r1 = RequestId::from_index(0);
        let r2 = RequestId::from_index(1);
        let nodes = vec![
            instance.pickup_node(r2),
            instance.pickup_node(r1),
            instance.delivery_node(r2),
            instance.delivery_node(r1),
        ];
        let route = Route::from_nodes(&instance, nodes);
        let initial = Solution::from_routes(&instance, vec![route]);
        let initial_cost = initial.objective(&instance).unwrap();

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(21);
        let (best_cost, best_solution) =
            simulated_annealing(&instance, initial, &ALL_KINDS, 300, 30, 0.01, 0.8, &mut rng);
        assert!(best_cost <= initial_cost + 1e-9);
        assert!(best_solution.is_feasible(&instance));
    }
}
