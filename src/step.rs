//! Single-iteration move selection strategies shared by the metaheuristics:
//! pick a candidate move from one or more neighborhoods, evaluate it, and
//! hand back the resulting solution. Mirrors the original's plain
//! loop-and-compare local search rather than a trait-based step abstraction.

use crate::neighborhoods::{self, Move, NeighborhoodKind};
use crate::problem::Instance;
use crate::solution::Solution;
use crate::types::Distance;
use rand::Rng;

const MAX_FIRST_IMPROVEMENT_DRAWS: usize = 1000;

/// Draws random candidates across `kinds` until an improving one is found or
/// the draw budget is exhausted. Returns the resulting solution and the
/// (negative) delta of the move applied.
pub fn first_improvement<R: Rng>(
    instance: &Instance,
    solution: &Solution,
    kinds: &[NeighborhoodKind],
    rng: &mut R,
) -> Option<(Solution, Distance)> {
    if kinds.is_empty() {
        return None;
    }
    for _ in 0..MAX_FIRST_IMPROVEMENT_DRAWS {
        let kind = kinds[rng.random_range(0..kinds.len())];
        let Some(mv) = neighborhoods::generate_random(kind, instance, solution, rng) else {
            continue;
        };
        let delta = neighborhoods::calc_delta(instance, solution, &mv);
        if delta < 0.0 {
            return Some((neighborhoods::apply(instance, solution, &mv), delta));
        }
    }
    None
}

/// Enumerates every move in every kind of `kinds` and applies the one with
/// the lowest delta, if any is improving.
pub fn best_improvement(
    instance: &Instance,
    solution: &Solution,
    kinds: &[NeighborhoodKind],
) -> Option<(Solution, Distance)> {
    let mut best: Option<(Move, Distance)> = None;
    for &kind in kinds {
        for mv in neighborhoods::generate(kind, instance, solution) {
            let delta = neighborhoods::calc_delta(instance, solution, &mv);
            if best.as_ref().map(|(_, d)| delta < *d).unwrap_or(true) {
                best = Some((mv, delta));
            }
        }
    }
    let (mv, delta) = best?;
    if delta < 0.0 {
        Some((neighborhoods::apply(instance, solution, &mv), delta))
    } else {
        None
    }
}

/// One random move from a randomly chosen kind, applied unconditionally
/// (delta may be positive). Used by simulated annealing's acceptance step,
/// where worsening moves are sometimes accepted.
pub fn random_step<R: Rng>(
    instance: &Instance,
    solution: &Solution,
    kinds: &[NeighborhoodKind],
    rng: &mut R,
) -> Option<(Solution, Distance)> {
    if kinds.is_empty() {
        return None;
    }
    let kind = kinds[rng.random_range(0..kinds.len())];
    let mv = neighborhoods::generate_random(kind, instance, solution, rng)?;
    let delta = neighborhoods::calc_delta(instance, solution, &mv);
    Some((neighborhoods::apply(instance, solution, &mv), delta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neighborhoods::ALL_KINDS;
    use crate::solution::Route;
    use crate::types::{Fairness, RequestId};
    use rand_xoshiro::Xoshiro256PlusPlus;
    use rand::SeedableRng;

    fn instance_with_slack() -> Instance {
        let coords = vec![
            (0.0, 0.0),
            (5.0, 0.0),
            (0.0, 5.0),
            (5.0, 5.0),
            (5.1, 0.0),
            (0.0, 5.1),
        ];
        Instance::from_raw(2, 1, 10, 2, 1.0, Fairness::Jain, vec![1, 1], coords).unwrap()
    }

    #[test]
    fn best_improvement_never_worsens() {
        let instance = instance_with_slack();
        let r1 = RequestId::from_index(0);
        let r2 = RequestId::from_index(1);
        let nodes = vec![
            instance.pickup_node(r1),
            instance.pickup_node(r2),
            instance.delivery_node(r1),
            instance.delivery_node(r2),
        ];
        let route = Route::from_nodes(&instance, nodes);
        let solution = Solution::from_routes(&instance, vec![route]);
        if let Some((improved, delta)) = best_improvement(&instance, &solution, &ALL_KINDS) {
            assert!(delta < 0.0);
            assert!(improved.objective(&instance).unwrap() < solution.objective(&instance).unwrap());
        }
    }

    #[test]
    fn random_step_returns_feasible_solution() {
        let instance = instance_with_slack();
        let r1 = RequestId::from_index(0);
        let r2 = RequestId::from_index(1);
        let nodes = vec![
            instance.pickup_node(r1),
            instance.pickup_node(r2),
            instance.delivery_node(r1),
            instance.delivery_node(r2),
        ];
        let route = Route::from_nodes(&instance, nodes);
        let solution = Solution::from_routes(&instance, vec![route]);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        if let Some((next, _delta)) = random_step(&instance, &solution, &ALL_KINDS, &mut rng) {
            assert!(next.is_feasible(&instance));
        }
    }
}
