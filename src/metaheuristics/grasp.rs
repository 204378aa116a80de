//! GRASP: repeated randomized construction followed by local refinement,
//! keeping the best solution seen across restarts.

use crate::constructors::{grasp_construction, GraspParams};
use crate::metaheuristics::vnd::variable_neighborhood_descent;
use crate::neighborhoods::NeighborhoodKind;
use crate::problem::Instance;
use crate::solution::Solution;
use crate::types::Distance;
use rand::Rng;

#[derive(Clone, Debug)]
pub struct GraspMetaheuristicParams {
    pub construction: GraspParams,
    pub restarts: usize,
}

impl Default for GraspMetaheuristicParams {
    fn default() -> Self {
        GraspMetaheuristicParams { construction: GraspParams::default(), restarts: 20 }
    }
}

pub fn grasp_metaheuristic<R: Rng>(
    instance: &Instance,
    params: &GraspMetaheuristicParams,
    kinds: &[NeighborhoodKind],
    rng: &mut R,
) -> Option<(Distance, Solution)> {
    let mut best: Option<(Distance, Solution)> = None;

    tracing::info!(restarts = params.restarts, "grasp starting");

    for restart in 0..params.restarts {
        let Ok(constructed) = grasp_construction(instance, &params.construction, rng) else {
            tracing::debug!(restart, "grasp restart failed construction");
            continue;
        };
        let (cost, refined) = variable_neighborhood_descent(instance, constructed, kinds);
        if best.as_ref().map(|(best_cost, _)| cost < *best_cost).unwrap_or(true) {
            best = Some((cost, refined));
            tracing::info!(restart, objective = cost, "grasp found new incumbent");
        } else {
            tracing::debug!(restart, objective = cost, "grasp restart complete");
        }
    }

    match &best {
        Some((cost, _)) => tracing::info!(objective = cost, "grasp finished"),
        None => tracing::info!("grasp finished with no feasible solution"),
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neighborhoods::ALL_KINDS;
    use crate::types::Fairness;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn produces_a_feasible_solution_across_restarts() {
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
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(4);
        let params = GraspMetaheuristicParams { restarts: 5, ..Default::default() };
        let (_, solution) = grasp_metaheuristic(&instance, &params, &ALL_KINDS, &mut rng).unwrap();
        assert!(solution.is_feasible(&instance));
    }
}
