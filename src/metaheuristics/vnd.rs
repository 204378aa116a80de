//! Variable neighborhood descent: cycle through an ordered list of
//! neighborhood kinds, taking the best move each kind offers. An improvement
//! restarts the cycle from the first kind; exhausting the list with no
//! improvement anywhere stops the search.

use crate::neighborhoods::NeighborhoodKind;
use crate::problem::Instance;
use crate::solution::Solution;
use crate::step;
use crate::types::Distance;

pub fn variable_neighborhood_descent(
    instance: &Instance,
    initial_solution: Solution,
    kinds: &[NeighborhoodKind],
) -> (Distance, Solution) {
    let mut current = initial_solution;
    let mut cost = current.objective(instance).expect("fairness index mismatch");

    tracing::info!(objective = cost, "variable neighborhood descent starting");

    if kinds.is_empty() {
        return (cost, current);
    }

    let mut k = 0;
    let mut iteration = 0;
    while k < kinds.len() {
        match step::best_improvement(instance, &current, &kinds[k..k + 1]) {
            Some((candidate, _delta)) => {
                current = candidate;
                cost = current.objective(instance).expect("fairness index mismatch");
                k = 0;
                tracing::info!(iteration, objective = cost, "variable neighborhood descent found new incumbent");
            }
            None => {
                tracing::debug!(iteration, neighborhood = ?kinds[k], "variable neighborhood descent neighborhood exhausted");
                k += 1;
            }
        }
        iteration += 1;
    }

    tracing::info!(objective = cost, "variable neighborhood descent finished");
    (cost, current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neighborhoods::ALL_KINDS;
    use crate::solution::Route;
    use crate::types::{Fairness, RequestId};

    #[test]
    fn converges_to_a_local_optimum() {
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

        let (final_cost, final_solution) = variable_neighborhood_descent(&instance, initial, &ALL_KINDS);
        assert!(final_cost <= initial_cost + 1e-9);
        assert!(final_solution.is_feasible(&instance));
    }
}
