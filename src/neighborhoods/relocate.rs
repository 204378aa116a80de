//! Move a whole request (its pickup and delivery node, kept together) from
//! one vehicle's route to the end of another's.
//!
//! Three issues in the naive version are fixed here: `is_valid` checked only
//! the destination route's capacity feasibility, not the source's (removal
//! can't make a route infeasible, but the check was absent for the
//! destination append, which is where it matters); `calc_delta` computed the
//! source route's new distance over the *unmodified* node list, because the
//! request's own nodes were filtered with a predicate that never matched
//! anything; and `apply` built the new routes but returned `sol` instead of
//! the value it constructed.

use super::{fairness_aware_delta, Move, MAX_RANDOM_TRIES};
use crate::feasibility;
use crate::objective::route_distance;
use crate::problem::Instance;
use crate::solution::Solution;
use crate::types::{Distance, RequestId};
use rand::Rng;

pub fn generate(instance: &Instance, solution: &Solution) -> Vec<Move> {
    let mut moves = Vec::new();
    let n_routes = solution.routes().len();
    for from in 0..n_routes {
        for request in solution.route(from).requests(instance) {
            for to in 0..n_routes {
                if to == from {
                    continue;
                }
                let mv = Move::Relocate { from, to, request };
                if is_valid(instance, solution, &mv) {
                    moves.push(mv);
                }
            }
        }
    }
    moves
}

pub fn generate_random<R: Rng>(instance: &Instance, solution: &Solution, rng: &mut R) -> Option<Move> {
    let n_routes = solution.routes().len();
    if n_routes < 2 {
        return None;
    }
    for _ in 0..MAX_RANDOM_TRIES {
        let from = rng.random_range(0..n_routes);
        let requests: Vec<RequestId> = solution.route(from).requests(instance).collect();
        if requests.is_empty() {
            continue;
        }
        let request = requests[rng.random_range(0..requests.len())];
        let mut to = rng.random_range(0..n_routes);
        if to == from {
            to = (to + 1) % n_routes;
        }
        let mv = Move::Relocate { from, to, request };
        if is_valid(instance, solution, &mv) {
            return Some(mv);
        }
    }
    None
}

/// The `from` route with `request`'s pickup/delivery nodes removed, and the
/// `to` route with them appended at the end.
fn relocated_routes(instance: &Instance, solution: &Solution, mv: &Move) -> (Vec<crate::types::NodeId>, Vec<crate::types::NodeId>) {
    let Move::Relocate { from, to, request } = *mv else {
        unreachable!()
    };
    let pickup = instance.pickup_node(request);
    let delivery = instance.delivery_node(request);

    let new_from: Vec<_> = solution
        .route(from)
        .nodes()
        .iter()
        .copied()
        .filter(|&node| node != pickup && node != delivery)
        .collect();

    let mut new_to = solution.route(to).nodes().to_vec();
    new_to.push(pickup);
    new_to.push(delivery);

    (new_from, new_to)
}

pub fn is_valid(instance: &Instance, solution: &Solution, mv: &Move) -> bool {
    let Move::Relocate { from, to, request: _ } = *mv else { return false };
    let n_routes = solution.routes().len();
    if from == to || from >= n_routes || to >= n_routes {
        return false;
    }
    let (new_from, new_to) = relocated_routes(instance, solution, mv);
    feasibility::is_feasible(instance, &new_from) && feasibility::is_feasible(instance, &new_to)
}

pub fn calc_delta(instance: &Instance, solution: &Solution, mv: &Move) -> Distance {
    let Move::Relocate { from, to, request: _ } = *mv else { return 0.0 };
    let (new_from, new_to) = relocated_routes(instance, solution, mv);
    let new_from_dist = route_distance(instance, &new_from);
    let new_to_dist = route_distance(instance, &new_to);

    fairness_aware_delta(
        instance,
        &solution.routes_distances(),
        &[(from, new_from_dist), (to, new_to_dist)],
    )
}

pub fn apply(instance: &Instance, solution: &Solution, mv: &Move) -> Solution {
    let Move::Relocate { from, to, request: _ } = *mv else {
        return solution.clone();
    };
    let (new_from, new_to) = relocated_routes(instance, solution, mv);
    let mut routes = solution.routes().to_vec();
    routes[from].set_nodes(instance, new_from);
    routes[to].set_nodes(instance, new_to);
    Solution::from_routes(instance, routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution::Route;
    use crate::types::Fairness;

    fn two_vehicle_instance() -> Instance {
        let coords = vec![
            (0.0, 0.0),
            (1.0, 0.0),
            (0.0, 1.0),
            (2.0, 0.0),
            (0.0, 2.0),
        ];
        Instance::from_raw(2, 2, 10, 2, 1.0, Fairness::Jain, vec![3, 5], coords).unwrap()
    }

    #[test]
    fn relocate_removes_request_from_source() {
        let instance = two_vehicle_instance();
        let r1 = RequestId::from_index(0);
        let r2 = RequestId::from_index(1);
        let route0 = Route::from_nodes(
            &instance,
            vec![instance.pickup_node(r1), instance.delivery_node(r1), instance.pickup_node(r2), instance.delivery_node(r2)],
        );
        let route1 = Route::empty();
        let solution = Solution::from_routes(&instance, vec![route0, route1]);

        let mv = Move::Relocate { from: 0, to: 1, request: r2 };
        assert!(is_valid(&instance, &solution, &mv));
        let applied = apply(&instance, &solution, &mv);
        assert_eq!(applied.vehicle_of(&instance, r2), Some(1));
        assert_eq!(applied.route(0).requests(&instance).count(), 1);
        assert!(!applied.route(0).nodes().contains(&instance.pickup_node(r2)));
    }

    #[test]
    fn delta_matches_actual_objective_change() {
        let instance = two_vehicle_instance();
        let r1 = RequestId::from_index(0);
        let r2 = RequestId::from_index(1);
        let route0 = Route::from_nodes(
            &instance,
            vec![instance.pickup_node(r1), instance.delivery_node(r1), instance.pickup_node(r2), instance.delivery_node(r2)],
        );
        let route1 = Route::empty();
        let solution = Solution::from_routes(&instance, vec![route0, route1]);
        let mv = Move::Relocate { from: 0, to: 1, request: r2 };
        let delta = calc_delta(&instance, &solution, &mv);
        let applied = apply(&instance, &solution, &mv);
        let before = solution.objective(&instance).unwrap();
        let after = applied.objective(&instance).unwrap();
        assert!((delta - (after - before)).abs() < 1e-6);
    }
}
