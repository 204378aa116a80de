//! Swap two nodes within the same route.
//!
//! The naive source only checked capacity feasibility after a swap, which
//! let a move through that reversed a request's pickup/delivery order. This
//! version also checks precedence. It likewise used a hardcoded Jain term
//! in its delta regardless of which fairness index the instance was
//! configured with; this version looks up the configured index.

use super::{fairness_aware_delta, neighbor_at, Move, MAX_RANDOM_TRIES};
use crate::feasibility;
use crate::problem::Instance;
use crate::solution::Solution;
use crate::types::{Distance, NodeId};
use rand::Rng;

pub fn generate(instance: &Instance, solution: &Solution) -> Vec<Move> {
    let mut moves = Vec::new();
    for (route_idx, route) in solution.routes().iter().enumerate() {
        let len = route.len();
        for i in 0..len {
            for j in (i + 1)..len {
                let mv = Move::IntraSwap { route: route_idx, i, j };
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
    if n_routes == 0 {
        return None;
    }
    for _ in 0..MAX_RANDOM_TRIES {
        let route_idx = rng.random_range(0..n_routes);
        let len = solution.route(route_idx).len();
        if len < 2 {
            continue;
        }
        let i = rng.random_range(0..len);
        let mut j = rng.random_range(0..len);
        if i == j {
            continue;
        }
        let (i, j) = if i < j { (i, j) } else { (j, i) };
        let mv = Move::IntraSwap { route: route_idx, i, j };
        if is_valid(instance, solution, &mv) {
            return Some(mv);
        }
    }
    None
}

fn swapped_nodes(solution: &Solution, route: usize, i: usize, j: usize) -> Vec<NodeId> {
    let mut nodes = solution.route(route).nodes().to_vec();
    nodes.swap(i, j);
    nodes
}

pub fn is_valid(instance: &Instance, solution: &Solution, mv: &Move) -> bool {
    let Move::IntraSwap { route, i, j } = *mv else { return false };
    if route >= solution.routes().len() || i >= j || j >= solution.route(route).len() {
        return false;
    }
    let nodes = swapped_nodes(solution, route, i, j);
    feasibility::is_feasible(instance, &nodes)
}

pub fn calc_delta(instance: &Instance, solution: &Solution, mv: &Move) -> Distance {
    let Move::IntraSwap { route, i, j } = *mv else { return 0.0 };
    let r = solution.route(route);
    let nodes = r.nodes();
    let depot = NodeId::DEPOT;
    let x = nodes[i];
    let y = nodes[j];

    let old_edges_removed;
    let new_edges_added;
    if j == i + 1 {
        let a = neighbor_at(nodes, i as isize - 1, depot);
        let d = neighbor_at(nodes, j as isize + 1, depot);
        old_edges_removed = instance.dist(a, x) + instance.dist(x, y) + instance.dist(y, d);
        new_edges_added = instance.dist(a, y) + instance.dist(y, x) + instance.dist(x, d);
    } else {
        let a = neighbor_at(nodes, i as isize - 1, depot);
        let b = neighbor_at(nodes, i as isize + 1, depot);
        let c = neighbor_at(nodes, j as isize - 1, depot);
        let d = neighbor_at(nodes, j as isize + 1, depot);
        old_edges_removed =
            instance.dist(a, x) + instance.dist(x, b) + instance.dist(c, y) + instance.dist(y, d);
        new_edges_added =
            instance.dist(a, y) + instance.dist(y, b) + instance.dist(c, x) + instance.dist(x, d);
    }
    let delta_d = new_edges_added - old_edges_removed;
    let new_route_distance = r.distance() + delta_d;

    fairness_aware_delta(instance, &solution.routes_distances(), &[(route, new_route_distance)])
}

pub fn apply(instance: &Instance, solution: &Solution, mv: &Move) -> Solution {
    let Move::IntraSwap { route, i, j } = *mv else {
        return solution.clone();
    };
    let nodes = swapped_nodes(solution, route, i, j);
    let mut routes = solution.routes().to_vec();
    routes[route].set_nodes(instance, nodes);
    Solution::from_routes(instance, routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution::Route;
    use crate::types::{Fairness, RequestId};

    fn toy_instance() -> Instance {
        let coords = vec![
            (0.0, 0.0),
            (1.0, 0.0),
            (0.0, 1.0),
            (2.0, 0.0),
            (0.0, 2.0),
        ];
        Instance::from_raw(2, 1, 10, 2, 1.0, Fairness::Jain, vec![3, 5], coords).unwrap()
    }

    #[test]
    fn reversing_precedence_is_rejected() {
        let instance = toy_instance();
        let r1 = RequestId::from_index(0);
        let r2 = RequestId::from_index(1);
        // pickup1, pickup2, delivery1, delivery2: swapping positions 0 and 2
        // would put delivery1 before pickup1.
        let nodes = vec![
            instance.pickup_node(r1),
            instance.pickup_node(r2),
            instance.delivery_node(r1),
            instance.delivery_node(r2),
        ];
        let route = Route::from_nodes(&instance, nodes);
        let solution = Solution::from_routes(&instance, vec![route]);
        let mv = Move::IntraSwap { route: 0, i: 0, j: 2 };
        assert!(!is_valid(&instance, &solution, &mv));
    }

    #[test]
    fn valid_swap_recomputes_distance() {
        let instance = toy_instance();
        let r1 = RequestId::from_index(0);
        let r2 = RequestId::from_index(1);
        let nodes = vec![
            instance.pickup_node(r1),
            instance.pickup_node(r2),
            instance.delivery_node(r2),
            instance.delivery_node(r1),
        ];
        let route = Route::from_nodes(&instance, nodes);
        let solution = Solution::from_routes(&instance, vec![route]);
        let mv = Move::IntraSwap { route: 0, i: 1, j: 2 };
        assert!(is_valid(&instance, &solution, &mv));
        let delta = calc_delta(&instance, &solution, &mv);
        let applied = apply(&instance, &solution, &mv);
        let expected_delta = applied.total_distance - solution.total_distance;
        assert!((delta - expected_delta).abs() < 1e-9);
    }
}
