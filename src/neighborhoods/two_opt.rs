//! Reverse a contiguous segment of a single route, replacing the two edges
//! at its ends. The standard 2-opt move; unlike the swap operator, it needs
//! no special-casing for adjacent positions since the interior of the
//! reversed segment keeps all of its edges (distances are symmetric).

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
                let mv = Move::TwoOpt { route: route_idx, i, j };
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
        let mv = Move::TwoOpt { route: route_idx, i, j };
        if is_valid(instance, solution, &mv) {
            return Some(mv);
        }
    }
    None
}

fn reversed_nodes(solution: &Solution, route: usize, i: usize, j: usize) -> Vec<NodeId> {
    let mut nodes = solution.route(route).nodes().to_vec();
    nodes[i..=j].reverse();
    nodes
}

pub fn is_valid(instance: &Instance, solution: &Solution, mv: &Move) -> bool {
    let Move::TwoOpt { route, i, j } = *mv else { return false };
    if route >= solution.routes().len() || i >= j || j >= solution.route(route).len() {
        return false;
    }
    let nodes = reversed_nodes(solution, route, i, j);
    feasibility::is_feasible(instance, &nodes)
}

pub fn calc_delta(instance: &Instance, solution: &Solution, mv: &Move) -> Distance {
    let Move::TwoOpt { route, i, j } = *mv else { return 0.0 };
    let r = solution.route(route);
    let nodes = r.nodes();
    let depot = NodeId::DEPOT;

    let a = neighbor_at(nodes, i as isize - 1, depot);
    let x = nodes[i];
    let y = nodes[j];
    let d = neighbor_at(nodes, j as isize + 1, depot);

    let delta_d = (instance.dist(a, y) + instance.dist(x, d)) - (instance.dist(a, x) + instance.dist(y, d));
    let new_route_distance = r.distance() + delta_d;

    fairness_aware_delta(instance, &solution.routes_distances(), &[(route, new_route_distance)])
}

pub fn apply(instance: &Instance, solution: &Solution, mv: &Move) -> Solution {
    let Move::TwoOpt { route, i, j } = *mv else {
        return solution.clone();
    };
    let nodes = reversed_nodes(solution, route, i, j);
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
            (3.0, 0.0),
            (3.0, 1.0),
            (0.0, 1.0),
            (0.0, 2.0),
            (3.0, 2.0),
        ];
        Instance::from_raw(3, 1, 20, 3, 1.0, Fairness::Jain, vec![1, 1, 1], coords).unwrap()
    }

    #[test]
    fn delta_matches_recomputed_distance() {
        let instance = toy_instance();
        let nodes: Vec<NodeId> = (1..=instance.num_nodes() - 1).map(NodeId::new).collect();
        let route = Route::from_nodes(&instance, nodes);
        let solution = Solution::from_routes(&instance, vec![route]);
        let mv = Move::TwoOpt { route: 0, i: 1, j: 3 };
        if is_valid(&instance, &solution, &mv) {
            let delta = calc_delta(&instance, &solution, &mv);
            let applied = apply(&instance, &solution, &mv);
            let expected = applied.total_distance - solution.total_distance;
            assert!((delta - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn infeasible_reversal_is_rejected() {
        let instance = toy_instance();
        let r1 = RequestId::from_index(0);
        let r2 = RequestId::from_index(1);
        let r3 = RequestId::from_index(2);
        let nodes = vec![
            instance.pickup_node(r1),
            instance.pickup_node(r2),
            instance.pickup_node(r3),
            instance.delivery_node(r1),
            instance.delivery_node(r2),
            instance.delivery_node(r3),
        ];
        let route = Route::from_nodes(&instance, nodes);
        let solution = Solution::from_routes(&instance, vec![route]);
        // Reversing the whole route puts every delivery before its pickup.
        let mv = Move::TwoOpt { route: 0, i: 0, j: 5 };
        assert!(!is_valid(&instance, &solution, &mv));
    }
}
