//! GRASP's randomized constructor, grounded on the original
//! `grasp.cpp::randomized_constructor_simple` reference implementation.

use crate::error::ConstructionError;
use crate::objective::rank_requests_by_metric;
use crate::problem::Instance;
use crate::solution::{Route, Solution};
use crate::types::{Demand, NodeId};
use rand::Rng;

#[derive(Copy, Clone, Debug)]
pub struct GraspParams {
    /// RCL size fraction: `max(1, ceil(alpha * remaining))`.
    pub alpha: f64,
    pub max_tries: usize,
    /// Mixing parameter for the ranking metric.
    pub a: f64,
}

impl Default for GraspParams {
    fn default() -> Self {
        GraspParams { alpha: 0.3, max_tries: 100, a: 0.9 }
    }
}

fn is_capacity_feasible(instance: &Instance, route: &[NodeId]) -> bool {
    let mut running: Demand = 0;
    for &node in route {
        running += instance.load_change[node.index()];
        if running < 0 || running > instance.capacity {
            return false;
        }
    }
    true
}

fn insert_pair(route: &[NodeId], ip: usize, jp: usize, pickup: NodeId, delivery: NodeId) -> Vec<NodeId> {
    let mut result = Vec::with_capacity(route.len() + 2);
    result.extend_from_slice(&route[0..ip]);
    result.push(pickup);
    result.extend_from_slice(&route[ip..jp]);
    result.push(delivery);
    result.extend_from_slice(&route[jp..]);
    result
}

pub fn grasp_construction<R: Rng>(
    instance: &Instance,
    params: &GraspParams,
    rng: &mut R,
) -> Result<Solution, ConstructionError> {
    let mut remaining = rank_requests_by_metric(instance, params.a);
    let mut routes: Vec<Vec<NodeId>> = vec![Vec::new(); instance.n_vehicles];
    let mut served = 0usize;

    while served < instance.gamma && !remaining.is_empty() {
        let rcl_size = ((params.alpha * remaining.len() as f64).ceil() as usize)
            .max(1)
            .min(remaining.len());
        let pick = rng.random_range(0..rcl_size);
        let request = remaining.remove(pick);

        let pickup = instance.pickup_node(request);
        let delivery = instance.delivery_node(request);

        for _ in 0..params.max_tries {
            let vehicle = rng.random_range(0..instance.n_vehicles);
            let route_len = routes[vehicle].len();
            let ip = rng.random_range(0..=route_len);
            let jp = rng.random_range(ip..=route_len);
            let candidate = insert_pair(&routes[vehicle], ip, jp, pickup, delivery);
            if is_capacity_feasible(instance, &candidate) {
                routes[vehicle] = candidate;
                served += 1;
                break;
            }
        }
        // If every attempt failed, the request is dropped for this construction run.
    }

    let routes: Vec<Route> = routes
        .into_iter()
        .map(|nodes| Route::from_nodes(instance, nodes))
        .collect();
    let solution = Solution::from_routes(instance, routes);
    let served = solution.served_count(instance);
    if served < instance.gamma {
        return Err(ConstructionError::GammaUnreachable { served, gamma: instance.gamma });
    }
    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Fairness;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn produces_feasible_solution() {
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
            Instance::from_raw(3, 1, 10, 2, 0.0, Fairness::Jain, vec![1, 1, 10], coords).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(9);
        let solution = grasp_construction(&instance, &GraspParams::default(), &mut rng).unwrap();
        assert!(solution.is_feasible(&instance));
    }

    #[test]
    fn small_alpha_still_inserts_into_empty_route() {
        let coords = vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)];
        let instance = Instance::from_raw(1, 1, 10, 1, 0.0, Fairness::Jain, vec![1], coords).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let params = GraspParams { alpha: 0.01, ..GraspParams::default() };
        let solution = grasp_construction(&instance, &params, &mut rng).unwrap();
        assert_eq!(solution.served_count(&instance), 1);
    }
}
