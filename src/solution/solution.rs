use crate::objective::{all_route_distances, objective, fairness_value};
use crate::problem::Instance;
use crate::solution::route::Route;
use crate::types::{Distance, Fairness, RequestId};
use std::collections::HashSet;

/// A candidate solution: one route per vehicle, plus cached aggregate
/// distances and the fairness index it was last scored with.
#[derive(Debug, Clone)]
pub struct Solution {
    routes: Vec<Route>,
    pub total_distance: Distance,
    pub sum_of_squares: Distance,
    pub fairness: Fairness,
}

impl Solution {
    /// An all-empty solution (every vehicle idle).
    pub fn empty(instance: &Instance) -> Self {
        let routes = vec![Route::empty(); instance.n_vehicles];
        let mut solution = Solution {
            routes,
            total_distance: 0.0,
            sum_of_squares: 0.0,
            fairness: instance.fairness,
        };
        solution.recompute_cached_values(instance);
        solution
    }

    pub fn from_routes(instance: &Instance, routes: Vec<Route>) -> Self {
        debug_assert_eq!(routes.len(), instance.n_vehicles);
        let mut solution = Solution {
            routes,
            total_distance: 0.0,
            sum_of_squares: 0.0,
            fairness: instance.fairness,
        };
        solution.recompute_cached_values(instance);
        solution
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn routes_mut(&mut self) -> &mut [Route] {
        &mut self.routes
    }

    pub fn route(&self, vehicle_idx: usize) -> &Route {
        &self.routes[vehicle_idx]
    }

    pub fn routes_distances(&self) -> Vec<Distance> {
        self.routes.iter().map(|r| r.distance()).collect()
    }

    /// Recomputes `total_distance`/`sum_of_squares` from each route's cached
    /// per-route distance. Does *not* re-derive per-route
    /// distances from node sequences — call `Route::recompute_distance` first
    /// if a route's nodes were mutated directly.
    pub fn recompute_cached_values(&mut self, instance: &Instance) {
        let distances = self.routes_distances();
        self.total_distance = distances.iter().sum();
        self.sum_of_squares = distances.iter().map(|d| d * d).sum();
        self.fairness = instance.fairness;
    }

    /// The objective value of this solution. Panics in debug builds if
    /// `self.fairness` has drifted from `instance.fairness` — that mismatch is
    /// a programming error, not a runtime condition callers should handle.
    pub fn objective(&self, instance: &Instance) -> Result<Distance, crate::error::ObjectiveError> {
        debug_assert_eq!(self.fairness, instance.fairness);
        let distances = self.routes_distances();
        let fairness = fairness_value(&distances, self.fairness)?;
        Ok(objective(self.total_distance, fairness, instance.rho))
    }

    /// The distinct requests served across all routes.
    pub fn served_requests(&self, instance: &Instance) -> HashSet<RequestId> {
        self.routes.iter().flat_map(|r| r.requests(instance)).collect()
    }

    pub fn served_count(&self, instance: &Instance) -> usize {
        self.served_requests(instance).len()
    }

    /// Which vehicle (by index) serves `r`, if any.
    pub fn vehicle_of(&self, instance: &Instance, r: RequestId) -> Option<usize> {
        self.routes
            .iter()
            .position(|route| route.requests(instance).any(|served| served == r))
    }

    /// Checks feasibility: request uniqueness across routes, the minimum
    /// service count gamma, and per-route precedence/capacity. Cache
    /// consistency is guaranteed by construction as long as callers route
    /// all mutation through this type's methods.
    pub fn is_feasible(&self, instance: &Instance) -> bool {
        if self.routes.len() != instance.n_vehicles {
            return false;
        }
        let mut seen = HashSet::new();
        for route in &self.routes {
            if !route.is_feasible(instance) {
                return false;
            }
            for r in route.requests(instance) {
                if !seen.insert(r) {
                    return false; // request served by more than one route
                }
            }
        }
        seen.len() >= instance.gamma
    }

    pub fn all_route_distances(&self, instance: &Instance) -> Vec<Distance> {
        all_route_distances(instance, &self.routes.iter().map(|r| r.nodes().to_vec()).collect::<Vec<_>>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Coord, Demand, NodeId};

    fn toy_instance() -> Instance {
        let coords: Vec<(Coord, Coord)> = vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (2.0, 0.0), (0.0, 2.0)];
        let demands: Vec<Demand> = vec![3, 5];
        Instance::from_raw(2, 1, 10, 2, 0.0, Fairness::Jain, demands, coords).unwrap()
    }

    #[test]
    fn empty_solution_has_zero_totals() {
        let instance = toy_instance();
        let sol = Solution::empty(&instance);
        assert_eq!(sol.total_distance, 0.0);
        assert_eq!(sol.sum_of_squares, 0.0);
        assert_eq!(sol.served_count(&instance), 0);
    }

    #[test]
    fn single_route_serving_both_requests_is_feasible() {
        let instance = toy_instance();
        let r1 = RequestId::from_index(0);
        let r2 = RequestId::from_index(1);
        let nodes = vec![
            instance.pickup_node(r1),
            instance.pickup_node(r2),
            instance.delivery_node(r1),
            instance.delivery_node(r2),
        ];
        let route = Route::from_nodes(&instance, nodes);
        let sol = Solution::from_routes(&instance, vec![route]);
        assert!(sol.is_feasible(&instance));
        assert_eq!(sol.served_count(&instance), 2);
        let _ = NodeId::DEPOT;
    }

    #[test]
    fn request_served_by_two_routes_is_infeasible() {
        let coords: Vec<(Coord, Coord)> = vec![
            (0.0, 0.0),
            (1.0, 0.0),
            (0.0, 1.0),
            (2.0, 0.0),
            (0.0, 2.0),
        ];
        let instance = Instance::from_raw(2, 2, 10, 2, 0.0, Fairness::Jain, vec![3, 5], coords).unwrap();
        let r1 = RequestId::from_index(0);
        let route0 = Route::from_nodes(&instance, vec![instance.pickup_node(r1), instance.delivery_node(r1)]);
        let route1 = Route::from_nodes(&instance, vec![instance.pickup_node(r1), instance.delivery_node(r1)]);
        let sol = Solution::from_routes(&instance, vec![route0, route1]);
        assert!(!sol.is_feasible(&instance));
    }
}
