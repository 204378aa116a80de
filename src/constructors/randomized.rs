//! Randomized construction (RC): same selection and clustering as deterministic
//! construction, but each route is built with the softmin sampler instead of
//! pure greedy.

use crate::builders::build_route;
use crate::clustering::{balanced_kmeans, DEFAULT_ITERS, DEFAULT_RESTARTS};
use crate::constructors::{group_by_vehicle, select_gamma_requests};
use crate::error::ConstructionError;
use crate::problem::Instance;
use crate::solution::{Route, Solution};
use rand::Rng;

pub fn randomized_construction<R: Rng>(
    instance: &Instance,
    lambda: f64,
    rng: &mut R,
) -> Result<Solution, ConstructionError> {
    let requests = select_gamma_requests(instance);
    if requests.len() < instance.gamma {
        return Err(ConstructionError::InsufficientRequests {
            required: instance.gamma,
            available: requests.len(),
        });
    }

    let assignment = balanced_kmeans(instance, &requests, DEFAULT_ITERS, DEFAULT_RESTARTS, rng);
    let groups = group_by_vehicle(instance, &requests, &assignment);

    let routes: Vec<Route> = groups
        .into_iter()
        .map(|group| {
            let nodes = build_route(instance, &group, false, lambda, rng);
            Route::from_nodes(instance, nodes)
        })
        .collect();

    let solution = Solution::from_routes(instance, routes);
    let served = solution.served_count(instance);
    if served < instance.gamma {
        return Err(ConstructionError::GammaUnreachable { served, gamma: instance.gamma });
    }
    Ok(solution)
}
