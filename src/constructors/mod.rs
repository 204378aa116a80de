mod deterministic;
mod randomized;
mod beam_construct;
mod grasp_construct;

pub use deterministic::deterministic_construction;
pub use randomized::randomized_construction;
pub use beam_construct::beam_construction;
pub use grasp_construct::{grasp_construction, GraspParams};

use crate::problem::Instance;
use crate::types::RequestId;

/// Cost `demand[r] * dist[pickup_r, delivery_r]`, ascending, first gamma taken
/// (shared by deterministic and randomized construction).
pub fn select_gamma_requests(instance: &Instance) -> Vec<RequestId> {
    let mut requests: Vec<(RequestId, f64)> = instance
        .requests()
        .map(|r| {
            let pickup = instance.pickup_node(r);
            let delivery = instance.delivery_node(r);
            let cost = instance.demand(r) as f64 * instance.dist(pickup, delivery);
            (r, cost)
        })
        .collect();
    requests.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
    requests.into_iter().take(instance.gamma).map(|(r, _)| r).collect()
}

/// Groups `requests` by the vehicle index `assignment` gives each (same
/// ordering as `requests`), producing `instance.n_vehicles` buckets.
pub fn group_by_vehicle(instance: &Instance, requests: &[RequestId], assignment: &[usize]) -> Vec<Vec<RequestId>> {
    let mut groups = vec![Vec::new(); instance.n_vehicles];
    for (&r, &vehicle) in requests.iter().zip(assignment.iter()) {
        groups[vehicle].push(r);
    }
    groups
}
