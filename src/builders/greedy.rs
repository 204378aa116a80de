//! Greedy and softmin-randomized route builders, shared as the per-route
//! builder for both deterministic and randomized construction, grounded on
//! the original `random.cpp::build_route` reference implementation which
//! unifies both behind one `greedy` flag.

use crate::problem::Instance;
use crate::types::{Demand, Distance, NodeId, RequestId};
use rand::distr::weighted::WeightedIndex;
use rand::prelude::*;

struct Candidate {
    request: RequestId,
    node: NodeId,
    dist: Distance,
    is_pickup: bool,
}

fn collect_candidates(
    instance: &Instance,
    last: NodeId,
    cargo: Demand,
    not_yet_picked: &[RequestId],
    active_picked: &[RequestId],
) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for &r in not_yet_picked {
        if cargo + instance.demand(r) <= instance.capacity {
            let node = instance.pickup_node(r);
            candidates.push(Candidate { request: r, node, dist: instance.dist(last, node), is_pickup: true });
        }
    }
    for &r in active_picked {
        let node = instance.delivery_node(r);
        candidates.push(Candidate { request: r, node, dist: instance.dist(last, node), is_pickup: false });
    }
    candidates
}

/// Picks the next candidate: always the closest when `greedy`, otherwise a
/// softmin draw over `exp(-lambda * dist)` weights (larger `lambda` ~ greedier).
fn choose_candidate_index<R: Rng>(candidates: &[Candidate], greedy: bool, lambda: f64, rng: &mut R) -> usize {
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&a, &b| candidates[a].dist.partial_cmp(&candidates[b].dist).unwrap());

    if greedy || order.len() == 1 {
        return order[0];
    }

    let weights: Vec<f64> = order.iter().map(|&i| (-lambda * candidates[i].dist).exp()).collect();
    match WeightedIndex::new(&weights) {
        Ok(dist) => order[dist.sample(rng)],
        Err(_) => order[0],
    }
}

/// Builds a single vehicle's route over `requests`, either greedily (nearest
/// feasible next node) or via softmin sampling when `greedy` is false.
pub fn build_route<R: Rng>(
    instance: &Instance,
    requests: &[RequestId],
    greedy: bool,
    lambda: f64,
    rng: &mut R,
) -> Vec<NodeId> {
    let mut not_yet_picked: Vec<RequestId> = requests.to_vec();
    let mut active_picked: Vec<RequestId> = Vec::new();
    let mut route = Vec::with_capacity(requests.len() * 2);
    let mut cargo: Demand = 0;
    let mut last = NodeId::DEPOT;

    while !not_yet_picked.is_empty() || !active_picked.is_empty() {
        let candidates = collect_candidates(instance, last, cargo, &not_yet_picked, &active_picked);
        if candidates.is_empty() {
            // No pickup fits and nothing is active: cannot make progress.
            // This should not happen since every single demand is <= capacity.
            break;
        }
        let idx = choose_candidate_index(&candidates, greedy, lambda, rng);
        let chosen = &candidates[idx];
        last = chosen.node;
        route.push(chosen.node);
        if chosen.is_pickup {
            cargo += instance.demand(chosen.request);
            not_yet_picked.retain(|&r| r != chosen.request);
            active_picked.push(chosen.request);
        } else {
            cargo -= instance.demand(chosen.request);
            active_picked.retain(|&r| r != chosen.request);
        }
    }

    route
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Fairness;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn toy_instance() -> Instance {
        let coords = vec![(0.0, 0.0), (1.0, 0.0), (3.0, 0.0), (2.0, 0.0), (4.0, 0.0)];
        Instance::from_raw(2, 1, 10, 2, 0.0, Fairness::Jain, vec![3, 3], coords).unwrap()
    }

    #[test]
    fn greedy_picks_nearest_feasible_node() {
        let instance = toy_instance();
        let requests: Vec<RequestId> = instance.requests().collect();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let route = build_route(&instance, &requests, true, 1.0, &mut rng);
        assert_eq!(route.len(), 4);
        // Nearest to depot (0,0) is pickup of request 0 at (1,0).
        assert_eq!(route[0], instance.pickup_node(requests[0]));
    }

    #[test]
    fn softmin_still_respects_capacity() {
        let instance = toy_instance();
        let requests: Vec<RequestId> = instance.requests().collect();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        let route = build_route(&instance, &requests, false, 2.0, &mut rng);
        let mut cargo = 0;
        for node in &route {
            cargo += instance.load_change[node.index()];
            assert!(cargo >= 0 && cargo <= instance.capacity);
        }
    }
}
