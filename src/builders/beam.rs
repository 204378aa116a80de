//! Beam search route builder, grounded on the original
//! `beam_search.cpp::create_track_route` reference implementation.

use crate::objective::route_distance;
use crate::problem::Instance;
use crate::types::{Demand, Distance, NodeId, RequestId};

#[derive(Clone)]
struct BeamState {
    cargo: Demand,
    partial_score: Distance,
    route: Vec<NodeId>,
    active_picked: Vec<RequestId>,
    not_yet_picked: Vec<RequestId>,
}

impl BeamState {
    fn is_terminal(&self) -> bool {
        self.active_picked.is_empty() && self.not_yet_picked.is_empty()
    }

    fn last_node(&self) -> NodeId {
        self.route.last().copied().unwrap_or(NodeId::DEPOT)
    }
}

/// Builds a route visiting exactly the pickup and delivery of every request in
/// `requests`, width-bounded best-first over partial tour length. Falls back
/// to the sequential "pick up everything, then deliver everything" order if
/// no terminal state is reached within the step budget.
pub fn beam_build_route(instance: &Instance, requests: &[RequestId], width: usize) -> Vec<NodeId> {
    if requests.is_empty() {
        return Vec::new();
    }

    let width = width.max(1);
    let mut beam = vec![BeamState {
        cargo: 0,
        partial_score: 0.0,
        route: Vec::with_capacity(requests.len() * 2),
        active_picked: Vec::new(),
        not_yet_picked: requests.to_vec(),
    }];

    let max_steps = 4 * requests.len();
    let mut step = 0;
    while step < max_steps && !beam.iter().all(BeamState::is_terminal) {
        let mut next_states = Vec::new();
        for state in &beam {
            if state.is_terminal() {
                next_states.push(state.clone());
                continue;
            }
            let last = state.last_node();
            for &r in &state.not_yet_picked {
                let demand = instance.demand(r);
                if state.cargo + demand <= instance.capacity {
                    let mut next = state.clone();
                    let pickup = instance.pickup_node(r);
                    next.partial_score += instance.dist(last, pickup);
                    next.route.push(pickup);
                    next.cargo += demand;
                    next.not_yet_picked.retain(|&x| x != r);
                    next.active_picked.push(r);
                    next_states.push(next);
                }
            }
            for &r in &state.active_picked {
                let mut next = state.clone();
                let delivery = instance.delivery_node(r);
                next.partial_score += instance.dist(last, delivery);
                next.route.push(delivery);
                next.cargo -= instance.demand(r);
                next.active_picked.retain(|&x| x != r);
                next_states.push(next);
            }
        }
        next_states.sort_by(|a, b| a.partial_score.partial_cmp(&b.partial_score).unwrap());
        next_states.truncate(width);
        beam = next_states;
        step += 1;
    }

    let best_terminal = beam
        .iter()
        .filter(|s| s.is_terminal())
        .min_by(|a, b| {
            let da = route_distance(instance, &a.route);
            let db = route_distance(instance, &b.route);
            da.partial_cmp(&db).unwrap()
        });

    match best_terminal {
        Some(state) => state.route.clone(),
        None => sequential_fallback(instance, requests),
    }
}

fn sequential_fallback(instance: &Instance, requests: &[RequestId]) -> Vec<NodeId> {
    let mut route = Vec::with_capacity(requests.len() * 2);
    for &r in requests {
        route.push(instance.pickup_node(r));
    }
    for &r in requests {
        route.push(instance.delivery_node(r));
    }
    route
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Fairness;

    fn toy_instance() -> Instance {
        let coords = vec![(0.0, 0.0), (1.0, 0.0), (3.0, 0.0), (2.0, 0.0), (4.0, 0.0)];
        Instance::from_raw(2, 1, 10, 2, 0.0, Fairness::Jain, vec![3, 3], coords).unwrap()
    }

    #[test]
    fn visits_every_pickup_before_its_delivery() {
        let instance = toy_instance();
        let requests: Vec<RequestId> = instance.requests().collect();
        let route = beam_build_route(&instance, &requests, 5);
        assert_eq!(route.len(), 4);
        for &r in &requests {
            let pickup_pos = route.iter().position(|&n| n == instance.pickup_node(r)).unwrap();
            let delivery_pos = route
                .iter()
                .position(|&n| n == instance.delivery_node(r))
                .unwrap();
            assert!(pickup_pos < delivery_pos);
        }
    }

    #[test]
    fn empty_input_returns_empty_route() {
        let instance = toy_instance();
        assert!(beam_build_route(&instance, &[], 5).is_empty());
    }

    #[test]
    fn respects_capacity_throughout() {
        let instance = toy_instance();
        let requests: Vec<RequestId> = instance.requests().collect();
        let route = beam_build_route(&instance, &requests, 5);
        let mut cargo = 0;
        for node in &route {
            cargo += instance.load_change[node.index()];
            assert!(cargo >= 0 && cargo <= instance.capacity);
        }
    }
}
