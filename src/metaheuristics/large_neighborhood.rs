//! Cost-directed ruin-and-recreate over the boolean encoding: each outer
//! iteration removes k requests (one per vehicle, the one whose removal
//! shrinks that vehicle's beam-rebuilt route distance the most, subject to
//! the removal quota) and reinserts k requests (one per vehicle per round,
//! the one whose insertion grows it the least), tracking the best solution
//! seen. Grounded on the original `large_neighborhood.cpp` reference
//! implementation's `find_heaviest_request_in_route`/`find_best_request_to_add`
//! pair.

use crate::builders::beam_build_route;
use crate::encoding::Encoding;
use crate::objective::route_distance;
use crate::problem::Instance;
use crate::types::{Distance, RequestId};

#[derive(Clone, Debug)]
pub struct LnsParams {
    pub max_iter: usize,
    /// Number of requests ruined and recreated per outer iteration.
    pub k: usize,
    pub removal_beam_width: usize,
    pub append_beam_width: usize,
}

impl Default for LnsParams {
    fn default() -> Self {
        LnsParams { max_iter: 20, k: 2, removal_beam_width: 5, append_beam_width: 5 }
    }
}

/// The request whose removal from vehicle `vehicle`'s beam-rebuilt route
/// shrinks it the most, paired with that delta. `None` if the vehicle serves
/// at most one request (nothing useful to remove).
fn find_heaviest_request_in_route(
    instance: &Instance,
    encoding: &Encoding,
    vehicle: usize,
    beam_width: usize,
) -> Option<(RequestId, Distance)> {
    let requests = encoding.requests_of_vehicle(instance, vehicle);
    if requests.len() <= 1 {
        return None;
    }
    let route = beam_build_route(instance, &requests, beam_width);
    let original_distance = route_distance(instance, &route);

    let mut best: Option<(RequestId, Distance)> = None;
    for &r in &requests {
        let rest: Vec<RequestId> = requests.iter().copied().filter(|&x| x != r).collect();
        let new_route = beam_build_route(instance, &rest, beam_width);
        let delta = route_distance(instance, &new_route) - original_distance;
        if best.map(|(_, d)| delta < d).unwrap_or(true) {
            best = Some((r, delta));
        }
    }
    best
}

/// Repeatedly collects one removal candidate per vehicle (skipping vehicles
/// with at most one request) and removes the best-delta subset until `k`
/// requests are gone or no vehicle offers a candidate.
fn remove_requests(instance: &Instance, encoding: &mut Encoding, k: usize, beam_width: usize) {
    let mut removed = 0;
    while removed < k {
        let mut candidates: Vec<(RequestId, Distance)> = Vec::new();
        for vehicle in 0..encoding.num_vehicles() {
            if let Some(candidate) = find_heaviest_request_in_route(instance, encoding, vehicle, beam_width) {
                candidates.push(candidate);
            }
        }
        if candidates.is_empty() {
            break;
        }
        let remaining = k - removed;
        if candidates.len() > remaining {
            candidates.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
            candidates.truncate(remaining);
        }
        for &(r, _delta) in &candidates {
            encoding.unassign(r);
        }
        removed += candidates.len();
    }
}

/// The non-served request whose insertion into vehicle `vehicle`'s
/// beam-rebuilt route grows it the least, paired with that delta.
fn find_best_request_to_add(
    instance: &Instance,
    encoding: &Encoding,
    vehicle: usize,
    beam_width: usize,
) -> Option<(RequestId, Distance)> {
    let delivered = encoding.requests_of_vehicle(instance, vehicle);
    let route = beam_build_route(instance, &delivered, beam_width);
    let original_distance = route_distance(instance, &route);

    let mut best: Option<(RequestId, Distance)> = None;
    for r in encoding.non_served_requests(instance) {
        let mut candidate = delivered.clone();
        candidate.push(r);
        let new_route = beam_build_route(instance, &candidate, beam_width);
        let delta = route_distance(instance, &new_route) - original_distance;
        if best.map(|(_, d)| delta < d).unwrap_or(true) {
            best = Some((r, delta));
        }
    }
    best
}

/// `⌊k/nK⌋` full rounds of one insertion per vehicle, then a final round
/// collecting one candidate per vehicle and keeping the `k mod nK` best.
fn append_requests(instance: &Instance, encoding: &mut Encoding, k: usize, beam_width: usize) {
    let n_vehicles = encoding.num_vehicles();
    if n_vehicles == 0 {
        return;
    }
    let full_rounds = k / n_vehicles;
    let remainder = k % n_vehicles;

    for _ in 0..full_rounds {
        let picks: Vec<(usize, RequestId)> = (0..n_vehicles)
            .filter_map(|vehicle| {
                find_best_request_to_add(instance, encoding, vehicle, beam_width).map(|(r, _)| (vehicle, r))
            })
            .collect();
        for (vehicle, r) in picks {
            encoding.set_vehicle_for_request(r, vehicle);
        }
    }

    let mut final_picks: Vec<(usize, RequestId, Distance)> = (0..n_vehicles)
        .filter_map(|vehicle| {
            find_best_request_to_add(instance, encoding, vehicle, beam_width).map(|(r, delta)| (vehicle, r, delta))
        })
        .collect();
    final_picks.sort_by(|a, b| a.2.partial_cmp(&b.2).unwrap());
    final_picks.truncate(remainder);
    for (vehicle, r, _delta) in final_picks {
        encoding.set_vehicle_for_request(r, vehicle);
    }
}

pub fn large_neighborhood_search(instance: &Instance, initial: Encoding, params: &LnsParams) -> (Distance, Encoding) {
    let mut incumbent = initial;
    let mut incumbent_cost = incumbent
        .decode(instance)
        .objective(instance)
        .expect("fairness index mismatch");
    let mut best_cost = incumbent_cost;
    let mut best = incumbent.clone();

    tracing::info!(objective = best_cost, max_iter = params.max_iter, "large neighborhood search starting");

    for iteration in 0..params.max_iter {
        remove_requests(instance, &mut incumbent, params.k, params.removal_beam_width);
        append_requests(instance, &mut incumbent, params.k, params.append_beam_width);

        let solution = incumbent.decode(instance);
        let Ok(cost) = solution.objective(instance) else {
            tracing::debug!(iteration, "large neighborhood iteration produced an unscoreable solution");
            continue;
        };
        incumbent_cost = cost;

        if incumbent_cost < best_cost {
            best_cost = incumbent_cost;
            best = incumbent.clone();
            tracing::info!(iteration, objective = best_cost, "large neighborhood found new incumbent");
        } else {
            tracing::debug!(iteration, objective = incumbent_cost, best = best_cost, "large neighborhood iteration complete");
        }
    }

    tracing::info!(objective = best_cost, "large neighborhood search finished");
    (best_cost, best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::DEFAULT_BEAM_WIDTH;
    use crate::types::Fairness;

    #[test]
    fn never_regresses_from_initial_cost() {
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
            Instance::from_raw(3, 2, 10, 2, 1.0, Fairness::Jain, vec![1, 1, 10], coords).unwrap();
        let mut encoding = Encoding::new(&instance, DEFAULT_BEAM_WIDTH);
        let r1 = instance.requests().next().unwrap();
        let r2 = instance.requests().nth(1).unwrap();
        encoding.set_vehicle_for_request(r1, 0);
        encoding.set_vehicle_for_request(r2, 1);
        let initial_cost = encoding.decode(&instance).objective(&instance).unwrap();

        let params = LnsParams { max_iter: 10, k: 1, ..Default::default() };
        let (best_cost, best_encoding) = large_neighborhood_search(&instance, encoding, &params);
        assert!(best_cost <= initial_cost + 1e-9);
        assert!(best_encoding.is_encoding_correct());
    }

    #[test]
    fn removal_skips_single_request_vehicles() {
        let coords = vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)];
        let instance = Instance::from_raw(1, 1, 10, 1, 1.0, Fairness::Jain, vec![1], coords).unwrap();
        let mut encoding = Encoding::new(&instance, DEFAULT_BEAM_WIDTH);
        let r = instance.requests().next().unwrap();
        encoding.set_vehicle_for_request(r, 0);

        remove_requests(&instance, &mut encoding, 5, DEFAULT_BEAM_WIDTH);
        assert!(encoding.is_served_by(0, r));
    }
}
