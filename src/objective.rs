//! Route distance and fairness metrics, plus the normalized
//! distance-and-demand ranking metric used by the beam and GRASP constructors.

use crate::error::ObjectiveError;
use crate::problem::Instance;
use crate::types::{Distance, Fairness, NodeId, RequestId};

/// Closed-tour distance of a single route: depot -> route[0] -> ... -> route[-1] -> depot.
pub fn route_distance(instance: &Instance, route: &[NodeId]) -> Distance {
    if route.is_empty() {
        return 0.0;
    }
    let mut total = instance.dist(NodeId::DEPOT, route[0]);
    for window in route.windows(2) {
        total += instance.dist(window[0], window[1]);
    }
    total += instance.dist(*route.last().unwrap(), NodeId::DEPOT);
    total
}

pub fn all_route_distances(instance: &Instance, routes: &[Vec<NodeId>]) -> Vec<Distance> {
    routes.iter().map(|r| route_distance(instance, r)).collect()
}

/// `(Σ d_k)² / (nK · Σ d_k²)`. Errors if there are no routes, or if every
/// distance is zero (the denominator collapses to zero).
pub fn jain_fairness(distances: &[Distance]) -> Result<f64, ObjectiveError> {
    if distances.is_empty() {
        return Err(ObjectiveError::EmptyRouteSet);
    }
    let sum: f64 = distances.iter().sum();
    let sum_sq: f64 = distances.iter().map(|d| d * d).sum();
    let den = distances.len() as f64 * sum_sq;
    if den == 0.0 {
        return Err(ObjectiveError::ZeroTotalDistance);
    }
    Ok((sum * sum) / den)
}

/// `min(d_k) / max(d_k)`. A max of zero (every route empty) is defined as
/// perfectly fair, not an error.
pub fn max_min_fairness(distances: &[Distance]) -> Result<f64, ObjectiveError> {
    if distances.is_empty() {
        return Err(ObjectiveError::EmptyRouteSet);
    }
    let min = distances.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = distances.iter().cloned().fold(0.0_f64, f64::max);
    if max == 0.0 {
        return Ok(1.0);
    }
    Ok(min / max)
}

/// `1 − (Σ_{i<j} |d_i − d_j|) / Σ d_k`.
pub fn gini_fairness(distances: &[Distance]) -> Result<f64, ObjectiveError> {
    if distances.is_empty() {
        return Err(ObjectiveError::EmptyRouteSet);
    }
    let sum: f64 = distances.iter().sum();
    if sum == 0.0 {
        // every route distance is zero: no inequality to speak of.
        return Ok(1.0);
    }
    let mut nominator = 0.0;
    for i in 0..distances.len() {
        for j in (i + 1)..distances.len() {
            nominator += (distances[i] - distances[j]).abs();
        }
    }
    Ok(1.0 - nominator / sum)
}

pub fn fairness_value(distances: &[Distance], fairness: Fairness) -> Result<f64, ObjectiveError> {
    match fairness {
        Fairness::Jain => jain_fairness(distances),
        Fairness::Gini => gini_fairness(distances),
        Fairness::MaxMin => max_min_fairness(distances),
    }
}

/// `sum_dist + rho * (1 - fairness)`.
pub fn objective(sum_dist: Distance, fairness: f64, rho: f64) -> Distance {
    sum_dist + rho * (1.0 - fairness)
}

pub fn objective_of_distances(
    distances: &[Distance],
    fairness_kind: Fairness,
    rho: f64,
) -> Result<Distance, ObjectiveError> {
    let sum_dist: f64 = distances.iter().sum();
    let fairness = fairness_value(distances, fairness_kind)?;
    Ok(objective(sum_dist, fairness, rho))
}

/// Round-trip distance of serving `r` alone: depot -> pickup -> delivery -> depot.
pub fn solo_round_trip_distance(instance: &Instance, r: RequestId) -> Distance {
    let pickup = instance.pickup_node(r);
    let delivery = instance.delivery_node(r);
    instance.dist(NodeId::DEPOT, pickup) + instance.dist(pickup, delivery) + instance.dist(delivery, NodeId::DEPOT)
}

/// Normalized distance-and-demand ranking cost for request `r`:
/// `a * solo_dist_norm(r) + (1 - a) * demand_norm(r)`, lower ranks first.
pub fn ranking_metric(instance: &Instance, r: RequestId, max_solo_dist: f64, max_demand: f64, a: f64) -> f64 {
    let solo = solo_round_trip_distance(instance, r);
    let solo_norm = if max_solo_dist > 0.0 { solo / max_solo_dist } else { 0.0 };
    let demand_norm = if max_demand > 0.0 {
        instance.demand(r) as f64 / max_demand
    } else {
        0.0
    };
    a * solo_norm + (1.0 - a) * demand_norm
}

/// Ranks every request in `instance` ascending by [`ranking_metric`], as used
/// by beam construction and GRASP's RCL ordering.
pub fn rank_requests_by_metric(instance: &Instance, a: f64) -> Vec<RequestId> {
    let max_solo_dist = instance
        .requests()
        .map(|r| solo_round_trip_distance(instance, r))
        .fold(0.0_f64, f64::max);
    let max_demand = instance.demands.iter().cloned().fold(0, i64::max) as f64;

    let mut requests: Vec<RequestId> = instance.requests().collect();
    requests.sort_by(|&a_id, &b_id| {
        let ca = ranking_metric(instance, a_id, max_solo_dist, max_demand, a);
        let cb = ranking_metric(instance, b_id, max_solo_dist, max_demand, a);
        ca.partial_cmp(&cb).unwrap()
    });
    requests
}
