//! Local-search move generation: intra-route swap, cross-route relocation,
//! and intra-route 2-opt. A move is a flat enum rather than a trait object
//! hierarchy, matching a fleet of closely related operators with a single
//! dispatch point.

mod intra_swap;
mod relocate;
mod two_opt;

use crate::problem::Instance;
use crate::solution::Solution;
use crate::types::{Distance, RequestId};
use rand::Rng;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Move {
    IntraSwap { route: usize, i: usize, j: usize },
    Relocate { from: usize, to: usize, request: RequestId },
    TwoOpt { route: usize, i: usize, j: usize },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NeighborhoodKind {
    IntraSwap,
    Relocate,
    TwoOpt,
}

pub const ALL_KINDS: [NeighborhoodKind; 3] =
    [NeighborhoodKind::IntraSwap, NeighborhoodKind::Relocate, NeighborhoodKind::TwoOpt];

/// Every move `kind` offers from `solution`.
pub fn generate(kind: NeighborhoodKind, instance: &Instance, solution: &Solution) -> Vec<Move> {
    match kind {
        NeighborhoodKind::IntraSwap => intra_swap::generate(instance, solution),
        NeighborhoodKind::Relocate => relocate::generate(instance, solution),
        NeighborhoodKind::TwoOpt => two_opt::generate(instance, solution),
    }
}

/// One move sampled from `kind`, or `None` if no feasible move was found
/// within the sampler's retry budget.
pub fn generate_random<R: Rng>(
    kind: NeighborhoodKind,
    instance: &Instance,
    solution: &Solution,
    rng: &mut R,
) -> Option<Move> {
    match kind {
        NeighborhoodKind::IntraSwap => intra_swap::generate_random(instance, solution, rng),
        NeighborhoodKind::Relocate => relocate::generate_random(instance, solution, rng),
        NeighborhoodKind::TwoOpt => two_opt::generate_random(instance, solution, rng),
    }
}

pub fn is_valid(instance: &Instance, solution: &Solution, mv: &Move) -> bool {
    match mv {
        Move::IntraSwap { .. } => intra_swap::is_valid(instance, solution, mv),
        Move::Relocate { .. } => relocate::is_valid(instance, solution, mv),
        Move::TwoOpt { .. } => two_opt::is_valid(instance, solution, mv),
    }
}

/// Change in objective value (negative is an improvement) from applying `mv`
/// to `solution`, without materializing the resulting solution.
pub fn calc_delta(instance: &Instance, solution: &Solution, mv: &Move) -> Distance {
    match mv {
        Move::IntraSwap { .. } => intra_swap::calc_delta(instance, solution, mv),
        Move::Relocate { .. } => relocate::calc_delta(instance, solution, mv),
        Move::TwoOpt { .. } => two_opt::calc_delta(instance, solution, mv),
    }
}

pub fn apply(instance: &Instance, solution: &Solution, mv: &Move) -> Solution {
    match mv {
        Move::IntraSwap { .. } => intra_swap::apply(instance, solution, mv),
        Move::Relocate { .. } => relocate::apply(instance, solution, mv),
        Move::TwoOpt { .. } => two_opt::apply(instance, solution, mv),
    }
}

/// Fairness-aware delta shared by all three operators: given the old
/// per-route distances and the `(route, new_distance)` pairs that changed,
/// returns `new_total - old_total + rho * (fairness_old - fairness_new)`.
/// Falls back to treating the move as fairness-neutral if the fairness
/// index is undefined for one of the two distance vectors (e.g. all-zero
/// routes under Jain).
fn fairness_aware_delta(
    instance: &Instance,
    old_distances: &[Distance],
    changes: &[(usize, Distance)],
) -> Distance {
    use crate::objective::fairness_value;

    let old_total: Distance = old_distances.iter().sum();
    let mut new_distances = old_distances.to_vec();
    for &(route, new_distance) in changes {
        new_distances[route] = new_distance;
    }
    let new_total: Distance = new_distances.iter().sum();

    let fairness_old = fairness_value(old_distances, instance.fairness).unwrap_or(1.0);
    let fairness_new = fairness_value(&new_distances, instance.fairness).unwrap_or(1.0);

    (new_total - old_total) + instance.rho * (fairness_old - fairness_new)
}

/// Depot-substituted neighbor at `pos` in `route` (negative or out-of-range
/// positions are the depot).
fn neighbor_at(route: &[crate::types::NodeId], pos: isize, depot: crate::types::NodeId) -> crate::types::NodeId {
    if pos < 0 || pos as usize >= route.len() {
        depot
    } else {
        route[pos as usize]
    }
}

const MAX_RANDOM_TRIES: usize = 100;
