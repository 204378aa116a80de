//! Boolean vehicle-of-request matrix with a lazily-decoded cached Solution,
//! grounded on the original `encoding.cpp` reference implementation.

use crate::builders::beam_build_route;
use crate::problem::Instance;
use crate::solution::{Route, Solution};
use crate::types::RequestId;
use crate::utils::Matrix2;
use rand::seq::SliceRandom;
use rand::Rng;
use std::cell::RefCell;

pub const DEFAULT_BEAM_WIDTH: usize = 5;

/// A vehicle x request boolean assignment matrix that decodes to a `Solution`
/// via per-vehicle beam search. Decoding is expensive, so the result is
/// cached and invalidated on every mutation.
#[derive(Debug, Clone)]
pub struct Encoding {
    dna: Matrix2<bool>,
    beam_width: usize,
    cached_solution: RefCell<Option<Solution>>,
}

impl Encoding {
    pub fn new(instance: &Instance, beam_width: usize) -> Self {
        Encoding {
            dna: Matrix2::new(instance.n_vehicles, instance.n, false),
            beam_width,
            cached_solution: RefCell::new(None),
        }
    }

    /// Builds an Encoding from an already-decoded Solution (the inverse of
    /// `decode`): every request served by vehicle k gets dna[k][request]=true.
    pub fn from_solution(instance: &Instance, solution: &Solution, beam_width: usize) -> Self {
        let mut encoding = Encoding::new(instance, beam_width);
        for (vehicle_idx, route) in solution.routes().iter().enumerate() {
            for r in route.requests(instance) {
                encoding.dna.set(vehicle_idx, r.index(), true);
            }
        }
        encoding
    }

    pub fn num_vehicles(&self) -> usize {
        self.dna.rows
    }

    pub fn num_requests(&self) -> usize {
        self.dna.cols
    }

    pub fn is_served_by(&self, vehicle_idx: usize, r: RequestId) -> bool {
        *self.dna.get(vehicle_idx, r.index())
    }

    /// Sets `r`'s assignment to exactly `vehicle_idx` (false everywhere else),
    /// preserving the at-most-one-true-per-column invariant.
    pub fn set_vehicle_for_request(&mut self, r: RequestId, vehicle_idx: usize) {
        for v in 0..self.num_vehicles() {
            self.dna.set(v, r.index(), v == vehicle_idx);
        }
        self.invalidate();
    }

    /// Clears `r`'s assignment entirely (served by no vehicle).
    pub fn unassign(&mut self, r: RequestId) {
        for v in 0..self.num_vehicles() {
            self.dna.set(v, r.index(), false);
        }
        self.invalidate();
    }

    pub fn invalidate(&mut self) {
        *self.cached_solution.borrow_mut() = None;
    }

    /// Every request column has at most one true cell.
    pub fn is_encoding_correct(&self) -> bool {
        for col in 0..self.num_requests() {
            let count = (0..self.num_vehicles()).filter(|&v| *self.dna.get(v, col)).count();
            if count > 1 {
                return false;
            }
        }
        true
    }

    pub fn requests_of_vehicle(&self, instance: &Instance, vehicle_idx: usize) -> Vec<RequestId> {
        instance
            .requests()
            .filter(|&r| self.is_served_by(vehicle_idx, r))
            .collect()
    }

    pub fn served_requests(&self, instance: &Instance) -> Vec<RequestId> {
        instance
            .requests()
            .filter(|&r| (0..self.num_vehicles()).any(|v| self.is_served_by(v, r)))
            .collect()
    }

    pub fn non_served_requests(&self, instance: &Instance) -> Vec<RequestId> {
        instance
            .requests()
            .filter(|&r| (0..self.num_vehicles()).all(|v| !self.is_served_by(v, r)))
            .collect()
    }

    pub fn total_served_requests(&self, instance: &Instance) -> usize {
        self.served_requests(instance).len()
    }

    /// Decodes to a `Solution` by rebuilding each vehicle's route with the
    /// beam builder. Cached: repeated calls without an intervening mutation
    /// reuse the same decode.
    pub fn decode(&self, instance: &Instance) -> Solution {
        if let Some(cached) = self.cached_solution.borrow().as_ref() {
            return cached.clone();
        }
        let routes: Vec<Route> = (0..self.num_vehicles())
            .map(|v| {
                let requests = self.requests_of_vehicle(instance, v);
                let nodes = beam_build_route(instance, &requests, self.beam_width);
                Route::from_nodes(instance, nodes)
            })
            .collect();
        let solution = Solution::from_routes(instance, routes);
        *self.cached_solution.borrow_mut() = Some(solution.clone());
        solution
    }

    /// Crossover: requests both parents serve are inherited with a
    /// coin-flip choice of assigning vehicle; requests only one parent serves
    /// fill the remainder up to gamma. If more requests are served by both
    /// parents than gamma allows, the `both` set is downsampled.
    pub fn add<R: Rng>(&self, other: &Encoding, instance: &Instance, rng: &mut R) -> Encoding {
        debug_assert_eq!(self.num_vehicles(), other.num_vehicles());
        debug_assert_eq!(self.num_requests(), other.num_requests());

        let mut both = Vec::new();
        let mut one_only: Vec<(RequestId, usize)> = Vec::new();

        for r in instance.requests() {
            let a_vehicle = (0..self.num_vehicles()).find(|&v| self.is_served_by(v, r));
            let b_vehicle = (0..other.num_vehicles()).find(|&v| other.is_served_by(v, r));
            match (a_vehicle, b_vehicle) {
                (Some(a), Some(b)) => both.push((r, a, b)),
                (Some(a), None) => one_only.push((r, a)),
                (None, Some(b)) => one_only.push((r, b)),
                (None, None) => {}
            }
        }

        if both.len() > instance.gamma {
            both.shuffle(rng);
            both.truncate(instance.gamma);
        }

        let mut offspring = Encoding::new(instance, self.beam_width);
        for (r, a, b) in &both {
            let chosen = if rng.random_bool(0.5) { *a } else { *b };
            offspring.dna.set(chosen, r.index(), true);
        }

        let needed = instance.gamma.saturating_sub(both.len());
        one_only.shuffle(rng);
        for (r, vehicle) in one_only.into_iter().take(needed) {
            offspring.dna.set(vehicle, r.index(), true);
        }

        offspring
    }
}
