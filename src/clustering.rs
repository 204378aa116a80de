//! Balanced k-means clustering of requests to vehicles, grounded on the
//! original `clustering.cpp` reference implementation's assign/update/restart
//! loop.

use crate::problem::Instance;
use crate::types::{Coord, Demand, RequestId};
use rand::seq::SliceRandom;
use rand::Rng;

pub const DEFAULT_ITERS: usize = 20;
pub const DEFAULT_RESTARTS: usize = 20;

/// Assigns each request in `requests` to one of `instance.n_vehicles`
/// clusters, minimizing `dist² + (load_after - target)²` jointly over
/// geography and load balance. Returns a `Vec<usize>` parallel to `requests`
/// giving each request's assigned vehicle index.
pub fn balanced_kmeans<R: Rng>(
    instance: &Instance,
    requests: &[RequestId],
    iters: usize,
    restarts: usize,
    rng: &mut R,
) -> Vec<usize> {
    let k = instance.n_vehicles.min(requests.len()).max(1);
    let target_load = if k > 0 {
        requests.iter().map(|&r| instance.demand(r)).sum::<Demand>() as f64 / k as f64
    } else {
        0.0
    };

    let mut best_assignment = vec![0usize; requests.len()];
    let mut best_score = f64::INFINITY;

    for _ in 0..restarts.max(1) {
        let mut order: Vec<usize> = (0..requests.len()).collect();
        order.shuffle(rng);
        let mut centers: Vec<(Coord, Coord)> = order
            .iter()
            .take(k)
            .map(|&idx| instance.coords[instance.pickup_node(requests[idx]).index()])
            .collect();
        while centers.len() < k {
            centers.push((0.0, 0.0));
        }

        let mut assignment = vec![0usize; requests.len()];
        for _ in 0..iters.max(1) {
            let mut loads = vec![0.0_f64; k];
            for &idx in &order {
                let r = requests[idx];
                let (px, py) = instance.coords[instance.pickup_node(r).index()];
                let demand = instance.demand(r) as f64;
                let mut best_cluster = 0;
                let mut best_cost = f64::INFINITY;
                for cluster in 0..k {
                    let (cx, cy) = centers[cluster];
                    let dist_sq = (px - cx).powi(2) + (py - cy).powi(2);
                    let load_after = loads[cluster] + demand;
                    let imbalance_sq = (load_after - target_load).powi(2);
                    let cost = dist_sq + imbalance_sq;
                    if cost < best_cost {
                        best_cost = cost;
                        best_cluster = cluster;
                    }
                }
                assignment[idx] = best_cluster;
                loads[best_cluster] += demand;
            }

            let mut sums = vec![(0.0_f64, 0.0_f64, 0usize); k];
            for &idx in &order {
                let r = requests[idx];
                let (px, py) = instance.coords[instance.pickup_node(r).index()];
                let cluster = assignment[idx];
                sums[cluster].0 += px;
                sums[cluster].1 += py;
                sums[cluster].2 += 1;
            }
            for cluster in 0..k {
                let (sx, sy, count) = sums[cluster];
                centers[cluster] = if count > 0 {
                    (sx / count as f64, sy / count as f64)
                } else {
                    (0.0, 0.0)
                };
            }
        }

        let score: f64 = order
            .iter()
            .map(|&idx| {
                let r = requests[idx];
                let (px, py) = instance.coords[instance.pickup_node(r).index()];
                let (cx, cy) = centers[assignment[idx]];
                (px - cx).powi(2) + (py - cy).powi(2)
            })
            .sum();

        if score < best_score {
            best_score = score;
            best_assignment = assignment;
        }
    }

    best_assignment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Fairness;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn splits_two_distant_requests_into_separate_clusters() {
        let coords = vec![
            (0.0, 0.0),
            (-10.0, 0.0),
            (10.0, 0.0),
            (-11.0, 0.0),
            (11.0, 0.0),
        ];
        let instance = Instance::from_raw(2, 2, 10, 2, 0.0, Fairness::Jain, vec![1, 1], coords).unwrap();
        let requests: Vec<RequestId> = instance.requests().collect();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let assignment = balanced_kmeans(&instance, &requests, 20, 20, &mut rng);
        assert_ne!(assignment[0], assignment[1]);
    }
}
