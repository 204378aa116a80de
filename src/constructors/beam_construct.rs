//! Beam construction (BS::beam_search): rank requests by the normalized
//! distance-and-demand metric, deal round-robin across vehicles, build each
//! route with the beam builder.

use crate::builders::beam_build_route;
use crate::error::ConstructionError;
use crate::objective::rank_requests_by_metric;
use crate::problem::Instance;
use crate::solution::{Route, Solution};

pub fn beam_construction(instance: &Instance, a: f64, beam_width: usize) -> Result<Solution, ConstructionError> {
    let ranked = rank_requests_by_metric(instance, a);
    if ranked.len() < instance.gamma {
        return Err(ConstructionError::InsufficientRequests {
            required: instance.gamma,
            available: ranked.len(),
        });
    }
    let selected = &ranked[..instance.gamma];

    let mut groups = vec![Vec::new(); instance.n_vehicles];
    for (idx, &r) in selected.iter().enumerate() {
        groups[idx % instance.n_vehicles].push(r);
    }

    let routes: Vec<Route> = groups
        .into_iter()
        .map(|group| {
            let nodes = beam_build_route(instance, &group, beam_width);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Fairness;

    #[test]
    fn deals_requests_round_robin_across_vehicles() {
        let coords = vec![
            (0.0, 0.0),
            (1.0, 0.0),
            (0.0, 1.0),
            (2.0, 0.0),
            (0.0, 2.0),
            (3.0, 0.0),
            (0.0, 3.0),
            (4.0, 0.0),
            (0.0, 4.0),
        ];
        let instance =
            Instance::from_raw(4, 2, 10, 4, 0.0, Fairness::Jain, vec![1, 1, 1, 1], coords).unwrap();
        let solution = beam_construction(&instance, 0.9, 5).unwrap();
        assert!(solution.is_feasible(&instance));
        assert_eq!(solution.served_count(&instance), 4);
    }
}
