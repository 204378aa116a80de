//! Pure capacity/precedence checks over a raw node sequence, shared by
//! `Route` and the neighborhood operators.

use crate::problem::Instance;
use crate::types::{Demand, NodeId};

pub fn capacity_feasible(instance: &Instance, nodes: &[NodeId]) -> bool {
    let mut running: Demand = 0;
    for &node in nodes {
        running += instance.load_change[node.index()];
        if running < 0 || running > instance.capacity {
            return false;
        }
    }
    true
}

pub fn precedence_feasible(instance: &Instance, nodes: &[NodeId]) -> bool {
    let n = instance.n;
    let mut seen_pickup = vec![false; n];
    for &node in nodes {
        if let Some(r) = node.request_of(n) {
            if node.is_delivery(n) {
                if !seen_pickup[r.index()] {
                    return false;
                }
            } else {
                seen_pickup[r.index()] = true;
            }
        }
    }
    true
}

pub fn is_feasible(instance: &Instance, nodes: &[NodeId]) -> bool {
    capacity_feasible(instance, nodes) && precedence_feasible(instance, nodes)
}
