use crate::feasibility;
use crate::objective::route_distance;
use crate::problem::Instance;
use crate::types::{Demand, Distance, NodeId, RequestId};

/// A single vehicle's route: a dense sequence of pickup/delivery node indices,
/// never containing the depot (depot endpoints are implicit).
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    nodes: Vec<NodeId>,
    distance: Distance,
}

impl Route {
    pub fn empty() -> Self {
        Route { nodes: Vec::new(), distance: 0.0 }
    }

    pub fn from_nodes(instance: &Instance, nodes: Vec<NodeId>) -> Self {
        let distance = route_distance(instance, &nodes);
        Route { nodes, distance }
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn distance(&self) -> Distance {
        self.distance
    }

    /// Recomputes the cached distance from `nodes`. Call after any direct
    /// mutation of the node sequence.
    pub fn recompute_distance(&mut self, instance: &Instance) {
        self.distance = route_distance(instance, &self.nodes);
    }

    pub fn set_nodes(&mut self, instance: &Instance, nodes: Vec<NodeId>) {
        self.nodes = nodes;
        self.recompute_distance(instance);
    }

    /// The distinct requests served by this route.
    pub fn requests(&self, instance: &Instance) -> impl Iterator<Item = RequestId> + '_ {
        let n = instance.n;
        self.nodes.iter().filter_map(move |node| {
            if node.is_pickup(n) {
                node.request_of(n)
            } else {
                None
            }
        })
    }

    /// Cumulative load at every position along the route (length == `len()`).
    pub fn load_profile(&self, instance: &Instance) -> Vec<Demand> {
        let mut loads = Vec::with_capacity(self.nodes.len());
        let mut running = 0;
        for &node in &self.nodes {
            running += instance.load_change[node.index()];
            loads.push(running);
        }
        loads
    }

    /// Whether the running load stays within `[0, C]` at every position.
    pub fn is_capacity_feasible(&self, instance: &Instance) -> bool {
        feasibility::capacity_feasible(instance, &self.nodes)
    }

    /// Whether every request's pickup node precedes its delivery node.
    pub fn is_precedence_feasible(&self, instance: &Instance) -> bool {
        feasibility::precedence_feasible(instance, &self.nodes)
    }

    pub fn is_feasible(&self, instance: &Instance) -> bool {
        feasibility::is_feasible(instance, &self.nodes)
    }
}
