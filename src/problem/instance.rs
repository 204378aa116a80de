use crate::error::InstanceError;
use crate::types::{Coord, Demand, Distance, Fairness, NodeId, RequestId};
use crate::utils::Matrix2;

/// The immutable problem definition.
///
/// Node space is `2n + 1` wide: depot (0), pickups (`1..=n`), deliveries
/// (`n+1..=2n`).
#[derive(Debug, Clone)]
pub struct Instance {
    pub n: usize,
    pub n_vehicles: usize,
    pub capacity: Demand,
    pub gamma: usize,
    pub rho: f64,
    pub fairness: Fairness,
    pub demands: Vec<Demand>,
    pub coords: Vec<(Coord, Coord)>,
    pub dist: Matrix2<Distance>,
    pub request_of_node: Vec<Option<RequestId>>,
    pub load_change: Vec<Demand>,
}

impl Instance {
    pub fn num_nodes(&self) -> usize {
        2 * self.n + 1
    }

    pub fn dist(&self, u: NodeId, v: NodeId) -> Distance {
        *self.dist.get(u.index(), v.index())
    }

    pub fn pickup_node(&self, r: RequestId) -> NodeId {
        NodeId::pickup_of(r)
    }

    pub fn delivery_node(&self, r: RequestId) -> NodeId {
        NodeId::delivery_of(r, self.n)
    }

    pub fn demand(&self, r: RequestId) -> Demand {
        self.demands[r.index()]
    }

    pub fn requests(&self) -> impl Iterator<Item = RequestId> + '_ {
        (0..self.n).map(RequestId::from_index)
    }

    /// Builds an `Instance` from its raw, already-parsed fields, deriving the
    /// `dist`/`request_of_node`/`load_change` arrays and validating every
    /// problem invariant before returning.
    pub fn from_raw(
        n: usize,
        n_vehicles: usize,
        capacity: Demand,
        gamma: usize,
        rho: f64,
        fairness: Fairness,
        demands: Vec<Demand>,
        coords: Vec<(Coord, Coord)>,
    ) -> Result<Self, InstanceError> {
        if demands.len() != n {
            return Err(InstanceError::Malformed(format!(
                "expected {n} demands, got {}",
                demands.len()
            )));
        }
        let num_nodes = 2 * n + 1;
        if coords.len() != num_nodes {
            return Err(InstanceError::Malformed(format!(
                "expected {num_nodes} coordinates, got {}",
                coords.len()
            )));
        }

        let mut dist = Matrix2::new(num_nodes, num_nodes, 0.0);
        for u in 0..num_nodes {
            for v in 0..num_nodes {
                let (ux, uy) = coords[u];
                let (vx, vy) = coords[v];
                let d = ((ux - vx).powi(2) + (uy - vy).powi(2)).sqrt();
                dist.set(u, v, d);
            }
        }

        let mut request_of_node = vec![None; num_nodes];
        let mut load_change = vec![0 as Demand; num_nodes];
        for i in 0..n {
            let r = RequestId::from_index(i);
            let pickup = NodeId::pickup_of(r).index();
            let delivery = NodeId::delivery_of(r, n).index();
            request_of_node[pickup] = Some(r);
            request_of_node[delivery] = Some(r);
            load_change[pickup] = demands[i];
            load_change[delivery] = -demands[i];
        }

        let instance = Instance {
            n,
            n_vehicles,
            capacity,
            gamma,
            rho,
            fairness,
            demands,
            coords,
            dist,
            request_of_node,
            load_change,
        };
        instance.validate()?;
        Ok(instance)
    }

    /// Checks every structural and numeric invariant. Run once at load time; never re-run
    /// implicitly since the instance is immutable afterwards.
    fn validate(&self) -> Result<(), InstanceError> {
        if self.n == 0 {
            return Err(InstanceError::InvariantViolation("n must be positive".into()));
        }
        if self.n_vehicles == 0 {
            return Err(InstanceError::InvariantViolation(
                "number of vehicles must be positive".into(),
            ));
        }
        if self.capacity <= 0 {
            return Err(InstanceError::InvariantViolation("capacity must be positive".into()));
        }
        if self.gamma == 0 || self.gamma > self.n {
            return Err(InstanceError::InvariantViolation(format!(
                "gamma must be in 1..={}, got {}",
                self.n, self.gamma
            )));
        }
        if self.n_vehicles > self.n {
            return Err(InstanceError::InvariantViolation(
                "number of vehicles must not exceed number of requests".into(),
            ));
        }
        for (i, &d) in self.demands.iter().enumerate() {
            if d <= 0 || d > self.capacity {
                return Err(InstanceError::InvariantViolation(format!(
                    "demand of request {i} is {d}, expected in (0, {}]",
                    self.capacity
                )));
            }
        }
        for (u, v) in coord_finite_check(&self.coords) {
            if !v {
                return Err(InstanceError::InvariantViolation(format!(
                    "coordinate of node {u} is not finite"
                )));
            }
        }
        let num_nodes = self.num_nodes();
        for u in 0..num_nodes {
            if self.dist(NodeId::new(u), NodeId::new(u)) != 0.0 {
                return Err(InstanceError::InvariantViolation(format!(
                    "distance matrix diagonal at {u} is not zero"
                )));
            }
            for v in 0..num_nodes {
                let duv = self.dist(NodeId::new(u), NodeId::new(v));
                let dvu = self.dist(NodeId::new(v), NodeId::new(u));
                if duv < 0.0 {
                    return Err(InstanceError::InvariantViolation(format!(
                        "distance({u}, {v}) is negative"
                    )));
                }
                if (duv - dvu).abs() > 1e-9 {
                    return Err(InstanceError::InvariantViolation(format!(
                        "distance matrix is not symmetric at ({u}, {v})"
                    )));
                }
            }
        }
        Ok(())
    }
}

fn coord_finite_check(coords: &[(Coord, Coord)]) -> impl Iterator<Item = (usize, bool)> + '_ {
    coords
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| (i, x.is_finite() && y.is_finite()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_instance() -> Instance {
        // n=2, nK=1, C=10, gamma=2, demands=[3,5]
        let coords = vec![
            (0.0, 0.0), // depot
            (1.0, 0.0), // pickup 1
            (0.0, 1.0), // pickup 2
            (2.0, 0.0), // delivery 1
            (0.0, 2.0), // delivery 2
        ];
        Instance::from_raw(2, 1, 10, 2, 0.0, Fairness::Jain, vec![3, 5], coords).unwrap()
    }

    #[test]
    fn derives_request_of_node_and_load_change() {
        let instance = toy_instance();
        let r1 = RequestId::from_index(0);
        let r2 = RequestId::from_index(1);
        assert_eq!(instance.request_of_node[instance.pickup_node(r1).index()], Some(r1));
        assert_eq!(instance.request_of_node[instance.delivery_node(r2).index()], Some(r2));
        assert_eq!(instance.load_change[instance.pickup_node(r1).index()], 3);
        assert_eq!(instance.load_change[instance.delivery_node(r1).index()], -3);
        assert_eq!(instance.request_of_node[NodeId::DEPOT.index()], None);
    }

    #[test]
    fn rejects_demand_exceeding_capacity() {
        let coords = vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)];
        let result = Instance::from_raw(1, 1, 5, 1, 0.0, Fairness::Jain, vec![6], coords);
        assert!(matches!(result, Err(InstanceError::InvariantViolation(_))));
    }

    #[test]
    fn rejects_zero_demand() {
        let coords = vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)];
        let result = Instance::from_raw(1, 1, 5, 1, 0.0, Fairness::Jain, vec![0], coords);
        assert!(matches!(result, Err(InstanceError::InvariantViolation(_))));
    }

    #[test]
    fn rejects_gamma_above_n() {
        let coords = vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)];
        let result = Instance::from_raw(1, 1, 5, 2, 0.0, Fairness::Jain, vec![3], coords);
        assert!(matches!(result, Err(InstanceError::InvariantViolation(_))));
    }
}
