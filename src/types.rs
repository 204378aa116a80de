use std::num::{NonZeroU16, NonZeroU32};

/// 2D Euclidean coordinate component.
pub type Coord = f64;
/// Euclidean distance / objective value.
pub type Distance = f64;
/// Request demand / vehicle capacity.
pub type Demand = i64;

/// A node index into the `2n + 1` node space: depot (0), pickups (1..=n),
/// deliveries (n+1..=2n). Unlike `RequestId`/`VehicleId`, this is allowed to be
/// zero because the depot itself is node zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    pub const DEPOT: NodeId = NodeId(0);

    #[inline(always)]
    pub fn new(value: usize) -> Self {
        NodeId(value as u32)
    }

    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline(always)]
    pub fn is_depot(self) -> bool {
        self.0 == 0
    }

    /// The pickup node of request `r` (1-indexed requests, 0-indexed `r.index()`).
    #[inline(always)]
    pub fn pickup_of(r: RequestId) -> Self {
        NodeId((r.index() + 1) as u32)
    }

    /// The delivery node of request `r`, given the instance's request count `n`.
    #[inline(always)]
    pub fn delivery_of(r: RequestId, n: usize) -> Self {
        NodeId((r.index() + 1 + n) as u32)
    }

    /// Whether this node is a pickup node, given `n`.
    #[inline(always)]
    pub fn is_pickup(self, n: usize) -> bool {
        self.0 >= 1 && (self.0 as usize) <= n
    }

    /// Whether this node is a delivery node, given `n`.
    #[inline(always)]
    pub fn is_delivery(self, n: usize) -> bool {
        (self.0 as usize) > n
    }

    /// The request this node belongs to, or `None` for the depot.
    #[inline(always)]
    pub fn request_of(self, n: usize) -> Option<RequestId> {
        if self.0 == 0 {
            None
        } else if (self.0 as usize) <= n {
            RequestId::new(self.0 as usize)
        } else {
            RequestId::new(self.0 as usize - n)
        }
    }
}

/// A candidate transport request, 1-indexed internally (mirrors the reference
/// crate's `CallId`, minus the sign-encoded pickup/delivery distinction — here
/// pickup/delivery is a function of the node space, not the ID itself).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct RequestId(NonZeroU32);

impl RequestId {
    /// Creates a request ID from a 1-indexed raw value. Returns `None` for zero.
    #[inline(always)]
    pub fn new(value: usize) -> Option<Self> {
        NonZeroU32::new(value as u32).map(RequestId)
    }

    /// Creates a request ID from a 0-indexed position.
    #[inline(always)]
    pub fn from_index(idx: usize) -> Self {
        RequestId(NonZeroU32::new((idx + 1) as u32).expect("index + 1 is never zero"))
    }

    #[inline(always)]
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// 0-indexed position for array indexing into `demands`, etc.
    #[inline(always)]
    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl TryFrom<usize> for RequestId {
    type Error = &'static str;
    fn try_from(value: usize) -> Result<Self, Self::Error> {
        RequestId::new(value).ok_or("RequestId cannot be zero")
    }
}

/// A vehicle in the homogeneous fleet, 1-indexed internally.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct VehicleId(NonZeroU16);

impl VehicleId {
    #[inline(always)]
    pub fn new(value: u16) -> Option<Self> {
        NonZeroU16::new(value).map(VehicleId)
    }

    #[inline(always)]
    pub fn from_index(idx: usize) -> Option<Self> {
        let value = idx.checked_add(1)?;
        if value > u16::MAX as usize {
            None
        } else {
            NonZeroU16::new(value as u16).map(VehicleId)
        }
    }

    #[inline(always)]
    pub fn get(self) -> u16 {
        self.0.get()
    }

    #[inline(always)]
    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl TryFrom<usize> for VehicleId {
    type Error = &'static str;
    fn try_from(value: usize) -> Result<Self, Self::Error> {
        if value == 0 {
            return Err("VehicleId cannot be zero");
        }
        if value > u16::MAX as usize {
            return Err("Value too large for VehicleId");
        }
        NonZeroU16::new(value as u16)
            .map(VehicleId)
            .ok_or("Failed to create VehicleId")
    }
}

impl PartialEq<u16> for VehicleId {
    fn eq(&self, other: &u16) -> bool {
        self.0.get() == *other
    }
}

/// Which fairness index the objective penalizes deviation from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Fairness {
    Jain,
    Gini,
    MaxMin,
}

impl Fairness {
    pub fn as_str(self) -> &'static str {
        match self {
            Fairness::Jain => "jain",
            Fairness::Gini => "gini",
            Fairness::MaxMin => "maxmin",
        }
    }
}

impl std::str::FromStr for Fairness {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jain" => Ok(Fairness::Jain),
            "gini" => Ok(Fairness::Gini),
            "maxmin" => Ok(Fairness::MaxMin),
            other => Err(format!("unknown fairness index: {other}")),
        }
    }
}
