use std::fmt;

/// Failures while loading and validating an instance file: either the text
/// doesn't parse, or it parses but violates a problem invariant.
#[derive(Debug)]
pub enum InstanceError {
    Malformed(String),
    InvariantViolation(String),
}

impl fmt::Display for InstanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceError::Malformed(msg) => write!(f, "malformed instance: {msg}"),
            InstanceError::InvariantViolation(msg) => write!(f, "invalid instance: {msg}"),
        }
    }
}

/// Failures while building an initial solution.
#[derive(Debug)]
pub enum ConstructionError {
    InsufficientRequests { required: usize, available: usize },
    GammaUnreachable { served: usize, gamma: usize },
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructionError::InsufficientRequests { required, available } => write!(
                f,
                "need at least {required} requests to reach gamma, only {available} available"
            ),
            ConstructionError::GammaUnreachable { served, gamma } => write!(
                f,
                "construction served {served} requests, short of gamma={gamma}"
            ),
        }
    }
}

/// Numerical edge cases in the objective. `ZeroMaxRouteDistance` is not
/// actually propagated by `objective` — it is caught and mapped to fairness=1 —
/// but is kept here since the fairness functions are exposed standalone too.
#[derive(Debug)]
pub enum ObjectiveError {
    EmptyRouteSet,
    ZeroTotalDistance,
    ZeroMaxRouteDistance,
}

impl fmt::Display for ObjectiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectiveError::EmptyRouteSet => write!(f, "no routes to evaluate"),
            ObjectiveError::ZeroTotalDistance => write!(f, "jain fairness undefined: total distance is zero"),
            ObjectiveError::ZeroMaxRouteDistance => write!(f, "max-min fairness undefined: max route distance is zero"),
        }
    }
}

/// Umbrella error for the thin external driver; not used by the core itself.
#[derive(Debug)]
pub enum SolverError {
    Instance(InstanceError),
    Construction(ConstructionError),
    Objective(ObjectiveError),
    Io(String),
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::Instance(e) => write!(f, "{e}"),
            SolverError::Construction(e) => write!(f, "{e}"),
            SolverError::Objective(e) => write!(f, "{e}"),
            SolverError::Io(msg) => write!(f, "io error: {msg}"),
        }
    }
}

impl From<InstanceError> for SolverError {
    fn from(e: InstanceError) -> Self {
        SolverError::Instance(e)
    }
}

impl From<ConstructionError> for SolverError {
    fn from(e: ConstructionError) -> Self {
        SolverError::Construction(e)
    }
}

impl From<ObjectiveError> for SolverError {
    fn from(e: ObjectiveError) -> Self {
        SolverError::Objective(e)
    }
}
