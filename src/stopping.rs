//! Stopping criteria for iterated metaheuristics, composed the same way an
//! operator list is built up: small structs implementing one trait, combined
//! through thin wrapper types rather than closures.

use crate::types::Distance;

pub trait StoppingCriterion {
    /// Called once per iteration with the current iteration count (0-based)
    /// and the current objective value. Returns `true` once the search
    /// should stop.
    fn should_stop(&mut self, iteration: usize, objective: Distance) -> bool;

    /// Resets any accumulated state, for reuse across independent runs.
    fn reset(&mut self);
}

#[derive(Clone, Debug)]
pub struct MaxIterations {
    pub max_iter: usize,
}

impl MaxIterations {
    pub fn new(max_iter: usize) -> Self {
        MaxIterations { max_iter }
    }
}

impl StoppingCriterion for MaxIterations {
    fn should_stop(&mut self, iteration: usize, _objective: Distance) -> bool {
        iteration + 1 >= self.max_iter
    }

    fn reset(&mut self) {}
}

#[derive(Clone, Debug)]
pub struct ObjectiveThreshold {
    pub threshold: Distance,
}

impl ObjectiveThreshold {
    pub fn new(threshold: Distance) -> Self {
        ObjectiveThreshold { threshold }
    }
}

impl StoppingCriterion for ObjectiveThreshold {
    fn should_stop(&mut self, _iteration: usize, objective: Distance) -> bool {
        objective <= self.threshold
    }

    fn reset(&mut self) {}
}

/// Stops once the objective hasn't improved by more than `epsilon` since the
/// last call. The first call never stops (there's nothing to compare yet).
#[derive(Clone, Debug)]
pub struct ImprovementThreshold {
    pub epsilon: Distance,
    last: Option<Distance>,
}

impl ImprovementThreshold {
    pub fn new(epsilon: Distance) -> Self {
        ImprovementThreshold { epsilon, last: None }
    }
}

impl StoppingCriterion for ImprovementThreshold {
    fn should_stop(&mut self, _iteration: usize, objective: Distance) -> bool {
        let stop = match self.last {
            Some(prev) => (prev - objective) < self.epsilon,
            None => false,
        };
        self.last = Some(objective);
        stop
    }

    fn reset(&mut self) {
        self.last = None;
    }
}

/// Stops as soon as any inner criterion wants to stop.
pub struct AnyOf {
    criteria: Vec<Box<dyn StoppingCriterion>>,
}

impl AnyOf {
    pub fn new(criteria: Vec<Box<dyn StoppingCriterion>>) -> Self {
        AnyOf { criteria }
    }
}

impl StoppingCriterion for AnyOf {
    fn should_stop(&mut self, iteration: usize, objective: Distance) -> bool {
        // Don't short-circuit: every criterion needs its `should_stop` called
        // each iteration to keep its internal state (e.g. ImprovementThreshold's
        // last-seen value) current.
        let mut stop = false;
        for c in &mut self.criteria {
            if c.should_stop(iteration, objective) {
                stop = true;
            }
        }
        stop
    }

    fn reset(&mut self) {
        for c in &mut self.criteria {
            c.reset();
        }
    }
}

/// Stops only once every inner criterion wants to stop.
pub struct AllOf {
    criteria: Vec<Box<dyn StoppingCriterion>>,
}

impl AllOf {
    pub fn new(criteria: Vec<Box<dyn StoppingCriterion>>) -> Self {
        AllOf { criteria }
    }
}

impl StoppingCriterion for AllOf {
    fn should_stop(&mut self, iteration: usize, objective: Distance) -> bool {
        let mut stop = true;
        for c in &mut self.criteria {
            if !c.should_stop(iteration, objective) {
                stop = false;
            }
        }
        stop
    }

    fn reset(&mut self) {
        for c in &mut self.criteria {
            c.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_iterations_stops_at_bound() {
        let mut c = MaxIterations::new(3);
        assert!(!c.should_stop(0, 100.0));
        assert!(!c.should_stop(1, 100.0));
        assert!(c.should_stop(2, 100.0));
    }

    #[test]
    fn improvement_threshold_never_stops_on_first_call() {
        let mut c = ImprovementThreshold::new(0.5);
        assert!(!c.should_stop(0, 100.0));
        assert!(c.should_stop(1, 99.9));
        c.reset();
        assert!(!c.should_stop(0, 50.0));
    }

    #[test]
    fn any_of_stops_when_one_criterion_fires() {
        let mut c = AnyOf::new(vec![
            Box::new(MaxIterations::new(1000)),
            Box::new(ObjectiveThreshold::new(10.0)),
        ]);
        assert!(!c.should_stop(0, 100.0));
        assert!(c.should_stop(1, 5.0));
    }
}
