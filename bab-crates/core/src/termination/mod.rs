//! A [`TerminationCondition`] is polled by the branch-and-bound driver once for every node that is
//! taken from the queue. It indicates when the search should stop, even if the queue has not been
//! exhausted. The most common example would be [`TimeBudget`], which gives the search a certain
//! time budget to complete.

mod combinator;
mod indefinite;
mod node_budget;
mod time_budget;

pub use combinator::*;
pub use indefinite::*;
pub use node_budget::*;
pub use time_budget::*;

/// The central trait that defines a termination condition. A termination condition determines when
/// the search should give up and report the best incumbent it has found so far.
pub trait TerminationCondition {
    /// Returns `true` when the search should stop, `false` otherwise.
    fn should_stop(&mut self) -> bool;

    /// Called by the driver after a node has been taken from the queue and processed.
    fn node_has_been_explored(&mut self) {}
}

impl<T: TerminationCondition> TerminationCondition for Option<T> {
    fn should_stop(&mut self) -> bool {
        match self {
            Some(t) => t.should_stop(),
            None => false,
        }
    }

    fn node_has_been_explored(&mut self) {
        if let Some(t) = self {
            t.node_has_been_explored()
        }
    }
}

impl<T: TerminationCondition + ?Sized> TerminationCondition for Box<T> {
    fn should_stop(&mut self) -> bool {
        (**self).should_stop()
    }

    fn node_has_been_explored(&mut self) {
        (**self).node_has_been_explored()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_condition_never_stops() {
        let mut condition: Option<NodeBudget> = None;

        condition.node_has_been_explored();

        assert!(!condition.should_stop());
    }

    #[test]
    fn present_condition_is_forwarded() {
        let mut condition = Some(NodeBudget::new(1));
        assert!(!condition.should_stop());

        condition.node_has_been_explored();

        assert!(condition.should_stop());
    }
}
