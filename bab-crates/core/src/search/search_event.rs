use super::SearchNode;
use crate::branching::BranchingDecision;

/// Reports what the driver decided for a node. Objective values and bounds are in maximisation
/// form, i.e. negated for a minimisation program.
#[derive(Debug, Clone, Copy)]
pub enum SearchEvent<'a> {
    RootSolved {
        bound: f64,
        queue_length: usize,
    },
    NodeInfeasible {
        node: &'a SearchNode,
        queue_length: usize,
    },
    /// The node cannot contain a solution better than the incumbent; this includes integral
    /// nodes which do not improve on it.
    NodePruned {
        node: &'a SearchNode,
        bound: f64,
        incumbent: f64,
        queue_length: usize,
    },
    IncumbentImproved {
        node: &'a SearchNode,
        objective_value: f64,
        queue_length: usize,
    },
    NodeBranched {
        node: &'a SearchNode,
        decision: BranchingDecision,
        queue_length: usize,
    },
    /// The node is fractional but the branching strategy returned no variable.
    NodeDropped {
        node: &'a SearchNode,
        queue_length: usize,
    },
}

impl SearchEvent<'_> {
    /// The number of nodes in the queue after the event.
    pub fn queue_length(&self) -> usize {
        match self {
            SearchEvent::RootSolved { queue_length, .. }
            | SearchEvent::NodeInfeasible { queue_length, .. }
            | SearchEvent::NodePruned { queue_length, .. }
            | SearchEvent::IncumbentImproved { queue_length, .. }
            | SearchEvent::NodeBranched { queue_length, .. }
            | SearchEvent::NodeDropped { queue_length, .. } => *queue_length,
        }
    }
}

/// Observes the decisions of the driver, e.g. for tracing or for tests.
pub trait SearchCallback {
    fn on_search_event(&mut self, event: &SearchEvent<'_>);
}

impl<F: FnMut(&SearchEvent<'_>)> SearchCallback for F {
    fn on_search_event(&mut self, event: &SearchEvent<'_>) {
        (self)(event)
    }
}

impl SearchCallback for () {
    fn on_search_event(&mut self, _event: &SearchEvent<'_>) {}
}

impl<T: SearchCallback> SearchCallback for Option<T> {
    fn on_search_event(&mut self, event: &SearchEvent<'_>) {
        if let Some(callback) = self {
            callback.on_search_event(event);
        }
    }
}
