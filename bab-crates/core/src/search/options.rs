use std::fmt::Display;

/// The order in which pending nodes are taken from the queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum NodeOrdering {
    /// Best-first: the node whose parent has the largest relaxed objective is explored first.
    #[default]
    DescendingBound,
    /// The node whose parent has the smallest relaxed objective is explored first.
    AscendingBound,
}

impl Display for NodeOrdering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeOrdering::DescendingBound => write!(f, "descending-bound"),
            NodeOrdering::AscendingBound => write!(f, "ascending-bound"),
        }
    }
}

/// Options which influence how [`BranchAndBound`](super::BranchAndBound) explores the tree.
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    pub node_ordering: NodeOrdering,
    /// A relaxed value within this distance of an integer counts as integral.
    pub integrality_tolerance: f64,
    /// A node is pruned when its bound is more than this amount below the incumbent.
    pub pruning_tolerance: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            node_ordering: NodeOrdering::default(),
            integrality_tolerance: 1e-4,
            pruning_tolerance: 1e-3,
        }
    }
}
