use super::fractional_variables;
use crate::branching::BranchingDecision;
use crate::branching::BranchingStrategy;
use crate::search::SearchNode;

/// Branches on the first integer variable (in the order in which the variables were created) with
/// a fractional relaxed value.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFractional;

impl BranchingStrategy for FirstFractional {
    fn select_branching_variable(
        &mut self,
        node: &SearchNode,
        tolerance: f64,
    ) -> Option<BranchingDecision> {
        fractional_variables(node, tolerance)
            .next()
            .map(|(variable, value)| BranchingDecision { variable, value })
    }
}
