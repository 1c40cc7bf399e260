use super::fractional_variables;
use crate::branching::BranchingDecision;
use crate::branching::BranchingStrategy;
use crate::branching::Direction;
use crate::branching::InOrderTieBreaker;
use crate::branching::TieBreaker;
use crate::model::VariableId;
use crate::search::SearchNode;

/// Branches on the integer variable whose relaxed value has a fractional part closest to `0.5`;
/// among equally fractional variables the first one is selected.
#[derive(Debug)]
pub struct MostFractional {
    tie_breaker: InOrderTieBreaker<(VariableId, f64), f64>,
}

impl Default for MostFractional {
    fn default() -> Self {
        Self {
            tie_breaker: InOrderTieBreaker::new(Direction::Minimum),
        }
    }
}

impl BranchingStrategy for MostFractional {
    fn select_branching_variable(
        &mut self,
        node: &SearchNode,
        tolerance: f64,
    ) -> Option<BranchingDecision> {
        for (variable, value) in fractional_variables(node, tolerance) {
            let distance_to_half = (value - value.floor() - 0.5).abs();
            self.tie_breaker.consider((variable, value), distance_to_half);
        }

        self.tie_breaker
            .select()
            .map(|(variable, value)| BranchingDecision { variable, value })
    }
}
