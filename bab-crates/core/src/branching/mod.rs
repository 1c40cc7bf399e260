//! Contains the strategies which decide on which fractional variable a node is split.
//!
//! A [`BranchingStrategy`] inspects the relaxed values of a solved [`SearchNode`] and returns a
//! [`BranchingDecision`]; the driver then creates the floor child `x <= floor(v)` and the ceiling
//! child `x >= ceil(v)`.
//!
//! The strategies provided are [`FirstFractional`], which follows the order of the variables in
//! the program, and [`MostFractional`], which picks the variable whose value is closest to the
//! middle of two integers. [`BranchingRule`] selects one of them from configuration.
mod branching_rule;
mod tie_breaking;
mod variable_selection;

pub use branching_rule::*;
pub use tie_breaking::*;
pub use variable_selection::*;

use crate::model::VariableId;
use crate::search::SearchNode;

/// The variable to branch on together with its (fractional) relaxed value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BranchingDecision {
    pub variable: VariableId,
    pub value: f64,
}

/// Selects the variable on which a node with a fractional relaxation is split.
pub trait BranchingStrategy {
    /// Returns the variable to branch on, or [`None`] if every integer variable of `node` is
    /// within `tolerance` of an integer.
    fn select_branching_variable(
        &mut self,
        node: &SearchNode,
        tolerance: f64,
    ) -> Option<BranchingDecision>;
}

impl<Strategy: BranchingStrategy + ?Sized> BranchingStrategy for Box<Strategy> {
    fn select_branching_variable(
        &mut self,
        node: &SearchNode,
        tolerance: f64,
    ) -> Option<BranchingDecision> {
        (**self).select_branching_variable(node, tolerance)
    }
}
