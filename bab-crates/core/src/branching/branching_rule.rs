use std::fmt::Debug;
use std::fmt::Display;

use super::BranchingDecision;
use super::BranchingStrategy;
use super::FirstFractional;
use super::MostFractional;
use crate::search::SearchNode;

/// The branching strategies which can be selected from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum BranchingRule {
    /// Branch on the first fractional integer variable in the order of the program.
    #[default]
    FirstFractional,
    /// Branch on the integer variable whose fractional part is closest to one half.
    MostFractional,
}

impl BranchingRule {
    pub fn create_strategy(self) -> DynamicBranchingStrategy {
        match self {
            BranchingRule::FirstFractional => DynamicBranchingStrategy::new(FirstFractional),
            BranchingRule::MostFractional => {
                DynamicBranchingStrategy::new(MostFractional::default())
            }
        }
    }
}

impl Display for BranchingRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BranchingRule::FirstFractional => write!(f, "first-fractional"),
            BranchingRule::MostFractional => write!(f, "most-fractional"),
        }
    }
}

/// A [`BranchingStrategy`] whose implementation is chosen at runtime.
pub struct DynamicBranchingStrategy {
    strategy: Box<dyn BranchingStrategy>,
}

impl DynamicBranchingStrategy {
    pub fn new(strategy: impl BranchingStrategy + 'static) -> Self {
        Self {
            strategy: Box::new(strategy),
        }
    }
}

impl Debug for DynamicBranchingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicBranchingStrategy").finish_non_exhaustive()
    }
}

impl BranchingStrategy for DynamicBranchingStrategy {
    fn select_branching_variable(
        &mut self,
        node: &SearchNode,
        tolerance: f64,
    ) -> Option<BranchingDecision> {
        self.strategy.select_branching_variable(node, tolerance)
    }
}
