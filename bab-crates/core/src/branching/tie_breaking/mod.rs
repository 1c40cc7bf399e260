//! Tie-breakers decide between branching candidates which receive the same score.
mod in_order_tie_breaker;

pub use in_order_tie_breaker::*;

/// Whether the tie-breaker should select the candidate with the largest or the smallest score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Maximum,
    Minimum,
}

/// Receives candidates one by one and selects one of the best among them.
pub trait TieBreaker<Var, Value> {
    fn consider(&mut self, variable: Var, value: Value);

    /// Returns the selected variable and resets the tie-breaker.
    fn select(&mut self) -> Option<Var>;

    fn get_direction(&self) -> Direction;
}
