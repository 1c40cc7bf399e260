//! The outcome of a branch-and-bound run and the solutions it contains.
mod search_outcome;
mod solution;

pub use search_outcome::*;
pub use solution::*;
