//! Decides whether a team of a division can still finish with the most wins.
//!
//! A team is trivially eliminated when another team already has more wins than it can reach.
//! Otherwise the question is whether the games left between the other teams can be distributed
//! such that none of them overtakes it; this is a maximum flow problem which is solved either with
//! augmenting paths ([`EliminationMethod::NetworkFlow`]) or as a linear program through the
//! branch-and-bound engine ([`EliminationMethod::LinearProgramming`]).
mod division;
mod elimination_network;
mod team;

use std::fmt::Display;

use bab_core::results::NoFeasibleSolutionError;
use bab_core::search::SearchError;
use bab_core::ConstraintOperationError;
pub use division::*;
pub use team::*;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum EliminationMethod {
    /// Compute a maximum flow with breadth-first augmenting paths.
    #[default]
    NetworkFlow,
    /// Solve the maximum flow as a linear program.
    LinearProgramming,
}

impl Display for EliminationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EliminationMethod::NetworkFlow => write!(f, "network-flow"),
            EliminationMethod::LinearProgramming => write!(f, "linear-programming"),
        }
    }
}

#[derive(Error, Debug)]
pub enum EliminationError {
    #[error("team {team} is not in a division of {num_teams} teams")]
    UnknownTeam { team: usize, num_teams: usize },
    #[error("failed to build the flow program: {0}")]
    Model(#[from] ConstraintOperationError),
    #[error("failed to solve the flow program: {0}")]
    Search(#[from] SearchError),
    #[error("the search was stopped before the flow program was solved")]
    Terminated,
    #[error("the flow program has no solution: {0}")]
    NoSolution(#[from] NoFeasibleSolutionError),
}
