use thiserror::Error;

use super::ModelCloneError;
use crate::oracle::OracleError;

/// The failures which abort a branch-and-bound run. Infeasible relaxations are not errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error("relaxation oracle failed: {0}")]
    Oracle(#[from] OracleError),
    #[error("failed to create a child node: {0}")]
    ModelClone(#[from] ModelCloneError),
}
