//! The relaxation oracle solves the continuous relaxation of a (sub-)problem. The search treats it
//! as a pure function: the same problem always yields the same [`Relaxation`].
mod good_lp_oracle;
mod relaxation;

pub use good_lp_oracle::*;
pub use relaxation::*;
use thiserror::Error;

use crate::model::LinearConstraint;
use crate::model::LinearExpression;
use crate::model::OptimisationDirection;
use crate::model::VariableDefinition;

/// Solves the continuous relaxation of a linear program; integrality requirements of the variables
/// are ignored.
pub trait RelaxationOracle {
    fn solve(&mut self, problem: &RelaxationProblem<'_>) -> Result<Relaxation, OracleError>;
}

impl<Oracle: RelaxationOracle + ?Sized> RelaxationOracle for &mut Oracle {
    fn solve(&mut self, problem: &RelaxationProblem<'_>) -> Result<Relaxation, OracleError> {
        (**self).solve(problem)
    }
}

/// A borrowed view of the linear program which is handed to a [`RelaxationOracle`].
#[derive(Clone, Copy, Debug)]
pub struct RelaxationProblem<'a> {
    pub variables: &'a [VariableDefinition],
    pub constraints: &'a [LinearConstraint],
    pub objective: &'a LinearExpression,
    pub direction: OptimisationDirection,
}

/// A failure of the relaxation backend which is not infeasibility.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    #[error("the relaxation is unbounded")]
    Unbounded,
    #[error("the relaxation returned a non-finite value for variable {0}")]
    NonFiniteValue(usize),
    #[error("the LP backend failed: {0}")]
    Backend(String),
}
