use std::fmt::Display;

use thiserror::Error;

use super::Solution;
use crate::containers::KeyedVec;
use crate::model::VariableId;

/// The objective value, in maximisation form, which stands for "no integral solution found yet".
pub const NO_SOLUTION_SENTINEL: f64 = -1e20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// The queue was exhausted and the incumbent is an optimal integral solution.
    Optimal,
    /// The queue was exhausted without finding any integral solution.
    NoFeasibleSolution,
    /// The termination condition stopped the search; the incumbent, if any, is the best solution
    /// found so far.
    Terminated,
}

impl Display for SearchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchStatus::Optimal => write!(f, "optimal"),
            SearchStatus::NoFeasibleSolution => write!(f, "no feasible solution"),
            SearchStatus::Terminated => write!(f, "terminated"),
        }
    }
}

/// Returned when the solution of an outcome without an integral solution is requested.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("the search did not find an integral solution ({status})")]
pub struct NoFeasibleSolutionError {
    pub status: SearchStatus,
}

/// The result of [`BranchAndBound::solve`](crate::search::BranchAndBound::solve).
///
/// Without an integral solution the objective value is the sentinel (`-1e20` for maximisation,
/// `1e20` for minimisation). The assignment then holds the relaxed values of the root, or is empty
/// when the root relaxation is infeasible.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchOutcome {
    status: SearchStatus,
    objective_value: f64,
    assignment: KeyedVec<VariableId, f64>,
    has_solution: bool,
}

impl SearchOutcome {
    pub(crate) fn new(
        status: SearchStatus,
        objective_value: f64,
        assignment: KeyedVec<VariableId, f64>,
        has_solution: bool,
    ) -> Self {
        Self {
            status,
            objective_value,
            assignment,
            has_solution,
        }
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    /// The objective value of the incumbent in the direction of the program.
    pub fn objective_value(&self) -> f64 {
        self.objective_value
    }

    pub fn assignment(&self) -> &KeyedVec<VariableId, f64> {
        &self.assignment
    }

    /// Whether an integral solution was found; a terminated search may still have one.
    pub fn has_solution(&self) -> bool {
        self.has_solution
    }

    pub fn into_solution(self) -> Result<Solution, NoFeasibleSolutionError> {
        if !self.has_solution {
            return Err(NoFeasibleSolutionError {
                status: self.status,
            });
        }

        Ok(Solution::new(self.assignment, self.objective_value))
    }
}
