use thiserror::Error;

/// The result of solving a relaxation: either an optimal assignment, or a proof that no assignment
/// satisfies the constraints.
#[derive(Clone, Debug, PartialEq)]
pub enum Relaxation {
    Solved(RelaxedSolution),
    Infeasible,
}

/// An optimal assignment of the relaxation; `values[i]` is the value of the variable with index
/// `i`.
#[derive(Clone, Debug, PartialEq)]
pub struct RelaxedSolution {
    pub values: Vec<f64>,
    pub objective_value: f64,
}

/// Returned when the solution of an infeasible relaxation is requested.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("the relaxation is infeasible")]
pub struct InfeasibleError;

impl Relaxation {
    pub fn is_infeasible(&self) -> bool {
        matches!(self, Relaxation::Infeasible)
    }

    pub fn solution(&self) -> Option<&RelaxedSolution> {
        match self {
            Relaxation::Solved(solution) => Some(solution),
            Relaxation::Infeasible => None,
        }
    }

    pub fn into_solution(self) -> Result<RelaxedSolution, InfeasibleError> {
        match self {
            Relaxation::Solved(solution) => Ok(solution),
            Relaxation::Infeasible => Err(InfeasibleError),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infeasible_relaxation_has_no_solution() {
        assert_eq!(Relaxation::Infeasible.into_solution(), Err(InfeasibleError));
        assert!(Relaxation::Infeasible.solution().is_none());
    }

    #[test]
    fn solved_relaxation_exposes_its_values() {
        let relaxation = Relaxation::Solved(RelaxedSolution {
            values: vec![1.0, 0.5],
            objective_value: 1.5,
        });

        assert!(!relaxation.is_infeasible());
        let solution = relaxation.into_solution().expect("solved");
        assert_eq!(solution.values, vec![1.0, 0.5]);
        assert_eq!(solution.objective_value, 1.5);
    }
}
