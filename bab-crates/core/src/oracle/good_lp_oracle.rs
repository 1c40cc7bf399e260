use std::fmt::Display;

use good_lp::constraint;
use good_lp::solvers::clarabel::clarabel;
use good_lp::solvers::microlp::microlp;
use good_lp::variable;
use good_lp::Constraint;
use good_lp::Expression;
use good_lp::ProblemVariables;
use good_lp::ResolutionError;
use good_lp::Solution;
use good_lp::Solver;
use good_lp::SolverModel;
use good_lp::Variable;
use log::trace;

use super::OracleError;
use super::Relaxation;
use super::RelaxationOracle;
use super::RelaxationProblem;
use super::RelaxedSolution;
use crate::containers::StorageKey;
use crate::model::Comparison;
use crate::model::LinearExpression;
use crate::model::OptimisationDirection;

/// The linear programming backend of `good_lp` which solves the relaxations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum LpBackend {
    /// The pure Rust simplex implementation `microlp`.
    #[default]
    MicroLp,
    /// The interior point solver `clarabel`; solutions are accurate up to its tolerances.
    Clarabel,
}

impl Display for LpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LpBackend::MicroLp => write!(f, "micro-lp"),
            LpBackend::Clarabel => write!(f, "clarabel"),
        }
    }
}

/// A [`RelaxationOracle`] which rebuilds the full linear program for every call and hands it to
/// `good_lp`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoodLpOracle {
    backend: LpBackend,
}

impl GoodLpOracle {
    pub fn new(backend: LpBackend) -> Self {
        GoodLpOracle { backend }
    }

    pub fn backend(&self) -> LpBackend {
        self.backend
    }
}

impl RelaxationOracle for GoodLpOracle {
    fn solve(&mut self, problem: &RelaxationProblem<'_>) -> Result<Relaxation, OracleError> {
        let mut problem_variables = ProblemVariables::new();
        let variables = problem
            .variables
            .iter()
            .map(|definition| {
                let mut declaration = variable();
                if let Some(lower_bound) = definition.lower_bound() {
                    declaration = declaration.min(lower_bound);
                }
                if let Some(upper_bound) = definition.upper_bound() {
                    declaration = declaration.max(upper_bound);
                }
                problem_variables.add(declaration)
            })
            .collect::<Vec<_>>();

        let objective = to_expression(problem.objective, &variables)?;

        let constraints = problem
            .constraints
            .iter()
            .map(|linear_constraint| {
                let lhs = to_expression(linear_constraint.lhs(), &variables)?;
                let rhs = linear_constraint.rhs();

                Ok(match linear_constraint.comparison() {
                    Comparison::LessThanOrEquals => constraint!(lhs <= rhs),
                    Comparison::GreaterThanOrEquals => constraint!(lhs >= rhs),
                    Comparison::Equals => constraint!(lhs == rhs),
                })
            })
            .collect::<Result<Vec<_>, OracleError>>()?;

        let lp = LinearProgram {
            problem_variables,
            objective,
            direction: problem.direction,
            constraints,
        };
        let result = match self.backend {
            LpBackend::MicroLp => lp.solve_with(microlp, &variables),
            LpBackend::Clarabel => lp.solve_with(clarabel, &variables),
        };

        let values = match result {
            Ok(values) => values,
            Err(ResolutionError::Infeasible) => {
                trace!("The {} backend reports an infeasible relaxation", self.backend);
                return Ok(Relaxation::Infeasible);
            }
            Err(ResolutionError::Unbounded) => return Err(OracleError::Unbounded),
            Err(error) => return Err(OracleError::Backend(error.to_string())),
        };

        if let Some(index) = values.iter().position(|value| !value.is_finite()) {
            return Err(OracleError::NonFiniteValue(index));
        }

        let objective_value = problem.objective.evaluate(&values);
        Ok(Relaxation::Solved(RelaxedSolution {
            values,
            objective_value,
        }))
    }
}

/// The relaxation translated to `good_lp`, waiting for a backend.
struct LinearProgram {
    problem_variables: ProblemVariables,
    objective: Expression,
    direction: OptimisationDirection,
    constraints: Vec<Constraint>,
}

impl LinearProgram {
    fn solve_with<S: Solver>(
        self,
        solver: S,
        variables: &[Variable],
    ) -> Result<Vec<f64>, ResolutionError>
    where
        S::Model: SolverModel<Error = ResolutionError>,
    {
        let unsolved = match self.direction {
            OptimisationDirection::Maximise => self.problem_variables.maximise(self.objective),
            OptimisationDirection::Minimise => self.problem_variables.minimise(self.objective),
        };

        let mut model = unsolved.using(solver);
        for constraint in self.constraints {
            model = model.with(constraint);
        }

        let solution = model.solve()?;
        Ok(variables
            .iter()
            .map(|&variable| solution.value(variable))
            .collect())
    }
}

fn to_expression(
    expression: &LinearExpression,
    variables: &[Variable],
) -> Result<Expression, OracleError> {
    let mut result = Expression::from(expression.constant_term());
    for (variable, coefficient) in expression.terms() {
        let lp_variable = variables.get(variable.index()).ok_or_else(|| {
            OracleError::Backend(format!("variable {variable} is not part of the relaxation"))
        })?;
        result += coefficient * *lp_variable;
    }
    Ok(result)
}
