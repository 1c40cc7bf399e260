use std::rc::Rc;

use log::trace;
use thiserror::Error;

use crate::containers::StorageKey;
use crate::model::IntegerProgram;
use crate::model::LinearConstraint;
use crate::model::LinearExpression;
use crate::model::OptimisationDirection;
use crate::model::VariableDefinition;
use crate::model::VariableId;
use crate::model::VariableKind;
use crate::oracle::OracleError;
use crate::oracle::Relaxation;
use crate::oracle::RelaxationOracle;
use crate::oracle::RelaxationProblem;
use crate::oracle::RelaxedSolution;

/// The name of the variable which is appended to every program to carry the objective value.
pub const OBJECTIVE_VARIABLE_NAME: &str = "objective";

/// Returned when a child node cannot be created from its parent.
#[derive(Error, Debug, Copy, Clone, PartialEq)]
pub enum ModelCloneError {
    #[error("variable {0} does not belong to the node")]
    UnknownVariable(VariableId),
    #[error("variable {0} has no relaxed value to branch on")]
    UnsetValue(VariableId),
    #[error("variable {variable} has the non-finite relaxed value {value}")]
    NonFiniteValue { variable: VariableId, value: f64 },
}

/// The result of solving the relaxation of a [`SearchNode`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RelaxationOutcome {
    Solved { objective_value: f64 },
    Infeasible,
}

/// One sub-problem of the branch-and-bound tree.
///
/// The last variable of a node is the objective variable; it equals the objective of the program,
/// negated for minimisation, and the node objective maximises it. A child is an independent copy
/// of its parent with exactly one extra bound constraint. Only the variable declarations are
/// shared, and those are never mutated.
#[derive(Clone, Debug)]
pub struct SearchNode {
    variables: Rc<[VariableDefinition]>,
    constraints: Vec<LinearConstraint>,
    objective: LinearExpression,
    relaxation: Option<RelaxedSolution>,
    depth: usize,
}

impl SearchNode {
    /// Creates the root of the search tree for `program`.
    pub fn root(program: &IntegerProgram) -> SearchNode {
        let mut variables = program.variables().iter().cloned().collect::<Vec<_>>();
        let objective_variable = VariableId::create_from_index(variables.len());
        variables.push(VariableDefinition::new(
            OBJECTIVE_VARIABLE_NAME,
            None,
            None,
            VariableKind::Continuous,
        ));

        let mut constraints = program.constraints().to_vec();
        constraints.push(LinearConstraint::equals(
            objective_variable,
            program
                .objective()
                .clone()
                .scaled(program.direction().maximisation_factor()),
        ));

        SearchNode {
            variables: variables.into(),
            constraints,
            objective: objective_variable.into(),
            relaxation: None,
            depth: 0,
        }
    }

    pub fn variables(&self) -> &[VariableDefinition] {
        &self.variables
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &LinearExpression {
        &self.objective
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn objective_variable(&self) -> VariableId {
        VariableId::create_from_index(self.variables.len() - 1)
    }

    /// The variables of the program this node was created from, i.e. all but the objective
    /// variable.
    pub fn decision_variables(
        &self,
    ) -> impl Iterator<Item = (VariableId, &VariableDefinition)> + '_ {
        self.variables[..self.variables.len() - 1]
            .iter()
            .enumerate()
            .map(|(index, definition)| (VariableId::create_from_index(index), definition))
    }

    pub fn is_solved(&self) -> bool {
        self.relaxation.is_some()
    }

    /// The relaxed value of `variable`, if the relaxation has been solved.
    pub fn value(&self, variable: VariableId) -> Option<f64> {
        self.relaxation
            .as_ref()
            .and_then(|relaxation| relaxation.values.get(variable.index()).copied())
    }

    pub fn values(&self) -> Option<&[f64]> {
        self.relaxation
            .as_ref()
            .map(|relaxation| relaxation.values.as_slice())
    }

    /// The value of the objective variable in the relaxation; an upper bound on every integral
    /// solution in the subtree of this node.
    pub fn bound(&self) -> Option<f64> {
        self.value(self.objective_variable())
    }

    /// Returns true iff every integer decision variable has a relaxed value within `tolerance` of
    /// an integer. A node without a solved relaxation is never integral.
    pub fn is_integral(&self, tolerance: f64) -> bool {
        let Some(values) = self.values() else {
            return false;
        };

        self.decision_variables()
            .filter(|(_, definition)| definition.is_integer())
            .all(|(variable, _)| {
                values
                    .get(variable.index())
                    .is_some_and(|value| (value - value.round()).abs() <= tolerance)
            })
    }

    /// Creates a copy of this node with the additional constraint `variable <= floor(value)`.
    pub fn branch_floor(&self, variable: VariableId) -> Result<SearchNode, ModelCloneError> {
        let value = self.branching_value(variable)?;
        Ok(self.child(LinearConstraint::upper_bound(variable, value.floor())))
    }

    /// Creates a copy of this node with the additional constraint `variable >= ceil(value)`.
    pub fn branch_ceil(&self, variable: VariableId) -> Result<SearchNode, ModelCloneError> {
        let value = self.branching_value(variable)?;
        Ok(self.child(LinearConstraint::lower_bound(variable, value.ceil())))
    }

    fn branching_value(&self, variable: VariableId) -> Result<f64, ModelCloneError> {
        if variable.index() >= self.variables.len() {
            return Err(ModelCloneError::UnknownVariable(variable));
        }

        let value = self
            .value(variable)
            .ok_or(ModelCloneError::UnsetValue(variable))?;
        if !value.is_finite() {
            return Err(ModelCloneError::NonFiniteValue { variable, value });
        }

        Ok(value)
    }

    fn child(&self, bound: LinearConstraint) -> SearchNode {
        trace!("Creating child at depth {} with {bound}", self.depth + 1);

        let mut constraints = self.constraints.clone();
        constraints.push(bound);

        SearchNode {
            variables: Rc::clone(&self.variables),
            constraints,
            objective: self.objective.clone(),
            relaxation: None,
            depth: self.depth + 1,
        }
    }

    /// Solves the relaxation of this node and stores the relaxed values. A node which has already
    /// been solved does not consult the oracle again.
    pub fn solve_relaxation(
        &mut self,
        oracle: &mut impl RelaxationOracle,
    ) -> Result<RelaxationOutcome, OracleError> {
        if let Some(relaxation) = &self.relaxation {
            return Ok(RelaxationOutcome::Solved {
                objective_value: relaxation.objective_value,
            });
        }

        let relaxation = oracle.solve(&RelaxationProblem {
            variables: &self.variables,
            constraints: &self.constraints,
            objective: &self.objective,
            direction: OptimisationDirection::Maximise,
        })?;

        match relaxation {
            Relaxation::Solved(solution) => {
                let objective_value = solution.objective_value;
                self.relaxation = Some(solution);
                Ok(RelaxationOutcome::Solved { objective_value })
            }
            Relaxation::Infeasible => Ok(RelaxationOutcome::Infeasible),
        }
    }
}
