use std::fmt::Display;

use fnv::FnvHashMap;
use log::warn;

use super::LinearConstraint;
use super::LinearExpression;
use super::VariableDefinition;
use super::VariableId;
use super::VariableKind;
use crate::basic_types::ConstraintOperationError;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;

/// The direction of the optimisation, either maximising or minimising.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptimisationDirection {
    #[default]
    Maximise,
    Minimise,
}

impl OptimisationDirection {
    /// The factor which turns an objective in this direction into one that is maximised.
    pub(crate) fn maximisation_factor(self) -> f64 {
        match self {
            OptimisationDirection::Maximise => 1.0,
            OptimisationDirection::Minimise => -1.0,
        }
    }
}

impl Display for OptimisationDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptimisationDirection::Maximise => write!(f, "maximise"),
            OptimisationDirection::Minimise => write!(f, "minimise"),
        }
    }
}

/// A mixed-integer linear program: variables (some of them integral), linear constraints and a
/// linear objective with a direction.
///
/// ```rust
/// # use bab_core::model::IntegerProgram;
/// # use bab_core::model::LinearConstraint;
/// let mut program = IntegerProgram::new();
/// let x = program.new_integer_variable("x", Some(0.0), None);
/// let y = program.new_integer_variable("y", Some(0.0), None);
///
/// program
///     .add_constraint(LinearConstraint::less_than_or_equals(x, 1.5))
///     .expect("x belongs to the program");
/// program
///     .add_constraint(LinearConstraint::less_than_or_equals(y, 1.5))
///     .expect("y belongs to the program");
/// program.maximise(x + y).expect("the objective is well-formed");
///
/// assert_eq!(program.num_variables(), 2);
/// assert_eq!(program.constraints().len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct IntegerProgram {
    variables: KeyedVec<VariableId, VariableDefinition>,
    names: FnvHashMap<String, VariableId>,
    constraints: Vec<LinearConstraint>,
    objective: LinearExpression,
    direction: OptimisationDirection,
}

impl IntegerProgram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_variable(&mut self, definition: VariableDefinition) -> VariableId {
        let name = definition.name().to_owned();
        let variable = self.variables.push(definition);

        if let Some(previous) = self.names.insert(name.clone(), variable) {
            warn!("Variable name '{name}' is used by both {previous} and {variable}; lookups by name return {variable}");
        }

        variable
    }

    pub fn new_integer_variable(
        &mut self,
        name: impl Into<String>,
        lower_bound: Option<f64>,
        upper_bound: Option<f64>,
    ) -> VariableId {
        self.new_variable(VariableDefinition::new(
            name,
            lower_bound,
            upper_bound,
            VariableKind::Integer,
        ))
    }

    /// Creates an integer variable with domain `{0, 1}`.
    pub fn new_binary_variable(&mut self, name: impl Into<String>) -> VariableId {
        self.new_integer_variable(name, Some(0.0), Some(1.0))
    }

    pub fn new_continuous_variable(
        &mut self,
        name: impl Into<String>,
        lower_bound: Option<f64>,
        upper_bound: Option<f64>,
    ) -> VariableId {
        self.new_variable(VariableDefinition::new(
            name,
            lower_bound,
            upper_bound,
            VariableKind::Continuous,
        ))
    }

    pub fn add_constraint(
        &mut self,
        constraint: LinearConstraint,
    ) -> Result<(), ConstraintOperationError> {
        self.validate(constraint.lhs())?;
        if !constraint.rhs().is_finite() {
            return Err(ConstraintOperationError::NonFiniteConstant(constraint.rhs()));
        }

        self.constraints.push(constraint);
        Ok(())
    }

    pub fn maximise(
        &mut self,
        objective: impl Into<LinearExpression>,
    ) -> Result<(), ConstraintOperationError> {
        self.set_objective(OptimisationDirection::Maximise, objective)
    }

    pub fn minimise(
        &mut self,
        objective: impl Into<LinearExpression>,
    ) -> Result<(), ConstraintOperationError> {
        self.set_objective(OptimisationDirection::Minimise, objective)
    }

    pub fn set_objective(
        &mut self,
        direction: OptimisationDirection,
        objective: impl Into<LinearExpression>,
    ) -> Result<(), ConstraintOperationError> {
        let objective = objective.into();
        self.validate(&objective)?;
        if !objective.constant_term().is_finite() {
            return Err(ConstraintOperationError::NonFiniteConstant(
                objective.constant_term(),
            ));
        }

        self.objective = objective;
        self.direction = direction;
        Ok(())
    }

    fn validate(&self, expression: &LinearExpression) -> Result<(), ConstraintOperationError> {
        for (variable, coefficient) in expression.terms() {
            if !self.variables.contains_key(variable) {
                return Err(ConstraintOperationError::UnknownVariable(variable));
            }
            if !coefficient.is_finite() {
                return Err(ConstraintOperationError::NonFiniteCoefficient {
                    variable,
                    coefficient,
                });
            }
        }
        Ok(())
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn variables(&self) -> &KeyedVec<VariableId, VariableDefinition> {
        &self.variables
    }

    pub fn variable(&self, variable: VariableId) -> Option<&VariableDefinition> {
        self.variables.get(variable)
    }

    pub fn variable_by_name(&self, name: &str) -> Option<VariableId> {
        self.names.get(name).copied()
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &LinearExpression {
        &self.objective
    }

    pub fn direction(&self) -> OptimisationDirection {
        self.direction
    }

    /// Returns whether `values` (indexed by variable) satisfies every bound, constraint and
    /// integrality requirement of the program up to `tolerance`.
    pub fn is_feasible(&self, values: &[f64], tolerance: f64) -> bool {
        if values.len() < self.variables.len() {
            return false;
        }

        let within_domains = self.variables.iter_with_keys().all(|(variable, definition)| {
            let value = values[variable.index()];

            definition
                .lower_bound()
                .is_none_or(|lower| value >= lower - tolerance)
                && definition
                    .upper_bound()
                    .is_none_or(|upper| value <= upper + tolerance)
                && (!definition.is_integer() || (value - value.round()).abs() <= tolerance)
        });

        within_domains
            && self
                .constraints
                .iter()
                .all(|constraint| constraint.is_satisfied(values, tolerance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraints_over_foreign_variables_are_rejected() {
        let mut other = IntegerProgram::new();
        let _ = other.new_integer_variable("a", None, None);
        let foreign = other.new_integer_variable("b", None, None);

        let mut program = IntegerProgram::new();
        let x = program.new_integer_variable("x", None, None);

        let result =
            program.add_constraint(LinearConstraint::less_than_or_equals(x + foreign, 1.0));

        assert_eq!(
            result,
            Err(ConstraintOperationError::UnknownVariable(foreign))
        );
        assert!(program.constraints().is_empty());
    }

    #[test]
    fn non_finite_coefficients_are_rejected() {
        let mut program = IntegerProgram::new();
        let x = program.new_continuous_variable("x", None, None);

        let result = program.maximise(f64::NAN * x);

        assert!(matches!(
            result,
            Err(ConstraintOperationError::NonFiniteCoefficient { .. })
        ));
    }

    #[test]
    fn variables_can_be_found_by_name() {
        let mut program = IntegerProgram::new();
        let x = program.new_binary_variable("x");
        let y = program.new_continuous_variable("y", Some(0.0), None);

        assert_eq!(program.variable_by_name("x"), Some(x));
        assert_eq!(program.variable_by_name("y"), Some(y));
        assert_eq!(program.variable_by_name("z"), None);
        assert_eq!(program.variable(x).map(|d| d.upper_bound()), Some(Some(1.0)));
    }

    #[test]
    fn feasibility_checks_bounds_constraints_and_integrality() {
        let mut program = IntegerProgram::new();
        let x = program.new_integer_variable("x", Some(0.0), Some(3.0));
        let y = program.new_continuous_variable("y", Some(0.0), None);
        program
            .add_constraint(LinearConstraint::less_than_or_equals(x + y, 4.0))
            .expect("valid constraint");

        assert!(program.is_feasible(&[2.0, 1.5], 1e-6));
        assert!(!program.is_feasible(&[2.5, 1.0], 1e-6));
        assert!(!program.is_feasible(&[3.0, 1.5], 1e-6));
        assert!(!program.is_feasible(&[4.0, 0.0], 1e-6));
        assert!(!program.is_feasible(&[1.0], 1e-6));
    }
}
