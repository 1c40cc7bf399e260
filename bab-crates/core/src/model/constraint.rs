use std::fmt::Display;

use super::LinearExpression;
use super::VariableId;

/// The relation between the two sides of a [`LinearConstraint`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Comparison {
    LessThanOrEquals,
    GreaterThanOrEquals,
    Equals,
}

impl Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Comparison::LessThanOrEquals => write!(f, "<="),
            Comparison::GreaterThanOrEquals => write!(f, ">="),
            Comparison::Equals => write!(f, "=="),
        }
    }
}

/// A linear constraint normalised to the form `Σ a_i x_i (<= | >= | ==) b`.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearConstraint {
    /// The left-hand side; never contains a constant term.
    lhs: LinearExpression,
    comparison: Comparison,
    rhs: f64,
}

impl LinearConstraint {
    fn normalised(
        lhs: impl Into<LinearExpression>,
        comparison: Comparison,
        rhs: impl Into<LinearExpression>,
    ) -> Self {
        let difference = lhs.into() - rhs.into();

        LinearConstraint {
            lhs: difference.without_constant(),
            comparison,
            rhs: -difference.constant_term(),
        }
    }

    /// Creates the constraint `lhs <= rhs`.
    pub fn less_than_or_equals(
        lhs: impl Into<LinearExpression>,
        rhs: impl Into<LinearExpression>,
    ) -> Self {
        Self::normalised(lhs, Comparison::LessThanOrEquals, rhs)
    }

    /// Creates the constraint `lhs >= rhs`.
    pub fn greater_than_or_equals(
        lhs: impl Into<LinearExpression>,
        rhs: impl Into<LinearExpression>,
    ) -> Self {
        Self::normalised(lhs, Comparison::GreaterThanOrEquals, rhs)
    }

    /// Creates the constraint `lhs == rhs`.
    pub fn equals(lhs: impl Into<LinearExpression>, rhs: impl Into<LinearExpression>) -> Self {
        Self::normalised(lhs, Comparison::Equals, rhs)
    }

    /// The bound constraint `variable <= value` added to a floor child.
    pub fn upper_bound(variable: VariableId, value: f64) -> Self {
        LinearConstraint {
            lhs: variable.into(),
            comparison: Comparison::LessThanOrEquals,
            rhs: value,
        }
    }

    /// The bound constraint `variable >= value` added to a ceiling child.
    pub fn lower_bound(variable: VariableId, value: f64) -> Self {
        LinearConstraint {
            lhs: variable.into(),
            comparison: Comparison::GreaterThanOrEquals,
            rhs: value,
        }
    }

    pub fn lhs(&self) -> &LinearExpression {
        &self.lhs
    }

    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.lhs.evaluate(values);

        match self.comparison {
            Comparison::LessThanOrEquals => lhs <= self.rhs + tolerance,
            Comparison::GreaterThanOrEquals => lhs >= self.rhs - tolerance,
            Comparison::Equals => (lhs - self.rhs).abs() <= tolerance,
        }
    }
}

impl Display for LinearConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.comparison, self.rhs)
    }
}
