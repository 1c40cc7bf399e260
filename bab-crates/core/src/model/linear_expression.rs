use std::fmt::Display;
use std::iter::Sum;
use std::ops::Add;
use std::ops::AddAssign;
use std::ops::Mul;
use std::ops::Neg;
use std::ops::Sub;

use super::VariableId;
use crate::containers::StorageKey;

/// An affine expression `Σ a_i x_i + c` over the variables of a program.
///
/// Expressions are usually built with the arithmetic operators:
/// ```rust
/// # use bab_core::model::IntegerProgram;
/// # use bab_core::model::LinearExpression;
/// let mut program = IntegerProgram::new();
/// let x = program.new_integer_variable("x", Some(0.0), None);
/// let y = program.new_integer_variable("y", Some(0.0), None);
///
/// let expression: LinearExpression = 3.0 * x + 2.0 * y - 1.0;
/// assert_eq!(expression.evaluate(&[1.0, 2.0]), 6.0);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinearExpression {
    terms: Vec<(VariableId, f64)>,
    constant: f64,
}

impl LinearExpression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constant(value: f64) -> Self {
        LinearExpression {
            terms: vec![],
            constant: value,
        }
    }

    pub fn with_term(mut self, variable: VariableId, coefficient: f64) -> Self {
        self.add_term(variable, coefficient);
        self
    }

    /// Adds `coefficient * variable` to the expression, merging it with an existing term over the
    /// same variable.
    pub fn add_term(&mut self, variable: VariableId, coefficient: f64) {
        if let Some((_, existing)) = self.terms.iter_mut().find(|(v, _)| *v == variable) {
            *existing += coefficient;
        } else {
            self.terms.push((variable, coefficient));
        }
    }

    pub fn terms(&self) -> impl Iterator<Item = (VariableId, f64)> + '_ {
        self.terms.iter().copied()
    }

    pub fn variables(&self) -> impl Iterator<Item = VariableId> + '_ {
        self.terms.iter().map(|&(variable, _)| variable)
    }

    pub fn constant_term(&self) -> f64 {
        self.constant
    }

    pub fn coefficient(&self, variable: VariableId) -> f64 {
        self.terms
            .iter()
            .find(|(v, _)| *v == variable)
            .map_or(0.0, |&(_, coefficient)| coefficient)
    }

    pub fn scaled(mut self, factor: f64) -> Self {
        self.terms
            .iter_mut()
            .for_each(|(_, coefficient)| *coefficient *= factor);
        self.constant *= factor;
        self
    }

    /// Evaluates the expression where `values[i]` is the value of the variable with index `i`;
    /// variables without a value contribute nothing.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(variable, coefficient)| {
                coefficient * values.get(variable.index()).copied().unwrap_or(0.0)
            })
            .sum::<f64>()
            + self.constant
    }

    pub(crate) fn without_constant(&self) -> LinearExpression {
        LinearExpression {
            terms: self.terms.clone(),
            constant: 0.0,
        }
    }
}

impl From<VariableId> for LinearExpression {
    fn from(variable: VariableId) -> Self {
        LinearExpression {
            terms: vec![(variable, 1.0)],
            constant: 0.0,
        }
    }
}

impl From<f64> for LinearExpression {
    fn from(value: f64) -> Self {
        LinearExpression::constant(value)
    }
}

impl<Rhs: Into<LinearExpression>> AddAssign<Rhs> for LinearExpression {
    fn add_assign(&mut self, rhs: Rhs) {
        let rhs = rhs.into();
        for (variable, coefficient) in rhs.terms {
            self.add_term(variable, coefficient);
        }
        self.constant += rhs.constant;
    }
}

impl<Rhs: Into<LinearExpression>> Add<Rhs> for LinearExpression {
    type Output = LinearExpression;

    fn add(mut self, rhs: Rhs) -> Self::Output {
        self += rhs;
        self
    }
}

impl<Rhs: Into<LinearExpression>> Sub<Rhs> for LinearExpression {
    type Output = LinearExpression;

    fn sub(mut self, rhs: Rhs) -> Self::Output {
        self += rhs.into().scaled(-1.0);
        self
    }
}

impl Neg for LinearExpression {
    type Output = LinearExpression;

    fn neg(self) -> Self::Output {
        self.scaled(-1.0)
    }
}

impl Mul<f64> for LinearExpression {
    type Output = LinearExpression;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scaled(rhs)
    }
}

impl Mul<VariableId> for f64 {
    type Output = LinearExpression;

    fn mul(self, rhs: VariableId) -> Self::Output {
        LinearExpression::from(rhs).scaled(self)
    }
}

impl<Rhs: Into<LinearExpression>> Add<Rhs> for VariableId {
    type Output = LinearExpression;

    fn add(self, rhs: Rhs) -> Self::Output {
        LinearExpression::from(self) + rhs
    }
}

impl<Rhs: Into<LinearExpression>> Sub<Rhs> for VariableId {
    type Output = LinearExpression;

    fn sub(self, rhs: Rhs) -> Self::Output {
        LinearExpression::from(self) - rhs
    }
}

impl Neg for VariableId {
    type Output = LinearExpression;

    fn neg(self) -> Self::Output {
        LinearExpression::from(self).scaled(-1.0)
    }
}

impl<Item: Into<LinearExpression>> Sum<Item> for LinearExpression {
    fn sum<I: Iterator<Item = Item>>(iter: I) -> Self {
        iter.fold(LinearExpression::new(), |sum, item| sum + item)
    }
}

impl Display for LinearExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "{}", self.constant);
        }

        for (position, &(variable, coefficient)) in self.terms.iter().enumerate() {
            if position == 0 {
                write!(f, "{coefficient} {variable}")?;
            } else if coefficient < 0.0 {
                write!(f, " - {} {variable}", -coefficient)?;
            } else {
                write!(f, " + {coefficient} {variable}")?;
            }
        }

        if self.constant > 0.0 {
            write!(f, " + {}", self.constant)?;
        } else if self.constant < 0.0 {
            write!(f, " - {}", -self.constant)?;
        }

        Ok(())
    }
}
