use crate::containers::KeyedVec;
use crate::model::VariableId;

/// An integral solution of an [`IntegerProgram`](crate::model::IntegerProgram).
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    values: KeyedVec<VariableId, f64>,
    objective_value: f64,
}

impl Solution {
    pub fn new(values: KeyedVec<VariableId, f64>, objective_value: f64) -> Self {
        Self {
            values,
            objective_value,
        }
    }

    pub fn value(&self, variable: VariableId) -> f64 {
        self.values[variable]
    }

    /// The value of `variable` rounded to the nearest integer; accepted solutions are integral up
    /// to the integrality tolerance of the search.
    pub fn integer_value(&self, variable: VariableId) -> i64 {
        self.values[variable].round() as i64
    }

    pub fn values(&self) -> &KeyedVec<VariableId, f64> {
        &self.values
    }

    /// The objective value in the direction of the program.
    pub fn objective_value(&self) -> f64 {
        self.objective_value
    }
}
