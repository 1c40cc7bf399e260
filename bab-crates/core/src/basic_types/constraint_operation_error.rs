use thiserror::Error;

use crate::model::VariableId;

/// Errors related to adding constraints or an objective to an
/// [`IntegerProgram`](crate::model::IntegerProgram).
#[derive(Error, Debug, Copy, Clone, PartialEq)]
pub enum ConstraintOperationError {
    #[error("variable {0} does not belong to this program")]
    UnknownVariable(VariableId),
    #[error("the coefficient of variable {variable} is not finite ({coefficient})")]
    NonFiniteCoefficient {
        variable: VariableId,
        coefficient: f64,
    },
    #[error("the constant term {0} is not finite")]
    NonFiniteConstant(f64),
}
