//! The representation of a mixed-integer linear program: variables, linear expressions,
//! constraints and the [`IntegerProgram`] which owns them.
mod constraint;
mod integer_program;
mod linear_expression;
mod variable;

pub use constraint::*;
pub use integer_program::*;
pub use linear_expression::*;
pub use variable::*;
