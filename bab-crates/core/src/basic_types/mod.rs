mod constraint_operation_error;

pub use constraint_operation_error::*;
