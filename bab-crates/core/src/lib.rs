//! # bab-core
//! A branch-and-bound engine for mixed-integer linear programs.
//!
//! A program is built as an [`model::IntegerProgram`]. The [`search::BranchAndBound`] driver
//! solves continuous relaxations through a [`oracle::RelaxationOracle`] (by default `good_lp`),
//! prunes nodes whose bound cannot beat the best integral solution found so far, and splits
//! fractional nodes on a variable chosen by a [`branching::BranchingStrategy`].
//!
//! ```rust
//! # use bab_core::model::IntegerProgram;
//! # use bab_core::model::LinearConstraint;
//! # use bab_core::results::SearchStatus;
//! # use bab_core::search::BranchAndBound;
//! # use bab_core::termination::Indefinite;
//! // A small knapsack: maximise 5a + 4b + 3c subject to 2a + 3b + c <= 5, binary variables.
//! let mut program = IntegerProgram::new();
//! let a = program.new_binary_variable("a");
//! let b = program.new_binary_variable("b");
//! let c = program.new_binary_variable("c");
//! program
//!     .add_constraint(LinearConstraint::less_than_or_equals(
//!         2.0 * a + 3.0 * b + 1.0 * c,
//!         5.0,
//!     ))
//!     .expect("all variables belong to the program");
//! program
//!     .maximise(5.0 * a + 4.0 * b + 3.0 * c)
//!     .expect("all variables belong to the program");
//!
//! let outcome = BranchAndBound::default()
//!     .solve(&program, &mut Indefinite, ())
//!     .expect("the relaxations are bounded");
//!
//! assert_eq!(outcome.status(), SearchStatus::Optimal);
//! assert!((outcome.objective_value() - 9.0).abs() < 1e-6);
//! ```
//!
//! The search is configured through [`search::SearchOptions`] and bounded by a
//! [`termination::TerminationCondition`]; statistics of a run are available through
//! [`search::BranchAndBound::statistics`].
pub(crate) mod basic_types;
pub mod branching;
pub mod containers;
pub mod model;
pub mod oracle;
pub mod results;
pub mod search;
pub mod statistics;
pub mod termination;

pub use convert_case;

pub use crate::basic_types::ConstraintOperationError;
pub use crate::model::IntegerProgram;
pub use crate::model::OptimisationDirection;
pub use crate::search::BranchAndBound;
