//! Contains containers which are used by the solver.
mod keyed_vec;

pub use keyed_vec::*;
