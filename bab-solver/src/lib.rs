//! # bab-solver
//! Applications of the branch-and-bound engine in [`bab_core`], which is re-exported from this
//! crate:
//! - [`flow`]: maximum flows with breadth-first augmenting paths;
//! - [`baseball`]: deciding whether a team can still win its division, through network flow or
//!   linear programming;
//! - [`routing`]: the capacitated vehicle routing problem as an integer program, and a local
//!   search which improves given routes;
//! - [`parsers`]: readers for the file formats of the above and for integer programs in a small
//!   text format.
pub mod baseball;
pub mod flow;
pub mod parsers;
pub mod routing;

pub use bab_core::*;
