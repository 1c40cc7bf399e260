//! Readers for the instance formats understood by the solver.
mod division;
mod flow_network;
mod lp_format;
mod vrp_rep;

pub use division::*;
pub use flow_network::*;
pub use lp_format::*;
pub use vrp_rep::*;
