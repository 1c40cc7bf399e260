//! The capacitated vehicle routing problem: serve every customer from a single depot with at
//! most `K` vehicles of capacity `Q`, at minimum travel cost.
//!
//! [`solve_cvrp`] solves it exactly as an integer program with the branch-and-bound engine;
//! [`local_search`] improves a given set of routes by moving single customers.
mod cvrp;
mod local_search;
mod vrp_instance;

pub use cvrp::*;
pub use local_search::*;
pub use vrp_instance::*;
