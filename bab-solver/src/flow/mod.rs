//! Maximum flows through augmenting paths.
//!
//! A [`FlowGraph`] stores every edge next to a residual twin so that pushing flow over an edge
//! and undoing it are the same operation. [`max_flow`] computes a maximum flow with breadth-first
//! augmenting paths and [`min_cut_source_side`] recovers the minimum cut from the residual graph.
mod edmonds_karp;
mod flow_graph;

pub use edmonds_karp::*;
pub use flow_graph::*;
