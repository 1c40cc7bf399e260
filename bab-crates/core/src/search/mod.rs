//! The branch-and-bound search: the [`SearchNode`]s of the tree, the [`NodeQueue`] of pending
//! nodes and the [`BranchAndBound`] driver which explores them.
mod branch_and_bound;
mod node_queue;
mod options;
mod search_error;
mod search_event;
mod search_node;
mod search_statistics;

pub use branch_and_bound::*;
pub use node_queue::*;
pub use options::*;
pub use search_error::*;
pub use search_event::*;
pub use search_node::*;
pub use search_statistics::*;
