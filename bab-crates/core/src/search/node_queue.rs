//! The queue of nodes which still have to be explored.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::NodeOrdering;
use super::SearchNode;

/// An entry of the [`NodeQueue`]. `bound` is the relaxed objective of the parent node; `sequence`
/// only makes the order of entries with the same bound deterministic.
#[derive(Debug)]
pub struct QueueEntry {
    pub bound: f64,
    pub sequence: u64,
    pub node: SearchNode,
    /// The key used by the max-heap; derived from `bound` and the [`NodeOrdering`].
    priority: f64,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher priority first, then the entry which was pushed first
        self.priority
            .total_cmp(&other.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Priority queue of pending nodes. Owns the insertion counter, so two queues never influence each
/// other's tie-breaking.
#[derive(Debug)]
pub struct NodeQueue {
    ordering: NodeOrdering,
    heap: BinaryHeap<QueueEntry>,
    next_sequence: u64,
}

impl NodeQueue {
    pub fn new(ordering: NodeOrdering) -> Self {
        Self {
            ordering,
            heap: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    pub fn ordering(&self) -> NodeOrdering {
        self.ordering
    }

    /// Adds `node` with the given bound estimate and returns the sequence number it received.
    pub fn push(&mut self, bound: f64, node: SearchNode) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let priority = match self.ordering {
            NodeOrdering::DescendingBound => bound,
            NodeOrdering::AscendingBound => -bound,
        };

        self.heap.push(QueueEntry {
            bound,
            sequence,
            node,
            // Avoid -0.0 sorting below 0.0 under the total order
            priority: if priority == 0.0 { 0.0 } else { priority },
        });

        sequence
    }

    pub fn pop(&mut self) -> Option<QueueEntry> {
        self.heap.pop()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IntegerProgram;

    fn node() -> SearchNode {
        SearchNode::root(&IntegerProgram::new())
    }

    fn drain(mut queue: NodeQueue) -> Vec<(f64, u64)> {
        std::iter::from_fn(|| queue.pop())
            .map(|entry| (entry.bound, entry.sequence))
            .collect()
    }

    #[test]
    fn descending_bound_pops_the_largest_bound_first() {
        let mut queue = NodeQueue::new(NodeOrdering::DescendingBound);
        let _ = queue.push(1.0, node());
        let _ = queue.push(3.0, node());
        let _ = queue.push(2.0, node());

        assert_eq!(drain(queue), vec![(3.0, 1), (2.0, 2), (1.0, 0)]);
    }

    #[test]
    fn ascending_bound_pops_the_smallest_bound_first() {
        let mut queue = NodeQueue::new(NodeOrdering::AscendingBound);
        let _ = queue.push(1.0, node());
        let _ = queue.push(3.0, node());
        let _ = queue.push(-2.0, node());

        assert_eq!(drain(queue), vec![(-2.0, 2), (1.0, 0), (3.0, 1)]);
    }

    #[test]
    fn ties_are_broken_by_insertion_order() {
        for ordering in [NodeOrdering::DescendingBound, NodeOrdering::AscendingBound] {
            let mut queue = NodeQueue::new(ordering);
            let _ = queue.push(0.0, node());
            let _ = queue.push(-0.0, node());
            let _ = queue.push(0.0, node());

            assert_eq!(drain(queue), vec![(0.0, 0), (-0.0, 1), (0.0, 2)]);
        }
    }

    #[test]
    fn sequence_numbers_increase_per_queue() {
        let mut first = NodeQueue::new(NodeOrdering::default());
        let mut second = NodeQueue::new(NodeOrdering::default());

        assert_eq!(first.push(1.0, node()), 0);
        assert_eq!(first.push(1.0, node()), 1);
        assert_eq!(second.push(1.0, node()), 0);
        assert_eq!(first.len(), 2);
    }
}
