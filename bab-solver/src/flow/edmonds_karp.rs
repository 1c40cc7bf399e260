use std::collections::VecDeque;

use log::debug;
use log::trace;

use super::EdgeId;
use super::FlowGraph;

/// Computes a maximum flow from `source` to `sink` by repeatedly augmenting along a shortest path
/// of the residual graph (Edmonds-Karp). The flow is stored in `graph`, on top of any flow which
/// was already present.
///
/// If an augmenting path consists of edges with [`UNBOUNDED_CAPACITY`](super::UNBOUNDED_CAPACITY)
/// only, the returned value saturates at `u64::MAX`.
pub fn max_flow(graph: &mut FlowGraph, source: usize, sink: usize) -> u64 {
    if source == sink {
        return 0;
    }

    let mut total: u64 = 0;
    let mut num_augmentations = 0_usize;

    while let Some(path) = shortest_augmenting_path(graph, source, sink) {
        let bottleneck = path
            .iter()
            .map(|&edge| graph.residual_capacity(edge))
            .min()
            .unwrap_or(0);
        if bottleneck == 0 {
            break;
        }

        trace!("Augmenting {bottleneck} units over {} edges", path.len());
        for &edge in &path {
            graph.add_flow(edge, bottleneck);
        }

        total = total.saturating_add(bottleneck);
        num_augmentations += 1;
    }

    debug!("Found a flow of {total} after {num_augmentations} augmentations");
    total
}

/// The nodes which can be reached from `source` in the residual graph. After [`max_flow`] these
/// form the source side of a minimum cut.
pub fn min_cut_source_side(graph: &FlowGraph, source: usize) -> Vec<bool> {
    let mut reachable = vec![false; graph.num_nodes()];
    reachable[source] = true;

    let mut queue = VecDeque::from([source]);
    while let Some(node) = queue.pop_front() {
        for &edge in graph.edges_from(node) {
            let to = graph.edge(edge).to;
            if !reachable[to] && graph.residual_capacity(edge) > 0 {
                reachable[to] = true;
                queue.push_back(to);
            }
        }
    }

    reachable
}

/// A breadth-first search over edges with residual capacity; returns the edges of the path in
/// order from `source` to `sink`.
fn shortest_augmenting_path(graph: &FlowGraph, source: usize, sink: usize) -> Option<Vec<EdgeId>> {
    let mut reached_by: Vec<Option<EdgeId>> = vec![None; graph.num_nodes()];
    let mut visited = vec![false; graph.num_nodes()];
    visited[source] = true;

    let mut queue = VecDeque::from([source]);
    while let Some(node) = queue.pop_front() {
        if node == sink {
            break;
        }

        for &edge in graph.edges_from(node) {
            let to = graph.edge(edge).to;
            if !visited[to] && graph.residual_capacity(edge) > 0 {
                visited[to] = true;
                reached_by[to] = Some(edge);
                queue.push_back(to);
            }
        }
    }

    if !visited[sink] {
        return None;
    }

    let mut path = vec![];
    let mut node = sink;
    while let Some(edge) = reached_by[node] {
        path.push(edge);
        node = graph.edge(edge).from;
    }
    path.reverse();

    Some(path)
}
