use std::fmt::Display;

/// The capacity of an edge which can carry any amount of flow.
pub const UNBOUNDED_CAPACITY: u64 = u64::MAX;

/// A handle to an edge of a [`FlowGraph`].
///
/// Every edge added through [`FlowGraph::add_edge`] has an even id; its residual twin has the odd
/// id directly after it, so `id ^ 1` maps an edge to its twin and back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId {
    id: usize,
}

impl EdgeId {
    pub fn index(&self) -> usize {
        self.id
    }

    pub fn is_residual(&self) -> bool {
        self.id % 2 == 1
    }

    pub fn twin(&self) -> EdgeId {
        EdgeId { id: self.id ^ 1 }
    }
}

impl Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "e{}", self.id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub capacity: u64,
    /// The flow over the edge; negative on a residual edge whose twin carries flow.
    pub flow: i128,
}

impl Edge {
    /// How much more flow can be pushed over this edge.
    pub fn residual_capacity(&self) -> u64 {
        let remaining = i128::from(self.capacity) - self.flow;
        u64::try_from(remaining.max(0)).unwrap_or(UNBOUNDED_CAPACITY)
    }
}

/// A directed graph with edge capacities and a flow; each edge is stored together with a residual
/// edge of capacity zero in the opposite direction.
#[derive(Clone, Debug, Default)]
pub struct FlowGraph {
    edges: Vec<Edge>,
    adjacency: Vec<Vec<EdgeId>>,
}

impl FlowGraph {
    pub fn new(num_nodes: usize) -> Self {
        Self {
            edges: vec![],
            adjacency: vec![vec![]; num_nodes],
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.adjacency.len()
    }

    /// The number of edges, residual edges included.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Adds an edge together with its residual twin and returns the id of the former.
    ///
    /// Panics if either endpoint is not a node of the graph.
    pub fn add_edge(&mut self, from: usize, to: usize, capacity: u64) -> EdgeId {
        assert!(
            from < self.num_nodes() && to < self.num_nodes(),
            "the edge ({from}, {to}) leaves a graph with {} nodes",
            self.num_nodes()
        );

        let forward = EdgeId {
            id: self.edges.len(),
        };
        self.edges.push(Edge {
            from,
            to,
            capacity,
            flow: 0,
        });
        self.adjacency[from].push(forward);

        self.edges.push(Edge {
            from: to,
            to: from,
            capacity: 0,
            flow: 0,
        });
        self.adjacency[to].push(forward.twin());

        forward
    }

    pub fn edge(&self, edge: EdgeId) -> &Edge {
        &self.edges[edge.id]
    }

    /// The ids of the edges (residual edges included) leaving `node`.
    pub fn edges_from(&self, node: usize) -> &[EdgeId] {
        &self.adjacency[node]
    }

    /// The ids of the edges which were added through [`FlowGraph::add_edge`].
    pub fn forward_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len())
            .step_by(2)
            .map(|id| EdgeId { id })
    }

    /// Pushes `amount` units over `edge`, which removes the same amount from its twin.
    pub fn add_flow(&mut self, edge: EdgeId, amount: u64) {
        self.edges[edge.id].flow += i128::from(amount);
        self.edges[edge.twin().id].flow -= i128::from(amount);
    }

    pub fn flow(&self, edge: EdgeId) -> i128 {
        self.edges[edge.id].flow
    }

    pub fn residual_capacity(&self, edge: EdgeId) -> u64 {
        self.edges[edge.id].residual_capacity()
    }

    /// Sets the flow on every edge back to zero.
    pub fn clear_flow(&mut self) {
        self.edges.iter_mut().for_each(|edge| edge.flow = 0);
    }
}
