use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::str::FromStr;

use thiserror::Error;

use crate::flow::FlowGraph;

#[derive(Error, Debug)]
pub enum FlowNetworkParseError {
    #[error("failed to read the network")]
    Io(#[from] std::io::Error),

    #[error("missing header with the number of nodes and edges")]
    MissingHeader,

    #[error("line {line}: '{content}' is not of the form '{expected}'")]
    InvalidLine {
        line: usize,
        content: String,
        expected: &'static str,
    },

    #[error("line {line}: node {node} is not in 1..={num_nodes}")]
    UnknownNode {
        line: usize,
        node: usize,
        num_nodes: usize,
    },

    #[error("a network needs at least one node")]
    NoNodes,

    #[error("expected {expected} edges, but parsed {parsed}")]
    IncorrectEdgeCount { expected: usize, parsed: usize },
}

/// A parsed network; the source is the first node and the sink the last.
#[derive(Clone, Debug)]
pub struct FlowNetwork {
    pub graph: FlowGraph,
    pub source: usize,
    pub sink: usize,
}

/// Reads a network given as a line `n m` followed by `m` lines `u v capacity`, where nodes are
/// numbered from 1 to `n`. Empty lines are skipped.
pub fn parse_flow_network(source: impl Read) -> Result<FlowNetwork, FlowNetworkParseError> {
    let reader = BufReader::new(source);
    let mut lines = reader
        .lines()
        .enumerate()
        .map(|(index, line)| line.map(|content| (index + 1, content)))
        .filter(|line| !matches!(line, Ok((_, content)) if content.trim().is_empty()));

    let (header_line, header) = lines
        .next()
        .ok_or(FlowNetworkParseError::MissingHeader)??;
    let [num_nodes, num_edges] = parse_fields::<usize, 2>(header_line, &header, "n m")?;
    if num_nodes == 0 {
        return Err(FlowNetworkParseError::NoNodes);
    }

    let mut graph = FlowGraph::new(num_nodes);
    let mut parsed = 0;
    for line in lines {
        let (line, content) = line?;
        let [from, to, capacity] = parse_fields::<u64, 3>(line, &content, "u v capacity")?;

        let from = node_index(from, num_nodes, line)?;
        let to = node_index(to, num_nodes, line)?;
        let _ = graph.add_edge(from, to, capacity);
        parsed += 1;
    }

    if parsed != num_edges {
        return Err(FlowNetworkParseError::IncorrectEdgeCount {
            expected: num_edges,
            parsed,
        });
    }

    Ok(FlowNetwork {
        graph,
        source: 0,
        sink: num_nodes - 1,
    })
}

fn parse_fields<Num: FromStr + Copy + Default, const N: usize>(
    line: usize,
    content: &str,
    expected: &'static str,
) -> Result<[Num; N], FlowNetworkParseError> {
    let invalid = || FlowNetworkParseError::InvalidLine {
        line,
        content: content.to_owned(),
        expected,
    };

    let mut fields = [Num::default(); N];
    let mut components = content.split_whitespace();
    for field in fields.iter_mut() {
        *field = components
            .next()
            .ok_or_else(invalid)?
            .parse()
            .map_err(|_| invalid())?;
    }

    if components.next().is_some() {
        return Err(invalid());
    }

    Ok(fields)
}

fn node_index(node: u64, num_nodes: usize, line: usize) -> Result<usize, FlowNetworkParseError> {
    let node = usize::try_from(node).unwrap_or(usize::MAX);
    if node == 0 || node > num_nodes {
        return Err(FlowNetworkParseError::UnknownNode {
            line,
            node,
            num_nodes,
        });
    }

    Ok(node - 1)
}
