use bab_core::branching::BranchingStrategy;
use bab_core::model::IntegerProgram;
use bab_core::model::LinearConstraint;
use bab_core::model::LinearExpression;
use bab_core::oracle::RelaxationOracle;
use bab_core::results::SearchStatus;
use bab_core::search::BranchAndBound;
use bab_core::termination::TerminationCondition;
use log::debug;

use super::Division;
use super::EliminationError;
use crate::flow::max_flow;
use crate::flow::min_cut_source_side;
use crate::flow::EdgeId;
use crate::flow::FlowGraph;
use crate::flow::UNBOUNDED_CAPACITY;

const SOURCE: usize = 0;
const SINK: usize = 1;

/// The flow network deciding whether a team can still finish first.
///
/// Every match between two other teams with games left gets a node fed by the source with the
/// number of games left between them. A match node passes its games on to the nodes of the two
/// teams playing it, and each team node lets through at most the number of games that team may
/// still win without overtaking the team under consideration. The team is eliminated iff the
/// maximum flow cannot distribute all games, i.e. some edge out of the source is not saturated.
#[derive(Clone, Debug)]
pub(crate) struct EliminationNetwork {
    graph: FlowGraph,
    /// The node of every team of the division; `None` for the team under consideration.
    team_nodes: Vec<Option<usize>>,
    match_edges: Vec<EdgeId>,
    games_left: u64,
}

impl EliminationNetwork {
    pub(crate) fn new(division: &Division, team: usize) -> Self {
        let teams = division.teams();
        let maximum_wins = teams[team].maximum_wins();

        let mut team_nodes = vec![None; teams.len()];
        let mut next_node = SINK + 1;
        for (index, node) in team_nodes.iter_mut().enumerate() {
            if index != team {
                *node = Some(next_node);
                next_node += 1;
            }
        }

        let matches = (0..teams.len())
            .filter(|&first| first != team)
            .flat_map(|first| {
                (first + 1..teams.len())
                    .filter(move |&second| second != team)
                    .map(move |second| (first, second))
            })
            .filter(|&(first, second)| teams[first].games_against(second) > 0)
            .collect::<Vec<_>>();

        let mut graph = FlowGraph::new(next_node + matches.len());
        let mut match_edges = Vec::with_capacity(matches.len());
        let mut games_left: u64 = 0;

        for (offset, &(first, second)) in matches.iter().enumerate() {
            let match_node = next_node + offset;
            let games = teams[first].games_against(second);
            games_left = games_left.saturating_add(games);

            match_edges.push(graph.add_edge(SOURCE, match_node, games));
            for playing in [first, second] {
                if let Some(team_node) = team_nodes[playing] {
                    let _ = graph.add_edge(match_node, team_node, UNBOUNDED_CAPACITY);
                }
            }
        }

        for (index, node) in team_nodes.iter().enumerate() {
            if let Some(team_node) = *node {
                let capacity = maximum_wins.saturating_sub(teams[index].wins());
                let _ = graph.add_edge(team_node, SINK, capacity);
            }
        }

        Self {
            graph,
            team_nodes,
            match_edges,
            games_left,
        }
    }

    /// The total number of games left between the other teams.
    pub(crate) fn games_left(&self) -> u64 {
        self.games_left
    }

    /// Computes a maximum flow and returns whether it saturates every edge out of the source.
    pub(crate) fn is_saturated_by_max_flow(&mut self) -> bool {
        self.graph.clear_flow();
        let flow = max_flow(&mut self.graph, SOURCE, SINK);
        debug!("Maximum flow {flow} out of {} games left", self.games_left);

        self.match_edges
            .iter()
            .all(|&edge| self.graph.residual_capacity(edge) == 0)
    }

    /// The teams on the source side of a minimum cut; only meaningful after
    /// [`EliminationNetwork::is_saturated_by_max_flow`] returned `false`.
    pub(crate) fn teams_on_source_side(&self) -> Vec<usize> {
        let source_side = min_cut_source_side(&self.graph, SOURCE);

        self.team_nodes
            .iter()
            .enumerate()
            .filter_map(|(team, node)| node.filter(|&node| source_side[node]).map(|_| team))
            .collect()
    }

    /// Solves the maximum flow as a linear program with one continuous variable per edge, bounded
    /// by the edge capacity, and flow conservation at every node other than the source and the
    /// sink. Returns the value of the flow.
    pub(crate) fn max_flow_by_linear_programming<Oracle, Strategy>(
        &self,
        search: &mut BranchAndBound<Oracle, Strategy>,
        termination: &mut impl TerminationCondition,
    ) -> Result<f64, EliminationError>
    where
        Oracle: RelaxationOracle,
        Strategy: BranchingStrategy,
    {
        let mut program = IntegerProgram::new();
        let mut balance = vec![LinearExpression::new(); self.graph.num_nodes()];
        let mut source_outflow = LinearExpression::new();

        for edge_id in self.graph.forward_edges() {
            let edge = self.graph.edge(edge_id);
            let upper_bound = (edge.capacity != UNBOUNDED_CAPACITY).then_some(edge.capacity as f64);
            let flow = program.new_continuous_variable(
                format!("f_{}_{}", edge.from, edge.to),
                Some(0.0),
                upper_bound,
            );

            balance[edge.to] += flow;
            balance[edge.from] += -flow;
            if edge.from == SOURCE {
                source_outflow += flow;
            }
        }

        for (node, balance) in balance.into_iter().enumerate() {
            if node == SOURCE || node == SINK || balance.terms().next().is_none() {
                continue;
            }
            program.add_constraint(LinearConstraint::equals(balance, 0.0))?;
        }
        program.maximise(source_outflow)?;

        let outcome = search.solve(&program, termination, ())?;
        if outcome.status() == SearchStatus::Terminated && !outcome.has_solution() {
            return Err(EliminationError::Terminated);
        }
        let solution = outcome.into_solution()?;

        Ok(solution.objective_value())
    }
}
