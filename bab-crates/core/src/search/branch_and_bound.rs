use std::time::Instant;

use log::debug;
use log::info;
use log::trace;
use log::warn;

use super::NodeQueue;
use super::RelaxationOutcome;
use super::SearchCallback;
use super::SearchError;
use super::SearchEvent;
use super::SearchNode;
use super::SearchOptions;
use super::SearchStatistics;
use crate::branching::BranchingStrategy;
use crate::branching::FirstFractional;
use crate::containers::KeyedVec;
use crate::model::IntegerProgram;
use crate::oracle::GoodLpOracle;
use crate::oracle::RelaxationOracle;
use crate::results::SearchOutcome;
use crate::results::SearchStatus;
use crate::results::NO_SOLUTION_SENTINEL;
use crate::statistics::log_statistic_postfix;
use crate::statistics::should_log_statistics;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;
use crate::termination::TerminationCondition;

/// The best integral node found so far, in maximisation form.
#[derive(Debug)]
struct Incumbent {
    objective_value: f64,
    values: Vec<f64>,
    is_solution: bool,
}

/// The branch-and-bound driver: explores the tree of relaxations of an [`IntegerProgram`] and
/// returns the best integral solution.
///
/// Every node popped from the queue is handled in one of four ways:
/// - its relaxation is infeasible and the node is dropped;
/// - its bound is below the incumbent (minus the pruning tolerance) and it is pruned;
/// - its relaxation is integral and it replaces the incumbent if it is better;
/// - otherwise the [`BranchingStrategy`] selects a fractional variable and the floor and ceiling
///   children are pushed with the bound of the node.
///
/// # Example
/// ```rust
/// # use bab_core::model::IntegerProgram;
/// # use bab_core::model::LinearConstraint;
/// # use bab_core::search::BranchAndBound;
/// # use bab_core::termination::Indefinite;
/// let mut program = IntegerProgram::new();
/// let x = program.new_integer_variable("x", Some(0.0), None);
/// let y = program.new_integer_variable("y", Some(0.0), None);
/// program.add_constraint(LinearConstraint::less_than_or_equals(x, 1.5)).unwrap();
/// program.add_constraint(LinearConstraint::less_than_or_equals(y, 1.5)).unwrap();
/// program.maximise(x + y).unwrap();
///
/// let mut search = BranchAndBound::default();
/// let outcome = search.solve(&program, &mut Indefinite, ()).unwrap();
///
/// let solution = outcome.into_solution().unwrap();
/// assert!((solution.objective_value() - 2.0).abs() < 1e-6);
/// assert_eq!(solution.integer_value(x), 1);
/// assert_eq!(solution.integer_value(y), 1);
/// ```
#[derive(Debug)]
pub struct BranchAndBound<Oracle, Strategy> {
    oracle: Oracle,
    strategy: Strategy,
    options: SearchOptions,
    statistics: SearchStatistics,
}

impl Default for BranchAndBound<GoodLpOracle, FirstFractional> {
    fn default() -> Self {
        Self::new(GoodLpOracle::default(), FirstFractional)
    }
}

impl<Oracle: RelaxationOracle, Strategy: BranchingStrategy> BranchAndBound<Oracle, Strategy> {
    pub fn new(oracle: Oracle, strategy: Strategy) -> Self {
        Self::with_options(oracle, strategy, SearchOptions::default())
    }

    pub fn with_options(oracle: Oracle, strategy: Strategy, options: SearchOptions) -> Self {
        Self {
            oracle,
            strategy,
            options,
            statistics: SearchStatistics::default(),
        }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// The statistics of the last call to [`BranchAndBound::solve`].
    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    /// Writes the statistics of the last run if statistic logging has been configured.
    pub fn log_statistics(&self) {
        if should_log_statistics() {
            self.statistics.log(StatisticLogger::default());
            log_statistic_postfix();
        }
    }

    /// Searches for an optimal integral solution of `program`.
    ///
    /// `termination` is polled before every node is taken from the queue. Only failures of the
    /// oracle or of creating child nodes are errors; a program without integral solutions results
    /// in [`SearchStatus::NoFeasibleSolution`].
    pub fn solve(
        &mut self,
        program: &IntegerProgram,
        termination: &mut impl TerminationCondition,
        mut callback: impl SearchCallback,
    ) -> Result<SearchOutcome, SearchError> {
        let started_at = Instant::now();
        self.statistics = SearchStatistics::default();

        let result = self.explore(program, termination, &mut callback);

        self.statistics.time_spent_in_search_ms = started_at.elapsed().as_millis();
        result
    }

    fn explore(
        &mut self,
        program: &IntegerProgram,
        termination: &mut impl TerminationCondition,
        callback: &mut impl SearchCallback,
    ) -> Result<SearchOutcome, SearchError> {
        let direction_factor = program.direction().maximisation_factor();

        let mut root = SearchNode::root(program);
        self.statistics.relaxations_solved += 1;
        let root_bound = match root.solve_relaxation(&mut self.oracle)? {
            RelaxationOutcome::Solved { objective_value } => objective_value,
            RelaxationOutcome::Infeasible => {
                info!("The root relaxation is infeasible");
                self.statistics.nodes_infeasible += 1;
                callback.on_search_event(&SearchEvent::NodeInfeasible {
                    node: &root,
                    queue_length: 0,
                });

                return Ok(SearchOutcome::new(
                    SearchStatus::NoFeasibleSolution,
                    direction_factor * NO_SOLUTION_SENTINEL,
                    KeyedVec::default(),
                    false,
                ));
            }
        };
        info!(
            "Root relaxation solved with objective {}",
            direction_factor * root_bound
        );

        let mut incumbent = Incumbent {
            objective_value: NO_SOLUTION_SENTINEL,
            values: root.values().map(<[f64]>::to_vec).unwrap_or_default(),
            is_solution: false,
        };

        let mut queue = NodeQueue::new(self.options.node_ordering);
        let _ = queue.push(root_bound, root);
        self.statistics.peak_queue_size = 1;
        callback.on_search_event(&SearchEvent::RootSolved {
            bound: root_bound,
            queue_length: queue.len(),
        });

        let mut terminated = false;
        while !queue.is_empty() {
            if termination.should_stop() {
                terminated = true;
                break;
            }

            let Some(entry) = queue.pop() else {
                break;
            };
            let mut node = entry.node;
            self.statistics.nodes_explored += 1;
            trace!(
                "Exploring node {} at depth {} with parent bound {}",
                entry.sequence,
                node.depth(),
                entry.bound
            );

            if !node.is_solved() {
                self.statistics.relaxations_solved += 1;
            }
            let bound = match node.solve_relaxation(&mut self.oracle)? {
                RelaxationOutcome::Solved { objective_value } => objective_value,
                RelaxationOutcome::Infeasible => {
                    debug!("Node {} is infeasible", entry.sequence);
                    self.statistics.nodes_infeasible += 1;
                    callback.on_search_event(&SearchEvent::NodeInfeasible {
                        node: &node,
                        queue_length: queue.len(),
                    });
                    termination.node_has_been_explored();
                    continue;
                }
            };

            if bound < incumbent.objective_value - self.options.pruning_tolerance {
                debug!(
                    "Pruning node {} with bound {bound} against incumbent {}",
                    entry.sequence, incumbent.objective_value
                );
                self.statistics.nodes_pruned += 1;
                callback.on_search_event(&SearchEvent::NodePruned {
                    node: &node,
                    bound,
                    incumbent: incumbent.objective_value,
                    queue_length: queue.len(),
                });
            } else if node.is_integral(self.options.integrality_tolerance) {
                if bound > incumbent.objective_value {
                    info!(
                        "Found a better integral solution with objective {}",
                        direction_factor * bound
                    );
                    incumbent = Incumbent {
                        objective_value: bound,
                        values: node.values().map(<[f64]>::to_vec).unwrap_or_default(),
                        is_solution: true,
                    };
                    self.statistics.incumbent_updates += 1;
                    callback.on_search_event(&SearchEvent::IncumbentImproved {
                        node: &node,
                        objective_value: bound,
                        queue_length: queue.len(),
                    });
                } else {
                    self.statistics.nodes_pruned += 1;
                    callback.on_search_event(&SearchEvent::NodePruned {
                        node: &node,
                        bound,
                        incumbent: incumbent.objective_value,
                        queue_length: queue.len(),
                    });
                }
            } else if let Some(decision) = self
                .strategy
                .select_branching_variable(&node, self.options.integrality_tolerance)
            {
                debug!(
                    "Branching node {} on {} = {}",
                    entry.sequence, decision.variable, decision.value
                );
                let floor = node.branch_floor(decision.variable)?;
                let ceil = node.branch_ceil(decision.variable)?;
                let _ = queue.push(bound, floor);
                let _ = queue.push(bound, ceil);

                self.statistics.nodes_branched += 1;
                self.statistics.peak_queue_size = self.statistics.peak_queue_size.max(queue.len());
                callback.on_search_event(&SearchEvent::NodeBranched {
                    node: &node,
                    decision,
                    queue_length: queue.len(),
                });
            } else {
                debug!(
                    "Node {} is fractional but no branching variable was selected",
                    entry.sequence
                );
                callback.on_search_event(&SearchEvent::NodeDropped {
                    node: &node,
                    queue_length: queue.len(),
                });
            }

            termination.node_has_been_explored();
        }

        if terminated {
            warn!(
                "The search was stopped with {} nodes left in the queue",
                queue.len()
            );
        }

        let status = if terminated {
            SearchStatus::Terminated
        } else if incumbent.is_solution {
            SearchStatus::Optimal
        } else {
            SearchStatus::NoFeasibleSolution
        };

        // The last value belongs to the objective variable
        let _ = incumbent.values.pop();

        Ok(SearchOutcome::new(
            status,
            direction_factor * incumbent.objective_value,
            KeyedVec::from(incumbent.values),
            incumbent.is_solution,
        ))
    }
}
