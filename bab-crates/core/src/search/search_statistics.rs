use crate::create_statistics_struct;

create_statistics_struct!(
    /// The statistics of a single branch-and-bound run.
    SearchStatistics {
        /// The number of nodes taken from the queue
        nodes_explored: u64,
        /// The number of nodes whose bound could not improve the incumbent
        nodes_pruned: u64,
        /// The number of nodes with an infeasible relaxation
        nodes_infeasible: u64,
        /// The number of nodes which were split into two children
        nodes_branched: u64,
        /// The number of times a better integral solution was found
        incumbent_updates: u64,
        /// The number of calls to the relaxation oracle
        relaxations_solved: u64,
        /// The largest number of nodes waiting in the queue at once
        peak_queue_size: usize,
        /// Wall-clock time of the search in milliseconds
        time_spent_in_search_ms: u128,
});
