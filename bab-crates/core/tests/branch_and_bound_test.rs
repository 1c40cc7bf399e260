#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

use bab_core::branching::BranchingRule;
use bab_core::branching::DynamicBranchingStrategy;
use bab_core::model::IntegerProgram;
use bab_core::model::LinearConstraint;
use bab_core::model::LinearExpression;
use bab_core::model::OptimisationDirection;
use bab_core::model::VariableId;
use bab_core::oracle::GoodLpOracle;
use bab_core::oracle::LpBackend;
use bab_core::oracle::RelaxationOracle;
use bab_core::oracle::RelaxationProblem;
use bab_core::results::SearchStatus;
use bab_core::results::NO_SOLUTION_SENTINEL;
use bab_core::search::BranchAndBound;
use bab_core::search::NodeOrdering;
use bab_core::search::SearchEvent;
use bab_core::search::SearchNode;
use bab_core::search::SearchOptions;
use bab_core::termination::Indefinite;
use bab_core::termination::NodeBudget;

const TOLERANCE: f64 = 1e-6;

fn search_with(
    ordering: NodeOrdering,
    rule: BranchingRule,
) -> BranchAndBound<GoodLpOracle, DynamicBranchingStrategy> {
    BranchAndBound::with_options(
        GoodLpOracle::default(),
        rule.create_strategy(),
        SearchOptions {
            node_ordering: ordering,
            ..Default::default()
        },
    )
}

/// `max x + y` subject to `x <= 1.5`, `y <= 1.5` with non-negative integer `x` and `y`.
fn two_variable_program() -> (IntegerProgram, VariableId, VariableId) {
    let mut program = IntegerProgram::new();
    let x = program.new_integer_variable("x", Some(0.0), None);
    let y = program.new_integer_variable("y", Some(0.0), None);
    program
        .add_constraint(LinearConstraint::less_than_or_equals(x, 1.5))
        .expect("valid constraint");
    program
        .add_constraint(LinearConstraint::less_than_or_equals(y, 1.5))
        .expect("valid constraint");
    program.maximise(x + y).expect("valid objective");
    (program, x, y)
}

const KNAPSACK_VALUES: [f64; 6] = [10.0, 13.0, 7.0, 8.0, 4.0, 9.0];
const KNAPSACK_WEIGHTS: [f64; 6] = [5.0, 7.0, 4.0, 5.0, 3.0, 6.0];
const KNAPSACK_CAPACITY: f64 = 14.0;

fn knapsack_program() -> IntegerProgram {
    let mut program = IntegerProgram::new();
    let items = (0..KNAPSACK_VALUES.len())
        .map(|item| program.new_binary_variable(format!("item_{item}")))
        .collect::<Vec<_>>();

    let weight = items
        .iter()
        .zip(KNAPSACK_WEIGHTS)
        .map(|(&item, weight)| weight * item)
        .sum::<LinearExpression>();
    program
        .add_constraint(LinearConstraint::less_than_or_equals(
            weight,
            KNAPSACK_CAPACITY,
        ))
        .expect("valid constraint");

    let value = items
        .iter()
        .zip(KNAPSACK_VALUES)
        .map(|(&item, value)| value * item)
        .sum::<LinearExpression>();
    program.maximise(value).expect("valid objective");
    program
}

fn knapsack_optimum_by_enumeration() -> f64 {
    (0..1_u32 << KNAPSACK_VALUES.len())
        .filter_map(|subset| {
            let chosen = (0..KNAPSACK_VALUES.len()).filter(|item| subset & (1 << item) != 0);
            let weight = chosen.clone().map(|item| KNAPSACK_WEIGHTS[item]).sum::<f64>();
            (weight <= KNAPSACK_CAPACITY)
                .then(|| chosen.map(|item| KNAPSACK_VALUES[item]).sum::<f64>())
        })
        .fold(f64::NEG_INFINITY, f64::max)
}

#[test]
fn small_integer_program_is_solved_to_optimality() {
    let (program, x, y) = two_variable_program();

    let outcome = BranchAndBound::default()
        .solve(&program, &mut Indefinite, ())
        .expect("no oracle failure");

    assert_eq!(outcome.status(), SearchStatus::Optimal);
    let solution = outcome.into_solution().expect("feasible");
    assert!((solution.objective_value() - 2.0).abs() < TOLERANCE);
    assert_eq!(solution.integer_value(x), 1);
    assert_eq!(solution.integer_value(y), 1);
    assert!(program.is_feasible(solution.values().as_slice(), 1e-4));
}

#[test]
fn infeasible_program_returns_the_sentinel() {
    let mut program = IntegerProgram::new();
    let x = program.new_integer_variable("x", None, None);
    program
        .add_constraint(LinearConstraint::greater_than_or_equals(x, 3.0))
        .expect("valid constraint");
    program
        .add_constraint(LinearConstraint::less_than_or_equals(x, 2.0))
        .expect("valid constraint");
    program.maximise(x).expect("valid objective");

    let outcome = BranchAndBound::default()
        .solve(&program, &mut Indefinite, ())
        .expect("infeasibility is not an error");

    assert_eq!(outcome.status(), SearchStatus::NoFeasibleSolution);
    assert_eq!(outcome.objective_value(), NO_SOLUTION_SENTINEL);
    assert!(!outcome.has_solution());
    assert!(outcome.assignment().is_empty());
    assert!(outcome.into_solution().is_err());
}

#[test]
fn integer_infeasible_program_explores_and_reports_no_solution() {
    // 2x == 1 has a relaxed solution but no integral one
    let mut program = IntegerProgram::new();
    let x = program.new_integer_variable("x", Some(0.0), Some(5.0));
    program
        .add_constraint(LinearConstraint::equals(2.0 * x, 1.0))
        .expect("valid constraint");
    program.maximise(x).expect("valid objective");

    let mut search = BranchAndBound::default();
    let outcome = search
        .solve(&program, &mut Indefinite, ())
        .expect("no oracle failure");

    assert_eq!(outcome.status(), SearchStatus::NoFeasibleSolution);
    assert_eq!(search.statistics().nodes_branched, 1);
    assert_eq!(search.statistics().nodes_infeasible, 2);
}

#[test]
fn knapsack_reaches_the_enumerated_optimum_with_every_configuration() {
    let program = knapsack_program();
    let expected = knapsack_optimum_by_enumeration();

    for ordering in [NodeOrdering::DescendingBound, NodeOrdering::AscendingBound] {
        for rule in [BranchingRule::FirstFractional, BranchingRule::MostFractional] {
            let outcome = search_with(ordering, rule)
                .solve(&program, &mut Indefinite, ())
                .expect("no oracle failure");

            assert_eq!(outcome.status(), SearchStatus::Optimal, "{ordering} {rule}");
            assert!(
                (outcome.objective_value() - expected).abs() < TOLERANCE,
                "{ordering} {rule}: {} != {expected}",
                outcome.objective_value()
            );
            assert!(program.is_feasible(outcome.assignment().as_slice(), 1e-4));
        }
    }
}

#[test]
fn incumbent_never_decreases_and_pruning_never_grows_the_queue() {
    let program = knapsack_program();
    let mut improvements = vec![];
    let mut queue_length = 0;

    let _ = search_with(NodeOrdering::AscendingBound, BranchingRule::FirstFractional)
        .solve(&program, &mut Indefinite, |event: &SearchEvent<'_>| {
            match event {
                SearchEvent::RootSolved { .. } => assert_eq!(event.queue_length(), 1),
                SearchEvent::NodeBranched { .. } => {
                    assert_eq!(event.queue_length(), queue_length + 1)
                }
                SearchEvent::IncumbentImproved {
                    objective_value, ..
                } => {
                    improvements.push(*objective_value);
                    assert_eq!(event.queue_length(), queue_length - 1);
                }
                _ => assert_eq!(event.queue_length(), queue_length - 1),
            }
            queue_length = event.queue_length();
        })
        .expect("no oracle failure");

    assert!(!improvements.is_empty());
    assert!(improvements.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn nodes_bounded_below_the_incumbent_are_pruned() {
    let program = knapsack_program();
    let pruning_tolerance = SearchOptions::default().pruning_tolerance;

    for ordering in [NodeOrdering::DescendingBound, NodeOrdering::AscendingBound] {
        let mut search = search_with(ordering, BranchingRule::FirstFractional);
        let mut strict_prunes = 0;
        let mut queue_length = 0;

        let _ = search
            .solve(&program, &mut Indefinite, |event: &SearchEvent<'_>| {
                if let SearchEvent::NodePruned {
                    bound, incumbent, ..
                } = event
                {
                    if *bound < incumbent - pruning_tolerance {
                        strict_prunes += 1;
                        assert_eq!(event.queue_length(), queue_length - 1);
                    }
                }
                queue_length = event.queue_length();
            })
            .expect("no oracle failure");

        assert!(strict_prunes > 0, "{ordering}: no node was pruned");
        assert!(search.statistics().nodes_pruned >= strict_prunes, "{ordering}");
    }
}

#[test]
fn accepted_solutions_are_integral() {
    let program = knapsack_program();

    let _ = BranchAndBound::default()
        .solve(&program, &mut Indefinite, |event: &SearchEvent<'_>| {
            if let SearchEvent::IncumbentImproved { node, .. } = event {
                assert!(node.is_integral(1e-4));
            }
        })
        .expect("no oracle failure");
}

#[test]
fn branched_children_bound_the_fractional_value() {
    let (program, _, _) = two_variable_program();
    let mut decisions = vec![];

    let _ = BranchAndBound::default()
        .solve(&program, &mut Indefinite, |event: &SearchEvent<'_>| {
            if let SearchEvent::NodeBranched { node, decision, .. } = event {
                let floor = node.branch_floor(decision.variable).expect("has a value");
                let ceil = node.branch_ceil(decision.variable).expect("has a value");
                decisions.push((
                    decision.value,
                    floor.constraints().last().map(LinearConstraint::rhs),
                    ceil.constraints().last().map(LinearConstraint::rhs),
                ));
            }
        })
        .expect("no oracle failure");

    assert!(!decisions.is_empty());
    for (value, floor, ceil) in decisions {
        assert_eq!(floor, Some(value.floor()));
        assert_eq!(ceil, Some(value.ceil()));
    }
}

#[test]
fn statistics_account_for_every_explored_node() {
    let program = knapsack_program();
    let mut search = BranchAndBound::default();

    let _ = search
        .solve(&program, &mut Indefinite, ())
        .expect("no oracle failure");

    let statistics = search.statistics();
    assert_eq!(
        statistics.nodes_explored,
        statistics.nodes_pruned
            + statistics.nodes_infeasible
            + statistics.nodes_branched
            + statistics.incumbent_updates
    );
    assert_eq!(
        statistics.relaxations_solved,
        2 * statistics.nodes_branched + 1
    );
    assert!(statistics.peak_queue_size >= 1);
}

#[test]
fn minimisation_reports_the_objective_in_its_own_direction() {
    let mut program = IntegerProgram::new();
    let x = program.new_integer_variable("x", Some(0.0), None);
    let y = program.new_integer_variable("y", Some(0.0), None);
    program
        .add_constraint(LinearConstraint::greater_than_or_equals(x + y, 2.5))
        .expect("valid constraint");
    program
        .add_constraint(LinearConstraint::greater_than_or_equals(x - y, 0.5))
        .expect("valid constraint");
    program.minimise(2.0 * x + 3.0 * y + 1.0).expect("valid objective");

    let solution = BranchAndBound::default()
        .solve(&program, &mut Indefinite, ())
        .expect("no oracle failure")
        .into_solution()
        .expect("feasible");

    assert!((solution.objective_value() - 7.0).abs() < TOLERANCE);
    assert_eq!(solution.integer_value(x), 3);
    assert_eq!(solution.integer_value(y), 0);
}

#[test]
fn continuous_variables_are_not_branched_on() {
    let mut program = IntegerProgram::new();
    let x = program.new_integer_variable("x", Some(0.0), None);
    let y = program.new_continuous_variable("y", Some(0.0), None);
    program
        .add_constraint(LinearConstraint::less_than_or_equals(x, 1.5))
        .expect("valid constraint");
    program
        .add_constraint(LinearConstraint::less_than_or_equals(y, 1.5))
        .expect("valid constraint");
    program.maximise(x + y).expect("valid objective");

    let solution = BranchAndBound::default()
        .solve(&program, &mut Indefinite, ())
        .expect("no oracle failure")
        .into_solution()
        .expect("feasible");

    assert!((solution.objective_value() - 2.5).abs() < TOLERANCE);
    assert_eq!(solution.integer_value(x), 1);
    assert!((solution.value(y) - 1.5).abs() < TOLERANCE);
}

#[test]
fn node_budget_terminates_the_search() {
    let program = knapsack_program();
    let mut search = BranchAndBound::default();

    let outcome = search
        .solve(&program, &mut NodeBudget::new(1), ())
        .expect("no oracle failure");

    assert_eq!(outcome.status(), SearchStatus::Terminated);
    assert_eq!(search.statistics().nodes_explored, 1);
}

#[test]
fn relaxation_oracle_is_deterministic() {
    let (program, _, _) = two_variable_program();
    let root = SearchNode::root(&program);
    let problem = RelaxationProblem {
        variables: root.variables(),
        constraints: root.constraints(),
        objective: root.objective(),
        direction: OptimisationDirection::Maximise,
    };

    for backend in [LpBackend::MicroLp, LpBackend::Clarabel] {
        let mut oracle = GoodLpOracle::new(backend);
        let first = oracle.solve(&problem).expect("no oracle failure");
        let second = oracle.solve(&problem).expect("no oracle failure");

        assert_eq!(first, second, "{backend}");
    }
}
