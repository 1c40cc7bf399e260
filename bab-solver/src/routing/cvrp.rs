use std::fmt::Display;

use bab_core::branching::BranchingStrategy;
use bab_core::model::IntegerProgram;
use bab_core::model::LinearConstraint;
use bab_core::model::LinearExpression;
use bab_core::model::VariableId;
use bab_core::oracle::RelaxationOracle;
use bab_core::results::SearchStatus;
use bab_core::search::BranchAndBound;
use bab_core::search::SearchError;
use bab_core::termination::TerminationCondition;
use bab_core::ConstraintOperationError;
use log::info;
use log::warn;
use thiserror::Error;

use super::VrpInstance;

/// What the routing program optimises.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum CvrpObjective {
    /// Minimise the total travel cost of all routes.
    #[default]
    TravelCost,
    /// Only look for routes which serve every customer within the capacities.
    Feasibility,
}

impl Display for CvrpObjective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CvrpObjective::TravelCost => write!(f, "travel-cost"),
            CvrpObjective::Feasibility => write!(f, "feasibility"),
        }
    }
}

#[derive(Error, Debug)]
pub enum CvrpError {
    #[error("failed to build the routing program: {0}")]
    Model(#[from] ConstraintOperationError),
    #[error("failed to solve the routing program: {0}")]
    Search(#[from] SearchError),
    #[error("the selected arcs do not form routes from the depot (stuck at node {0})")]
    InconsistentRoutes(usize),
}

/// Routes which serve every customer exactly once.
#[derive(Clone, Debug, PartialEq)]
pub struct CvrpSolution {
    pub travel_cost: f64,
    /// The arcs used by the routes; the depot is 0 at the start of a route and
    /// `num_nodes` at its end.
    pub arcs: Vec<(usize, usize)>,
    /// The customers of every route in the order in which they are visited.
    pub routes: Vec<Vec<usize>>,
}

/// The result of [`solve_cvrp`].
#[derive(Clone, Debug, PartialEq)]
pub enum CvrpOutcome {
    /// Routes of minimal cost for the objective.
    Optimal(CvrpSolution),
    /// The search was stopped; the routes are the best ones found so far.
    Feasible(CvrpSolution),
    /// No routes serve every customer within the capacities.
    Infeasible,
    /// The search was stopped before any routes were found.
    Unknown,
}

impl CvrpOutcome {
    pub fn solution(&self) -> Option<&CvrpSolution> {
        match self {
            CvrpOutcome::Optimal(solution) | CvrpOutcome::Feasible(solution) => Some(solution),
            CvrpOutcome::Infeasible | CvrpOutcome::Unknown => None,
        }
    }

    pub fn into_solution(self) -> Option<CvrpSolution> {
        match self {
            CvrpOutcome::Optimal(solution) | CvrpOutcome::Feasible(solution) => Some(solution),
            CvrpOutcome::Infeasible | CvrpOutcome::Unknown => None,
        }
    }
}

/// The arc and load variables of the routing program over `n + 1` nodes, where the last node is a
/// copy of the depot at which every route ends.
#[derive(Debug)]
struct RoutingProgram {
    program: IntegerProgram,
    arcs: Vec<Vec<VariableId>>,
}

impl RoutingProgram {
    fn new(instance: &VrpInstance, objective: CvrpObjective) -> Result<Self, CvrpError> {
        let num_nodes = instance.num_nodes() + 1;
        let destination = num_nodes - 1;
        let capacity = instance.capacity();
        let demand = |node: usize| {
            if node == destination {
                0.0
            } else {
                instance.demand(node)
            }
        };

        let mut program = IntegerProgram::new();
        let arcs = (0..num_nodes)
            .map(|from| {
                (0..num_nodes)
                    .map(|to| program.new_binary_variable(format!("x_{from}_{to}")))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        let loads = (0..num_nodes)
            .map(|node| {
                program.new_continuous_variable(
                    format!("u_{node}"),
                    Some(demand(node)),
                    Some(capacity),
                )
            })
            .collect::<Vec<_>>();

        let leaving_origin: LinearExpression = arcs[0].iter().copied().sum();
        let entering_destination: LinearExpression = arcs.iter().map(|row| row[destination]).sum();
        program.add_constraint(LinearConstraint::less_than_or_equals(
            leaving_origin.clone(),
            instance.vehicles() as f64,
        ))?;
        program.add_constraint(LinearConstraint::equals(
            arcs.iter().map(|row| row[0]).sum::<LinearExpression>(),
            0.0,
        ))?;
        program.add_constraint(LinearConstraint::equals(
            (0..num_nodes)
                .map(|node| arcs[node][node])
                .sum::<LinearExpression>(),
            0.0,
        ))?;
        program.add_constraint(LinearConstraint::equals(
            leaving_origin,
            entering_destination,
        ))?;

        for customer in 1..destination {
            program.add_constraint(LinearConstraint::equals(
                arcs[customer].iter().copied().sum::<LinearExpression>(),
                1.0,
            ))?;
            program.add_constraint(LinearConstraint::equals(
                arcs.iter()
                    .map(|row| row[customer])
                    .sum::<LinearExpression>(),
                1.0,
            ))?;
        }

        // Miller-Tucker-Zemlin: the load grows by the demand of `to` along every used arc.
        for from in 0..num_nodes {
            for to in (0..num_nodes).filter(|&to| to != from) {
                program.add_constraint(LinearConstraint::less_than_or_equals(
                    loads[from] - loads[to] + capacity * arcs[from][to],
                    capacity - demand(to),
                ))?;
            }
        }

        let objective: LinearExpression = match objective {
            CvrpObjective::TravelCost => (0..num_nodes)
                .flat_map(|from| (0..num_nodes).map(move |to| (from, to)))
                .map(|(from, to)| arc_cost(instance, from, to) * arcs[from][to])
                .sum(),
            CvrpObjective::Feasibility => arcs[0][0].into(),
        };
        program.minimise(objective)?;

        Ok(Self { program, arcs })
    }
}

/// The travel cost in the program with the copy of the depot as its last node.
fn arc_cost(instance: &VrpInstance, from: usize, to: usize) -> f64 {
    let destination = instance.num_nodes();
    let original = |node: usize| if node == destination { 0 } else { node };

    let (from, to) = (original(from), original(to));
    if from == to {
        0.0
    } else {
        instance.cost(from, to)
    }
}

/// Solves the capacitated vehicle routing problem as an integer program with `search`.
///
/// Every customer is entered and left exactly once, at most [`VrpInstance::vehicles`] routes
/// leave the depot, and the Miller-Tucker-Zemlin constraints `u_i - u_j + Q x_ij <= Q - q_j`
/// both prevent cycles which avoid the depot and keep the load of every route within the
/// capacity `Q`.
pub fn solve_cvrp<Oracle, Strategy>(
    instance: &VrpInstance,
    objective: CvrpObjective,
    search: &mut BranchAndBound<Oracle, Strategy>,
    termination: &mut impl TerminationCondition,
) -> Result<CvrpOutcome, CvrpError>
where
    Oracle: RelaxationOracle,
    Strategy: BranchingStrategy,
{
    let routing = RoutingProgram::new(instance, objective)?;
    info!(
        "Routing {} customers with {} vehicles: {} variables and {} constraints",
        instance.num_customers(),
        instance.vehicles(),
        routing.program.num_variables(),
        routing.program.constraints().len()
    );

    let outcome = search.solve(&routing.program, termination, ())?;
    let status = outcome.status();
    let solution = match outcome.into_solution() {
        Ok(solution) => solution,
        Err(_) if status == SearchStatus::Terminated => {
            warn!("The routing search was stopped before any routes were found");
            return Ok(CvrpOutcome::Unknown);
        }
        Err(_) => return Ok(CvrpOutcome::Infeasible),
    };

    let arcs = routing
        .arcs
        .iter()
        .enumerate()
        .flat_map(|(from, row)| row.iter().enumerate().map(move |(to, &arc)| (from, to, arc)))
        .filter(|&(_, _, arc)| solution.integer_value(arc) == 1)
        .map(|(from, to, _)| (from, to))
        .collect::<Vec<_>>();
    let routes = routes_from_arcs(&arcs, instance.num_nodes())?;
    let travel_cost = routes.iter().map(|route| instance.route_cost(route)).sum();

    let solution = CvrpSolution {
        travel_cost,
        arcs,
        routes,
    };

    if status == SearchStatus::Terminated {
        warn!("The routing search was stopped, the routes are not necessarily optimal");
        Ok(CvrpOutcome::Feasible(solution))
    } else {
        Ok(CvrpOutcome::Optimal(solution))
    }
}

/// Follows every arc out of the depot until the copy of the depot is reached.
fn routes_from_arcs(
    arcs: &[(usize, usize)],
    destination: usize,
) -> Result<Vec<Vec<usize>>, CvrpError> {
    let successor = |node: usize| {
        arcs.iter()
            .find(|&&(from, _)| from == node)
            .map(|&(_, to)| to)
    };

    let mut routes = vec![];
    for &(_, first) in arcs.iter().filter(|&&(from, _)| from == 0) {
        let mut route = vec![];
        let mut node = first;
        while node != destination {
            if route.len() > destination {
                return Err(CvrpError::InconsistentRoutes(node));
            }
            route.push(node);
            node = successor(node).ok_or(CvrpError::InconsistentRoutes(node))?;
        }

        if !route.is_empty() {
            routes.push(route);
        }
    }

    Ok(routes)
}

#[cfg(test)]
mod tests {
    use bab_core::termination::Indefinite;
    use bab_core::termination::NodeBudget;

    use super::*;

    #[test]
    fn routes_follow_the_arcs() {
        // Depot 0, customers 1..=3, the copy of the depot is 4.
        let arcs = [(0, 2), (2, 1), (1, 4), (0, 3), (3, 4), (0, 4)];

        let routes = routes_from_arcs(&arcs, 4).expect("consistent arcs");

        assert_eq!(routes, vec![vec![2, 1], vec![3]]);
    }

    #[test]
    fn cycles_are_reported() {
        let arcs = [(0, 1), (1, 2), (2, 1)];

        assert!(matches!(
            routes_from_arcs(&arcs, 3),
            Err(CvrpError::InconsistentRoutes(_))
        ));
    }

    fn single_customer() -> VrpInstance {
        VrpInstance::new(
            vec![vec![0.0, 4.0], vec![4.0, 0.0]],
            vec![0.0, 1.0],
            1,
            2.0,
        )
        .expect("valid instance")
    }

    #[test]
    fn single_customer_is_served_by_one_route() {
        let outcome = solve_cvrp(
            &single_customer(),
            CvrpObjective::TravelCost,
            &mut BranchAndBound::default(),
            &mut Indefinite,
        )
        .expect("the program is well-formed");

        let CvrpOutcome::Optimal(solution) = outcome else {
            panic!("expected an optimal solution, got {outcome:?}");
        };
        assert_eq!(solution.routes, vec![vec![1]]);
        assert!((solution.travel_cost - 8.0).abs() < 1e-6);
    }

    #[test]
    fn stopping_before_any_routes_is_not_infeasibility() {
        let outcome = solve_cvrp(
            &single_customer(),
            CvrpObjective::TravelCost,
            &mut BranchAndBound::default(),
            &mut NodeBudget::new(0),
        )
        .expect("the program is well-formed");

        assert_eq!(outcome, CvrpOutcome::Unknown);
        assert_eq!(outcome.solution(), None);
    }

    #[test]
    fn copy_of_the_depot_costs_like_the_depot() {
        let instance = VrpInstance::new(
            vec![vec![0.0, 4.0], vec![4.0, 0.0]],
            vec![0.0, 1.0],
            1,
            1.0,
        )
        .expect("valid instance");

        assert_eq!(arc_cost(&instance, 1, 2), 4.0);
        assert_eq!(arc_cost(&instance, 2, 1), 4.0);
        assert_eq!(arc_cost(&instance, 0, 2), 0.0);
        assert_eq!(arc_cost(&instance, 0, 1), 4.0);
    }
}
