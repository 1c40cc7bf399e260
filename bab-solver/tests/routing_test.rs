#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

use std::fs::File;

use bab_solver::parsers::parse_vrp_rep;
use bab_solver::parsers::VrpFormat;
use bab_solver::routing::local_search;
use bab_solver::routing::solve_cvrp;
use bab_solver::routing::CvrpObjective;
use bab_solver::routing::VrpInstance;
use bab_solver::termination::Indefinite;
use bab_solver::termination::NodeBudget;
use bab_solver::BranchAndBound;

fn read_instance(file_name: &str, format: VrpFormat) -> VrpInstance {
    let path = format!("{}/tests/instances/{file_name}", env!("CARGO_MANIFEST_DIR"));
    let file = File::open(path).expect("the instance exists");
    parse_vrp_rep(file, format).expect("the instance is valid")
}

#[test]
fn optimal_routes_respect_the_capacity() {
    let instance = read_instance("triangle_c.xml", VrpFormat::C);

    let solution = solve_cvrp(
        &instance,
        CvrpObjective::TravelCost,
        &mut BranchAndBound::default(),
        &mut Indefinite,
    )
    .expect("the program is well-formed")
    .into_solution()
    .expect("the instance has routes");

    assert!((solution.travel_cost - 27.0).abs() < 1e-6);
    assert!(solution.routes.len() <= instance.vehicles());
    for route in &solution.routes {
        assert!(instance.route_load(route) <= instance.capacity());
    }

    let mut served = solution.routes.concat();
    served.sort();
    assert_eq!(served, vec![1, 2, 3]);
}

#[test]
fn local_search_improves_a_budget_limited_solution() {
    let instance = read_instance("square_a.xml", VrpFormat::A);

    let solution = solve_cvrp(
        &instance,
        CvrpObjective::Feasibility,
        &mut BranchAndBound::default(),
        &mut NodeBudget::new(1_000),
    )
    .expect("the program is well-formed")
    .into_solution()
    .expect("the instance has routes");

    let improved = local_search(&instance, &solution.routes, 10);

    assert!(improved.travel_cost <= solution.travel_cost + 1e-9);
    assert!(improved.travel_cost >= 40.0 + 10.0 * 2.0_f64.sqrt() - 1e-6);
    for route in &improved.routes {
        assert!(instance.route_load(route) <= instance.capacity());
    }
}
