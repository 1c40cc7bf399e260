use log::debug;
use log::trace;

use super::VrpInstance;

/// The routes found by [`local_search`].
#[derive(Clone, Debug, PartialEq)]
pub struct LocalSearchOutcome {
    pub travel_cost: f64,
    /// The non-empty routes, each listing its customers in visiting order.
    pub routes: Vec<Vec<usize>>,
    /// The number of passes over the customers which were made.
    pub iterations: usize,
}

/// Improves the given routes by moving single customers.
///
/// The routes are concatenated into one tour `0, r_1, 0, r_2, ..., 0`. In every pass, each
/// customer is taken out of the tour and reinserted at the position which decreases the travel
/// cost the most, as long as the route it moves to stays within the vehicle capacity. The search
/// stops after a pass without improvement or after `max_iterations` passes.
pub fn local_search(
    instance: &VrpInstance,
    initial_routes: &[Vec<usize>],
    max_iterations: usize,
) -> LocalSearchOutcome {
    let mut tour = vec![0];
    for route in initial_routes {
        tour.extend_from_slice(route);
        tour.push(0);
    }

    let length = tour.len();
    let mut travel_cost = tour_cost(instance, &tour);
    debug!("Local search starts from travel cost {travel_cost}");

    let mut iterations = 0;
    let mut improved = true;
    while improved && iterations < max_iterations {
        improved = false;
        iterations += 1;

        for position in 1..length.saturating_sub(1) {
            let customer = tour[position];
            if customer == 0 {
                continue;
            }

            let loads = route_loads(instance, &tour);
            let route = route_of(&tour, position);

            let mut best_cost = travel_cost;
            let mut best_insertion = position;
            for insertion in (1..length - 1).filter(|&j| j != position && j != position + 1) {
                let target = route_of(&tour, insertion - 1);
                if target != route
                    && loads[target] + instance.demand(customer) > instance.capacity()
                {
                    continue;
                }

                let cost = travel_cost
                    - (instance.cost(tour[position - 1], customer)
                        + instance.cost(customer, tour[position + 1])
                        + instance.cost(tour[insertion - 1], tour[insertion]))
                    + (instance.cost(tour[insertion - 1], customer)
                        + instance.cost(customer, tour[insertion])
                        + instance.cost(tour[position - 1], tour[position + 1]));

                if cost < best_cost {
                    best_cost = cost;
                    best_insertion = insertion;
                }
            }

            if best_cost < travel_cost {
                trace!("Moving customer {customer} to position {best_insertion} ({best_cost})");
                let _ = tour.remove(position);
                let insertion = if best_insertion > position {
                    best_insertion - 1
                } else {
                    best_insertion
                };
                tour.insert(insertion, customer);

                travel_cost = best_cost;
                improved = true;
            }
        }
    }

    let routes = tour
        .split(|&node| node == 0)
        .filter(|route| !route.is_empty())
        .map(<[usize]>::to_vec)
        .collect::<Vec<_>>();
    let travel_cost = tour_cost(instance, &tour);
    debug!("Local search ends with travel cost {travel_cost} after {iterations} passes");

    LocalSearchOutcome {
        travel_cost,
        routes,
        iterations,
    }
}

fn tour_cost(instance: &VrpInstance, tour: &[usize]) -> f64 {
    tour.windows(2)
        .map(|pair| instance.cost(pair[0], pair[1]))
        .sum()
}

/// The index of the route which the node at `position` belongs to. A depot belongs to the route
/// it starts, so a customer inserted after position `p` joins `route_of(tour, p)`.
fn route_of(tour: &[usize], position: usize) -> usize {
    tour[..=position]
        .iter()
        .filter(|&&node| node == 0)
        .count()
        .saturating_sub(1)
}

fn route_loads(instance: &VrpInstance, tour: &[usize]) -> Vec<f64> {
    let mut loads = vec![];
    for &node in tour {
        if node == 0 {
            loads.push(0.0);
        } else if let Some(load) = loads.last_mut() {
            *load += instance.demand(node);
        }
    }
    loads
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(capacity: f64) -> VrpInstance {
        VrpInstance::new(
            vec![
                vec![0.0, 5.0, 6.0, 7.0],
                vec![5.0, 0.0, 3.0, 8.0],
                vec![6.0, 3.0, 0.0, 4.0],
                vec![7.0, 8.0, 4.0, 0.0],
            ],
            vec![0.0, 3.0, 3.0, 3.0],
            2,
            capacity,
        )
        .expect("valid instance")
    }

    #[test]
    fn moves_customers_to_cheaper_routes() {
        let instance = instance(6.0);

        let outcome = local_search(&instance, &[vec![1, 3], vec![2]], 10);

        assert_eq!(outcome.travel_cost, 27.0);
        assert_eq!(outcome.routes, vec![vec![2, 3], vec![1]]);
    }

    #[test]
    fn moves_respect_the_capacity() {
        let instance = instance(6.0);

        let outcome = local_search(&instance, &[vec![1, 2], vec![3]], 10);

        assert_eq!(outcome.travel_cost, 27.0);
        for route in &outcome.routes {
            assert!(instance.route_load(route) <= instance.capacity());
        }
    }

    #[test]
    fn larger_capacity_allows_merging_routes() {
        let instance = instance(9.0);

        let outcome = local_search(&instance, &[vec![1, 2], vec![3]], 10);

        assert_eq!(outcome.travel_cost, 19.0);
        assert_eq!(outcome.routes, vec![vec![1, 2, 3]]);
    }

    #[test]
    fn no_more_passes_than_allowed() {
        let instance = instance(9.0);

        let outcome = local_search(&instance, &[vec![1, 2], vec![3]], 1);

        assert_eq!(outcome.iterations, 1);
        assert_eq!(outcome.travel_cost, 27.0);
    }
}
