use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VrpInstanceError {
    #[error("an instance needs at least the depot")]
    NoDepot,
    #[error("row {row} of the cost matrix has {found} entries instead of {expected}")]
    CostMatrixShape {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("there are {found} demands for {expected} nodes")]
    DemandCount { expected: usize, found: usize },
    #[error("{0} is not a valid value for '{1}'")]
    InvalidValue(f64, &'static str),
}

/// A capacitated vehicle routing instance. Node 0 is the depot, every other node a customer
/// with a demand; all vehicles have the same capacity.
#[derive(Clone, Debug, PartialEq)]
pub struct VrpInstance {
    costs: Vec<Vec<f64>>,
    demands: Vec<f64>,
    vehicles: usize,
    capacity: f64,
}

impl VrpInstance {
    pub fn new(
        costs: Vec<Vec<f64>>,
        demands: Vec<f64>,
        vehicles: usize,
        capacity: f64,
    ) -> Result<Self, VrpInstanceError> {
        let num_nodes = costs.len();
        if num_nodes == 0 {
            return Err(VrpInstanceError::NoDepot);
        }
        if let Some((row, entries)) = costs
            .iter()
            .enumerate()
            .find(|(_, entries)| entries.len() != num_nodes)
        {
            return Err(VrpInstanceError::CostMatrixShape {
                row,
                expected: num_nodes,
                found: entries.len(),
            });
        }
        if demands.len() != num_nodes {
            return Err(VrpInstanceError::DemandCount {
                expected: num_nodes,
                found: demands.len(),
            });
        }
        if let Some(&cost) = costs.iter().flatten().find(|cost| !cost.is_finite()) {
            return Err(VrpInstanceError::InvalidValue(cost, "cost"));
        }
        if let Some(&demand) = demands
            .iter()
            .find(|demand| !demand.is_finite() || **demand < 0.0)
        {
            return Err(VrpInstanceError::InvalidValue(demand, "demand"));
        }
        if !capacity.is_finite() || capacity < 0.0 {
            return Err(VrpInstanceError::InvalidValue(capacity, "capacity"));
        }

        Ok(Self {
            costs,
            demands,
            vehicles,
            capacity,
        })
    }

    /// Creates an instance whose travel costs are the euclidean distances between the given
    /// coordinates.
    pub fn from_coordinates(
        coordinates: &[(f64, f64)],
        demands: Vec<f64>,
        vehicles: usize,
        capacity: f64,
    ) -> Result<Self, VrpInstanceError> {
        let costs = coordinates
            .iter()
            .map(|&(x1, y1)| {
                coordinates
                    .iter()
                    .map(|&(x2, y2)| (x1 - x2).hypot(y1 - y2))
                    .collect()
            })
            .collect();

        Self::new(costs, demands, vehicles, capacity)
    }

    /// The number of nodes, the depot included.
    pub fn num_nodes(&self) -> usize {
        self.costs.len()
    }

    pub fn num_customers(&self) -> usize {
        self.costs.len() - 1
    }

    pub fn cost(&self, from: usize, to: usize) -> f64 {
        self.costs[from][to]
    }

    pub fn demand(&self, node: usize) -> f64 {
        self.demands[node]
    }

    pub fn vehicles(&self) -> usize {
        self.vehicles
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// The cost of leaving the depot, visiting `customers` in order and returning to the depot.
    pub fn route_cost(&self, customers: &[usize]) -> f64 {
        if customers.is_empty() {
            return 0.0;
        }

        std::iter::once(0)
            .chain(customers.iter().copied())
            .chain(std::iter::once(0))
            .collect::<Vec<_>>()
            .windows(2)
            .map(|pair| self.cost(pair[0], pair[1]))
            .sum()
    }

    pub fn route_load(&self, customers: &[usize]) -> f64 {
        customers.iter().map(|&customer| self.demand(customer)).sum()
    }
}
