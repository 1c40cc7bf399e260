mod first_fractional;
mod most_fractional;

pub use first_fractional::*;
pub use most_fractional::*;

use crate::containers::StorageKey;
use crate::model::VariableId;
use crate::search::SearchNode;

/// The integer decision variables of `node` whose relaxed value is further than `tolerance` from
/// the nearest integer, in the order of the program.
pub(crate) fn fractional_variables(
    node: &SearchNode,
    tolerance: f64,
) -> impl Iterator<Item = (VariableId, f64)> + '_ {
    let values = node.values().unwrap_or_default();

    node.decision_variables()
        .filter(|(_, definition)| definition.is_integer())
        .filter_map(move |(variable, _)| {
            let value = *values.get(variable.index())?;
            ((value - value.round()).abs() > tolerance).then_some((variable, value))
        })
}
