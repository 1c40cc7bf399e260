use super::Direction;
use super::TieBreaker;

/// A tie-breaker which selects the first candidate it receives with the best score according to
/// the provided [`Direction`].
///
/// For example, with [`Direction::Minimum`] and candidates `x1` and `x2` which both have score
/// `0.1`, the tie-breaker returns whichever of the two it was given first.
#[derive(Debug)]
pub struct InOrderTieBreaker<Var, Value> {
    /// The selected variable, [None] if no candidate has been considered yet
    selected_variable: Option<Var>,
    /// The score of the selected variable
    selected_value: Option<Value>,
    direction: Direction,
}

impl<Var, Value> InOrderTieBreaker<Var, Value> {
    pub fn new(direction: Direction) -> Self {
        Self {
            selected_variable: None,
            selected_value: None,
            direction,
        }
    }

    fn reset(&mut self) {
        self.selected_variable = None;
        self.selected_value = None;
    }
}

impl<Var: Copy, Value: PartialOrd> TieBreaker<Var, Value> for InOrderTieBreaker<Var, Value> {
    fn consider(&mut self, variable: Var, value: Value) {
        let is_better = match (&self.selected_value, self.direction) {
            (None, _) => true,
            (Some(selected), Direction::Maximum) => value > *selected,
            (Some(selected), Direction::Minimum) => value < *selected,
        };

        if is_better {
            self.selected_variable = Some(variable);
            self.selected_value = Some(value);
        }
    }

    fn select(&mut self) -> Option<Var> {
        let selected = self.selected_variable;
        self.reset();
        selected
    }

    fn get_direction(&self) -> Direction {
        self.direction
    }
}
