use super::TerminationCondition;

/// A [`TerminationCondition`] which never triggers. The search runs until the queue is empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct Indefinite;

impl TerminationCondition for Indefinite {
    fn should_stop(&mut self) -> bool {
        false
    }
}
