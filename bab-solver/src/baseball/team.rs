use std::fmt::Display;

/// A team together with its record and the games it still has to play.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Team {
    name: String,
    wins: u64,
    losses: u64,
    remaining: u64,
    /// The games left against every team of the division, indexed by team.
    against: Vec<u64>,
}

impl Team {
    pub fn new(
        name: impl Into<String>,
        wins: u64,
        losses: u64,
        remaining: u64,
        against: Vec<u64>,
    ) -> Self {
        Self {
            name: name.into(),
            wins,
            losses,
            remaining,
            against,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn wins(&self) -> u64 {
        self.wins
    }

    pub fn losses(&self) -> u64 {
        self.losses
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// The number of wins the team has if it wins every remaining game.
    pub fn maximum_wins(&self) -> u64 {
        self.wins.saturating_add(self.remaining)
    }

    pub fn games_against(&self, other: usize) -> u64 {
        self.against.get(other).copied().unwrap_or(0)
    }
}

impl Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} wins, {} losses, {} remaining)",
            self.name, self.wins, self.losses, self.remaining
        )
    }
}
