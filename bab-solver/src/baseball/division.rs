use std::io::Read;

use bab_core::branching::BranchingStrategy;
use bab_core::oracle::RelaxationOracle;
use bab_core::search::BranchAndBound;
use bab_core::termination::Indefinite;
use bab_core::termination::TerminationCondition;
use log::debug;
use log::info;

use super::elimination_network::EliminationNetwork;
use super::EliminationError;
use super::EliminationMethod;
use super::Team;
use crate::parsers::parse_division;
use crate::parsers::DivisionParseError;

/// The flow is compared against the number of games left up to this tolerance when the maximum
/// flow is computed by linear programming.
const FLOW_TOLERANCE: f64 = 1e-6;

/// The teams of a division together with the games left between them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Division {
    teams: Vec<Team>,
}

impl Division {
    pub fn new(teams: Vec<Team>) -> Self {
        Self { teams }
    }

    /// Reads a division in the format described at [`parse_division`].
    pub fn parse(source: impl Read) -> Result<Self, DivisionParseError> {
        parse_division(source)
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn num_teams(&self) -> usize {
        self.teams.len()
    }

    pub fn team_by_name(&self, name: &str) -> Option<usize> {
        self.teams.iter().position(|team| team.name() == name)
    }

    /// Decides whether `team` can no longer finish with the most wins, using the default
    /// branch-and-bound configuration for [`EliminationMethod::LinearProgramming`].
    pub fn is_eliminated(
        &self,
        team: usize,
        method: EliminationMethod,
    ) -> Result<bool, EliminationError> {
        match method {
            EliminationMethod::NetworkFlow => self.is_eliminated_by_network_flow(team),
            EliminationMethod::LinearProgramming => {
                self.is_eliminated_by_linear_programming(
                    team,
                    &mut BranchAndBound::default(),
                    &mut Indefinite,
                )
            }
        }
    }

    /// Decides elimination through network flow.
    pub fn is_eliminated_by_network_flow(&self, team: usize) -> Result<bool, EliminationError> {
        self.check_team(team)?;
        if let Some(other) = self.trivial_witness(team) {
            debug!(
                "{} is eliminated trivially by {}",
                self.teams[team].name(),
                self.teams[other].name()
            );
            return Ok(true);
        }

        let mut network = EliminationNetwork::new(self, team);
        Ok(!network.is_saturated_by_max_flow())
    }

    /// Decides elimination by solving the maximum flow of the elimination network as a linear
    /// program with `search`, which is stopped by `termination`.
    pub fn is_eliminated_by_linear_programming<Oracle, Strategy>(
        &self,
        team: usize,
        search: &mut BranchAndBound<Oracle, Strategy>,
        termination: &mut impl TerminationCondition,
    ) -> Result<bool, EliminationError>
    where
        Oracle: RelaxationOracle,
        Strategy: BranchingStrategy,
    {
        self.check_team(team)?;
        if self.trivial_witness(team).is_some() {
            return Ok(true);
        }

        let network = EliminationNetwork::new(self, team);
        let flow = network.max_flow_by_linear_programming(search, termination)?;
        debug!(
            "Linear program for {} distributes {flow} of {} games",
            self.teams[team].name(),
            network.games_left()
        );

        Ok(flow < network.games_left() as f64 - FLOW_TOLERANCE)
    }

    /// Returns a set of teams which proves that `team` is eliminated, or `None` if it is not.
    ///
    /// The teams R in the certificate together win more games than the maximum wins of `team`
    /// allow: `(Σ_{i ∈ R} w_i + Σ_{i < j ∈ R} g_ij) / |R| > w + r`.
    pub fn certificate_of_elimination(
        &self,
        team: usize,
    ) -> Result<Option<Vec<usize>>, EliminationError> {
        self.check_team(team)?;
        if let Some(other) = self.trivial_witness(team) {
            return Ok(Some(vec![other]));
        }

        let mut network = EliminationNetwork::new(self, team);
        if network.is_saturated_by_max_flow() {
            return Ok(None);
        }

        let certificate = network.teams_on_source_side();
        info!(
            "{} is eliminated by {} teams",
            self.teams[team].name(),
            certificate.len()
        );
        Ok(Some(certificate))
    }

    /// A team which already has more wins than `team` can reach.
    fn trivial_witness(&self, team: usize) -> Option<usize> {
        let maximum_wins = self.teams[team].maximum_wins();

        self.teams
            .iter()
            .position(|other| other.wins() > maximum_wins)
    }

    fn check_team(&self, team: usize) -> Result<(), EliminationError> {
        if team >= self.teams.len() {
            return Err(EliminationError::UnknownTeam {
                team,
                num_teams: self.teams.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bab_core::termination::NodeBudget;

    use super::*;

    fn division(rows: &[(&str, u64, u64, u64, &[u64])]) -> Division {
        Division::new(
            rows.iter()
                .map(|&(name, wins, losses, remaining, against)| {
                    Team::new(name, wins, losses, remaining, against.to_vec())
                })
                .collect(),
        )
    }

    fn teams4() -> Division {
        division(&[
            ("Atlanta", 83, 71, 8, &[0, 1, 6, 1]),
            ("Philadelphia", 80, 79, 3, &[1, 0, 0, 2]),
            ("New_York", 78, 78, 6, &[6, 0, 0, 0]),
            ("Montreal", 77, 82, 3, &[1, 2, 0, 0]),
        ])
    }

    #[test]
    fn both_methods_agree_on_every_team() {
        let division = teams4();

        for team in 0..division.num_teams() {
            let by_flow = division
                .is_eliminated(team, EliminationMethod::NetworkFlow)
                .expect("known team");
            let by_lp = division
                .is_eliminated(team, EliminationMethod::LinearProgramming)
                .expect("known team");

            assert_eq!(by_flow, by_lp, "methods disagree on team {team}");
        }
    }

    #[test]
    fn stopped_linear_program_is_reported() {
        let division = teams4();

        let result = division.is_eliminated_by_linear_programming(
            1,
            &mut BranchAndBound::default(),
            &mut NodeBudget::new(0),
        );

        assert!(matches!(result, Err(EliminationError::Terminated)));
    }

    #[test]
    fn eliminated_teams_are_found() {
        let division = teams4();

        let eliminated = (0..division.num_teams())
            .filter(|&team| {
                division
                    .is_eliminated(team, EliminationMethod::NetworkFlow)
                    .expect("known team")
            })
            .collect::<Vec<_>>();

        assert_eq!(eliminated, vec![1, 3]);
    }

    #[test]
    fn trivial_elimination_has_a_single_witness() {
        let division = teams4();

        assert_eq!(
            division.certificate_of_elimination(3).expect("known team"),
            Some(vec![0])
        );
    }

    #[test]
    fn certificate_is_the_source_side_of_the_minimum_cut() {
        let division = teams4();

        assert_eq!(
            division.certificate_of_elimination(1).expect("known team"),
            Some(vec![0, 2])
        );
        assert_eq!(
            division.certificate_of_elimination(0).expect("known team"),
            None
        );
    }

    #[test]
    fn division_without_games_left_eliminates_nobody_who_can_tie() {
        let division = division(&[("A", 10, 0, 0, &[0, 0]), ("B", 10, 0, 0, &[0, 0])]);

        assert!(!division
            .is_eliminated(0, EliminationMethod::NetworkFlow)
            .expect("known team"));
        assert!(!division
            .is_eliminated(1, EliminationMethod::LinearProgramming)
            .expect("known team"));
    }

    #[test]
    fn unknown_teams_are_an_error() {
        let division = teams4();

        assert!(matches!(
            division.is_eliminated(4, EliminationMethod::NetworkFlow),
            Err(EliminationError::UnknownTeam {
                team: 4,
                num_teams: 4
            })
        ));
    }
}
