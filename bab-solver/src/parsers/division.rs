use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;

use thiserror::Error;

use crate::baseball::Division;
use crate::baseball::Team;

#[derive(Error, Debug)]
pub enum DivisionParseError {
    #[error("failed to read the division")]
    Io(#[from] std::io::Error),

    #[error("missing the number of teams")]
    MissingTeamCount,

    #[error("'{0}' is not a valid number of teams")]
    InvalidTeamCount(String),

    #[error("line {line}: expected '{expected}' fields but found {found}")]
    IncorrectFieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: '{value}' is not a valid number of games")]
    InvalidNumber { line: usize, value: String },

    #[error("expected {expected} teams, but parsed {parsed}")]
    IncorrectTeamCount { expected: usize, parsed: usize },

    #[error("the games between {first} and {second} differ depending on whose line is read")]
    AsymmetricSchedule { first: String, second: String },
}

/// Reads a division; the first line holds the number of teams `n`, every further line describes
/// one team as `name wins losses remaining a_0 ... a_{n-1}`, where `a_i` is the number of games
/// left against the `i`-th team.
pub fn parse_division(source: impl Read) -> Result<Division, DivisionParseError> {
    let reader = BufReader::new(source);
    let mut lines = reader.lines().enumerate();

    let num_teams = loop {
        let Some((_, line)) = lines.next() else {
            return Err(DivisionParseError::MissingTeamCount);
        };
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        break trimmed
            .parse::<usize>()
            .map_err(|_| DivisionParseError::InvalidTeamCount(trimmed.to_owned()))?;
    };

    let mut teams = Vec::with_capacity(num_teams);
    for (index, line) in lines {
        let line = line?;
        let fields = line.split_whitespace().collect::<Vec<_>>();
        if fields.is_empty() {
            continue;
        }

        let line_number = index + 1;
        if fields.len() != 4 + num_teams {
            return Err(DivisionParseError::IncorrectFieldCount {
                line: line_number,
                expected: 4 + num_teams,
                found: fields.len(),
            });
        }

        let numbers = fields[1..]
            .iter()
            .map(|field| {
                field
                    .parse::<u64>()
                    .map_err(|_| DivisionParseError::InvalidNumber {
                        line: line_number,
                        value: (*field).to_owned(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        teams.push(Team::new(
            fields[0],
            numbers[0],
            numbers[1],
            numbers[2],
            numbers[3..].to_vec(),
        ));
    }

    if teams.len() != num_teams {
        return Err(DivisionParseError::IncorrectTeamCount {
            expected: num_teams,
            parsed: teams.len(),
        });
    }

    for (i, first) in teams.iter().enumerate() {
        for (j, second) in teams.iter().enumerate().skip(i + 1) {
            if first.games_against(j) != second.games_against(i) {
                return Err(DivisionParseError::AsymmetricSchedule {
                    first: first.name().to_owned(),
                    second: second.name().to_owned(),
                });
            }
        }
    }

    Ok(Division::new(teams))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEAMS4: &str = "4
Atlanta       83 71  8  0 1 6 1
Philadelphia  80 79  3  1 0 0 2
New_York      78 78  6  6 0 0 0
Montreal      77 82  3  1 2 0 0
";

    #[test]
    fn teams_are_read_in_order() {
        let division = parse_division(TEAMS4.as_bytes()).expect("valid division");

        assert_eq!(division.num_teams(), 4);
        let atlanta = &division.teams()[0];
        assert_eq!(atlanta.name(), "Atlanta");
        assert_eq!(atlanta.wins(), 83);
        assert_eq!(atlanta.losses(), 71);
        assert_eq!(atlanta.remaining(), 8);
        assert_eq!(atlanta.games_against(2), 6);
        assert_eq!(division.team_by_name("Montreal"), Some(3));
    }

    #[test]
    fn missing_teams_are_reported() {
        let result = parse_division("3\nA 1 1 1 0 1 0\nB 1 1 1 1 0 0\n".as_bytes());

        assert!(matches!(
            result,
            Err(DivisionParseError::IncorrectTeamCount {
                expected: 3,
                parsed: 2
            })
        ));
    }

    #[test]
    fn schedules_have_to_be_symmetric() {
        let result = parse_division("2\nA 1 1 2 0 2\nB 1 1 1 1 0\n".as_bytes());

        assert!(matches!(
            result,
            Err(DivisionParseError::AsymmetricSchedule { .. })
        ));
    }

    #[test]
    fn short_lines_are_rejected() {
        let result = parse_division("2\nA 1 1 2 0\n".as_bytes());

        assert!(matches!(
            result,
            Err(DivisionParseError::IncorrectFieldCount {
                line: 2,
                expected: 6,
                found: 5
            })
        ));
    }
}
