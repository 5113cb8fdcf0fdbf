use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    common::{CandidateId, ElectionId, ElectionStatus, PositionId},
    db::{Candidate, Election, Position},
};

/// Minimum number of positions in an election.
pub const MIN_POSITIONS: usize = 3;
/// Minimum number of candidates per position.
pub const MIN_CANDIDATES: usize = 2;

/// A request to create an election, with its full position/candidate
/// structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectionSpec {
    pub name: String,
    pub district: String,
    pub official_id: String,
    pub positions: Vec<PositionSpec>,
}

/// A position specification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionSpec {
    pub name: String,
    pub candidates: Vec<CandidateSpec>,
}

/// A candidate specification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateSpec {
    pub name: String,
    pub party: String,
}

impl ElectionSpec {
    /// Validate the structural constraints on a new election.
    ///
    /// Runs before any database access.
    pub fn validate(&self) -> Result<()> {
        if self.positions.len() < MIN_POSITIONS {
            return Err(Error::TooFewPositions);
        }
        for position in &self.positions {
            if position.name.trim().is_empty() {
                return Err(Error::BadRequest("position name is required".to_string()));
            }
            if position.candidates.len() < MIN_CANDIDATES {
                return Err(Error::TooFewCandidates(position.name.clone()));
            }
            for candidate in &position.candidates {
                if candidate.name.trim().is_empty() {
                    return Err(Error::BadRequest(format!(
                        "candidate name is required for position '{}'",
                        position.name
                    )));
                }
                if candidate.party.trim().is_empty() {
                    return Err(Error::BadRequest(format!(
                        "candidate party is required for position '{}'",
                        position.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Convert this spec into an election document with sequential IDs.
    pub fn into_election(self, id: ElectionId) -> Election {
        let positions = self
            .positions
            .into_iter()
            .enumerate()
            .map(|(i, position)| {
                let position_id = 1 + PositionId::try_from(i).expect("usize to u32");
                (position_id, position.into_position(position_id))
            })
            .collect();
        Election::new(id, self.name, self.district, self.official_id, positions)
    }
}

impl PositionSpec {
    /// Convert this spec into a position with the given unique ID.
    fn into_position(self, id: PositionId) -> Position {
        let candidates = self
            .candidates
            .into_iter()
            .enumerate()
            .map(|(i, candidate)| {
                let candidate_id = 1 + CandidateId::try_from(i).expect("usize to u32");
                (
                    candidate_id,
                    Candidate {
                        id: candidate_id,
                        name: candidate.name,
                        party: candidate.party,
                    },
                )
            })
            .collect();
        Position {
            id,
            name: self.name,
            candidates,
            winner: None,
        }
    }
}

/// A short listing entry for an election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionSummary {
    pub id: ElectionId,
    pub name: String,
    pub district: String,
    pub official_id: String,
    pub status: ElectionStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl From<Election> for ElectionSummary {
    fn from(election: Election) -> Self {
        Self {
            id: election.id,
            name: election.metadata.name,
            district: election.metadata.district,
            official_id: election.metadata.official_id,
            status: election.metadata.status,
            start_time: election.metadata.start_time,
            end_time: election.metadata.end_time,
        }
    }
}

/// The voter-facing view of an election: everything needed to fill in a
/// ballot, nothing more.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionDescription {
    pub id: ElectionId,
    pub name: String,
    pub district: String,
    pub status: ElectionStatus,
    pub positions: Vec<PositionDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionDescription {
    pub id: PositionId,
    pub name: String,
    pub candidates: Vec<CandidateDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateDescription {
    pub id: CandidateId,
    pub name: String,
    pub party: String,
}

impl From<Election> for ElectionDescription {
    fn from(election: Election) -> Self {
        let positions = election
            .positions
            .into_values()
            .map(|position| PositionDescription {
                id: position.id,
                name: position.name,
                candidates: position
                    .candidates
                    .into_values()
                    .map(|candidate| CandidateDescription {
                        id: candidate.id,
                        name: candidate.name,
                        party: candidate.party,
                    })
                    .collect(),
            })
            .collect();
        Self {
            id: election.id,
            name: election.metadata.name,
            district: election.metadata.district,
            status: election.metadata.status,
            positions,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_spec_is_valid() {
        assert!(ElectionSpec::example().validate().is_ok());
    }

    #[test]
    fn at_least_three_positions() {
        let mut spec = ElectionSpec::example();
        spec.positions.truncate(2);
        assert!(matches!(spec.validate(), Err(Error::TooFewPositions)));
    }

    #[test]
    fn at_least_two_candidates_per_position() {
        let mut spec = ElectionSpec::example();
        spec.positions[1].candidates.truncate(1);
        match spec.validate() {
            Err(Error::TooFewCandidates(position)) => assert_eq!(position, "Treasurer"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn names_and_parties_must_be_non_empty() {
        let mut spec = ElectionSpec::example();
        spec.positions[0].name = " ".to_string();
        assert!(matches!(spec.validate(), Err(Error::BadRequest(_))));

        let mut spec = ElectionSpec::example();
        spec.positions[0].candidates[0].name = String::new();
        assert!(matches!(spec.validate(), Err(Error::BadRequest(_))));

        let mut spec = ElectionSpec::example();
        spec.positions[2].candidates[1].party = String::new();
        assert!(matches!(spec.validate(), Err(Error::BadRequest(_))));
    }

    #[test]
    fn conversion_assigns_sequential_ids() {
        let election = ElectionSpec::example().into_election(42);
        assert_eq!(election.id, 42);
        assert_eq!(election.metadata.status, ElectionStatus::NotStarted);
        assert_eq!(election.metadata.start_time, None);
        assert_eq!(election.metadata.end_time, None);

        let position_ids: Vec<_> = election.positions.keys().copied().collect();
        assert_eq!(position_ids, vec![1, 2, 3]);
        for position in election.positions.values() {
            assert_eq!(position.winner, None);
            let candidate_ids: Vec<_> = position.candidates.keys().copied().collect();
            assert_eq!(candidate_ids, vec![1, 2]);
            for (id, candidate) in &position.candidates {
                assert_eq!(*id, candidate.id);
            }
        }
    }

    #[test]
    fn description_preserves_creation_order() {
        let description = ElectionDescription::from(ElectionSpec::example().into_election(1));
        let names: Vec<_> = description
            .positions
            .iter()
            .map(|position| position.name.as_str())
            .collect();
        assert_eq!(names, vec!["Mayor", "Treasurer", "Clerk"]);
    }
}
