use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    api::Selection,
    common::{CandidateId, ElectionId, ElectionStatus, PositionId},
    mongodb::{serde_option_datetime, serde_string_map},
};

use super::vote::Vote;

/// An election's top-level fields, separate from its position structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionMetadata {
    /// Election name.
    pub name: String,
    /// District the election is run in.
    pub district: String,
    /// Username of the owning district official.
    pub official_id: String,
    /// Lifecycle status.
    pub status: ElectionStatus,
    /// When the election was opened, if it ever was.
    #[serde(with = "serde_option_datetime")]
    pub start_time: Option<DateTime<Utc>>,
    /// When the election was closed, if it ever was.
    #[serde(with = "serde_option_datetime")]
    pub end_time: Option<DateTime<Utc>>,
}

/// An election document: metadata plus the full position/candidate structure.
///
/// Positions and candidates are embedded, so a position belongs to exactly
/// one election and a candidate to exactly one position by construction, and
/// creating an election with its whole structure is a single atomic insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Election {
    /// Unique ID.
    #[serde(rename = "_id")]
    pub id: ElectionId,
    /// Top-level metadata.
    #[serde(flatten)]
    pub metadata: ElectionMetadata,
    /// Positions by ID; iteration order is creation order.
    #[serde(with = "serde_string_map")]
    pub positions: BTreeMap<PositionId, Position>,
}

/// A contested position within an election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Unique ID within the election.
    pub id: PositionId,
    /// Position name.
    pub name: String,
    /// Candidates by ID; iteration order is creation order.
    #[serde(with = "serde_string_map")]
    pub candidates: BTreeMap<CandidateId, Candidate>,
    /// Winning candidate, recorded by tallying. Reads report this value
    /// as-is rather than recomputing it.
    pub winner: Option<CandidateId>,
}

/// A candidate standing for a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Unique ID within the position.
    pub id: CandidateId,
    /// Candidate name.
    pub name: String,
    /// Party name.
    pub party: String,
}

impl Election {
    /// Create a new election with the given structure, not yet started.
    pub fn new(
        id: ElectionId,
        name: String,
        district: String,
        official_id: String,
        positions: BTreeMap<PositionId, Position>,
    ) -> Self {
        Self {
            id,
            metadata: ElectionMetadata {
                name,
                district,
                official_id,
                status: ElectionStatus::NotStarted,
                start_time: None,
                end_time: None,
            },
            positions,
        }
    }

    /// Look up a position by ID.
    pub fn position(&self, id: PositionId) -> Option<&Position> {
        self.positions.get(&id)
    }

    /// Ensure the requester owns this election.
    ///
    /// Callers run this before any status check, so a requester who does not
    /// own the election cannot learn its status from the error they get.
    pub fn authorize(&self, official_id: &str) -> Result<()> {
        if self.metadata.official_id != official_id {
            return Err(Error::NotAuthorized(format!(
                "election {} is not administered by '{official_id}'",
                self.id
            )));
        }
        Ok(())
    }

    /// Check that this election can move to `Active`.
    pub fn check_can_open(&self) -> Result<()> {
        match self.metadata.status {
            ElectionStatus::NotStarted => Ok(()),
            ElectionStatus::Active => Err(Error::AlreadyActive),
            ElectionStatus::Closed => Err(Error::InvalidStatus("cannot reopen a closed election")),
        }
    }

    /// Check that this election can move to `Closed`.
    pub fn check_can_close(&self) -> Result<()> {
        match self.metadata.status {
            ElectionStatus::Active => Ok(()),
            ElectionStatus::Closed => Err(Error::AlreadyClosed),
            ElectionStatus::NotStarted => Err(Error::InvalidStatus(
                "cannot close an election that was never opened",
            )),
        }
    }

    /// Check that this election is ready to tally.
    pub fn check_can_tally(&self) -> Result<()> {
        match self.metadata.status {
            ElectionStatus::Closed => Ok(()),
            _ => Err(Error::ElectionNotClosed),
        }
    }

    /// Validate a ballot against this election, producing the votes to insert.
    ///
    /// This is the decide half of ballot casting: every check except the
    /// uniqueness constraint, which only the database can enforce. The ballot
    /// itself must already have passed [`BallotSpec::validate`]. Selections
    /// are checked in submission order and the first offending selection
    /// determines the error.
    ///
    /// [`BallotSpec::validate`]: crate::model::api::BallotSpec::validate
    pub fn validate_ballot(&self, voter_id: &str, selections: &[Selection]) -> Result<Vec<Vote>> {
        if self.metadata.status != ElectionStatus::Active {
            return Err(Error::ElectionNotActive);
        }

        let mut seen = HashSet::new();
        let mut votes = Vec::with_capacity(selections.len());
        for selection in selections {
            let position = self
                .position(selection.position_id)
                .ok_or(Error::PositionNotInElection(selection.position_id))?;
            if !seen.insert(selection.position_id) {
                return Err(Error::DuplicatePositionPick(selection.position_id));
            }
            if !position.candidates.contains_key(&selection.candidate_id) {
                return Err(Error::CandidateNotInPosition {
                    position: selection.position_id,
                    candidate: selection.candidate_id,
                });
            }
            votes.push(Vote::new(
                voter_id,
                self.id,
                selection.position_id,
                selection.candidate_id,
            ));
        }
        Ok(votes)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn full_ballot() -> Vec<Selection> {
        vec![
            Selection {
                position_id: 1,
                candidate_id: 1,
            },
            Selection {
                position_id: 2,
                candidate_id: 2,
            },
            Selection {
                position_id: 3,
                candidate_id: 1,
            },
        ]
    }

    #[test]
    fn only_the_owner_is_authorized() {
        let election = Election::example();
        assert!(election.authorize("returning-officer").is_ok());
        assert!(matches!(
            election.authorize("impostor"),
            Err(Error::NotAuthorized(_))
        ));
    }

    #[test]
    fn open_only_from_not_started() {
        assert!(Election::example().check_can_open().is_ok());
        assert!(matches!(
            Election::active_example().check_can_open(),
            Err(Error::AlreadyActive)
        ));
        assert!(matches!(
            Election::closed_example().check_can_open(),
            Err(Error::InvalidStatus(_))
        ));
    }

    #[test]
    fn close_only_from_active() {
        assert!(Election::active_example().check_can_close().is_ok());
        assert!(matches!(
            Election::closed_example().check_can_close(),
            Err(Error::AlreadyClosed)
        ));
        assert!(matches!(
            Election::example().check_can_close(),
            Err(Error::InvalidStatus(_))
        ));
    }

    #[test]
    fn tally_requires_closed() {
        assert!(Election::closed_example().check_can_tally().is_ok());
        assert!(matches!(
            Election::example().check_can_tally(),
            Err(Error::ElectionNotClosed)
        ));
        assert!(matches!(
            Election::active_example().check_can_tally(),
            Err(Error::ElectionNotClosed)
        ));
    }

    #[test]
    fn valid_ballot_produces_one_vote_per_selection() {
        let election = Election::active_example();
        let selections = full_ballot();
        let votes = election.validate_ballot("voter-1", &selections).unwrap();
        assert_eq!(votes.len(), selections.len());
        for (vote, selection) in votes.iter().zip(&selections) {
            assert_eq!(vote.voter_id, "voter-1");
            assert_eq!(vote.election_id, election.id);
            assert_eq!(vote.position_id, selection.position_id);
            assert_eq!(vote.candidate_id, selection.candidate_id);
        }
    }

    #[test]
    fn ballots_only_valid_while_active() {
        for election in [Election::example(), Election::closed_example()] {
            assert!(matches!(
                election.validate_ballot("voter-1", &full_ballot()),
                Err(Error::ElectionNotActive)
            ));
        }
    }

    #[test]
    fn unknown_position_rejected() {
        let election = Election::active_example();
        let selections = vec![Selection {
            position_id: 9,
            candidate_id: 1,
        }];
        assert!(matches!(
            election.validate_ballot("voter-1", &selections),
            Err(Error::PositionNotInElection(9))
        ));
    }

    #[test]
    fn duplicate_position_rejected() {
        let election = Election::active_example();
        let selections = vec![
            Selection {
                position_id: 1,
                candidate_id: 1,
            },
            Selection {
                position_id: 1,
                candidate_id: 2,
            },
        ];
        assert!(matches!(
            election.validate_ballot("voter-1", &selections),
            Err(Error::DuplicatePositionPick(1))
        ));
    }

    #[test]
    fn candidate_must_stand_for_the_position() {
        let election = Election::active_example();
        let selections = vec![Selection {
            position_id: 2,
            candidate_id: 9,
        }];
        assert!(matches!(
            election.validate_ballot("voter-1", &selections),
            Err(Error::CandidateNotInPosition {
                position: 2,
                candidate: 9,
            })
        ));
    }

    #[test]
    fn selections_checked_in_submission_order() {
        let election = Election::active_example();
        // The unknown position comes before the duplicate, so it wins.
        let selections = vec![
            Selection {
                position_id: 1,
                candidate_id: 1,
            },
            Selection {
                position_id: 9,
                candidate_id: 1,
            },
            Selection {
                position_id: 1,
                candidate_id: 1,
            },
        ];
        assert!(matches!(
            election.validate_ballot("voter-1", &selections),
            Err(Error::PositionNotInElection(9))
        ));
    }
}
