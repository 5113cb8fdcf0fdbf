use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::common::{CandidateId, ElectionId, PositionId};

/// One selection on a ballot: a candidate pick for one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub position_id: PositionId,
    pub candidate_id: CandidateId,
}

/// A ballot as submitted by a voter: their full set of picks for one
/// election, cast at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallotSpec {
    pub voter_id: String,
    pub selections: Vec<Selection>,
}

impl BallotSpec {
    /// Validation that needs no database access: the ballot must name a
    /// voter and contain at least one selection.
    pub fn validate(&self) -> Result<()> {
        if self.voter_id.trim().is_empty() {
            return Err(Error::BadRequest("voter ID is required".to_string()));
        }
        if self.selections.is_empty() {
            return Err(Error::BallotEmpty);
        }
        Ok(())
    }
}

/// Confirmation returned to the voter after a successful cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotReceipt {
    pub election_id: ElectionId,
    pub votes_cast: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ballots_need_a_voter_and_at_least_one_selection() {
        let ballot = BallotSpec {
            voter_id: "  ".to_string(),
            selections: vec![Selection {
                position_id: 1,
                candidate_id: 1,
            }],
        };
        assert!(matches!(ballot.validate(), Err(Error::BadRequest(_))));

        let ballot = BallotSpec {
            voter_id: "voter-1".to_string(),
            selections: Vec::new(),
        };
        assert!(matches!(ballot.validate(), Err(Error::BallotEmpty)));

        let ballot = BallotSpec {
            voter_id: "voter-1".to_string(),
            selections: vec![Selection {
                position_id: 1,
                candidate_id: 1,
            }],
        };
        assert!(ballot.validate().is_ok());
    }
}
