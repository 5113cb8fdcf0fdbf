use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::common::{CandidateId, ElectionId, PositionId};

/// A single recorded vote: one voter's pick for one position.
///
/// The database enforces uniqueness over (election_id, position_id,
/// voter_id); that constraint, not any in-process check, is what rules out
/// double-voting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub voter_id: String,
    pub election_id: ElectionId,
    pub position_id: PositionId,
    pub candidate_id: CandidateId,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub cast_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(
        voter_id: &str,
        election_id: ElectionId,
        position_id: PositionId,
        candidate_id: CandidateId,
    ) -> Self {
        Self {
            voter_id: voter_id.to_string(),
            election_id,
            position_id,
            candidate_id,
            cast_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson;

    use super::*;

    #[test]
    fn field_names_match_the_unique_index() {
        let vote = Vote::new("voter-1", 7, 1, 2);
        let document = bson::to_document(&vote).unwrap();
        for key in ["election_id", "position_id", "voter_id"] {
            assert!(document.contains_key(key), "missing index key {key}");
        }
    }
}
