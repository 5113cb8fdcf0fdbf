use serde::{Deserialize, Serialize};

use crate::model::{
    common::{CandidateId, PositionId},
    db::Position,
};

/// Standings for one candidate in one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub candidate_id: CandidateId,
    pub name: String,
    pub party: String,
    pub vote_count: u64,
}

/// Standings for one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionResult {
    pub position_id: PositionId,
    pub position_name: String,
    /// Candidates ordered by vote count descending, then candidate ID
    /// ascending. Zero-vote candidates are included.
    pub candidates: Vec<CandidateResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_id: Option<CandidateId>,
}

impl PositionResult {
    /// Build the standings for a position, ordering the given per-candidate
    /// counts. `winner_id` is left unset; tallying fills in the computed
    /// winner, reads fill in the persisted one.
    pub fn new(position: &Position, mut candidates: Vec<CandidateResult>) -> Self {
        candidates.sort_by(|a, b| {
            b.vote_count
                .cmp(&a.vote_count)
                .then(a.candidate_id.cmp(&b.candidate_id))
        });
        Self {
            position_id: position.id,
            position_name: position.name.clone(),
            candidates,
            winner_id: None,
        }
    }

    /// The candidate these standings elect: the top of the ordering,
    /// provided they received any votes at all.
    pub fn winner(&self) -> Option<CandidateId> {
        self.candidates
            .first()
            .filter(|candidate| candidate.vote_count > 0)
            .map(|candidate| candidate.candidate_id)
    }
}

/// Full results for an election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionResults {
    pub election_name: String,
    pub is_active: bool,
    pub positions: Vec<PositionResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::db::Election;

    fn result(candidate_id: CandidateId, vote_count: u64) -> CandidateResult {
        CandidateResult {
            candidate_id,
            name: format!("Candidate {candidate_id}"),
            party: "Independent".to_string(),
            vote_count,
        }
    }

    fn mayor() -> Position {
        Election::example().position(1).unwrap().clone()
    }

    #[test]
    fn candidates_ordered_by_votes_then_id() {
        let standings = PositionResult::new(&mayor(), vec![result(1, 3), result(2, 5)]);
        let order: Vec<_> = standings
            .candidates
            .iter()
            .map(|c| c.candidate_id)
            .collect();
        assert_eq!(order, vec![2, 1]);
        assert_eq!(standings.winner(), Some(2));
    }

    #[test]
    fn ties_go_to_the_lower_candidate_id() {
        let standings = PositionResult::new(&mayor(), vec![result(2, 4), result(1, 4)]);
        let order: Vec<_> = standings
            .candidates
            .iter()
            .map(|c| c.candidate_id)
            .collect();
        assert_eq!(order, vec![1, 2]);
        assert_eq!(standings.winner(), Some(1));
    }

    #[test]
    fn no_votes_means_no_winner() {
        let standings = PositionResult::new(&mayor(), vec![result(1, 0), result(2, 0)]);
        assert_eq!(standings.winner(), None);
        // Zero-vote candidates still appear, lowest ID first.
        let order: Vec<_> = standings
            .candidates
            .iter()
            .map(|c| c.candidate_id)
            .collect();
        assert_eq!(order, vec![1, 2]);
    }
}
