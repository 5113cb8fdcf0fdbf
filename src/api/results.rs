use mongodb::{bson::doc, Client};
use rocket::{serde::json::Json, Route, State};

use crate::error::Result;
use crate::model::{
    api::{CandidateResult, ElectionResults, OfficialIdentity, PositionResult},
    common::{ElectionId, ElectionStatus},
    db::{Election, Position, Vote},
    mongodb::Coll,
};

use super::common::election_by_id;

pub fn routes() -> Vec<Route> {
    routes![tally_results, get_results]
}

#[post("/elections/<election_id>/tally", data = "<requester>", format = "json")]
async fn tally_results(
    election_id: ElectionId,
    requester: Json<OfficialIdentity>,
    elections: Coll<Election>,
    votes: Coll<Vote>,
    db_client: &State<Client>,
) -> Result<Json<ElectionResults>> {
    let election = election_by_id(election_id, &elections).await?;
    // Ownership before status, so non-owners cannot probe the lifecycle.
    election.authorize(&requester.official_id)?;
    election.check_can_tally()?;

    // Count phase: standings for every position, in creation order.
    let mut positions = Vec::with_capacity(election.positions.len());
    for position in election.positions.values() {
        let mut standings = position_standings(&votes, election_id, position).await?;
        standings.winner_id = standings.winner();
        positions.push(standings);
    }

    // Mutate phase: persist every winner in one transaction. Re-tallying
    // recomputes the same winners from the same votes, so this is
    // idempotent.
    let mut session = db_client.start_session(None).await?;
    session.start_transaction(None).await?;
    for standings in &positions {
        if let Some(winner_id) = standings.winner_id {
            let winner_field = format!("positions.{}.winner", standings.position_id);
            let update = doc! {
                "$set": { &winner_field: i64::from(winner_id) }
            };
            elections
                .update_one_with_session(doc! {"_id": election_id}, update, None, &mut session)
                .await?;
        }
    }
    session.commit_transaction().await?;
    info!("tallied election {election_id}");

    Ok(Json(ElectionResults {
        election_name: election.metadata.name,
        is_active: false,
        positions,
    }))
}

#[get("/elections/<election_id>/results?<official_id>")]
async fn get_results(
    election_id: ElectionId,
    official_id: String,
    elections: Coll<Election>,
    votes: Coll<Vote>,
) -> Result<Json<ElectionResults>> {
    let election = election_by_id(election_id, &elections).await?;
    election.authorize(&official_id)?;

    // Counts are live; winners are only ever the ones a tally persisted.
    // Works on any status, so an open election shows interim standings.
    let mut positions = Vec::with_capacity(election.positions.len());
    for position in election.positions.values() {
        let mut standings = position_standings(&votes, election_id, position).await?;
        standings.winner_id = position.winner;
        positions.push(standings);
    }

    Ok(Json(ElectionResults {
        election_name: election.metadata.name,
        is_active: election.metadata.status == ElectionStatus::Active,
        positions,
    }))
}

/// Count votes per candidate for one position and order the standings.
async fn position_standings(
    votes: &Coll<Vote>,
    election_id: ElectionId,
    position: &Position,
) -> Result<PositionResult> {
    let mut candidates = Vec::with_capacity(position.candidates.len());
    for candidate in position.candidates.values() {
        let filter = doc! {
            "election_id": election_id,
            "position_id": i64::from(position.id),
            "candidate_id": i64::from(candidate.id),
        };
        let vote_count = votes.count_documents(filter, None).await?;
        candidates.push(CandidateResult {
            candidate_id: candidate.id,
            name: candidate.name.clone(),
            party: candidate.party.clone(),
            vote_count,
        });
    }
    Ok(PositionResult::new(position, candidates))
}
