use mongodb::Client;
use rocket::{serde::json::Json, Route, State};

use crate::error::{Error, Result};
use crate::model::{
    api::{BallotReceipt, BallotSpec},
    common::ElectionId,
    db::{Election, Vote},
    mongodb::{is_duplicate_key_error, Coll},
};

use super::common::election_by_id;

pub fn routes() -> Vec<Route> {
    routes![cast_ballot]
}

#[post("/elections/<election_id>/ballots", data = "<ballot>", format = "json")]
async fn cast_ballot(
    election_id: ElectionId,
    ballot: Json<BallotSpec>,
    elections: Coll<Election>,
    votes: Coll<Vote>,
    db_client: &State<Client>,
) -> Result<Json<BallotReceipt>> {
    let ballot = ballot.into_inner();
    ballot.validate()?;

    // Decide phase: every check except the uniqueness constraint happens
    // against the fetched election, before any write.
    let election = election_by_id(election_id, &elections).await?;
    let new_votes = election.validate_ballot(&ballot.voter_id, &ballot.selections)?;

    // Mutate phase: the whole ballot lands in one transaction. A duplicate
    // key means this voter already voted for one of the positions, and
    // nothing from this ballot is persisted.
    let mut session = db_client.start_session(None).await?;
    session.start_transaction(None).await?;
    match votes
        .insert_many_with_session(&new_votes, None, &mut session)
        .await
    {
        Ok(_) => session.commit_transaction().await?,
        Err(err) => {
            session.abort_transaction().await?;
            return Err(if is_duplicate_key_error(&err) {
                Error::DuplicateVote
            } else {
                err.into()
            });
        }
    }
    info!(
        "recorded {} votes for election {election_id}",
        new_votes.len()
    );

    Ok(Json(BallotReceipt {
        election_id,
        votes_cast: new_votes.len(),
    }))
}
