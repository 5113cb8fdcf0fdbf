use mongodb::{
    bson::{self, doc},
    options::FindOptions,
};
use rocket::{futures::TryStreamExt, serde::json::Json, Route};

use crate::error::{Error, Result};
use crate::model::{
    api::{ElectionDescription, ElectionSpec, ElectionSummary, OfficialIdentity},
    common::{ElectionId, ElectionStatus},
    db::{Election, Official},
    mongodb::{Coll, Counter, ELECTION_ID_COUNTER_ID},
};

use super::common::election_by_id;

pub fn routes() -> Vec<Route> {
    routes![
        create_election,
        list_elections,
        get_election,
        open_election,
        close_election,
    ]
}

#[post("/elections", data = "<spec>", format = "json")]
async fn create_election(
    spec: Json<ElectionSpec>,
    officials: Coll<Official>,
    elections: Coll<Election>,
    counters: Coll<Counter>,
) -> Result<Json<ElectionDescription>> {
    let spec = spec.into_inner();
    spec.validate()?;

    // The owning official must be registered.
    officials
        .find_one(doc! {"_id": &spec.official_id}, None)
        .await?
        .ok_or_else(|| Error::Conflict(format!("no registered official '{}'", spec.official_id)))?;

    // One insert covers the election and its whole position/candidate
    // structure, so creation is all-or-nothing.
    let election_id = Counter::next(&counters, ELECTION_ID_COUNTER_ID).await?;
    let election = spec.into_election(election_id);
    elections.insert_one(&election, None).await?;
    info!(
        "created election {election_id} '{}' for district '{}'",
        election.metadata.name, election.metadata.district
    );

    Ok(Json(election.into()))
}

#[get("/elections?<active_only>")]
async fn list_elections(
    active_only: Option<bool>,
    elections: Coll<Election>,
) -> Result<Json<Vec<ElectionSummary>>> {
    let filter = active_only
        .unwrap_or(false)
        .then(|| doc! {"status": ElectionStatus::Active});
    let options = FindOptions::builder().sort(doc! {"_id": -1}).build();
    let summaries = elections
        .find(filter, options)
        .await?
        .map_ok(ElectionSummary::from)
        .try_collect()
        .await?;
    Ok(Json(summaries))
}

#[get("/elections/<election_id>")]
async fn get_election(
    election_id: ElectionId,
    elections: Coll<Election>,
) -> Result<Json<ElectionDescription>> {
    let election = election_by_id(election_id, &elections).await?;
    Ok(Json(election.into()))
}

#[post("/elections/<election_id>/open", data = "<requester>", format = "json")]
async fn open_election(
    election_id: ElectionId,
    requester: Json<OfficialIdentity>,
    elections: Coll<Election>,
) -> Result<()> {
    let election = election_by_id(election_id, &elections).await?;
    // Ownership before status, so non-owners cannot probe the lifecycle.
    election.authorize(&requester.official_id)?;
    election.check_can_open()?;

    // The filter re-asserts the expected status; a concurrent transition
    // makes this a no-op instead of a double transition.
    let filter = doc! {
        "_id": election_id,
        "status": ElectionStatus::NotStarted,
    };
    let update = doc! {
        "$set": {
            "status": ElectionStatus::Active,
            "start_time": bson::DateTime::now(),
        }
    };
    let result = elections.update_one(filter, update, None).await?;
    if result.modified_count != 1 {
        return Err(Error::Conflict(format!(
            "election {election_id} changed status concurrently"
        )));
    }
    info!(
        "election {election_id} opened by '{}'",
        requester.official_id
    );
    Ok(())
}

#[post("/elections/<election_id>/close", data = "<requester>", format = "json")]
async fn close_election(
    election_id: ElectionId,
    requester: Json<OfficialIdentity>,
    elections: Coll<Election>,
) -> Result<()> {
    let election = election_by_id(election_id, &elections).await?;
    // Ownership before status, as above.
    election.authorize(&requester.official_id)?;
    election.check_can_close()?;

    let filter = doc! {
        "_id": election_id,
        "status": ElectionStatus::Active,
    };
    let update = doc! {
        "$set": {
            "status": ElectionStatus::Closed,
            "end_time": bson::DateTime::now(),
        }
    };
    let result = elections.update_one(filter, update, None).await?;
    if result.modified_count != 1 {
        return Err(Error::Conflict(format!(
            "election {election_id} changed status concurrently"
        )));
    }
    info!(
        "election {election_id} closed by '{}'",
        requester.official_id
    );
    Ok(())
}
