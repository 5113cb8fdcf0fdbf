use mongodb::bson::doc;

use crate::error::{Error, Result};
use crate::model::{common::ElectionId, db::Election, mongodb::Coll};

/// Fetch an election by ID, or fail with a not-found error.
pub async fn election_by_id(
    election_id: ElectionId,
    elections: &Coll<Election>,
) -> Result<Election> {
    elections
        .find_one(doc! {"_id": election_id}, None)
        .await?
        .ok_or_else(|| Error::not_found(format!("election with ID {election_id}")))
}
