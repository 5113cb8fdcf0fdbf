use mongodb::{
    bson::doc,
    options::{FindOneAndUpdateOptions, ReturnDocument, UpdateOptions},
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::mongodb::Coll;

/// A counter document used to allocate auto-increment IDs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counter {
    #[serde(rename = "_id")]
    pub id: String,
    pub next: i64,
}

/// The ID of the counter that allocates election IDs.
pub const ELECTION_ID_COUNTER_ID: &str = "election_id";

impl Counter {
    /// Atomically take the next value from the counter with the given ID.
    pub async fn next(counters: &Coll<Counter>, id: &str) -> Result<i64> {
        let update = doc! {
            "$inc": { "next": 1 }
        };
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::Before)
            .build();
        let counter = counters
            .find_one_and_update(doc! {"_id": id}, update, options)
            .await?
            .ok_or_else(|| Error::Internal(format!("no counter with ID '{id}'")))?;
        Ok(counter.next)
    }
}

/// Create the election ID counter if it does not already exist.
pub async fn ensure_election_id_counter_exists(counters: &Coll<Counter>) -> Result<()> {
    let update = doc! {
        "$setOnInsert": { "next": 1 }
    };
    let options = UpdateOptions::builder().upsert(true).build();
    counters
        .update_one(doc! {"_id": ELECTION_ID_COUNTER_ID}, update, options)
        .await?;
    Ok(())
}
