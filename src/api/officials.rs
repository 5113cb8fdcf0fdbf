use mongodb::bson::doc;
use rocket::{serde::json::Json, Route};

use crate::error::{Error, Result};
use crate::model::{api::OfficialSpec, db::Official, mongodb::Coll};

pub fn routes() -> Vec<Route> {
    routes![register_official]
}

#[post("/officials", data = "<spec>", format = "json")]
async fn register_official(
    spec: Json<OfficialSpec>,
    officials: Coll<Official>,
) -> Result<Json<Official>> {
    let spec = spec.into_inner();
    spec.validate()?;

    // Check username uniqueness.
    let existing = officials
        .find_one(doc! {"_id": &spec.username}, None)
        .await?;
    if existing.is_some() {
        return Err(Error::Conflict(format!(
            "official username already in use: {}",
            spec.username
        )));
    }

    let official: Official = spec.into();
    officials.insert_one(&official, None).await?;
    info!("registered official '{}'", official.username);
    Ok(Json(official))
}
