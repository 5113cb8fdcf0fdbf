//! Backend server for a district e-voting service: election creation and
//! lifecycle, ballot casting, and result tallying, backed by MongoDB.

#[macro_use]
extern crate rocket;
#[macro_use]
extern crate log;

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;

use rocket::{Build, Rocket};

use crate::config::DatabaseFairing;
use crate::logging::LoggerFairing;

/// Construct the server with all fairings and routes attached.
pub fn build() -> Rocket<Build> {
    rocket::build()
        .attach(LoggerFairing)
        .attach(DatabaseFairing)
        .mount("/", api::routes())
}
