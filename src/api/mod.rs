use rocket::Route;

mod common;
mod elections;
mod officials;
mod results;
mod voting;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(officials::routes());
    routes.extend(elections::routes());
    routes.extend(voting::routes());
    routes.extend(results::routes());
    routes
}
