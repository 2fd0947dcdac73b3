#[macro_use] extern crate rocket;

pub mod config;
pub mod cors;
pub mod db_connection;
pub mod error;
pub mod models;
pub mod routes;


use rocket::{Build, Rocket};

use config::Environment;
use cors::Cors;
use db_connection::init_db_connection_pool;

pub use error::Error;

/// Assembles the service: managed pool, CORS fairing, routes and catchers.
///
/// The pool is opened here, so a bad `DATABASE_URL` fails before launch.
pub fn rocket(env: Environment) -> Result<Rocket<Build>, Error> {
    let rocket = rocket::build();
    let pool = init_db_connection_pool(&env)?;
    tracing::info!(
        "database pool ready ({} connections), allowing CORS from {}",
        env.pool_size(), env.allowed_origin()
    );

    Ok(rocket
        .manage(pool)
        .attach(Cors::new(env.allowed_origin()))
        .mount("/", routes![routes::create_ticket, routes::health])
        .register("/", catchers![routes::json_error]))
}
