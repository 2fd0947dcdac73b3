//! HTTP surface: `POST /api/new-ticket`, plus `GET /api/health` which
//! checks the connection pool, and a JSON catcher for every error status.

use diesel::RunQueryDsl;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::Request;
use serde::Serialize;

use crate::db_connection::DbConn;
use crate::models::{Ticket, TicketCreated};

/// Accepts a ticket and echoes it back. Bodies that do not match `Ticket`
/// are rejected by the JSON guard before this runs.
///
/// The guard is capped by Rocket's `limits.json`, raised to 16 MiB in
/// `Rocket.toml`; larger bodies get 413.
#[post("/api/new-ticket", data = "<ticket>")]
pub fn create_ticket(ticket: Json<Ticket>) -> Json<TicketCreated> {
    let ticket = ticket.into_inner();
    tracing::info!("received ticket: {:?}", ticket);

    Json(TicketCreated::new(ticket))
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
}

/// Database liveness. Sits beside the ticket route as the one handler that
/// takes a `DbConn`; it only runs `SELECT 1` and tickets are never stored.
#[get("/api/health")]
pub fn health(mut conn: DbConn) -> (Status, Json<Health>) {
    match diesel::sql_query("SELECT 1").execute(&mut *conn) {
        Ok(_) => (Status::Ok, Json(Health { status: "ok" })),
        Err(err) => {
            tracing::error!("health check query failed: {}", err);
            (Status::ServiceUnavailable, Json(Health { status: "unavailable" }))
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: u16,
    pub reason: &'static str,
}

fn error_body(status: Status) -> Json<ErrorBody> {
    Json(ErrorBody {
        error: ErrorDetail {
            code: status.code,
            reason: status.reason().unwrap_or("Unknown"),
        },
    })
}

// Error responses are always JSON, whatever the client asked for.
#[catch(default)]
pub fn json_error(status: Status, _request: &Request<'_>) -> (Status, Json<ErrorBody>) {
    (status, error_body(status))
}
