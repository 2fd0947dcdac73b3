use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use rocket::http::Status;
use rocket::outcome::{try_outcome, Outcome};
use rocket::request::{self, FromRequest, Request};
use rocket::State;
use std::ops::{Deref, DerefMut};

use crate::config::Environment;
use crate::error::Error;

pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// Initializes a database pool.
///
/// Fails if the pool cannot open its connections within the configured timeout.
pub fn init_db_connection_pool(env: &Environment) -> Result<SqlitePool, Error> {
    let manager = ConnectionManager::<SqliteConnection>::new(env.database_url());
    let pool = Pool::builder()
        .max_size(env.pool_size())
        .connection_timeout(env.pool_timeout())
        .build(manager)?;

    Ok(pool)
}

// Connection request guard type: a wrapper around an r2d2 pooled connection.
// The connection goes back to the pool when the guard is dropped.
pub struct DbConn(pub PooledConnection<ConnectionManager<SqliteConnection>>);

/// Attempts to retrieve a single connection from the managed database pool. If
/// no pool is currently managed, fails with an `InternalServerError` status. If
/// no connections are available, fails with a `ServiceUnavailable` status.
#[rocket::async_trait]
impl<'r> FromRequest<'r> for DbConn {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let pool = try_outcome!(request.guard::<&State<SqlitePool>>().await);
        match pool.get() {
            Ok(conn) => Outcome::Success(DbConn(conn)),
            Err(err) => {
                tracing::warn!("no database connection available: {}", err);
                Outcome::Error((Status::ServiceUnavailable, ()))
            }
        }
    }
}

// For the convenience of using a &mut DbConn as a &mut SqliteConnection.
impl Deref for DbConn {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DbConn {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::RunQueryDsl;
    use std::time::Duration;

    #[test]
    fn pooled_connections_run_queries() {
        let pool = init_db_connection_pool(&Environment::new(":memory:").with_pool_size(1)).unwrap();
        let mut conn = DbConn(pool.get().unwrap());
        assert!(diesel::sql_query("SELECT 1").execute(&mut *conn).is_ok());
    }

    #[test]
    fn dropping_the_guard_returns_the_connection() {
        let pool = init_db_connection_pool(&Environment::new(":memory:").with_pool_size(1)).unwrap();
        {
            let _conn = DbConn(pool.get().unwrap());
            assert_eq!(pool.state().idle_connections, 0);
        }
        assert_eq!(pool.state().idle_connections, 1);
        assert!(pool.get().is_ok());
    }

    #[test]
    fn unopenable_database_fails_pool_construction() {
        let env = Environment::new("/nonexistent/dir/helpdesk.db")
            .with_pool_size(1)
            .with_pool_timeout(Duration::from_millis(500));
        match init_db_connection_pool(&env) {
            Err(Error::Pool(_)) => {}
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("pool opened a database in a missing directory"),
        }
    }
}
