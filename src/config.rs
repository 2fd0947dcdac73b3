use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::Error;

const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";
const DEFAULT_POOL_SIZE: u32 = 4;
const DEFAULT_POOL_TIMEOUT_SECS: u64 = 5;

/// Process settings read once at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct Environment {
    database_url: String,
    allowed_origin: String,
    pool_size: u32,
    pool_timeout: Duration,
}

impl Environment {
    /// Settings for `database_url` with everything else at its default.
    pub fn new<S: Into<String>>(database_url: S) -> Environment {
        Environment {
            database_url: database_url.into(),
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            pool_size: DEFAULT_POOL_SIZE,
            pool_timeout: Duration::from_secs(DEFAULT_POOL_TIMEOUT_SECS),
        }
    }

    /// Reads the process environment. Call `dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Environment, Error> {
        Environment::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Environment, Error>
        where F: Fn(&str) -> Option<String> {

        let database_url = lookup("DATABASE_URL").ok_or(Error::MissingVar("DATABASE_URL"))?;
        let mut environment = Environment::new(database_url);

        if let Some(origin) = lookup("CORS_ALLOWED_ORIGIN") {
            environment.allowed_origin = origin;
        }
        if let Some(size) = parse_var::<_, u32>(&lookup, "DATABASE_POOL_SIZE")? {
            if size == 0 {
                return Err(Error::InvalidVar { name: "DATABASE_POOL_SIZE", value: size.to_string() });
            }
            environment.pool_size = size;
        }
        if let Some(secs) = parse_var(&lookup, "DATABASE_TIMEOUT_SECS")? {
            environment.pool_timeout = Duration::from_secs(secs);
        }

        Ok(environment)
    }

    pub fn with_allowed_origin<S: Into<String>>(mut self, origin: S) -> Environment {
        self.allowed_origin = origin.into();
        self
    }

    pub fn with_pool_size(mut self, size: u32) -> Environment {
        self.pool_size = size;
        self
    }

    pub fn with_pool_timeout(mut self, timeout: Duration) -> Environment {
        self.pool_timeout = timeout;
        self
    }

    pub fn database_url(&self) -> &str { &self.database_url }
    pub fn allowed_origin(&self) -> &str { &self.allowed_origin }
    pub fn pool_size(&self) -> u32 { self.pool_size }
    pub fn pool_timeout(&self) -> Duration { self.pool_timeout }
}

fn parse_var<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, Error>
    where F: Fn(&str) -> Option<String>, T: FromStr {

    match lookup(name) {
        None => Ok(None),
        Some(value) => value.trim().parse()
            .map(Some)
            .map_err(|_| Error::InvalidVar { name, value }),
    }
}
