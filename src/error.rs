use diesel::r2d2::PoolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} must be set")]
    MissingVar(&'static str),

    #[error("{name} has an invalid value {value:?}")]
    InvalidVar { name: &'static str, value: String },

    #[error("error connecting to database: {0}")]
    Pool(#[from] PoolError),

    #[error("launch failed: {0}")]
    Launch(Box<rocket::Error>),
}

impl From<rocket::Error> for Error {
    fn from(err: rocket::Error) -> Self {
        Error::Launch(Box::new(err))
    }
}
