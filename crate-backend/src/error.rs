#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("missing authentication")]
    MissingAuth,
    #[error("not found")]
    NotFound,
    #[error("forbidden")]
    MissingPermissions,
    #[error("bad request: {0}")]
    BadStatic(&'static str),
    #[error("too big :(")]
    TooBig,
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("internal error: {0}")]
    Internal(String),
    #[error("validation error: {0}")]
    Validator(#[from] validator::ValidationErrors),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("figment error: {0}")]
    Figment(#[from] figment::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
