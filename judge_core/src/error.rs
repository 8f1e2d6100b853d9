use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No data: {0}")]
    NoData(String),
    #[error("Unknown service: {0}")]
    UnknownService(String),
    #[error("Not logged in: {0}")]
    NotLoggedIn(String),
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("Invalid post: {0}")]
    InvalidPost(String),

    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Cannot encode/decode JSON: {0}")]
    JSONError(#[from] serde_json::Error),
    #[error("Cannot decode cached posts: {0}")]
    CacheFormatError(#[from] serde_path_to_error::Error<serde_json::Error>),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
