use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[allow(clippy::enum_variant_names)]
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown service: {0}")]
    UnknownService(String),
    #[error("Client id is required to authorize {0}")]
    MissingClientId(String),
    #[error("Callback server error: {0}")]
    ServerError(String),
    #[error("Authorization did not complete")]
    GrantIncomplete,

    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Cannot encode/decode JSON: {0}")]
    JSONError(#[from] serde_json::Error),
    #[error("Cannot parse URL: {0}")]
    UrlError(#[from] url::ParseError),
    #[error("Parsing error: {0}")]
    ParsingError(#[from] judge_util::ParsingError),
}

impl From<Error> for judge_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::UnknownService(service) => judge_core::Error::UnknownService(service),
            Error::MissingClientId(_) | Error::GrantIncomplete => judge_core::Error::NotLoggedIn(err.to_string()),
            err => judge_core::Error::Other(err.into()),
        }
    }
}
