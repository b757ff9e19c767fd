use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Cannot estimate from an empty series")]
    EmptySeries,

    #[error("Invalid span {0}: must be at least 1")]
    InvalidSpan(usize),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a single call to an external collaborator.
///
/// Every wrapper around a remote service returns one of these instead of
/// swallowing the failure, so the pipeline can decide whether to skip the
/// item, fall back, or give up.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type LookupResult<T> = std::result::Result<T, LookupError>;
