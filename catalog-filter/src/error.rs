use thiserror::Error;

/// Failure of one remote catalog search.
///
/// Cloneable so the last failure can sit in the rendered view.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("catalog request failed: {0}")]
    Transport(String),

    #[error("catalog answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode catalog response: {0}")]
    Decode(String),

    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
