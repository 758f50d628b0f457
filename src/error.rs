use thiserror::Error;

/// Everything that can go wrong while producing a projection.
///
/// Only `InvalidInput` is meant to reach a user. The two remote variants are
/// recovered by recomputing locally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("remote backend unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("malformed response from remote backend: {0}")]
    MalformedResponse(String),
}

impl ProjectionError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::RemoteUnavailable(_) | Self::MalformedResponse(_)
        )
    }
}

impl From<reqwest::Error> for ProjectionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::RemoteUnavailable(err.to_string())
        }
    }
}
