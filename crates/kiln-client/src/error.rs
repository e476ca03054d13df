use thiserror::Error;

/// Errors that can be returned by kiln-client operations.
///
/// The [`Gateway`](crate::gateway::Gateway) is the single point that maps
/// raw transport and envelope outcomes into this taxonomy; every higher
/// layer propagates values unchanged.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP exchange itself failed: no response, DNS failure, timeout.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A well-formed response whose envelope code was not 200.
    #[error("backend error {code}: {message}")]
    Business { code: i64, message: String },

    /// The backend reported an unknown identifier (envelope code 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller aborted an in-flight upload.
    #[error("operation cancelled")]
    Cancelled,

    /// Envelope `data` did not match the expected response shape.
    #[error("malformed response payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Whether a poller should treat this failure as a blip and keep
    /// going. Transport and decode failures are transient; a business
    /// failure or unknown identifier will not heal on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Decode(_))
    }

    /// The most specific message available for user-facing notification:
    /// the envelope `message` when there is one, else the transport
    /// error text.
    pub fn user_message(&self) -> String {
        match self {
            Self::Business { message, .. } | Self::NotFound(message) => message.clone(),
            other => other.to_string(),
        }
    }
}
