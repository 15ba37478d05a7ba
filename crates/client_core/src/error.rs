use shared::domain::DocumentStatus;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("cannot {operation} while document status is {}", .status.label())]
    InvalidTransition {
        status: DocumentStatus,
        operation: &'static str,
    },
}

/// Outcome of a rejected or failed coordinator operation.
///
/// Every variant is terminal for the attempt that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Transport(String),
    #[error("another upload or question is already in progress")]
    Busy,
    #[error("no indexed document for this session")]
    NotIndexed,
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Transport("request timed out".to_string());
        }
        if err.is_connect() {
            return Self::Transport("could not connect to server".to_string());
        }
        if let Some(status) = err.status() {
            return Self::Transport(format!("server responded with {status}"));
        }
        if err.is_decode() {
            return Self::Transport("malformed response body".to_string());
        }
        Self::Transport(err.to_string())
    }
}
