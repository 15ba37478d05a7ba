use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned identifier correlating questions with an indexed document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle of the one document a client works with.
///
/// Only `Indexed` carries a [`SessionId`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", content = "session_id", rename_all = "snake_case")]
pub enum DocumentStatus {
    #[default]
    Empty,
    Uploading,
    Indexed(SessionId),
    UploadFailed,
}

impl DocumentStatus {
    pub fn session_id(&self) -> Option<&SessionId> {
        match self {
            Self::Indexed(session_id) => Some(session_id),
            _ => None,
        }
    }

    pub fn is_indexed(&self) -> bool {
        matches!(self, Self::Indexed(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Uploading => "uploading",
            Self::Indexed(_) => "indexed",
            Self::UploadFailed => "upload_failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    User,
    Assistant,
    SystemNotice,
    FileNotice,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendStatus {
    Checking,
    Connected,
    Unreachable,
}
