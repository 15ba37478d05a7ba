use shared::domain::{DocumentStatus, SessionId};

use crate::error::SessionError;

/// The single logical document session. Mutated only by the coordinator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    status: DocumentStatus,
    file_name: Option<String>,
}

impl SessionState {
    pub fn status(&self) -> &DocumentStatus {
        &self.status
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.status.session_id()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Starts a new upload, replacing whatever document was current.
    pub fn begin_upload(&mut self, file_name: impl Into<String>) -> Result<(), SessionError> {
        if self.status == DocumentStatus::Uploading {
            return Err(self.invalid("begin upload"));
        }
        self.status = DocumentStatus::Uploading;
        self.file_name = Some(file_name.into());
        Ok(())
    }

    pub fn complete_upload(&mut self, session_id: SessionId) -> Result<(), SessionError> {
        if self.status != DocumentStatus::Uploading {
            return Err(self.invalid("complete upload"));
        }
        self.status = DocumentStatus::Indexed(session_id);
        Ok(())
    }

    pub fn fail_upload(&mut self) -> Result<(), SessionError> {
        if self.status != DocumentStatus::Uploading {
            return Err(self.invalid("fail upload"));
        }
        self.status = DocumentStatus::UploadFailed;
        Ok(())
    }

    fn invalid(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            status: self.status.clone(),
            operation,
        }
    }
}
