use serde::{Deserialize, Serialize};

use crate::domain::SessionId;

/// Multipart field carrying the uploaded document.
pub const UPLOAD_FIELD_NAME: &str = "pdf";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub session_id: SessionId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub session_id: SessionId,
    pub question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
}
