use std::path::Path;

use crate::error::ClientError;

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// A document picked by the user, held in memory until it is uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFile {
    pub name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl DocumentFile {
    pub fn new(name: impl Into<String>, mime_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type,
            bytes,
        }
    }

    pub fn pdf(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(name, Some(PDF_MIME_TYPE.to_string()), bytes)
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| ClientError::validation(format!("{} is not a file", path.display())))?;
        let bytes = tokio::fs::read(path).await.map_err(|err| {
            ClientError::validation(format!("failed to read {}: {err}", path.display()))
        })?;
        let mime_type = mime_guess::from_path(path)
            .first()
            .map(|mime| mime.essence_str().to_string());
        Ok(Self::new(name, mime_type, bytes))
    }

    pub fn is_accepted_type(&self) -> bool {
        self.mime_type
            .as_deref()
            .is_some_and(|mime| mime.eq_ignore_ascii_case(PDF_MIME_TYPE))
    }

    /// Rejects anything that must not reach the upload endpoint.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.name.trim().is_empty() {
            return Err(ClientError::validation("document has no file name"));
        }
        if !self.is_accepted_type() {
            return Err(ClientError::validation(format!(
                "{} is not a PDF document",
                self.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_pdf_mime_type_case_insensitively() {
        let file = DocumentFile::new("a.pdf", Some("Application/PDF".to_string()), Vec::new());
        assert!(file.validate().is_ok());
    }

    #[test]
    fn rejects_missing_or_foreign_mime_type() {
        let untyped = DocumentFile::new("notes", None, b"hi".to_vec());
        let text = DocumentFile::new("notes.txt", Some("text/plain".to_string()), b"hi".to_vec());
        assert!(matches!(untyped.validate(), Err(ClientError::Validation(_))));
        assert_eq!(
            text.validate(),
            Err(ClientError::Validation(
                "notes.txt is not a PDF document".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn from_path_guesses_mime_type_from_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pdf_path = dir.path().join("report.pdf");
        let txt_path = dir.path().join("readme.txt");
        std::fs::write(&pdf_path, b"%PDF-1.7").expect("write pdf");
        std::fs::write(&txt_path, b"plain").expect("write txt");

        let pdf = DocumentFile::from_path(&pdf_path).await.expect("read pdf");
        assert_eq!(pdf.name, "report.pdf");
        assert_eq!(pdf.mime_type.as_deref(), Some(PDF_MIME_TYPE));
        assert_eq!(pdf.bytes, b"%PDF-1.7");

        let txt = DocumentFile::from_path(&txt_path).await.expect("read txt");
        assert!(!txt.is_accepted_type());
    }

    #[tokio::test]
    async fn from_path_reports_missing_file_as_validation_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = DocumentFile::from_path(dir.path().join("missing.pdf"))
            .await
            .expect_err("missing file");
        assert!(matches!(err, ClientError::Validation(_)));
    }
}
