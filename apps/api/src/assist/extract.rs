//! Text extraction from uploaded documents.

use bytes::Bytes;

use crate::assist::import::ensure_meaningful;
use crate::assist::AssistError;

/// Synchronous and CPU-bound; callers run it under `spawn_blocking`.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, upload: Bytes) -> Result<String, AssistError>;
}

/// Reads the text layer of a PDF. Scanned PDFs without one come back as
/// `TextEmpty`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, upload: Bytes) -> Result<String, AssistError> {
        if upload.is_empty() {
            return Err(AssistError::Unreadable("the upload is empty".to_string()));
        }
        let text = pdf_extract::extract_text_from_mem(&upload)
            .map_err(|e| AssistError::Unreadable(e.to_string()))?;
        ensure_meaningful(&text)?;
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_upload_is_unreadable() {
        let err = PdfTextExtractor.extract(Bytes::new()).unwrap_err();
        assert!(matches!(err, AssistError::Unreadable(_)));
    }

    #[test]
    fn test_non_pdf_bytes_are_unreadable() {
        let err = PdfTextExtractor
            .extract(Bytes::from_static(b"this is plainly not a pdf document"))
            .unwrap_err();
        assert!(matches!(err, AssistError::Unreadable(_)));
    }
}
