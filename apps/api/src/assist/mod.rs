//! Writing assistance: AI rewrites, offline polish, and content import.
//!
//! Nothing in here mutates a document. Each operation produces replacement text
//! or content that the caller applies only on success, so a failed call leaves
//! the document exactly as it was.

pub mod credentials;
pub mod extract;
pub mod handlers;
pub mod import;
pub mod llm_client;
pub mod polish;
pub mod prompts;
pub mod rewrite;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assist::llm_client::LlmError;
use crate::models::content::{ContentDocument, ContentEdit, EntryList, LetterField, PersonalField};

/// Minimum number of non-whitespace characters an import source must carry.
pub const MIN_MEANINGFUL_CHARS: usize = 10;

#[derive(Debug, Error)]
pub enum AssistError {
    #[error("no AI credential stored for this client, or the service rejected it")]
    MissingCredential,

    #[error("{0}")]
    TextEmpty(String),

    #[error("{0}")]
    InvalidTarget(String),

    #[error("could not read the uploaded document: {0}")]
    Unreadable(String),

    #[error("text generation failed: {0}")]
    Service(String),

    #[error("credential storage failed: {0}")]
    Storage(#[from] anyhow::Error),
}

impl From<LlmError> for AssistError {
    fn from(e: LlmError) -> Self {
        if e.is_auth() {
            AssistError::MissingCredential
        } else {
            AssistError::Service(e.to_string())
        }
    }
}

/// Counts non-whitespace characters.
pub fn meaningful_chars(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

/// Which piece of prose an assist operation works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum TextTarget {
    Summary,
    Experience { index: usize },
    LetterBody,
}

impl TextTarget {
    /// Current text at the target, or `None` if the target does not exist on
    /// this document.
    pub fn read<'a>(&self, content: &'a ContentDocument) -> Option<&'a str> {
        match self {
            TextTarget::Summary => content.profile().map(|p| p.personal.summary.as_str()),
            TextTarget::Experience { index } => content
                .profile()
                .and_then(|p| p.experience.get(*index))
                .map(|e| e.description.as_str()),
            TextTarget::LetterBody => content.letter().map(|l| l.content.body.as_str()),
        }
    }

    /// The edit that writes `value` back to the target.
    pub fn edit(&self, value: String) -> ContentEdit {
        match self {
            TextTarget::Summary => ContentEdit::SetPersonal {
                field: PersonalField::Summary,
                value,
            },
            TextTarget::Experience { index } => ContentEdit::SetEntryField {
                list: EntryList::Experience,
                index: *index,
                field: "description".to_string(),
                value,
            },
            TextTarget::LetterBody => ContentEdit::SetLetter {
                field: LetterField::Body,
                value,
            },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TextTarget::Summary => "summary",
            TextTarget::Experience { .. } => "experience description",
            TextTarget::LetterBody => "letter body",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content::DocumentKind;

    #[test]
    fn test_targets_follow_document_kind() {
        let resume = ContentDocument::new(DocumentKind::Resume);
        assert_eq!(TextTarget::Summary.read(&resume), Some(""));
        assert_eq!(TextTarget::LetterBody.read(&resume), None);
        assert_eq!(TextTarget::Experience { index: 0 }.read(&resume), None);

        let letter = ContentDocument::new(DocumentKind::CoverLetter);
        assert_eq!(TextTarget::LetterBody.read(&letter), Some(""));
        assert_eq!(TextTarget::Summary.read(&letter), None);
    }

    #[test]
    fn test_edit_round_trips_through_document() {
        let mut doc = ContentDocument::new(DocumentKind::Resume);
        doc.apply_edit(TextTarget::Summary.edit("Hello".into())).unwrap();
        assert_eq!(TextTarget::Summary.read(&doc), Some("Hello"));
    }

    #[test]
    fn test_meaningful_chars_ignores_whitespace() {
        assert_eq!(meaningful_chars("  a b\n\tc  "), 3);
    }
}
