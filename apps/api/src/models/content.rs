//! Content Model: the structured data behind a resume, CV, or cover letter.
//!
//! Repeated entries (experience, education, publications, awards) carry no identity
//! beyond their position. They are edited in place by index; a list can only grow by
//! appending a blank entry and shrink by removing one position.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// Document kinds
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Resume,
    Cv,
    CoverLetter,
}

impl DocumentKind {
    pub fn key(&self) -> &'static str {
        match self {
            DocumentKind::Resume => "resume",
            DocumentKind::Cv => "cv",
            DocumentKind::CoverLetter => "cover_letter",
        }
    }

    /// Default download filename stem when the author has no name yet.
    pub fn fallback_filename(&self) -> &'static str {
        match self {
            DocumentKind::Resume => "resume",
            DocumentKind::Cv => "my-cv",
            DocumentKind::CoverLetter => "cover-letter",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Profile content (resume + CV)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Personal {
    pub full_name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub role: String,
    pub company: String,
    pub start: String,
    pub end: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub school: String,
    pub degree: String,
    pub field: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Publication {
    pub title: String,
    pub publisher: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Award {
    pub name: String,
    pub issuer: String,
    pub year: String,
}

/// Resume / CV body. `publications` and `awards` stay empty for resumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileContent {
    pub personal: Personal,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    /// Free text, comma-delimited.
    pub skills: String,
    pub publications: Vec<Publication>,
    pub awards: Vec<Award>,
}

impl ProfileContent {
    /// Comma-split skills with blanks dropped.
    pub fn skill_items(&self) -> Vec<&str> {
        split_skills(&self.skills)
    }
}

pub fn split_skills(skills: &str) -> Vec<&str> {
    skills
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Letter content
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sender {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recipient {
    pub name: String,
    pub title: String,
    pub company: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LetterBody {
    pub subject: String,
    pub greeting: String,
    pub body: String,
    pub closing: String,
}

impl Default for LetterBody {
    fn default() -> Self {
        Self {
            subject: String::new(),
            greeting: String::new(),
            body: String::new(),
            closing: "Sincerely,".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LetterContent {
    pub sender: Sender,
    pub recipient: Recipient,
    pub content: LetterBody,
    /// Letter date. Stamped by the caller so composition stays free of clock reads.
    pub date: Option<NaiveDate>,
}

// ────────────────────────────────────────────────────────────────────────────
// ContentDocument
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentDocument {
    Resume(ProfileContent),
    Cv(ProfileContent),
    CoverLetter(LetterContent),
}

impl ContentDocument {
    /// A blank document of the given kind.
    pub fn new(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Resume => ContentDocument::Resume(ProfileContent::default()),
            DocumentKind::Cv => ContentDocument::Cv(ProfileContent::default()),
            DocumentKind::CoverLetter => ContentDocument::CoverLetter(LetterContent::default()),
        }
    }

    pub fn kind(&self) -> DocumentKind {
        match self {
            ContentDocument::Resume(_) => DocumentKind::Resume,
            ContentDocument::Cv(_) => DocumentKind::Cv,
            ContentDocument::CoverLetter(_) => DocumentKind::CoverLetter,
        }
    }

    pub fn profile(&self) -> Option<&ProfileContent> {
        match self {
            ContentDocument::Resume(p) | ContentDocument::Cv(p) => Some(p),
            ContentDocument::CoverLetter(_) => None,
        }
    }

    pub fn profile_mut(&mut self) -> Option<&mut ProfileContent> {
        match self {
            ContentDocument::Resume(p) | ContentDocument::Cv(p) => Some(p),
            ContentDocument::CoverLetter(_) => None,
        }
    }

    pub fn letter(&self) -> Option<&LetterContent> {
        match self {
            ContentDocument::CoverLetter(l) => Some(l),
            _ => None,
        }
    }

    pub fn letter_mut(&mut self) -> Option<&mut LetterContent> {
        match self {
            ContentDocument::CoverLetter(l) => Some(l),
            _ => None,
        }
    }

    /// Name of the document's author, used for download filenames.
    pub fn author_name(&self) -> &str {
        match self {
            ContentDocument::Resume(p) | ContentDocument::Cv(p) => &p.personal.full_name,
            ContentDocument::CoverLetter(l) => &l.sender.full_name,
        }
    }

    /// Applies a single edit in place. On error the document is left untouched.
    pub fn apply_edit(&mut self, edit: ContentEdit) -> Result<(), EditError> {
        let kind = self.kind();
        match edit {
            ContentEdit::SetPersonal { field, value } => {
                let p = self.profile_mut().ok_or(EditError::NotApplicable {
                    op: "set_personal",
                    kind,
                })?;
                match field {
                    PersonalField::FullName => p.personal.full_name = value,
                    PersonalField::Title => p.personal.title = value,
                    PersonalField::Email => p.personal.email = value,
                    PersonalField::Phone => p.personal.phone = value,
                    PersonalField::Address => {
                        p.personal.address = if value.trim().is_empty() {
                            None
                        } else {
                            Some(value)
                        }
                    }
                    PersonalField::Summary => p.personal.summary = value,
                }
            }
            ContentEdit::SetSkills { value } => {
                let p = self.profile_mut().ok_or(EditError::NotApplicable {
                    op: "set_skills",
                    kind,
                })?;
                p.skills = value;
            }
            ContentEdit::AppendEntry { list } => {
                let p = profile_for_list(self, list, kind)?;
                match list {
                    EntryList::Experience => p.experience.push(Experience::default()),
                    EntryList::Education => p.education.push(Education::default()),
                    EntryList::Publications => p.publications.push(Publication::default()),
                    EntryList::Awards => p.awards.push(Award::default()),
                }
            }
            ContentEdit::RemoveEntry { list, index } => {
                let p = profile_for_list(self, list, kind)?;
                match list {
                    EntryList::Experience => remove_at(&mut p.experience, list, index)?,
                    EntryList::Education => remove_at(&mut p.education, list, index)?,
                    EntryList::Publications => remove_at(&mut p.publications, list, index)?,
                    EntryList::Awards => remove_at(&mut p.awards, list, index)?,
                }
            }
            ContentEdit::SetEntryField {
                list,
                index,
                field,
                value,
            } => {
                let p = profile_for_list(self, list, kind)?;
                match list {
                    EntryList::Experience => set_at(&mut p.experience, list, index, &field, value)?,
                    EntryList::Education => set_at(&mut p.education, list, index, &field, value)?,
                    EntryList::Publications => {
                        set_at(&mut p.publications, list, index, &field, value)?
                    }
                    EntryList::Awards => set_at(&mut p.awards, list, index, &field, value)?,
                }
            }
            ContentEdit::SetSender { field, value } => {
                let l = self.letter_mut().ok_or(EditError::NotApplicable {
                    op: "set_sender",
                    kind,
                })?;
                match field {
                    SenderField::FullName => l.sender.full_name = value,
                    SenderField::Email => l.sender.email = value,
                    SenderField::Phone => l.sender.phone = value,
                    SenderField::Address => l.sender.address = value,
                }
            }
            ContentEdit::SetRecipient { field, value } => {
                let l = self.letter_mut().ok_or(EditError::NotApplicable {
                    op: "set_recipient",
                    kind,
                })?;
                match field {
                    RecipientField::Name => l.recipient.name = value,
                    RecipientField::Title => l.recipient.title = value,
                    RecipientField::Company => l.recipient.company = value,
                    RecipientField::Address => l.recipient.address = value,
                }
            }
            ContentEdit::SetLetter { field, value } => {
                let l = self.letter_mut().ok_or(EditError::NotApplicable {
                    op: "set_letter",
                    kind,
                })?;
                match field {
                    LetterField::Subject => l.content.subject = value,
                    LetterField::Greeting => l.content.greeting = value,
                    LetterField::Body => l.content.body = value,
                    LetterField::Closing => l.content.closing = value,
                }
            }
            ContentEdit::SetDate { date } => {
                let l = self.letter_mut().ok_or(EditError::NotApplicable {
                    op: "set_date",
                    kind,
                })?;
                l.date = date;
            }
        }
        Ok(())
    }
}

fn profile_for_list(
    doc: &mut ContentDocument,
    list: EntryList,
    kind: DocumentKind,
) -> Result<&mut ProfileContent, EditError> {
    if list.is_cv_only() && kind != DocumentKind::Cv {
        return Err(EditError::CvOnly { list, kind });
    }
    doc.profile_mut().ok_or(EditError::NotApplicable {
        op: "entry_edit",
        kind,
    })
}

fn remove_at<T>(entries: &mut Vec<T>, list: EntryList, index: usize) -> Result<(), EditError> {
    if index >= entries.len() {
        return Err(EditError::IndexOutOfRange {
            list,
            index,
            len: entries.len(),
        });
    }
    entries.remove(index);
    Ok(())
}

fn set_at<T: EntryFields>(
    entries: &mut [T],
    list: EntryList,
    index: usize,
    field: &str,
    value: String,
) -> Result<(), EditError> {
    let len = entries.len();
    let entry = entries
        .get_mut(index)
        .ok_or(EditError::IndexOutOfRange { list, index, len })?;
    let slot = entry.field_mut(field).ok_or_else(|| EditError::UnknownField {
        list,
        field: field.to_string(),
    })?;
    *slot = value;
    Ok(())
}

/// Field access by name for positional entries.
pub trait EntryFields {
    fn field_mut(&mut self, field: &str) -> Option<&mut String>;
}

impl EntryFields for Experience {
    fn field_mut(&mut self, field: &str) -> Option<&mut String> {
        match field {
            "role" => Some(&mut self.role),
            "company" => Some(&mut self.company),
            "start" => Some(&mut self.start),
            "end" => Some(&mut self.end),
            "description" => Some(&mut self.description),
            _ => None,
        }
    }
}

impl EntryFields for Education {
    fn field_mut(&mut self, field: &str) -> Option<&mut String> {
        match field {
            "school" => Some(&mut self.school),
            "degree" => Some(&mut self.degree),
            "field" => Some(&mut self.field),
            "year" => Some(&mut self.year),
            _ => None,
        }
    }
}

impl EntryFields for Publication {
    fn field_mut(&mut self, field: &str) -> Option<&mut String> {
        match field {
            "title" => Some(&mut self.title),
            "publisher" => Some(&mut self.publisher),
            "year" => Some(&mut self.year),
            _ => None,
        }
    }
}

impl EntryFields for Award {
    fn field_mut(&mut self, field: &str) -> Option<&mut String> {
        match field {
            "name" => Some(&mut self.name),
            "issuer" => Some(&mut self.issuer),
            "year" => Some(&mut self.year),
            _ => None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Edit operations
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalField {
    FullName,
    Title,
    Email,
    Phone,
    Address,
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryList {
    Experience,
    Education,
    Publications,
    Awards,
}

impl EntryList {
    pub fn is_cv_only(&self) -> bool {
        matches!(self, EntryList::Publications | EntryList::Awards)
    }
}

impl std::fmt::Display for EntryList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EntryList::Experience => "experience",
            EntryList::Education => "education",
            EntryList::Publications => "publications",
            EntryList::Awards => "awards",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SenderField {
    FullName,
    Email,
    Phone,
    Address,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientField {
    Name,
    Title,
    Company,
    Address,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LetterField {
    Subject,
    Greeting,
    Body,
    Closing,
}

/// One incremental change to a document, as sent by the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ContentEdit {
    SetPersonal { field: PersonalField, value: String },
    SetSkills { value: String },
    AppendEntry { list: EntryList },
    RemoveEntry { list: EntryList, index: usize },
    SetEntryField {
        list: EntryList,
        index: usize,
        field: String,
        value: String,
    },
    SetSender { field: SenderField, value: String },
    SetRecipient { field: RecipientField, value: String },
    SetLetter { field: LetterField, value: String },
    SetDate { date: Option<NaiveDate> },
}

#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    #[error("operation '{op}' does not apply to a {} document", kind.key())]
    NotApplicable { op: &'static str, kind: DocumentKind },

    #[error("{list} is only available on CVs, not on a {} document", kind.key())]
    CvOnly { list: EntryList, kind: DocumentKind },

    #[error("{list} has {len} entries; index {index} is out of range")]
    IndexOutOfRange {
        list: EntryList,
        index: usize,
        len: usize,
    },

    #[error("{list} entries have no field '{field}'")]
    UnknownField { list: EntryList, field: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(field: PersonalField, value: &str) -> ContentEdit {
        ContentEdit::SetPersonal {
            field,
            value: value.to_string(),
        }
    }

    #[test]
    fn test_new_letter_defaults_closing() {
        let doc = ContentDocument::new(DocumentKind::CoverLetter);
        assert_eq!(doc.letter().unwrap().content.closing, "Sincerely,");
    }

    #[test]
    fn test_set_personal_on_resume() {
        let mut doc = ContentDocument::new(DocumentKind::Resume);
        doc.apply_edit(set(PersonalField::FullName, "Jane Doe")).unwrap();
        assert_eq!(doc.profile().unwrap().personal.full_name, "Jane Doe");
        assert_eq!(doc.author_name(), "Jane Doe");
    }

    #[test]
    fn test_blank_address_clears_option() {
        let mut doc = ContentDocument::new(DocumentKind::Resume);
        doc.apply_edit(set(PersonalField::Address, "Berlin")).unwrap();
        assert_eq!(
            doc.profile().unwrap().personal.address.as_deref(),
            Some("Berlin")
        );
        doc.apply_edit(set(PersonalField::Address, "   ")).unwrap();
        assert_eq!(doc.profile().unwrap().personal.address, None);
    }

    #[test]
    fn test_set_personal_on_letter_not_applicable() {
        let mut doc = ContentDocument::new(DocumentKind::CoverLetter);
        let err = doc.apply_edit(set(PersonalField::Title, "x")).unwrap_err();
        assert!(matches!(err, EditError::NotApplicable { .. }));
    }

    #[test]
    fn test_append_then_edit_entry_by_position() {
        let mut doc = ContentDocument::new(DocumentKind::Resume);
        doc.apply_edit(ContentEdit::AppendEntry {
            list: EntryList::Experience,
        })
        .unwrap();
        doc.apply_edit(ContentEdit::AppendEntry {
            list: EntryList::Experience,
        })
        .unwrap();
        doc.apply_edit(ContentEdit::SetEntryField {
            list: EntryList::Experience,
            index: 1,
            field: "company".to_string(),
            value: "Acme".to_string(),
        })
        .unwrap();

        let p = doc.profile().unwrap();
        assert_eq!(p.experience.len(), 2);
        assert_eq!(p.experience[0].company, "");
        assert_eq!(p.experience[1].company, "Acme");
    }

    #[test]
    fn test_remove_entry_shifts_positions() {
        let mut doc = ContentDocument::new(DocumentKind::Resume);
        let p = doc.profile_mut().unwrap();
        p.education.push(Education {
            school: "A".to_string(),
            ..Default::default()
        });
        p.education.push(Education {
            school: "B".to_string(),
            ..Default::default()
        });
        doc.apply_edit(ContentEdit::RemoveEntry {
            list: EntryList::Education,
            index: 0,
        })
        .unwrap();
        let p = doc.profile().unwrap();
        assert_eq!(p.education.len(), 1);
        assert_eq!(p.education[0].school, "B");
    }

    #[test]
    fn test_out_of_range_leaves_document_untouched() {
        let mut doc = ContentDocument::new(DocumentKind::Resume);
        let before = doc.clone();
        let err = doc
            .apply_edit(ContentEdit::RemoveEntry {
                list: EntryList::Experience,
                index: 0,
            })
            .unwrap_err();
        assert_eq!(
            err,
            EditError::IndexOutOfRange {
                list: EntryList::Experience,
                index: 0,
                len: 0
            }
        );
        assert_eq!(doc, before);
    }

    #[test]
    fn test_unknown_entry_field_rejected() {
        let mut doc = ContentDocument::new(DocumentKind::Resume);
        doc.apply_edit(ContentEdit::AppendEntry {
            list: EntryList::Education,
        })
        .unwrap();
        let err = doc
            .apply_edit(ContentEdit::SetEntryField {
                list: EntryList::Education,
                index: 0,
                field: "gpa".to_string(),
                value: "4.0".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, EditError::UnknownField { .. }));
    }

    #[test]
    fn test_publications_are_cv_only() {
        let mut resume = ContentDocument::new(DocumentKind::Resume);
        let err = resume
            .apply_edit(ContentEdit::AppendEntry {
                list: EntryList::Publications,
            })
            .unwrap_err();
        assert!(matches!(err, EditError::CvOnly { .. }));

        let mut cv = ContentDocument::new(DocumentKind::Cv);
        cv.apply_edit(ContentEdit::AppendEntry {
            list: EntryList::Publications,
        })
        .unwrap();
        assert_eq!(cv.profile().unwrap().publications.len(), 1);
    }

    #[test]
    fn test_skill_items_drop_blanks() {
        let p = ProfileContent {
            skills: "Rust, , Go ,SQL,".to_string(),
            ..Default::default()
        };
        assert_eq!(p.skill_items(), vec!["Rust", "Go", "SQL"]);
    }

    #[test]
    fn test_edit_serde_shape() {
        let json = r#"{"op":"set_entry_field","list":"experience","index":0,
            "field":"role","value":"Engineer"}"#;
        let edit: ContentEdit = serde_json::from_str(json).unwrap();
        assert_eq!(
            edit,
            ContentEdit::SetEntryField {
                list: EntryList::Experience,
                index: 0,
                field: "role".to_string(),
                value: "Engineer".to_string(),
            }
        );
    }

    #[test]
    fn test_document_serde_is_kind_tagged() {
        let doc = ContentDocument::new(DocumentKind::Cv);
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["kind"], "cv");
        let back: ContentDocument = serde_json::from_value(value).unwrap();
        assert_eq!(back.kind(), DocumentKind::Cv);
    }
}
