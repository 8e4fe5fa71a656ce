use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::content::DocumentKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    Summary,
    Experience,
    Education,
    Skills,
    Publications,
    Awards,
}

impl SectionId {
    pub fn key(&self) -> &'static str {
        match self {
            SectionId::Summary => "summary",
            SectionId::Experience => "experience",
            SectionId::Education => "education",
            SectionId::Skills => "skills",
            SectionId::Publications => "publications",
            SectionId::Awards => "awards",
        }
    }

    /// Heading printed above the section.
    pub fn title(&self) -> &'static str {
        match self {
            SectionId::Summary => "Professional Summary",
            SectionId::Experience => "Experience",
            SectionId::Education => "Education",
            SectionId::Skills => "Skills",
            SectionId::Publications => "Publications",
            SectionId::Awards => "Awards & Certifications",
        }
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl DocumentKind {
    /// Sections a document of this kind can display at all.
    pub fn supported_sections(&self) -> &'static [SectionId] {
        match self {
            DocumentKind::Resume => &[
                SectionId::Summary,
                SectionId::Experience,
                SectionId::Education,
                SectionId::Skills,
            ],
            DocumentKind::Cv => &[
                SectionId::Summary,
                SectionId::Experience,
                SectionId::Education,
                SectionId::Skills,
                SectionId::Publications,
                SectionId::Awards,
            ],
            // Letters compose from a fixed skeleton.
            DocumentKind::CoverLetter => &[],
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SectionOrderError {
    #[error("section '{0}' appears more than once")]
    Duplicate(SectionId),

    #[error("section '{0}' is not in the current order")]
    NotPresent(SectionId),

    #[error("a {} document cannot display section '{section}'", kind.key())]
    Unsupported {
        section: SectionId,
        kind: DocumentKind,
    },
}

/// Ordered, duplicate-free list of visible sections.
///
/// A section missing from the order is hidden, whatever content it has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SectionId>", into = "Vec<SectionId>")]
pub struct SectionOrder(Vec<SectionId>);

impl SectionOrder {
    pub fn new(ids: Vec<SectionId>) -> Result<Self, SectionOrderError> {
        for (i, id) in ids.iter().enumerate() {
            if ids[..i].contains(id) {
                return Err(SectionOrderError::Duplicate(*id));
            }
        }
        Ok(Self(ids))
    }

    /// Order a freshly started document opens with.
    pub fn default_for(kind: DocumentKind) -> Self {
        let ids = match kind {
            DocumentKind::Resume => vec![
                SectionId::Summary,
                SectionId::Experience,
                SectionId::Education,
                SectionId::Skills,
            ],
            DocumentKind::Cv => vec![
                SectionId::Summary,
                SectionId::Education,
                SectionId::Publications,
                SectionId::Experience,
                SectionId::Awards,
                SectionId::Skills,
            ],
            DocumentKind::CoverLetter => vec![],
        };
        Self(ids)
    }

    pub fn ids(&self) -> &[SectionId] {
        &self.0
    }

    pub fn contains(&self, id: SectionId) -> bool {
        self.0.contains(&id)
    }

    pub fn position(&self, id: SectionId) -> Option<usize> {
        self.0.iter().position(|s| *s == id)
    }

    /// Rejects sections the document kind has no content slot for.
    pub fn check_supported(&self, kind: DocumentKind) -> Result<(), SectionOrderError> {
        let supported = kind.supported_sections();
        match self.0.iter().find(|id| !supported.contains(id)) {
            Some(id) => Err(SectionOrderError::Unsupported { section: *id, kind }),
            None => Ok(()),
        }
    }

    /// Shows a hidden section (appended at the end) or hides a visible one.
    pub fn toggle(&self, id: SectionId) -> SectionOrder {
        let mut ids = self.0.clone();
        match ids.iter().position(|s| *s == id) {
            Some(pos) => {
                ids.remove(pos);
            }
            None => ids.push(id),
        }
        SectionOrder(ids)
    }
}

impl TryFrom<Vec<SectionId>> for SectionOrder {
    type Error = SectionOrderError;

    fn try_from(ids: Vec<SectionId>) -> Result<Self, Self::Error> {
        SectionOrder::new(ids)
    }
}

impl From<SectionOrder> for Vec<SectionId> {
    fn from(order: SectionOrder) -> Self {
        order.0
    }
}

/// Moves `from` into the slot currently held by `to`, shifting the sections in
/// between by one. Moving a section onto itself returns the order unchanged.
pub fn move_section(
    order: &SectionOrder,
    from: SectionId,
    to: SectionId,
) -> Result<SectionOrder, SectionOrderError> {
    let old_index = order
        .position(from)
        .ok_or(SectionOrderError::NotPresent(from))?;
    let new_index = order.position(to).ok_or(SectionOrderError::NotPresent(to))?;

    let mut ids = order.0.clone();
    if old_index != new_index {
        let moved = ids.remove(old_index);
        ids.insert(new_index, moved);
    }
    Ok(SectionOrder(ids))
}

#[cfg(test)]
mod tests {
    use super::*;
    use SectionId::*;

    fn make_order(ids: &[SectionId]) -> SectionOrder {
        SectionOrder::new(ids.to_vec()).unwrap()
    }

    #[test]
    fn test_duplicates_rejected() {
        let err = SectionOrder::new(vec![Summary, Skills, Summary]).unwrap_err();
        assert_eq!(err, SectionOrderError::Duplicate(Summary));
    }

    #[test]
    fn test_duplicates_rejected_on_deserialize() {
        let result: Result<SectionOrder, _> =
            serde_json::from_str(r#"["skills","skills"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_default_orders() {
        assert_eq!(
            SectionOrder::default_for(DocumentKind::Resume).ids(),
            &[Summary, Experience, Education, Skills]
        );
        assert_eq!(
            SectionOrder::default_for(DocumentKind::Cv).ids(),
            &[Summary, Education, Publications, Experience, Awards, Skills]
        );
        assert!(SectionOrder::default_for(DocumentKind::CoverLetter)
            .ids()
            .is_empty());
    }

    #[test]
    fn test_resume_cannot_show_publications() {
        let order = make_order(&[Summary, Publications]);
        assert_eq!(
            order.check_supported(DocumentKind::Resume),
            Err(SectionOrderError::Unsupported {
                section: Publications,
                kind: DocumentKind::Resume
            })
        );
        assert!(order.check_supported(DocumentKind::Cv).is_ok());
    }

    // ── move_section ──

    #[test]
    fn test_move_forward() {
        let order = make_order(&[Summary, Experience, Education, Skills]);
        let moved = move_section(&order, Summary, Education).unwrap();
        assert_eq!(moved.ids(), &[Experience, Education, Summary, Skills]);
    }

    #[test]
    fn test_move_backward() {
        let order = make_order(&[Summary, Experience, Education, Skills]);
        let moved = move_section(&order, Skills, Experience).unwrap();
        assert_eq!(moved.ids(), &[Summary, Skills, Experience, Education]);
    }

    #[test]
    fn test_move_onto_self_is_identity() {
        let order = make_order(&[Summary, Experience]);
        assert_eq!(move_section(&order, Experience, Experience).unwrap(), order);
    }

    #[test]
    fn test_move_does_not_mutate_input() {
        let order = make_order(&[Summary, Experience]);
        let _ = move_section(&order, Summary, Experience).unwrap();
        assert_eq!(order.ids(), &[Summary, Experience]);
    }

    #[test]
    fn test_move_unknown_section() {
        let order = make_order(&[Summary, Experience]);
        assert_eq!(
            move_section(&order, Skills, Summary),
            Err(SectionOrderError::NotPresent(Skills))
        );
        assert_eq!(
            move_section(&order, Summary, Awards),
            Err(SectionOrderError::NotPresent(Awards))
        );
    }

    // ── toggle ──

    #[test]
    fn test_toggle_hides_then_shows_at_end() {
        let order = make_order(&[Summary, Experience, Skills]);
        let hidden = order.toggle(Experience);
        assert_eq!(hidden.ids(), &[Summary, Skills]);
        let shown = hidden.toggle(Experience);
        assert_eq!(shown.ids(), &[Summary, Skills, Experience]);
    }
}
