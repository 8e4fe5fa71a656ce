//! Document sessions: one editable document with its order, design and,
//! once rendered, its painted surface.
//!
//! Every mutation goes through `DocumentSession`. After the first render the
//! surface is repainted on each change, so exports always match the current
//! content.

pub mod guard;
pub mod handlers;
pub mod store;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::compose::{compose, RenderTree};
use crate::design::{resolve_design, DesignRegistry, ResolvedStyle};
use crate::export::ExportError;
use crate::models::content::{
    ContentDocument, ContentEdit, DocumentKind, EditError, ProfileContent,
};
use crate::models::design::{DesignConfiguration, DesignInput};
use crate::models::section::{move_section, SectionId, SectionOrder, SectionOrderError};
use crate::render::{Canvas, Surface};
use crate::scoring::{report, ScoreReport, ScoringPolicy};

pub use guard::{ExportGuard, ExportSlot};
pub use store::{spawn_reaper, SessionStore, SharedSession};

struct Rendered {
    canvas: Canvas,
    surface: Surface,
}

pub struct DocumentSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    content: ContentDocument,
    order: SectionOrder,
    design: DesignConfiguration,
    style: ResolvedStyle,
    rendered: Option<Rendered>,
    exports: ExportSlot,
}

/// Read-only view of a session returned to clients.
#[derive(Debug, Serialize)]
pub struct DocumentSnapshot {
    pub id: Uuid,
    pub kind: DocumentKind,
    pub created_at: DateTime<Utc>,
    pub content: ContentDocument,
    pub order: SectionOrder,
    pub design: DesignConfiguration,
    pub style: ResolvedStyle,
    pub score: ScoreReport,
    pub rendered: bool,
}

impl DocumentSession {
    /// A blank document. Cover letters are dated today.
    pub fn new(kind: DocumentKind, design: DesignInput, registry: &DesignRegistry) -> Self {
        let mut content = ContentDocument::new(kind);
        if let Some(letter) = content.letter_mut() {
            letter.date = Some(Utc::now().date_naive());
        }
        let design = design.into_configuration();
        let style = resolve_design(registry, DesignInput::Full(design.clone()));
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            content,
            order: SectionOrder::default_for(kind),
            design,
            style,
            rendered: None,
            exports: ExportSlot::default(),
        }
    }

    pub fn kind(&self) -> DocumentKind {
        self.content.kind()
    }

    pub fn content(&self) -> &ContentDocument {
        &self.content
    }

    pub fn order(&self) -> &SectionOrder {
        &self.order
    }

    pub fn style(&self) -> &ResolvedStyle {
        &self.style
    }

    pub fn is_rendered(&self) -> bool {
        self.rendered.is_some()
    }

    pub fn export_slot(&self) -> ExportSlot {
        self.exports.clone()
    }

    // ── content ──

    /// Applies `edits` as one batch: if any edit fails, none are kept.
    pub fn apply_edits(&mut self, edits: Vec<ContentEdit>) -> Result<(), EditError> {
        let mut staged = self.content.clone();
        for edit in edits {
            staged.apply_edit(edit)?;
        }
        self.content = staged;
        self.refresh();
        Ok(())
    }

    /// Swaps in imported profile content. Only resumes and CVs accept it.
    pub fn replace_profile(&mut self, profile: ProfileContent) -> Result<(), EditError> {
        let kind = self.kind();
        let target = self
            .content
            .profile_mut()
            .ok_or(EditError::NotApplicable { op: "import", kind })?;
        *target = profile;
        self.refresh();
        Ok(())
    }

    // ── design ──

    pub fn set_design(&mut self, input: DesignInput, registry: &DesignRegistry) {
        self.design = input.into_configuration();
        self.style = resolve_design(registry, DesignInput::Full(self.design.clone()));
        self.refresh();
    }

    // ── sections ──

    pub fn set_order(&mut self, order: SectionOrder) -> Result<(), SectionOrderError> {
        order.check_supported(self.kind())?;
        self.order = order;
        self.refresh();
        Ok(())
    }

    pub fn move_section(
        &mut self,
        from: SectionId,
        to: SectionId,
    ) -> Result<(), SectionOrderError> {
        self.order = move_section(&self.order, from, to)?;
        self.refresh();
        Ok(())
    }

    /// Shows a hidden section or hides a visible one.
    pub fn toggle_section(&mut self, id: SectionId) -> Result<(), SectionOrderError> {
        let kind = self.kind();
        if !kind.supported_sections().contains(&id) {
            return Err(SectionOrderError::Unsupported { section: id, kind });
        }
        self.order = self.order.toggle(id);
        self.refresh();
        Ok(())
    }

    // ── derived views ──

    pub fn tree(&self) -> RenderTree {
        compose(&self.content, &self.style, &self.order)
    }

    pub fn score(&self, policy: &ScoringPolicy) -> ScoreReport {
        report(&self.content, policy)
    }

    /// Paints the current tree onto `canvas` and keeps the result for export.
    pub fn render(&mut self, canvas: Canvas) -> &Surface {
        let surface = canvas.paint(&self.tree());
        &self
            .rendered
            .insert(Rendered { canvas, surface })
            .surface
    }

    pub fn surface(&self) -> Result<&Surface, ExportError> {
        self.rendered
            .as_ref()
            .map(|r| &r.surface)
            .ok_or(ExportError::RenderNotReady)
    }

    /// Owned copies of the surface and the canvas it was painted on, so an
    /// export can run without holding the session.
    pub fn export_source(&self) -> Result<(Surface, Canvas), ExportError> {
        self.rendered
            .as_ref()
            .map(|r| (r.surface.clone(), r.canvas.clone()))
            .ok_or(ExportError::RenderNotReady)
    }

    pub fn snapshot(&self, policy: &ScoringPolicy) -> DocumentSnapshot {
        DocumentSnapshot {
            id: self.id,
            kind: self.kind(),
            created_at: self.created_at,
            content: self.content.clone(),
            order: self.order.clone(),
            design: self.design.clone(),
            style: self.style.clone(),
            score: self.score(policy),
            rendered: self.is_rendered(),
        }
    }

    /// Repaints after a mutation, if the document has been rendered before.
    fn refresh(&mut self) {
        let Some(rendered) = self.rendered.as_mut() else {
            return;
        };
        let tree = compose(&self.content, &self.style, &self.order);
        rendered.surface = rendered.canvas.paint(&tree);
        debug!(
            document_id = %self.id,
            height = rendered.surface.height,
            "surface repainted"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::content::PersonalField;
    use crate::models::design::LayoutKind;
    use crate::render::fonts::FontLibrary;
    use crate::render::Paper;

    fn make_session(kind: DocumentKind) -> DocumentSession {
        DocumentSession::new(kind, DesignInput::default(), &DesignRegistry::builtin())
    }

    fn make_canvas() -> Canvas {
        Canvas::new(Arc::new(FontLibrary::load().unwrap()), Paper::A4)
    }

    fn set_name(value: &str) -> ContentEdit {
        ContentEdit::SetPersonal {
            field: PersonalField::FullName,
            value: value.to_string(),
        }
    }

    #[test]
    fn test_new_session_defaults() {
        let session = make_session(DocumentKind::Resume);
        assert_eq!(session.order(), &SectionOrder::default_for(DocumentKind::Resume));
        assert_eq!(session.style().layout, LayoutKind::SingleColumnModern);
        assert!(!session.is_rendered());
    }

    #[test]
    fn test_letter_is_dated_on_creation() {
        let session = make_session(DocumentKind::CoverLetter);
        assert!(session.content().letter().unwrap().date.is_some());
    }

    #[test]
    fn test_export_before_render_is_not_ready() {
        let session = make_session(DocumentKind::Resume);
        assert!(matches!(session.surface(), Err(ExportError::RenderNotReady)));
    }

    #[test]
    fn test_failed_batch_keeps_content() {
        let mut session = make_session(DocumentKind::Resume);
        let err = session
            .apply_edits(vec![
                set_name("Jane"),
                ContentEdit::RemoveEntry {
                    list: crate::models::content::EntryList::Experience,
                    index: 3,
                },
            ])
            .unwrap_err();
        assert!(matches!(err, EditError::IndexOutOfRange { .. }));
        assert_eq!(session.content().author_name(), "");
    }

    #[test]
    fn test_mutation_after_render_repaints() {
        let mut session = make_session(DocumentKind::Resume);
        session.render(make_canvas());
        assert!(!session.surface().unwrap().text_runs().any(|t| t.contains("Jane")));

        session.apply_edits(vec![set_name("Jane Doe")]).unwrap();
        let surface = session.surface().unwrap();
        assert!(surface.text_runs().any(|t| t.contains("Jane Doe")));
    }

    #[test]
    fn test_toggle_rejects_cv_only_section_on_resume() {
        let mut session = make_session(DocumentKind::Resume);
        let err = session.toggle_section(SectionId::Awards).unwrap_err();
        assert!(matches!(err, SectionOrderError::Unsupported { .. }));

        session.toggle_section(SectionId::Skills).unwrap();
        assert!(!session.order().contains(SectionId::Skills));
        session.toggle_section(SectionId::Skills).unwrap();
        assert_eq!(session.order().ids().last(), Some(&SectionId::Skills));
    }

    #[test]
    fn test_set_design_resolves_legacy_name() {
        let mut session = make_session(DocumentKind::Cv);
        session.set_design(
            DesignInput::LegacyLayoutName("modern".into()),
            &DesignRegistry::builtin(),
        );
        assert_eq!(session.style().layout, LayoutKind::SidebarLeft);
    }

    #[test]
    fn test_import_into_letter_is_refused() {
        let mut session = make_session(DocumentKind::CoverLetter);
        let err = session.replace_profile(ProfileContent::default()).unwrap_err();
        assert!(matches!(err, EditError::NotApplicable { .. }));
    }
}
