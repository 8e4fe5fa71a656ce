use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::compose::RenderTree;
use crate::design::ResolvedStyle;
use crate::errors::AppError;
use crate::export::plan_pages;
use crate::models::content::{ContentDocument, ContentEdit, DocumentKind};
use crate::models::design::DesignInput;
use crate::models::section::{SectionId, SectionOrder};
use crate::scoring::ScoreReport;
use crate::session::{DocumentSession, DocumentSnapshot, SharedSession};
use crate::state::AppState;

/// Looks up an open document or fails with 404.
pub async fn find_session(state: &AppState, id: Uuid) -> Result<SharedSession, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("document {id} is not open")))
}

#[derive(Deserialize)]
pub struct CreateDocumentRequest {
    pub kind: DocumentKind,
    /// Either a bare layout name or a full `{layout, theme, font}` object.
    #[serde(default)]
    pub design: Option<DesignInput>,
}

#[derive(Deserialize)]
pub struct EditRequest {
    pub edits: Vec<ContentEdit>,
}

#[derive(Serialize)]
pub struct EditResponse {
    pub content: ContentDocument,
    pub score: ScoreReport,
}

#[derive(Deserialize)]
pub struct ReplaceSectionsRequest {
    pub sections: Vec<SectionId>,
}

#[derive(Deserialize)]
pub struct MoveSectionRequest {
    pub from: SectionId,
    pub to: SectionId,
}

#[derive(Deserialize)]
pub struct ToggleSectionRequest {
    pub section: SectionId,
}

#[derive(Serialize)]
pub struct SectionsResponse {
    pub sections: SectionOrder,
}

#[derive(Deserialize)]
pub struct ScoreQuery {
    /// Keep only the first `top` recommendations.
    pub top: Option<usize>,
}

#[derive(Serialize)]
pub struct RenderResponse {
    pub width: f32,
    pub height: f32,
    /// Pages a PDF export of this surface would have.
    pub pages: usize,
}

/// POST /api/v1/documents
pub async fn handle_create(
    State(state): State<AppState>,
    Json(req): Json<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<DocumentSnapshot>), AppError> {
    let session = DocumentSession::new(
        req.kind,
        req.design.unwrap_or_default(),
        &state.registry,
    );
    let snapshot = session.snapshot(&state.policy);
    state.sessions.insert(session).await;
    info!(document_id = %snapshot.id, kind = req.kind.key(), "document opened");
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// GET /api/v1/documents/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentSnapshot>, AppError> {
    let shared = find_session(&state, id).await?;
    let session = shared.lock().await;
    Ok(Json(session.snapshot(&state.policy)))
}

/// DELETE /api/v1/documents/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.sessions.remove(id).await {
        return Err(AppError::NotFound(format!("document {id} is not open")));
    }
    info!(document_id = %id, "document discarded");
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/documents/:id/content
/// Applies the edits as one batch and returns the new content and score.
pub async fn handle_edit_content(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<EditRequest>,
) -> Result<Json<EditResponse>, AppError> {
    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;
    session.apply_edits(req.edits)?;
    Ok(Json(EditResponse {
        content: session.content().clone(),
        score: session.score(&state.policy),
    }))
}

/// PUT /api/v1/documents/:id/design
pub async fn handle_set_design(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<DesignInput>,
) -> Result<Json<ResolvedStyle>, AppError> {
    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;
    session.set_design(input, &state.registry);
    Ok(Json(session.style().clone()))
}

/// PUT /api/v1/documents/:id/sections
pub async fn handle_replace_sections(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReplaceSectionsRequest>,
) -> Result<Json<SectionsResponse>, AppError> {
    let order = SectionOrder::new(req.sections)?;
    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;
    session.set_order(order)?;
    Ok(Json(SectionsResponse {
        sections: session.order().clone(),
    }))
}

/// POST /api/v1/documents/:id/sections/move
pub async fn handle_move_section(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<MoveSectionRequest>,
) -> Result<Json<SectionsResponse>, AppError> {
    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;
    session.move_section(req.from, req.to)?;
    Ok(Json(SectionsResponse {
        sections: session.order().clone(),
    }))
}

/// POST /api/v1/documents/:id/sections/toggle
pub async fn handle_toggle_section(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ToggleSectionRequest>,
) -> Result<Json<SectionsResponse>, AppError> {
    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;
    session.toggle_section(req.section)?;
    Ok(Json(SectionsResponse {
        sections: session.order().clone(),
    }))
}

/// GET /api/v1/documents/:id/score
pub async fn handle_score(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ScoreQuery>,
) -> Result<Json<ScoreReport>, AppError> {
    let shared = find_session(&state, id).await?;
    let session = shared.lock().await;
    Ok(Json(session.score(&state.policy).truncated(params.top)))
}

/// GET /api/v1/documents/:id/tree
pub async fn handle_tree(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RenderTree>, AppError> {
    let shared = find_session(&state, id).await?;
    let session = shared.lock().await;
    Ok(Json(session.tree()))
}

/// POST /api/v1/documents/:id/render
/// Paints the surface. From here on every mutation repaints it.
pub async fn handle_render(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RenderResponse>, AppError> {
    let canvas = state.canvas();
    let page_height = canvas.paper.height_px();
    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;
    let surface = session.render(canvas);
    let response = RenderResponse {
        width: surface.width,
        height: surface.height,
        pages: plan_pages(surface.height, page_height).len(),
    };
    info!(
        document_id = %id,
        height = response.height,
        pages = response.pages,
        "document rendered"
    );
    Ok(Json(response))
}
