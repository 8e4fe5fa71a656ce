use axum::{
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::assist::import::{import_text, ImportMode};
use crate::assist::polish::{polish, PolishOutcome};
use crate::assist::rewrite::{rewrite, RewriteOutcome};
use crate::assist::{AssistError, TextTarget};
use crate::errors::AppError;
use crate::models::content::ContentDocument;
use crate::scoring::ScoreReport;
use crate::session::handlers::find_session;
use crate::state::AppState;

pub const CLIENT_ID_HEADER: &str = "x-client-id";

/// Caller identity for credential lookup.
fn client_id(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get(CLIENT_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::Validation(format!("missing {CLIENT_ID_HEADER} header")))
}

/// Stored credential for the caller. A request without a client id simply has
/// no credential.
async fn credential_for(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<String>, AppError> {
    let Ok(client) = client_id(headers) else {
        return Ok(None);
    };
    Ok(state.credentials.get(&client).await?)
}

#[derive(Serialize)]
pub struct AssistResponse<T> {
    pub outcome: T,
    pub score: ScoreReport,
}

#[derive(Serialize)]
pub struct ImportResponse {
    pub content: ContentDocument,
    pub score: ScoreReport,
}

#[derive(Deserialize)]
pub struct ImportTextRequest {
    pub text: String,
    #[serde(default)]
    pub mode: ImportMode,
}

#[derive(Deserialize)]
pub struct PutCredentialRequest {
    pub api_key: String,
}

#[derive(Serialize)]
pub struct CredentialStatus {
    pub stored: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Writing assistance
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/documents/:id/assist/rewrite
/// The generated text is written back only when the whole call succeeds and the
/// rewritten text has not been edited in the meantime.
pub async fn handle_rewrite(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(target): Json<TextTarget>,
) -> Result<Json<AssistResponse<RewriteOutcome>>, AppError> {
    let credential = credential_for(&state, &headers).await?;
    let shared = find_session(&state, id).await?;

    // Work on a snapshot so the session is not locked across the network call.
    let content = shared.lock().await.content().clone();
    let outcome = rewrite(
        state.generator.as_ref(),
        credential.as_deref(),
        &content,
        target,
    )
    .await?;

    let mut session = shared.lock().await;
    if outcome.changed {
        // The text was edited while the model was working; keep the user's version.
        if target.read(session.content()) != Some(outcome.original.as_str()) {
            warn!(
                document_id = %id,
                part = target.label(),
                "rewrite discarded after concurrent edit"
            );
            return Err(AppError::EditConflict(format!(
                "the {} changed while it was being rewritten; retry on the new text",
                target.label()
            )));
        }
        session.apply_edits(vec![target.edit(outcome.rewritten.clone())])?;
    }
    Ok(Json(AssistResponse {
        score: session.score(&state.policy),
        outcome,
    }))
}

/// POST /api/v1/documents/:id/assist/polish
/// Offline; needs no credential.
pub async fn handle_polish(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(target): Json<TextTarget>,
) -> Result<Json<AssistResponse<PolishOutcome>>, AppError> {
    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;
    let outcome = polish(session.content(), target)?;
    if outcome.changed {
        session.apply_edits(vec![target.edit(outcome.polished.clone())])?;
    }
    Ok(Json(AssistResponse {
        score: session.score(&state.policy),
        outcome,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Import
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/documents/:id/import/text
pub async fn handle_import_text(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<ImportTextRequest>,
) -> Result<Json<ImportResponse>, AppError> {
    let shared = find_session(&state, id).await?;
    let credential = match req.mode {
        ImportMode::Ai => credential_for(&state, &headers).await?,
        ImportMode::Heuristic => None,
    };
    let profile = import_text(
        req.mode,
        state.generator.as_ref(),
        credential.as_deref(),
        &req.text,
    )
    .await?;

    let mut session = shared.lock().await;
    session.replace_profile(profile)?;
    info!(document_id = %id, mode = ?req.mode, "content imported from text");
    Ok(Json(ImportResponse {
        content: session.content().clone(),
        score: session.score(&state.policy),
    }))
}

/// POST /api/v1/documents/:id/import/pdf
/// Multipart upload; the first file field is read as a PDF and imported
/// heuristically.
pub async fn handle_import_pdf(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, AppError> {
    let shared = find_session(&state, id).await?;

    let mut upload: Option<Bytes> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed upload: {e}")))?
    {
        if field.file_name().is_some() || field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("malformed upload: {e}")))?;
            upload = Some(bytes);
            break;
        }
    }
    let bytes = upload.ok_or_else(|| AppError::Validation("no file in upload".to_string()))?;
    let size = bytes.len();

    let extractor = state.extractor.clone();
    let text = tokio::task::spawn_blocking(move || extractor.extract(bytes))
        .await
        .map_err(|e| {
            // pdf parsing can panic on hostile input; report it as unreadable
            error!(document_id = %id, "PDF extraction task failed: {e}");
            AssistError::Unreadable("the file could not be parsed".to_string())
        })??;

    let profile =
        import_text(ImportMode::Heuristic, state.generator.as_ref(), None, &text).await?;

    let mut session = shared.lock().await;
    session.replace_profile(profile)?;
    info!(document_id = %id, bytes = size, "content imported from PDF");
    Ok(Json(ImportResponse {
        content: session.content().clone(),
        score: session.score(&state.policy),
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Credentials
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/credentials
/// Reports whether a credential is stored; never returns the key itself.
pub async fn handle_get_credential(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CredentialStatus>, AppError> {
    let client = client_id(&headers)?;
    let stored = state
        .credentials
        .get(&client)
        .await?
        .is_some_and(|k| !k.trim().is_empty());
    Ok(Json(CredentialStatus { stored }))
}

/// PUT /api/v1/credentials
pub async fn handle_put_credential(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<PutCredentialRequest>,
) -> Result<Json<CredentialStatus>, AppError> {
    let client = client_id(&headers)?;
    let api_key = req.api_key.trim();
    if api_key.is_empty() {
        return Err(AppError::Validation("api_key must not be empty".to_string()));
    }
    state.credentials.put(&client, api_key).await?;
    Ok(Json(CredentialStatus { stored: true }))
}

/// DELETE /api/v1/credentials
pub async fn handle_delete_credential(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let client = client_id(&headers)?;
    if state.credentials.delete(&client).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("no credential stored for this client".to_string()))
    }
}
