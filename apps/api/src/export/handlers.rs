use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::paginate::build_pdf;
use crate::export::raster::{capture, encode, ImageFormat};
use crate::export::text::{export_text, CONTENT_TYPE as TEXT_CONTENT_TYPE};
use crate::models::content::ContentDocument;
use crate::session::handlers::find_session;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ImageQuery {
    #[serde(default)]
    pub format: ImageFormat,
}

/// GET /api/v1/documents/:id/export/pdf
/// Captures the painted surface and slices it into paper-sized pages.
pub async fn handle_export_pdf(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let shared = find_session(&state, id).await?;
    let (surface, canvas, stem, _guard) = {
        let session = shared.lock().await;
        let (surface, canvas) = session.export_source()?;
        let guard = session.export_slot().try_acquire().ok_or_else(|| {
            warn!(document_id = %id, "export rejected: another export is running");
            AppError::ExportInProgress
        })?;
        (surface, canvas, filename_stem(session.content()), guard)
    };

    let img = capture(surface, canvas.fonts.clone(), state.config.export_scale).await?;
    let paper = canvas.paper;
    let pdf = tokio::task::spawn_blocking(move || build_pdf(&img, paper))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    info!(document_id = %id, pages = pdf.pages, bytes = pdf.bytes.len(), "PDF exported");
    Ok(attachment("application/pdf", &format!("{stem}.pdf"), pdf.bytes))
}

/// GET /api/v1/documents/:id/export/image?format=png|jpeg
pub async fn handle_export_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ImageQuery>,
) -> Result<Response, AppError> {
    let shared = find_session(&state, id).await?;
    let (surface, canvas, stem, _guard) = {
        let session = shared.lock().await;
        let (surface, canvas) = session.export_source()?;
        let guard = session.export_slot().try_acquire().ok_or_else(|| {
            warn!(document_id = %id, "export rejected: another export is running");
            AppError::ExportInProgress
        })?;
        (surface, canvas, filename_stem(session.content()), guard)
    };

    let format = params.format;
    let img = capture(surface, canvas.fonts.clone(), state.config.export_scale).await?;
    let bytes = tokio::task::spawn_blocking(move || encode(&img, format))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    info!(
        document_id = %id,
        format = format.extension(),
        bytes = bytes.len(),
        "image exported"
    );
    let filename = format!("{stem}.{}", format.extension());
    Ok(attachment(format.content_type(), &filename, bytes))
}

/// GET /api/v1/documents/:id/export/text
/// Works on unrendered documents too.
pub async fn handle_export_text(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let shared = find_session(&state, id).await?;
    let session = shared.lock().await;
    let text = export_text(session.content());
    let stem = filename_stem(session.content());
    Ok(attachment(TEXT_CONTENT_TYPE, &format!("{stem}.txt"), text.into_bytes()))
}

/// Download name: the author's name with spaces as underscores, or a
/// per-kind default while the name is blank.
pub fn filename_stem(content: &ContentDocument) -> String {
    let stem: String = content
        .author_name()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .collect();
    if stem.is_empty() {
        content.kind().fallback_filename().to_string()
    } else {
        stem
    }
}

fn attachment(content_type: &str, filename: &str, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}
