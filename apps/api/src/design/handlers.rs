use axum::{extract::State, Json};
use serde::Serialize;

use crate::design::registry::{DesignVariation, FontPairing, Palette};
use crate::design::{resolve_design, ResolvedStyle};
use crate::errors::AppError;
use crate::models::design::{DesignInput, LayoutKind};
use crate::state::AppState;

#[derive(Serialize)]
pub struct LayoutEntry {
    pub key: &'static str,
    pub name: &'static str,
}

#[derive(Serialize)]
pub struct DesignListResponse {
    pub layouts: Vec<LayoutEntry>,
    pub palettes: Vec<Palette>,
    pub fonts: Vec<FontPairing>,
}

#[derive(Serialize)]
pub struct GalleryResponse {
    pub total: usize,
    pub variations: Vec<DesignVariation>,
}

/// GET /api/v1/designs
pub async fn handle_list(State(state): State<AppState>) -> Json<DesignListResponse> {
    let layouts = LayoutKind::ALL
        .iter()
        .map(|l| LayoutEntry {
            key: l.key(),
            name: l.display_name(),
        })
        .collect();
    Json(DesignListResponse {
        layouts,
        palettes: state.registry.palettes().to_vec(),
        fonts: state.registry.fonts().to_vec(),
    })
}

/// GET /api/v1/designs/gallery
pub async fn handle_gallery(State(state): State<AppState>) -> Json<GalleryResponse> {
    let variations = state.registry.variations();
    Json(GalleryResponse {
        total: variations.len(),
        variations,
    })
}

/// POST /api/v1/designs/resolve
/// Accepts a bare layout name or a `{layout, theme, font}` object; never fails
/// on unknown keys, which are reported under `fallbacks`.
pub async fn handle_resolve(
    State(state): State<AppState>,
    Json(input): Json<DesignInput>,
) -> Result<Json<ResolvedStyle>, AppError> {
    Ok(Json(resolve_design(&state.registry, input)))
}
