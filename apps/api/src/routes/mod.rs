pub mod health;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::assist::handlers as assist;
use crate::design::handlers as designs;
use crate::export::handlers as export;
use crate::session::handlers as documents;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Design registry
        .route("/api/v1/designs", get(designs::handle_list))
        .route("/api/v1/designs/gallery", get(designs::handle_gallery))
        .route("/api/v1/designs/resolve", post(designs::handle_resolve))
        // Documents
        .route("/api/v1/documents", post(documents::handle_create))
        .route(
            "/api/v1/documents/:id",
            get(documents::handle_get).delete(documents::handle_delete),
        )
        .route(
            "/api/v1/documents/:id/content",
            patch(documents::handle_edit_content),
        )
        .route(
            "/api/v1/documents/:id/design",
            put(documents::handle_set_design),
        )
        .route(
            "/api/v1/documents/:id/sections",
            put(documents::handle_replace_sections),
        )
        .route(
            "/api/v1/documents/:id/sections/move",
            post(documents::handle_move_section),
        )
        .route(
            "/api/v1/documents/:id/sections/toggle",
            post(documents::handle_toggle_section),
        )
        .route("/api/v1/documents/:id/score", get(documents::handle_score))
        .route("/api/v1/documents/:id/tree", get(documents::handle_tree))
        .route("/api/v1/documents/:id/render", post(documents::handle_render))
        // Export
        .route(
            "/api/v1/documents/:id/export/pdf",
            get(export::handle_export_pdf),
        )
        .route(
            "/api/v1/documents/:id/export/image",
            get(export::handle_export_image),
        )
        .route(
            "/api/v1/documents/:id/export/text",
            get(export::handle_export_text),
        )
        // Writing assistance
        .route(
            "/api/v1/documents/:id/assist/rewrite",
            post(assist::handle_rewrite),
        )
        .route(
            "/api/v1/documents/:id/assist/polish",
            post(assist::handle_polish),
        )
        .route(
            "/api/v1/documents/:id/import/text",
            post(assist::handle_import_text),
        )
        .route(
            "/api/v1/documents/:id/import/pdf",
            post(assist::handle_import_pdf),
        )
        .route(
            "/api/v1/credentials",
            get(assist::handle_get_credential)
                .put(assist::handle_put_credential)
                .delete(assist::handle_delete_credential),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::assist::credentials::MemoryCredentialStore;
    use crate::assist::extract::PdfTextExtractor;
    use crate::assist::llm_client::testing::ScriptedGenerator;
    use crate::config::Config;
    use crate::design::DesignRegistry;
    use crate::render::fonts::FontLibrary;
    use crate::scoring::ScoringPolicy;
    use crate::session::SessionStore;

    fn make_state(generator: Arc<ScriptedGenerator>) -> AppState {
        AppState {
            config: Config::default(),
            registry: Arc::new(DesignRegistry::builtin()),
            policy: Arc::new(ScoringPolicy::default()),
            fonts: Arc::new(FontLibrary::load().unwrap()),
            sessions: Arc::new(SessionStore::new()),
            credentials: Arc::new(MemoryCredentialStore::default()),
            generator,
            extractor: Arc::new(PdfTextExtractor),
        }
    }

    fn make_app() -> Router {
        build_router(make_state(Arc::new(ScriptedGenerator::replying("unused"))))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-client-id", "client-test");
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn create_document(app: &Router, kind: &str) -> String {
        let body = json!({ "kind": kind });
        let (status, body) = send(app, Method::POST, "/api/v1/documents", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    // ── plumbing ──

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&make_app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "folio-api");
    }

    #[tokio::test]
    async fn test_unknown_document_is_404() {
        let app = make_app();
        let uri = format!("/api/v1/documents/{}", uuid::Uuid::new_v4());
        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    // ── designs ──

    #[tokio::test]
    async fn test_resolve_accepts_legacy_layout_name() {
        let app = make_app();
        let (status, body) =
            send(&app, Method::POST, "/api/v1/designs/resolve", Some(json!("modern"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["layout"], "sidebar-left");
    }

    #[tokio::test]
    async fn test_gallery_lists_every_variation() {
        let app = make_app();
        let (_, body) = send(&app, Method::GET, "/api/v1/designs/gallery", None).await;
        let registry = DesignRegistry::builtin();
        assert_eq!(body["total"], registry.variations().len());
    }

    // ── documents ──

    #[tokio::test]
    async fn test_create_edit_and_read_back() {
        let app = make_app();
        let id = create_document(&app, "resume").await;

        let edits = json!({ "edits": [
            { "op": "set_personal", "field": "full_name", "value": "Jane Doe" },
            { "op": "set_skills", "value": "Rust, SQL" },
        ]});
        let uri = format!("/api/v1/documents/{id}/content");
        let (status, body) = send(&app, Method::PATCH, &uri, Some(edits)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["score"]["score"].as_u64().is_some());

        let uri = format!("/api/v1/documents/{id}");
        let (_, snapshot) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(snapshot["content"]["personal"]["full_name"], "Jane Doe");
        assert_eq!(snapshot["rendered"], false);
    }

    #[tokio::test]
    async fn test_duplicate_section_order_is_400() {
        let app = make_app();
        let id = create_document(&app, "resume").await;
        let uri = format!("/api/v1/documents/{id}/sections");
        let body = json!({ "sections": ["skills", "summary", "skills"] });
        let (status, body) = send(&app, Method::PUT, &uri, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_move_section() {
        let app = make_app();
        let id = create_document(&app, "resume").await;
        let uri = format!("/api/v1/documents/{id}/sections/move");
        let body = json!({ "from": "skills", "to": "summary" });
        let (status, body) = send(&app, Method::POST, &uri, Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["sections"],
            json!(["skills", "summary", "experience", "education"])
        );
    }

    #[tokio::test]
    async fn test_delete_discards_document() {
        let app = make_app();
        let id = create_document(&app, "cv").await;
        let uri = format!("/api/v1/documents/{id}");
        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    // ── export ──

    #[tokio::test]
    async fn test_export_before_render_is_409() {
        let app = make_app();
        let id = create_document(&app, "resume").await;
        let uri = format!("/api/v1/documents/{id}/export/pdf");
        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "RENDER_NOT_READY");
    }

    #[tokio::test]
    async fn test_render_then_export_pdf() {
        let app = make_app();
        let id = create_document(&app, "resume").await;
        let uri = format!("/api/v1/documents/{id}/render");
        let (status, body) = send(&app, Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pages"], 1);

        let request = Request::builder()
            .uri(format!("/api/v1/documents/{id}/export/pdf"))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"resume.pdf\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
    }

    #[tokio::test]
    async fn test_text_export_needs_no_render() {
        let app = make_app();
        let id = create_document(&app, "cover_letter").await;
        let request = Request::builder()
            .uri(format!("/api/v1/documents/{id}/export/text"))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"cover-letter.txt\""
        );
    }

    // ── assist ──

    async fn set_summary(app: &Router, id: &str, summary: &str) {
        let edits = json!({ "edits": [
            { "op": "set_personal", "field": "summary", "value": summary },
        ]});
        let uri = format!("/api/v1/documents/{id}/content");
        let (status, _) = send(app, Method::PATCH, &uri, Some(edits)).await;
        assert_eq!(status, StatusCode::OK);
    }

    async fn summary_of(app: &Router, id: &str) -> Value {
        let uri = format!("/api/v1/documents/{id}");
        let (_, snapshot) = send(app, Method::GET, &uri, None).await;
        snapshot["content"]["personal"]["summary"].clone()
    }

    #[tokio::test]
    async fn test_rewrite_without_credential_changes_nothing() {
        let generator = Arc::new(ScriptedGenerator::replying("Polished summary."));
        let app = build_router(make_state(generator.clone()));
        let id = create_document(&app, "resume").await;
        set_summary(&app, &id, "I did things.").await;

        let uri = format!("/api/v1/documents/{id}/assist/rewrite");
        let target = json!({ "target": "summary" });
        let (status, body) = send(&app, Method::POST, &uri, Some(target)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "MISSING_CREDENTIAL");
        assert_eq!(generator.calls(), 0);
        assert_eq!(summary_of(&app, &id).await, "I did things.");
    }

    #[tokio::test]
    async fn test_rewrite_with_stored_credential_applies_text() {
        let generator = Arc::new(ScriptedGenerator::replying("Delivered results."));
        let app = build_router(make_state(generator.clone()));
        let id = create_document(&app, "resume").await;
        set_summary(&app, &id, "I did things.").await;
        let key = json!({ "api_key": "sk-test" });
        let (status, _) = send(&app, Method::PUT, "/api/v1/credentials", Some(key)).await;
        assert_eq!(status, StatusCode::OK);

        let uri = format!("/api/v1/documents/{id}/assist/rewrite");
        let target = json!({ "target": "summary" });
        let (status, body) = send(&app, Method::POST, &uri, Some(target)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"]["rewritten"], "Delivered results.");
        assert_eq!(summary_of(&app, &id).await, "Delivered results.");
    }

    #[tokio::test]
    async fn test_rewrite_does_not_overwrite_concurrent_edit() {
        let generator = Arc::new(ScriptedGenerator::held("Delivered results."));
        let app = build_router(make_state(generator.clone()));
        let id = create_document(&app, "resume").await;
        set_summary(&app, &id, "I did things.").await;
        let key = json!({ "api_key": "sk-test" });
        send(&app, Method::PUT, "/api/v1/credentials", Some(key)).await;

        let rewrite = {
            let app = app.clone();
            let uri = format!("/api/v1/documents/{id}/assist/rewrite");
            tokio::spawn(async move {
                send(&app, Method::POST, &uri, Some(json!({ "target": "summary" }))).await
            })
        };
        while generator.calls() == 0 {
            tokio::task::yield_now().await;
        }

        // The user keeps typing while the model is working.
        set_summary(&app, &id, "I led the billing rewrite.").await;
        generator.release();

        let (status, body) = rewrite.await.unwrap();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "EDIT_CONFLICT");
        assert_eq!(summary_of(&app, &id).await, "I led the billing rewrite.");
    }

    #[tokio::test]
    async fn test_polish_works_offline() {
        let app = make_app();
        let id = create_document(&app, "resume").await;
        set_summary(&app, &id, "Worked on payments.").await;

        let uri = format!("/api/v1/documents/{id}/assist/polish");
        let target = json!({ "target": "summary" });
        let (status, _) = send(&app, Method::POST, &uri, Some(target)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary_of(&app, &id).await, "spearheaded payments.");
    }

    #[tokio::test]
    async fn test_import_text_too_short_is_422() {
        let app = make_app();
        let id = create_document(&app, "resume").await;
        let uri = format!("/api/v1/documents/{id}/import/text");
        let body = json!({ "text": "  hi  " });
        let (status, body) = send(&app, Method::POST, &uri, Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "TEXT_EMPTY");
    }

    #[tokio::test]
    async fn test_credentials_round_trip() {
        let app = make_app();
        let (_, body) = send(&app, Method::GET, "/api/v1/credentials", None).await;
        assert_eq!(body["stored"], false);
        let key = json!({ "api_key": "sk-x" });
        send(&app, Method::PUT, "/api/v1/credentials", Some(key)).await;
        let (_, body) = send(&app, Method::GET, "/api/v1/credentials", None).await;
        assert_eq!(body["stored"], true);
        let (status, _) = send(&app, Method::DELETE, "/api/v1/credentials", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
