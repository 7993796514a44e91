//! Router setup and server startup.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use rota_core::error::RotaError;

use crate::handlers;
use crate::state::AppState;

/// Create the axum router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/chat", post(handlers::chat))
        .route("/status", get(handlers::status))
        .route("/speech", post(handlers::speech))
        .route(
            "/cases",
            get(handlers::list_cases).post(handlers::create_case),
        )
        .route(
            "/cases/{id}",
            get(handlers::get_case)
                .put(handlers::update_case)
                .delete(handlers::delete_case),
        )
        .layer(TraceLayer::new_for_http())
        // Ward dashboards are served from other hosts on the trust network.
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve on the given port until the process exits.
pub async fn start_server(port: u16, state: AppState) -> Result<(), RotaError> {
    let addr = format!("0.0.0.0:{}", port);
    let router = create_router(state);

    tracing::info!("starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| RotaError::Api(format!("failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| RotaError::Api(format!("server error: {}", e)))?;

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::util::ServiceExt;

    use rota_chat::{
        AuditSink, ChatError, DeploymentInfo, GenerativeClient, Orchestrator, SpeechClient,
        TracingAuditSink, VoiceInfo,
    };
    use rota_core::types::AuditRecord;
    use rota_epr::ManualEntryAdapter;

    struct StubGenerative;

    #[async_trait]
    impl GenerativeClient for StubGenerative {
        fn is_ready(&self) -> bool {
            true
        }

        fn deployment_info(&self) -> DeploymentInfo {
            DeploymentInfo {
                configured: true,
                deployment: "stub".to_string(),
            }
        }

        async fn generate(
            &self,
            _system_prompt: &str,
            _context: &str,
            _user_message: &str,
        ) -> Result<String, ChatError> {
            Ok("stub answer".to_string())
        }
    }

    struct StubSpeech {
        audio: Option<Vec<u8>>,
    }

    #[async_trait]
    impl SpeechClient for StubSpeech {
        fn is_ready(&self) -> bool {
            self.audio.is_some()
        }

        fn voice_info(&self) -> VoiceInfo {
            VoiceInfo {
                configured: self.audio.is_some(),
                voice: "stub-voice".to_string(),
            }
        }

        async fn synthesize(&self, _text: &str) -> Option<Vec<u8>> {
            self.audio.clone()
        }
    }

    /// Counting sink proving the chat route reaches the pipeline.
    #[derive(Default)]
    struct CountingAudit {
        count: std::sync::atomic::AtomicUsize,
    }

    #[async_trait]
    impl AuditSink for CountingAudit {
        async fn record(&self, _record: &AuditRecord) -> Result<(), ChatError> {
            self.count
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(())
        }
    }

    fn test_state(speech_audio: Option<Vec<u8>>) -> AppState {
        let adapter = Arc::new(ManualEntryAdapter::new());
        let orchestrator = Arc::new(Orchestrator::new(
            adapter.clone(),
            Arc::new(StubGenerative),
            Arc::new(StubSpeech {
                audio: speech_audio,
            }),
            Arc::new(TracingAuditSink),
        ));
        AppState::new(orchestrator, adapter)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    // ---- /health ----

    #[tokio::test]
    async fn test_health_ok() {
        let router = create_router(test_state(None));
        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
    }

    // ---- /chat ----

    #[tokio::test]
    async fn test_chat_returns_assistant_message() {
        let router = create_router(test_state(None));
        let response = router
            .oneshot(json_request(
                "POST",
                "/chat",
                serde_json::json!({"message": "what's on today", "user_id": "u1"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "stub answer");
        assert_eq!(json["user_id"], "u1");
        assert!(json["context"].is_string());
    }

    #[tokio::test]
    async fn test_chat_blank_message_is_400_before_pipeline() {
        let adapter = Arc::new(ManualEntryAdapter::new());
        let audit = Arc::new(CountingAudit::default());
        let orchestrator = Arc::new(Orchestrator::new(
            adapter.clone(),
            Arc::new(StubGenerative),
            Arc::new(StubSpeech { audio: None }),
            audit.clone(),
        ));
        let router = create_router(AppState::new(orchestrator, adapter));

        for body in [
            serde_json::json!({"message": ""}),
            serde_json::json!({"message": "   "}),
            serde_json::json!({}),
        ] {
            let response = router
                .clone()
                .oneshot(json_request("POST", "/chat", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let json = body_json(response).await;
            assert_eq!(json["error"], "bad_request");
        }

        // The orchestrator never ran, so no audit records exist.
        assert_eq!(audit.count.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    // ---- /status ----

    #[tokio::test]
    async fn test_status_reports_collaborators() {
        let router = create_router(test_state(None));
        let response = router
            .oneshot(Request::get("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["store"]["system"], "manual");
        assert_eq!(json["store"]["healthy"], true);
        assert_eq!(json["generative"]["configured"], true);
        assert_eq!(json["speech"]["configured"], false);
    }

    // ---- /speech ----

    #[tokio::test]
    async fn test_speech_returns_audio_bytes() {
        let router = create_router(test_state(Some(vec![7, 7, 7])));
        let response = router
            .oneshot(json_request(
                "POST",
                "/speech",
                serde_json::json!({"text": "hello"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "audio/mpeg"
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(bytes.as_ref(), &[7, 7, 7]);
    }

    #[tokio::test]
    async fn test_speech_unavailable_is_503() {
        let router = create_router(test_state(None));
        let response = router
            .oneshot(json_request(
                "POST",
                "/speech",
                serde_json::json!({"text": "hello"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(json["error"], "service_unavailable");
    }

    #[tokio::test]
    async fn test_speech_blank_text_is_400() {
        let router = create_router(test_state(Some(vec![1])));
        let response = router
            .oneshot(json_request(
                "POST",
                "/speech",
                serde_json::json!({"text": ""}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // ---- /cases ----

    #[tokio::test]
    async fn test_cases_crud_roundtrip() {
        let router = create_router(test_state(None));

        // Create.
        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/cases",
                serde_json::json!({
                    "procedure": "Appendectomy",
                    "surgeon": "Smith",
                    "theatre": "3"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        let id = created["id"].as_str().unwrap().to_string();
        assert!(id.starts_with("manual_"));
        assert_eq!(created["procedure"], "Appendectomy");

        // Read back.
        let response = router
            .clone()
            .oneshot(
                Request::get(format!("/cases/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Update.
        let response = router
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/cases/{}", id),
                serde_json::json!({"surgeon": "Patel"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated = body_json(response).await;
        assert_eq!(updated["surgeon"], "Patel");

        // List.
        let response = router
            .clone()
            .oneshot(Request::get("/cases").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let listed = body_json(response).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);

        // Delete.
        let response = router
            .clone()
            .oneshot(
                Request::delete(format!("/cases/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        // Gone.
        let response = router
            .oneshot(
                Request::get(format!("/cases/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_missing_case_is_404() {
        let router = create_router(test_state(None));
        let response = router
            .oneshot(json_request(
                "PUT",
                "/cases/ghost",
                serde_json::json!({"surgeon": "Patel"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"], "not_found");
    }

    #[tokio::test]
    async fn test_delete_missing_case_is_404() {
        let router = create_router(test_state(None));
        let response = router
            .oneshot(
                Request::delete("/cases/ghost")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cases_bad_day_filter_is_400() {
        let router = create_router(test_state(None));
        let response = router
            .oneshot(
                Request::get("/cases?day=yesterday")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
