//! Assistant chat endpoint.
//!
//! `POST /api/v1/assistant/chat` takes `{message, conversationHistory?}` and
//! always answers with the dispatcher's response envelope. The only
//! transport-level rejection is a 400 for a missing/blank message, issued
//! before any generation call; degraded generation still returns 200 with a
//! `success: false` envelope.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use sokoni_agent::Dispatcher;
use sokoni_core::{ChatRequest, InterfaceError, ResponseEnvelope};

#[derive(Clone)]
pub struct ChatState {
    dispatcher: Arc<Dispatcher>,
}

#[derive(Debug, Serialize)]
pub struct RejectionBody {
    pub success: bool,
    pub error: String,
    #[serde(rename = "correlationId")]
    pub correlation_id: String,
}

pub fn router(dispatcher: Arc<Dispatcher>) -> Router {
    Router::new()
        .route("/api/v1/assistant/chat", post(chat))
        .with_state(ChatState { dispatcher })
}

pub async fn chat(
    State(state): State<ChatState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ResponseEnvelope>, (StatusCode, Json<RejectionBody>)> {
    let correlation_id = Uuid::new_v4().to_string();

    if request.message.trim().is_empty() {
        let error = InterfaceError::bad_request("message must not be empty", &correlation_id);
        info!(
            event_name = "server.chat.rejected",
            correlation_id = %correlation_id,
            reason = "empty_message",
            "rejecting chat request before dispatch"
        );
        return Err((
            StatusCode::BAD_REQUEST,
            Json(RejectionBody {
                success: false,
                error: error.user_message().to_string(),
                correlation_id,
            }),
        ));
    }

    info!(
        event_name = "server.chat.received",
        correlation_id = %correlation_id,
        history_turns = request.conversation_history.len(),
        "dispatching chat request"
    );

    let envelope =
        state.dispatcher.dispatch(&request.message, &request.conversation_history).await;

    info!(
        event_name = "server.chat.answered",
        correlation_id = %correlation_id,
        success = envelope.success,
        intent = envelope.intent.as_str(),
        response_type = envelope.response_type.as_deref().unwrap_or("unknown"),
        "chat request completed"
    );

    Ok(Json(envelope))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::util::ServiceExt;

    use sokoni_agent::{
        ConversationHandler, Dispatcher, FallbackExecutor, GenerationBackend, IntentClassifier,
        RetryPolicy, ToolRegistry,
    };
    use sokoni_core::GenerationError;

    use super::router;

    struct CountingBackend {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl GenerationBackend for CountingBackend {
        fn id(&self) -> &str {
            "counting"
        }

        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if prompt.contains("intent classifier") {
                Ok(r#"{"intent": "conversation", "confidence": 0.9}"#.to_string())
            } else {
                Ok("karibu sana!".to_string())
            }
        }
    }

    fn test_router(calls: Arc<AtomicUsize>) -> axum::Router {
        let backend = Arc::new(CountingBackend { calls });
        let executor = Arc::new(FallbackExecutor::new(vec![backend], RetryPolicy::default()));
        let dispatcher = Arc::new(Dispatcher::new(
            IntentClassifier::new(executor.clone()),
            ConversationHandler::new(executor),
            Arc::new(ToolRegistry::default()),
        ));
        router(dispatcher)
    }

    fn chat_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/assistant/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request should build")
    }

    #[tokio::test]
    async fn empty_message_is_rejected_before_any_backend_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = test_router(calls.clone());

        let response = app
            .oneshot(chat_request(r#"{"message": "  "}"#))
            .await
            .expect("router should respond");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let body = response.into_body().collect().await.expect("body").to_bytes();
        let payload: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(payload["success"], false);
        assert!(payload["correlationId"].is_string());
    }

    #[tokio::test]
    async fn valid_message_returns_envelope_with_stamped_intent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = test_router(calls.clone());

        let response = app
            .oneshot(chat_request(r#"{"message": "hello sokoni"}"#))
            .await
            .expect("router should respond");

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.expect("body").to_bytes();
        let payload: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(payload["success"], true);
        assert_eq!(payload["content"], "karibu sana!");
        assert_eq!(payload["intent"], "conversation");
        assert_eq!(payload["type"], "conversation");
        // Classification call plus one conversation call.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn history_is_accepted_in_camel_case() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = test_router(calls);

        let response = app
            .oneshot(chat_request(
                r#"{
                    "message": "and the second one?",
                    "conversationHistory": [
                        {"role": "user", "content": "first question"},
                        {"role": "assistant", "content": "first answer"}
                    ]
                }"#,
            ))
            .await
            .expect("router should respond");

        assert_eq!(response.status(), StatusCode::OK);
    }
}
