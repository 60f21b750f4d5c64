use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use sokoni_core::{ConversationTurn, IntentResult, ResponseEnvelope};

use crate::classifier::IntentClassifier;
use crate::handler::ConversationHandler;
use crate::tools::{ToolRegistry, ToolRequest};

/// A tool is only invoked when the classifier's confidence strictly exceeds
/// this threshold; at or below it, the message routes to plain conversation.
pub const TOOL_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Routing policy. Ties classifier, tool executors, and the generic handler
/// together, and owns the envelope metadata: every returned envelope carries
/// the classification's intent, confidence, and suggestion. Exactly one
/// generation path runs per request, and every branch terminates in a
/// [`ResponseEnvelope`].
pub struct Dispatcher {
    classifier: IntentClassifier,
    handler: ConversationHandler,
    tools: Arc<ToolRegistry>,
}

impl Dispatcher {
    pub fn new(
        classifier: IntentClassifier,
        handler: ConversationHandler,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        Self { classifier, handler, tools }
    }

    pub async fn dispatch(
        &self,
        message: &str,
        history: &[ConversationTurn],
    ) -> ResponseEnvelope {
        let correlation_id = Uuid::new_v4().to_string();
        let classification = self.classifier.classify(message).await;

        info!(
            event_name = "agent.dispatch.classified",
            correlation_id = %correlation_id,
            intent = classification.intent.as_str(),
            confidence = classification.confidence,
            "routing decision input"
        );

        // Modality redirects never issue a generation call.
        if let Some(redirect) = classification.intent.modality_redirect() {
            info!(
                event_name = "agent.dispatch.modality_redirect",
                correlation_id = %correlation_id,
                intent = classification.intent.as_str(),
                "returning capability description"
            );
            return ResponseEnvelope::success(redirect, "capability_info")
                .stamped(&classification);
        }

        if classification.intent.tool_eligible()
            && classification.confidence > TOOL_CONFIDENCE_THRESHOLD
        {
            return self.dispatch_tool(message, history, &classification, &correlation_id).await;
        }

        self.converse(message, history, &classification, classification.intent.as_str()).await
    }

    async fn dispatch_tool(
        &self,
        message: &str,
        history: &[ConversationTurn],
        classification: &IntentResult,
        correlation_id: &str,
    ) -> ResponseEnvelope {
        let intent = classification.intent;

        let Some(tool) = self.tools.for_intent(intent) else {
            // No executor registered for an eligible intent: treat like any
            // other tool failure and fall back to conversation.
            warn!(
                event_name = "agent.dispatch.tool_missing",
                correlation_id = %correlation_id,
                intent = intent.as_str(),
                "no tool registered for eligible intent"
            );
            return self.fallback(message, history, classification).await;
        };

        let request = ToolRequest::new(message, history.to_vec());
        match tool.execute(&request).await {
            Ok(outcome) if outcome.is_usable() => {
                info!(
                    event_name = "agent.dispatch.tool_success",
                    correlation_id = %correlation_id,
                    tool = tool.name(),
                    intent = intent.as_str(),
                    "tool produced content"
                );
                ResponseEnvelope::success(outcome.content, intent.as_str())
                    .with_tool(tool.name())
                    .stamped(classification)
            }
            Ok(outcome) => {
                warn!(
                    event_name = "agent.dispatch.tool_failed",
                    correlation_id = %correlation_id,
                    tool = tool.name(),
                    intent = intent.as_str(),
                    declared_success = outcome.success,
                    error = outcome.error.as_deref().unwrap_or("blank content"),
                    "tool result unusable; falling back to conversation"
                );
                self.fallback(message, history, classification).await
            }
            Err(error) => {
                warn!(
                    event_name = "agent.dispatch.tool_error",
                    correlation_id = %correlation_id,
                    tool = tool.name(),
                    intent = intent.as_str(),
                    error = %error,
                    "tool raised; falling back to conversation"
                );
                self.fallback(message, history, classification).await
            }
        }
    }

    /// Tool-failure fallback: the generic handler runs on the ORIGINAL user
    /// message, never any partial tool input, and the envelope type records
    /// the detour.
    async fn fallback(
        &self,
        message: &str,
        history: &[ConversationTurn],
        classification: &IntentResult,
    ) -> ResponseEnvelope {
        let fallback_type = format!("{}_fallback", classification.intent.as_str());
        self.converse(message, history, classification, &fallback_type).await
    }

    async fn converse(
        &self,
        message: &str,
        history: &[ConversationTurn],
        classification: &IntentResult,
        response_type: &str,
    ) -> ResponseEnvelope {
        let reply = self.handler.respond(message, history, None).await;

        let envelope = if reply.success {
            ResponseEnvelope::success(reply.content.unwrap_or_default(), response_type)
        } else {
            ResponseEnvelope::failure(
                reply.error.unwrap_or_else(|| "The assistant is temporarily unavailable.".into()),
            )
            .with_type(response_type)
        };

        envelope.stamped(classification)
    }
}
