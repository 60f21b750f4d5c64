use std::sync::Arc;

use tracing::warn;

use sokoni_core::ConversationTurn;

use crate::executor::FallbackExecutor;

const DEFAULT_SYSTEM_INSTRUCTION: &str = "\
You are Sokoni, a friendly marketplace assistant for artisans and small \
traders. Help with product questions, selling advice, and everyday \
conversation. Keep answers practical, warm, and concise.";

const DEGRADED_SERVICE_MESSAGE: &str = "\
I'm having trouble generating a response right now. Please try again in a \
moment.";

/// Outcome of the generic handler. Always produced - on total backend
/// exhaustion `success` is false and `error` carries the degraded message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandlerReply {
    pub success: bool,
    pub content: Option<String>,
    pub error: Option<String>,
}

impl HandlerReply {
    fn completed(content: String) -> Self {
        Self { success: true, content: Some(content), error: None }
    }

    fn degraded(error: String) -> Self {
        Self { success: false, content: None, error: Some(error) }
    }
}

/// Handler of last resort: flattens history + message into one prompt and
/// delegates to the fallback executor. This is the final boundary where
/// [`sokoni_core::BackendsExhausted`] is absorbed; it never propagates past
/// here.
pub struct ConversationHandler {
    executor: Arc<FallbackExecutor>,
}

impl ConversationHandler {
    pub fn new(executor: Arc<FallbackExecutor>) -> Self {
        Self { executor }
    }

    pub async fn respond(
        &self,
        message: &str,
        history: &[ConversationTurn],
        system_override: Option<&str>,
    ) -> HandlerReply {
        let prompt = build_prompt(message, history, system_override);

        match self.executor.generate(&prompt).await {
            Ok(content) => HandlerReply::completed(content),
            Err(error) => {
                warn!(
                    event_name = "agent.handler.backends_exhausted",
                    attempts = error.attempts,
                    last_backend = %error.last_backend,
                    error = %error.source,
                    "conversation degraded; all backends exhausted"
                );
                HandlerReply::degraded(format!(
                    "{DEGRADED_SERVICE_MESSAGE} (all generation backends unavailable)"
                ))
            }
        }
    }
}

/// Flatten the conversation into a single prompt: system instruction, each
/// turn as `"<role>: <content>"`, the new message, and an assistant cue.
fn build_prompt(
    message: &str,
    history: &[ConversationTurn],
    system_override: Option<&str>,
) -> String {
    let system = system_override.unwrap_or(DEFAULT_SYSTEM_INSTRUCTION);
    let mut prompt = String::with_capacity(system.len() + message.len() + 64);

    prompt.push_str(system);
    prompt.push_str("\n\n");

    for turn in history {
        prompt.push_str(turn.role.as_str());
        prompt.push_str(": ");
        prompt.push_str(&turn.content);
        prompt.push('\n');
    }

    prompt.push_str("user: ");
    prompt.push_str(message);
    prompt.push_str("\nassistant:");
    prompt
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use sokoni_core::{ConversationTurn, GenerationError};

    use super::{build_prompt, ConversationHandler, DEFAULT_SYSTEM_INSTRUCTION};
    use crate::executor::{FallbackExecutor, RetryPolicy};
    use crate::llm::GenerationBackend;

    struct EchoBackend;

    #[async_trait]
    impl GenerationBackend for EchoBackend {
        fn id(&self) -> &str {
            "echo"
        }

        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            Ok(format!("echo:{prompt}"))
        }
    }

    struct DeadBackend;

    #[async_trait]
    impl GenerationBackend for DeadBackend {
        fn id(&self) -> &str {
            "dead"
        }

        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            Err(GenerationError::Provider("unreachable".to_string()))
        }
    }

    #[test]
    fn prompt_flattens_history_in_order_with_assistant_cue() {
        let history = vec![
            ConversationTurn::user("I weave baskets"),
            ConversationTurn::assistant("They sound lovely!"),
        ];

        let prompt = build_prompt("how do I price them?", &history, None);

        assert!(prompt.starts_with(DEFAULT_SYSTEM_INSTRUCTION));
        let user_turn = prompt.find("user: I weave baskets").expect("first turn present");
        let assistant_turn =
            prompt.find("assistant: They sound lovely!").expect("second turn present");
        let new_message = prompt.find("user: how do I price them?").expect("message present");
        assert!(user_turn < assistant_turn && assistant_turn < new_message);
        assert!(prompt.ends_with("assistant:"));
    }

    #[test]
    fn system_override_replaces_default_instruction() {
        let prompt = build_prompt("hello", &[], Some("You are a pricing analyst."));
        assert!(prompt.starts_with("You are a pricing analyst."));
        assert!(!prompt.contains(DEFAULT_SYSTEM_INSTRUCTION));
    }

    #[tokio::test]
    async fn successful_generation_yields_content() {
        let executor = Arc::new(FallbackExecutor::new(
            vec![Arc::new(EchoBackend)],
            RetryPolicy::default(),
        ));
        let handler = ConversationHandler::new(executor);

        let reply = handler.respond("jambo", &[], None).await;
        assert!(reply.success);
        assert!(reply.content.expect("content").contains("jambo"));
    }

    #[tokio::test]
    async fn exhaustion_is_absorbed_into_degraded_reply() {
        let executor = Arc::new(FallbackExecutor::new(
            vec![Arc::new(DeadBackend)],
            RetryPolicy::default(),
        ));
        let handler = ConversationHandler::new(executor);

        let reply = handler.respond("jambo", &[], None).await;
        assert!(!reply.success);
        assert!(reply.content.is_none());
        let error = reply.error.expect("degraded message");
        assert!(error.contains("trouble generating a response"));
        // The raw provider error never reaches the user text.
        assert!(!error.contains("unreachable"));
    }
}
