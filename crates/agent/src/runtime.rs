use std::sync::Arc;

use thiserror::Error;

use sokoni_core::config::LlmConfig;

use crate::classifier::IntentClassifier;
use crate::dispatcher::Dispatcher;
use crate::executor::{FallbackExecutor, RetryPolicy};
use crate::handler::ConversationHandler;
use crate::llm::{GeminiBackend, GenerationBackend};
use crate::tools::{MarketingTool, PricingTool, StoryTool, ToolRegistry};

#[derive(Debug, Error)]
pub enum RuntimeSetupError {
    #[error("llm.api_key missing")]
    MissingApiKey,
    #[error("backend `{model}` setup failed: {detail}")]
    BackendSetup { model: String, detail: String },
}

/// Wire the full agent pipeline from config: one HTTP backend per configured
/// model in priority order, a shared fallback executor, the three built-in
/// tool executors, and the dispatcher on top.
pub fn build_dispatcher(llm: &LlmConfig) -> Result<Dispatcher, RuntimeSetupError> {
    let api_key = llm.api_key.clone().ok_or(RuntimeSetupError::MissingApiKey)?;

    let mut backends: Vec<Arc<dyn GenerationBackend>> = Vec::with_capacity(llm.backends.len());
    for backend_config in &llm.backends {
        let backend = GeminiBackend::new(
            &llm.base_url,
            api_key.clone(),
            backend_config.clone(),
            llm.timeout_secs,
        )
        .map_err(|error| RuntimeSetupError::BackendSetup {
            model: backend_config.model.clone(),
            detail: error.to_string(),
        })?;
        backends.push(Arc::new(backend));
    }

    let executor =
        Arc::new(FallbackExecutor::new(backends, RetryPolicy::from_backoff_ms(llm.backoff_ms)));

    let mut registry = ToolRegistry::default();
    registry.register(StoryTool::new(executor.clone()));
    registry.register(PricingTool::new(executor.clone()));
    registry.register(MarketingTool::new(executor.clone()));

    Ok(Dispatcher::new(
        IntentClassifier::new(executor.clone()),
        ConversationHandler::new(executor),
        Arc::new(registry),
    ))
}
