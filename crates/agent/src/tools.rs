use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use sokoni_core::{ConversationTurn, Intent};

pub mod marketing;
pub mod pricing;
pub mod story;

pub use marketing::MarketingTool;
pub use pricing::PricingTool;
pub use story::StoryTool;

/// Input handed to every tool executor: the original user message plus the
/// read-only conversation history.
#[derive(Clone, Debug)]
pub struct ToolRequest {
    pub message: String,
    pub history: Vec<ConversationTurn>,
}

impl ToolRequest {
    pub fn new(message: impl Into<String>, history: Vec<ConversationTurn>) -> Self {
        Self { message: message.into(), history }
    }
}

/// Uniform tool result contract. A declared success with blank content is
/// still treated as a failure by the dispatcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolOutcome {
    pub success: bool,
    pub content: String,
    pub error: Option<String>,
}

impl ToolOutcome {
    pub fn ok(content: impl Into<String>) -> Self {
        Self { success: true, content: content.into(), error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { success: false, content: String::new(), error: Some(error.into()) }
    }

    /// A trustworthy result: declared success with non-blank content.
    pub fn is_usable(&self) -> bool {
        self.success && !self.content.trim().is_empty()
    }
}

/// A specialized content-generation subsystem handling one intent category.
/// The dispatcher treats all tools uniformly through this contract.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;

    /// The single tool-eligible intent this executor serves.
    fn intent(&self) -> Intent;

    async fn execute(&self, request: &ToolRequest) -> Result<ToolOutcome>;
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<Intent, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn register<T>(&mut self, tool: T)
    where
        T: Tool + 'static,
    {
        self.tools.insert(tool.intent(), Arc::new(tool));
    }

    pub fn for_intent(&self, intent: Intent) -> Option<Arc<dyn Tool>> {
        self.tools.get(&intent).cloned()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use async_trait::async_trait;

    use sokoni_core::Intent;

    use super::{Tool, ToolOutcome, ToolRegistry, ToolRequest};

    struct FakePricingTool;

    #[async_trait]
    impl Tool for FakePricingTool {
        fn name(&self) -> &'static str {
            "fake_pricing"
        }

        fn intent(&self) -> Intent {
            Intent::Pricing
        }

        async fn execute(&self, _request: &ToolRequest) -> Result<ToolOutcome> {
            Ok(ToolOutcome::ok("charge more"))
        }
    }

    #[test]
    fn registry_resolves_tools_by_intent() {
        let mut registry = ToolRegistry::default();
        registry.register(FakePricingTool);

        assert_eq!(registry.len(), 1);
        assert!(registry.for_intent(Intent::Pricing).is_some());
        assert!(registry.for_intent(Intent::Marketing).is_none());
    }

    #[test]
    fn blank_success_is_not_usable() {
        assert!(ToolOutcome::ok("real content").is_usable());
        assert!(!ToolOutcome::ok("   ").is_usable());
        assert!(!ToolOutcome::failed("broke").is_usable());
    }
}
