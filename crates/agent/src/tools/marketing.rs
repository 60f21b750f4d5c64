use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use sokoni_core::Intent;

use crate::executor::FallbackExecutor;
use crate::tools::{Tool, ToolOutcome, ToolRequest};

const MARKETING_PROMPT: &str = "\
You are a marketing copywriter for a marketplace of artisans and small \
traders. Produce short promotional copy for the seller's request: a headline, \
two or three selling points, and a call to action. Match the seller's voice \
and avoid exaggerated claims.\n\nSeller request:\n";

/// Marketing-copy generation for seller listings.
pub struct MarketingTool {
    executor: Arc<FallbackExecutor>,
}

impl MarketingTool {
    pub fn new(executor: Arc<FallbackExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl Tool for MarketingTool {
    fn name(&self) -> &'static str {
        "marketing_generator"
    }

    fn intent(&self) -> Intent {
        Intent::Marketing
    }

    async fn execute(&self, request: &ToolRequest) -> Result<ToolOutcome> {
        let prompt = format!("{MARKETING_PROMPT}{}", request.message);
        match self.executor.generate(&prompt).await {
            Ok(content) => Ok(ToolOutcome::ok(content)),
            Err(error) => Ok(ToolOutcome::failed(error.to_string())),
        }
    }
}
