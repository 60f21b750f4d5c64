use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use sokoni_core::Intent;

use crate::executor::FallbackExecutor;
use crate::tools::{Tool, ToolOutcome, ToolRequest};

const PRICING_PROMPT: &str = "\
You are a pricing analyst for a marketplace of artisans and small traders. \
Analyze the seller's request and respond with: a suggested price range, the \
main cost factors to consider (materials, labor, comparable listings), and \
one concrete next step. Be specific and practical; state clearly when you \
are estimating.\n\nSeller request:\n";

/// Pricing analysis for seller listings.
pub struct PricingTool {
    executor: Arc<FallbackExecutor>,
}

impl PricingTool {
    pub fn new(executor: Arc<FallbackExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl Tool for PricingTool {
    fn name(&self) -> &'static str {
        "pricing_analyzer"
    }

    fn intent(&self) -> Intent {
        Intent::Pricing
    }

    async fn execute(&self, request: &ToolRequest) -> Result<ToolOutcome> {
        let prompt = format!("{PRICING_PROMPT}{}", request.message);
        match self.executor.generate(&prompt).await {
            Ok(content) => Ok(ToolOutcome::ok(content)),
            Err(error) => Ok(ToolOutcome::failed(error.to_string())),
        }
    }
}
