use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use sokoni_core::Intent;

use crate::executor::FallbackExecutor;
use crate::tools::{Tool, ToolOutcome, ToolRequest};

const STORY_PROMPT: &str = "\
You are a storyteller for a marketplace of artisans and small traders. Write \
a short, authentic cultural story or product description based on the \
seller's request. Honor the craft's heritage, avoid invented facts about \
specific communities, and keep it under 200 words.\n\nSeller request:\n";

/// Cultural-story generation for artisan goods.
pub struct StoryTool {
    executor: Arc<FallbackExecutor>,
}

impl StoryTool {
    pub fn new(executor: Arc<FallbackExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl Tool for StoryTool {
    fn name(&self) -> &'static str {
        "story_generator"
    }

    fn intent(&self) -> Intent {
        Intent::ContentGeneration
    }

    async fn execute(&self, request: &ToolRequest) -> Result<ToolOutcome> {
        let prompt = format!("{STORY_PROMPT}{}", request.message);
        match self.executor.generate(&prompt).await {
            Ok(content) => Ok(ToolOutcome::ok(content)),
            Err(error) => Ok(ToolOutcome::failed(error.to_string())),
        }
    }
}
