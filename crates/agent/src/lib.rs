//! Agent runtime - intent classification, model fallback, and tool dispatch
//!
//! This crate is the "brain" of the sokoni assistant:
//! - Classifies free-text messages into a structured intent (`classifier`)
//! - Tries generation backends in priority order with backoff on rate limits
//!   (`executor`)
//! - Builds flattened conversation prompts when no tool applies (`handler`)
//! - Routes tool-eligible intents through a uniform tool contract and falls
//!   back to conversation on tool failure (`dispatcher`, `tools`)
//!
//! # Architecture
//!
//! One request flows through a fixed pipeline:
//! 1. **Classification** (`classifier`) - one constrained generation call,
//!    defensively parsed; never fails.
//! 2. **Routing** (`dispatcher`) - tool executor above the confidence
//!    threshold, generic conversation otherwise.
//! 3. **Generation** (`executor`) - ordered backend fallback; the only
//!    component allowed to call the model provider.
//!
//! The dispatcher stamps intent metadata onto every envelope; handlers and
//! tools stay intent-agnostic so routing policy and generation logic never
//! mix.

pub mod classifier;
pub mod dispatcher;
pub mod executor;
pub mod handler;
pub mod llm;
pub mod runtime;
pub mod tools;

pub use classifier::IntentClassifier;
pub use dispatcher::Dispatcher;
pub use executor::{FallbackExecutor, RetryPolicy};
pub use handler::{ConversationHandler, HandlerReply};
pub use llm::{GeminiBackend, GenerationBackend};
pub use runtime::{build_dispatcher, RuntimeSetupError};
pub use tools::{Tool, ToolOutcome, ToolRegistry, ToolRequest};
