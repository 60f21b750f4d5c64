//! Core domain types, configuration, and error taxonomy for the Sokoni
//! marketplace assistant.
//!
//! This crate is deliberately free of network I/O: it defines the conversation and
//! intent model, the uniform [`ResponseEnvelope`] output contract, the layered
//! configuration loader, and the error types shared by the agent and server
//! crates. Anything that talks to the network lives in `sokoni-agent` or
//! `sokoni-server`.

pub mod config;
pub mod domain;
pub mod errors;

pub use domain::conversation::{ChatRequest, ConversationTurn, Role};
pub use domain::envelope::ResponseEnvelope;
pub use domain::intent::{Intent, IntentResult};
pub use errors::{BackendsExhausted, GenerationError, InterfaceError};
