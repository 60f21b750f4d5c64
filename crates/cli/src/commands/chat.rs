use sokoni_agent::build_dispatcher;
use sokoni_core::config::{AppConfig, LoadOptions};

use super::CommandResult;

/// One-shot dispatch: wire the live agent stack from config, send a single
/// message with empty history, and print the envelope.
pub fn run(message: &str) -> CommandResult {
    if message.trim().is_empty() {
        return CommandResult::failure("chat", "empty_message", "message must not be empty", 2);
    }

    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("chat", "config_validation", error.to_string(), 2)
        }
    };

    let dispatcher = match build_dispatcher(&config.llm) {
        Ok(dispatcher) => dispatcher,
        Err(error) => {
            return CommandResult::failure("chat", "backend_setup", error.to_string(), 2)
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "chat",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                1,
            )
        }
    };

    let envelope = runtime.block_on(dispatcher.dispatch(message, &[]));

    match serde_json::to_string_pretty(&envelope) {
        Ok(output) => CommandResult { exit_code: 0, output },
        Err(error) => CommandResult::failure("chat", "serialization", error.to_string(), 1),
    }
}
