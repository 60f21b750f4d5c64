use std::env;
use std::path::PathBuf;

use sokoni_core::config::{AppConfig, LoadOptions};

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let file_present = detect_config_path().is_some();

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "llm.api_key",
        "<redacted>",
        source("SOKONI_LLM_API_KEY", file_present),
    ));
    lines.push(render_line(
        "llm.base_url",
        &config.llm.base_url,
        source("SOKONI_LLM_BASE_URL", file_present),
    ));
    lines.push(render_line(
        "llm.timeout_secs",
        &config.llm.timeout_secs.to_string(),
        source("SOKONI_LLM_TIMEOUT_SECS", file_present),
    ));
    lines.push(render_line(
        "llm.backoff_ms",
        &config.llm.backoff_ms.to_string(),
        source("SOKONI_LLM_BACKOFF_MS", file_present),
    ));

    for (position, backend) in config.llm.backends.iter().enumerate() {
        lines.push(format!(
            "  llm.backends[{position}] = model={} temperature={} top_k={} top_p={} max_output_tokens={}",
            backend.model,
            backend.temperature,
            backend.top_k,
            backend.top_p,
            backend.max_output_tokens
        ));
    }

    lines.push(render_line(
        "server.bind_address",
        &config.server.bind_address,
        source("SOKONI_SERVER_BIND_ADDRESS", file_present),
    ));
    lines.push(render_line(
        "server.port",
        &config.server.port.to_string(),
        source("SOKONI_SERVER_PORT", file_present),
    ));
    lines.push(render_line(
        "server.health_check_port",
        &config.server.health_check_port.to_string(),
        source("SOKONI_SERVER_HEALTH_CHECK_PORT", file_present),
    ));
    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("SOKONI_LOGGING_LEVEL", file_present),
    ));

    lines.join("\n")
}

fn render_line(key: &str, value: &str, source: &'static str) -> String {
    format!("  {key} = {value} (source: {source})")
}

/// Coarse source attribution: an env var wins when set, otherwise the file
/// may have patched the default. Good enough for operator inspection.
fn source(env_var: &str, file_present: bool) -> &'static str {
    if env::var(env_var).map(|value| !value.trim().is_empty()).unwrap_or(false) {
        "env"
    } else if file_present {
        "file-or-default"
    } else {
        "default"
    }
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("sokoni.toml"), PathBuf::from("config/sokoni.toml")]
        .into_iter()
        .find(|path| path.exists())
}
