use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use sokoni_agent::{build_dispatcher, Dispatcher, RuntimeSetupError};
use sokoni_core::config::AppConfig;

pub struct Application {
    pub config: AppConfig,
    pub dispatcher: Arc<Dispatcher>,
    pub backend_count: usize,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    RuntimeSetup(#[from] RuntimeSetupError),
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let dispatcher = Arc::new(build_dispatcher(&config.llm)?);
    let backend_count = config.llm.backends.len();

    info!(
        event_name = "system.bootstrap.agent_wired",
        correlation_id = "bootstrap",
        backends = backend_count,
        "agent pipeline constructed"
    );

    Ok(Application { config, dispatcher, backend_count })
}
