use thiserror::Error;

/// Failure classes reported by a single generation backend. The executor's
/// retry policy branches on [`GenerationError::is_rate_limited`]: rate-limit
/// signatures get a backoff before the next backend, everything else advances
/// immediately.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("backend rate limited: {0}")]
    RateLimited(String),
    #[error("backend rejected request: {0}")]
    Provider(String),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("backend returned an empty completion")]
    EmptyCompletion,
}

impl GenerationError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }
}

/// The single aggregate failure the fallback executor may propagate: every
/// configured backend was tried and none produced output. Carries the last
/// backend's error for diagnostics.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("all {attempts} generation backends exhausted; last ({last_backend}): {source}")]
pub struct BackendsExhausted {
    pub attempts: usize,
    pub last_backend: String,
    #[source]
    pub source: GenerationError,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn bad_request(message: impl Into<String>, correlation_id: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into(), correlation_id: correlation_id.into() }
    }

    pub fn internal(message: impl Into<String>, correlation_id: impl Into<String>) -> Self {
        Self::Internal { message: message.into(), correlation_id: correlation_id.into() }
    }

    /// User-safe text. Raw internals stay in the structured logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::ServiceUnavailable { .. } => {
                "The assistant is temporarily unavailable. Please retry shortly."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::ServiceUnavailable { correlation_id, .. }
            | Self::Internal { correlation_id, .. } => correlation_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BackendsExhausted, GenerationError, InterfaceError};

    #[test]
    fn only_rate_limit_errors_trigger_backoff() {
        assert!(GenerationError::RateLimited("quota".to_owned()).is_rate_limited());
        assert!(!GenerationError::Provider("500".to_owned()).is_rate_limited());
        assert!(!GenerationError::Transport("timeout".to_owned()).is_rate_limited());
        assert!(!GenerationError::EmptyCompletion.is_rate_limited());
    }

    #[test]
    fn exhaustion_error_identifies_last_backend() {
        let error = BackendsExhausted {
            attempts: 3,
            last_backend: "sokoni-lite".to_owned(),
            source: GenerationError::RateLimited("429".to_owned()),
        };
        let message = error.to_string();
        assert!(message.contains("3 generation backends"));
        assert!(message.contains("sokoni-lite"));
    }

    #[test]
    fn bad_request_has_user_safe_message() {
        let error = InterfaceError::bad_request("message must not be empty", "req-1");
        assert_eq!(
            error.user_message(),
            "The request could not be processed. Check inputs and try again."
        );
        assert_eq!(error.correlation_id(), "req-1");
    }
}
