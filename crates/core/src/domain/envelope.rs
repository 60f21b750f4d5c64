use serde::{Deserialize, Serialize};

use super::intent::{Intent, IntentResult};

/// The single output contract for every request, regardless of which internal
/// path produced it. Either `content` (success) or `error` (degraded) is set;
/// `intent` and `confidence` are always stamped by the dispatcher.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub intent: Intent,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub response_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
}

impl ResponseEnvelope {
    pub fn success(content: impl Into<String>, response_type: impl Into<String>) -> Self {
        Self {
            success: true,
            content: Some(content.into()),
            error: None,
            intent: Intent::Conversation,
            confidence: 0.5,
            suggestion: None,
            response_type: Some(response_type.into()),
            tool: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            content: None,
            error: Some(error.into()),
            intent: Intent::Conversation,
            confidence: 0.5,
            suggestion: None,
            response_type: None,
            tool: None,
        }
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = Some(tool.into());
        self
    }

    pub fn with_type(mut self, response_type: impl Into<String>) -> Self {
        self.response_type = Some(response_type.into());
        self
    }

    /// Stamp classification metadata onto the envelope. Routing policy owns
    /// these fields; generation paths never set them.
    pub fn stamped(mut self, classification: &IntentResult) -> Self {
        self.intent = classification.intent;
        self.confidence = classification.confidence;
        self.suggestion = classification.suggestion.clone();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::ResponseEnvelope;
    use crate::domain::intent::{Intent, IntentResult};

    #[test]
    fn type_field_uses_wire_name() {
        let envelope = ResponseEnvelope::success("jambo!", "conversation");
        let json = serde_json::to_value(&envelope).expect("serialize");
        assert_eq!(json["type"], "conversation");
        assert!(json.get("response_type").is_none());
        assert!(json.get("error").is_none());
    }

    #[test]
    fn stamping_copies_classification_metadata() {
        let classification =
            IntentResult::new(Intent::Pricing, 0.92).with_suggestion("try the pricing tool");
        let envelope = ResponseEnvelope::success("analysis", "pricing").stamped(&classification);

        assert_eq!(envelope.intent, Intent::Pricing);
        assert_eq!(envelope.confidence, 0.92);
        assert_eq!(envelope.suggestion.as_deref(), Some("try the pricing tool"));
    }

    #[test]
    fn failure_envelope_has_error_and_no_content() {
        let envelope = ResponseEnvelope::failure("degraded");
        assert!(!envelope.success);
        assert!(envelope.content.is_none());
        assert_eq!(envelope.error.as_deref(), Some("degraded"));
    }
}
