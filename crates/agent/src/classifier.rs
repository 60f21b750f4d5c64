use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use sokoni_core::{Intent, IntentResult};

use crate::executor::FallbackExecutor;

const CLASSIFIER_PROMPT: &str = "\
You are an intent classifier for a marketplace assistant serving artisans and \
small traders. Classify the user message into exactly one intent:\n\
- conversation: greetings, questions, general chat\n\
- content_generation: requests for a cultural story or product description\n\
- pricing: requests to analyze, estimate, or suggest prices\n\
- marketing: requests for promotional or marketing copy\n\
- image_analysis: the user refers to a photo or image they want analyzed\n\
- voice_processing: the user refers to a voice note or audio\n\
\n\
Respond with ONLY a JSON object, no prose:\n\
{\"intent\": \"<intent>\", \"confidence\": <0.0-1.0>, \"suggestion\": \"<optional short tip>\"}\n\
\n\
User message:\n";

/// Raw, untrusted shape emitted by the backend. Parsed defensively: unknown
/// intents and out-of-range confidences collapse to the default result.
#[derive(Debug, Deserialize)]
struct RawClassification {
    intent: Option<String>,
    confidence: Option<f64>,
    suggestion: Option<String>,
}

/// Maps free text to a structured intent. `classify` never fails - every
/// parse or generation problem degrades to `{conversation, 0.5}`.
pub struct IntentClassifier {
    executor: Arc<FallbackExecutor>,
}

impl IntentClassifier {
    pub fn new(executor: Arc<FallbackExecutor>) -> Self {
        Self { executor }
    }

    pub async fn classify(&self, message: &str) -> IntentResult {
        let prompt = format!("{CLASSIFIER_PROMPT}{message}");

        let raw = match self.executor.generate(&prompt).await {
            Ok(text) => text,
            Err(error) => {
                warn!(
                    event_name = "agent.classifier.backends_exhausted",
                    error = %error,
                    "classification call failed; defaulting to conversation"
                );
                return IntentResult::default();
            }
        };

        let result = parse_classification(&raw);
        debug!(
            event_name = "agent.classifier.result",
            intent = result.intent.as_str(),
            confidence = result.confidence,
            "message classified"
        );
        result
    }
}

/// Parse classifier output that may wrap the JSON object in prose. Extracts
/// the first balanced JSON object and validates its fields; anything
/// untrustworthy yields the default result.
pub fn parse_classification(raw: &str) -> IntentResult {
    let Some(json) = extract_json_object(raw) else {
        return IntentResult::default();
    };

    let Ok(parsed) = serde_json::from_str::<RawClassification>(json) else {
        return IntentResult::default();
    };

    let Some(intent) = parsed.intent.as_deref().and_then(parse_intent) else {
        return IntentResult::default();
    };

    let Some(confidence) = parsed.confidence.filter(|value| (0.0..=1.0).contains(value)) else {
        return IntentResult::default();
    };

    let mut result = IntentResult::new(intent, confidence);
    if let Some(suggestion) = parsed.suggestion.filter(|text| !text.trim().is_empty()) {
        result = result.with_suggestion(suggestion);
    }
    result
}

fn parse_intent(value: &str) -> Option<Intent> {
    match value.trim().to_ascii_lowercase().as_str() {
        "conversation" => Some(Intent::Conversation),
        "content_generation" => Some(Intent::ContentGeneration),
        "pricing" => Some(Intent::Pricing),
        "marketing" => Some(Intent::Marketing),
        "image_analysis" => Some(Intent::ImageAnalysis),
        "voice_processing" => Some(Intent::VoiceProcessing),
        _ => None,
    }
}

/// Find the first balanced `{...}` substring, honoring JSON string literals
/// and escape sequences so braces inside strings do not end the scan.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}
