use serde::{Deserialize, Serialize};

/// Classified purpose of a user message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Conversation,
    ContentGeneration,
    Pricing,
    Marketing,
    ImageAnalysis,
    VoiceProcessing,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conversation => "conversation",
            Self::ContentGeneration => "content_generation",
            Self::Pricing => "pricing",
            Self::Marketing => "marketing",
            Self::ImageAnalysis => "image_analysis",
            Self::VoiceProcessing => "voice_processing",
        }
    }

    /// Intents served by a specialized tool executor when confidence clears
    /// the routing threshold.
    pub fn tool_eligible(&self) -> bool {
        matches!(self, Self::ContentGeneration | Self::Pricing | Self::Marketing)
    }

    /// Fixed capability description for intents that need a different input
    /// modality. These branches never issue a generation call.
    pub fn modality_redirect(&self) -> Option<&'static str> {
        match self {
            Self::ImageAnalysis => Some(
                "I can analyze product photos! Please attach an image of your item and I'll \
                 help with descriptions, categorization, and quality suggestions.",
            ),
            Self::VoiceProcessing => Some(
                "I can work with voice messages! Please record a voice note and I'll \
                 transcribe it and help with your request.",
            ),
            _ => None,
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier output. `confidence` is always within `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntentResult {
    pub intent: Intent,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl IntentResult {
    pub fn new(intent: Intent, confidence: f64) -> Self {
        Self { intent, confidence: confidence.clamp(0.0, 1.0), suggestion: None }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl Default for IntentResult {
    /// The fallback classification used whenever the classifier cannot produce
    /// a trustworthy result.
    fn default() -> Self {
        Self { intent: Intent::Conversation, confidence: 0.5, suggestion: None }
    }
}
