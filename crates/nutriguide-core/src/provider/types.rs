//! Request and error types shared by every generation service.

use std::fmt;

use thiserror::Error;

/// Which of the three structured outputs a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    MealPlan,
    Guidelines,
    Tips,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MealPlan => "meal_plan",
            Self::Guidelines => "guidelines",
            Self::Tips => "tips",
        };
        f.write_str(s)
    }
}

/// A prompt plus the JSON schema the answer must follow.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub kind: RequestKind,
    pub prompt: String,
    /// Output schema in the service's OpenAPI-subset dialect.
    pub schema: serde_json::Value,
}

/// Everything that can go wrong between composing a prompt and holding a
/// validated result.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no API key configured for the generation service")]
    MissingApiKey,

    #[error("request to the generation service failed: {0}")]
    Transport(String),

    #[error("generation service returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("generation service returned no content")]
    EmptyResponse,

    #[error("generation service refused the request: {0}")]
    Refused(String),

    #[error("{kind} response is not valid JSON: {source}")]
    Parse {
        kind: RequestKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("{kind} response failed validation: {reason}")]
    InvalidResponse { kind: RequestKind, reason: String },

    #[error("generation request was cancelled")]
    Cancelled,
}

impl GenerationError {
    /// Shorthand for an [`GenerationError::InvalidResponse`].
    pub fn invalid(kind: RequestKind, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            kind,
            reason: reason.into(),
        }
    }

    /// True for failures caused by the payload rather than the transport.
    pub fn is_bad_payload(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::InvalidResponse { .. } | Self::EmptyResponse
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_display_is_snake_case() {
        assert_eq!(RequestKind::MealPlan.to_string(), "meal_plan");
        assert_eq!(RequestKind::Tips.to_string(), "tips");
    }

    #[test]
    fn invalid_response_message_names_kind() {
        let err = GenerationError::invalid(RequestKind::Guidelines, "dailyCalories must be positive");
        assert_eq!(
            err.to_string(),
            "guidelines response failed validation: dailyCalories must be positive"
        );
        assert!(err.is_bad_payload());
        assert!(!GenerationError::Cancelled.is_bad_payload());
    }
}
