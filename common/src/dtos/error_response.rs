use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Body returned by every service for any non-2xx response
///
/// - `error`: the error kind, for ex `ValidationError` or `NotFound`
/// - `message`: human readable description
/// - `details`: optional structured context (offending field, retry delay, ...)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ErrorResponseDto {
    pub error: String,
    pub message: String,
    pub details: Option<Map<String, JsonValue>>,
}

impl ErrorResponseDto {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Adds a key to `details`, creating the map on first use
    pub fn with_detail(mut self, key: &str, value: impl Into<JsonValue>) -> Self {
        self.details
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value.into());
        self
    }

    pub fn with_details(mut self, details: Map<String, JsonValue>) -> Self {
        self.details
            .get_or_insert_with(Map::new)
            .extend(details);
        self
    }
}
