use common::helper::error_chain_fmt;
use serde_json::{Map, Value as JsonValue};

/// A request (or generated content) broke one of the field rules.
///
/// `field` is the name of the offending field as it appears in the JSON body,
/// `details` holds rule-specific context (`provided`, `required`, `layout`, ...).
#[derive(thiserror::Error, Clone, PartialEq)]
#[error("Invalid `{field}`: {issue}")]
pub struct ValidationError {
    pub field: String,
    pub issue: String,
    pub details: Map<String, JsonValue>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, issue: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            issue: issue.into(),
            details: Map::new(),
        }
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<JsonValue>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    /// Value of a `details` entry, mostly useful in tests
    pub fn detail(&self, key: &str) -> Option<&JsonValue> {
        self.details.get(key)
    }

    /// Every detail plus the offending field, as exposed in error responses
    pub fn details_with_field(&self) -> Map<String, JsonValue> {
        let mut details = self.details.clone();
        details.insert("field".to_string(), JsonValue::from(self.field.clone()));
        details
    }
}

impl std::fmt::Debug for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
