use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};

use super::validation_error::ValidationError;

/// Name of the JSON type of `value`, as reported in `provided_type`
pub fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// `value` as a JSON object, `field` names it in the error otherwise
pub fn into_object(
    value: JsonValue,
    field: &str,
) -> Result<Map<String, JsonValue>, ValidationError> {
    match value {
        JsonValue::Object(object) => Ok(object),
        other => Err(
            ValidationError::new(field, format!("`{}` must be a JSON object", field))
                .with_detail("provided_type", json_type_name(&other)),
        ),
    }
}

/// Takes the member `field` out of `object` and reads it as a `T`.
///
/// Absent and `null` members are both `None`. A member of the wrong type is a
/// `ValidationError` naming `field`, so type errors are reported like any other rule.
pub fn take_optional<T: DeserializeOwned>(
    object: &mut Map<String, JsonValue>,
    field: &str,
) -> Result<Option<T>, ValidationError> {
    match object.remove(field) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(value) => {
            let provided_type = json_type_name(&value);
            serde_json::from_value(value).map(Some).map_err(|error| {
                ValidationError::new(field, error.to_string())
                    .with_detail("provided_type", provided_type)
            })
        }
    }
}
