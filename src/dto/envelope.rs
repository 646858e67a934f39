use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

/// Returns the `data` member of an enveloped body (`{success, message, data, timestamp}`), or
/// the body itself for endpoints that answer bare.
pub fn unwrap_data(body: JsonValue) -> JsonValue {
    match body {
        JsonValue::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(JsonValue::Null)
        }
        other => other,
    }
}

pub fn decode_one<T: DeserializeOwned>(body: JsonValue) -> Result<T> {
    match unwrap_data(body) {
        JsonValue::Null => Err(Error::request(None, "Empty response payload")),
        payload => Ok(serde_json::from_value(payload)?),
    }
}

/// A `null` list payload decodes to an empty list.
pub fn decode_list<T: DeserializeOwned>(body: JsonValue) -> Result<Vec<T>> {
    match unwrap_data(body) {
        JsonValue::Null => Ok(Vec::new()),
        payload => Ok(serde_json::from_value(payload)?),
    }
}

/// Human-readable message from a failure body: `message`, else `error`.
pub fn error_message(body: &[u8]) -> Option<String> {
    let value: JsonValue = serde_json::from_slice(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
