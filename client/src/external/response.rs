//! Response bodies of the account service and best-effort message extraction
//!
//! Error bodies come in several shapes: plain text, a JSON string, or a JSON
//! object such as `{"status":400,"message":"...","errors":{...}}`. Extraction
//! is lossy by nature and never fails, it falls back to a generic message.

use serde_json::Value;

/// Body of a non-successful response
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Empty,
    Text(String),
    Json(Value),
}

impl ResponseBody {
    /// Classify a raw body: blank, JSON, or plain text
    pub fn from_text(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return ResponseBody::Empty;
        }
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Null) => ResponseBody::Empty,
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(raw),
        }
    }

    /// The body when it is plain text or a bare JSON string
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(text) => Some(text),
            ResponseBody::Json(Value::String(text)) => Some(text),
            _ => None,
        }
    }

    /// Whether the textual body contains any of `markers`
    pub fn contains_any(&self, markers: &[&str]) -> bool {
        self.as_text()
            .map(|text| markers.iter().any(|m| text.contains(m)))
            .unwrap_or(false)
    }
}

type Extractor = fn(&ResponseBody) -> Option<String>;

/// Extractors tried in order; the first non-empty answer wins
const EXTRACTORS: &[Extractor] = &[
    plain_text,
    message_field,
    error_field,
    joined_string_fields,
];

/// Pull a human readable message out of an error body, or return `fallback`
pub fn extract_message(body: &ResponseBody, fallback: &str) -> String {
    EXTRACTORS
        .iter()
        .find_map(|extract| extract(body))
        .unwrap_or_else(|| fallback.to_string())
}

fn non_blank(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn plain_text(body: &ResponseBody) -> Option<String> {
    body.as_text().and_then(non_blank)
}

fn message_field(body: &ResponseBody) -> Option<String> {
    object_field(body, "message")
}

fn error_field(body: &ResponseBody) -> Option<String> {
    object_field(body, "error")
}

fn object_field(body: &ResponseBody, key: &str) -> Option<String> {
    match body {
        ResponseBody::Json(Value::Object(map)) => map.get(key)?.as_str().and_then(non_blank),
        _ => None,
    }
}

fn joined_string_fields(body: &ResponseBody) -> Option<String> {
    let ResponseBody::Json(Value::Object(map)) = body else {
        return None;
    };
    let joined = map
        .values()
        .filter_map(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    non_blank(&joined)
}
