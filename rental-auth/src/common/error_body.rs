use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Keys the server uses for a single, non-field message
const DETAIL_KEYS: [&str; 3] = ["detail", "error", "message"];

/// Error payload of a rejected request.
///
/// The server answers either with a single message (`{"detail": "..."}`) or
/// with per-field validation errors (`{"rent_amount": ["Ensure this value is
/// greater than 0."]}`). Non-JSON bodies are kept as a plain string.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorBody(Value);

impl ErrorBody {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Self(Value::Null);
        }
        serde_json::from_str(trimmed).unwrap_or_else(|_| Self(Value::String(trimmed.to_string())))
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }

    pub fn detail(&self) -> Option<&str> {
        match &self.0 {
            Value::String(s) => Some(s.as_str()),
            Value::Object(map) => DETAIL_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str)),
            _ => None,
        }
    }

    /// Validation messages keyed by field name
    pub fn field_errors(&self) -> BTreeMap<String, Vec<String>> {
        let Value::Object(map) = &self.0 else {
            return BTreeMap::new();
        };

        map.iter()
            .filter(|(key, _)| !DETAIL_KEYS.contains(&key.as_str()))
            .filter_map(|(key, value)| {
                let messages = messages(value);
                (!messages.is_empty()).then(|| (key.clone(), messages))
            })
            .collect()
    }
}

fn messages(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items.iter().flat_map(messages).collect(),
        Value::Null => Vec::new(),
        other => vec![other.to_string()],
    }
}

impl std::fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(detail) = self.detail() {
            return f.write_str(detail);
        }

        let fields = self.field_errors();
        if !fields.is_empty() {
            let joined = fields
                .iter()
                .map(|(field, msgs)| format!("{}: {}", field, msgs.join(" ")))
                .collect::<Vec<_>>()
                .join("; ");
            return f.write_str(&joined);
        }

        match &self.0 {
            Value::Null => f.write_str("no details"),
            other => write!(f, "{}", other),
        }
    }
}
