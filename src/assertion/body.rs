use serde_json::{Map, Value};

/// The closed set of body shapes the engine distinguishes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyShape<'a> {
    Array(&'a [Value]),
    Object(&'a Map<String, Value>),
    Null,
    Primitive(&'a Value),
}

impl<'a> BodyShape<'a> {
    #[must_use]
    pub fn of(body: &'a Value) -> Self {
        match body {
            Value::Array(items) => Self::Array(items),
            Value::Object(map) => Self::Object(map),
            Value::Null => Self::Null,
            other => Self::Primitive(other),
        }
    }
}

/// Name of a JSON primitive's runtime type
#[must_use]
pub const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Text form of a body used for substring checks. Strings are used as-is.
#[must_use]
pub fn body_text(body: &Value) -> String {
    match body {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Truncates text at a character boundary, marking the cut
#[must_use]
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
