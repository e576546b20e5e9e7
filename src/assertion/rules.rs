//! The explicit-assertion grammar
//!
//! Each rule family is a `(family, parser)` pair. [`parse`] walks the table in
//! priority order and the first parser that recognises the text wins.

use super::body::{body_text, excerpt, BodyShape};
use super::AssertionResult;
use crate::constants;
use crate::model::ResponseSnapshot;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// A parsed explicit assertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Status(u64),
    Contains(String),
    HasProperty(String),
    ArrayLength(usize),
}

type Parser = fn(&str) -> Option<Predicate>;

/// Rule families in priority order
pub const RULES: &[(&str, Parser)] = &[
    ("status", parse_status),
    ("contains", parse_contains),
    ("has-property", parse_has_property),
    ("array-length", parse_array_length),
];

static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

static CONTAINS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bcontains\s+(?:"([^"]*)"|'([^']*)'|(\S.*?)\s*$)"#).expect("valid regex")
});

static HAS_PROPERTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bhas\s+property\s+(?:"([^"]*)"|'([^']*)'|([^\s"']+))"#)
        .expect("valid regex")
});

/// Returns the predicate of the first family that recognises `text`
#[must_use]
pub fn parse(text: &str) -> Option<Predicate> {
    RULES.iter().find_map(|(_, parser)| parser(text))
}

fn first_number(text: &str) -> Option<&str> {
    NUMBER.find(text).map(|m| m.as_str())
}

fn parse_status(text: &str) -> Option<Predicate> {
    if !text.to_lowercase().contains("status") {
        return None;
    }
    first_number(text)?.parse().ok().map(Predicate::Status)
}

fn parse_contains(text: &str) -> Option<Predicate> {
    let caps = CONTAINS.captures(text)?;
    let needle = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3))?;
    Some(Predicate::Contains(needle.as_str().to_string()))
}

fn parse_has_property(text: &str) -> Option<Predicate> {
    let caps = HAS_PROPERTY.captures(text)?;
    let name = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3))?;
    Some(Predicate::HasProperty(name.as_str().to_string()))
}

fn parse_array_length(text: &str) -> Option<Predicate> {
    if !text.to_lowercase().contains("length") {
        return None;
    }
    first_number(text)?.parse().ok().map(Predicate::ArrayLength)
}

impl Predicate {
    /// Checks the predicate against a response, recording evidence
    #[must_use]
    pub fn evaluate(&self, text: &str, response: &ResponseSnapshot) -> AssertionResult {
        match self {
            Self::Status(expected) => {
                AssertionResult::explicit(text, u64::from(response.status) == *expected)
                    .with_actual(response.status)
                    .with_expected(*expected)
            }
            Self::Contains(needle) => {
                let haystack = body_text(&response.body);
                AssertionResult::explicit(text, haystack.contains(needle.as_str()))
                    .with_actual(excerpt(&haystack, 200))
                    .with_expected(needle.as_str())
            }
            Self::HasProperty(name) => {
                let (passed, actual) = match BodyShape::of(&response.body) {
                    BodyShape::Array(items) => {
                        let found = items
                            .iter()
                            .any(|item| item.as_object().is_some_and(|o| o.contains_key(name)));
                        (found, format!("array elements have property '{name}': {found}"))
                    }
                    BodyShape::Object(map) => {
                        let found = map.contains_key(name);
                        (found, format!("object has property '{name}': {found}"))
                    }
                    BodyShape::Null => (false, "empty body".to_string()),
                    BodyShape::Primitive(value) => {
                        (false, format!("{} body", super::body::type_name(value)))
                    }
                };
                AssertionResult::explicit(text, passed)
                    .with_actual(actual)
                    .with_expected(format!("property '{name}'"))
            }
            Self::ArrayLength(expected) => match locate_array(&response.body) {
                Some(items) => AssertionResult::explicit(text, items.len() == *expected)
                    .with_actual(items.len())
                    .with_expected(*expected),
                None => AssertionResult::explicit(text, false)
                    .with_expected(*expected)
                    .with_error(format!(
                        "No array found in response body, '{}' or '{}'",
                        constants::ARRAY_LOCATIONS[0],
                        constants::ARRAY_LOCATIONS[1]
                    )),
            },
        }
    }
}

/// Finds the array an array-length assertion refers to: the body itself,
/// then each of the well-known wrapper fields
fn locate_array(body: &Value) -> Option<&Vec<Value>> {
    body.as_array().or_else(|| {
        constants::ARRAY_LOCATIONS
            .iter()
            .find_map(|field| body.get(field).and_then(Value::as_array))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use serde_json::json;

    fn response(status: u16, body: Value) -> ResponseSnapshot {
        ResponseSnapshot {
            status,
            status_text: "OK".into(),
            headers: IndexMap::new(),
            body,
        }
    }

    #[test]
    fn test_rule_priority() {
        // "status" wins over "length" when both are present
        assert_eq!(
            parse("status should be 200 and length 3"),
            Some(Predicate::Status(200))
        );
        assert_eq!(
            parse("response contains \"status\""),
            Some(Predicate::Contains("status".into()))
        );
        assert_eq!(
            parse("array length should be 3"),
            Some(Predicate::ArrayLength(3))
        );
        assert_eq!(parse("status is fine"), None);
        assert_eq!(parse("looks good"), None);
    }

    #[test]
    fn test_contains_quotes_are_optional() {
        assert_eq!(
            parse(r#"contains "New User""#),
            Some(Predicate::Contains("New User".into()))
        );
        assert_eq!(
            parse("contains 'New User'"),
            Some(Predicate::Contains("New User".into()))
        );
        assert_eq!(
            parse("body contains New User"),
            Some(Predicate::Contains("New User".into()))
        );
    }

    #[test]
    fn test_quoted_needle_ignores_trailing_words() {
        assert_eq!(
            parse(r#"contains "New User" in body"#),
            Some(Predicate::Contains("New User".into()))
        );
        assert_eq!(
            parse("response contains 'ok' somewhere"),
            Some(Predicate::Contains("ok".into()))
        );
    }

    #[test]
    fn test_out_of_range_status_still_uses_status_rule() {
        assert_eq!(
            parse("status code should be 99999"),
            Some(Predicate::Status(99999))
        );
        let result = parse("status code should be 99999")
            .unwrap()
            .evaluate("status code should be 99999", &response(200, json!({})));
        assert!(!result.passed);
        assert!(result.error.is_none());
        assert_eq!(result.expected, Some(json!(99999)));
    }

    #[test]
    fn test_contains_checks_serialized_body() {
        let r = response(201, json!({"name": "New User", "email": "new@example.com"}));
        assert!(parse(r#"contains "New User""#).unwrap().evaluate("", &r).passed);
        assert!(!parse(r#"contains "Old User""#).unwrap().evaluate("", &r).passed);

        let text = response(200, json!("plain text body"));
        assert!(parse("contains text body").unwrap().evaluate("", &text).passed);
    }

    #[test]
    fn test_has_property_any_element_semantics() {
        let r = response(200, json!([{"id": 1}, {"id": 2, "name": "only me"}]));
        let result = parse(r#"has property "name""#).unwrap().evaluate("", &r);
        assert!(result.passed);

        let r = response(200, json!(["a", "b"]));
        assert!(!parse(r#"has property "name""#).unwrap().evaluate("", &r).passed);
    }

    #[test]
    fn test_has_property_on_non_container_fails() {
        let r = response(200, json!(42));
        assert!(!parse("has property id").unwrap().evaluate("", &r).passed);
        let r = response(204, Value::Null);
        assert!(!parse("has property id").unwrap().evaluate("", &r).passed);
    }

    #[test]
    fn test_array_length_locations() {
        let predicate = parse("array length should be 3").unwrap();

        let direct = response(200, json!([1, 2, 3]));
        assert!(predicate.evaluate("", &direct).passed);

        let results = response(200, json!({"results": [1, 2, 3]}));
        assert!(predicate.evaluate("", &results).passed);

        let data = response(200, json!({"data": [1, 2]}));
        let result = predicate.evaluate("", &data);
        assert!(!result.passed);
        assert_eq!(result.actual, Some(json!(2)));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_array_length_without_array_is_soft_failure() {
        let result = parse("array length should be 3")
            .unwrap()
            .evaluate("array length should be 3", &response(200, json!({})));
        assert!(!result.passed);
        assert!(result.error.unwrap().contains("No array found"));
    }
}
