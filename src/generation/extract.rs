//! Locating a JSON array in free-form text generator output

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)```").expect("valid regex")
});

static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(\s*[\]}])").expect("valid regex"));

/// Which extraction method produced the array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    WholeText,
    FencedBlock,
    FirstArrayLiteral,
    OuterBrackets,
    /// One of the above, after stripping comments and trailing commas
    Cleaned(CleanedFrom),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanedFrom {
    FencedBlock,
    FirstArrayLiteral,
    OuterBrackets,
}

/// Finds the first array-shaped JSON value in `raw`.
///
/// Methods are tried in order: the whole trimmed text, fenced code blocks,
/// the first array literal that parses, the span between the first `[` and
/// the last `]`. When that finds nothing, or finds an array that holds no
/// objects, the last three are retried on a copy with comments and trailing
/// commas removed. An array of objects from the cleaned copy beats a
/// non-object array from the raw text.
#[must_use]
pub fn extract_array(raw: &str) -> Option<(Vec<Value>, Extraction)> {
    if let Some(items) = parse_array(raw.trim()) {
        return Some((items, Extraction::WholeText));
    }
    let found = structured_search(raw);
    if found.as_ref().is_some_and(|(items, _)| holds_objects(items)) {
        return found;
    }

    let cleaned = strip_noise(raw);
    let cleaned_found = structured_search(&cleaned).map(|(items, method)| {
        let from = match method {
            Extraction::FencedBlock => CleanedFrom::FencedBlock,
            Extraction::FirstArrayLiteral => CleanedFrom::FirstArrayLiteral,
            _ => CleanedFrom::OuterBrackets,
        };
        (items, Extraction::Cleaned(from))
    });
    if cleaned_found.as_ref().is_some_and(|(items, _)| holds_objects(items)) {
        return cleaned_found;
    }
    found.or(cleaned_found)
}

fn holds_objects(items: &[Value]) -> bool {
    !items.is_empty() && items.iter().all(Value::is_object)
}

fn structured_search(text: &str) -> Option<(Vec<Value>, Extraction)> {
    from_fenced_blocks(text)
        .map(|items| (items, Extraction::FencedBlock))
        .or_else(|| first_array_literal(text).map(|items| (items, Extraction::FirstArrayLiteral)))
        .or_else(|| outer_brackets(text).map(|items| (items, Extraction::OuterBrackets)))
}

fn parse_array(text: &str) -> Option<Vec<Value>> {
    match serde_json::from_str(text).ok()? {
        Value::Array(items) => Some(items),
        _ => None,
    }
}

fn from_fenced_blocks(text: &str) -> Option<Vec<Value>> {
    FENCED_BLOCK
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|payload| parse_array(payload.as_str().trim()))
}

/// Tries each `[` in turn, parsing one JSON value from that position.
///
/// A non-empty array of objects wins over any earlier array literal, so a
/// nested `"assertions": []` is not mistaken for the result.
fn first_array_literal(text: &str) -> Option<Vec<Value>> {
    let arrays: Vec<Vec<Value>> = text
        .match_indices('[')
        .filter_map(|(idx, _)| {
            let mut stream =
                serde_json::Deserializer::from_str(&text[idx..]).into_iter::<Value>();
            match stream.next()? {
                Ok(Value::Array(items)) => Some(items),
                _ => None,
            }
        })
        .collect();
    let objects = arrays.iter().position(|items| holds_objects(items));
    let mut arrays = arrays.into_iter();
    match objects {
        Some(idx) => arrays.nth(idx),
        None => arrays.next(),
    }
}

fn outer_brackets(text: &str) -> Option<Vec<Value>> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end <= start {
        return None;
    }
    parse_array(&text[start..=end])
}

/// Removes `//` and `/* */` comments outside string literals, then trailing commas
fn strip_noise(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
            }
            _ => out.push(c),
        }
    }

    TRAILING_COMMA.replace_all(&out, "$1").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_output_is_trusted_whole() {
        let (items, method) = extract_array(r#"  [{"name": "a"}]  "#).unwrap();
        assert_eq!(items, vec![json!({"name": "a"})]);
        assert_eq!(method, Extraction::WholeText);
    }

    #[test]
    fn test_fenced_block() {
        let raw = "Here are your tests:\n```json\n[{\"name\": \"a\"}]\n```\nEnjoy!";
        let (items, method) = extract_array(raw).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(method, Extraction::FencedBlock);
    }

    #[test]
    fn test_array_of_objects_wins_over_earlier_literal() {
        let raw = "Sure! [1] is a footnote. Result: [{\"name\": \"a\"}] as requested.";
        let (items, method) = extract_array(raw).unwrap();
        assert_eq!(items, vec![json!({"name": "a"})]);
        assert_eq!(method, Extraction::FirstArrayLiteral);
    }

    #[test]
    fn test_first_literal_used_when_no_objects() {
        let (items, _) = extract_array("The codes are [200, 404] and [500].").unwrap();
        assert_eq!(items, vec![json!(200), json!(404)]);
    }

    #[test]
    fn test_nested_empty_array_is_not_the_result() {
        let raw = r#"Tests: [{"name": "a", "assertions": []},]"#;
        let (items, method) = extract_array(raw).unwrap();
        assert_eq!(items[0]["name"], "a");
        assert_eq!(method, Extraction::Cleaned(CleanedFrom::FirstArrayLiteral));
    }

    #[test]
    fn test_skips_bracket_that_does_not_start_an_array() {
        let raw = "Use [brackets] carefully: [{\"name\": \"b\"}]";
        let (items, _) = extract_array(raw).unwrap();
        assert_eq!(items, vec![json!({"name": "b"})]);
    }

    #[test]
    fn test_comments_and_trailing_commas_are_stripped() {
        let raw = r#"
[
  // the happy path
  {"name": "list", "endpoint": "http://x/users", /* inline */ "expectedStatus": 200,},
]
"#;
        let (items, method) = extract_array(raw).unwrap();
        assert_eq!(items[0]["endpoint"], "http://x/users");
        assert_eq!(method, Extraction::Cleaned(CleanedFrom::FirstArrayLiteral));
    }

    #[test]
    fn test_array_nested_in_object_is_found() {
        assert!(extract_array(r#"{"tests": []}"#).is_some());
        assert!(extract_array(r#"{"tests": 1}"#).is_none());
    }

    #[test]
    fn test_unparsable_output() {
        assert!(extract_array("I cannot help with that.").is_none());
        assert!(extract_array("").is_none());
        assert!(extract_array("] backwards [").is_none());
    }
}
