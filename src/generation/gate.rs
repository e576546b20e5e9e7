//! Structural validation of generator candidates

use crate::model::{HttpMethod, TestCase};
use serde_json::{Map, Value};
use std::str::FromStr;
use tracing::trace;

/// Outcome of filtering a candidate list
#[derive(Debug, Default)]
pub struct Screened {
    pub accepted: Vec<TestCase>,
    pub rejected: usize,
}

/// Keeps the candidates that are well-formed test cases, in order.
///
/// A candidate must be an object where `name` and `endpoint` are non-empty
/// strings, `method` upper-cases to a supported verb, `expectedStatus` is a
/// number that is a valid status code, `assertions` is an array of strings and
/// `params`, when present, is an object.
#[must_use]
pub fn screen(candidates: Vec<Value>) -> Screened {
    let mut screened = Screened::default();
    for (index, candidate) in candidates.into_iter().enumerate() {
        match admit(candidate) {
            Ok(case) => screened.accepted.push(case),
            Err(reason) => {
                trace!(target: "apiprobe::generation", index, reason, "Rejected candidate");
                screened.rejected += 1;
            }
        }
    }
    screened
}

fn admit(candidate: Value) -> Result<TestCase, &'static str> {
    let Value::Object(mut fields) = candidate else {
        return Err("not an object");
    };

    let name = non_empty_text(&mut fields, "name")?;
    let endpoint = non_empty_text(&mut fields, "endpoint")?;

    let method = match fields.get("method") {
        Some(Value::String(m)) => HttpMethod::from_str(m).map_err(|_| "unsupported method")?,
        _ => return Err("method is not text"),
    };

    let expected_status = fields
        .get("expectedStatus")
        .and_then(status_code)
        .ok_or("expectedStatus is not a status code")?;

    let assertions = match fields.remove("assertions") {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(text) => Ok(text),
                _ => Err("assertion is not text"),
            })
            .collect::<Result<Vec<_>, _>>()?,
        _ => return Err("assertions is not an array"),
    };

    let params = match fields.remove("params") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(params)) => params,
        Some(_) => return Err("params is not an object"),
    };

    Ok(TestCase {
        name,
        endpoint,
        method,
        params,
        expected_status,
        assertions,
    })
}

fn non_empty_text(fields: &mut Map<String, Value>, key: &str) -> Result<String, &'static str> {
    match fields.remove(key) {
        Some(Value::String(text)) if !text.trim().is_empty() => Ok(text),
        _ => Err("required text field is missing or empty"),
    }
}

/// Accepts integral numbers in the u16 range, including `200.0`
fn status_code(value: &Value) -> Option<u16> {
    let number = value.as_number()?;
    if let Some(n) = number.as_u64() {
        return u16::try_from(n).ok();
    }
    let f = number.as_f64()?;
    if f.fract() == 0.0 && (0.0..=f64::from(u16::MAX)).contains(&f) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        return Some(f as u16);
    }
    None
}
