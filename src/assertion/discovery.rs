use super::body::{type_name, BodyShape};
use super::AssertionResult;
use crate::constants;
use crate::model::ResponseSnapshot;
use serde_json::{Map, Value};

/// Derives diagnostic assertions from the shape of a response.
///
/// The first entry always compares the observed status with `expected_status`.
/// Body-shape checks follow, and a content-type check closes the list when the
/// response carries a content type.
#[must_use]
pub fn auto_discover(response: &ResponseSnapshot, expected_status: u16) -> Vec<AssertionResult> {
    let mut assertions = vec![AssertionResult::auto(
        format!("Status code is {expected_status}"),
        response.status == expected_status,
    )
    .with_actual(response.status)
    .with_expected(expected_status)];

    match BodyShape::of(&response.body) {
        BodyShape::Array(items) => {
            assertions.push(
                AssertionResult::auto("Response is an array", true)
                    .with_actual(format!("array with {} items", items.len())),
            );
            match items.first() {
                None => assertions.push(AssertionResult::auto("Array is empty", true)),
                Some(Value::Object(first)) => {
                    assertions.push(
                        AssertionResult::auto("Array items have properties", !first.is_empty())
                            .with_actual(property_list(first)),
                    );
                    for field in present_fields(first) {
                        assertions.push(AssertionResult::auto(
                            format!("Array items have '{field}' property"),
                            true,
                        ));
                    }
                }
                Some(_) => {}
            }
        }
        BodyShape::Object(map) => {
            assertions.push(
                AssertionResult::auto("Response is an object", true)
                    .with_actual(format!("object with {} properties", map.len())),
            );
            assertions.push(
                AssertionResult::auto("Object has properties", !map.is_empty())
                    .with_actual(property_list(map)),
            );
            for field in present_fields(map) {
                assertions.push(
                    AssertionResult::auto(format!("Object has '{field}' property"), true)
                        .with_actual(map[field].clone()),
                );
            }
        }
        BodyShape::Null => {
            let is_error = response.status >= 400;
            assertions.push(
                AssertionResult::auto("Response is empty", is_error)
                    .with_actual("no data")
                    .with_expected(if is_error {
                        "no data (error response)"
                    } else {
                        "some data"
                    }),
            );
        }
        BodyShape::Primitive(value) => {
            let kind = type_name(value);
            assertions.push(
                AssertionResult::auto(format!("Response is {kind}"), true)
                    .with_actual(value.clone())
                    .with_expected(kind),
            );
        }
    }

    if let Some(content_type) = response.content_type() {
        assertions.push(
            AssertionResult::auto(
                format!("Content-Type is {content_type}"),
                constants::is_supported_content_type(content_type),
            )
            .with_actual(content_type),
        );
    }

    assertions
}

fn present_fields(object: &Map<String, Value>) -> impl Iterator<Item = &'static str> + '_ {
    constants::WELL_KNOWN_FIELDS
        .into_iter()
        .filter(|field| object.contains_key(*field))
}

fn property_list(object: &Map<String, Value>) -> String {
    object.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
}
