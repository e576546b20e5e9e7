use crate::constants;
use crate::error::Error;
use crate::model::HttpMethod;
use crate::spec::models::{
    ApiSpecification, Endpoint, Operation, Parameter, ResponseSpec, SpecInfo,
};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::str::FromStr;
use tracing::debug;

/// Parses raw specification documents and checks the structure the generator relies on
#[derive(Debug, Default, Clone, Copy)]
pub struct SpecValidator;

impl SpecValidator {
    /// Creates a new `SpecValidator` instance
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Parses JSON or YAML text and validates it.
    ///
    /// # Errors
    ///
    /// Returns `Error::SpecFormat` if the text is not parseable and
    /// `Error::SpecSchema` if it has no `paths` mapping.
    pub fn validate(&self, raw: &str) -> Result<ApiSpecification, Error> {
        let document = parse_document(raw)?;
        self.validate_value(document)
    }

    /// Validates an already parsed document.
    ///
    /// # Errors
    ///
    /// Returns `Error::SpecSchema` if `paths` is absent, null, or not a mapping,
    /// or if a path item is not a mapping. Malformed operation details are
    /// skipped rather than rejected.
    pub fn validate_value(&self, document: Value) -> Result<ApiSpecification, Error> {
        let Value::Object(root) = &document else {
            return Err(Error::spec_schema(format!(
                "specification root must be a mapping, found {}",
                kind_of(&document)
            )));
        };

        let paths = match root.get(constants::FIELD_PATHS) {
            None | Some(Value::Null) => {
                return Err(Error::spec_schema("missing 'paths' mapping"));
            }
            Some(Value::Object(paths)) => paths,
            Some(other) => {
                return Err(Error::spec_schema(format!(
                    "'paths' must be a mapping, found {}",
                    kind_of(other)
                )));
            }
        };

        let info = root
            .get(constants::FIELD_INFO)
            .and_then(|info| serde_json::from_value::<SpecInfo>(info.clone()).ok())
            .unwrap_or_default();

        let endpoints = collect_endpoints(paths)?;

        debug!(
            target: "apiprobe::spec",
            title = %info.title,
            operations = endpoints.len(),
            "Validated specification"
        );

        Ok(ApiSpecification::new(info, endpoints, document))
    }
}

fn collect_endpoints(paths: &Map<String, Value>) -> Result<Vec<Endpoint>, Error> {
    let mut endpoints = Vec::new();

    for (path, item) in paths {
        let Value::Object(methods) = item else {
            return Err(Error::spec_schema(format!(
                "path '{path}' must map HTTP methods to operations, found {}",
                kind_of(item)
            )));
        };

        for (key, raw_operation) in methods {
            let Ok(method) = HttpMethod::from_str(key) else {
                debug!(
                    target: "apiprobe::spec",
                    "Skipping '{key}' under '{path}': not a supported operation method"
                );
                continue;
            };

            let operation = parse_operation(raw_operation, method, path);

            endpoints.push(Endpoint {
                path: path.clone(),
                method,
                operation,
            });
        }
    }

    Ok(endpoints)
}

/// Reads an operation field by field, dropping entries that do not have the expected shape
fn parse_operation(raw: &Value, method: HttpMethod, path: &str) -> Operation {
    let fields = match raw {
        Value::Object(fields) => fields,
        Value::Null => return Operation::default(),
        other => {
            debug!(
                target: "apiprobe::spec",
                "Treating {method} {path} as empty: operation is {}",
                kind_of(other)
            );
            return Operation::default();
        }
    };

    let text = |key: &str| fields.get(key).and_then(Value::as_str).map(str::to_string);

    let parameters = match fields.get(constants::FIELD_PARAMETERS) {
        Some(Value::Array(entries)) => entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                serde_json::from_value::<Parameter>(entry.clone())
                    .map_err(|e| {
                        debug!(
                            target: "apiprobe::spec",
                            "Skipping parameter {index} of {method} {path}: {e}"
                        );
                    })
                    .ok()
            })
            .collect(),
        _ => Vec::new(),
    };

    let responses = match fields.get(constants::FIELD_RESPONSES) {
        Some(Value::Object(entries)) => entries
            .iter()
            .filter_map(|(status, entry)| {
                serde_json::from_value::<ResponseSpec>(entry.clone())
                    .map(|response| (status.clone(), response))
                    .map_err(|e| {
                        debug!(
                            target: "apiprobe::spec",
                            "Skipping response '{status}' of {method} {path}: {e}"
                        );
                    })
                    .ok()
            })
            .collect(),
        _ => IndexMap::new(),
    };

    Operation {
        operation_id: text("operationId"),
        summary: text("summary"),
        parameters,
        responses,
    }
}

/// Parses the raw text as JSON when it looks like JSON, otherwise as YAML
fn parse_document(raw: &str) -> Result<Value, Error> {
    let trimmed = raw.trim_start();
    if trimmed.trim_end().is_empty() {
        return Err(Error::spec_format("specification is empty"));
    }

    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return serde_json::from_str(trimmed)
            .map_err(|e| Error::spec_format(format!("invalid JSON: {e}")));
    }

    let yaml: serde_yaml::Value =
        serde_yaml::from_str(raw).map_err(|e| Error::spec_format(format!("invalid YAML: {e}")))?;
    yaml_to_json(yaml)
}

/// Converts a YAML value to JSON, stringifying scalar mapping keys such as `200:`
fn yaml_to_json(value: serde_yaml::Value) -> Result<Value, Error> {
    use serde_yaml::Value as Yaml;

    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<Result<_, _>>()?,
        ),
        Yaml::Mapping(mapping) => {
            let mut object = Map::new();
            for (key, value) in mapping {
                let key = match key {
                    Yaml::String(s) => s,
                    Yaml::Number(n) => n.to_string(),
                    Yaml::Bool(b) => b.to_string(),
                    other => {
                        return Err(Error::spec_format(format!(
                            "unsupported mapping key: {other:?}"
                        )));
                    }
                };
                object.insert(key, yaml_to_json(value)?);
            }
            Value::Object(object)
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_json_spec() {
        let raw = r#"{
            "openapi": "3.0.0",
            "info": {"title": "Users", "version": "1.0.0"},
            "paths": {
                "/users": {
                    "get": {"responses": {"200": {"description": "OK"}}},
                    "post": {"responses": {"201": {"description": "Created"}}}
                }
            }
        }"#;

        let spec = SpecValidator::new().validate(raw).unwrap();
        assert_eq!(spec.info().title, "Users");
        assert_eq!(spec.endpoints().len(), 2);
        assert_eq!(spec.endpoints()[0].method, HttpMethod::Get);
        assert_eq!(spec.endpoints()[1].method, HttpMethod::Post);
    }

    #[test]
    fn test_validate_yaml_spec_with_numeric_status_keys() {
        let raw = r"
openapi: 3.0.0
info:
  title: Pets
  version: 2.0.0
paths:
  /pets/{id}:
    get:
      parameters:
        - name: id
          in: path
          required: true
          schema:
            type: integer
      responses:
        200:
          description: A pet
";

        let spec = SpecValidator::new().validate(raw).unwrap();
        let endpoint = &spec.endpoints()[0];
        assert_eq!(endpoint.path, "/pets/{id}");
        assert_eq!(endpoint.operation.parameters[0].schema_type(), Some("integer"));
        assert_eq!(
            endpoint.operation.response_for(200).unwrap().description.as_deref(),
            Some("A pet")
        );
    }

    #[test]
    fn test_declaration_order_is_preserved() {
        let raw = r#"{"paths": {
            "/zebra": {"delete": {}, "get": {}},
            "/alpha": {"patch": {}}
        }}"#;

        let spec = SpecValidator::new().validate(raw).unwrap();
        let order: Vec<_> = spec
            .endpoints()
            .iter()
            .map(|e| format!("{} {}", e.method, e.path))
            .collect();
        assert_eq!(order, vec!["DELETE /zebra", "GET /zebra", "PATCH /alpha"]);
    }

    #[test]
    fn test_non_operation_keys_are_skipped() {
        let raw = r#"{"paths": {"/users": {
            "summary": "Users",
            "parameters": [],
            "head": {},
            "get": {}
        }}}"#;

        let spec = SpecValidator::new().validate(raw).unwrap();
        assert_eq!(spec.endpoints().len(), 1);
    }

    #[test]
    fn test_empty_operation_still_counts() {
        let spec = SpecValidator::new()
            .validate("paths:\n  /health:\n    get:\n")
            .unwrap();
        assert_eq!(spec.endpoints().len(), 1);
        assert_eq!(spec.endpoints()[0].method, HttpMethod::Get);
        assert_eq!(spec.endpoints()[0].operation, Operation::default());
    }

    #[test]
    fn test_malformed_operation_entries_are_skipped() {
        let raw = r#"{"paths": {"/u": {
            "get": {
                "parameters": [
                    {"name": "id", "in": "path", "required": true},
                    "not-a-parameter",
                    {"name": "q", "in": "query", "required": "yes"}
                ],
                "responses": {"200": "OK", "404": {"description": "Missing"}}
            },
            "post": "create"
        }}}"#;

        let spec = SpecValidator::new().validate(raw).unwrap();
        assert_eq!(spec.endpoints().len(), 2);
        let get = &spec.endpoints()[0].operation;
        assert_eq!(get.parameters.len(), 1);
        assert_eq!(get.parameters[0].name, "id");
        assert!(get.response_for(200).is_none());
        assert_eq!(
            get.response_for(404).unwrap().description.as_deref(),
            Some("Missing")
        );
        assert_eq!(spec.endpoints()[1].operation, Operation::default());
    }

    #[test]
    fn test_unparseable_text_is_format_error() {
        let err = SpecValidator::new().validate("{ not json").unwrap_err();
        assert!(matches!(err, Error::SpecFormat { .. }));

        let err = SpecValidator::new().validate("   ").unwrap_err();
        assert!(matches!(err, Error::SpecFormat { .. }));
    }

    #[test]
    fn test_missing_paths_is_schema_error() {
        let err = SpecValidator::new()
            .validate(r#"{"invalid": "spec"}"#)
            .unwrap_err();
        assert!(matches!(err, Error::SpecSchema { .. }));

        let err = SpecValidator::new()
            .validate(r#"{"paths": null}"#)
            .unwrap_err();
        assert!(matches!(err, Error::SpecSchema { .. }));
    }

    #[test]
    fn test_paths_must_be_a_mapping() {
        let err = SpecValidator::new()
            .validate(r#"{"paths": ["/users"]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("'paths' must be a mapping"));
    }

    #[test]
    fn test_serializes_back_to_original_document() {
        let raw = r#"{"openapi":"3.0.0","paths":{"/a":{"get":{"x-extra":true}}}}"#;
        let spec = SpecValidator::new().validate(raw).unwrap();
        assert_eq!(serde_json::to_string(&spec).unwrap(), raw);
    }
}
