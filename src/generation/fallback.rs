use super::{GenerationFailure, GenerationStrategy};
use crate::config::models::FallbackSettings;
use crate::constants;
use crate::model::{GenerationSource, HttpMethod, TestCase};
use crate::spec::{ApiSpecification, Endpoint};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Emits one success case per declared operation, in declaration order.
///
/// Output depends only on the specification and the settings, so the same
/// input always yields the same cases.
#[derive(Debug, Clone, Default)]
pub struct DeterministicStrategy {
    settings: FallbackSettings,
}

impl DeterministicStrategy {
    #[must_use]
    pub const fn new(settings: FallbackSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn cases_for(&self, spec: &ApiSpecification) -> Vec<TestCase> {
        spec.endpoints()
            .iter()
            .map(|endpoint| self.case_for(endpoint))
            .collect()
    }

    fn case_for(&self, endpoint: &Endpoint) -> TestCase {
        let expected_status = if endpoint.method == HttpMethod::Post {
            201
        } else {
            200
        };

        let mut params = Map::new();
        let mut path = endpoint.path.clone();
        for parameter in &endpoint.operation.parameters {
            let is_path = parameter.location == constants::PARAM_LOCATION_PATH;
            if !parameter.required && !is_path {
                continue;
            }
            let value = self.settings.value_for(parameter.schema_type());
            if is_path {
                path = path.replace(
                    &format!("{{{}}}", parameter.name),
                    &urlencoding::encode(&scalar_text(&value)),
                );
            }
            if parameter.required {
                params.insert(parameter.name.clone(), value);
            }
        }

        let mut assertions = vec![format!("status code should be {expected_status}")];
        if self.settings.description_assertions {
            if let Some(description) = endpoint
                .operation
                .response_for(expected_status)
                .and_then(|response| response.description.as_deref())
                .filter(|d| !d.trim().is_empty())
            {
                assertions.push(format!("contains \"{description}\""));
            }
        }

        TestCase {
            name: format!("{} {} returns {expected_status}", endpoint.method, endpoint.path),
            endpoint: path,
            method: endpoint.method,
            params,
            expected_status,
            assertions,
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl GenerationStrategy for DeterministicStrategy {
    fn source(&self) -> GenerationSource {
        GenerationSource::Fallback
    }

    async fn generate(&self, spec: &ApiSpecification) -> Result<Vec<TestCase>, GenerationFailure> {
        Ok(self.cases_for(spec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::SpecValidator;

    const SPEC: &str = r#"{
        "openapi": "3.0.0",
        "info": {"title": "Users", "version": "1.0.0"},
        "paths": {
            "/users": {
                "get": {
                    "parameters": [
                        {"name": "limit", "in": "query", "schema": {"type": "integer"}},
                        {"name": "active", "in": "query", "required": true, "schema": {"type": "boolean"}}
                    ],
                    "responses": {"200": {"description": "List of users"}}
                },
                "post": {"responses": {"201": {"description": "Created"}, "400": {"description": "Bad"}}}
            },
            "/users/{id}": {
                "get": {
                    "parameters": [{"name": "id", "in": "path", "required": true, "schema": {"type": "integer"}}],
                    "responses": {"404": {"description": "Not found"}}
                },
                "delete": {
                    "parameters": [{"name": "id", "in": "path", "required": true, "schema": {"type": "string"}}]
                }
            }
        }
    }"#;

    fn cases(settings: FallbackSettings) -> Vec<TestCase> {
        let spec = SpecValidator::new().validate(SPEC).unwrap();
        DeterministicStrategy::new(settings).cases_for(&spec)
    }

    #[test]
    fn test_one_case_per_operation_in_declaration_order() {
        let cases = cases(FallbackSettings::default());
        let summary: Vec<_> = cases
            .iter()
            .map(|c| (c.method, c.endpoint.as_str(), c.expected_status))
            .collect();
        assert_eq!(
            summary,
            vec![
                (HttpMethod::Get, "/users", 200),
                (HttpMethod::Post, "/users", 201),
                (HttpMethod::Get, "/users/1", 200),
                (HttpMethod::Delete, "/users/test", 200),
            ]
        );
    }

    #[test]
    fn test_only_required_parameters_are_synthesized() {
        let cases = cases(FallbackSettings::default());
        assert_eq!(cases[0].params.len(), 1);
        assert_eq!(cases[0].params["active"], true);
        assert_eq!(cases[2].params["id"], 1);
    }

    #[test]
    fn test_baseline_assertion_only_by_default() {
        assert!(cases(FallbackSettings::default())
            .iter()
            .all(|c| c.assertions == vec![format!("status code should be {}", c.expected_status)]));
    }

    #[test]
    fn test_assertions_use_matching_response_description() {
        let cases = cases(FallbackSettings {
            description_assertions: true,
            ..FallbackSettings::default()
        });
        assert_eq!(
            cases[0].assertions,
            vec!["status code should be 200", "contains \"List of users\""]
        );
        assert_eq!(
            cases[1].assertions,
            vec!["status code should be 201", "contains \"Created\""]
        );
        // no declared 200 response
        assert_eq!(cases[2].assertions, vec!["status code should be 200"]);
    }

    #[test]
    fn test_output_is_deterministic() {
        let first = serde_json::to_string(&cases(FallbackSettings::default())).unwrap();
        let second = serde_json::to_string(&cases(FallbackSettings::default())).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_path_values_are_url_encoded() {
        let settings = FallbackSettings {
            string: "a b/c".into(),
            ..FallbackSettings::default()
        };
        assert_eq!(cases(settings)[3].endpoint, "/users/a%20b%2Fc");
    }
}
