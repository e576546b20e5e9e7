use super::extract::extract_array;
use super::gate::screen;
use super::{GenerationFailure, GenerationStrategy};
use crate::model::{GenerationSource, TestCase};
use crate::provider::TextGenerator;
use crate::spec::ApiSpecification;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

const INSTRUCTIONS: &str = r#"You are a QA automation engineer. Write HTTP test cases for the API specification below.

Only use endpoints, parameters and status codes that the specification declares. For each operation cover:
1. the happy path
2. each declared error response
3. edge cases for declared parameters
4. input validation for declared parameters

Each test case is a JSON object of this shape:
{
  "name": "descriptive test name",
  "endpoint": "/path/with/values/substituted",
  "method": "GET | POST | PUT | DELETE | PATCH",
  "params": { "declaredParameter": "value" },
  "expectedStatus": 200,
  "assertions": ["status code should be 200"]
}

Assertions must use these forms:
- status code should be <code>
- contains "<text>"
- has property "<name>"
- array length should be <n>

Respond with a single JSON array of test cases and nothing else.

Specification:
"#;

/// Builds the prompt sent to the text generator
#[must_use]
pub fn build_prompt(spec: &ApiSpecification) -> String {
    format!("{INSTRUCTIONS}{}", spec.to_text())
}

/// Asks a text generator for test cases and keeps the well-formed ones
pub struct AiStrategy {
    backend: Arc<dyn TextGenerator>,
}

impl AiStrategy {
    #[must_use]
    pub fn new(backend: Arc<dyn TextGenerator>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl GenerationStrategy for AiStrategy {
    fn source(&self) -> GenerationSource {
        GenerationSource::Ai
    }

    async fn generate(&self, spec: &ApiSpecification) -> Result<Vec<TestCase>, GenerationFailure> {
        let raw = self.backend.generate(&build_prompt(spec)).await?;

        let (candidates, method) = extract_array(&raw).ok_or(GenerationFailure::Unparsable)?;
        debug!(
            target: "apiprobe::generation",
            backend = self.backend.name(),
            ?method,
            candidates = candidates.len(),
            "Extracted candidates"
        );

        let total = candidates.len();
        let screened = screen(candidates);
        if screened.accepted.is_empty() {
            return Err(GenerationFailure::NoValidCases { candidates: total });
        }
        if screened.rejected > 0 {
            info!(
                target: "apiprobe::generation",
                rejected = screened.rejected,
                accepted = screened.accepted.len(),
                "Dropped malformed candidates"
            );
        }
        Ok(screened.accepted)
    }
}
