//! Test-case synthesis
//!
//! Generation runs in two stages. The AI-assisted stage asks a text generator
//! for candidates, extracts an array from its output and screens each
//! candidate. If that stage fails for any reason, the deterministic stage
//! emits one success case per declared operation. Failures of the first stage
//! are logged and never reach the caller.

pub mod ai;
pub mod extract;
pub mod fallback;
pub mod gate;

pub use ai::AiStrategy;
pub use fallback::DeterministicStrategy;

use crate::config::models::FallbackSettings;
use crate::error::Error;
use crate::model::{GenerationSource, TestCase};
use crate::provider::{ProviderError, TextGenerator};
use crate::spec::{ApiSpecification, SpecValidator};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Why a generation stage produced nothing usable
#[derive(Debug, Error)]
pub enum GenerationFailure {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("generator output contained no JSON array")]
    Unparsable,
    #[error("none of the {candidates} candidates were valid test cases")]
    NoValidCases { candidates: usize },
}

#[async_trait]
pub trait GenerationStrategy: Send + Sync {
    fn source(&self) -> GenerationSource;

    async fn generate(&self, spec: &ApiSpecification) -> Result<Vec<TestCase>, GenerationFailure>;
}

/// Cases produced by one `generate` call, with the stage that produced them
#[derive(Debug, Clone)]
pub struct Generated {
    pub test_cases: Vec<Arc<TestCase>>,
    pub source: GenerationSource,
}

/// Tries the primary strategy, if any, and falls back on any failure
pub struct TestCaseGenerator {
    primary: Option<Arc<dyn GenerationStrategy>>,
    fallback: Arc<dyn GenerationStrategy>,
}

impl TestCaseGenerator {
    #[must_use]
    pub fn new(
        primary: Option<Arc<dyn GenerationStrategy>>,
        fallback: Arc<dyn GenerationStrategy>,
    ) -> Self {
        Self { primary, fallback }
    }

    /// A generator that only ever uses the deterministic stage
    #[must_use]
    pub fn deterministic(settings: FallbackSettings) -> Self {
        Self::new(None, Arc::new(DeterministicStrategy::new(settings)))
    }

    /// A generator that asks `backend` first and falls back to the deterministic stage
    #[must_use]
    pub fn with_text_generator(backend: Arc<dyn TextGenerator>, settings: FallbackSettings) -> Self {
        Self::new(
            Some(Arc::new(AiStrategy::new(backend))),
            Arc::new(DeterministicStrategy::new(settings)),
        )
    }

    /// Generates test cases for a validated specification.
    ///
    /// Returns an empty list only when the specification declares no operations.
    pub async fn generate(&self, spec: &ApiSpecification) -> Generated {
        if spec.endpoints().is_empty() {
            info!(target: "apiprobe::generation", "Specification declares no operations");
            return Generated {
                test_cases: Vec::new(),
                source: self.fallback.source(),
            };
        }

        if let Some(primary) = &self.primary {
            match primary.generate(spec).await {
                Ok(cases) => return Self::finish(cases, primary.source()),
                Err(e) => warn!(
                    target: "apiprobe::generation",
                    error = %e,
                    "Primary generation failed, using fallback"
                ),
            }
        }

        match self.fallback.generate(spec).await {
            Ok(cases) => Self::finish(cases, self.fallback.source()),
            Err(e) => {
                warn!(target: "apiprobe::generation", error = %e, "Fallback generation failed");
                Self::finish(Vec::new(), self.fallback.source())
            }
        }
    }

    /// Validates raw specification text, then generates cases for it.
    ///
    /// # Errors
    ///
    /// Returns `Error::SpecFormat` or `Error::SpecSchema` if the text is not a
    /// valid specification.
    pub async fn generate_from_text(
        &self,
        raw: &str,
    ) -> Result<(ApiSpecification, Generated), Error> {
        let spec = SpecValidator::new().validate(raw)?;
        let generated = self.generate(&spec).await;
        Ok((spec, generated))
    }

    fn finish(cases: Vec<TestCase>, source: GenerationSource) -> Generated {
        info!(
            target: "apiprobe::generation",
            %source,
            count = cases.len(),
            "Generated test cases"
        );
        Generated {
            test_cases: cases.into_iter().map(Arc::new).collect(),
            source,
        }
    }
}
