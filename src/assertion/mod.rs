//! Assertion evaluation against a live response
//!
//! Two sources of assertions are supported:
//! - explicit assertions: short natural-language predicates such as
//!   `status code should be 200` or `has property "id"`, matched by an
//!   ordered rule table (see [`rules`])
//! - auto-discovered assertions: checks derived from the shape of the
//!   response body itself (see [`discovery`])
//!
//! Neither path ever fails: an assertion that cannot be understood becomes a
//! failing [`AssertionResult`] carrying an explanatory error.

pub mod body;
pub mod discovery;
pub mod rules;

pub use discovery::auto_discover;

use crate::model::ResponseSnapshot;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who authored an assertion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssertionOrigin {
    /// Derived by the engine from the observed response
    Auto,
    /// Written by a user or by the test generator
    Explicit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertionResult {
    pub assertion: String,
    pub origin: AssertionOrigin,
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AssertionResult {
    #[must_use]
    pub fn auto(assertion: impl Into<String>, passed: bool) -> Self {
        Self::new(assertion.into(), AssertionOrigin::Auto, passed)
    }

    #[must_use]
    pub fn explicit(assertion: impl Into<String>, passed: bool) -> Self {
        Self::new(assertion.into(), AssertionOrigin::Explicit, passed)
    }

    const fn new(assertion: String, origin: AssertionOrigin, passed: bool) -> Self {
        Self {
            assertion,
            origin,
            passed,
            actual: None,
            expected: None,
            error: None,
        }
    }

    #[must_use]
    pub fn with_actual(mut self, actual: impl Into<Value>) -> Self {
        self.actual = Some(actual.into());
        self
    }

    #[must_use]
    pub fn with_expected(mut self, expected: impl Into<Value>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    #[must_use]
    pub const fn is_auto(&self) -> bool {
        matches!(self.origin, AssertionOrigin::Auto)
    }
}

/// Evaluates one explicit assertion against a response.
///
/// The first rule family that recognises the text decides the outcome.
/// Unrecognised text yields a failing result with an "unsupported" error.
#[must_use]
pub fn evaluate(assertion: &str, response: &ResponseSnapshot) -> AssertionResult {
    rules::parse(assertion).map_or_else(
        || {
            AssertionResult::explicit(assertion, false)
                .with_error(format!("Unsupported assertion pattern: '{assertion}'"))
        },
        |predicate| predicate.evaluate(assertion, response),
    )
}
