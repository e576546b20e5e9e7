use crate::model::HttpMethod;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// The `info` block of a specification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A declared operation parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "in", default)]
    pub location: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<ParameterSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Either a single type name or, in newer specs, a list of type names
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<Value>,
}

impl Parameter {
    /// Returns the declared schema type, taking the first non-null entry of a type list
    #[must_use]
    pub fn schema_type(&self) -> Option<&str> {
        match self.schema.as_ref()?.schema_type.as_ref()? {
            Value::String(t) => Some(t.as_str()),
            Value::Array(types) => types
                .iter()
                .filter_map(Value::as_str)
                .find(|t| *t != "null"),
            _ => None,
        }
    }
}

/// A declared response for one status code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub responses: indexmap::IndexMap<String, ResponseSpec>,
}

impl Operation {
    /// Looks up the declared response for a status code
    #[must_use]
    pub fn response_for(&self, status: u16) -> Option<&ResponseSpec> {
        self.responses.get(status.to_string().as_str())
    }
}

/// One (path, method, operation) triple in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub path: String,
    pub method: HttpMethod,
    pub operation: Operation,
}

/// A validated API specification.
///
/// Keeps the caller's original document so it can be echoed back verbatim
/// (e.g. as part of a suite configuration) and handed to the text generator.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiSpecification {
    info: SpecInfo,
    endpoints: Vec<Endpoint>,
    document: Value,
}

impl ApiSpecification {
    pub(crate) const fn new(info: SpecInfo, endpoints: Vec<Endpoint>, document: Value) -> Self {
        Self {
            info,
            endpoints,
            document,
        }
    }

    #[must_use]
    pub const fn info(&self) -> &SpecInfo {
        &self.info
    }

    /// All operations in the order they are declared in the document
    #[must_use]
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    #[must_use]
    pub const fn document(&self) -> &Value {
        &self.document
    }

    /// Serializes the original document as pretty JSON text
    #[must_use]
    pub fn to_text(&self) -> String {
        serde_json::to_string_pretty(&self.document).unwrap_or_else(|_| self.document.to_string())
    }
}

impl Serialize for ApiSpecification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.document.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ApiSpecification {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let document = Value::deserialize(deserializer)?;
        super::SpecValidator::new()
            .validate_value(document)
            .map_err(serde::de::Error::custom)
    }
}
