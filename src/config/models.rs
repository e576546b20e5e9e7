use crate::constants;
use crate::engine::verdict::VerdictPolicy;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GlobalConfig {
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default)]
    pub verdict: VerdictPolicy,
    #[serde(default)]
    pub fallback: FallbackSettings,
    #[serde(default)]
    pub generator: GeneratorSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub suite: SuiteSettings,
}

const fn default_request_timeout_secs() -> u64 {
    constants::DEFAULT_REQUEST_TIMEOUT_SECS
}

const fn default_connect_timeout_secs() -> u64 {
    constants::DEFAULT_CONNECT_TIMEOUT_SECS
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            verdict: VerdictPolicy::default(),
            fallback: FallbackSettings::default(),
            generator: GeneratorSettings::default(),
            server: ServerSettings::default(),
            store: StoreSettings::default(),
            suite: SuiteSettings::default(),
        }
    }
}

impl GlobalConfig {
    /// Renders the configuration as TOML
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_toml(&self) -> Result<String, Error> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::invalid_config(format!("failed to serialize configuration: {e}")))
    }
}

/// Placeholder values the deterministic generator uses for required parameters
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FallbackSettings {
    pub integer: i64,
    pub string: String,
    pub boolean: bool,
    /// Used for any other declared type, or when no type is declared
    pub other: String,
    /// Add a `contains "<description>"` assertion when the response declares one
    pub description_assertions: bool,
}

impl Default for FallbackSettings {
    fn default() -> Self {
        Self {
            integer: 1,
            string: "test".to_string(),
            boolean: true,
            other: "test".to_string(),
            description_assertions: false,
        }
    }
}

impl FallbackSettings {
    /// The default value for a declared schema type
    #[must_use]
    pub fn value_for(&self, schema_type: Option<&str>) -> Value {
        match schema_type {
            Some(constants::SCHEMA_TYPE_INTEGER) => Value::from(self.integer),
            Some(constants::SCHEMA_TYPE_STRING) => Value::from(self.string.as_str()),
            Some(constants::SCHEMA_TYPE_BOOLEAN) => Value::from(self.boolean),
            _ => Value::from(self.other.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Disables the AI-assisted stage entirely when false
    pub enabled: bool,
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            model: constants::DEFAULT_GEMINI_MODEL.to_string(),
            api_key_env: constants::ENV_GEMINI_API_KEY.to_string(),
            endpoint: constants::DEFAULT_GEMINI_ENDPOINT.to_string(),
            timeout_secs: constants::DEFAULT_GENERATOR_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: constants::DEFAULT_SERVER_HOST.to_string(),
            port: constants::DEFAULT_SERVER_PORT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoreSettings {
    /// Records older than this are evicted; kept until exit when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SuiteSettings {
    /// Upper bound on in-flight requests per suite; unbounded when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrency: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config, GlobalConfig::default());
        assert_eq!(config.request_timeout_secs, 30);
        assert!((config.verdict.auto_pass_rate - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config: GlobalConfig = toml::from_str(
            r#"
            [fallback]
            string = "sample"

            [suite]
            max_concurrency = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.fallback.string, "sample");
        assert_eq!(config.fallback.integer, 1);
        assert_eq!(config.suite.max_concurrency, Some(4));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_fallback_value_for_type() {
        let settings = FallbackSettings::default();
        assert_eq!(settings.value_for(Some("integer")), Value::from(1));
        assert_eq!(settings.value_for(Some("string")), Value::from("test"));
        assert_eq!(settings.value_for(Some("boolean")), Value::from(true));
        assert_eq!(settings.value_for(Some("array")), Value::from("test"));
        assert_eq!(settings.value_for(None), Value::from("test"));
    }

    #[test]
    fn test_to_toml_round_trips() {
        let config = GlobalConfig::default();
        let text = config.to_toml().unwrap();
        let parsed: GlobalConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
