//! Centralized string constants for apiprobe
//!
//! This module contains commonly used string literals to:
//! - Reduce string duplication
//! - Improve maintainability
//! - Ensure consistency across the codebase

// HTTP Headers
pub const HEADER_CONTENT_TYPE_LC: &str = "content-type";

// Content type identifiers
pub const CONTENT_TYPE_IDENTIFIER_JSON: &str = "json";
pub const CONTENT_TYPE_PREFIX_TEXT: &str = "text/";

// Environment Variables
pub const ENV_APIPROBE_CONFIG_DIR: &str = "APIPROBE_CONFIG_DIR";
pub const ENV_APIPROBE_BASE_URL: &str = "APIPROBE_BASE_URL";
pub const ENV_APIPROBE_LOG: &str = "APIPROBE_LOG";
pub const ENV_APIPROBE_LOG_FORMAT: &str = "APIPROBE_LOG_FORMAT";
pub const ENV_APIPROBE_LOG_FILE: &str = "APIPROBE_LOG_FILE";
pub const ENV_APIPROBE_LOG_MAX_BODY: &str = "APIPROBE_LOG_MAX_BODY";
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";

// Error Context Messages
pub const ERR_CONNECTION: &str = "Check that the API server is running and accessible.";
pub const ERR_TIMEOUT: &str = "The API server may be slow or unresponsive. Try again later.";
pub const ERR_FILE_NOT_FOUND: &str = "Check that the file path is correct and the file exists.";
pub const ERR_PERMISSION: &str = "Check file permissions or run with appropriate privileges.";
pub const ERR_YAML_SYNTAX: &str = "Check that your API specification is valid YAML syntax.";
pub const ERR_JSON_SYNTAX: &str = "Check that your request body or specification contains valid JSON.";
pub const ERR_TOML_SYNTAX: &str = "Check that your configuration file is valid TOML syntax.";
pub const ERR_SPEC_FORMAT: &str = "The specification must be a JSON or YAML document.";
pub const ERR_SPEC_SCHEMA: &str =
    "The specification must contain a 'paths' mapping of path -> method -> operation.";
pub const ERR_UNKNOWN_ID: &str = "Check the identifier returned by a previous generate or run call.";

// File names
pub const CONFIG_FILENAME: &str = "config.toml";
pub const CONFIG_DIR_NAME: &str = "apiprobe";

// Schema Types
pub const SCHEMA_TYPE_STRING: &str = "string";
pub const SCHEMA_TYPE_INTEGER: &str = "integer";
pub const SCHEMA_TYPE_BOOLEAN: &str = "boolean";

// HTTP Methods
pub const HTTP_METHOD_GET: &str = "GET";
pub const HTTP_METHOD_POST: &str = "POST";
pub const HTTP_METHOD_PUT: &str = "PUT";
pub const HTTP_METHOD_DELETE: &str = "DELETE";
pub const HTTP_METHOD_PATCH: &str = "PATCH";

// Parameter Locations
pub const PARAM_LOCATION_PATH: &str = "path";

// Specification field names
pub const FIELD_PATHS: &str = "paths";
pub const FIELD_INFO: &str = "info";
pub const FIELD_PARAMETERS: &str = "parameters";
pub const FIELD_RESPONSES: &str = "responses";

// Well-known response fields checked by auto-discovery
pub const WELL_KNOWN_FIELDS: [&str; 6] = ["id", "name", "title", "email", "userId", "createdAt"];

// Body locations searched for array-length assertions
pub const ARRAY_LOCATIONS: [&str; 2] = ["results", "data"];

// Default Values
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_AUTO_PASS_RATE: f64 = 0.8;
pub const DEFAULT_EXPLICIT_PASS_RATE: f64 = 0.5;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GENERATOR_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";
pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_LOG_MAX_BODY: usize = 1000;

/// Check if a content type is JSON or belongs to the `text/*` family
#[must_use]
pub fn is_supported_content_type(content_type: &str) -> bool {
    let ct = content_type.to_lowercase();
    ct.contains(CONTENT_TYPE_IDENTIFIER_JSON) || ct.contains(CONTENT_TYPE_PREFIX_TEXT)
}
