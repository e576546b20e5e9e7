//! Shared test utilities

#![allow(dead_code)]

use apiprobe::spec::{ApiSpecification, SpecValidator};
use std::path::PathBuf;

/// Cached binary path for the apiprobe CLI to avoid repeated lookups
#[allow(deprecated)]
pub static APIPROBE_BIN: std::sync::LazyLock<PathBuf> =
    std::sync::LazyLock::new(|| assert_cmd::cargo::cargo_bin("apiprobe"));

/// Test helper to create a command with the cached binary
pub fn apiprobe_cmd() -> assert_cmd::Command {
    assert_cmd::Command::new(&*APIPROBE_BIN)
}

/// A small users API: list, create, fetch, delete
pub const USERS_SPEC: &str = r#"openapi: 3.0.0
info:
  title: Users API
  version: 1.0.0
paths:
  /users:
    get:
      summary: List users
      responses:
        "200":
          description: A list of users
    post:
      summary: Create a user
      responses:
        "201":
          description: Created
  /users/{id}:
    get:
      parameters:
        - name: id
          in: path
          required: true
          schema:
            type: integer
      responses:
        "200":
          description: One user
        "404":
          description: Not found
    delete:
      parameters:
        - name: id
          in: path
          required: true
          schema:
            type: integer
      responses:
        "204":
          description: Deleted
"#;

/// Only `GET /users`, declared to return the two users below
pub const LIST_USERS_SPEC: &str = r#"{
  "openapi": "3.0.0",
  "info": {"title": "Users API", "version": "1.0.0"},
  "paths": {
    "/users": {
      "get": {"responses": {"200": {"description": "Array of users"}}}
    }
  }
}"#;

pub fn two_users() -> serde_json::Value {
    serde_json::json!([
        {"id": 1, "name": "John Doe", "email": "john@example.com"},
        {"id": 2, "name": "Jane Smith", "email": "jane@example.com"}
    ])
}

pub fn parse_spec(text: &str) -> ApiSpecification {
    SpecValidator::new().validate(text).unwrap()
}
