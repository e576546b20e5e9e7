//! API specification parsing and validation
//!
//! A specification is a document with a `paths` mapping of
//! path -> HTTP method -> operation. Only the parts the test generator
//! needs are modelled; the original document is kept alongside.

pub mod models;
pub mod validator;

pub use models::{ApiSpecification, Endpoint, Operation, Parameter, ResponseSpec, SpecInfo};
pub use validator::SpecValidator;
