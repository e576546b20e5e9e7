pub mod assertion;
pub mod cli;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod fs;
pub mod generation;
pub mod http_client;
pub mod logging;
pub mod model;
pub mod provider;
pub mod server;
pub mod service;
pub mod spec;
pub mod store;
