//! Test execution: one case at a time ([`executor`]), whole suites
//! ([`runner`]) and the pass/fail policy ([`verdict`]).

pub mod executor;
pub mod runner;
pub mod verdict;

pub use executor::{ExecutorConfig, TestExecutor, TransportFailure};
pub use runner::SuiteRunner;
pub use verdict::VerdictPolicy;
