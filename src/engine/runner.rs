use super::executor::TestExecutor;
use crate::model::{SuiteSummary, TestCase, TestResult, TestSuiteConfig, TestSuiteResult};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{error, info};

/// Runs a suite of test cases concurrently
#[derive(Debug, Clone)]
pub struct SuiteRunner {
    executor: Arc<TestExecutor>,
    semaphore: Option<Arc<Semaphore>>,
}

impl SuiteRunner {
    /// `max_concurrency` bounds the number of in-flight cases; `None` dispatches all at once
    #[must_use]
    pub fn new(executor: TestExecutor, max_concurrency: Option<usize>) -> Self {
        Self {
            executor: Arc::new(executor),
            semaphore: max_concurrency.map(|n| Arc::new(Semaphore::new(n.max(1)))),
        }
    }

    #[must_use]
    pub fn executor(&self) -> &TestExecutor {
        &self.executor
    }

    /// Dispatches every case and returns results in submission order.
    ///
    /// Cases complete in any order. A case whose task panics is recorded as a
    /// failed result instead of aborting the suite.
    pub async fn run(&self, config: TestSuiteConfig, cases: &[Arc<TestCase>]) -> TestSuiteResult {
        let start_time = Utc::now();
        let started = Instant::now();

        info!(
            target: "apiprobe::runner",
            suite = %config.name,
            cases = cases.len(),
            base_url = %config.base_url,
            "Starting suite"
        );

        let mut handles = Vec::with_capacity(cases.len());
        for case in cases {
            let executor = Arc::clone(&self.executor);
            let semaphore = self.semaphore.clone();
            let task_case = Arc::clone(case);
            let base_url = config.base_url.clone();

            let handle = tokio::spawn(async move {
                let _permit = match &semaphore {
                    Some(semaphore) => semaphore.acquire().await.ok(),
                    None => None,
                };
                executor.run(task_case, &base_url).await
            });
            handles.push((Arc::clone(case), handle));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (case, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    error!(target: "apiprobe::runner", test = %case.name, error = %e, "Test task failed");
                    TestResult::transport_failure(case, 0, format!("test task failed: {e}"))
                }
            };
            results.push(result);
        }

        let end_time = Utc::now();
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let summary = SuiteSummary::from_results(&results, duration_ms);

        info!(
            target: "apiprobe::runner",
            suite = %config.name,
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            duration_ms,
            "Suite finished"
        );

        TestSuiteResult {
            id: uuid::Uuid::new_v4().to_string(),
            config,
            results,
            start_time,
            end_time,
            summary,
        }
    }
}
