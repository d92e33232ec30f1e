use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::Backend;
use crate::domain::models::BenchmarkHistory;
use crate::domain::models::BenchmarkRequest;
use crate::domain::models::BenchmarkResult;
use crate::domain::models::HealthResponse;
use crate::domain::models::QueryResponse;

/// In memory backend that replays queued responses. An empty queue is an
/// error, as is a queued `Err`.
#[derive(Default)]
pub struct FakeBackend {
    pub health: Mutex<VecDeque<Result<HealthResponse, String>>>,
    pub queries: Mutex<VecDeque<Result<QueryResponse, String>>>,
    pub benchmarks: Mutex<VecDeque<Result<BenchmarkResult, String>>>,
    pub questions: Mutex<Vec<String>>,
    pub requests: Mutex<Vec<BenchmarkRequest>>,
    pub health_checks: Mutex<usize>,
}

fn next<T>(queue: &Mutex<VecDeque<Result<T, String>>>) -> Result<T> {
    let item = match queue.lock() {
        Ok(mut guard) => guard.pop_front(),
        Err(_) => bail!("Fake backend lock poisoned"),
    };

    match item {
        Some(Ok(value)) => return Ok(value),
        Some(Err(err)) => bail!(err),
        None => bail!("No response queued"),
    }
}

impl FakeBackend {
    pub fn with_health(self, res: Result<HealthResponse, String>) -> FakeBackend {
        self.health.lock().unwrap().push_back(res);
        return self;
    }

    pub fn with_query(self, res: Result<QueryResponse, String>) -> FakeBackend {
        self.queries.lock().unwrap().push_back(res);
        return self;
    }

    pub fn with_benchmark(self, res: Result<BenchmarkResult, String>) -> FakeBackend {
        self.benchmarks.lock().unwrap().push_back(res);
        return self;
    }

    pub fn health_check_count(&self) -> usize {
        return *self.health_checks.lock().unwrap();
    }
}

#[async_trait]
impl Backend for FakeBackend {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<HealthResponse> {
        *self.health_checks.lock().unwrap() += 1;
        return next(&self.health);
    }

    #[allow(clippy::implicit_return)]
    async fn query(&self, question: &str) -> Result<QueryResponse> {
        self.questions.lock().unwrap().push(question.to_string());
        return next(&self.queries);
    }

    #[allow(clippy::implicit_return)]
    async fn run_benchmark(&self, request: BenchmarkRequest) -> Result<BenchmarkResult> {
        self.requests.lock().unwrap().push(request);
        return next(&self.benchmarks);
    }

    #[allow(clippy::implicit_return)]
    async fn benchmark_history(&self) -> Result<BenchmarkHistory> {
        return Ok(BenchmarkHistory::default());
    }
}
