use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::BenchmarkHistory;
use super::BenchmarkRequest;
use super::BenchmarkResult;
use super::HealthResponse;
use super::Source;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<Source>,
}

#[async_trait]
pub trait Backend {
    /// Checks the backend is reachable and reports itself healthy. Any non
    /// successful status is an error.
    async fn health_check(&self) -> Result<HealthResponse>;

    /// Asks the backend a question, returning the generated answer alongside
    /// the passages it was grounded on.
    async fn query(&self, question: &str) -> Result<QueryResponse>;

    /// Runs a single benchmark for the technique described by the request.
    /// Quantization and pruning results may carry the baseline they were
    /// compared against and the percentage improvements over it.
    async fn run_benchmark(&self, request: BenchmarkRequest) -> Result<BenchmarkResult>;

    /// Returns every benchmark run the backend remembers.
    async fn benchmark_history(&self) -> Result<BenchmarkHistory>;
}

pub type BackendBox = Arc<dyn Backend + Send + Sync>;
