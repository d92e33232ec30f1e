#[cfg(test)]
#[path = "http_api_test.rs"]
mod tests;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::domain::models::Backend;
use crate::domain::models::BenchmarkHistory;
use crate::domain::models::BenchmarkRequest;
use crate::domain::models::BenchmarkResult;
use crate::domain::models::HealthResponse;
use crate::domain::models::QueryResponse;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct QueryRequest {
    question: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct BaselineRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    test_queries: Option<Vec<String>>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
struct OptimizationRequest {
    technique: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    quantization_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pruning_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    question: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Builds the failure message for a non successful response. A JSON body with
/// a `detail` wins, anything else falls back to the status code.
fn error_message(status: u16, body: &str) -> String {
    let detail = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| return e.detail);

    match detail {
        Some(serde_json::Value::String(text)) => {
            if !text.is_empty() {
                return text;
            }
        }
        Some(serde_json::Value::Null) | None => {}
        Some(other) => return other.to_string(),
    }

    return format!("HTTP error! status: {status}");
}

fn benchmark_path(request: &BenchmarkRequest) -> String {
    return format!("/api/benchmark/{}", request.technique());
}

fn benchmark_body(request: &BenchmarkRequest) -> serde_json::Result<serde_json::Value> {
    match request {
        BenchmarkRequest::Baseline { question } => {
            return serde_json::to_value(BaselineRequest {
                question: question.clone(),
                test_queries: question.clone().map(|e| return vec![e]),
            });
        }
        BenchmarkRequest::Quantization { level, question } => {
            return serde_json::to_value(OptimizationRequest {
                technique: request.technique().to_string(),
                quantization_level: Some(level.to_string()),
                pruning_ratio: None,
                question: question.clone(),
            });
        }
        BenchmarkRequest::Pruning { ratio, question } => {
            return serde_json::to_value(OptimizationRequest {
                technique: request.technique().to_string(),
                quantization_level: None,
                pruning_ratio: Some(ratio.value()),
                question: question.clone(),
            });
        }
    }
}

pub struct HttpApi {
    url: String,
}

impl HttpApi {
    pub fn with_url(url: String) -> HttpApi {
        return HttpApi {
            url: url.trim_end_matches('/').to_string(),
        };
    }

    async fn post_json<T: serde::Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R> {
        let url = format!("{url}{path}", url = self.url);
        tracing::debug!(url = %url, "POST request");

        let res = reqwest::Client::new()
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                tracing::error!(error = ?err, url = %url, "Backend is not reachable");
                return anyhow!(err.to_string());
            })?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            let message = error_message(status.as_u16(), &text);
            tracing::error!(
                status = status.as_u16(),
                message = %message,
                url = %url,
                "Backend request failed"
            );
            bail!(message);
        }

        let parsed = res.json::<R>().await?;
        return Ok(parsed);
    }
}

#[async_trait]
impl Backend for HttpApi {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<HealthResponse> {
        let res = match reqwest::Client::new()
            .get(format!("{url}/health", url = self.url))
            .send()
            .await
        {
            Ok(res) => res,
            Err(err) => {
                tracing::error!(error = ?err, "Backend is not reachable");
                bail!(err.to_string());
            }
        };

        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "Backend health check failed");
            bail!("Backend is not healthy");
        }

        let health = res.json::<HealthResponse>().await?;
        tracing::debug!(status = %health.status, "Backend health check");

        return Ok(health);
    }

    #[allow(clippy::implicit_return)]
    async fn query(&self, question: &str) -> Result<QueryResponse> {
        let req = QueryRequest {
            question: question.to_string(),
        };

        let res: QueryResponse = self.post_json("/api/query", &req).await?;
        tracing::debug!(sources = res.sources.len(), "Query response");

        return Ok(res);
    }

    #[allow(clippy::implicit_return)]
    async fn run_benchmark(&self, request: BenchmarkRequest) -> Result<BenchmarkResult> {
        let body = benchmark_body(&request)?;
        let res: BenchmarkResult = self.post_json(&benchmark_path(&request), &body).await?;
        tracing::debug!(
            technique = %res.technique,
            model = %res.model_name,
            "Benchmark response"
        );

        return Ok(res);
    }

    #[allow(clippy::implicit_return)]
    async fn benchmark_history(&self) -> Result<BenchmarkHistory> {
        let res = reqwest::Client::new()
            .get(format!("{url}/api/benchmark/history", url = self.url))
            .send()
            .await
            .map_err(|err| return anyhow!(err.to_string()))?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                "Failed to fetch benchmark history"
            );
            bail!("Failed to fetch benchmark history");
        }

        return Ok(res.json::<BenchmarkHistory>().await?);
    }
}
