use anyhow::Result;
use mockito::Matcher;
use test_utils::baseline_response_fixture;
use test_utils::history_response_fixture;
use test_utils::quantization_response_fixture;
use test_utils::query_response_fixture;

use super::benchmark_body;
use super::error_message;
use super::HttpApi;
use crate::domain::models::Backend;
use crate::domain::models::BenchmarkRequest;
use crate::domain::models::PruningRatio;
use crate::domain::models::QuantizationLevel;

#[tokio::test]
async fn it_successfully_health_checks() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/health")
        .with_status(200)
        .with_body(r#"{"status":"healthy","service":"backend"}"#)
        .create();

    let backend = HttpApi::with_url(server.url());
    let res = backend.health_check().await?;

    assert_eq!(res.status, "healthy");
    mock.assert();

    return Ok(());
}

#[tokio::test]
async fn it_fails_health_checks() {
    let mut server = mockito::Server::new();
    let mock = server.mock("GET", "/health").with_status(503).create();

    let backend = HttpApi::with_url(server.url());
    let res = backend.health_check().await;

    assert_eq!(res.unwrap_err().to_string(), "Backend is not healthy");
    mock.assert();
}

#[tokio::test]
async fn it_fails_health_checks_when_unreachable() {
    let backend = HttpApi::with_url("http://127.0.0.1:1".to_string());
    let res = backend.health_check().await;

    assert!(res.is_err());
}

#[tokio::test]
async fn it_queries() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/query")
        .match_body(Matcher::JsonString(
            r#"{"question":"What is autism?"}"#.to_string(),
        ))
        .with_status(200)
        .with_body(query_response_fixture())
        .create();

    let backend = HttpApi::with_url(server.url());
    let res = backend.query("What is autism?").await?;

    assert_eq!(res.answer, "Autism is a neurodevelopmental condition.");
    assert_eq!(res.sources.len(), 1);
    assert_eq!(res.sources[0].score, 0.12);
    assert_eq!(res.sources[0].metadata.page, Some(2));
    mock.assert();

    return Ok(());
}

#[tokio::test]
async fn it_trims_trailing_slashes_from_the_base_url() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/query")
        .with_status(200)
        .with_body(query_response_fixture())
        .create();

    let backend = HttpApi::with_url(format!("{}/", server.url()));
    backend.query("What is autism?").await?;
    mock.assert();

    return Ok(());
}

#[tokio::test]
async fn it_surfaces_error_details() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/query")
        .with_status(500)
        .with_body(r#"{"detail":"Error processing query: vector store unavailable"}"#)
        .create();

    let backend = HttpApi::with_url(server.url());
    let res = backend.query("What is autism?").await;

    assert_eq!(
        res.unwrap_err().to_string(),
        "Error processing query: vector store unavailable"
    );
    mock.assert();
}

#[tokio::test]
async fn it_falls_back_to_status_for_unparseable_errors() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/query")
        .with_status(502)
        .with_body("<html>Bad Gateway</html>")
        .create();

    let backend = HttpApi::with_url(server.url());
    let res = backend.query("What is autism?").await;

    assert_eq!(res.unwrap_err().to_string(), "HTTP error! status: 502");
    mock.assert();
}

#[tokio::test]
async fn it_fails_queries_when_unreachable() {
    let backend = HttpApi::with_url("http://127.0.0.1:1".to_string());
    let res = backend.query("What is autism?").await;

    assert!(!res.unwrap_err().to_string().is_empty());
}

#[tokio::test]
async fn it_runs_baseline_benchmarks_with_the_current_question() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/benchmark/baseline")
        .match_body(Matcher::JsonString(
            r#"{"question":"What is autism?","test_queries":["What is autism?"]}"#.to_string(),
        ))
        .with_status(200)
        .with_body(baseline_response_fixture())
        .create();

    let backend = HttpApi::with_url(server.url());
    let res = backend
        .run_benchmark(BenchmarkRequest::Baseline {
            question: Some("What is autism?".to_string()),
        })
        .await?;

    assert_eq!(res.technique, "baseline");
    assert_eq!(res.metrics.response_time, 2.5);
    assert_eq!(res.baseline_metrics, None);
    mock.assert();

    return Ok(());
}

#[tokio::test]
async fn it_runs_quantization_benchmarks() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/benchmark/quantization")
        .match_body(Matcher::JsonString(
            r#"{"technique":"quantization","quantization_level":"q5_0"}"#.to_string(),
        ))
        .with_status(200)
        .with_body(quantization_response_fixture())
        .create();

    let backend = HttpApi::with_url(server.url());
    let res = backend
        .run_benchmark(BenchmarkRequest::Quantization {
            level: QuantizationLevel::Q5_0,
            question: None,
        })
        .await?;

    assert_eq!(res.model_name, "mistral-q4_0");
    assert!(res.baseline_metrics.is_some());
    mock.assert();

    return Ok(());
}

#[tokio::test]
async fn it_surfaces_pruning_benchmark_errors() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/benchmark/pruning")
        .match_body(Matcher::JsonString(
            r#"{"technique":"pruning","pruning_ratio":0.4,"question":"Why?"}"#.to_string(),
        ))
        .with_status(400)
        .with_body(r#"{"detail":"Technique must be 'pruning'"}"#)
        .create();

    let backend = HttpApi::with_url(server.url());
    let res = backend
        .run_benchmark(BenchmarkRequest::Pruning {
            ratio: PruningRatio::parse("0.4")?,
            question: Some("Why?".to_string()),
        })
        .await;

    assert_eq!(res.unwrap_err().to_string(), "Technique must be 'pruning'");
    mock.assert();

    return Ok(());
}

#[tokio::test]
async fn it_fetches_benchmark_history() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/benchmark/history")
        .with_status(200)
        .with_body(history_response_fixture())
        .create();

    let backend = HttpApi::with_url(server.url());
    let res = backend.benchmark_history().await?;

    assert_eq!(res.history.len(), 1);
    assert!(res.baseline.is_some());
    mock.assert();

    return Ok(());
}

#[tokio::test]
async fn it_fails_benchmark_history() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/benchmark/history")
        .with_status(500)
        .create();

    let backend = HttpApi::with_url(server.url());
    let res = backend.benchmark_history().await;

    assert_eq!(
        res.unwrap_err().to_string(),
        "Failed to fetch benchmark history"
    );
    mock.assert();
}

#[test]
fn it_builds_error_messages() {
    assert_eq!(error_message(500, r#"{"detail":"boom"}"#), "boom");
    assert_eq!(error_message(404, r#"{"message":"nope"}"#), "HTTP error! status: 404");
    assert_eq!(error_message(500, r#"{"detail":""}"#), "HTTP error! status: 500");
    assert_eq!(error_message(500, r#"{"detail":null}"#), "HTTP error! status: 500");
    assert_eq!(error_message(503, ""), "HTTP error! status: 503");
    assert_eq!(
        error_message(422, r#"{"detail":[{"msg":"field required"}]}"#),
        r#"[{"msg":"field required"}]"#
    );
}

#[test]
fn it_serializes_benchmark_bodies() -> Result<()> {
    let baseline = benchmark_body(&BenchmarkRequest::Baseline { question: None })?;
    insta::assert_snapshot!(baseline.to_string(), @"{}");

    let pruning = benchmark_body(&BenchmarkRequest::Pruning {
        ratio: PruningRatio::default(),
        question: Some("What is autism?".to_string()),
    })?;
    insta::assert_snapshot!(pruning.to_string(), @r###"{"pruning_ratio":0.3,"question":"What is autism?","technique":"pruning"}"###);

    return Ok(());
}
