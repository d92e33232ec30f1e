use anyhow::Result;
use test_utils::baseline_response_fixture;
use test_utils::history_response_fixture;
use test_utils::quantization_response_fixture;
use test_utils::query_response_fixture;

use super::ask;
use super::benchmark_request;
use super::build;
use super::format_answer;
use super::format_benchmark;
use super::format_history;
use crate::domain::models::BenchmarkHistory;
use crate::domain::models::BenchmarkRequest;
use crate::domain::models::BenchmarkResult;
use crate::domain::models::QueryResponse;
use crate::domain::models::Technique;

#[test]
fn it_formats_answers_with_sources() -> Result<()> {
    let res: QueryResponse = serde_json::from_str(query_response_fixture())?;

    insta::assert_snapshot!(format_answer(&res, "http://localhost:8000"), @r###"
    Autism is a neurodevelopmental condition.

    Sources:
      [1] a.pdf - Page 3 (Excellent match, distance 0.120)
          http://localhost:8000/api/pdf?file=a.pdf
    "###);

    return Ok(());
}

#[test]
fn it_formats_answers_without_sources() {
    let res = QueryResponse {
        answer: " No relevant documents found. ".to_string(),
        sources: vec![],
    };

    assert_eq!(
        format_answer(&res, "http://localhost:8000"),
        "No relevant documents found."
    );
}

#[test]
fn it_formats_baseline_benchmarks() -> Result<()> {
    let res: BenchmarkResult = serde_json::from_str(baseline_response_fixture())?;

    insta::assert_snapshot!(format_benchmark(&res), @r###"
    baseline (mistral)
      Response Time: 2.50 s
      Memory: 1200.00 MB
      CPU: 80.00 %
      Throughput: 20.00 tok/s
    "###);

    return Ok(());
}

#[test]
fn it_formats_optimization_benchmarks() -> Result<()> {
    let res: BenchmarkResult = serde_json::from_str(quantization_response_fixture())?;
    let text = format_benchmark(&res);

    assert!(text.starts_with("quantization (mistral-q4_0)\n"));
    assert!(text.contains("  Throughput: 30.00 tok/s (▲ 50.0%)"));
    assert!(text.ends_with("  Latency (P50): 1440.00 ms"));

    return Ok(());
}

#[test]
fn it_formats_history() -> Result<()> {
    let history: BenchmarkHistory = serde_json::from_str(history_response_fixture())?;

    insta::assert_snapshot!(format_history(&history), @r###"
    1. baseline (mistral)
      Response Time: 2.50 s
      Memory: 1200.00 MB
      CPU: 80.00 %
      Throughput: 20.00 tok/s
    "###);

    return Ok(());
}

#[test]
fn it_formats_empty_history() {
    assert_eq!(
        format_history(&BenchmarkHistory::default()),
        "No benchmarks have been run yet."
    );
}

#[test]
fn it_builds_baseline_requests() -> Result<()> {
    let req = benchmark_request(Technique::Baseline, Some("Why?".to_string()))?;
    assert_eq!(
        req,
        BenchmarkRequest::Baseline {
            question: Some("Why?".to_string())
        }
    );

    return Ok(());
}

#[test]
fn it_parses_global_flags() -> Result<()> {
    let matches = build().try_get_matches_from(vec![
        "docchat",
        "benchmark",
        "pruning",
        "--pruning-ratio",
        "0.4",
        "--api-url",
        "http://backend:9000",
    ])?;

    let (name, subcmd_matches) = matches.subcommand().unwrap();
    assert_eq!(name, "benchmark");
    assert_eq!(
        subcmd_matches.get_one::<String>("technique").unwrap(),
        "pruning"
    );
    assert_eq!(
        subcmd_matches.get_one::<String>("pruning-ratio").unwrap(),
        "0.4"
    );
    assert_eq!(
        subcmd_matches.get_one::<String>("api-url").unwrap(),
        "http://backend:9000"
    );

    return Ok(());
}

#[test]
fn it_rejects_unknown_values() {
    assert!(build()
        .try_get_matches_from(vec!["docchat", "--quantization-level", "q3_k"])
        .is_err());
    assert!(build()
        .try_get_matches_from(vec!["docchat", "--pruning-ratio", "0.9"])
        .is_err());
    assert!(build()
        .try_get_matches_from(vec!["docchat", "benchmark", "distillation"])
        .is_err());
}

#[tokio::test]
async fn it_rejects_blank_questions() {
    let res = ask("   \n ").await;
    assert_eq!(res.unwrap_err().to_string(), "Question cannot be blank");
}
