use std::collections::HashMap;

use anyhow::Result;
use ratatui::style::Color;
use test_utils::baseline_response_fixture;
use test_utils::quantization_response_fixture;

use super::Indicator;
use super::MetricCards;
use super::Polarity;
use crate::domain::models::BenchmarkMetrics;
use crate::domain::models::BenchmarkResult;

#[test]
fn it_points_arrows_by_polarity() {
    let faster = Indicator {
        value: 40.0,
        polarity: Polarity::LowerIsBetter,
    };
    assert_eq!(faster.label(), "▼ 40.0%");
    assert_eq!(faster.color(), Color::Green);

    let more_throughput = Indicator {
        value: 12.34,
        polarity: Polarity::HigherIsBetter,
    };
    assert_eq!(more_throughput.label(), "▲ 12.3%");
    assert_eq!(more_throughput.color(), Color::Green);

    let slower = Indicator {
        value: -7.26,
        polarity: Polarity::LowerIsBetter,
    };
    assert_eq!(slower.label(), "▲ 7.3%");
    assert_eq!(slower.color(), Color::Red);

    let less_throughput = Indicator {
        value: -3.0,
        polarity: Polarity::HigherIsBetter,
    };
    assert_eq!(less_throughput.label(), "▼ 3.0%");
    assert_eq!(less_throughput.color(), Color::Red);
}

#[test]
fn it_treats_no_change_as_unfavourable() {
    let unchanged = Indicator {
        value: 0.0,
        polarity: Polarity::LowerIsBetter,
    };
    assert!(!unchanged.is_favourable());
    assert_eq!(unchanged.color(), Color::Red);
}

#[test]
fn it_renders_baseline_cards() -> Result<()> {
    let result: BenchmarkResult = serde_json::from_str(baseline_response_fixture())?;
    let cards = MetricCards::baseline(&result.metrics);

    assert_eq!(
        MetricCards::as_text(&cards),
        vec![
            "Response Time: 2.50 s",
            "Memory: 1200.00 MB",
            "CPU: 80.00 %",
            "Throughput: 20.00 tok/s",
        ]
    );

    return Ok(());
}

#[test]
fn it_renders_comparison_cards() -> Result<()> {
    let result: BenchmarkResult = serde_json::from_str(quantization_response_fixture())?;
    let cards = MetricCards::comparison(&result.metrics, result.improvements.as_ref());

    assert_eq!(
        MetricCards::as_text(&cards),
        vec![
            "Response Time: 1.50 s (▼ 40.0%)",
            "Memory Usage: 600.00 MB (▼ 50.0%)",
            "CPU Usage: 56.00 % (▼ 30.0%)",
            "Throughput: 30.00 tok/s (▲ 50.0%)",
            "Model Size: 1640.00 MB (▼ 60.0%)",
            "Latency (P50): 1440.00 ms",
        ]
    );

    return Ok(());
}

#[test]
fn it_omits_absent_metrics() {
    let metrics = BenchmarkMetrics {
        response_time: 1.0,
        memory_usage_mb: 2.0,
        cpu_usage_percent: 3.0,
        tokens_per_second: 4.0,
        ..BenchmarkMetrics::default()
    };

    let cards = MetricCards::comparison(&metrics, None);
    let titles = cards.iter().map(|e| return e.title).collect::<Vec<_>>();

    assert_eq!(
        titles,
        vec!["Response Time", "Memory Usage", "CPU Usage", "Throughput"]
    );
}

#[test]
fn it_defaults_missing_improvements_to_zero() {
    let metrics = BenchmarkMetrics {
        response_time: 1.0,
        ..BenchmarkMetrics::default()
    };
    let improvements = HashMap::from([("memory".to_string(), 12.0)]);

    let cards = MetricCards::comparison(&metrics, Some(&improvements));

    assert_eq!(cards[0].indicator.map(|e| return e.value), Some(0.0));
    assert_eq!(cards[1].indicator.map(|e| return e.value), Some(12.0));
}

#[test]
fn it_renders_lines() {
    let metrics = BenchmarkMetrics {
        response_time: 1.0,
        ..BenchmarkMetrics::default()
    };
    let lines = MetricCards::as_lines(&MetricCards::comparison(&metrics, None));

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0].spans.len(), 3);
    assert_eq!(lines[0].spans[2].content, "  ▲ 0.0%");
    assert_eq!(lines[0].spans[2].style.fg, Some(Color::Red));
}
