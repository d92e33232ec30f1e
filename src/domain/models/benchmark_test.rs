use anyhow::Result;
use strum::VariantNames;
use test_utils::history_response_fixture;
use test_utils::quantization_response_fixture;

use super::BenchmarkHistory;
use super::BenchmarkRequest;
use super::BenchmarkResult;
use super::PruningRatio;
use super::QuantizationLevel;
use super::Technique;

#[test]
fn it_parses_techniques() {
    assert_eq!(Technique::parse("baseline"), Some(Technique::Baseline));
    assert_eq!(Technique::parse("pruning"), Some(Technique::Pruning));
    assert_eq!(Technique::parse("distillation"), None);
    assert_eq!(Technique::Quantization.to_string(), "quantization");
}

#[test]
fn it_lists_quantization_levels() {
    assert_eq!(QuantizationLevel::VARIANTS, &["q4_0", "q5_0", "q8_0"]);
    assert_eq!(QuantizationLevel::default().to_string(), "q4_0");
    assert_eq!(QuantizationLevel::parse("q8_0"), Some(QuantizationLevel::Q8_0));
}

#[test]
fn it_cycles_quantization_levels() {
    let level = QuantizationLevel::Q4_0;
    assert_eq!(level.next(), QuantizationLevel::Q5_0);
    assert_eq!(level.next().next(), QuantizationLevel::Q8_0);
    assert_eq!(level.next().next().next(), QuantizationLevel::Q4_0);
}

#[test]
fn it_defaults_pruning_ratio() {
    let ratio = PruningRatio::default();
    assert_eq!(ratio.value(), 0.3);
    assert_eq!(ratio.percent_label(), "30%");
}

#[test]
fn it_clamps_pruning_ratio() -> Result<()> {
    let ratio = PruningRatio::parse("0.5")?;
    assert_eq!(ratio.increase(), ratio);

    let ratio = PruningRatio::parse("0.1")?;
    assert_eq!(ratio.decrease(), ratio);
    assert_eq!(ratio.increase().value(), 0.2);

    return Ok(());
}

#[test]
fn it_rejects_invalid_pruning_ratios() {
    assert!(PruningRatio::parse("0.6").is_err());
    assert!(PruningRatio::parse("0").is_err());
    assert!(PruningRatio::parse("0.25").is_err());
    assert!(PruningRatio::parse("abc").is_err());
}

#[test]
fn it_maps_requests_to_techniques() {
    let req = BenchmarkRequest::Pruning {
        ratio: PruningRatio::default(),
        question: None,
    };
    assert_eq!(req.technique(), Technique::Pruning);
}

#[test]
fn it_deserializes_optimization_results() -> Result<()> {
    let result: BenchmarkResult = serde_json::from_str(quantization_response_fixture())?;

    assert_eq!(result.technique, "quantization");
    assert_eq!(result.quantization_level, Some("q4_0".to_string()));
    assert_eq!(result.metrics.model_size_mb, Some(1640.0));
    assert_eq!(
        result.baseline_metrics.map(|e| return e.response_time),
        Some(2.5)
    );
    assert_eq!(
        result.improvements.and_then(|e| return e.get("memory").copied()),
        Some(50.0)
    );

    return Ok(());
}

#[test]
fn it_deserializes_history() -> Result<()> {
    let history: BenchmarkHistory = serde_json::from_str(history_response_fixture())?;

    assert_eq!(history.history.len(), 1);
    assert_eq!(history.history[0].technique, "baseline");
    assert_eq!(history.baseline.map(|e| return e.model_size_mb), Some(None));

    return Ok(());
}
