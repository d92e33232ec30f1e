#[cfg(test)]
#[path = "benchmark_test.rs"]
mod tests;

use std::collections::HashMap;

use anyhow::bail;
use anyhow::Result;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Technique {
    Baseline,
    Quantization,
    Pruning,
}

impl Technique {
    pub fn parse(text: &str) -> Option<Technique> {
        return Technique::iter().find(|e| return e.to_string() == text);
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
pub enum QuantizationLevel {
    #[default]
    #[strum(serialize = "q4_0")]
    Q4_0,
    #[strum(serialize = "q5_0")]
    Q5_0,
    #[strum(serialize = "q8_0")]
    Q8_0,
}

impl QuantizationLevel {
    pub fn parse(text: &str) -> Option<QuantizationLevel> {
        return QuantizationLevel::iter().find(|e| return e.to_string() == text);
    }

    pub fn next(&self) -> QuantizationLevel {
        match self {
            QuantizationLevel::Q4_0 => return QuantizationLevel::Q5_0,
            QuantizationLevel::Q5_0 => return QuantizationLevel::Q8_0,
            QuantizationLevel::Q8_0 => return QuantizationLevel::Q4_0,
        }
    }
}

/// Fraction of weights removed, held in tenths so the 0.1 step stays exact.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PruningRatio(u8);

impl Default for PruningRatio {
    fn default() -> PruningRatio {
        return PruningRatio(3);
    }
}

impl PruningRatio {
    const MIN: u8 = 1;
    const MAX: u8 = 5;

    pub fn parse(text: &str) -> Result<PruningRatio> {
        let value = text.trim().parse::<f64>()?;
        let tenths = (value * 10.0).round();
        if (value * 10.0 - tenths).abs() > 1e-9
            || tenths < f64::from(PruningRatio::MIN)
            || tenths > f64::from(PruningRatio::MAX)
        {
            bail!("Pruning ratio must be one of 0.1, 0.2, 0.3, 0.4, 0.5, got {text}");
        }

        return Ok(PruningRatio(tenths as u8));
    }

    pub fn value(&self) -> f64 {
        return f64::from(self.0) / 10.0;
    }

    pub fn increase(&self) -> PruningRatio {
        return PruningRatio((self.0 + 1).min(PruningRatio::MAX));
    }

    pub fn decrease(&self) -> PruningRatio {
        return PruningRatio((self.0 - 1).max(PruningRatio::MIN));
    }

    pub fn percent_label(&self) -> String {
        return format!("{}%", u32::from(self.0) * 10);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkMetrics {
    pub response_time: f64,
    pub memory_usage_mb: f64,
    pub cpu_usage_percent: f64,
    pub tokens_per_second: f64,
    #[serde(default)]
    pub model_size_mb: Option<f64>,
    #[serde(default)]
    pub latency_p50: Option<f64>,
    #[serde(default)]
    pub latency_p95: Option<f64>,
    #[serde(default)]
    pub latency_p99: Option<f64>,
}

/// Percentage change against the baseline keyed by metric (`response_time`,
/// `memory`, `cpu`, `throughput`, `model_size`). Positive is always an
/// improvement.
pub type Improvements = HashMap<String, f64>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub technique: String,
    pub model_name: String,
    pub metrics: BenchmarkMetrics,
    #[serde(default)]
    pub baseline_metrics: Option<BenchmarkMetrics>,
    #[serde(default)]
    pub improvements: Option<Improvements>,
    #[serde(default)]
    pub quantization_level: Option<String>,
    #[serde(default)]
    pub pruning_ratio: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum BenchmarkRequest {
    Baseline {
        question: Option<String>,
    },
    Quantization {
        level: QuantizationLevel,
        question: Option<String>,
    },
    Pruning {
        ratio: PruningRatio,
        question: Option<String>,
    },
}

impl BenchmarkRequest {
    pub fn technique(&self) -> Technique {
        match self {
            BenchmarkRequest::Baseline { .. } => return Technique::Baseline,
            BenchmarkRequest::Quantization { .. } => return Technique::Quantization,
            BenchmarkRequest::Pruning { .. } => return Technique::Pruning,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub technique: String,
    pub model_name: String,
    pub metrics: BenchmarkMetrics,
    #[serde(default)]
    pub before_metrics: Option<BenchmarkMetrics>,
    #[serde(default)]
    pub improvement_percent: Option<Improvements>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkHistory {
    #[serde(default)]
    pub baseline: Option<BenchmarkMetrics>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}
