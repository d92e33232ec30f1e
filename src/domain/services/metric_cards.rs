#[cfg(test)]
#[path = "metric_cards_test.rs"]
mod tests;

use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

use crate::domain::models::BenchmarkMetrics;
use crate::domain::models::Improvements;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Polarity {
    LowerIsBetter,
    HigherIsBetter,
}

/// Percentage change against the baseline. Positive values are always
/// favourable, the polarity only decides which way the arrow points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Indicator {
    pub value: f64,
    pub polarity: Polarity,
}

impl Indicator {
    pub fn is_favourable(&self) -> bool {
        return self.value > 0.0;
    }

    pub fn arrow(&self) -> &'static str {
        let lowered = match self.polarity {
            Polarity::LowerIsBetter => self.is_favourable(),
            Polarity::HigherIsBetter => !self.is_favourable(),
        };

        if lowered {
            return "▼";
        }
        return "▲";
    }

    pub fn label(&self) -> String {
        return format!("{} {:.1}%", self.arrow(), self.value.abs());
    }

    pub fn color(&self) -> Color {
        if self.is_favourable() {
            return Color::Green;
        }
        return Color::Red;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MetricCard {
    pub title: &'static str,
    pub value: String,
    pub indicator: Option<Indicator>,
}

fn format_value(value: f64, unit: &str) -> String {
    return format!("{value:.2} {unit}");
}

fn card(title: &'static str, value: Option<f64>, unit: &str) -> Option<MetricCard> {
    return value.map(|e| {
        return MetricCard {
            title,
            value: format_value(e, unit),
            indicator: None,
        };
    });
}

fn compared(
    title: &'static str,
    value: Option<f64>,
    unit: &str,
    improvements: Option<&Improvements>,
    key: &str,
    polarity: Polarity,
) -> Option<MetricCard> {
    let improvement = improvements
        .and_then(|e| return e.get(key).copied())
        .unwrap_or(0.0);

    return card(title, value, unit).map(|mut e| {
        e.indicator = Some(Indicator {
            value: improvement,
            polarity,
        });
        return e;
    });
}

pub struct MetricCards {}

impl MetricCards {
    /// Cards shown under the baseline run.
    pub fn baseline(metrics: &BenchmarkMetrics) -> Vec<MetricCard> {
        return [
            card("Response Time", Some(metrics.response_time), "s"),
            card("Memory", Some(metrics.memory_usage_mb), "MB"),
            card("CPU", Some(metrics.cpu_usage_percent), "%"),
            card("Throughput", Some(metrics.tokens_per_second), "tok/s"),
        ]
        .into_iter()
        .flatten()
        .collect();
    }

    /// Cards comparing an optimized run against the baseline. Missing
    /// improvement keys count as no change.
    pub fn comparison(
        metrics: &BenchmarkMetrics,
        improvements: Option<&Improvements>,
    ) -> Vec<MetricCard> {
        return [
            compared(
                "Response Time",
                Some(metrics.response_time),
                "s",
                improvements,
                "response_time",
                Polarity::LowerIsBetter,
            ),
            compared(
                "Memory Usage",
                Some(metrics.memory_usage_mb),
                "MB",
                improvements,
                "memory",
                Polarity::LowerIsBetter,
            ),
            compared(
                "CPU Usage",
                Some(metrics.cpu_usage_percent),
                "%",
                improvements,
                "cpu",
                Polarity::LowerIsBetter,
            ),
            compared(
                "Throughput",
                Some(metrics.tokens_per_second),
                "tok/s",
                improvements,
                "throughput",
                Polarity::HigherIsBetter,
            ),
            compared(
                "Model Size",
                metrics.model_size_mb,
                "MB",
                improvements,
                "model_size",
                Polarity::LowerIsBetter,
            ),
            card("Latency (P50)", metrics.latency_p50, "ms"),
        ]
        .into_iter()
        .flatten()
        .collect();
    }

    pub fn as_text(cards: &[MetricCard]) -> Vec<String> {
        return cards
            .iter()
            .map(|e| {
                let mut line = format!("{}: {}", e.title, e.value);
                if let Some(indicator) = e.indicator {
                    line = format!("{line} ({})", indicator.label());
                }
                return line;
            })
            .collect();
    }

    pub fn as_lines(cards: &[MetricCard]) -> Vec<Line<'static>> {
        return cards
            .iter()
            .map(|e| {
                let mut spans = vec![
                    Span::styled(
                        format!("{:<15}", e.title),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        e.value.to_string(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ];

                if let Some(indicator) = e.indicator {
                    spans.push(Span::styled(
                        format!("  {}", indicator.label()),
                        Style::default().fg(indicator.color()),
                    ));
                }

                return Line::from(spans);
            })
            .collect();
    }
}
