#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;

use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

use super::MetricCards;
use crate::domain::models::BenchmarkMetrics;
use crate::domain::models::BenchmarkRequest;
use crate::domain::models::BenchmarkResult;
use crate::domain::models::Improvements;
use crate::domain::models::PruningRatio;
use crate::domain::models::QuantizationLevel;
use crate::domain::models::Technique;

/// Latest metrics per technique. Only the most recent run of each is kept.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComparisonData {
    pub baseline: Option<BenchmarkMetrics>,
    pub quantization: Option<BenchmarkMetrics>,
    pub quantization_improvements: Option<Improvements>,
    pub pruning: Option<BenchmarkMetrics>,
    pub pruning_improvements: Option<Improvements>,
}

pub struct Dashboard {
    pub loading: Option<Technique>,
    pub comparison: ComparisonData,
    pub quantization_level: QuantizationLevel,
    pub pruning_ratio: PruningRatio,
}

impl Default for Dashboard {
    fn default() -> Dashboard {
        return Dashboard::new(QuantizationLevel::default(), PruningRatio::default());
    }
}

fn heading(text: &str, color: Color) -> Span<'static> {
    return Span::styled(
        text.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    );
}

fn muted(text: &str) -> Line<'static> {
    return Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(Color::DarkGray),
    ));
}

impl Dashboard {
    pub fn new(quantization_level: QuantizationLevel, pruning_ratio: PruningRatio) -> Dashboard {
        return Dashboard {
            loading: None,
            comparison: ComparisonData::default(),
            quantization_level,
            pruning_ratio,
        };
    }

    pub fn is_loading(&self) -> bool {
        return self.loading.is_some();
    }

    /// Optimized runs are compared against a baseline, so they need one first.
    pub fn can_run(&self, technique: Technique) -> bool {
        if self.is_loading() {
            return false;
        }

        if technique == Technique::Baseline {
            return true;
        }

        return self.comparison.baseline.is_some();
    }

    /// Marks `technique` as in flight and returns the request to send, or
    /// `None` when the run is not allowed right now.
    pub fn begin(
        &mut self,
        technique: Technique,
        question: Option<String>,
    ) -> Option<BenchmarkRequest> {
        if !self.can_run(technique) {
            tracing::debug!(technique = %technique, "Benchmark run rejected");
            return None;
        }

        self.loading = Some(technique);
        let request = match technique {
            Technique::Baseline => BenchmarkRequest::Baseline { question },
            Technique::Quantization => BenchmarkRequest::Quantization {
                level: self.quantization_level,
                question,
            },
            Technique::Pruning => BenchmarkRequest::Pruning {
                ratio: self.pruning_ratio,
                question,
            },
        };

        return Some(request);
    }

    pub fn complete(&mut self, technique: Technique, result: BenchmarkResult) {
        self.finish(technique);

        match technique {
            Technique::Baseline => {
                self.comparison.baseline = Some(result.metrics);
            }
            Technique::Quantization => {
                self.comparison.quantization = Some(result.metrics);
                self.comparison.quantization_improvements = result.improvements;
                if let Some(baseline) = result.baseline_metrics {
                    self.comparison.baseline = Some(baseline);
                }
            }
            Technique::Pruning => {
                self.comparison.pruning = Some(result.metrics);
                self.comparison.pruning_improvements = result.improvements;
                if let Some(baseline) = result.baseline_metrics {
                    self.comparison.baseline = Some(baseline);
                }
            }
        }
    }

    /// Clears the in flight marker and returns the alert text. Stored results
    /// are left as they were.
    pub fn fail(&mut self, technique: Technique, error: &str) -> String {
        self.finish(technique);
        return format!("Failed to run {technique} benchmark: {error}");
    }

    fn finish(&mut self, technique: Technique) {
        if self.loading == Some(technique) {
            self.loading = None;
        } else {
            tracing::warn!(technique = %technique, "Benchmark settled without being in flight");
        }
    }

    pub fn cycle_quantization_level(&mut self) {
        if !self.is_loading() {
            self.quantization_level = self.quantization_level.next();
        }
    }

    pub fn increase_pruning_ratio(&mut self) {
        if !self.is_loading() {
            self.pruning_ratio = self.pruning_ratio.increase();
        }
    }

    pub fn decrease_pruning_ratio(&mut self) {
        if !self.is_loading() {
            self.pruning_ratio = self.pruning_ratio.decrease();
        }
    }

    fn action_label(&self, technique: Technique, key: char) -> Span<'static> {
        if self.loading == Some(technique) {
            return Span::styled("Running...", Style::default().fg(Color::Yellow));
        }

        if !self.can_run(technique) {
            let mut text = "Busy";
            if !self.is_loading() {
                text = "Needs baseline";
            }
            return Span::styled(text, Style::default().fg(Color::DarkGray));
        }

        return Span::styled(
            format!("[{key}] Run"),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        );
    }

    fn comparison_lines(
        &self,
        technique: Technique,
        metrics: &Option<BenchmarkMetrics>,
        improvements: &Option<Improvements>,
    ) -> Vec<Line<'static>> {
        let (Some(metrics), Some(_)) = (metrics, &self.comparison.baseline) else {
            return vec![];
        };

        let title = match technique {
            Technique::Quantization => "Quantization vs Baseline",
            _ => "Pruning vs Baseline",
        };

        let mut lines = vec![Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::UNDERLINED),
        ))];
        lines.extend(MetricCards::as_lines(&MetricCards::comparison(
            metrics,
            improvements.as_ref(),
        )));

        return lines;
    }

    pub fn as_lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(heading("Optimization Dashboard", Color::White)),
            muted("Benchmark and compare model optimization techniques"),
            Line::from(""),
            Line::from(vec![
                heading("Baseline Benchmark", Color::Magenta),
                Span::from("  "),
                self.action_label(Technique::Baseline, 'b'),
            ]),
            muted("Measure baseline performance"),
        ];

        if let Some(baseline) = &self.comparison.baseline {
            lines.extend(MetricCards::as_lines(&MetricCards::baseline(baseline)));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            heading("Quantization", Color::Yellow),
            Span::from(format!("  level {} [l]  ", self.quantization_level)),
            self.action_label(Technique::Quantization, 'q'),
        ]));
        lines.push(muted("Reduce model precision"));
        lines.extend(self.comparison_lines(
            Technique::Quantization,
            &self.comparison.quantization,
            &self.comparison.quantization_improvements,
        ));

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            heading("Pruning", Color::Blue),
            Span::from(format!(
                "  ratio {} [+/-]  ",
                self.pruning_ratio.percent_label()
            )),
            self.action_label(Technique::Pruning, 'p'),
        ]));
        lines.push(muted("Remove less important weights"));
        lines.extend(self.comparison_lines(
            Technique::Pruning,
            &self.comparison.pruning,
            &self.comparison.pruning_improvements,
        ));

        return lines;
    }
}
