#[cfg(test)]
#[path = "bubble_test.rs"]
mod tests;

use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

use crate::domain::models::MatchQuality;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::Role;
use crate::domain::models::Source;

#[derive(PartialEq, Eq)]
pub enum BubbleAlignment {
    Left,
    Right,
}

pub struct Bubble<'a> {
    alignment: BubbleAlignment,
    message: &'a Message,
    author: &'a str,
    api_url: &'a str,
    window_max_width: usize,
}

pub struct BubbleConfig {
    pub bubble_padding: usize,
    pub border_elements_length: usize,
    pub outer_padding_percentage: f32,
    pub source_indent: usize,
    pub source_passage_lines: usize,
}

fn repeat_from_subtractions(text: &str, subtractions: Vec<usize>) -> String {
    let count = subtractions
        .into_iter()
        .map(|e| return e as i64)
        .reduce(|a, b| return a - b)
        .unwrap_or(0);

    if count <= 0 {
        return "".to_string();
    }

    return text.repeat(count as usize);
}

fn width_of(text: &str) -> usize {
    return text.chars().count();
}

/// Word wraps a single line to `width` characters. Words longer than a line
/// are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut rows = vec![];
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split(' ') {
        let mut word = word.to_string();
        let mut word_len = width_of(&word);
        let mut was_split = false;

        while word_len > width {
            if current_len > 0 {
                rows.push(std::mem::take(&mut current));
                current_len = 0;
            }
            rows.push(word.chars().take(width).collect());
            word = word.chars().skip(width).collect();
            word_len -= width;
            was_split = true;
        }

        if was_split && word_len == 0 {
            continue;
        }

        if current_len > 0 && current_len + word_len + 1 > width {
            rows.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }

        current.push_str(&word);
        current_len += word_len;
    }

    if current_len > 0 || rows.is_empty() {
        rows.push(current);
    }

    return rows;
}

/// Wraps `text` and keeps at most `max_rows` rows, marking the cut with an
/// ellipsis.
pub fn clamp(text: &str, width: usize, max_rows: usize) -> Vec<String> {
    let mut rows = wrap(text, width);
    if rows.len() <= max_rows {
        return rows;
    }

    rows.truncate(max_rows);
    if let Some(last) = rows.last_mut() {
        if width_of(last) + 1 > width {
            last.pop();
        }
        last.push('…');
    }

    return rows;
}

fn quality_color(quality: MatchQuality) -> Color {
    match quality {
        MatchQuality::Excellent => return Color::Green,
        MatchQuality::Good => return Color::Yellow,
        MatchQuality::Fair => return Color::DarkGray,
    }
}

impl<'a> Bubble<'a> {
    pub fn new(
        message: &'a Message,
        alignment: BubbleAlignment,
        author: &'a str,
        api_url: &'a str,
        window_max_width: usize,
    ) -> Bubble<'a> {
        return Bubble {
            alignment,
            message,
            author,
            api_url,
            window_max_width,
        };
    }

    pub fn style_config() -> BubbleConfig {
        return BubbleConfig {
            // Unicode character border + padding.
            bubble_padding: 8,
            // left border + left padding + (text, not counted) + right padding + right border +
            // scrollbar.
            border_elements_length: 5,
            outer_padding_percentage: 0.04,
            source_indent: 4,
            source_passage_lines: 2,
        };
    }

    pub fn as_lines(&self) -> Vec<Line<'static>> {
        let max_line_length = self.get_max_line_length();
        let mut rows: Vec<Vec<Span<'static>>> = vec![];

        for line in self.message.content.lines() {
            for row in wrap(line, max_line_length) {
                rows.push(vec![self.text_span(row)]);
            }
        }

        let sources = self.message.sources();
        if !sources.is_empty() {
            rows.push(vec![]);
            rows.push(vec![Span::styled(
                format!("Sources ({})", sources.len()),
                Style::default().add_modifier(Modifier::BOLD),
            )]);

            for (idx, source) in sources.iter().enumerate() {
                rows.extend(self.source_rows(idx, source, max_line_length));
            }
        }

        rows.push(vec![Span::styled(
            self.message.time_label(),
            Style::default().fg(Color::DarkGray),
        )]);

        let lines = rows
            .into_iter()
            .map(|spans| return self.spans_to_line(spans, max_line_length))
            .collect();

        return self.wrap_lines_in_bubble(lines, max_line_length);
    }

    fn source_rows(
        &self,
        idx: usize,
        source: &Source,
        max_line_length: usize,
    ) -> Vec<Vec<Span<'static>>> {
        let style_config = Bubble::style_config();
        let indent = " ".repeat(style_config.source_indent);
        let inner_width = max_line_length.saturating_sub(style_config.source_indent);
        let link = source.link(self.api_url);
        let mut rows = vec![];

        let mut label_style = Style::default().fg(Color::Cyan);
        if link.is_some() {
            label_style = label_style.add_modifier(Modifier::UNDERLINED);
        }
        for row in wrap(&format!("[{}] {}", idx + 1, source.label(idx)), max_line_length) {
            rows.push(vec![Span::styled(row, label_style)]);
        }

        if let Some(url) = link {
            for row in wrap(&url, inner_width) {
                rows.push(vec![
                    Span::from(indent.to_string()),
                    Span::styled(row, Style::default().fg(Color::Blue)),
                ]);
            }
        }

        let quality = source.match_quality();
        let score = format!("{quality} · distance {:.3}", source.score);
        for row in wrap(&score, inner_width) {
            rows.push(vec![
                Span::from(indent.to_string()),
                Span::styled(row, Style::default().fg(quality_color(quality))),
            ]);
        }

        let passage = source.content.split_whitespace().collect::<Vec<_>>().join(" ");
        for row in clamp(&passage, inner_width, style_config.source_passage_lines) {
            rows.push(vec![
                Span::from(indent.to_string()),
                Span::styled(row, Style::default().add_modifier(Modifier::ITALIC)),
            ]);
        }

        return rows;
    }

    fn spans_to_line(&self, mut spans: Vec<Span<'static>>, max_line_length: usize) -> Line<'static> {
        let line_str_len: usize = spans.iter().map(|e| return width_of(&e.content)).sum();
        let fill = repeat_from_subtractions(" ", vec![max_line_length, line_str_len]);
        let formatted_line_length =
            line_str_len + fill.len() + Bubble::style_config().bubble_padding;

        let mut wrapped_spans = vec![self.highlight_span("│ ".to_string())];
        wrapped_spans.append(&mut spans);
        wrapped_spans.push(self.highlight_span(format!("{fill} │")));

        let outer_bubble_padding =
            repeat_from_subtractions(" ", vec![self.window_max_width, formatted_line_length]);

        if self.alignment == BubbleAlignment::Left {
            wrapped_spans.push(Span::from(outer_bubble_padding));
            return Line::from(wrapped_spans);
        }

        let mut line_spans = vec![Span::from(outer_bubble_padding)];
        line_spans.extend(wrapped_spans);

        return Line::from(line_spans);
    }

    fn get_max_line_length(&self) -> usize {
        let style_config = Bubble::style_config();
        // Add a minimum 4% of padding on the side.
        let min_bubble_padding_length = ((self.window_max_width as f32
            * style_config.outer_padding_percentage)
            .ceil()) as usize;

        // Border elements + minimum bubble padding.
        let line_border_width = style_config.border_elements_length + min_bubble_padding_length;
        let available = self.window_max_width.saturating_sub(line_border_width);

        let mut max_line_length = self
            .message
            .content
            .lines()
            .map(width_of)
            .max()
            .unwrap_or(0)
            .max(width_of(&self.message.time_label()));

        // Citations take whatever room is left.
        if !self.message.sources().is_empty() {
            max_line_length = available;
        }

        if max_line_length > available {
            max_line_length = available;
        }

        let author_len = width_of(self.author);
        if max_line_length < author_len {
            max_line_length = author_len;
        }

        return max_line_length.max(1);
    }

    fn wrap_lines_in_bubble(
        &self,
        lines: Vec<Line<'static>>,
        max_line_length: usize,
    ) -> Vec<Line<'static>> {
        // Add 2 for the vertical bars.
        let inner_bar = "─".repeat(max_line_length + 2);
        let author_len = width_of(self.author);
        let top_bar = format!(
            "╭{}{}╮",
            self.author,
            "─".repeat((max_line_length + 2).saturating_sub(author_len))
        );
        let bottom_bar = format!("╰{inner_bar}╯");
        let bar_bubble_padding = repeat_from_subtractions(
            " ",
            vec![
                self.window_max_width,
                max_line_length,
                Bubble::style_config().bubble_padding,
            ],
        );

        let mut res = vec![];
        if self.alignment == BubbleAlignment::Left {
            res.push(self.highlight_line(format!("{top_bar}{bar_bubble_padding}")));
            res.extend(lines);
            res.push(self.highlight_line(format!("{bottom_bar}{bar_bubble_padding}")));
        } else {
            res.push(self.highlight_line(format!("{bar_bubble_padding}{top_bar}")));
            res.extend(lines);
            res.push(self.highlight_line(format!("{bar_bubble_padding}{bottom_bar}")));
        }

        return res;
    }

    fn highlight_span(&self, text: String) -> Span<'static> {
        if self.message.message_type() == MessageType::Error {
            return Span::styled(
                text,
                Style {
                    fg: Some(Color::Red),
                    ..Style::default()
                },
            );
        } else if self.message.role == Role::Assistant {
            return Span::styled(
                text,
                Style {
                    fg: Some(Color::Cyan),
                    ..Style::default()
                },
            );
        }

        return Span::from(text);
    }

    fn text_span(&self, text: String) -> Span<'static> {
        if self.message.message_type() == MessageType::Error {
            return self.highlight_span(text);
        }

        return Span::from(text);
    }

    fn highlight_line(&self, text: String) -> Line<'static> {
        return Line::from(self.highlight_span(text));
    }
}
