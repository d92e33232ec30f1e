use std::collections::HashMap;

use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::widgets::Paragraph;

use super::Bubble;
use super::BubbleAlignment;
use crate::domain::models::Message;
use crate::domain::models::Role;

#[cfg(test)]
#[path = "bubble_list_test.rs"]
mod tests;

/// Rendered bubbles keyed by message id. Messages never change once
/// appended, so an entry stays valid until the width changes.
pub struct BubbleList {
    cache: HashMap<String, Vec<Line<'static>>>,
    order: Vec<String>,
    line_width: usize,
    lines_len: usize,
    username: String,
    api_url: String,
}

impl BubbleList {
    pub fn new(username: &str, api_url: &str) -> BubbleList {
        return BubbleList {
            cache: HashMap::new(),
            order: vec![],
            line_width: 0,
            lines_len: 0,
            username: username.to_string(),
            api_url: api_url.to_string(),
        };
    }

    pub fn set_messages(&mut self, messages: &[Message], line_width: usize) {
        if self.line_width != line_width {
            self.cache.clear();
            self.line_width = line_width;
        }

        self.order = messages.iter().map(|e| return e.id.to_string()).collect();
        self.lines_len = messages
            .iter()
            .map(|message| {
                if let Some(lines) = self.cache.get(&message.id) {
                    return lines.len();
                }

                let mut align = BubbleAlignment::Left;
                if message.role == Role::User {
                    align = BubbleAlignment::Right;
                }

                let author = message.role.label(&self.username);
                let bubble_lines =
                    Bubble::new(message, align, &author, &self.api_url, line_width).as_lines();
                let bubble_line_len = bubble_lines.len();
                self.cache.insert(message.id.to_string(), bubble_lines);

                return bubble_line_len;
            })
            .sum();
    }

    pub fn len(&self) -> usize {
        return self.lines_len;
    }

    pub fn is_empty(&self) -> bool {
        return self.lines_len == 0;
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        return self
            .order
            .iter()
            .filter_map(|id| return self.cache.get(id))
            .flat_map(|lines| return lines.to_owned())
            .collect();
    }

    pub fn widget(&self, scroll: u16) -> Paragraph<'static> {
        return Paragraph::new(self.lines())
            .block(Block::default())
            .scroll((scroll, 0));
    }
}
