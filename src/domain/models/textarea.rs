#[cfg(test)]
#[path = "textarea_test.rs"]
mod tests;

use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use tui_textarea::TextArea;

pub struct QuestionInput {}

impl QuestionInput {
    pub fn build<'a>() -> TextArea<'a> {
        let mut textarea = TextArea::default();
        textarea.set_cursor_line_style(Style::default());
        textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .title("Ask a question about your documents")
                .padding(Padding::new(1, 1, 0, 0)),
        );

        return textarea;
    }

    /// Inserts pasted text at the cursor. Carriage returns are dropped.
    pub fn paste(textarea: &mut TextArea<'_>, text: &str) {
        for char in text.chars() {
            match char {
                '\r' => {}
                '\n' => textarea.insert_newline(),
                _ => textarea.insert_char(char),
            }
        }
    }

    pub fn question(textarea: &TextArea<'_>) -> String {
        return textarea.lines().join("\n");
    }
}
