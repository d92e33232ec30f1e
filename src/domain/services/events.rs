#[cfg(test)]
#[path = "events_test.rs"]
mod tests;

use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::event::EventStream;
use crossterm::event::MouseEventKind;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::domain::models::Event;

pub fn help_text() -> String {
    let text = r#"
HOTKEYS:
- Enter - Ask the question in the input box
- Up arrow - Scroll up
- Down arrow - Scroll down
- CTRL+U / Page up - Page up
- CTRL+D / Page down - Page down
- CTRL+B - Show or hide the optimization dashboard
- Tab - Move focus between the chat input and the dashboard
- Esc - Dismiss an alert
- CTRL+C - Exit

DASHBOARD HOTKEYS:
- b - Run the baseline benchmark
- q - Run the quantization benchmark
- p - Run the pruning benchmark
- l - Cycle the quantization level
- + / - - Raise or lower the pruning ratio
        "#;

    return text.trim().to_string();
}

pub struct EventsService {
    crossterm_events: EventStream,
    events: mpsc::UnboundedReceiver<Event>,
}

impl EventsService {
    pub fn new(events: mpsc::UnboundedReceiver<Event>) -> EventsService {
        return EventsService {
            crossterm_events: EventStream::new(),
            events,
        };
    }

    fn handle_crossterm(event: CrosstermEvent) -> Option<Event> {
        let keyevent = match event {
            CrosstermEvent::Paste(text) => return Some(Event::KeyboardPaste(text)),
            CrosstermEvent::Mouse(mouseevent) => match mouseevent.kind {
                MouseEventKind::ScrollUp => return Some(Event::UIScrollUp()),
                MouseEventKind::ScrollDown => return Some(Event::UIScrollDown()),
                _ => return None,
            },
            CrosstermEvent::Key(keyevent) => keyevent,
            _ => return None,
        };

        let input: Input = keyevent.into();
        if input.ctrl {
            match input.key {
                Key::Char('b') => return Some(Event::KeyboardCTRLB()),
                Key::Char('c') => return Some(Event::KeyboardCTRLC()),
                Key::Char('d') => return Some(Event::UIScrollPageDown()),
                Key::Char('u') => return Some(Event::UIScrollPageUp()),
                _ => {}
            }
        }

        match input.key {
            Key::Down | Key::MouseScrollDown => return Some(Event::UIScrollDown()),
            Key::Up | Key::MouseScrollUp => return Some(Event::UIScrollUp()),
            Key::PageDown => return Some(Event::UIScrollPageDown()),
            Key::PageUp => return Some(Event::UIScrollPageUp()),
            Key::Tab => return Some(Event::KeyboardTab()),
            Key::Esc => return Some(Event::KeyboardEsc()),
            Key::Enter => return Some(Event::KeyboardEnter()),
            _ => return Some(Event::KeyboardCharInput(input)),
        }
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            let evt = tokio::select! {
                event = self.events.recv() => event,
                event = self.crossterm_events.next() => match event {
                    Some(Ok(input)) => EventsService::handle_crossterm(input),
                    Some(Err(_)) => None,
                    None => None
                },
                _ = time::sleep(time::Duration::from_millis(500)) => Some(Event::UITick())
            };

            if let Some(event) = evt {
                return Ok(event);
            }
        }
    }
}
