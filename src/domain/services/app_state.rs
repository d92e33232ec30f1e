#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use ratatui::prelude::Rect;

use super::BubbleList;
use super::Dashboard;
use super::Scroll;
use crate::domain::models::Action;
use crate::domain::models::BenchmarkResult;
use crate::domain::models::HealthStatus;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::QueryResponse;
use crate::domain::models::Role;
use crate::domain::models::Technique;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Focus {
    Chat,
    Dashboard,
}

pub struct AppState {
    pub alert: Option<String>,
    pub bubble_list: BubbleList,
    pub current_question: Option<String>,
    pub dashboard: Dashboard,
    pub dashboard_scroll: Scroll,
    pub error: Option<String>,
    pub focus: Focus,
    pub health: HealthStatus,
    pub last_known_height: u16,
    pub last_known_width: u16,
    pub messages: Vec<Message>,
    pub scroll: Scroll,
    pub show_dashboard: bool,
    pub waiting_for_backend: bool,
}

impl AppState {
    pub fn new(username: &str, api_url: &str, dashboard: Dashboard, show_dashboard: bool) -> AppState {
        return AppState {
            alert: None,
            bubble_list: BubbleList::new(username, api_url),
            current_question: None,
            dashboard,
            dashboard_scroll: Scroll::default(),
            error: None,
            focus: Focus::Chat,
            health: HealthStatus::default(),
            last_known_height: 0,
            last_known_width: 0,
            messages: vec![],
            scroll: Scroll::default(),
            show_dashboard,
            waiting_for_backend: false,
        };
    }

    /// Appends the question and returns the query to send. Blank input, or
    /// input while an answer is pending, is ignored.
    pub fn submit(&mut self, input: &str) -> Option<Action> {
        let question = input.trim();
        if question.is_empty() || self.waiting_for_backend {
            return None;
        }

        self.add_message(Message::new(Role::User, question));
        self.current_question = Some(question.to_string());
        self.waiting_for_backend = true;
        self.error = None;

        return Some(Action::BackendQuery(question.to_string()));
    }

    pub fn handle_query_response(&mut self, res: QueryResponse) {
        self.waiting_for_backend = false;
        self.add_message(Message::with_sources(
            Role::Assistant,
            &res.answer,
            res.sources,
        ));
    }

    pub fn handle_query_error(&mut self, err: &str) {
        self.waiting_for_backend = false;
        self.error = Some(err.to_string());
        self.add_message(Message::new_with_type(
            Role::Assistant,
            MessageType::Error,
            &format!(
                "Sorry, I encountered an error: {err}. Please make sure the backend server is running."
            ),
        ));
    }

    pub fn run_benchmark(&mut self, technique: Technique) -> Option<Action> {
        return self
            .dashboard
            .begin(technique, self.current_question.clone())
            .map(Action::BackendBenchmark);
    }

    pub fn handle_benchmark_completed(&mut self, technique: Technique, result: BenchmarkResult) {
        self.dashboard.complete(technique, result);
    }

    pub fn handle_benchmark_failed(&mut self, technique: Technique, err: &str) {
        self.alert = Some(self.dashboard.fail(technique, err));
    }

    /// Dashboard hotkeys, only reachable while the dashboard has focus.
    pub fn handle_dashboard_key(&mut self, key: char) -> Option<Action> {
        match key {
            'b' => return self.run_benchmark(Technique::Baseline),
            'q' => return self.run_benchmark(Technique::Quantization),
            'p' => return self.run_benchmark(Technique::Pruning),
            'l' => self.dashboard.cycle_quantization_level(),
            '+' | '=' => self.dashboard.increase_pruning_ratio(),
            '-' => self.dashboard.decrease_pruning_ratio(),
            _ => {}
        }

        return None;
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Visibility only. A running benchmark keeps running while hidden.
    pub fn toggle_dashboard(&mut self) {
        self.show_dashboard = !self.show_dashboard;
        if !self.show_dashboard {
            self.focus = Focus::Chat;
        }
    }

    pub fn toggle_focus(&mut self) {
        if !self.show_dashboard {
            self.focus = Focus::Chat;
            return;
        }

        self.focus = match self.focus {
            Focus::Chat => Focus::Dashboard,
            Focus::Dashboard => Focus::Chat,
        };
    }

    pub fn set_health(&mut self, status: HealthStatus) {
        if self.health != status {
            tracing::debug!(status = status.label(), "Backend health changed");
        }
        self.health = status;
    }

    pub fn focused_scroll(&mut self) -> &mut Scroll {
        if self.focus == Focus::Dashboard {
            return &mut self.dashboard_scroll;
        }
        return &mut self.scroll;
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width;
        self.last_known_height = rect.height;
        self.sync_dependants();
    }

    pub fn set_dashboard_height(&mut self, height: u16) {
        let lines = self.dashboard.as_lines().len() as u16;
        self.dashboard_scroll.set_state(lines, height);
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
        self.sync_dependants();
        self.scroll.last();
    }

    fn sync_dependants(&mut self) {
        self.bubble_list
            .set_messages(&self.messages, self.last_known_width as usize);

        self.scroll
            .set_state(self.bubble_list.len() as u16, self.last_known_height);

        if self.waiting_for_backend {
            self.scroll.last();
        }
    }
}
