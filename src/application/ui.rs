use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Clear;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::widgets::Wrap;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tui_textarea::Key;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::BackendBox;
use crate::domain::models::Event;
use crate::domain::models::Loading;
use crate::domain::models::QuestionInput;
use crate::domain::services::events::EventsService;
use crate::domain::services::AppState;
use crate::domain::services::Dashboard;
use crate::domain::services::Focus;
use crate::domain::services::HealthMonitor;

fn header(app_state: &AppState) -> Paragraph<'static> {
    let health = app_state.health;
    let mut hints = "Ctrl+B dashboard  Ctrl+C quit".to_string();
    if app_state.show_dashboard {
        hints = format!("Tab focus  {hints}");
    }

    return Paragraph::new(Line::from(vec![
        Span::styled(
            " Document Q&A ",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} {}", health.symbol(), health.label()),
            Style::default().fg(health.color()),
        ),
        Span::styled(format!("   {hints}"), Style::default().fg(Color::DarkGray)),
    ]));
}

fn welcome() -> Paragraph<'static> {
    return Paragraph::new(vec![
        Line::from(Span::styled(
            "Ask me anything about your documents",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Answers cite the passages they were built from, with links to the source PDFs.",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(Block::default().padding(Padding::new(2, 2, 2, 0)));
}

fn error_banner(error: &str) -> Paragraph<'static> {
    return Paragraph::new(format!("Error: {error}"))
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true });
}

fn dashboard_block(focused: bool) -> Block<'static> {
    let mut border_style = Style::default().fg(Color::DarkGray);
    if focused {
        border_style = Style::default().fg(Color::Cyan);
    }

    return Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .padding(Padding::new(1, 1, 0, 0));
}

fn alert(text: &str) -> Paragraph<'static> {
    return Paragraph::new(vec![
        Line::from(text.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter or Esc to dismiss",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(" Benchmark failed ")
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Color::Red))
            .padding(Padding::new(1, 1, 1, 0)),
    );
}

fn centered_rect(percent_x: u16, height: u16, rect: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(rect);

    return Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1];
}

fn handle_input(
    event: Event,
    app_state: &mut AppState,
    textarea: &mut tui_textarea::TextArea<'_>,
    tx: &mpsc::UnboundedSender<Action>,
) -> Result<()> {
    match event {
        Event::KeyboardCTRLB() => app_state.toggle_dashboard(),
        Event::KeyboardTab() => app_state.toggle_focus(),
        Event::UIScrollDown() => app_state.focused_scroll().down(),
        Event::UIScrollUp() => app_state.focused_scroll().up(),
        Event::UIScrollPageDown() => app_state.focused_scroll().down_page(),
        Event::UIScrollPageUp() => app_state.focused_scroll().up_page(),
        Event::KeyboardEnter() => {
            if app_state.focus == Focus::Chat {
                let input_str = QuestionInput::question(textarea);
                if let Some(action) = app_state.submit(&input_str) {
                    *textarea = QuestionInput::build();
                    tx.send(action)?;
                }
            }
        }
        Event::KeyboardPaste(text) => {
            if app_state.focus == Focus::Chat && !app_state.waiting_for_backend {
                QuestionInput::paste(textarea, &text);
            }
        }
        Event::KeyboardCharInput(input) => {
            if app_state.focus == Focus::Dashboard {
                if let Key::Char(key) = input.key {
                    if let Some(action) = app_state.handle_dashboard_key(key) {
                        tx.send(action)?;
                    }
                }
            } else if !app_state.waiting_for_backend {
                textarea.input(input);
            }
        }
        _ => {}
    }

    return Ok(());
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut textarea = QuestionInput::build();
    let mut events = EventsService::new(rx);

    loop {
        terminal.draw(|frame| {
            let mut constraints = vec![Constraint::Length(1), Constraint::Min(1)];
            if app_state.error.is_some() {
                constraints.push(Constraint::Length(2));
            }
            constraints.push(Constraint::Length(3));

            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints(constraints)
                .split(frame.size());

            let mut pane_constraints = vec![Constraint::Percentage(100)];
            if app_state.show_dashboard {
                pane_constraints = vec![Constraint::Percentage(60), Constraint::Percentage(40)];
            }
            let panes = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(pane_constraints)
                .split(layout[1]);
            let chat_rect = panes[0];

            if chat_rect.width != app_state.last_known_width
                || chat_rect.height != app_state.last_known_height
            {
                app_state.set_rect(chat_rect);
            }

            frame.render_widget(header(app_state), layout[0]);

            if app_state.messages.is_empty() {
                frame.render_widget(welcome(), chat_rect);
            } else {
                frame.render_widget(
                    app_state.bubble_list.widget(app_state.scroll.position),
                    chat_rect,
                );
                frame.render_stateful_widget(
                    Scrollbar::new(ScrollbarOrientation::VerticalRight),
                    chat_rect.inner(&Margin {
                        vertical: 1,
                        horizontal: 0,
                    }),
                    &mut app_state.scroll.scrollbar_state,
                );
            }

            if app_state.show_dashboard {
                let block = dashboard_block(app_state.focus == Focus::Dashboard);
                let inner = block.inner(panes[1]);
                app_state.set_dashboard_height(inner.height);

                frame.render_widget(
                    Paragraph::new(app_state.dashboard.as_lines())
                        .block(block)
                        .scroll((app_state.dashboard_scroll.position, 0)),
                    panes[1],
                );
            }

            let input_rect = layout[layout.len() - 1];
            if let Some(error) = &app_state.error {
                frame.render_widget(error_banner(error), layout[2]);
            }

            if app_state.waiting_for_backend {
                frame.render_widget(Loading::widget("Searching your documents..."), input_rect);
            } else {
                frame.render_widget(textarea.widget(), input_rect);
            }

            if let Some(text) = &app_state.alert {
                let area = centered_rect(60, 7, frame.size());
                frame.render_widget(Clear, area);
                frame.render_widget(alert(text), area);
            }
        })?;

        match events.next().await? {
            Event::BackendQueryResponse(res) => app_state.handle_query_response(res),
            Event::BackendQueryError(err) => app_state.handle_query_error(&err),
            Event::BenchmarkCompleted(technique, res) => {
                app_state.handle_benchmark_completed(technique, res)
            }
            Event::BenchmarkFailed(technique, err) => {
                app_state.handle_benchmark_failed(technique, &err)
            }
            Event::HealthChecked(status) => app_state.set_health(status),
            Event::KeyboardCTRLC() => break,
            Event::UITick() => {}
            event => {
                if app_state.alert.is_some() {
                    // The alert swallows input until dismissed.
                    if matches!(event, Event::KeyboardEnter() | Event::KeyboardEsc()) {
                        app_state.dismiss_alert();
                    }
                    continue;
                }

                handle_input(event, app_state, &mut textarea, &tx)?;
            }
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    );
    let _ = crossterm::execute!(io::stdout(), cursor::Show);
}

pub async fn start(
    backend: BackendBox,
    tx: mpsc::UnboundedSender<Action>,
    event_tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let dashboard = Dashboard::new(Config::quantization_level()?, Config::pruning_ratio()?);
    let mut app_state = AppState::new(
        &Config::get(ConfigKey::Username),
        &Config::get(ConfigKey::ApiUrl),
        dashboard,
        Config::show_dashboard(),
    );
    let interval = Duration::from_millis(Config::health_check_interval()?);

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    crossterm::execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let health_monitor = HealthMonitor::start(backend, event_tx, interval);
    let res = start_loop(&mut terminal, &mut app_state, tx, rx).await;
    health_monitor.shutdown().await;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    return res;
}
