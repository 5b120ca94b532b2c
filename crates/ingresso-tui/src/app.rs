//! Application core — event loop, form state, action dispatch.

use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::event::Event as CrosstermEvent;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block, BorderType, Borders, Paragraph},
};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc;
use tracing::{debug, info};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use ingresso_core::{BookingSession, Field};

use crate::action::Action;
use crate::event::{Event, EventReader};
use crate::form::{FormFocus, label};
use crate::theme;

/// Top-level application state and event loop.
pub struct App {
    /// The shared booking session — form state, busy flag, feed.
    session: BookingSession,
    /// Which form control holds focus.
    focus: FormFocus,
    /// Text input widgets, one per scalar field.
    url_input: Input,
    cpf_input: Input,
    tickets_input: Input,
    username_input: Input,
    password_input: Input,
    /// Spinner state for the busy submit control.
    throbber_state: ThrobberState,
    /// Whether the app should keep running.
    running: bool,
    /// Action sender — spawned tasks dispatch through this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver — main loop drains this.
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(session: BookingSession) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        Self {
            session,
            focus: FormFocus::Input(Field::EventUrl),
            url_input: Input::default(),
            cpf_input: Input::default(),
            // Mirrors the draft's default of one ticket.
            tickets_input: Input::default().with_value("1".into()),
            username_input: Input::default(),
            password_input: Input::default(),
            throbber_state: ThrobberState::default(),
            running: true,
            action_tx,
            action_rx,
        }
    }

    /// Run the main event loop. This is the heart of the TUI.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = crate::tui::Tui::new()?;
        tui.enter()?;

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            // 1. Wait for the next event
            let Some(event) = events.next().await else {
                break;
            };

            // 2. Map event → action(s)
            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key) {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            // 3. Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action);

                if matches!(action, Action::Render) {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    // ── Key handling ─────────────────────────────────────────────────

    /// Map a key event to an action. Global keys first; everything else
    /// goes to the focused control.
    fn handle_key_event(&mut self, key: KeyEvent) -> Option<Action> {
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Some(Action::Quit),
            (_, KeyCode::Esc) => return Some(Action::Quit),
            (_, KeyCode::Tab) => return Some(Action::FocusNext),
            (_, KeyCode::BackTab) => return Some(Action::FocusPrev),
            (_, KeyCode::Down) => return Some(Action::FocusNext),
            (_, KeyCode::Up) => return Some(Action::FocusPrev),
            // The whole form submits on Enter, wherever focus sits.
            (_, KeyCode::Enter) => return Some(Action::SubmitRequested),
            _ => {}
        }

        match self.focus {
            FormFocus::Section(_) => {
                if key.code == KeyCode::Char(' ') {
                    return self.focus.section().map(Action::ToggleSection);
                }
            }
            FormFocus::Submit => {
                if key.code == KeyCode::Char(' ') {
                    return Some(Action::SubmitRequested);
                }
            }
            FormFocus::Input(field) => {
                // The ticket field is the analogue of a number input.
                if field == Field::TicketCount {
                    if let KeyCode::Char(c) = key.code {
                        if !c.is_ascii_digit() {
                            return None;
                        }
                    }
                }
                self.input_mut(field)
                    .handle_event(&CrosstermEvent::Key(key));
                let value = self.input(field).value().to_string();
                self.session.set_field(field, &value);
            }
        }

        None
    }

    // ── Action processing ────────────────────────────────────────────

    /// Process a single action — update app state, spawn work.
    fn process_action(&mut self, action: &Action) {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Tick => {
                self.throbber_state.calc_next();
            }

            Action::FocusNext => self.focus = self.focus.next(),
            Action::FocusPrev => self.focus = self.focus.prev(),

            Action::ToggleSection(section) => {
                let excluded = self
                    .session
                    .draft_snapshot()
                    .excluded_sections
                    .contains(section);
                self.session.toggle_section(*section, !excluded);
            }

            Action::SubmitRequested => self.request_submit(),

            Action::SubmitSettled(outcome) => {
                debug!(?outcome, "submission settled");
            }

            // Layout is recomputed every frame; nothing to store.
            Action::Resize(..) | Action::Render => {}
        }
    }

    /// Kick off a submission unless one is already outstanding. The
    /// session holds the authoritative busy flag; this check only keeps
    /// the control disabled at the interface level.
    fn request_submit(&self) {
        if self.session.is_submitting() {
            debug!("submit ignored, already in flight");
            return;
        }

        let session = self.session.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let outcome = session.submit().await;
            let _ = tx.send(Action::SubmitSettled(outcome));
        });
    }

    // ── Input accessors ──────────────────────────────────────────────

    fn input(&self, field: Field) -> &Input {
        match field {
            Field::EventUrl => &self.url_input,
            Field::Cpf => &self.cpf_input,
            Field::TicketCount => &self.tickets_input,
            Field::Username => &self.username_input,
            Field::Password => &self.password_input,
        }
    }

    fn input_mut(&mut self, field: Field) -> &mut Input {
        match field {
            Field::EventUrl => &mut self.url_input,
            Field::Cpf => &mut self.cpf_input,
            Field::TicketCount => &mut self.tickets_input,
            Field::Username => &mut self.username_input,
            Field::Password => &mut self.password_input,
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&mut self, frame: &mut Frame) {
        let status_height = if self.session.live_updates() { 7 } else { 3 };
        let [header, body, status, footer] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(18),
            Constraint::Length(status_height),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.render_header(frame, header);
        self.render_body(frame, body);
        self.render_status(frame, status);
        self.render_footer(frame, footer);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let title = Paragraph::new(Line::styled(
            " Ingresso — ticket bot ",
            theme::title_style(),
        ))
        .centered()
        .block(block);
        frame.render_widget(title, area);
    }

    fn render_body(&mut self, frame: &mut Frame, area: Rect) {
        let [form_area, sections_area] =
            Layout::horizontal([Constraint::Percentage(58), Constraint::Percentage(42)])
                .areas(area);

        let [url_a, cpf_a, tickets_a, user_a, pass_a, submit_a] =
            Layout::vertical([Constraint::Length(3); 6]).areas(form_area);

        self.render_input(frame, url_a, Field::EventUrl);
        self.render_input(frame, cpf_a, Field::Cpf);
        self.render_input(frame, tickets_a, Field::TicketCount);
        self.render_input(frame, user_a, Field::Username);
        self.render_input(frame, pass_a, Field::Password);
        self.render_submit(frame, submit_a);
        self.render_sections(frame, sections_area);
    }

    fn render_input(&self, frame: &mut Frame, area: Rect, field: Field) {
        let focused = self.focus == FormFocus::Input(field);
        let input = self.input(field);

        let masked;
        let display: &str = if field == Field::Password {
            masked = "•".repeat(input.value().chars().count());
            &masked
        } else {
            input.value()
        };

        let inner_width = usize::from(area.width.saturating_sub(2));
        let scroll = input.visual_scroll(inner_width);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if focused {
                theme::border_focused()
            } else {
                theme::border_default()
            })
            .title(label(field));
        let paragraph = Paragraph::new(display)
            .style(theme::value_style())
            .scroll((0, u16::try_from(scroll).unwrap_or(0)))
            .block(block);
        frame.render_widget(paragraph, area);

        if focused {
            let cursor = input.visual_cursor().saturating_sub(scroll);
            let x = area.x + 1 + u16::try_from(cursor).unwrap_or(0);
            frame.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
        }
    }

    fn render_sections(&self, frame: &mut Frame, area: Rect) {
        let draft = self.session.draft_snapshot();
        let lines: Vec<Line> = ingresso_core::Section::CATALOG
            .iter()
            .enumerate()
            .map(|(index, section)| {
                let checked = draft.excluded_sections.contains(section);
                let marker = if checked { "[x]" } else { "[ ]" };
                let style = if self.focus == FormFocus::Section(index) {
                    theme::selected_style()
                } else {
                    theme::value_style()
                };
                Line::styled(format!(" {marker} {}", section.name()), style)
            })
            .collect();

        let focused = matches!(self.focus, FormFocus::Section(_));
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if focused {
                theme::border_focused()
            } else {
                theme::border_default()
            })
            .title("Sections without discount");
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_submit(&mut self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == FormFocus::Submit;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.session.is_submitting() {
            let throbber = Throbber::default()
                .label("Starting bot…")
                .style(theme::busy_style());
            frame.render_stateful_widget(throbber, inner, &mut self.throbber_state);
        } else {
            let style = if focused {
                theme::selected_style()
            } else {
                theme::value_style()
            };
            frame.render_widget(
                Paragraph::new(Line::styled("▶ Start Bot", style)).centered(),
                inner,
            );
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let messages = self.session.messages();
        let lines: Vec<Line> = if messages.is_empty() {
            vec![Line::styled("No status yet.", theme::hint_style())]
        } else {
            messages
                .into_iter()
                .map(|message| Line::styled(message, theme::value_style()))
                .collect()
        };

        let title = if self.session.live_updates() {
            "Status (live)"
        } else {
            "Status"
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default())
            .title(title);
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let hints = " Tab next · Space toggle · Enter start · Esc quit";
        frame.render_widget(
            Paragraph::new(Line::styled(hints, theme::hint_style())),
            area,
        );
    }
}
