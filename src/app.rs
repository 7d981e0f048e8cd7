// App state and main event loop.
// Manages the question form, feedback buttons, and keyboard input handling.

use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;

use crate::cache::Clock;
use crate::coach::QueryCoordinator;
use crate::diagnostics::{DiagnosticsSink, LogLevel};
use crate::groq::CompletionClient;
use crate::ui;

/// Subjects offered in the selector. Display only.
pub const SUBJECTS: [&str; 5] = ["Math", "Science", "History", "Language Arts", "Other"];

/// Form field that receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Question,
    Subject,
    Feedback,
}

impl Focus {
    pub fn next(&self) -> Self {
        match self {
            Focus::Question => Focus::Subject,
            Focus::Subject => Focus::Feedback,
            Focus::Feedback => Focus::Question,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Focus::Question => Focus::Feedback,
            Focus::Subject => Focus::Question,
            Focus::Feedback => Focus::Subject,
        }
    }
}

/// The two feedback buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Feedback {
    #[default]
    Yes,
    No,
}

impl Feedback {
    pub fn label(&self) -> &'static str {
        match self {
            Feedback::Yes => "Yes",
            Feedback::No => "No",
        }
    }

    pub fn acknowledgement(&self) -> &'static str {
        match self {
            Feedback::Yes => "Thank you for your feedback!",
            Feedback::No => "Sorry about that. We'll try to improve.",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Feedback::Yes => Feedback::No,
            Feedback::No => Feedback::Yes,
        }
    }
}

/// Where the current answer is in its lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AnswerState {
    #[default]
    Idle,
    Fetching,
    Answered(String),
}

/// Something the event loop must do outside of state updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Submit(String),
}

/// Main application state.
pub struct App {
    /// Credential passed through to the coordinator.
    api_key: String,
    /// Question text being typed.
    pub question: String,
    /// Index into [`SUBJECTS`].
    pub subject_index: usize,
    /// Field receiving keyboard input.
    pub focus: Focus,
    /// Answer to the last submitted question.
    pub answer: AnswerState,
    /// Highlighted feedback button.
    pub feedback_selection: Feedback,
    /// Button pressed for the current answer, if any.
    pub feedback: Option<Feedback>,
    /// Whether the sidebar log panel is visible.
    pub show_logs: bool,
    /// Whether the keybinding overlay is visible.
    pub show_help: bool,
    /// Error records already seen in the log panel (for badge).
    pub errors_seen: usize,
    /// Entries currently held by the answer cache.
    pub cached_entries: usize,
    /// Shared diagnostics buffer backing the log panel.
    pub sink: DiagnosticsSink,
    /// Whether the app should exit.
    pub should_quit: bool,
}

impl App {
    pub fn new(api_key: impl Into<String>, sink: DiagnosticsSink) -> Self {
        Self {
            api_key: api_key.into(),
            question: String::new(),
            subject_index: 0,
            focus: Focus::default(),
            answer: AnswerState::default(),
            feedback_selection: Feedback::default(),
            feedback: None,
            show_logs: false,
            show_help: false,
            errors_seen: 0,
            cached_entries: 0,
            sink,
            should_quit: false,
        }
    }

    pub fn subject(&self) -> &'static str {
        SUBJECTS[self.subject_index % SUBJECTS.len()]
    }

    /// Error records not yet seen in the log panel.
    pub fn unseen_errors(&self) -> usize {
        self.sink
            .count(LogLevel::Error)
            .saturating_sub(self.errors_seen)
    }

    /// Main event loop.
    pub async fn run<C, K>(
        &mut self,
        terminal: &mut Terminal<impl Backend>,
        coach: &QueryCoordinator<C, K>,
    ) -> io::Result<()>
    where
        C: CompletionClient,
        K: Clock,
    {
        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;

            if let Some(Action::Submit(question)) = self.handle_events()? {
                self.answer = AnswerState::Fetching;
                self.feedback = None;
                terminal.draw(|frame| ui::draw(frame, self))?;

                let answer = coach.answer(&self.api_key, &question).await;
                coach.purge_expired();
                self.cached_entries = coach.cached_entries();
                self.answer = AnswerState::Answered(answer);
                self.mark_logs_seen_if_visible();
            }
        }
        Ok(())
    }

    /// Poll for terminal events.
    #[allow(clippy::collapsible_if)]
    fn handle_events(&mut self) -> io::Result<Option<Action>> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.handle_key(key));
                }
            }
        }
        Ok(None)
    }

    /// Apply a key press to the form state.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('l') if ctrl => self.toggle_logs(),
            KeyCode::F(1) => self.show_help = !self.show_help,
            KeyCode::F(2) => self.toggle_logs(),
            KeyCode::Esc => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            _ => return self.handle_field_key(key),
        }
        None
    }

    fn handle_field_key(&mut self, key: KeyEvent) -> Option<Action> {
        match self.focus {
            Focus::Question => match key.code {
                KeyCode::Enter if !self.question.is_empty() => {
                    return Some(Action::Submit(self.question.clone()));
                }
                KeyCode::Backspace => {
                    self.question.pop();
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.question.push(c);
                }
                _ => {}
            },
            Focus::Subject => match key.code {
                KeyCode::Up | KeyCode::Left | KeyCode::Char('k') => {
                    self.subject_index = (self.subject_index + SUBJECTS.len() - 1) % SUBJECTS.len();
                }
                KeyCode::Down | KeyCode::Right | KeyCode::Char('j') => {
                    self.subject_index = (self.subject_index + 1) % SUBJECTS.len();
                }
                _ => {}
            },
            Focus::Feedback => {
                if matches!(self.answer, AnswerState::Answered(_)) {
                    match key.code {
                        KeyCode::Left | KeyCode::Right | KeyCode::Char('h') | KeyCode::Char('l') => {
                            self.feedback_selection = self.feedback_selection.toggle();
                        }
                        KeyCode::Char('y') => self.feedback = Some(Feedback::Yes),
                        KeyCode::Char('n') => self.feedback = Some(Feedback::No),
                        KeyCode::Enter => self.feedback = Some(self.feedback_selection),
                        _ => {}
                    }
                }
            }
        }
        None
    }

    fn toggle_logs(&mut self) {
        self.show_logs = !self.show_logs;
        self.mark_logs_seen_if_visible();
    }

    /// Clear the error badge once the log panel is on screen.
    fn mark_logs_seen_if_visible(&mut self) {
        if self.show_logs {
            self.errors_seen = self.sink.count(LogLevel::Error);
        }
    }
}
