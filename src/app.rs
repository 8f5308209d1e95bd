use crate::ui::{self, Screen, UiState};
use anyhow::Result;
use chrono::NaiveDateTime;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use drill::clock::{self, format_timestamp};
use drill::review;
use drill::{Answer, Card, Storage};
use ratatui::{DefaultTerminal, Frame};
use std::time::Instant;

/// Application state phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Question of the most overdue card is shown
    Question,
    /// Answer revealed, waiting for a verdict
    Answer,
    /// Add-card form is open
    Adding,
    /// Nothing is due
    Empty,
}

/// Which form field receives typed text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Field {
    #[default]
    Question,
    Answer,
}

#[derive(Debug, Default)]
struct Draft {
    question: String,
    answer: String,
    field: Field,
}

impl Draft {
    fn active(&mut self) -> &mut String {
        match self.field {
            Field::Question => &mut self.question,
            Field::Answer => &mut self.answer,
        }
    }
}

/// User intent, decoded from a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Reveal,
    Mark(Answer),
    StartAdding,
    Input(char),
    Backspace,
    SwitchField,
    SaveCard,
    CancelAdding,
    Refresh,
    Quit,
}

/// Study session statistics
#[derive(Debug, Clone, Copy)]
pub struct SessionStats {
    pub reviewed: usize,
    pub correct: usize,
    pub added: usize,
    pub start_time: Instant,
}

/// Main application state
pub struct App {
    storage: Storage,
    clock: fn() -> NaiveDateTime,
    phase: Phase,
    // Snapshot of due cards, most overdue first
    due: Vec<Card>,
    total_cards: usize,
    draft: Draft,
    status: Option<String>,
    stats: SessionStats,
    should_exit: bool,
}

impl App {
    /// Create a new application on the local wall clock
    pub fn new(storage: Storage) -> Self {
        Self::with_clock(storage, clock::now)
    }

    pub fn with_clock(storage: Storage, clock: fn() -> NaiveDateTime) -> Self {
        Self {
            storage,
            clock,
            phase: Phase::Empty,
            due: Vec::new(),
            total_cards: 0,
            draft: Draft::default(),
            status: None,
            stats: SessionStats {
                reviewed: 0,
                correct: 0,
                added: 0,
                start_time: Instant::now(),
            },
            should_exit: false,
        }
    }

    /// Run the application until the user quits
    pub fn run(mut self, terminal: &mut DefaultTerminal) -> Result<SessionStats> {
        self.refresh()?;

        while !self.should_exit {
            terminal.draw(|frame| self.render(frame))?;

            if let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
                && let Some(command) = self.command_for(key)
            {
                self.execute(command)?;
            }
        }

        Ok(self.stats)
    }

    /// Reload the due snapshot and pick the phase that matches it
    fn refresh(&mut self) -> Result<()> {
        let now = (self.clock)();
        self.due = review::list_due_cards(&self.storage, now)?;
        self.total_cards = self.storage.count_cards()?;
        self.phase = if self.due.is_empty() {
            Phase::Empty
        } else {
            Phase::Question
        };
        Ok(())
    }

    fn current_card(&self) -> Option<&Card> {
        self.due.first()
    }

    /// Map a key press to a command for the current phase
    pub fn command_for(&self, key: KeyEvent) -> Option<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Command::Quit);
        }

        if self.phase == Phase::Adding {
            return match key.code {
                KeyCode::Esc => Some(Command::CancelAdding),
                KeyCode::Tab | KeyCode::BackTab => Some(Command::SwitchField),
                KeyCode::Enter => Some(Command::SaveCard),
                KeyCode::Backspace => Some(Command::Backspace),
                KeyCode::Char(c) => Some(Command::Input(c)),
                _ => None,
            };
        }

        match (self.phase, key.code) {
            (Phase::Question, KeyCode::Char(' ') | KeyCode::Enter) => Some(Command::Reveal),
            (Phase::Answer, KeyCode::Char('y') | KeyCode::Right) => {
                Some(Command::Mark(Answer::Correct))
            }
            (Phase::Answer, KeyCode::Char('n') | KeyCode::Left) => {
                Some(Command::Mark(Answer::Incorrect))
            }
            (_, KeyCode::Char('a')) => Some(Command::StartAdding),
            (_, KeyCode::Char('r')) => Some(Command::Refresh),
            (_, KeyCode::Char('q') | KeyCode::Esc) => Some(Command::Quit),
            _ => None,
        }
    }

    /// Run one command to completion, then re-query what is due
    pub fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Reveal => {
                if self.phase == Phase::Question {
                    self.phase = Phase::Answer;
                }
            }
            Command::Mark(answer) => {
                if self.phase != Phase::Answer {
                    return Ok(());
                }
                let Some(id) = self.current_card().map(|c| c.id) else {
                    return Ok(());
                };

                let state = review::record_answer(&self.storage, id, answer, (self.clock)())?;

                self.stats.reviewed += 1;
                if answer.is_correct() {
                    self.stats.correct += 1;
                }
                self.status = Some(format!(
                    "Stage {}, next review {}",
                    state.stage,
                    format_timestamp(state.next_review)
                ));
                self.refresh()?;
            }
            Command::StartAdding => {
                self.draft = Draft::default();
                self.status = None;
                self.phase = Phase::Adding;
            }
            Command::Input(c) => {
                if self.phase == Phase::Adding {
                    self.draft.active().push(c);
                }
            }
            Command::Backspace => {
                if self.phase == Phase::Adding {
                    self.draft.active().pop();
                }
            }
            Command::SwitchField => {
                self.draft.field = match self.draft.field {
                    Field::Question => Field::Answer,
                    Field::Answer => Field::Question,
                };
            }
            Command::SaveCard => {
                if self.phase != Phase::Adding {
                    return Ok(());
                }
                let draft = std::mem::take(&mut self.draft);
                let id = review::create_card(
                    &self.storage,
                    &draft.question,
                    &draft.answer,
                    (self.clock)(),
                )?;
                self.stats.added += 1;
                self.status = Some(format!("Added card {}", id));
                self.refresh()?;
            }
            Command::CancelAdding => {
                self.draft = Draft::default();
                self.refresh()?;
            }
            Command::Refresh => {
                self.status = None;
                self.refresh()?;
            }
            Command::Quit => {
                self.should_exit = true;
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&self, frame: &mut Frame) {
        let screen = match (self.phase, self.current_card()) {
            (Phase::Adding, _) => Screen::Adding {
                question: &self.draft.question,
                answer: &self.draft.answer,
                editing_answer: self.draft.field == Field::Answer,
            },
            (Phase::Question, Some(card)) => Screen::Question { card },
            (Phase::Answer, Some(card)) => Screen::Answer { card },
            _ => Screen::Empty,
        };

        let state = UiState {
            screen,
            due_count: self.due.len(),
            total_cards: self.total_cards,
            reviewed: self.stats.reviewed,
            correct: self.stats.correct,
            status: self.status.as_deref(),
        };
        ui::render(frame, &state);
    }
}
