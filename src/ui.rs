use drill::Card;
use drill::clock::format_timestamp;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// What the body of the screen shows
pub enum Screen<'a> {
    Question {
        card: &'a Card,
    },
    Answer {
        card: &'a Card,
    },
    Adding {
        question: &'a str,
        answer: &'a str,
        editing_answer: bool,
    },
    Empty,
}

/// UI state for rendering
pub struct UiState<'a> {
    pub screen: Screen<'a>,
    /// Cards in the current due snapshot
    pub due_count: usize,
    pub total_cards: usize,
    /// Session tallies
    pub reviewed: usize,
    pub correct: usize,
    /// One-line feedback from the last command
    pub status: Option<&'a str>,
}

pub fn render(frame: &mut Frame, state: &UiState) {
    let area = frame.area();

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header
        Constraint::Fill(1),   // Top spacer
        Constraint::Length(7), // Body
        Constraint::Fill(1),   // Bottom spacer
        Constraint::Length(1), // Status
        Constraint::Length(1), // Key help
    ])
    .split(area);

    render_header(frame, state, chunks[0]);

    let help = match &state.screen {
        Screen::Question { card } => {
            render_question(frame, card, false, chunks[2]);
            "space reveal · a add · r refresh · q quit"
        }
        Screen::Answer { card } => {
            render_question(frame, card, true, chunks[2]);
            "y correct · n incorrect · a add · q quit"
        }
        Screen::Adding {
            question,
            answer,
            editing_answer,
        } => {
            render_form(frame, question, answer, *editing_answer, chunks[2]);
            "tab switch field · enter save · esc cancel"
        }
        Screen::Empty => {
            let lines = vec![
                Line::from(Span::styled(
                    "Nothing to review right now",
                    Style::default().fg(Color::Green),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Add a card, or refresh later",
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            frame.render_widget(
                Paragraph::new(lines).alignment(Alignment::Center),
                chunks[2],
            );
            "a add · r refresh · q quit"
        }
    };

    if let Some(msg) = state.status {
        let status = Paragraph::new(msg)
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center);
        frame.render_widget(status, chunks[4]);
    }

    let help = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[5]);
}

fn render_header(frame: &mut Frame, state: &UiState, area: Rect) {
    let text = format!(
        "{} due / {} total    reviewed {} · correct {}",
        state.due_count, state.total_cards, state.reviewed, state.correct
    );
    let header = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(header, area);
}

fn render_question(frame: &mut Frame, card: &Card, show_answer: bool, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(
            format!(
                "stage {} · {} correct · due {}",
                card.stage,
                card.correct_count,
                format_timestamp(card.next_review)
            ),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            card.question.as_str(),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
    ];

    if show_answer {
        lines.push(Line::from(vec![
            Span::styled("Answer: ", Style::default().fg(Color::DarkGray)),
            Span::styled(card.answer.as_str(), Style::default().fg(Color::Cyan)),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_form(
    frame: &mut Frame,
    question: &str,
    answer: &str,
    editing_answer: bool,
    area: Rect,
) {
    let field = |label: &'static str, value: &str, active: bool| {
        let (marker, style) = if active {
            ("> ", Style::default().fg(Color::Cyan))
        } else {
            ("  ", Style::default().fg(Color::White))
        };
        let cursor = if active { "_" } else { "" };
        Line::from(vec![
            Span::styled(format!("{marker}{label}: "), Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{value}{cursor}"), style),
        ])
    };

    let lines = vec![
        Line::from(Span::styled("New card", Style::default().fg(Color::White))),
        Line::from(""),
        field("Question", question, !editing_answer),
        field("Answer", answer, editing_answer),
    ];

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}
