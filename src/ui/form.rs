// Question form rendering.
// Title, question input, subject selector, answer, and feedback buttons.

use ratatui::{prelude::*, widgets::*};

use crate::app::{AnswerState, App, Feedback, Focus};

use super::field_style;

/// Draw the form column.
pub fn draw_form(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title and description
            Constraint::Length(3), // Question input
            Constraint::Length(3), // Subject selector
            Constraint::Min(3),    // Answer
            Constraint::Length(4), // Feedback
        ])
        .split(area);

    draw_header(frame, chunks[0]);
    draw_question_input(frame, app, chunks[1]);
    draw_subject_selector(frame, app, chunks[2]);
    draw_answer(frame, app, chunks[3]);
    draw_feedback(frame, app, chunks[4]);
}

fn draw_header(frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "Exam Preparation Coach",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from("Ask any question to prepare for your exams."),
    ])
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(header, area);
}

fn draw_question_input(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(field_style(app, Focus::Question))
        .title(" Enter your exam question ");

    let mut spans = vec![Span::raw(app.question.as_str())];
    if app.focus == Focus::Question {
        spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
    }

    // Keep the cursor end in view for long questions
    let inner_width = area.width.saturating_sub(3) as usize;
    let scroll_x = app.question.chars().count().saturating_sub(inner_width) as u16;

    let input = Paragraph::new(Line::from(spans))
        .block(block)
        .scroll((0, scroll_x));
    frame.render_widget(input, area);
}

fn draw_subject_selector(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(field_style(app, Focus::Subject))
        .title(" Select subject ");

    let line = Line::from(vec![
        Span::styled("‹ ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.subject(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(" ›", Style::default().fg(Color::DarkGray)),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_answer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Answer ");

    let text = match &app.answer {
        AnswerState::Idle => Paragraph::new("Type a question and press Enter")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        AnswerState::Fetching => Paragraph::new("⏳ Fetching the answer...")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow)),
        AnswerState::Answered(answer) => Paragraph::new(answer.as_str()).wrap(Wrap { trim: false }),
    };

    frame.render_widget(text.block(block), area);
}

fn draw_feedback(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(field_style(app, Focus::Feedback))
        .title(" Was this answer helpful? ");

    if !matches!(app.answer, AnswerState::Answered(_)) {
        frame.render_widget(block, area);
        return;
    }

    let focused = app.focus == Focus::Feedback;
    let button = |choice: Feedback| {
        let style = if focused && app.feedback_selection == choice {
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Span::styled(format!("[ {} ]", choice.label()), style)
    };

    let mut lines = vec![Line::from(vec![
        button(Feedback::Yes),
        Span::raw("  "),
        button(Feedback::No),
    ])];
    if let Some(feedback) = app.feedback {
        lines.push(Line::from(Span::styled(
            feedback.acknowledgement(),
            Style::default().fg(Color::Green),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
