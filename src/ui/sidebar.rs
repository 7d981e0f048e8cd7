// Sidebar rendering with usage help and the optional log panel.
// The log panel shows the tail of the diagnostics buffer.

use ratatui::{prelude::*, widgets::*};

use crate::app::App;

/// Characters of log text kept in the panel.
pub const LOG_PANEL_MAX_CHARS: usize = 2000;

const HELP_TEXT: &str = "\
How to Use
1. Enter your exam question in the text box.
2. Select the relevant subject.
3. Press Enter to get the answer.

Feedback
Your feedback is valuable. Please let us know if the answers are helpful.";

/// Draw the sidebar column.
pub fn draw_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(12), // Help
            Constraint::Min(3),     // Logs
        ])
        .split(area);

    let help = Paragraph::new(HELP_TEXT)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Help "));
    frame.render_widget(help, chunks[0]);

    draw_logs(frame, app, chunks[1]);
}

fn draw_logs(frame: &mut Frame, app: &App, area: Rect) {
    let unseen = app.unseen_errors();
    let title = if unseen > 0 {
        format!(" Logs ({}) ", unseen)
    } else {
        " Logs ".to_string()
    };
    let title_style = if unseen > 0 {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_style(title_style);

    if !app.show_logs {
        let text = Paragraph::new("[ ] Show logs (F2)")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(text, area);
        return;
    }

    if app.sink.is_empty() {
        let text = Paragraph::new("No messages")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(text, area);
        return;
    }

    let contents = app.sink.render_tail(LOG_PANEL_MAX_CHARS);
    let lines: Vec<Line> = contents.lines().map(styled_log_line).collect();

    // Pin the newest line to the bottom
    let visible = area.height.saturating_sub(2) as usize;
    let scroll_y = lines.len().saturating_sub(visible) as u16;

    let text = Paragraph::new(lines).block(block).scroll((scroll_y, 0));
    frame.render_widget(text, area);
}

fn styled_log_line(line: &str) -> Line<'_> {
    if line.contains(" ERROR: ") {
        Line::styled(line, Style::default().fg(Color::Red))
    } else {
        Line::styled(line, Style::default().fg(Color::Gray))
    }
}
