// UI module for rendering the TUI.
// Contains the question form, the help/log sidebar, and overlays.

mod form;
mod sidebar;

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Focus};

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(40),    // Form
            Constraint::Length(44), // Sidebar
        ])
        .split(frame.area());

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Form content
            Constraint::Length(1), // Status bar
        ])
        .split(columns[0]);

    form::draw_form(frame, app, rows[0]);
    draw_status_bar(frame, app, rows[1]);
    sidebar::draw_sidebar(frame, app, columns[1]);

    // Help overlay (rendered last, on top of everything)
    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Border style for a form field, highlighted when focused.
fn field_style(app: &App, field: Focus) -> Style {
    if app.focus == field {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Draw the status bar with keybinding hints and cache size.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut hints = vec![
        Span::raw(" ↵ "),
        Span::styled("Ask", Style::default().fg(Color::DarkGray)),
        Span::raw("  Tab "),
        Span::styled("Next field", Style::default().fg(Color::DarkGray)),
        Span::raw("  F1 "),
        Span::styled("Help", Style::default().fg(Color::DarkGray)),
        Span::raw("  F2 "),
        Span::styled("Logs", Style::default().fg(Color::DarkGray)),
        Span::raw("  Esc "),
        Span::styled("Quit", Style::default().fg(Color::DarkGray)),
    ];

    hints.push(Span::styled(
        format!("  Cached: {}", app.cached_entries),
        Style::default().fg(Color::DarkGray),
    ));

    let status = Paragraph::new(Line::from(hints));
    frame.render_widget(status, area);
}

/// Draw the keybinding overlay.
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    // Create a centered popup
    let popup_width = 50;
    let popup_height = 15;
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(
        popup_x,
        popup_y,
        popup_width.min(area.width),
        popup_height.min(area.height),
    );

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let key_style = Style::default().fg(Color::Cyan);
    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Enter         ", key_style),
            Span::raw("Ask question / press button"),
        ]),
        Line::from(vec![
            Span::styled("  Tab/Shift-Tab ", key_style),
            Span::raw("Move between fields"),
        ]),
        Line::from(vec![
            Span::styled("  ↑/↓           ", key_style),
            Span::raw("Change subject"),
        ]),
        Line::from(vec![
            Span::styled("  ←/→  y/n      ", key_style),
            Span::raw("Choose feedback"),
        ]),
        Line::from(vec![
            Span::styled("  F2 or ^L      ", key_style),
            Span::raw("Show/hide logs"),
        ]),
        Line::from(vec![
            Span::styled("  F1            ", key_style),
            Span::raw("Show/hide this help"),
        ]),
        Line::from(vec![
            Span::styled("  Esc or ^C     ", key_style),
            Span::raw("Quit"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::DarkGray)),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::styled(" or ", Style::default().fg(Color::DarkGray)),
            Span::styled("F1", Style::default().fg(Color::Yellow)),
            Span::styled(" to close", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .alignment(Alignment::Left);

    frame.render_widget(help_paragraph, popup_area);
}
