//! UI rendering
//!
//! Pure rendering functions that draw state into terminal frames. Nothing
//! here mutates state; the text editor is passed in by the event loop.

mod lists;
mod login;
mod transformer;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use tui_textarea::TextArea;

use crate::app::{AppState, Screen};

/// Render the application UI
pub fn render(frame: &mut Frame, state: &AppState, textarea: &TextArea) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    match state.current_screen {
        Screen::Login => login::render(frame, chunks[0], state),
        Screen::Transformer => transformer::render(frame, chunks[0], state, textarea),
        Screen::History => lists::render_history(frame, chunks[0], state),
        Screen::Admin => lists::render_admin(frame, chunks[0], state),
    }

    render_status_bar(frame, chunks[1], state);

    if state.help_visible {
        render_help_overlay(frame, area, state);
    }

    if let Some(ref error) = state.error {
        render_error_overlay(frame, area, error, state);
    }
}

/// Foreground style, plain when colors are disabled
pub(crate) fn fg(state: &AppState, color: Color) -> Style {
    if state.config.colors_enabled {
        Style::default().fg(color)
    } else {
        Style::default()
    }
}

pub(crate) fn bordered<'a>(title: impl Into<Line<'a>>, border: Style) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border)
}

/// One-line bar: signed-in user, screen shortcuts, transient message
fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = Vec::new();

    match &state.user {
        Some(user) => {
            let label = if user.is_admin {
                format!(" {} (admin) ", user.username)
            } else {
                format!(" {} ", user.username)
            };
            spans.push(Span::styled(
                label,
                fg(state, Color::Cyan).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw("│ F2 Transform  F3 History "));
            if state.is_admin() {
                spans.push(Span::raw(" F4 Admin "));
            }
            spans.push(Span::raw(" F9 Sign out "));
        }
        None => spans.push(Span::raw(" Not signed in ")),
    }
    spans.push(Span::raw("│ F1 Help  Ctrl+Q Quit "));

    if let Some(ref message) = state.status.message {
        spans.push(Span::raw("│ "));
        spans.push(Span::styled(message.as_str(), fg(state, Color::Yellow)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup_area = centered_rect(64, 80, area);
    let heading = Style::default().add_modifier(Modifier::BOLD);

    let help_text = vec![
        Line::from(Span::styled("Keyboard Shortcuts", heading)),
        Line::from(""),
        Line::from("Global:"),
        Line::from("  Ctrl+Q   - Quit"),
        Line::from("  F1       - Toggle help"),
        Line::from("  F2/F3/F4 - Transformer / History / Admin"),
        Line::from("  F9       - Sign out"),
        Line::from("  Esc      - Dismiss overlays"),
        Line::from(""),
        Line::from("Sign in:"),
        Line::from("  Tab      - Next field"),
        Line::from("  Ctrl+T   - Switch between sign in and register"),
        Line::from("  Enter    - Submit"),
        Line::from(""),
        Line::from("Transformer:"),
        Line::from("  Ctrl+S   - Transform"),
        Line::from("  Ctrl+R   - Replay the last result"),
        Line::from("  Ctrl+L   - Clear input and output"),
        Line::from("  Ctrl+E   - Export output as PNG"),
        Line::from("  Ctrl+Y   - Copy output"),
        Line::from("  Ctrl+P   - Next persona"),
        Line::from("  Ctrl+B   - Next verbosity level"),
        Line::from("  Ctrl+T   - Toggle typewriter animation"),
        Line::from("  Ctrl+O   - Next provider"),
        Line::from(""),
        Line::from("History / Admin:"),
        Line::from("  Type     - Search"),
        Line::from("  Up/Down  - Select"),
        Line::from("  Ctrl+Y   - Copy selected output"),
        Line::from("  Ctrl+U   - Refresh"),
        Line::from("  Tab      - Switch admin tab"),
        Line::from(""),
        Line::from("Press Esc or F1 to close"),
    ];

    let help = Paragraph::new(help_text)
        .block(bordered(" Help ", fg(state, Color::Cyan)))
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, popup_area);
    frame.render_widget(help, popup_area);
}

fn render_error_overlay(frame: &mut Frame, area: Rect, error: &str, state: &AppState) {
    let popup_area = centered_rect(70, 30, area);

    let error_text = vec![
        Line::from(Span::styled(
            "Error",
            fg(state, Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(error),
        Line::from(""),
        Line::from("Press Esc to dismiss"),
    ];

    let error_widget = Paragraph::new(error_text)
        .block(bordered(" Error ", fg(state, Color::Red)))
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Center);

    frame.render_widget(Clear, popup_area);
    frame.render_widget(error_widget, popup_area);
}

/// Rectangle of the given percentage size centered in `r`
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
