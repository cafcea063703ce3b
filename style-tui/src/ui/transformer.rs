//! Transformer screen: settings line, input editor, revealed output, hints

use libstylecast::types::persona_info;
use libstylecast::RevealStatus;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};
use tui_textarea::TextArea;

use super::{bordered, fg};
use crate::app::AppState;

pub(super) fn render(frame: &mut Frame, area: Rect, state: &AppState, textarea: &TextArea) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    render_settings(frame, rows[0], state);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    render_input(frame, panes[0], state, textarea);
    render_output(frame, panes[1], state);
    render_hints(frame, rows[2], state);
}

fn render_settings(frame: &mut Frame, area: Rect, state: &AppState) {
    let transformer = &state.transformer;
    let value = fg(state, Color::Cyan).add_modifier(Modifier::BOLD);

    let style_badge = persona_info(&transformer.persona)
        .map(|p| format!(" ({})", p.style))
        .unwrap_or_default();
    let provider = transformer.provider.as_deref().unwrap_or("server default");
    let animate = if transformer.animate { "on" } else { "off" };

    let line = Line::from(vec![
        Span::raw("Persona: "),
        Span::styled(state.persona_label().to_string(), value),
        Span::raw(style_badge),
        Span::raw("  Verbosity: "),
        Span::styled(transformer.verbosity.label(), value),
        Span::raw("  Provider: "),
        Span::styled(provider.to_string(), value),
        Span::raw("  Typewriter: "),
        Span::styled(animate, value),
    ]);

    frame.render_widget(
        Paragraph::new(line).block(bordered(" Settings ", Style::default())),
        area,
    );
}

fn render_input(frame: &mut Frame, area: Rect, state: &AppState, textarea: &TextArea) {
    let border = if state.transformer.pending {
        fg(state, Color::Yellow)
    } else {
        fg(state, Color::Green)
    };
    let title = format!(" Input ({} chars) ", state.transformer.input.chars().count());
    let block = bordered(title, border);
    let inner = block.inner(area);

    frame.render_widget(block, area);
    frame.render_widget(textarea, inner);
}

fn render_output(frame: &mut Frame, area: Rect, state: &AppState) {
    let transformer = &state.transformer;
    let reveal = &transformer.reveal;

    let title = match reveal.status {
        RevealStatus::Running => format!(
            " Output: revealing {}/{} ",
            reveal.revealed_len, reveal.total_len
        ),
        RevealStatus::Idle => " Output ".to_string(),
        status => format!(" Output: {} ", status),
    };

    let border = match reveal.status {
        RevealStatus::Running => fg(state, Color::Yellow),
        RevealStatus::Completed => fg(state, Color::Green),
        RevealStatus::Cancelled => fg(state, Color::Magenta),
        RevealStatus::Idle => Style::default(),
    };

    let mut lines: Vec<Line> = if reveal.revealed_text.is_empty() && reveal.status == RevealStatus::Idle
    {
        let hint = if transformer.pending {
            "Transforming..."
        } else {
            "The transformed text appears here."
        };
        vec![Line::from(Span::styled(hint, fg(state, Color::Gray)))]
    } else {
        reveal.revealed_text.lines().map(Line::from).collect()
    };

    if reveal.status == RevealStatus::Running {
        match lines.last_mut() {
            Some(last) => last.push_span(Span::raw("▌")),
            None => lines.push(Line::from("▌")),
        }
    }

    if transformer.pending && reveal.status != RevealStatus::Idle {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Transforming...",
            fg(state, Color::Yellow),
        )));
    }

    let output = Paragraph::new(lines)
        .block(bordered(title, border))
        .wrap(Wrap { trim: false });
    frame.render_widget(output, area);
}

fn render_hints(frame: &mut Frame, area: Rect, state: &AppState) {
    let enabled = Style::default();
    let disabled = fg(state, Color::DarkGray);
    let hint = |label: &'static str, on: bool| {
        Span::styled(label, if on { enabled } else { disabled })
    };

    let line = Line::from(vec![
        hint("^S Transform", state.can_transform()),
        Span::raw("  "),
        hint("^R Replay", state.can_retry()),
        Span::raw("  "),
        hint("^L Clear", true),
        Span::raw("  "),
        hint("^E Export", state.can_export()),
        Span::raw("  "),
        hint("^Y Copy", state.copy_target().is_some()),
        Span::raw("  "),
        hint("^P Persona  ^B Verbosity  ^T Typewriter  ^O Provider", true),
    ]);

    frame.render_widget(
        Paragraph::new(line).block(bordered(" Keys ", Style::default())),
        area,
    );
}
