//! Sign-in and registration form

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use super::{bordered, centered_rect, fg};
use crate::app::{AppState, LoginField, LoginMode};

pub(super) fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup = centered_rect(60, 60, area);
    let login = &state.login;

    let title = match login.mode {
        LoginMode::SignIn => " Sign in to Stylecast ",
        LoginMode::Register => " Create a Stylecast account ",
    };

    let mut lines = vec![Line::from("")];

    if state.restoring {
        lines.push(Line::from(Span::styled(
            "Checking saved session...",
            fg(state, Color::Yellow),
        )));
    } else {
        for field in login.fields() {
            let (label, value) = match field {
                LoginField::Username => ("Username", login.username.clone()),
                LoginField::Email => ("Email   ", login.email.clone()),
                LoginField::Password => ("Password", "*".repeat(login.password.chars().count())),
            };
            let focused = *field == login.focus;
            let marker = if focused { "> " } else { "  " };
            let value_style = if focused {
                fg(state, Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let cursor = if focused && !login.submitting { "_" } else { "" };

            lines.push(Line::from(vec![
                Span::raw(marker),
                Span::raw(format!("{}: ", label)),
                Span::styled(format!("{}{}", value, cursor), value_style),
            ]));
            lines.push(Line::from(""));
        }

        if login.submitting {
            let message = match login.mode {
                LoginMode::SignIn => "Signing in...",
                LoginMode::Register => "Creating account...",
            };
            lines.push(Line::from(Span::styled(message, fg(state, Color::Yellow))));
        } else {
            let toggle = match login.mode {
                LoginMode::SignIn => "Ctrl+T: create an account",
                LoginMode::Register => "Ctrl+T: sign in instead",
            };
            lines.push(Line::from(Span::styled(
                format!("Enter: submit | Tab: next field | {}", toggle),
                fg(state, Color::Gray),
            )));
        }
    }

    let form = Paragraph::new(lines)
        .block(bordered(title, fg(state, Color::Cyan)))
        .alignment(Alignment::Left);

    frame.render_widget(Clear, popup);
    frame.render_widget(form, popup);
}
