//! History gallery and admin dashboard

use libstylecast::types::{persona_info, Transformation, User};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

use super::{bordered, fg};
use crate::app::{AdminTab, AppState};

const PREVIEW_CHARS: usize = 48;

pub(super) fn render_history(frame: &mut Frame, area: Rect, state: &AppState) {
    let history = &state.history;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(10),
        ])
        .split(area);

    render_search(frame, rows[0], state, &history.search);

    let visible = history.visible();
    let title = format!(" History ({} of {}) ", visible.len(), history.rows.len());
    if history.loading {
        render_message(frame, rows[1], state, &title, "Loading...");
    } else if visible.is_empty() {
        let message = if history.rows.is_empty() {
            "No transformations yet."
        } else {
            "Nothing matches the search."
        };
        render_message(frame, rows[1], state, &title, message);
    } else {
        let items: Vec<ListItem> = visible
            .iter()
            .map(|row| transformation_item(row, false))
            .collect();
        render_list(frame, rows[1], state, &title, items, history.selected);
    }

    render_detail(frame, rows[2], state, history.selected_row());
}

pub(super) fn render_admin(frame: &mut Frame, area: Rect, state: &AppState) {
    let admin = &state.admin;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
        ])
        .split(area);

    let selected_tab = match admin.tab {
        AdminTab::Transformations => 0,
        AdminTab::Users => 1,
    };
    let tabs = Tabs::new(vec![
        format!("Transformations ({})", admin.transformations.len()),
        format!("Users ({})", admin.users.len()),
    ])
    .select(selected_tab)
    .highlight_style(fg(state, Color::Cyan).add_modifier(Modifier::BOLD))
    .block(bordered(" Admin (Tab to switch) ", Style::default()));
    frame.render_widget(tabs, rows[0]);

    render_search(frame, rows[1], state, &admin.search);

    if admin.loading {
        render_message(frame, rows[2], state, " Admin ", "Loading...");
        return;
    }

    match admin.tab {
        AdminTab::Transformations => {
            let visible = admin.visible_transformations();
            let items: Vec<ListItem> = visible
                .iter()
                .map(|row| transformation_item(row, true))
                .collect();
            let title = format!(" Transformations ({}) ", items.len());
            render_list(frame, rows[2], state, &title, items, admin.selected);
        }
        AdminTab::Users => {
            let visible = admin.visible_users();
            let items: Vec<ListItem> = visible.iter().map(|user| user_item(state, user)).collect();
            let title = format!(" Users ({}) ", items.len());
            render_list(frame, rows[2], state, &title, items, admin.selected);
        }
    }
}

fn render_search(frame: &mut Frame, area: Rect, state: &AppState, search: &str) {
    let line = if search.is_empty() {
        Line::from(Span::styled(
            "Type to search input and output text",
            fg(state, Color::Gray),
        ))
    } else {
        Line::from(vec![Span::raw(search.to_string()), Span::raw("_")])
    };
    frame.render_widget(
        Paragraph::new(line).block(bordered(" Search ", Style::default())),
        area,
    );
}

fn render_message(frame: &mut Frame, area: Rect, state: &AppState, title: &str, message: &str) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        message.to_string(),
        fg(state, Color::Gray),
    )))
    .block(bordered(title.to_string(), Style::default()));
    frame.render_widget(paragraph, area);
}

fn render_list(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    title: &str,
    items: Vec<ListItem>,
    selected: usize,
) {
    let mut list_state = ListState::default();
    if !items.is_empty() {
        list_state.select(Some(selected.min(items.len() - 1)));
    }

    let list = List::new(items)
        .block(bordered(title.to_string(), Style::default()))
        .highlight_style(fg(state, Color::Cyan).add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_detail(frame: &mut Frame, area: Rect, state: &AppState, row: Option<&Transformation>) {
    let Some(row) = row else {
        frame.render_widget(bordered(" Details ", Style::default()), area);
        return;
    };

    let label = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(vec![
            Span::styled("Input: ", label),
            Span::raw(row.input_text.clone()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Output: ", label),
            Span::styled(row.output_text.clone(), fg(state, Color::Cyan)),
        ]),
    ];

    let detail = Paragraph::new(lines)
        .block(bordered(format!(" #{} (Ctrl+Y copies the output) ", row.id), Style::default()))
        .wrap(Wrap { trim: false });
    frame.render_widget(detail, area);
}

fn transformation_item(row: &Transformation, with_author: bool) -> ListItem<'static> {
    let persona = row
        .persona
        .as_deref()
        .map(|id| persona_info(id).map(|p| p.display_name).unwrap_or(id))
        .unwrap_or("unknown persona")
        .to_string();

    let mut spans = vec![Span::raw(format!("{}  ", row.created_at))];
    if with_author {
        if let Some(ref username) = row.username {
            spans.push(Span::raw(format!("{}  ", username)));
        }
    }
    spans.push(Span::raw(format!("{} (level {})  ", persona, row.verbosity_level)));
    spans.push(Span::raw(preview(&row.output_text)));

    ListItem::new(Line::from(spans))
}

fn user_item(state: &AppState, user: &User) -> ListItem<'static> {
    let mut spans = vec![
        Span::raw(format!("#{:<5}", user.id)),
        Span::raw(format!("{}  ", user.username)),
        Span::raw(format!("{}  ", user.email)),
    ];
    if user.is_admin {
        spans.push(Span::styled("admin", fg(state, Color::Yellow)));
    }
    ListItem::new(Line::from(spans))
}

/// `text` on one line, shortened for a list row
fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > PREVIEW_CHARS {
        let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else {
        flat
    }
}
