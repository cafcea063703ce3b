//! Keybindings
//!
//! Maps a key press to the action it stands for in the current state.
//! Returns `None` for keys that do nothing, including shortcuts that are
//! disabled right now (e.g. Ctrl+S while a request is in flight). On the
//! transformer screen unmapped keys go to the text editor instead.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::actions::{Action, Screen};
use super::state::AppState;

/// Resolve `key` against `state`
pub fn map_key(state: &AppState, key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global keybindings (work everywhere)
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => return Some(Action::Quit),
        KeyCode::F(1) => {
            return Some(if state.help_visible {
                Action::HideHelp
            } else {
                Action::ShowHelp
            })
        }
        KeyCode::Esc if state.error.is_some() => return Some(Action::DismissError),
        KeyCode::Esc if state.help_visible => return Some(Action::HideHelp),
        _ => {}
    }

    // Overlays swallow everything else
    if state.help_visible || state.error.is_some() {
        return None;
    }

    if state.user.is_some() {
        match key.code {
            KeyCode::F(2) => return Some(Action::NavigateTo(Screen::Transformer)),
            KeyCode::F(3) => return Some(Action::NavigateTo(Screen::History)),
            KeyCode::F(4) if state.is_admin() => return Some(Action::NavigateTo(Screen::Admin)),
            KeyCode::F(9) => return Some(Action::LogoutRequested),
            _ => {}
        }
    }

    match state.current_screen {
        Screen::Login => login_key(state, key),
        Screen::Transformer => transformer_key(state, key),
        Screen::History | Screen::Admin => list_key(state, key),
    }
}

/// Plain character input (no Ctrl/Alt)
fn typed_char(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(c)
        }
        _ => None,
    }
}

fn login_key(state: &AppState, key: KeyEvent) -> Option<Action> {
    if state.restoring || state.login.submitting {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Tab | KeyCode::Down => Some(Action::LoginNextField),
        KeyCode::Char('t') if ctrl => Some(Action::LoginToggleMode),
        KeyCode::Enter if state.login.can_submit() => Some(Action::LoginRequested),
        KeyCode::Enter => Some(Action::LoginNextField),
        KeyCode::Backspace => Some(Action::LoginBackspace),
        _ => typed_char(&key).map(Action::LoginInput),
    }
}

fn transformer_key(state: &AppState, key: KeyEvent) -> Option<Action> {
    if !key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }

    match key.code {
        KeyCode::Char('s') if state.can_transform() => Some(Action::TransformRequested),
        KeyCode::Char('r') if state.can_retry() => Some(Action::RetryRequested),
        KeyCode::Char('l') => Some(Action::ClearRequested),
        KeyCode::Char('e') if state.can_export() => Some(Action::ExportRequested),
        KeyCode::Char('y') if state.copy_target().is_some() => Some(Action::CopyRequested),
        KeyCode::Char('p') => Some(Action::CyclePersona),
        KeyCode::Char('b') => Some(Action::CycleVerbosity),
        KeyCode::Char('t') => Some(Action::ToggleAnimate),
        KeyCode::Char('o') => Some(Action::CycleProvider),
        _ => None,
    }
}

fn list_key(state: &AppState, key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Up => Some(Action::SelectPrevious),
        KeyCode::Down => Some(Action::SelectNext),
        KeyCode::Tab if state.current_screen == Screen::Admin => Some(Action::SwitchAdminTab),
        KeyCode::Char('y') if ctrl && state.copy_target().is_some() => Some(Action::CopyRequested),
        KeyCode::Char('u') if ctrl => Some(Action::RefreshRequested),
        KeyCode::Backspace => Some(Action::SearchBackspace),
        _ => typed_char(&key).map(Action::SearchInput),
    }
}

/// Whether the transformer's text editor should receive `key`
///
/// True for keys that map to nothing, on the transformer screen, while no
/// overlay is open and no request is in flight.
pub fn is_editor_key(state: &AppState, key: KeyEvent) -> bool {
    state.current_screen == Screen::Transformer
        && state.user.is_some()
        && !state.help_visible
        && state.error.is_none()
        && !state.transformer.pending
        && !matches!(key.code, KeyCode::F(_) | KeyCode::Esc)
        && !key.modifiers.contains(KeyModifiers::CONTROL)
        && map_key(state, key).is_none()
}
