//! Pure reducer function for state transitions
//!
//! `(State, Action) -> State`, with no I/O. Requests, the reveal timer,
//! export and clipboard run in the event loop after the state has been
//! reduced (see `runner.rs`).

use libstylecast::service::validation::EMPTY_INPUT_MESSAGE;
use libstylecast::types::next_persona;

use super::actions::{Action, AdminTab, LoginMode, Screen};
use super::keymap::map_key;
use super::state::{AdminState, AppState, HistoryState, LoginState, StatusBarState, TransformerState};

const SESSION_EXPIRED: &str = "Session expired. Please log in again.";

/// Pure reducer function
///
/// Takes current state and an action, returns new state.
pub fn reduce(state: AppState, action: Action) -> AppState {
    match action {
        // === UI Events ===
        Action::Key(key) => {
            let state = reduce(state, Action::ClearStatus);
            match map_key(&state, key) {
                Some(action) => reduce(state, action),
                None => state,
            }
        }
        Action::Tick | Action::Resize(_, _) => state,

        // === Navigation ===
        Action::NavigateTo(screen) => navigate(state, screen),
        Action::Quit => AppState {
            should_quit: true,
            ..state
        },
        Action::ShowHelp => AppState {
            help_visible: true,
            ..state
        },
        Action::HideHelp => AppState {
            help_visible: false,
            ..state
        },

        // === Session ===
        Action::SessionRestored(Some(user)) => AppState {
            user: Some(user),
            restoring: false,
            current_screen: Screen::Transformer,
            ..state
        },
        Action::SessionRestored(None) => AppState {
            user: None,
            restoring: false,
            current_screen: Screen::Login,
            ..state
        },
        Action::LoginInput(c) => {
            let mut login = state.login;
            field_mut(&mut login).push(c);
            AppState { login, ..state }
        }
        Action::LoginBackspace => {
            let mut login = state.login;
            field_mut(&mut login).pop();
            AppState { login, ..state }
        }
        Action::LoginNextField => {
            let mut login = state.login;
            let fields = login.fields();
            let pos = fields.iter().position(|f| *f == login.focus).unwrap_or(0);
            login.focus = fields[(pos + 1) % fields.len()];
            AppState { login, ..state }
        }
        Action::LoginToggleMode => {
            let mode = match state.login.mode {
                LoginMode::SignIn => LoginMode::Register,
                LoginMode::Register => LoginMode::SignIn,
            };
            AppState {
                login: LoginState {
                    mode,
                    username: state.login.username,
                    ..LoginState::default()
                },
                ..state
            }
        }
        Action::LoginRequested if state.login.can_submit() => AppState {
            login: LoginState {
                submitting: true,
                ..state.login
            },
            error: None,
            ..state
        },
        Action::LoginRequested => state,
        Action::LoginSucceeded(user) => {
            let message = format!("Welcome, {}", user.username);
            AppState {
                user: Some(user),
                restoring: false,
                login: LoginState::default(),
                current_screen: Screen::Transformer,
                status: StatusBarState {
                    message: Some(message),
                },
                ..state
            }
        }
        Action::LoginFailed(error) => AppState {
            login: LoginState {
                submitting: false,
                password: String::new(),
                ..state.login
            },
            error: Some(error),
            ..state
        },
        Action::LogoutRequested => AppState {
            status: StatusBarState {
                message: Some("Signing out...".to_string()),
            },
            ..state
        },
        Action::LoggedOut => signed_out(state),
        Action::SessionExpired => AppState {
            error: Some(SESSION_EXPIRED.to_string()),
            ..signed_out(state)
        },

        // === Transformer ===
        Action::InputChanged(input) => AppState {
            transformer: TransformerState {
                input,
                ..state.transformer
            },
            ..state
        },
        Action::CyclePersona => {
            let persona = next_persona(&state.transformer.persona).to_string();
            AppState {
                transformer: TransformerState {
                    persona,
                    ..state.transformer
                },
                ..state
            }
        }
        Action::CycleVerbosity => AppState {
            transformer: TransformerState {
                verbosity: state.transformer.verbosity.cycle(),
                ..state.transformer
            },
            ..state
        },
        Action::ToggleAnimate => AppState {
            transformer: TransformerState {
                animate: !state.transformer.animate,
                ..state.transformer
            },
            ..state
        },
        Action::CycleProvider => {
            let providers = &state.transformer.providers;
            // None (server default) -> first -> ... -> last -> None
            let provider = match &state.transformer.provider {
                None => providers.first().cloned(),
                Some(current) => match providers.iter().position(|p| p == current) {
                    Some(i) => providers.get(i + 1).cloned(),
                    None => None,
                },
            };
            AppState {
                transformer: TransformerState {
                    provider,
                    ..state.transformer
                },
                ..state
            }
        }
        Action::ProvidersLoaded(response) => AppState {
            transformer: TransformerState {
                providers: response.providers,
                ..state.transformer
            },
            ..state
        },
        Action::TransformRequested if !state.can_transform() => state,
        Action::TransformRequested if state.transformer.input.trim().is_empty() => AppState {
            error: Some(EMPTY_INPUT_MESSAGE.to_string()),
            ..state
        },
        Action::TransformRequested => AppState {
            transformer: TransformerState {
                pending: true,
                request: state.transformer.request + 1,
                ..state.transformer
            },
            error: None,
            ..state
        },
        Action::TransformSucceeded { request, id, .. } if is_current(&state, request) => AppState {
            transformer: TransformerState {
                pending: false,
                last_id: id,
                ..state.transformer
            },
            ..state
        },
        Action::TransformFailed { request, error } if is_current(&state, request) => AppState {
            transformer: TransformerState {
                pending: false,
                ..state.transformer
            },
            error: Some(error),
            ..state
        },
        // Superseded by a clear or a newer request
        Action::TransformSucceeded { .. } | Action::TransformFailed { .. } => state,
        Action::ClearRequested => AppState {
            transformer: TransformerState {
                input: String::new(),
                pending: false,
                request: state.transformer.request + 1,
                last_id: None,
                ..state.transformer
            },
            ..state
        },
        Action::RetryRequested
        | Action::ExportRequested
        | Action::CopyRequested
        | Action::RevealTick(_) => state,

        // === Reveal ===
        Action::RevealUpdated(reveal) => AppState {
            transformer: TransformerState {
                reveal,
                ..state.transformer
            },
            ..state
        },

        // === History / Admin ===
        Action::SearchInput(c) => edit_search(state, |s| s.push(c)),
        Action::SearchBackspace => edit_search(state, |s| {
            s.pop();
        }),
        Action::SelectNext => move_selection(state, 1),
        Action::SelectPrevious => move_selection(state, -1),
        Action::RefreshRequested => match state.current_screen {
            Screen::History => AppState {
                history: HistoryState {
                    loading: true,
                    ..state.history
                },
                ..state
            },
            Screen::Admin => AppState {
                admin: AdminState {
                    loading: true,
                    ..state.admin
                },
                ..state
            },
            _ => state,
        },
        Action::HistoryLoaded(rows) => AppState {
            history: HistoryState {
                rows,
                selected: 0,
                loading: false,
                ..state.history
            },
            ..state
        },
        Action::AdminLoaded(dashboard) => AppState {
            admin: AdminState {
                users: dashboard.users,
                transformations: dashboard.transformations,
                selected: 0,
                loading: false,
                ..state.admin
            },
            ..state
        },
        Action::AdminForbidden(message) => {
            let on_admin = state.current_screen == Screen::Admin;
            AppState {
                current_screen: if on_admin {
                    Screen::Transformer
                } else {
                    state.current_screen
                },
                admin: AdminState::default(),
                status: StatusBarState {
                    message: Some(message),
                },
                ..state
            }
        }
        Action::SwitchAdminTab => {
            let tab = match state.admin.tab {
                AdminTab::Transformations => AdminTab::Users,
                AdminTab::Users => AdminTab::Transformations,
            };
            AppState {
                admin: AdminState {
                    tab,
                    selected: 0,
                    ..state.admin
                },
                ..state
            }
        }

        // === Error Handling ===
        Action::ShowError(error) => AppState {
            error: Some(error),
            ..state
        },
        Action::DismissError => AppState {
            error: None,
            ..state
        },

        // === Status Bar ===
        Action::SetStatus(message) => AppState {
            status: StatusBarState {
                message: Some(message),
            },
            ..state
        },
        Action::ClearStatus => AppState {
            status: StatusBarState { message: None },
            ..state
        },
    }
}

/// Screen change with access rules applied
fn navigate(state: AppState, screen: Screen) -> AppState {
    let allowed = match screen {
        Screen::Login => state.user.is_none(),
        Screen::Transformer | Screen::History => state.user.is_some(),
        Screen::Admin => state.is_admin(),
    };
    if !allowed {
        return state;
    }

    match screen {
        Screen::History => AppState {
            current_screen: screen,
            history: HistoryState {
                loading: true,
                selected: 0,
                ..state.history
            },
            ..state
        },
        Screen::Admin => AppState {
            current_screen: screen,
            admin: AdminState {
                loading: true,
                selected: 0,
                ..state.admin
            },
            ..state
        },
        _ => AppState {
            current_screen: screen,
            ..state
        },
    }
}

/// Drop everything tied to the account, keeping persona and display preferences
fn signed_out(state: AppState) -> AppState {
    AppState {
        user: None,
        restoring: false,
        current_screen: Screen::Login,
        login: LoginState::default(),
        transformer: TransformerState {
            input: String::new(),
            pending: false,
            request: state.transformer.request + 1,
            last_id: None,
            reveal: Default::default(),
            ..state.transformer
        },
        history: HistoryState::default(),
        admin: AdminState::default(),
        help_visible: false,
        ..state
    }
}

fn is_current(state: &AppState, request: u64) -> bool {
    state.transformer.pending && state.transformer.request == request
}

fn field_mut(login: &mut LoginState) -> &mut String {
    use super::actions::LoginField;
    match login.focus {
        LoginField::Username => &mut login.username,
        LoginField::Email => &mut login.email,
        LoginField::Password => &mut login.password,
    }
}

fn edit_search(state: AppState, edit: impl FnOnce(&mut String)) -> AppState {
    match state.current_screen {
        Screen::History => {
            let mut history = state.history;
            edit(&mut history.search);
            history.selected = 0;
            AppState { history, ..state }
        }
        Screen::Admin => {
            let mut admin = state.admin;
            edit(&mut admin.search);
            admin.selected = 0;
            AppState { admin, ..state }
        }
        _ => state,
    }
}

fn move_selection(state: AppState, delta: isize) -> AppState {
    fn step(selected: usize, len: usize, delta: isize) -> usize {
        if len == 0 {
            return 0;
        }
        selected.saturating_add_signed(delta).min(len - 1)
    }

    match state.current_screen {
        Screen::History => {
            let len = state.history.visible().len();
            let selected = step(state.history.selected, len, delta);
            AppState {
                history: HistoryState {
                    selected,
                    ..state.history
                },
                ..state
            }
        }
        Screen::Admin => {
            let len = state.admin.visible_len();
            let selected = step(state.admin.selected, len, delta);
            AppState {
                admin: AdminState {
                    selected,
                    ..state.admin
                },
                ..state
            }
        }
        _ => state,
    }
}
