//! Application state
//!
//! Plain data; every transition goes through the reducer (see `reducer.rs`).

use libstylecast::service::admin::UserQuery;
use libstylecast::service::history::HistoryQuery;
use libstylecast::types::{Transformation, User, Verbosity, PERSONAS};
use libstylecast::{Config, RevealSnapshot};

use super::actions::{AdminTab, LoginField, LoginMode, Screen};

/// Root application state
///
/// The single source of truth for the whole application.
#[derive(Debug, Clone)]
pub struct AppState {
    pub should_quit: bool,
    pub current_screen: Screen,
    pub help_visible: bool,

    /// Signed-in account; `None` keeps the user on the login screen
    pub user: Option<User>,
    /// Still checking the stored token at startup
    pub restoring: bool,

    pub login: LoginState,
    pub transformer: TransformerState,
    pub history: HistoryState,
    pub admin: AdminState,

    pub status: StatusBarState,
    /// Error overlay
    pub error: Option<String>,
    pub config: UiConfig,
}

/// Login and registration form
#[derive(Debug, Clone, Default)]
pub struct LoginState {
    pub mode: LoginMode,
    pub focus: LoginField,
    pub username: String,
    pub email: String,
    pub password: String,
    pub submitting: bool,
}

impl LoginState {
    /// Fields shown in the current mode, in focus order
    pub fn fields(&self) -> &'static [LoginField] {
        match self.mode {
            LoginMode::SignIn => &[LoginField::Username, LoginField::Password],
            LoginMode::Register => &[LoginField::Username, LoginField::Email, LoginField::Password],
        }
    }

    pub fn can_submit(&self) -> bool {
        let filled = !self.username.trim().is_empty() && !self.password.is_empty();
        let email_ok = self.mode == LoginMode::SignIn || !self.email.trim().is_empty();
        filled && email_ok && !self.submitting
    }
}

/// Transformer screen
#[derive(Debug, Clone)]
pub struct TransformerState {
    /// Text being edited (mirrors the textarea)
    pub input: String,
    pub persona: String,
    pub verbosity: Verbosity,
    /// Backend provider; `None` lets the server pick
    pub provider: Option<String>,
    /// Providers offered by the backend
    pub providers: Vec<String>,
    pub animate: bool,
    /// A request is in flight
    pub pending: bool,
    /// Sequence number of the latest request; results for older ones are dropped
    pub request: u64,
    /// Record id of the last stored transformation
    pub last_id: Option<i64>,
    /// What the reveal currently shows
    pub reveal: RevealSnapshot,
}

impl TransformerState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            input: String::new(),
            persona: config.defaults.persona.clone(),
            verbosity: Verbosity::try_from(config.defaults.verbosity).unwrap_or_default(),
            provider: config.defaults.provider.clone(),
            providers: Vec::new(),
            animate: config.defaults.animate,
            pending: false,
            request: 0,
            last_id: None,
            reveal: RevealSnapshot::default(),
        }
    }
}

impl Default for TransformerState {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// History gallery
#[derive(Debug, Clone, Default)]
pub struct HistoryState {
    pub rows: Vec<Transformation>,
    pub search: String,
    pub selected: usize,
    pub loading: bool,
}

impl HistoryState {
    pub fn query(&self) -> HistoryQuery {
        HistoryQuery {
            search: Some(self.search.clone()),
            ..Default::default()
        }
    }

    /// Rows matching the search box, in backend order
    pub fn visible(&self) -> Vec<&Transformation> {
        let query = self.query();
        self.rows.iter().filter(|row| query.matches(row)).collect()
    }

    pub fn selected_row(&self) -> Option<&Transformation> {
        self.visible().get(self.selected).copied()
    }
}

/// Admin dashboard
#[derive(Debug, Clone, Default)]
pub struct AdminState {
    pub tab: AdminTab,
    pub users: Vec<User>,
    pub transformations: Vec<Transformation>,
    pub search: String,
    pub selected: usize,
    pub loading: bool,
}

impl AdminState {
    pub fn visible_transformations(&self) -> Vec<&Transformation> {
        let query = HistoryQuery {
            search: Some(self.search.clone()),
            ..Default::default()
        };
        self.transformations
            .iter()
            .filter(|row| query.matches(row))
            .collect()
    }

    pub fn visible_users(&self) -> Vec<&User> {
        let query = UserQuery {
            search: Some(self.search.clone()),
            ..Default::default()
        };
        self.users.iter().filter(|user| query.matches(user)).collect()
    }

    /// Rows in the active tab
    pub fn visible_len(&self) -> usize {
        match self.tab {
            AdminTab::Transformations => self.visible_transformations().len(),
            AdminTab::Users => self.visible_users().len(),
        }
    }
}

/// Status bar state
#[derive(Debug, Clone, Default)]
pub struct StatusBarState {
    /// Transient message, cleared on the next key
    pub message: Option<String>,
}

/// UI configuration
#[derive(Debug, Clone)]
pub struct UiConfig {
    pub colors_enabled: bool,
    /// Event poll interval in milliseconds
    pub tick_rate_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        let colors_enabled =
            std::env::var("NO_COLOR").is_err() && std::env::var("STYLECAST_TUI_NO_COLOR").is_err();

        let tick_rate_ms = std::env::var("STYLECAST_TUI_TICK_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(100);

        Self {
            colors_enabled,
            tick_rate_ms,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial state with persona, verbosity and animation defaults from `config`
    pub fn from_config(config: &Config) -> Self {
        Self {
            should_quit: false,
            current_screen: Screen::Login,
            help_visible: false,
            user: None,
            restoring: true,
            login: LoginState::default(),
            transformer: TransformerState::from_config(config),
            history: HistoryState::default(),
            admin: AdminState::default(),
            status: StatusBarState::default(),
            error: None,
            config: UiConfig::default(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_admin)
    }

    /// Only one request may be in flight
    pub fn can_transform(&self) -> bool {
        !self.transformer.pending
    }

    /// Retry needs a stored result and an idle reveal
    pub fn can_retry(&self) -> bool {
        let reveal = &self.transformer.reveal;
        reveal.can_retry && !reveal.is_running() && !self.transformer.pending
    }

    pub fn can_export(&self) -> bool {
        let reveal = &self.transformer.reveal;
        reveal.is_completed() && !reveal.revealed_text.trim().is_empty()
    }

    /// Display name of the selected persona
    pub fn persona_label(&self) -> &str {
        PERSONAS
            .iter()
            .find(|p| p.id == self.transformer.persona)
            .map(|p| p.display_name)
            .unwrap_or(self.transformer.persona.as_str())
    }

    /// Text that copy targets on the current screen
    pub fn copy_target(&self) -> Option<String> {
        match self.current_screen {
            Screen::Transformer => {
                let text = &self.transformer.reveal.revealed_text;
                (!text.is_empty()).then(|| text.clone())
            }
            Screen::History => self.history.selected_row().map(|r| r.output_text.clone()),
            Screen::Admin => match self.admin.tab {
                AdminTab::Transformations => self
                    .admin
                    .visible_transformations()
                    .get(self.admin.selected)
                    .map(|r| r.output_text.clone()),
                AdminTab::Users => None,
            },
            Screen::Login => None,
        }
    }
}
