//! Actions for the reducer pattern
//!
//! All state transitions are triggered by actions. Keys are first mapped to
//! one of these by [`keymap`](super::keymap); background tasks report back
//! with the result variants.

use crossterm::event::KeyEvent;
use libstylecast::reveal::RevealTick;
use libstylecast::service::admin::AdminDashboard;
use libstylecast::types::{ProvidersResponse, Transformation, User};
use libstylecast::RevealSnapshot;

/// Actions that trigger state transitions
#[derive(Debug, Clone)]
pub enum Action {
    // === UI Events ===
    /// Keyboard input event
    Key(KeyEvent),

    /// Periodic tick
    Tick,

    /// Terminal resize event
    Resize(u16, u16),

    // === Navigation ===
    NavigateTo(Screen),
    Quit,
    ShowHelp,
    HideHelp,

    // === Session ===
    /// Stored token checked at startup; `None` means sign in first
    SessionRestored(Option<User>),

    /// Characters typed into the focused login field
    LoginInput(char),
    LoginBackspace,
    LoginNextField,
    /// Switch between sign-in and registration
    LoginToggleMode,
    LoginRequested,
    LoginSucceeded(User),
    LoginFailed(String),
    LogoutRequested,
    LoggedOut,
    /// The backend answered 401; the token is already gone
    SessionExpired,

    // === Transformer ===
    InputChanged(String),
    CyclePersona,
    CycleVerbosity,
    ToggleAnimate,
    CycleProvider,
    ProvidersLoaded(ProvidersResponse),
    TransformRequested,
    TransformSucceeded {
        request: u64,
        text: String,
        id: Option<i64>,
    },
    TransformFailed {
        request: u64,
        error: String,
    },
    /// Replay the last result's reveal
    RetryRequested,
    /// Clear input, output and the retry slot
    ClearRequested,
    ExportRequested,
    /// Copy the focused output (transformer result or selected list row)
    CopyRequested,

    // === Reveal ===
    /// Timer tick for the reveal driver owned by the event loop
    RevealTick(RevealTick),
    /// Latest observation of the reveal driver
    RevealUpdated(RevealSnapshot),

    // === History / Admin ===
    SearchInput(char),
    SearchBackspace,
    SelectNext,
    SelectPrevious,
    RefreshRequested,
    HistoryLoaded(Vec<Transformation>),
    AdminLoaded(AdminDashboard),
    /// Admin data refused with 403
    AdminForbidden(String),
    SwitchAdminTab,

    // === Error Handling ===
    ShowError(String),
    DismissError,

    // === Status Bar ===
    SetStatus(String),
    ClearStatus,
}

/// Screen/View identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Transformer,
    History,
    Admin,
}

/// Login form mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginMode {
    #[default]
    SignIn,
    Register,
}

/// Focused login form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Email,
    Password,
}

/// Admin dashboard tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminTab {
    #[default]
    Transformations,
    Users,
}
