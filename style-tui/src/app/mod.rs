//! Application module
//!
//! - Actions: what can happen
//! - State: what is true right now
//! - Keymap: which key means which action
//! - Reducer: pure function (State, Action) -> State

pub mod actions;
pub mod event;
pub mod keymap;
pub mod reducer;
pub mod state;

pub use actions::{Action, AdminTab, LoginField, LoginMode, Screen};
pub use reducer::reduce;
pub use state::AppState;
