//! Event loop glue
//!
//! [`App`] owns everything the pure reducer cannot: the reveal driver, the
//! text editor widget, and the service handle. Every action is reduced
//! first; the side effects it implies run afterwards, against the new state.

use std::path::PathBuf;

use chrono::Local;
use crossbeam_channel::Receiver;
use crossterm::event::KeyEvent;
use libstylecast::export::{export_completed, export_filename, save_export, PngExporter};
use libstylecast::reveal::{RevealTick, Scheduler, TickOutcome, TokioScheduler};
use libstylecast::types::persona_info;
use libstylecast::{RevealController, RevealDriver, RevealSnapshot, TransformRequest};
use secrecy::SecretString;
use tui_textarea::TextArea;

use crate::app::keymap::{is_editor_key, map_key};
use crate::app::{reduce, Action, AppState, LoginMode, Screen};
use crate::clipboard;
use crate::services::ServiceHandle;

const PLACEHOLDER: &str = "Type or paste text to transform (Ctrl+S to transform, F1 for help)";

/// Application driven by the terminal event loop
pub struct App<S: Scheduler> {
    state: AppState,
    reveal: RevealDriver<S>,
    services: ServiceHandle,
    actions: Receiver<Action>,
    textarea: TextArea<'static>,
    exporter: PngExporter,
    export_dir: PathBuf,
}

impl App<TokioScheduler> {
    /// App whose reveal ticks arrive on the service action channel
    pub fn new(services: ServiceHandle) -> Self {
        let scheduler = services.reveal_scheduler();
        Self::with_scheduler(services, scheduler)
    }
}

impl<S: Scheduler> App<S> {
    pub fn with_scheduler(services: ServiceHandle, scheduler: S) -> Self {
        let config = services.config();
        let state = AppState::from_config(config);
        let reveal = RevealDriver::new(RevealController::new(config.cadence()), scheduler);
        let export_dir = config.export_dir();
        let actions = services.actions();

        Self {
            state,
            reveal,
            services,
            actions,
            textarea: new_textarea(),
            exporter: PngExporter::new(),
            export_dir,
        }
    }

    /// Export into `dir` instead of the configured directory
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    pub fn reveal(&self) -> &RevealDriver<S> {
        &self.reveal
    }

    /// Kick off startup work (checking the stored session)
    pub fn start(&mut self) {
        self.services.restore_session();
    }

    /// Route a key press to the editor or to the keymap
    pub fn handle_key(&mut self, key: KeyEvent) {
        self.dispatch(Action::ClearStatus);

        if is_editor_key(&self.state, key) {
            self.textarea.input(key);
            let content = self.textarea.lines().join("\n");
            self.dispatch(Action::InputChanged(content));
        } else if let Some(action) = map_key(&self.state, key) {
            self.dispatch(action);
        }
    }

    /// Apply everything background tasks have sent so far
    ///
    /// Returns the number of actions applied.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(action) = self.actions.try_recv() {
            self.dispatch(action);
            applied += 1;
        }
        applied
    }

    /// Reduce `action`, then run its side effects
    pub fn dispatch(&mut self, action: Action) {
        if let Action::Key(key) = action {
            self.handle_key(key);
            return;
        }

        let previous_screen = self.state.current_screen;
        let previous_request = self.state.transformer.request;
        let was_submitting = self.state.login.submitting;
        let accepted = match &action {
            Action::TransformSucceeded { request, .. } => {
                self.state.transformer.pending && self.state.transformer.request == *request
            }
            _ => false,
        };

        self.state = reduce(std::mem::take(&mut self.state), action.clone());

        // Leaving the transformer stops the animation it was showing
        if previous_screen == Screen::Transformer
            && self.state.current_screen != Screen::Transformer
            && self.reveal.is_running()
        {
            let snapshot = self.reveal.cancel();
            self.show(snapshot);
        }

        match action {
            Action::TransformRequested
                if self.state.transformer.pending
                    && self.state.transformer.request != previous_request =>
            {
                let transformer = &self.state.transformer;
                let request = TransformRequest {
                    text: transformer.input.clone(),
                    persona: transformer.persona.clone(),
                    verbosity: transformer.verbosity,
                    provider: transformer.provider.clone(),
                };
                self.services.transform(transformer.request, request);
            }
            Action::TransformSucceeded { text, .. } if accepted => {
                // No animation for a view that is not mounted
                let animate = self.state.transformer.animate
                    && self.state.current_screen == Screen::Transformer;
                let snapshot = self.reveal.start(text, animate);
                self.show(snapshot);
            }
            Action::RevealTick(tick) => self.on_tick(tick),
            Action::RetryRequested => match self.reveal.retry() {
                Ok(snapshot) => self.show(snapshot),
                Err(e) => self.dispatch(Action::SetStatus(e.to_string())),
            },
            Action::ClearRequested => {
                let snapshot = self.reveal.clear();
                self.show(snapshot);
                self.textarea = new_textarea();
            }
            Action::ExportRequested => self.export(),
            Action::CopyRequested => {
                if let Some(text) = self.state.copy_target() {
                    clipboard::copy_text(text, self.services.sender());
                }
            }
            Action::LoginRequested if self.state.login.submitting && !was_submitting => {
                let login = &self.state.login;
                let password = SecretString::from(login.password.clone());
                match login.mode {
                    LoginMode::SignIn => self.services.login(login.username.clone(), password),
                    LoginMode::Register => {
                        self.services
                            .register(login.username.clone(), login.email.clone(), password)
                    }
                }
            }
            Action::LoginSucceeded(_) | Action::SessionRestored(Some(_)) => {
                self.services.load_providers();
            }
            Action::LogoutRequested => self.services.logout(),
            Action::LoggedOut | Action::SessionExpired => {
                let snapshot = self.reveal.clear();
                self.show(snapshot);
                self.textarea = new_textarea();
            }
            Action::NavigateTo(_) | Action::RefreshRequested => self.load_screen(),
            _ => {}
        }
    }

    fn on_tick(&mut self, tick: RevealTick) {
        if self.reveal.on_tick(tick) != TickOutcome::Stale {
            let snapshot = self.reveal.snapshot();
            self.show(snapshot);
        }
    }

    fn show(&mut self, snapshot: RevealSnapshot) {
        self.state = reduce(
            std::mem::take(&mut self.state),
            Action::RevealUpdated(snapshot),
        );
    }

    /// Fetch data for a list screen that is waiting for it
    fn load_screen(&mut self) {
        match self.state.current_screen {
            Screen::History if self.state.history.loading => self.services.load_history(),
            Screen::Admin if self.state.admin.loading => self.services.load_admin(),
            _ => {}
        }
    }

    fn export(&mut self) {
        let snapshot = self.reveal.snapshot();
        let signature = persona_info(&self.state.transformer.persona).map(|p| p.signature);

        let saved = export_completed(&self.exporter, &snapshot, signature).and_then(|bytes| {
            let filename = export_filename(&snapshot.revealed_text, Local::now().naive_local());
            save_export(&self.export_dir, &filename, &bytes)
        });

        let message = match saved {
            Ok(path) => format!("Saved {}", path.display()),
            Err(e) => {
                tracing::warn!("Export failed: {}", e);
                format!("Export failed: {}", e)
            }
        };
        self.dispatch(Action::SetStatus(message));
    }
}

fn new_textarea() -> TextArea<'static> {
    let mut textarea = TextArea::default();
    textarea.set_placeholder_text(PLACEHOLDER);
    textarea
}
