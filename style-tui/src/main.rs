//! style-tui - Terminal UI for Stylecast
//!
//! Interactive client for the style transformation service: sign in, rewrite
//! text in a persona's voice with a typewriter reveal, browse history, and
//! (for admins) inspect all users and transformations.

use std::time::Duration;

use libstylecast::logging::{self, LOG_FILE_ENV};
use style_tui::{
    app::event::{EventHandler, TuiEvent},
    error::Result,
    services::ServiceHandle,
    terminal::{install_panic_hook, restore_terminal, setup_terminal, Tui},
    ui, App,
};

fn main() -> Result<()> {
    // The terminal is ours; logs only go to a file when asked for
    if let Ok(path) = std::env::var(LOG_FILE_ENV) {
        logging::config_from_env("info", false).with_file(path).init();
    }

    // Fail on bad configuration before touching the terminal
    let services = ServiceHandle::new()?;

    install_panic_hook();
    let mut terminal = setup_terminal()?;

    let result = run_app(&mut terminal, services);

    restore_terminal(terminal)?;

    result
}

fn run_app(terminal: &mut Tui, services: ServiceHandle) -> Result<()> {
    let cadence = services.config().cadence();
    let mut app = App::new(services);

    // Poll at least as often as the reveal advances so ticks render promptly
    let tick_rate = Duration::from_millis(app.state().config.tick_rate_ms);
    let events = EventHandler::new(tick_rate.min(cadence));

    app.start();

    loop {
        terminal.draw(|frame| ui::render(frame, app.state(), app.textarea()))?;

        match events.next()? {
            TuiEvent::Key(key) => app.handle_key(key),
            other => app.dispatch(other.into()),
        }
        app.drain();

        if app.state().should_quit {
            break;
        }
    }

    tracing::info!("style-tui exiting");
    Ok(())
}
