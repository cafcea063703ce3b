//! style-transform - Rewrite text in a persona's voice
//!
//! Sends text to the Stylecast backend and types the result out with the
//! typewriter reveal. The finished text can be exported as a PNG card.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use libstylecast::error::GatewayError;
use libstylecast::export::{export_completed, export_filename, save_export, PngExporter};
use libstylecast::reveal::{ManualScheduler, RevealTick, TickOutcome, TokioScheduler};
use libstylecast::service::StylecastService;
use libstylecast::types::persona_info;
use libstylecast::{
    logging, RevealController, RevealDriver, RevealSnapshot, StylecastError, TransformRequest,
    Verbosity,
};
use tracing::{debug, warn};

#[derive(Parser, Debug)]
#[command(name = "style-transform")]
#[command(version, about = "Rewrite text in the style of a persona")]
#[command(long_about = r#"Rewrite text in the style of a persona.

Text is taken from the argument, or from stdin when no argument is given.
The result is typed out character by character; press Ctrl-C to stop the
reveal early. Sign in first with style-auth.

EXAMPLES:
    # Default persona and verbosity from the config file
    style-transform "Taxes are too high"

    # Pick a persona and a longer answer
    style-transform --persona friedman --verbosity verbose "Rent control"

    # Pipe text in, print the result at once
    cat draft.txt | style-transform --persona trump --no-animate

    # Save a PNG card of the result
    style-transform --persona hitchens --export "Religion"
    style-transform --export ~/cards "Religion"

    # JSON output for scripting
    style-transform --format json "Hello" | jq -r .transformed_text

    # Show the LLM providers the backend offers
    style-transform --providers

PERSONAS:
    hitchens  - Christopher Hitchens, intellectual & literary analysis
    trump     - Donald Trump, bold & direct communication
    friedman  - Milton Friedman, economic & analytical perspective

OUTPUT FORMATS:
    text - The transformed text, revealed progressively on a terminal (default)
    json - One JSON object with the text, record id, provider and export path

EXIT CODES:
    0 - Success
    1 - Backend, network or export error
    2 - Not signed in or session expired
    3 - Invalid input (empty text, text too large)
"#)]
struct Cli {
    /// Text to transform (reads from stdin if not provided)
    text: Option<String>,

    /// Persona to write as
    #[arg(short, long, value_name = "PERSONA")]
    persona: Option<String>,

    /// Response length: concise (1), moderate (2) or verbose (3)
    #[arg(short = 'l', long, value_name = "LEVEL")]
    verbosity: Option<Verbosity>,

    /// Backend LLM provider (server default when omitted)
    #[arg(long, value_name = "PROVIDER")]
    provider: Option<String>,

    /// Print the result at once instead of typing it out
    #[arg(long)]
    no_animate: bool,

    /// Save a PNG card of the result (to DIR, or the configured export directory)
    #[arg(short, long, value_name = "DIR", num_args = 0..=1)]
    export: Option<Option<PathBuf>>,

    /// List available providers and exit
    #[arg(long)]
    providers: bool,

    /// Output format
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::config_from_env("warn", cli.verbose).init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        let code = exit_code(&e);
        if code == 2 {
            eprintln!("Sign in with: style-auth login");
        }
        std::process::exit(code);
    }
}

fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<StylecastError>()
        .map(StylecastError::exit_code)
        .unwrap_or(1)
}

async fn run(cli: Cli) -> Result<()> {
    let service = StylecastService::new()?;
    let config = service.config().clone();

    if cli.providers {
        service.auth().load_saved_token()?;
        let providers = service.transform().providers().await?;
        if cli.format == "json" {
            println!("{}", serde_json::to_string_pretty(&providers)?);
        } else {
            for provider in &providers.providers {
                let marker = if *provider == providers.default { " (default)" } else { "" };
                println!("{}{}", provider, marker);
            }
        }
        return Ok(());
    }

    let text = read_input(cli.text)?;
    let verbosity = match cli.verbosity {
        Some(v) => v,
        None => Verbosity::try_from(config.defaults.verbosity).map_err(StylecastError::InvalidInput)?,
    };
    let request = TransformRequest {
        text,
        persona: cli.persona.unwrap_or_else(|| config.defaults.persona.clone()),
        verbosity,
        provider: cli.provider.or_else(|| config.defaults.provider.clone()),
    };

    // Local checks first so bad input never needs a session
    let report = service.validation().validate(&request);
    for warning in &report.warnings {
        warn!("{}", warning);
    }
    service.validation().check(&request)?;

    if !service.auth().load_saved_token()? {
        return Err(StylecastError::Gateway(GatewayError::Unauthorized(
            "Not logged in".to_string(),
        ))
        .into());
    }

    debug!(persona = %request.persona, verbosity = %request.verbosity, "Submitting");
    let response = service.transform().submit(&request).await?;

    let animate = cli.format == "text"
        && config.defaults.animate
        && !cli.no_animate
        && atty::is(atty::Stream::Stdout);

    let snapshot = if animate {
        stream_reveal(&response.transformed_text, config.cadence()).await?
    } else {
        let mut driver = RevealDriver::new(
            RevealController::new(config.cadence()),
            ManualScheduler::new(),
        );
        let snapshot = driver.start(response.transformed_text.clone(), false);
        if cli.format == "text" {
            println!("{}", snapshot.revealed_text);
        }
        snapshot
    };

    let exported = match cli.export {
        Some(dir) => {
            let dir = dir.unwrap_or_else(|| config.export_dir());
            let signature = persona_info(&request.persona).map(|p| p.signature);
            let bytes = export_completed(&PngExporter::new(), &snapshot, signature)
                .map_err(StylecastError::from)?;
            let filename = export_filename(&snapshot.revealed_text, chrono::Local::now().naive_local());
            let path = save_export(&dir, &filename, &bytes).map_err(StylecastError::from)?;
            if cli.format == "text" {
                eprintln!("✓ Exported to {}", path.display());
            }
            Some(path)
        }
        None => None,
    };

    if cli.format == "json" {
        let output = serde_json::json!({
            "id": response.id,
            "transformed_text": response.transformed_text,
            "api_provider": response.api_provider,
            "persona": request.persona,
            "verbosity": request.verbosity.level(),
            "export": exported.map(|p| p.display().to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(())
}

/// Text from the argument, or all of stdin
fn read_input(arg: Option<String>) -> Result<String> {
    if let Some(text) = arg {
        return Ok(text);
    }
    if atty::is(atty::Stream::Stdin) {
        return Err(StylecastError::InvalidInput(
            "No text provided. Pass text as an argument or pipe it via stdin".to_string(),
        )
        .into());
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Type `text` out on stdout until it completes or Ctrl-C cancels it
async fn stream_reveal(text: &str, cadence: Duration) -> Result<RevealSnapshot> {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<RevealTick>();
    let scheduler = TokioScheduler::with_channel(tokio::runtime::Handle::current(), tx);
    let mut driver = RevealDriver::new(RevealController::new(cadence), scheduler);

    let mut stdout = io::stdout();
    let first = driver.start(text, true);
    if first.is_completed() {
        writeln!(stdout, "{}", first.revealed_text)?;
        return Ok(first);
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut printed = 0;
    loop {
        tokio::select! {
            tick = rx.recv() => {
                let Some(tick) = tick else { break };
                let outcome = driver.on_tick(tick);
                if outcome == TickOutcome::Stale {
                    continue;
                }
                let revealed = driver.controller().session().revealed_text();
                printed = write_delta(&mut stdout, revealed, printed)?;
                if outcome == TickOutcome::Completed {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                driver.cancel();
                writeln!(stdout)?;
                eprintln!("Reveal cancelled");
                return Ok(driver.snapshot());
            }
        }
    }

    writeln!(stdout)?;
    Ok(driver.snapshot())
}

/// Write the part of `revealed` past byte offset `printed`; returns the new offset
fn write_delta(out: &mut impl Write, revealed: &str, printed: usize) -> io::Result<usize> {
    if let Some(fresh) = revealed.get(printed..) {
        out.write_all(fresh.as_bytes())?;
        out.flush()?;
    }
    Ok(revealed.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_delta_prints_only_new_chars() {
        let mut out = Vec::new();
        let printed = write_delta(&mut out, "Hé", 0).unwrap();
        assert_eq!(printed, "Hé".len());
        let printed = write_delta(&mut out, "Héllo", printed).unwrap();
        assert_eq!(printed, "Héllo".len());
        let printed = write_delta(&mut out, "Héllo", printed).unwrap();
        assert_eq!(printed, "Héllo".len());
        assert_eq!(String::from_utf8(out).unwrap(), "Héllo");
    }

    #[test]
    fn test_cli_parses_optional_export_dir() {
        let cli = Cli::try_parse_from(["style-transform", "--export", "--", "hi"]).unwrap();
        assert_eq!(cli.export, Some(None));
        assert_eq!(cli.text.as_deref(), Some("hi"));

        let cli = Cli::try_parse_from(["style-transform", "--export", "/tmp/cards", "hi"]).unwrap();
        assert_eq!(cli.export, Some(Some(PathBuf::from("/tmp/cards"))));
    }

    #[test]
    fn test_cli_verbosity_names_and_levels() {
        let cli = Cli::try_parse_from(["style-transform", "-l", "verbose", "x"]).unwrap();
        assert_eq!(cli.verbosity, Some(Verbosity::Verbose));
        let cli = Cli::try_parse_from(["style-transform", "-l", "2", "x"]).unwrap();
        assert_eq!(cli.verbosity, Some(Verbosity::Moderate));
        assert!(Cli::try_parse_from(["style-transform", "-l", "4", "x"]).is_err());
    }
}
