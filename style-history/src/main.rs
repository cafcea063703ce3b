//! style-history - Browse past transformations
//!
//! Lists the signed-in user's transformation gallery, or for admins every
//! transformation and every account.

mod format;

use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;
use libstylecast::error::GatewayError;
use libstylecast::service::admin::UserQuery;
use libstylecast::service::history::HistoryQuery;
use libstylecast::service::StylecastService;
use libstylecast::{logging, StylecastError, Verbosity};

#[derive(Parser, Debug)]
#[command(name = "style-history")]
#[command(version, about = "Browse past Stylecast transformations")]
#[command(long_about = r#"Browse past Stylecast transformations with filtering and formatting options.

The backend returns the full list; searching and filtering happen locally.

EXAMPLES:
    # Show your last 20 transformations (default)
    style-history

    # Show more
    style-history --limit 50

    # Filter by persona or verbosity
    style-history --persona friedman
    style-history --verbosity verbose

    # Search input and output text
    style-history --search "taxes"

    # Every user's transformations (admin only)
    style-history --all --search alice

    # Account listing (admin only)
    style-history --users
    style-history --users --admins-only --format csv

    # JSON output for scripting
    style-history --format json | jq -r '.[] | .output_text'

    # JSONL output (one JSON object per line)
    style-history --format jsonl

    # Export to CSV for analysis
    style-history --format csv > transformations.csv

OUTPUT FORMATS:
    text  - Human-readable listing with previews (default)
    json  - JSON array (complete records)
    jsonl - JSON lines, one object per line (streaming-friendly)
    csv   - CSV with headers (spreadsheet-compatible)

EXIT CODES:
    0 - Success (including empty results)
    1 - Backend or network error
    2 - Not signed in, session expired, or admin access required
    3 - Invalid arguments
"#)]
struct Args {
    /// Case-insensitive substring matched against input, output and author
    #[arg(short, long, value_name = "TERM")]
    search: Option<String>,

    /// Only transformations in this persona
    #[arg(short, long, value_name = "PERSONA")]
    persona: Option<String>,

    /// Only transformations at this verbosity: concise (1), moderate (2) or verbose (3)
    #[arg(short = 'l', long, value_name = "LEVEL")]
    verbosity: Option<Verbosity>,

    /// Maximum number of entries to print
    #[arg(short = 'n', long, default_value = "20", value_name = "N")]
    limit: usize,

    /// Every user's transformations (admin only)
    #[arg(long, conflicts_with = "users")]
    all: bool,

    /// List accounts instead of transformations (admin only)
    #[arg(long)]
    users: bool,

    /// With --users, only admin accounts
    #[arg(long, requires = "users")]
    admins_only: bool,

    /// Output format
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    #[arg(value_parser = ["text", "json", "jsonl", "csv"])]
    format: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    logging::config_from_env("warn", args.verbose).init();
    tracing::debug!("style-history started with args: {:?}", args);

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(
            e.downcast_ref::<StylecastError>()
                .map(StylecastError::exit_code)
                .unwrap_or(1),
        );
    }
}

async fn run(args: Args) -> Result<()> {
    if args.limit == 0 {
        return Err(StylecastError::InvalidInput("--limit must be at least 1".to_string()).into());
    }

    let service = StylecastService::new()?;
    if !service.auth().load_saved_token()? {
        return Err(StylecastError::Gateway(GatewayError::Unauthorized(
            "Not logged in. Run 'style-auth login' first".to_string(),
        ))
        .into());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.users {
        let query = UserQuery {
            search: args.search,
            admins_only: args.admins_only,
            limit: Some(args.limit),
        };
        let users = service.admin().users(&query).await?;
        format::write_users(&mut out, &users, &args.format)?;
    } else {
        let query = HistoryQuery {
            search: args.search,
            persona: args.persona,
            verbosity: args.verbosity,
            limit: Some(args.limit),
        };
        let rows = if args.all {
            service.admin().transformations(&query).await?
        } else {
            service.history().list(&query).await?
        };
        format::write_transformations(&mut out, &rows, &args.format)?;
    }

    out.flush()?;
    Ok(())
}
