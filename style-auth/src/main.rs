//! style-auth - Account management for Stylecast
//!
//! Signs in, registers, signs out and shows the current account. The token
//! issued by the backend is stored in the data directory and picked up by
//! every other Stylecast tool.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::{Parser, Subcommand};
use libstylecast::logging;
use libstylecast::service::StylecastService;
use libstylecast::{StylecastError, User};
use secrecy::SecretString;
use tracing::debug;

#[derive(Parser)]
#[command(name = "style-auth")]
#[command(version)]
#[command(about = "Manage your Stylecast account session")]
#[command(long_about = "\
Manage your Stylecast account session

The backend issues a token on login or registration. It is saved to
$XDG_DATA_HOME/stylecast/token (mode 0600) and reused by style-transform,
style-history and style-tui until you log out or it expires.

EXAMPLES:
    # Interactive login (prompts for the password)
    style-auth login --username alice

    # Non-interactive login for scripts and agents
    printf '%s\\n' \"$PASSWORD\" | style-auth login --username alice --password-stdin

    # Create an account
    style-auth register --username carol --email carol@example.com

    # Show the signed-in account as JSON
    style-auth whoami --format json

    # Sign out
    style-auth logout

EXIT CODES:
    0 - Success
    1 - Backend, network or credential error
    2 - Not signed in or session expired
    3 - Invalid input (empty fields, malformed email)")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session token
    Login {
        /// Account name (prompted for when omitted)
        #[arg(short, long)]
        username: Option<String>,

        /// Read the password from stdin (for automation/agents)
        #[arg(long)]
        password_stdin: bool,
    },

    /// Create an account and sign in as it
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        /// Read the password from stdin (for automation/agents)
        #[arg(long)]
        password_stdin: bool,
    },

    /// Sign out and remove the stored token
    Logout,

    /// Show the signed-in account
    Whoami {
        /// Output format
        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::config_from_env("warn", cli.verbose).init();

    if let Err(e) = run(cli.command).await {
        eprintln!("Error: {}", e);
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<StylecastError>()
        .map(StylecastError::exit_code)
        .unwrap_or(1)
}

async fn run(command: Commands) -> Result<()> {
    let service = StylecastService::new()?;
    debug!(backend = %service.config().api.base_url, "Using backend");

    match command {
        Commands::Login {
            username,
            password_stdin,
        } => {
            let username = match username {
                Some(name) => name,
                None => prompt_line("Username: ")?,
            };
            let password = read_password(password_stdin)?;
            let user = service.auth().login(&username, &password).await?;
            println!("✓ Logged in as {}", describe(&user));
        }
        Commands::Register {
            username,
            email,
            password_stdin,
        } => {
            // Catch a bad address before asking for a password
            service.validation().check_email(&email)?;
            let password = read_password(password_stdin)?;
            let user = service.auth().register(&username, &email, &password).await?;
            println!("✓ Registered and logged in as {}", describe(&user));
        }
        Commands::Logout => {
            let had_session = service.auth().load_saved_token()?;
            service.auth().logout().await?;
            if had_session {
                println!("✓ Logged out");
            } else {
                println!("Not logged in");
            }
        }
        Commands::Whoami { format } => {
            let user = service
                .auth()
                .restore_session()
                .await?
                .ok_or_else(not_logged_in)?;
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&user)?);
            } else {
                println!("{}", describe(&user));
                println!("  id:    {}", user.id);
                println!("  email: {}", user.email);
            }
        }
    }

    Ok(())
}

fn not_logged_in() -> StylecastError {
    StylecastError::Gateway(libstylecast::error::GatewayError::Unauthorized(
        "Not logged in. Run 'style-auth login' first".to_string(),
    ))
}

fn describe(user: &User) -> String {
    if user.is_admin {
        format!("{} (admin)", user.username)
    } else {
        user.username.clone()
    }
}

fn prompt_line(prompt: &str) -> Result<String> {
    if !atty::is(atty::Stream::Stdin) {
        anyhow::bail!("Not a TTY. Pass --username explicitly.");
    }
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Prompt for a password, or read the first line of stdin with `--password-stdin`
fn read_password(from_stdin: bool) -> Result<SecretString> {
    if from_stdin {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        let password = line.trim_end_matches(['\r', '\n']).to_string();
        return Ok(SecretString::from(password));
    }

    if !atty::is(atty::Stream::Stdin) {
        anyhow::bail!("Not a TTY. Use --password-stdin to read the password from stdin.");
    }
    let password = rpassword::prompt_password("Password: ")?;
    Ok(SecretString::from(password))
}
