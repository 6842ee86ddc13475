use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use sentiment_client::config::ClientConfig;
use sentiment_client::net::{ApiClient, ApiError};
use sentiment_client::pages::SubmitError;
use sentiment_client::pages::dashboard::{self, AnalyzeRoute};
use sentiment_client::pages::{login, register};
use sentiment_client::state::{AuthSession, FileSessionStore, MemorySessionStore, SessionStore};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Submit(#[from] SubmitError),
    #[error("request failed: {0}")]
    Api(#[from] ApiError),
    #[error("failed to read input: {0}")]
    Input(#[from] io::Error),
    #[error("signed in, but the profile could not be loaded; please log in again")]
    ProfileUnavailable,
    #[error("not signed in")]
    NotSignedIn,
}

#[derive(Parser, Debug)]
#[command(name = "sentiment", about = "Sentiment analysis API client")]
struct Cli {
    /// Backend base URL (overrides SENTIMENT_API_URL).
    #[arg(long)]
    base_url: Option<String>,

    /// Directory holding the session token (overrides SENTIMENT_SESSION_DIR).
    #[arg(long)]
    session_dir: Option<PathBuf>,

    /// Keep the session in memory only for this invocation.
    #[arg(long)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the backend is reachable.
    Ping,
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in with it.
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    Logout,
    /// Print the signed-in user.
    Whoami,
    /// Analyze TEXT, or stdin when TEXT is omitted.
    Analyze { text: Option<String> },
    ModelInfo,
    Metrics,
    /// Header, model information and performance metrics.
    Dashboard,
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();
    if let Err(e) = dotenv {
        tracing::debug!(error = %e, "no .env loaded");
    }

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = ClientConfig::from_env();
    if let Some(base_url) = cli.base_url.as_deref() {
        config = ClientConfig::new(base_url, config.session_dir);
    }
    if let Some(dir) = cli.session_dir {
        config.session_dir = dir;
    }

    let store: Arc<dyn SessionStore> = if cli.ephemeral {
        Arc::new(MemorySessionStore::new())
    } else {
        Arc::new(FileSessionStore::new(&config.session_dir))
    };
    let api = ApiClient::new(&config.base_url, store.clone())?;
    let session = AuthSession::new(api, store);

    if matches!(cli.command, Command::Ping) {
        return run_ping(session.api()).await;
    }
    session.bootstrap().await;

    match cli.command {
        Command::Ping => Ok(()),
        Command::Login { email, password } => {
            let user = login::submit_login(&session, &email, &password).await?;
            let user = user.ok_or(CliError::ProfileUnavailable)?;
            println!("Signed in as {}", user.email);
            Ok(())
        }
        Command::Register { email, password, confirm_password } => {
            let user = register::submit_register(&session, &email, &password, &confirm_password).await?;
            let user = user.ok_or(CliError::ProfileUnavailable)?;
            println!("Registered and signed in as {}", user.email);
            Ok(())
        }
        Command::Logout => {
            session.logout();
            println!("Signed out");
            Ok(())
        }
        Command::Whoami => {
            let user = session.user().ok_or(CliError::NotSignedIn)?;
            println!("{}", dashboard::render_account(&user));
            Ok(())
        }
        Command::Analyze { text } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let route = AnalyzeRoute::for_session(session.is_authenticated());
            let result = dashboard::submit_analysis(session.api(), route, &text).await?;
            println!("{}", dashboard::render_result(&result));
            Ok(())
        }
        Command::ModelInfo => {
            let info = dashboard::load_model_info(session.api(), session.is_authenticated()).await;
            println!("{}", dashboard::render_model_info(&info));
            Ok(())
        }
        Command::Metrics => {
            let metrics = dashboard::load_model_metrics(session.api(), session.is_authenticated()).await;
            println!("{}", dashboard::render_metrics(&metrics));
            Ok(())
        }
        Command::Dashboard => {
            let authenticated = session.is_authenticated();
            let (info, metrics) = tokio::join!(
                dashboard::load_model_info(session.api(), authenticated),
                dashboard::load_model_metrics(session.api(), authenticated),
            );
            println!("{}\n", dashboard::render_header(session.user().as_ref()));
            println!("{}\n", dashboard::render_model_info(&info));
            println!("{}", dashboard::render_metrics(&metrics));
            Ok(())
        }
    }
}

async fn run_ping(api: &ApiClient) -> Result<(), CliError> {
    let health = api.health().await?;
    println!("{} ({})", health.status, api.base_url());
    Ok(())
}
