//! Leapcode backend server binary.
//!
//! Wires together the session store, game service, and optional tutor, then
//! serves the HTTP API.

use std::net::SocketAddr;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use leapcode_server::{create_router, AppState, Config, GameService, SessionStore};
use leapcode_tutor::{ClaudeTutor, Tutor};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Leapcode - educational coding game backend
///
/// Serves the session, execute, and hint API for the Leapcode platformer
/// coding game. Tutor feedback uses the Anthropic API when
/// `ANTHROPIC_API_KEY` is set and static fallback text otherwise.
#[derive(Parser, Debug)]
#[command(name = "leapcode")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (default: leapcode.json in current directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Port for the HTTP server (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run_server(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Loads configuration, constructs the dependency graph, and serves the API.
async fn run_server(args: Args) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;

    if let Some(port) = args.port {
        config.port = port;
    }

    // Re-validate after overrides
    config.validate()?;

    tracing::info!(
        port = config.port,
        model = %config.model,
        "Leapcode backend starting"
    );

    let tutor = build_tutor(&config);
    let store = Arc::new(SessionStore::new());
    let game = Arc::new(GameService::new(Arc::clone(&store), tutor));
    let router = create_router(AppState::new(store, game));

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to bind to {addr}: {e}\n\nSuggestion: Try a different port with --port"
        )
    })?;

    println!("Leapcode backend running on http://{addr}");
    println!("Press Ctrl+C to stop");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Leapcode backend stopped");
    Ok(())
}

/// Builds the tutor from the environment, or none when unconfigured.
///
/// An unconfigured tutor is not an error: the game falls back to static
/// feedback and hint text.
fn build_tutor(config: &Config) -> Option<Arc<dyn Tutor>> {
    match ClaudeTutor::try_from_env() {
        Ok(tutor) => {
            tracing::info!(model = %config.model, "Tutor configured");
            let tutor = tutor
                .with_model(&config.model)
                .with_max_tokens(config.max_feedback_tokens, config.max_hint_tokens);
            Some(Arc::new(tutor))
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Tutor not configured; static fallback text will be used"
            );
            None
        }
    }
}

/// Loads configuration from the specified path or the default location.
fn load_config(config_path: Option<&str>) -> anyhow::Result<Config> {
    match config_path {
        Some(path_str) => {
            let path = Path::new(path_str);
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            Config::load_from_file(path).map_err(|e| anyhow::anyhow!("{e}"))
        }
        None => Config::load().map_err(|e| anyhow::anyhow!("{e}")),
    }
}

/// Resolves when the process receives Ctrl+C.
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Received Ctrl+C, shutting down");
}
