//! Pokedex API server binary.
//!
//! Parses CLI arguments, initializes tracing, builds the store and router,
//! and serves HTTP until SIGINT/SIGTERM.
//!
//! # Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success (including graceful shutdown) |
//! | 1 | Configuration/argument error |
//! | 3 | I/O error (e.g. bind failure) |

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use pokedex_api::api;
use pokedex_api::cli::Args;
use pokedex_api::error::PokedexError;
use pokedex_api::store::CsvStore;

/// Exit code for success (including graceful shutdown)
const EXIT_SUCCESS: u8 = 0;
/// Exit code for configuration/argument errors
const EXIT_CONFIG_ERROR: u8 = 1;
/// Exit code for I/O errors
const EXIT_IO_ERROR: u8 = 3;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = Args::parse();
    if let Err(e) = args.validate() {
        eprintln!("Error: Configuration error: {}", e);
        eprintln!("  Hint: Use --help for usage information");
        return ExitCode::from(EXIT_CONFIG_ERROR);
    }

    match run(args).await {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            tracing::error!(error = %e, "Server error");
            ExitCode::from(EXIT_IO_ERROR)
        }
    }
}

/// Main application logic: build the store, bind, and serve until a
/// shutdown signal arrives.
async fn run(args: Args) -> Result<(), PokedexError> {
    let store = Arc::new(CsvStore::new(args.store_config()));
    tracing::info!(file = %store.config().path.display(), "Backing file");

    let app = api::router(store);
    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    tracing::info!(addr = %listener.local_addr()?, "Pokedex API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Initialize the global `tracing` subscriber with an `EnvFilter`.
///
/// Reads `RUST_LOG` to configure level filtering, defaulting to `"info"`.
/// Uses `try_init()` so repeated calls do not panic.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Waits for a shutdown signal: SIGINT on all platforms, plus SIGTERM on
/// Unix. Returns once the first signal is received.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to register SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => {}
            _ = sigterm.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.expect("failed to listen for Ctrl+C");
    }
}
