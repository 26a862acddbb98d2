//! chatrelay CLI and HTTP server entry point.
//!
//! Binary name: `chatrelay`
//!
//! Parses CLI arguments, sets up tracing, wires the application state, then
//! either serves HTTP or runs a one-shot conversation command.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use chatrelay_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter};
use cli::conversation::Output;
use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need tracing or app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "chatrelay", &mut std::io::stdout());
        return Ok(());
    }

    init_tracing(verbosity_filter(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ephemeral = matches!(cli.command, Commands::Serve { ephemeral: true, .. });
    let state = AppState::init(ephemeral).await?;
    let output = Output::from_flags(cli.json, cli.quiet);

    match cli.command {
        Commands::Serve { host, port, .. } => {
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            if !cli.quiet {
                println!(
                    "  {} chatrelay listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }
            tracing::info!(%addr, ephemeral, data_dir = %state.data_dir.display(), "Server started");

            let router = http::router::build_router(state.clone());
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            state.shutdown().await;
            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Chat {
            conversation,
            message,
        } => {
            cli::conversation::chat(&state, &conversation, &message, output).await?;
        }

        Commands::History { conversation } => {
            cli::conversation::history(&state, &conversation, output).await?;
        }

        Commands::Clear { conversation } => {
            cli::conversation::clear(&state, &conversation, output).await?;
        }

        Commands::Completions { .. } => unreachable!("handled before state init"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
