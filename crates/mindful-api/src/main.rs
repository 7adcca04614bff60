//! Mindful CLI and REST API entry point.
//!
//! Binary name: `mindful`
//!
//! Loads `.env`, layers configuration (file, environment, flags), sets up
//! tracing, opens the database, then dispatches to the command handler or
//! starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use mindful_infra::config::{apply_env, load_server_config, resolve_data_dir, CONFIG_FILE_NAME};
use mindful_infra::llm::UNCONFIGURED_PROVIDER;
use mindful_observe::tracing_setup::{init_tracing, shutdown_tracing};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is the normal case.
    let dotenv_path = dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Shell completions don't need config or state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "mindful", &mut std::io::stdout());
        return Ok(());
    }

    let data_dir = resolve_data_dir();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| data_dir.join(CONFIG_FILE_NAME));

    let (mut config, mut config_warnings) = load_server_config(&config_path).await;
    config_warnings.extend(apply_env(&mut config, |key| std::env::var(key).ok()));
    if let Commands::Serve { port, host } = &cli.command {
        if let Some(port) = port {
            config.server.port = *port;
        }
        if let Some(host) = host {
            config.server.host = host.clone();
        }
    }

    init_tracing(&config.logging, cli.default_filter())
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;
    for warning in &config_warnings {
        tracing::warn!("{warning}");
    }
    tracing::debug!(
        config = %config_path.display(),
        data_dir = %data_dir.display(),
        dotenv = ?dotenv_path,
        "Configuration loaded"
    );

    let api_key = if cli.command.needs_model() {
        std::env::var("LLM_API_KEY").ok()
    } else {
        None
    };
    let state = AppState::init(&config, &data_dir, api_key.as_deref()).await?;

    let result = run(cli.command, state, &config).await;
    shutdown_tracing();
    result
}

async fn run(
    command: Commands,
    state: AppState,
    config: &mindful_types::config::ServerConfig,
) -> anyhow::Result<()> {
    match command {
        Commands::Serve { .. } => {
            let addr = format!("{}:{}", config.server.host, config.server.port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} Mindful API listening on {}",
                console::style("🌿").bold(),
                console::style(format!("http://{addr}/api/")).cyan()
            );
            println!(
                "  {} model provider: {}",
                console::style("·").dim(),
                console::style(state.chat_relay.provider_name()).yellow()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            if state.chat_relay.provider_name() == UNCONFIGURED_PROVIDER {
                tracing::warn!(
                    "No model API key configured, chat replies will use the fallback text"
                );
            }
            tracing::info!(%addr, model = %config.llm.model, "Server started");

            let router = http::router::build_router(state, &config.cors);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }

        Commands::Alerts { json } => {
            cli::alerts::list_alerts(&state, json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled before state init"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
///
/// If a handler cannot be installed, that signal is never awaited.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
