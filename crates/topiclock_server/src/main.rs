//! Headless topic lock server entrypoint.

use std::sync::Arc;
use topiclock_server::{config::Config, db::Database, serve_router, AppState, DEFAULT_PORT};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CliFlags {
    help: bool,
    print_config: bool,
}

fn parse_cli_flags(args: &[String]) -> anyhow::Result<CliFlags> {
    let mut flags = CliFlags::default();
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => flags.help = true,
            "--print-config" => flags.print_config = true,
            value if value.starts_with('-') => {
                anyhow::bail!(
                    "Unknown option: '{}'. Use --help to see supported options.",
                    value
                );
            }
            value => {
                anyhow::bail!(
                    "Unexpected positional argument: '{}'. Use --help to see supported options.",
                    value
                );
            }
        }
    }
    Ok(flags)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "topiclock=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let cli_flags = parse_cli_flags(&args)?;

    if cli_flags.help {
        print_help();
        return Ok(());
    }

    let config = Config::from_env();
    if cli_flags.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let database = Arc::new(Database::new(&config.db_path)?);
    tracing::info!(
        "Claims stored under {} (active window {}s)",
        config.db_path,
        config.active_window_secs
    );
    let state = AppState::new(config.clone(), database.clone());

    let allow_public = topiclock_server::config::env_flag_enabled("ALLOW_PUBLIC_ACCESS");
    if allow_public {
        tracing::warn!("Public access enabled - server will accept requests from any origin");
    }

    let bind_addr = topiclock_server::resolve_bind_address(&config, allow_public);
    if !bind_addr.ip().is_loopback() {
        tracing::warn!(
            "Binding to non-localhost address: {} - viewer headers must only come from the forum host",
            bind_addr
        );
    }

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!("topiclock running at http://{}", actual_addr);

    let serve_result = serve_router(listener, state, allow_public, shutdown_signal()).await;

    if let Err(err) = database.flush() {
        tracing::error!("Failed to flush database: {}", err);
    }

    serve_result?;

    Ok(())
}

fn print_help() {
    println!("topiclock server\n");
    println!("Usage: topiclock [OPTIONS]\n");
    println!("Options:");
    println!("  --print-config    Print the resolved configuration as JSON and exit");
    println!("  --help            Show this help message");
    println!("\nEnvironment variables:");
    println!("  DB_PATH                 Database directory (default: ~/.cache/topiclock/db)");
    println!(
        "  PORT                    Server port (default: {})",
        DEFAULT_PORT
    );
    println!("  TOPIC_LOCK_WINDOW_SECS  Seconds a claim stays active (default: 120)");
    println!("  MAX_BODY_SIZE           Maximum request body in bytes (default: 64KiB)");
    println!("  ALLOW_PUBLIC_ACCESS     Allow CORS from any origin");
    println!(
        "  BIND                    Override bind address (e.g. 0.0.0.0:{})",
        DEFAULT_PORT
    );
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
