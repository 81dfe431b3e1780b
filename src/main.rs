mod config;
mod error;
mod handlers;
mod models;
mod server;
mod services;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;

use config::GatewayConfig;
use handlers::AnalysisGateway;
use services::{format_analysis_report, GatewayClient, GeminiService};

/// Supplement label analysis gateway
#[derive(Parser, Debug)]
#[command(name = "sweat-gateway")]
#[command(about = "💪 Relay supplement label photos to Gemini and return a structured analysis")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP gateway (default)
    Serve,
    /// Send a label photo to a running gateway and print the analysis
    Analyze {
        /// Path to the label image
        image: PathBuf,

        /// Gateway base URL
        #[arg(long, default_value = "http://localhost:8080")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables (RUST_LOG may come from .env)
    dotenv().ok();

    // Initialize logger
    env_logger::init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await,
        Command::Analyze { image, url } => analyze(image, url).await,
    }
}

async fn serve() -> Result<()> {
    log::info!("🚀 Starting supplement analysis gateway...");

    let config = GatewayConfig::from_env()?;

    let gemini = Arc::new(GeminiService::new(config.gemini.clone())?);
    log::info!(
        "✅ Gemini service initialized with model: {} (timeout {:?})",
        config.gemini.model,
        config.gemini.timeout
    );

    let gateway = Arc::new(AnalysisGateway::new(gemini));
    let app = server::create_router(gateway, config.max_body_bytes);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    log::info!("🌐 Gateway listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Gateway server failed")?;

    log::info!("🛑 Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("❌ Failed to listen for shutdown signal: {}", e);
    }
}

async fn analyze(image: PathBuf, url: String) -> Result<()> {
    if !image.exists() {
        anyhow::bail!("Image file '{}' not found", image.display());
    }

    let analysis = GatewayClient::new(url).analyze_image_file(&image).await?;
    println!("{}", format_analysis_report(&analysis));
    Ok(())
}
