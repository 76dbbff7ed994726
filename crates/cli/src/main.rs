//! portfolio-lens - command line front end of the portfolio feed tools.
//!
//! # Usage
//!
//! ```bash
//! portfolio-lens login "https://app.example/login?token=..."
//! portfolio-lens summary --portfolio main
//! portfolio-lens performance --portfolio trading --start-date 2026-01-01
//! echo '{"tool":"yield_summary","arguments":{"portfolio":"main"}}' | portfolio-lens serve
//! ```

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use portfolio_lens_core::providers::http::HttpPortfolioProvider;
use portfolio_lens_core::storage::session::EncryptedFileSessionStore;
use portfolio_lens_core::tools::format::Formatter;
use portfolio_lens_core::tools::{ToolDispatcher, ToolName, ToolOutput, ToolRequest};
use portfolio_lens_core::PortfolioFeed;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod serve;

use cli::{Cli, Commands};
use config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries tool output only.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load `.env` before clap reads `env =` defaults.
    let mut config = AppConfig::from_env();
    let cli = Cli::parse();

    if let Some(url) = cli.api_url {
        config.client.base_url = url;
    }
    if let Some(path) = cli.session_file {
        config.session_file = path;
    }

    let request = match cli.command {
        Commands::Serve => None,
        Commands::Tools => {
            println!("{}", Formatter::tool_list(&ToolName::ALL));
            return Ok(());
        }
        Commands::Login { token } => Some(ToolRequest::new(ToolName::Login).with_token(token)),
        Commands::Logout => Some(ToolRequest::new(ToolName::Logout)),
        Commands::Status => Some(ToolRequest::new(ToolName::SessionStatus)),
        Commands::Portfolios => Some(ToolRequest::new(ToolName::ListPortfolios)),
        Commands::Summary(args) => Some(ToolRequest {
            portfolio: args.portfolio,
            ..ToolRequest::new(ToolName::PortfolioSummary)
        }),
        Commands::Yield(args) => Some(ToolRequest {
            portfolio: args.portfolio,
            ..ToolRequest::new(ToolName::YieldSummary)
        }),
        Commands::Performance(args) => Some(ToolRequest {
            portfolio: args.target.portfolio,
            start_date: args.start_date,
            ..ToolRequest::new(ToolName::Performance)
        }),
        Commands::All => Some(ToolRequest::new(ToolName::AllPortfoliosSummary)),
    };

    let output = match HttpPortfolioProvider::new(&config.client) {
        Ok(provider) => {
            let sessions = Arc::new(EncryptedFileSessionStore::new(
                config.session_file,
                config.passphrase,
            ));
            let dispatcher = ToolDispatcher::new(PortfolioFeed::with_settings(
                Arc::new(provider),
                sessions,
                config.feed,
            ));
            match request {
                Some(request) => dispatcher.run(&request).await,
                None => return serve::run(&dispatcher).await,
            }
        }
        // Still answer through the regular output channel.
        Err(e) => {
            error!(error = %e, "failed to set up the feed client");
            let text = format!("Error: {e}");
            match request {
                Some(request) => ToolOutput {
                    tool: request.tool,
                    success: false,
                    text,
                },
                None => return serve::reject_all(&text).await,
            }
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", output.text);
    }

    if !output.success {
        std::process::exit(1);
    }
    Ok(())
}
