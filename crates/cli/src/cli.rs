//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// portfolio-lens - query an authenticated crypto-portfolio feed
#[derive(Parser)]
#[command(name = "portfolio-lens")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Feed API base URL
    #[arg(long, global = true, env = "PORTFOLIO_LENS_API_URL")]
    pub api_url: Option<String>,

    /// Encrypted session file
    #[arg(long, global = true, env = "PORTFOLIO_LENS_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// Print the tool output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Save a session from a token or a login link
    Login {
        /// Raw session token or https login link carrying `?token=`
        token: String,
    },

    /// Forget the saved session
    Logout,

    /// Show whether a session is saved
    Status,

    /// List portfolios
    Portfolios,

    /// Value by asset type and major holdings
    Summary(PortfolioArgs),

    /// Net annual yield per lending pool
    Yield(PortfolioArgs),

    /// Period return and top movers
    Performance(PerformanceArgs),

    /// Summary of every portfolio
    All,

    /// Answer JSON tool calls read line by line from stdin
    Serve,

    /// List the tool names accepted by `serve`
    Tools,
}

#[derive(Args)]
pub struct PortfolioArgs {
    /// Portfolio name (exact or partial, case-insensitive); defaults to the first one
    #[arg(short, long)]
    pub portfolio: Option<String>,
}

#[derive(Args)]
pub struct PerformanceArgs {
    #[command(flatten)]
    pub target: PortfolioArgs,

    /// Window start, YYYY-MM-DD (default: 30 days ago)
    #[arg(short, long)]
    pub start_date: Option<String>,
}
