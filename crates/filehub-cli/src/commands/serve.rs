//! Web server command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use filehub_web::{config::LiveConfig, state::AppState};
use std::path::PathBuf;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, env = "FILEHUB_PORT", default_value = "3000")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "FILEHUB_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Seconds between keep-alive comments on idle streams
    #[arg(long, env = "FILEHUB_KEEP_ALIVE_SECS", default_value = "15")]
    pub keep_alive_secs: u64,

    /// Events buffered per stream before a slow client is dropped
    #[arg(long, env = "FILEHUB_SUBSCRIBER_BUFFER", default_value = "64")]
    pub subscriber_buffer: usize,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file path (requires --log)
    #[arg(long, requires = "log")]
    pub log_file: Option<PathBuf>,
}

pub async fn execute(args: ServeArgs) -> Result<()> {
    let config = LiveConfig::new(args.keep_alive_secs, args.subscriber_buffer)?;

    println!();
    println!("  {} {}", "Filehub".cyan().bold(), "Live Server".bold());
    println!();
    println!(
        "  {}     http://{}:{}/api/files/stream",
        "Stream".green(),
        args.host,
        args.port
    );
    println!(
        "  {}     http://{}:{}/internal/notify",
        "Notify".green(),
        args.host,
        args.port
    );
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    filehub_web::run_server(AppState::new(config), &args.host, args.port).await?;

    Ok(())
}
