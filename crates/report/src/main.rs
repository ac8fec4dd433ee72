use anyhow::Result;
use clap::Parser;
use domain::services::SystemClock;
use screen_timer_report::{app, commands::Cli, config::Config, logging};
use tracing::{error, info};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    logging::init_logging(&config.logging, cli.verbose)?;

    info!("Starting Screen Timer report v{}", env!("CARGO_PKG_VERSION"));

    let report = match app::run(&config, &cli.command, SystemClock) {
        Ok(report) => report,
        Err(e) => {
            error!(code = e.code(), error = %e, "Report command failed");
            return Err(e.into());
        }
    };

    if cli.compact {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
