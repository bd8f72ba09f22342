mod commands;
mod html;
mod logging;
mod routes;

use commands::{CommandLine, Commands, info, scan, serve};
use flock_common::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLine::parse_args();

    logging::init();

    let mut cfg = Config::from_env()?;
    cli.apply_overrides(&mut cfg);

    match cli.command {
        Commands::Serve => serve::serve(cfg).await,
        Commands::Scan => scan::scan(&cfg).await,
        Commands::Info => info::info(&cfg),
    }
}
