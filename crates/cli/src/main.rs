use clap::Parser;
use sigaid_cli::commands::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // The gateway installs its own structured subscriber; everything else
    // logs through env_logger.
    if matches!(cli.command, Command::Serve(_)) {
        sigaid_gateway::init_tracing()?;
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }
    sigaid_cli::commands::run(cli).await
}
