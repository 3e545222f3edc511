use clap::Parser;
use cli::{Cli, Command};

mod cli;
mod config;
mod detection;
mod error;
mod firms;
mod notifications;
mod params;
mod server;
mod tools;
mod watch;

use config::config;
use firms::FirmsClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let args = Cli::parse();
    let client = FirmsClient::new(config().firms.clone())?;

    match args.cmd {
        Command::Http { address } => server::run(address, client).await,
        Command::Fetch(fetch_args) => tools::fetch::exec(client, fetch_args).await?,
        Command::Watch(watch_args) => watch::exec(client, watch_args).await?,
    }

    Ok(())
}
