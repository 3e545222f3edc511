use clap::{Args, Parser, Subcommand};

use crate::params::FiresQuery;
use crate::watch::MAX_INTERVAL_MINUTES;

#[derive(Debug, Parser)]
#[command(about = "NASA FIRMS fire feed proxy.")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the fire feed HTTP API
    Http {
        #[arg(env = "FIREFEED_SERVER_ADDRESS", default_value = "127.0.0.1:8080")]
        address: std::net::SocketAddr,
    },
    /// Fetch hotspots once and print the JSON envelope
    Fetch(FetchArgs),
    /// Poll the feed and report fire changes
    Watch(WatchArgs),
}

#[derive(Debug, Args)]
pub struct FeedArgs {
    /// Bounding box as west,south,east,north
    #[arg(long, allow_hyphen_values = true)]
    pub bounds: String,
    /// Day window (1-10)
    #[arg(long)]
    pub days: Option<String>,
    /// FIRMS source, e.g. VIIRS_NOAA20_NRT or MODIS_NRT
    #[arg(long)]
    pub source: Option<String>,
}

impl FeedArgs {
    pub fn to_query(&self, date: Option<String>) -> FiresQuery {
        FiresQuery {
            bounds: Some(self.bounds.clone()),
            days: self.days.clone(),
            source: self.source.clone(),
            date,
        }
    }
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    #[command(flatten)]
    pub feed: FeedArgs,
    /// Last acquisition day (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    #[command(flatten)]
    pub feed: FeedArgs,
    /// Polling interval in minutes (1 to one week)
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..=MAX_INTERVAL_MINUTES))]
    pub interval: u64,
    /// Set to false to exit without polling
    #[arg(long, env = "FIREFEED_WATCH_ENABLED", default_value_t = true, action = clap::ArgAction::Set)]
    pub enabled: bool,
    /// Only track connection status, don't report fire changes
    #[arg(long)]
    pub no_notifications: bool,
}
