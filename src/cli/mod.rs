pub mod commands;
pub mod target;

use clap::{Args, Parser};
pub use commands::*;
pub use target::*;

use crate::constants::DEFAULT_API_URL;

#[derive(Parser, Debug)]
#[command(name = "globalping", version)]
#[command(about = "Run network measurements (ping, traceroute, dns, mtr, http) from probes around the world")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Base URL of the measurement API
    #[arg(long, global = true, env = "GLOBALPING_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: url::Url,

    /// API token for higher rate limits
    #[arg(long, global = true, env = "GLOBALPING_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Print the raw JSON response instead of the probe output
    #[arg(long, global = true, conflicts_with = "latency")]
    pub json: bool,

    /// Print timing statistics only
    #[arg(long, global = true)]
    pub latency: bool,
}
