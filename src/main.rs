use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod admin;
mod config;
mod report;
#[cfg(test)]
mod testutil;

use report::{MetaView, SortOrder};

/// Summarise Kong workspace metadata counts from the admin API.
#[derive(Parser, Debug)]
#[command(name = "kong-meta", version, about)]
pub struct Cli {
    /// Admin API base URL (e.g. http://localhost:8001). Falls back to
    /// KONG_ADMIN_ADDR, the config file, then http://localhost:8001.
    #[arg(long, value_name = "URL")]
    pub kong_addr: Option<String>,

    /// Header for metadata requests, as 'key:value' (e.g. 'x-admin-token:token_value').
    #[arg(long, value_name = "KEY:VALUE")]
    pub headers: Option<String>,

    /// Which table(s) to print [default: counts]
    #[arg(long, value_enum)]
    pub meta: Option<MetaView>,

    /// Row order of the totals table [default: insertion]
    #[arg(long, value_enum)]
    pub sort: Option<SortOrder>,

    /// Config file (default: $KONG_META_CONFIG, then ~/.kong-meta/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = config::resolve(&cli)?;
    let client = admin::AdminClient::new(&settings.kong_addr, settings.headers.clone());
    let inventory = report::collect(&client)?;

    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    report::render(&inventory, settings.meta, settings.sort, &mut out)?;
    out.flush()?;
    Ok(())
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
