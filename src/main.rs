use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use carrier_verify::cache::SnapshotCache;
use carrier_verify::config::{
    DEFAULT_BIND, DEFAULT_SAFER_BASE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use carrier_verify::fetch::fetch_snapshot_blocking;
use carrier_verify::record::{NotFound, Verification};
use carrier_verify::{
    assemble, server, CarrierIds, SaferClient, ServiceConfig, VerificationService,
};

#[derive(Debug, Parser)]
#[command(name = "carrier-verify", version, about = "Verify carriers against FMCSA SAFER")]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct ConfigArgs {
    /// SAFER snapshot query URL
    #[arg(long, global = true, env = "SAFER_BASE_URL", default_value = DEFAULT_SAFER_BASE_URL)]
    safer_base_url: String,

    /// Fetch timeout in seconds
    #[arg(long, global = true, env = "SAFER_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[arg(long, global = true, env = "SAFER_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Cache fetched snapshot pages for this many seconds (0 = off)
    #[arg(long, global = true, env = "SAFER_CACHE_TTL_SECS", default_value_t = 0)]
    cache_ttl_secs: u64,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP verification endpoint
    Serve {
        #[arg(long, env = "CARRIER_VERIFY_BIND", default_value = DEFAULT_BIND)]
        bind: std::net::SocketAddr,
    },
    /// Look up one carrier and print the JSON outcome
    Lookup {
        #[arg(long)]
        mc: Option<String>,
        #[arg(long)]
        dot: Option<String>,
        /// Parse a saved snapshot page instead of fetching
        #[arg(long)]
        html: Option<PathBuf>,
    },
}

impl ConfigArgs {
    fn into_config(self) -> ServiceConfig {
        ServiceConfig {
            safer_base_url: self.safer_base_url,
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self.user_agent,
            cache_ttl: Duration::from_secs(self.cache_ttl_secs),
            ..ServiceConfig::default()
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = cli.config.into_config();

    match cli.command {
        Command::Serve { bind } => {
            config.bind = bind;
            config.validate()?;
            run_server(config)
        }
        Command::Lookup { mc, dot, html } => {
            config.validate()?;
            lookup(&config, mc.as_deref(), dot.as_deref(), html)
        }
    }
}

fn run_server(config: ServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    let client = SaferClient::new(&config)?;
    let service = VerificationService::with_cache(client, SnapshotCache::new(config.cache_ttl));

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(server::serve(config.bind, service))?;
    Ok(())
}

fn lookup(
    config: &ServiceConfig,
    mc: Option<&str>,
    dot: Option<&str>,
    html: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let ids = CarrierIds::parse(mc, dot)?;
    let mc = ids.mc.clone().unwrap_or_default();
    let dot = ids.dot.clone().unwrap_or_default();

    let verification = match html {
        Some(path) => assemble(&std::fs::read_to_string(path)?, &mc, &dot),
        None => {
            let key = ids.lookup_key();
            info!(lookup = %key, "fetching SAFER snapshot");
            match fetch_snapshot_blocking(config, &key) {
                Ok(page) => assemble(&page, &mc, &dot),
                Err(e) => Verification::NotFound(
                    NotFound::new(ids.mc_number(), ids.dot_number()).with_error(e.to_string()),
                ),
            }
        }
    };

    println!("{}", serde_json::to_string_pretty(&verification)?);
    Ok(())
}
