//! # vpcinfo
//!
//! Prints the VPC metadata of the host it runs on.

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use vpcinfo::bootstrap::{build_registry, init_logging, load_config, log_config};
use vpcinfo::report::{report, Target};
use vpcinfo_domain::CliOverrides;

#[derive(Parser)]
#[command(name = "vpcinfo")]
#[command(version)]
#[command(about = "Look up VPC subnets, zone and platform from DNS TXT records")]
struct Cli {
    /// What to print
    #[arg(value_enum, default_value_t = Target::All)]
    target: Target,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Timeout of one TXT resolution in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// How long resolved values stay cached in milliseconds
    #[arg(long)]
    ttl_ms: Option<u64>,

    /// Nameserver to query (repeatable, defaults to /etc/resolv.conf)
    #[arg(short, long = "nameserver")]
    nameservers: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        timeout_ms: cli.timeout_ms,
        ttl_ms: cli.ttl_ms,
        nameservers: cli.nameservers,
        log_level: cli.log_level,
    };

    let config = load_config(cli.config.as_deref(), overrides)?;
    init_logging(&config);
    log_config(&config, cli.config.as_deref());

    let registry = build_registry(&config)?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupted, cancelling lookups");
            on_signal.cancel();
        }
    });

    let mut stdout = std::io::stdout().lock();
    report(&registry, cli.target, &cancel, &mut stdout).await
}
