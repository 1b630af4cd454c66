use tracing::info;
use vpcinfo_domain::{CliOverrides, Config};

/// Reads and validates the configuration. Emits no log events, since logging
/// is configured from the result.
pub fn load_config(
    config_path: Option<&str>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<Config> {
    Ok(Config::load(config_path, cli_overrides)?)
}

/// Logs the effective configuration; call once logging is initialized.
pub fn log_config(config: &Config, config_path: Option<&str>) {
    info!(
        config_file = config_path.unwrap_or("default"),
        timeout_ms = config.registry.timeout_ms,
        ttl_ms = config.registry.ttl_ms,
        nameservers = config.registry.nameservers.len(),
        "Configuration loaded"
    );
}
