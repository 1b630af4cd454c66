use std::sync::Arc;
use tracing::info;
use vpcinfo_application::{Registry, TxtResolver};
use vpcinfo_domain::Config;
use vpcinfo_infrastructure::{DmiPlatformResolver, UdpTxtResolver};

pub fn build_registry(config: &Config) -> anyhow::Result<Registry> {
    let udp = UdpTxtResolver::from_config(&config.registry)?;

    info!(
        nameservers = ?udp.nameservers(),
        "TXT resolver ready"
    );

    let udp: Arc<dyn TxtResolver> = Arc::new(udp);
    let resolver = Arc::new(DmiPlatformResolver::new(udp, &config.registry.records));

    let registry = Registry::builder(resolver)
        .with_config(config.registry.clone())
        .build()?;

    Ok(registry)
}
