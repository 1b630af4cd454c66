use clap::ValueEnum;
use std::io::Write;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use vpcinfo_application::Registry;
use vpcinfo_domain::DomainError;

/// Metadata printed by one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Target {
    Platform,
    Zone,
    Subnets,
    #[default]
    All,
}

impl Target {
    fn includes(self, other: Target) -> bool {
        self == Target::All || self == other
    }
}

/// Prints one `name: value` line per lookup.
///
/// Lookups denied by the environment are logged and skipped; every other
/// error stops the report.
pub async fn report(
    registry: &Registry,
    target: Target,
    cancel: &CancellationToken,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    if target.includes(Target::Platform) {
        let platform = registry.lookup_platform(cancel).await;
        print_line(out, "platform", platform)?;
    }

    if target.includes(Target::Zone) {
        let zone = registry.lookup_zone(cancel).await;
        print_line(out, "zone", zone)?;
    }

    if target.includes(Target::Subnets) {
        let subnets = registry.lookup_subnets(cancel).await;
        print_line(out, "subnets", subnets)?;
    }

    Ok(())
}

fn print_line<T: std::fmt::Display>(
    out: &mut impl Write,
    name: &str,
    result: Result<T, DomainError>,
) -> anyhow::Result<()> {
    match result {
        Ok(value) => writeln!(out, "{}: {}", name, value)?,
        Err(e) if e.is_permission_denied() => {
            warn!(lookup = name, error = %e, "Lookup not permitted, skipping");
        }
        Err(e) => return Err(anyhow::Error::new(e).context(format!("{} lookup failed", name))),
    }
    Ok(())
}
