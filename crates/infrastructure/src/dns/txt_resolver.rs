use super::forwarding::{MessageBuilder, ResponseParser};
use super::resolv_conf::{self, RESOLV_CONF_PATH, VPC_RESOLVER};
use super::transport::UdpTransport;
use async_trait::async_trait;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};
use vpcinfo_application::TxtResolver;
use vpcinfo_domain::{ConfigError, DomainError, RegistryConfig};

const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_millis(500);

/// TXT resolver querying a list of nameservers over UDP.
///
/// Nameservers are tried in order until one gives a definitive answer:
/// values, NXDOMAIN or a permission error. Server failures and timeouts move
/// on to the next nameserver.
pub struct UdpTxtResolver {
    nameservers: Vec<SocketAddr>,
    attempt_timeout: Duration,
}

impl UdpTxtResolver {
    pub fn new(nameservers: Vec<SocketAddr>) -> Self {
        Self {
            nameservers,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }

    /// Per-nameserver timeout; the registry timeout still bounds the whole
    /// resolution.
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Uses the configured nameservers, or the system ones when none are set.
    pub fn from_config(config: &RegistryConfig) -> Result<Self, ConfigError> {
        let nameservers = config.nameserver_addrs()?;
        if nameservers.is_empty() {
            return Ok(Self::from_system());
        }
        Ok(Self::new(nameservers))
    }

    /// Nameservers from `/etc/resolv.conf`, falling back to the VPC resolver.
    pub fn from_system() -> Self {
        Self::from_resolv_conf(RESOLV_CONF_PATH)
    }

    pub fn from_resolv_conf(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let nameservers = match resolv_conf::read(path) {
            Ok(servers) if !servers.is_empty() => servers,
            Ok(_) => {
                debug!(path = %path.display(), fallback = %VPC_RESOLVER, "No nameservers configured");
                vec![VPC_RESOLVER]
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, fallback = %VPC_RESOLVER, "Cannot read resolv.conf");
                vec![VPC_RESOLVER]
            }
        };
        Self::new(nameservers)
    }

    pub fn nameservers(&self) -> &[SocketAddr] {
        &self.nameservers
    }

    async fn query(&self, server: SocketAddr, name: &str) -> Result<Vec<String>, DomainError> {
        let (id, query) = MessageBuilder::build_txt_query(name)?;
        let transport = UdpTransport::new(server);

        let response = transport
            .send(&query, self.attempt_timeout)
            .await
            .map_err(|e| Self::for_record(name, server, e))?;

        ResponseParser::parse_txt(name, &response, id)
    }

    /// Transport errors are labelled with the server; relabel them with the
    /// record being resolved.
    fn for_record(name: &str, server: SocketAddr, error: DomainError) -> DomainError {
        match error {
            DomainError::ResolutionFailed { reason, .. } => {
                DomainError::resolution(name, format!("{} ({})", reason, server))
            }
            other => other,
        }
    }

    fn is_definitive(result: &Result<Vec<String>, DomainError>) -> bool {
        match result {
            Ok(_) => true,
            Err(e) => !e.is_resolution_error() || matches!(e, DomainError::NotFound(_)),
        }
    }
}

#[async_trait]
impl TxtResolver for UdpTxtResolver {
    #[instrument(skip(self, cancel))]
    async fn resolve(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, DomainError> {
        let mut last_error = None;

        for &server in &self.nameservers {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(DomainError::Cancelled),
                result = self.query(server, name) => result,
            };

            if Self::is_definitive(&result) {
                debug!(record = %name, server = %server, ok = result.is_ok(), "TXT lookup answered");
                return result;
            }

            if let Err(e) = result {
                warn!(record = %name, server = %server, error = %e, "Nameserver failed, trying next");
                last_error = Some(e);
            }
        }

        Err(last_error
            .unwrap_or_else(|| DomainError::resolution(name, "no nameservers configured")))
    }
}
