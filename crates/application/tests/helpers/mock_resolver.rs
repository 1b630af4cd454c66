#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use vpcinfo_application::TxtResolver;
use vpcinfo_domain::DomainError;

pub const IPV4_RECORD: &str = "ipv4.vpcinfo";
pub const IPV6_RECORD: &str = "ipv6.vpcinfo";
pub const ZONE_RECORD: &str = "zone.vpcinfo";
pub const PLATFORM_RECORD: &str = "platform.vpcinfo";

// ============================================================================
// Mock TxtResolver
// ============================================================================

#[derive(Clone)]
pub struct MockTxtResolver {
    responses: Arc<RwLock<HashMap<String, Result<Vec<String>, DomainError>>>>,
    delay: Arc<RwLock<Duration>>,
    delays: Arc<RwLock<HashMap<String, Duration>>>,
    calls: Arc<RwLock<HashMap<String, usize>>>,
    total_calls: Arc<AtomicUsize>,
    cancelled: Arc<AtomicUsize>,
}

impl MockTxtResolver {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(HashMap::new())),
            delay: Arc::new(RwLock::new(Duration::ZERO)),
            delays: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(HashMap::new())),
            total_calls: Arc::new(AtomicUsize::new(0)),
            cancelled: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Resolver answering every default record name with typical AWS values
    pub async fn with_vpc_records() -> Self {
        let resolver = Self::new();
        resolver
            .set_response(IPV4_RECORD, &["10.0.0.0/16", "10.1.0.0/16"])
            .await;
        resolver.set_response(IPV6_RECORD, &["2600:1f14::/56"]).await;
        resolver.set_response(ZONE_RECORD, &["us-west-2a"]).await;
        resolver.set_response(PLATFORM_RECORD, &["aws"]).await;
        resolver
    }

    pub async fn set_response(&self, name: &str, values: &[&str]) {
        self.responses.write().await.insert(
            name.to_string(),
            Ok(values.iter().map(|v| v.to_string()).collect()),
        );
    }

    pub async fn set_error(&self, name: &str, error: DomainError) {
        self.responses
            .write()
            .await
            .insert(name.to_string(), Err(error));
    }

    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = delay;
    }

    /// Delay for one name, overriding [`set_delay`](Self::set_delay)
    pub async fn set_delay_for(&self, name: &str, delay: Duration) {
        self.delays.write().await.insert(name.to_string(), delay);
    }

    pub async fn calls_for(&self, name: &str) -> usize {
        self.calls.read().await.get(name).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.total_calls.load(Ordering::SeqCst)
    }

    /// Number of resolutions that observed their cancellation token
    pub fn cancelled_calls(&self) -> usize {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Default for MockTxtResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TxtResolver for MockTxtResolver {
    async fn resolve(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, DomainError> {
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        *self.calls.write().await.entry(name.to_string()).or_insert(0) += 1;

        let delay = match self.delays.read().await.get(name) {
            Some(delay) => *delay,
            None => *self.delay.read().await,
        };
        tokio::select! {
            _ = cancel.cancelled() => {
                self.cancelled.fetch_add(1, Ordering::SeqCst);
                return Err(DomainError::Cancelled);
            }
            _ = tokio::time::sleep(delay) => {}
        }

        self.responses
            .read()
            .await
            .get(name)
            .cloned()
            .unwrap_or_else(|| Err(DomainError::NotFound(name.to_string())))
    }
}
