use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use vpcinfo_domain::DomainError;

/// Performs one DNS TXT query.
///
/// Implementations return the TXT values in record order and must stop
/// promptly once `cancel` fires. Permission problems (no network or DNS
/// access in this environment) are reported as
/// [`DomainError::PermissionDenied`] so callers can tell them apart from a
/// failed query.
#[async_trait]
pub trait TxtResolver: Send + Sync {
    async fn resolve(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, DomainError>;
}
