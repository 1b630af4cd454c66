use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use vpcinfo_application::TxtResolver;
use vpcinfo_domain::{DomainError, RecordNames};

const SYS_VENDOR_PATH: &str = "/sys/class/dmi/id/sys_vendor";
const BOARD_ASSET_TAG_PATH: &str = "/sys/class/dmi/id/board_asset_tag";
const HYPERVISOR_UUID_PATH: &str = "/sys/hypervisor/uuid";

/// Answers the platform record from local DMI data when the host identifies
/// itself as EC2, and delegates everything else to `inner`.
pub struct DmiPlatformResolver {
    inner: Arc<dyn TxtResolver>,
    platform_record: String,
    sys_vendor_path: PathBuf,
    board_asset_tag_path: PathBuf,
    hypervisor_uuid_path: PathBuf,
}

impl DmiPlatformResolver {
    pub fn new(inner: Arc<dyn TxtResolver>, records: &RecordNames) -> Self {
        Self {
            inner,
            platform_record: records.platform.clone(),
            sys_vendor_path: PathBuf::from(SYS_VENDOR_PATH),
            board_asset_tag_path: PathBuf::from(BOARD_ASSET_TAG_PATH),
            hypervisor_uuid_path: PathBuf::from(HYPERVISOR_UUID_PATH),
        }
    }

    /// Read DMI data from `root` instead of `/` (useful for testing)
    pub fn with_root(mut self, root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let rebase = |path: &str| root.join(path.trim_start_matches('/'));
        self.sys_vendor_path = rebase(SYS_VENDOR_PATH);
        self.board_asset_tag_path = rebase(BOARD_ASSET_TAG_PATH);
        self.hypervisor_uuid_path = rebase(HYPERVISOR_UUID_PATH);
        self
    }

    /// `Ok(None)` when the file does not exist.
    async fn read_indicator(path: &Path) -> Result<Option<String>, DomainError> {
        match fs::read_to_string(path).await {
            Ok(content) => Ok(Some(content.trim().to_string())),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => Err(
                DomainError::PermissionDenied(format!("read {}: {}", path.display(), e)),
            ),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "DMI indicator unavailable");
                Ok(None)
            }
        }
    }

    async fn is_ec2(&self) -> Result<bool, DomainError> {
        if let Some(vendor) = Self::read_indicator(&self.sys_vendor_path).await? {
            if vendor.eq_ignore_ascii_case("amazon ec2") {
                return Ok(true);
            }
        }

        if let Some(tag) = Self::read_indicator(&self.board_asset_tag_path).await? {
            if tag.starts_with("i-") {
                return Ok(true);
            }
        }

        if let Some(uuid) = Self::read_indicator(&self.hypervisor_uuid_path).await? {
            if uuid.to_ascii_lowercase().starts_with("ec2") {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

#[async_trait]
impl TxtResolver for DmiPlatformResolver {
    async fn resolve(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, DomainError> {
        if name == self.platform_record && self.is_ec2().await? {
            debug!(record = %name, "Platform identified from DMI data");
            return Ok(vec!["aws".to_string()]);
        }

        self.inner.resolve(name, cancel).await
    }
}
