use crate::domain::model::SaveTargetsRequest;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait SettingsProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn output_path(&self) -> &str;
    fn request_timeout_secs(&self) -> u64;
    fn fallback_on_error(&self) -> bool;
}

/// A live data source that may come back empty.
///
/// `Ok(None)` means the source answered but had nothing usable; callers decide
/// what to fall back to.
#[async_trait]
pub trait RemoteSource<K: ?Sized + Sync>: Send + Sync {
    type Data: Send;

    async fn fetch(&self, key: &K) -> Result<Option<Self::Data>>;
}

#[async_trait]
pub trait TargetStore: Send + Sync {
    async fn save_targets(&self, request: &SaveTargetsRequest) -> Result<()>;
}
