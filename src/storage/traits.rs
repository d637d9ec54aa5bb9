use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Writes `data` under `key`. An existing object with the same key is overwritten.
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<()>;

    fn public_url(&self, key: &str) -> String;

    fn backend_name(&self) -> &'static str;
}
