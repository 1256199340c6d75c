use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::StoreError;

#[derive(Debug, Clone, PartialEq)]
pub struct StoredBlob {
    pub key: String,
    /// Publicly resolvable download URL.
    pub url: String,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<StoredBlob, StoreError>;

    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<T> BlobStore for Arc<T>
where
    T: BlobStore + ?Sized,
{
    async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<StoredBlob, StoreError> {
        (**self).upload(key, bytes, content_type).await
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        (**self).delete(key).await
    }
}
