use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    errors::StoreError,
    repositories::blob::{BlobStore, StoredBlob},
};

use super::{check_status, FirebaseClient};

#[derive(Clone)]
pub struct FirebaseBlobStore {
    pub client: FirebaseClient,
}

impl FirebaseBlobStore {
    pub fn new(client: FirebaseClient) -> Self {
        FirebaseBlobStore { client }
    }

    /// Token-based download URL, the same form the Firebase SDK's `getDownloadURL` returns.
    pub fn download_url(&self, key: &str, token: Option<&str>) -> String {
        let first_token = token.and_then(|t| t.split(',').next()).filter(|t| !t.is_empty());
        match first_token {
            Some(token) => format!(
                "{}?alt=media&token={}",
                self.client.object_url(key),
                urlencoding::encode(token)
            ),
            None => format!("{}?alt=media", self.client.object_url(key)),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadedObject {
    name: String,
    #[serde(default)]
    download_tokens: Option<String>,
}

#[async_trait]
impl BlobStore for FirebaseBlobStore {
    async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<StoredBlob, StoreError> {
        let response = self.client.http
            .post(self.client.objects_url())
            .query(&[
                ("uploadType", "media"),
                ("name", key),
                ("key", self.client.api_key.as_str()),
            ])
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        let uploaded: UploadedObject = check_status(response).await?.json().await?;

        Ok(StoredBlob {
            url: self.download_url(&uploaded.name, uploaded.download_tokens.as_deref()),
            key: uploaded.name,
        })
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let response = self.client.http
            .delete(self.client.object_url(key))
            .query(&[("key", self.client.api_key.as_str())])
            .send()
            .await?;

        check_status(response).await.map(|_| ())
    }
}
