//! Process-local document and blob stores for development and tests.
//! Both can be switched offline to rehearse store outages.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::{
    entities::report::ReportRecord,
    errors::StoreError,
    repositories::{
        blob::{BlobStore, StoredBlob},
        report::ReportRepository,
    },
};

#[derive(Default)]
pub struct InMemoryReportRepo {
    collections: DashMap<String, Vec<(String, ReportRecord)>>,
    offline: AtomicBool,
}

impl InMemoryReportRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn records(&self, collection: &str) -> Vec<(String, ReportRecord)> {
        self.collections
            .get(collection)
            .map(|docs| docs.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, |docs| docs.len())
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ReportRepository for InMemoryReportRepo {
    async fn insert_report(&self, collection: &str, record: &ReportRecord) -> Result<String, StoreError> {
        self.ensure_online()?;

        let id = Uuid::new_v4().simple().to_string();
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push((id.clone(), record.clone()));

        Ok(id)
    }

    async fn ping(&self, _collection: &str) -> Result<(), StoreError> {
        self.ensure_online()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Default)]
pub struct InMemoryBlobStore {
    objects: DashMap<String, StoredObject>,
    offline: AtomicBool,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.get(key).map(|o| o.clone())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<StoredBlob, StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable);
        }

        self.objects.insert(
            key.to_string(),
            StoredObject {
                content_type: content_type.to_string(),
                bytes,
            },
        );

        Ok(StoredBlob {
            key: key.to_string(),
            url: format!("memory://{}", key),
        })
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable);
        }
        self.objects.remove(key);
        Ok(())
    }
}
