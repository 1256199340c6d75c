use std::sync::Arc;

use async_trait::async_trait;

use crate::{entities::report::ReportRecord, errors::StoreError};

/// Document store holding submitted reports.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Inserts `record` as a new document and returns its id.
    async fn insert_report(&self, collection: &str, record: &ReportRecord) -> Result<String, StoreError>;

    /// Reachability check used by the health endpoint.
    async fn ping(&self, collection: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<T> ReportRepository for Arc<T>
where
    T: ReportRepository + ?Sized,
{
    async fn insert_report(&self, collection: &str, record: &ReportRecord) -> Result<String, StoreError> {
        (**self).insert_report(collection, record).await
    }

    async fn ping(&self, collection: &str) -> Result<(), StoreError> {
        (**self).ping(collection).await
    }
}
