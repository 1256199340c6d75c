use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::GuidanceError;

/// External text-generation collaborator.
#[async_trait]
pub trait GuidanceService: Send + Sync {
    /// Sends a fully rendered prompt and returns the generated guidance text.
    async fn generate(&self, prompt: &str) -> Result<String, GuidanceError>;
}

#[async_trait]
impl<T> GuidanceService for Arc<T>
where
    T: GuidanceService + ?Sized,
{
    async fn generate(&self, prompt: &str) -> Result<String, GuidanceError> {
        (**self).generate(prompt).await
    }
}
