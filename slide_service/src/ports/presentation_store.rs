use async_trait::async_trait;
use common::helper::error_chain_fmt;
use uuid::Uuid;

use crate::domain::entities::presentation::{PresentationArtifact, PresentationRecord};

/// Keeps rendered presentations until they are deleted
#[async_trait]
pub trait PresentationStore: Send + Sync {
    /// Persists the artifact under a fresh identifier
    async fn create(
        &self,
        artifact: &PresentationArtifact,
    ) -> Result<PresentationRecord, PresentationStoreError>;

    /// Fails with `NotFound` for an unknown id, or when the backing file has disappeared
    async fn get(
        &self,
        id: Uuid,
    ) -> Result<(PresentationRecord, PresentationArtifact), PresentationStoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), PresentationStoreError>;
}

#[derive(thiserror::Error)]
pub enum PresentationStoreError {
    #[error("Presentation {0} not found")]
    NotFound(Uuid),
    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

impl std::fmt::Debug for PresentationStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
