use std::{
    collections::HashMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    domain::entities::presentation::{PresentationArtifact, PresentationRecord, PPTX_EXTENSION},
    ports::presentation_store::{PresentationStore, PresentationStoreError},
};

/// Stores each presentation as `<id>.pptx` in one directory
///
/// The id -> record index lives in memory and is rebuilt from the directory content when the
/// repository is created, so presentations survive a restart.
pub struct PresentationFileRepository {
    output_dir: PathBuf,
    index: RwLock<HashMap<Uuid, PresentationRecord>>,
}

impl PresentationFileRepository {
    /// Creates `output_dir` if needed and indexes the presentations already in it
    #[tracing::instrument(name = "Opening presentation file repository")]
    pub async fn try_new(output_dir: &Path) -> Result<Self, PresentationStoreError> {
        tokio::fs::create_dir_all(output_dir).await?;

        let mut index = HashMap::new();
        let mut entries = tokio::fs::read_dir(output_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let file_path = entry.path();

            let id = match presentation_id(&file_path) {
                Some(id) => id,
                None => continue,
            };

            let created_at = entry
                .metadata()
                .await?
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());

            index.insert(
                id,
                PresentationRecord::builder()
                    .id(id)
                    .file_path(file_path)
                    .created_at(created_at)
                    .build(),
            );
        }

        info!(
            num_presentations = index.len(),
            output_dir = %output_dir.display(),
            "Indexed stored presentations"
        );

        Ok(Self {
            output_dir: output_dir.to_owned(),
            index: RwLock::new(index),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn file_path(&self, id: Uuid) -> PathBuf {
        self.output_dir.join(format!("{}.{}", id, PPTX_EXTENSION))
    }
}

/// Extension of presentation files still being written
const PARTIAL_EXTENSION: &str = "partial";

async fn write_then_rename(
    partial_path: &Path,
    file_path: &Path,
    artifact: &PresentationArtifact,
) -> std::io::Result<()> {
    tokio::fs::write(partial_path, artifact).await?;
    tokio::fs::rename(partial_path, file_path).await
}

/// Only `<uuid>.pptx` files are presentations
fn presentation_id(file_path: &Path) -> Option<Uuid> {
    if file_path.extension()?.to_str()? != PPTX_EXTENSION {
        return None;
    }

    Uuid::parse_str(file_path.file_stem()?.to_str()?).ok()
}

#[async_trait]
impl PresentationStore for PresentationFileRepository {
    #[tracing::instrument(name = "Storing presentation", skip(self))]
    async fn create(
        &self,
        artifact: &PresentationArtifact,
    ) -> Result<PresentationRecord, PresentationStoreError> {
        let id = Uuid::new_v4();
        let record = PresentationRecord::builder()
            .id(id)
            .file_path(self.file_path(id))
            .build();

        // Written under a name the index ignores, then moved into place: a failed write never
        // leaves a truncated `<id>.pptx` behind
        let partial_path = record.file_path.with_extension(PARTIAL_EXTENSION);
        if let Err(error) = write_then_rename(&partial_path, &record.file_path, artifact).await {
            if let Err(cleanup_error) = tokio::fs::remove_file(&partial_path).await {
                if cleanup_error.kind() != ErrorKind::NotFound {
                    warn!(
                        error = %cleanup_error,
                        path = %partial_path.display(),
                        "Failed to remove a partial presentation file"
                    );
                }
            }
            return Err(error.into());
        }
        self.index.write().await.insert(id, record.clone());

        info!(presentation_id = %id, "Presentation stored");
        Ok(record)
    }

    #[tracing::instrument(name = "Getting presentation", skip(self))]
    async fn get(
        &self,
        id: Uuid,
    ) -> Result<(PresentationRecord, PresentationArtifact), PresentationStoreError> {
        let record = self
            .index
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(PresentationStoreError::NotFound(id))?;

        match tokio::fs::read(&record.file_path).await {
            Ok(bytes) => Ok((record, PresentationArtifact::new(bytes))),
            Err(error) if error.kind() == ErrorKind::NotFound => {
                warn!(presentation_id = %id, "Presentation file has vanished, evicting it");
                self.index.write().await.remove(&id);
                Err(PresentationStoreError::NotFound(id))
            }
            Err(error) => Err(error.into()),
        }
    }

    #[tracing::instrument(name = "Deleting presentation", skip(self))]
    async fn delete(&self, id: Uuid) -> Result<(), PresentationStoreError> {
        let record = self
            .index
            .write()
            .await
            .remove(&id)
            .ok_or(PresentationStoreError::NotFound(id))?;

        match tokio::fs::remove_file(&record.file_path).await {
            Ok(()) => {}
            // Removed behind our back, the outcome is the same
            Err(error) if error.kind() == ErrorKind::NotFound => {}
            Err(error) => return Err(error.into()),
        }

        info!(presentation_id = %id, "Presentation deleted");
        Ok(())
    }
}
