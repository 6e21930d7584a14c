use std::path::PathBuf;

use chrono::{DateTime, Utc};
use typed_builder::TypedBuilder;
use uuid::Uuid;

pub const PPTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";
pub const PPTX_EXTENSION: &str = "pptx";

/// A stored presentation. Immutable once created: it can only be read or deleted.
#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct PresentationRecord {
    #[builder(default=Uuid::new_v4())]
    pub id: Uuid,

    /// Where the artifact is persisted
    pub file_path: PathBuf,

    #[builder(default=Utc::now())]
    pub created_at: DateTime<Utc>,
}

impl PresentationRecord {
    /// File name suggested to clients downloading the artifact
    pub fn download_file_name(&self) -> String {
        format!("presentation_{}.{}", self.id, PPTX_EXTENSION)
    }
}

/// The rendered binary deck
#[derive(Clone, PartialEq, Eq)]
pub struct PresentationArtifact(Vec<u8>);

impl PresentationArtifact {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for PresentationArtifact {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// The bytes are not worth printing in logs
impl std::fmt::Debug for PresentationArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PresentationArtifact({} bytes)", self.0.len())
    }
}
