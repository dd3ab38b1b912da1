//! Contracts for the collaborators that feed the store.
//!
//! Metadata generation and relationship detection run outside the store:
//! the functions here call the collaborator first, without holding any
//! store lock, and only then hand the results to the store. Collaborator
//! failures are returned as-is; retrying is the caller's call.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::StoreError;
use crate::{DocumentId, EntityKind, NewDocument, NewLink, SemanticLink, Store, TagId, UserId};

/// A failure reported by an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("collaborator failed: {message}")]
pub struct CollaboratorError {
    pub message: String,
}

impl CollaboratorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors from the ingest flows.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

/// An upload as described by the upload/metadata flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRequest {
    pub title: String,
    pub filename: String,
    pub file_type: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tag_names: Vec<String>,
}

impl UploadRequest {
    pub(crate) fn to_new_document(&self) -> NewDocument {
        NewDocument {
            title: self.title.clone(),
            filename: self.filename.clone(),
            file_type: self.file_type.clone(),
            category: self.category.clone(),
            summary: self.summary.clone(),
            content: self.content.clone(),
        }
    }
}

/// What the store hands back for an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub document_id: DocumentId,
    /// Distinct tag ids, in the order their names first appeared.
    pub tag_ids: Vec<TagId>,
}

/// Metadata derived for a document by the metadata collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedMetadata {
    pub title: Option<String>,
    pub category: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Derives metadata for uploaded content.
///
/// Implementations typically call a text-generation service.
pub trait MetadataGenerator: Send + Sync {
    fn generate(
        &self,
        filename: &str,
        content: &str,
    ) -> Result<GeneratedMetadata, CollaboratorError>;
}

/// A document as offered to the relationship detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateDocument {
    pub id: DocumentId,
    pub title: String,
    pub content: Option<String>,
}

/// A relationship reported by the detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedRelationship {
    pub source_id: DocumentId,
    pub target_id: DocumentId,
    pub relationship_type: String,
    #[serde(default)]
    pub strength: Option<u32>,
}

impl From<DetectedRelationship> for NewLink {
    fn from(detected: DetectedRelationship) -> Self {
        NewLink {
            source: detected.source_id,
            target: detected.target_id,
            link_type: detected.relationship_type,
            strength: detected.strength,
        }
    }
}

/// Finds relationships between one document and a set of candidates.
pub trait RelationshipDetector: Send + Sync {
    fn detect(
        &self,
        source: &CandidateDocument,
        candidates: &[CandidateDocument],
    ) -> Result<Vec<DetectedRelationship>, CollaboratorError>;
}

/// Generates metadata for uploaded content and stores the document.
///
/// The title falls back to the filename when the generator offers none.
pub fn analyze_upload(
    store: &Store,
    generator: &dyn MetadataGenerator,
    owner: UserId,
    filename: &str,
    file_type: &str,
    content: &str,
) -> Result<UploadReceipt, IngestError> {
    let metadata = generator.generate(filename, content)?;

    let request = UploadRequest {
        title: metadata.title.unwrap_or_else(|| filename.to_string()),
        filename: filename.to_string(),
        file_type: file_type.to_string(),
        category: metadata.category,
        summary: metadata.summary,
        content: Some(content.to_string()),
        tag_names: metadata.tags,
    };

    Ok(store.ingest_upload(owner, &request)?)
}

/// Asks the detector how `document` relates to the owner's other documents
/// and replaces the links `document` previously asserted with the answer.
///
/// If any detection names a document the store doesn't hold, nothing is
/// written and the old links stay.
pub fn link_document(
    store: &Store,
    detector: &dyn RelationshipDetector,
    document: DocumentId,
) -> Result<Vec<SemanticLink>, IngestError> {
    let source = store
        .get_document(document)
        .ok_or_else(|| StoreError::not_found(EntityKind::Document, document.get()))?;

    let candidates: Vec<CandidateDocument> = store
        .list_user_documents(source.owner)
        .into_iter()
        .filter(|d| d.id != document)
        .map(|d| CandidateDocument {
            id: d.id,
            title: d.title,
            content: d.content,
        })
        .collect();

    let source = CandidateDocument {
        id: source.id,
        title: source.title,
        content: source.content,
    };

    let detected = detector.detect(&source, &candidates)?;
    let links = detected.into_iter().map(NewLink::from).collect();

    Ok(store.replace_links_from(document, links)?)
}
