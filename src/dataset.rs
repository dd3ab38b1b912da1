//! JSON dataset import.
//!
//! A dataset describes users, documents and links with caller-chosen keys
//! instead of store ids, so it can be written by hand or exported from
//! another system:
//!
//! ```json
//! {
//!   "users": [{"username": "ada", "email": "ada@example.com"}],
//!   "documents": [
//!     {"key": "attn", "owner": "ada", "title": "Attention", "filename": "attn.pdf",
//!      "file_type": "pdf", "tags": ["NLP", "ML"]}
//!   ],
//!   "links": [{"source": "attn", "target": "bert", "link_type": "extends", "strength": 7}]
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::error::StoreError;
use crate::ingest::UploadRequest;
use crate::{DocumentId, NewLink, NewUser, Store, UserId};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("dataset references unknown {what} '{key}'")]
    UnknownKey { what: &'static str, key: String },

    #[error("dataset defines {what} '{key}' more than once")]
    DuplicateKey { what: &'static str, key: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub users: Vec<DatasetUser>,
    #[serde(default)]
    pub documents: Vec<DatasetDocument>,
    #[serde(default)]
    pub links: Vec<DatasetLink>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetUser {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub credential: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetDocument {
    pub key: String,
    /// Username of the owner.
    pub owner: String,
    #[serde(flatten)]
    pub upload: DatasetUpload,
}

/// Upload fields of a dataset document; `tags` maps to the tag names.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetUpload {
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
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetLink {
    pub source: String,
    pub target: String,
    pub link_type: String,
    #[serde(default)]
    pub strength: Option<u32>,
}

/// Store ids assigned to the dataset's keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportedIds {
    pub users: HashMap<String, UserId>,
    pub documents: HashMap<String, DocumentId>,
}

impl DatasetError {
    /// Returns true when the dataset's contents, rather than the
    /// environment, caused the failure.
    pub fn is_user_error(&self) -> bool {
        match self {
            Self::Io(_) => false,
            Self::Parse(_) | Self::UnknownKey { .. } | Self::DuplicateKey { .. } => true,
            Self::Store(e) => e.is_user_error(),
        }
    }
}

impl Dataset {
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Loads the dataset into `store`.
    ///
    /// Users are created first, then documents with their tags, then links.
    /// Keys are checked before anything is written.
    pub fn load_into(&self, store: &Store) -> Result<ImportedIds, DatasetError> {
        self.check_keys()?;

        let mut ids = ImportedIds::default();
        for user in &self.users {
            let created = store.create_user(NewUser::new(
                &user.username,
                &user.email,
                &user.credential,
            ))?;
            ids.users.insert(user.username.clone(), created.id);
        }

        for document in &self.documents {
            let owner = lookup(&ids.users, "user", &document.owner)?;
            let upload = &document.upload;
            let request = UploadRequest {
                title: upload.title.clone(),
                filename: upload.filename.clone(),
                file_type: upload.file_type.clone(),
                category: upload.category.clone(),
                summary: upload.summary.clone(),
                content: upload.content.clone(),
                tag_names: upload.tags.clone(),
            };
            let receipt = store.ingest_upload(owner, &request)?;
            ids.documents.insert(document.key.clone(), receipt.document_id);
        }

        let links = self
            .links
            .iter()
            .map(|link| {
                Ok(NewLink {
                    source: lookup(&ids.documents, "document", &link.source)?,
                    target: lookup(&ids.documents, "document", &link.target)?,
                    link_type: link.link_type.clone(),
                    strength: link.strength,
                })
            })
            .collect::<Result<Vec<_>, DatasetError>>()?;
        store.record_links(links)?;

        info!(
            users = self.users.len(),
            documents = self.documents.len(),
            links = self.links.len(),
            "imported dataset"
        );
        Ok(ids)
    }

    fn check_keys(&self) -> Result<(), DatasetError> {
        let mut usernames = HashSet::new();
        for user in &self.users {
            if !usernames.insert(user.username.as_str()) {
                return Err(DatasetError::DuplicateKey {
                    what: "user",
                    key: user.username.clone(),
                });
            }
        }

        let mut keys = HashSet::new();
        for document in &self.documents {
            if !usernames.contains(document.owner.as_str()) {
                return Err(DatasetError::UnknownKey {
                    what: "user",
                    key: document.owner.clone(),
                });
            }
            if !keys.insert(document.key.as_str()) {
                return Err(DatasetError::DuplicateKey {
                    what: "document",
                    key: document.key.clone(),
                });
            }
        }

        for link in &self.links {
            for key in [&link.source, &link.target] {
                if !keys.contains(key.as_str()) {
                    return Err(DatasetError::UnknownKey {
                        what: "document",
                        key: key.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

fn lookup<T: Copy>(
    ids: &HashMap<String, T>,
    what: &'static str,
    key: &str,
) -> Result<T, DatasetError> {
    ids.get(key).copied().ok_or_else(|| DatasetError::UnknownKey {
        what,
        key: key.to_string(),
    })
}
