//! Document deletion and the rows that go with it.

use serde::Serialize;
use tracing::info;

use crate::DocumentId;

use super::{Store, Tables};

/// What a cascade delete removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    pub document_tags: usize,
    pub links: usize,
}

impl Tables {
    /// Removes a document and everything referencing it.
    ///
    /// Join rows go first, then links in either direction, then the
    /// document itself. Returns `None` if the document did not exist, in
    /// which case nothing is touched.
    pub(super) fn cascade_delete_document(&mut self, id: DocumentId) -> Option<CascadeReport> {
        if !self.documents.contains(id) {
            return None;
        }

        let document_tags = self.document_tags.retain(|dt| dt.document_id != id);
        let links = self.links.retain(|link| !link.touches(id));
        self.documents.delete(id);

        Some(CascadeReport {
            document_tags,
            links,
        })
    }
}

impl Store {
    /// Deletes a document along with its tag associations and every
    /// semantic link where it is source or target.
    ///
    /// Returns false if the document did not exist.
    pub fn delete_document(&self, id: DocumentId) -> bool {
        self.delete_document_with_report(id).is_some()
    }

    /// Like [`delete_document`](Self::delete_document), reporting how many
    /// dependent rows were removed.
    pub fn delete_document_with_report(&self, id: DocumentId) -> Option<CascadeReport> {
        let report = self.tables.write().cascade_delete_document(id)?;

        info!(
            document_id = %id,
            document_tags = report.document_tags,
            links = report.links,
            "deleted document"
        );
        Some(report)
    }
}
