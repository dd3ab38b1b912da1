use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{DocumentId, Tag, UserId};

/// An uploaded document and the metadata derived for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    /// The user who uploaded the document.
    pub owner: UserId,
    pub title: String,
    pub filename: String,
    pub file_type: String,
    pub category: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Bumped on every write to the document.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A document together with its resolved tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentWithTags {
    #[serde(flatten)]
    pub document: Document,
    pub tags: Vec<Tag>,
}

/// Input for creating a document.
///
/// # Examples
///
/// ```
/// use docgraph::NewDocument;
///
/// let doc = NewDocument::new("Attention notes", "attention.pdf", "pdf")
///     .category("research")
///     .summary("Notes on transformer attention");
///
/// assert_eq!(doc.title, "Attention notes");
/// assert_eq!(doc.category.as_deref(), Some("research"));
/// assert!(doc.content.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewDocument {
    pub title: String,
    pub filename: String,
    pub file_type: String,
    pub category: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
}

impl NewDocument {
    /// Creates a document input with the required fields set.
    pub fn new(
        title: impl Into<String>,
        filename: impl Into<String>,
        file_type: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            filename: filename.into(),
            file_type: file_type.into(),
            ..Default::default()
        }
    }

    /// Sets the category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the summary.
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Sets the extracted text content.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

/// Partial update for a document. `None` leaves a field unchanged.
///
/// Optional fields use `Some(None)` to clear the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentPatch {
    pub title: Option<String>,
    pub category: Option<Option<String>>,
    pub summary: Option<Option<String>>,
    pub content: Option<Option<String>>,
}

impl DocumentPatch {
    /// Applies the patch to `document` in place.
    pub(crate) fn apply(self, document: &mut Document) {
        if let Some(title) = self.title {
            document.title = title;
        }
        if let Some(category) = self.category {
            document.category = category;
        }
        if let Some(summary) = self.summary {
            document.summary = summary;
        }
        if let Some(content) = self.content {
            document.content = content;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TagId;

    fn sample(now: OffsetDateTime) -> Document {
        Document {
            id: DocumentId::new(1),
            owner: UserId::new(1),
            title: "Original".to_string(),
            filename: "original.md".to_string(),
            file_type: "md".to_string(),
            category: Some("notes".to_string()),
            summary: None,
            content: Some("body".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn patch_only_touches_set_fields() {
        let now = OffsetDateTime::now_utc();
        let mut doc = sample(now);

        DocumentPatch {
            title: Some("Renamed".to_string()),
            category: Some(None),
            ..Default::default()
        }
        .apply(&mut doc);

        assert_eq!(doc.title, "Renamed");
        assert_eq!(doc.category, None);
        assert_eq!(doc.content.as_deref(), Some("body"));
        assert_eq!(doc.filename, "original.md");
    }

    #[test]
    fn document_with_tags_flattens_document_fields() {
        let now = OffsetDateTime::now_utc();
        let aggregate = DocumentWithTags {
            document: sample(now),
            tags: vec![Tag::new(TagId::new(3), "ml")],
        };

        let json: serde_json::Value = serde_json::to_value(&aggregate).unwrap();
        assert_eq!(json["title"], "Original");
        assert_eq!(json["tags"][0]["name"], "ml");
    }
}
