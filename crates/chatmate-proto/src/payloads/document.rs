//! Document resources and upload forms.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::DocumentId;

/// An uploaded file or registered external link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Backend primary key.
    pub id: DocumentId,
    /// Display title.
    pub title: String,
    /// URL of the stored file. `None` for link documents.
    #[serde(default)]
    pub file: Option<String>,
    /// External link. `None` for uploaded files.
    #[serde(default)]
    pub link: Option<String>,
    /// Upload timestamp as rendered by the backend (ISO 8601).
    pub uploaded_at: String,
}

impl Document {
    /// Where the document content lives: the link if set, otherwise the file.
    pub fn location(&self) -> Option<&str> {
        self.link.as_deref().filter(|l| !l.is_empty()).or(self.file.as_deref())
    }
}

/// Content of a document: a local file to upload or an external link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// Local file sent as a multipart `file` part.
    File(PathBuf),
    /// External URL sent as a plain `link` field.
    Link(String),
}

/// Multipart form for `POST document/upload_file/` and
/// `PUT document/{id}/update_document/`.
///
/// Uploads always carry a source. Updates may omit it to change only the
/// title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentForm {
    /// Document title.
    pub title: String,
    /// File or link. `None` keeps the stored content.
    pub source: Option<DocumentSource>,
}
