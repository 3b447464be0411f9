//! Document manager state machine.
//!
//! Independent of the chat session. Holds the document list, the upload form
//! and at most one document in edit-mode. Like [`crate::Session`] it never
//! performs I/O: operations return [`ApiRequest`]s and the caller feeds the
//! outcomes back through [`DocumentManager::handle_completion`].

use std::path::PathBuf;

use chatmate_proto::{Document, DocumentForm, DocumentId, DocumentSource};

use crate::{ApiError, ApiRequest, ApiResponse, Completion};

/// Shown when an upload fails.
pub const UPLOAD_ERROR: &str = "Error uploading document.";

/// Shown when an update fails.
pub const UPDATE_ERROR: &str = "Error updating document.";

/// Which content field the upload and edit forms use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceMode {
    /// Local file sent as a multipart part.
    #[default]
    File,
    /// External URL sent as a plain field.
    Link,
}

impl SourceMode {
    /// The other mode.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::File => Self::Link,
            Self::Link => Self::File,
        }
    }
}

/// A document in edit-mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEdit {
    /// Document being edited.
    pub document_id: DocumentId,
    /// Draft title.
    pub title: String,
    /// Replacement file, used in [`SourceMode::File`].
    pub file: Option<PathBuf>,
    /// Replacement link, used in [`SourceMode::Link`].
    pub link: String,
}

/// Document list, upload form and edit-mode state.
#[derive(Debug, Clone, Default)]
pub struct DocumentManager {
    documents: Vec<Document>,
    title: String,
    mode: SourceMode,
    file: Option<PathBuf>,
    link: String,
    editing: Option<DocumentEdit>,
    is_uploading: bool,
    is_saving: bool,
    upload_error: Option<&'static str>,
    edit_error: Option<&'static str>,
}

impl DocumentManager {
    /// Create an empty manager in [`SourceMode::File`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial fetch of the document list.
    pub fn mount(&self) -> Vec<ApiRequest> {
        vec![ApiRequest::ListDocuments]
    }

    /// Upload the form contents.
    ///
    /// No-op while an upload is in flight, if the title is blank, or if the
    /// current mode's content field is empty.
    pub fn upload(&mut self) -> Vec<ApiRequest> {
        if self.is_uploading || self.title.trim().is_empty() {
            return vec![];
        }
        let source = match self.mode {
            SourceMode::File => self.file.clone().map(DocumentSource::File),
            SourceMode::Link => non_blank(&self.link).map(DocumentSource::Link),
        };
        let Some(source) = source else {
            return vec![];
        };

        self.is_uploading = true;
        self.upload_error = None;
        vec![ApiRequest::UploadDocument {
            form: DocumentForm { title: self.title.clone(), source: Some(source) },
        }]
    }

    /// Put a document into edit-mode, seeded with its current title.
    ///
    /// Returns `false` if the document is not listed.
    pub fn start_editing(&mut self, document_id: DocumentId) -> bool {
        let Some(doc) = self.documents.iter().find(|doc| doc.id == document_id) else {
            return false;
        };

        self.editing =
            Some(DocumentEdit { document_id, title: doc.title.clone(), file: None, link: String::new() });
        self.edit_error = None;
        true
    }

    /// Leave edit-mode without saving.
    pub fn cancel_editing(&mut self) {
        self.editing = None;
    }

    /// Replace the edit title draft.
    pub fn set_edit_title(&mut self, title: impl Into<String>) {
        if let Some(edit) = self.editing.as_mut() {
            edit.title = title.into();
        }
    }

    /// Replace the edit file.
    pub fn set_edit_file(&mut self, file: Option<PathBuf>) {
        if let Some(edit) = self.editing.as_mut() {
            edit.file = file;
        }
    }

    /// Replace the edit link draft.
    pub fn set_edit_link(&mut self, link: impl Into<String>) {
        if let Some(edit) = self.editing.as_mut() {
            edit.link = link.into();
        }
    }

    /// Save the document in edit-mode.
    ///
    /// Content is replaced only if the current mode's edit field is set;
    /// otherwise only the title changes.
    pub fn save_edit(&mut self) -> Vec<ApiRequest> {
        if self.is_saving {
            return vec![];
        }
        let Some(edit) = self.editing.as_ref() else {
            return vec![];
        };
        if edit.title.trim().is_empty() {
            return vec![];
        }

        let source = match self.mode {
            SourceMode::File => edit.file.clone().map(DocumentSource::File),
            SourceMode::Link => non_blank(&edit.link).map(DocumentSource::Link),
        };
        let request = ApiRequest::UpdateDocument {
            document_id: edit.document_id,
            form: DocumentForm { title: edit.title.clone(), source },
        };

        self.is_saving = true;
        self.edit_error = None;
        vec![request]
    }

    /// Delete a document. The list changes only after the server confirms.
    pub fn delete(&self, document_id: DocumentId) -> Vec<ApiRequest> {
        vec![ApiRequest::DeleteDocument { document_id }]
    }

    /// Refetch the document list.
    pub fn refresh(&self) -> Vec<ApiRequest> {
        vec![ApiRequest::ListDocuments]
    }

    /// Apply the outcome of a request this manager issued.
    pub fn handle_completion(&mut self, completion: Completion) -> Vec<ApiRequest> {
        let Completion { request, result } = completion;

        match request {
            ApiRequest::ListDocuments => {
                self.on_listed(result);
                vec![]
            },
            ApiRequest::UploadDocument { .. } => self.on_uploaded(result),
            ApiRequest::UpdateDocument { document_id, .. } => self.on_updated(document_id, result),
            ApiRequest::DeleteDocument { document_id } => {
                self.on_deleted(document_id, result);
                vec![]
            },
            other => {
                tracing::warn!(request = ?other, "session completion routed to documents");
                vec![]
            },
        }
    }

    fn on_listed(&mut self, result: Result<ApiResponse, ApiError>) {
        match result {
            Ok(ApiResponse::Documents(documents)) => {
                self.documents = documents;
                let listed = |id: DocumentId| self.documents.iter().any(|doc| doc.id == id);
                if self.editing.as_ref().is_some_and(|edit| !listed(edit.document_id)) {
                    self.editing = None;
                }
            },
            Ok(other) => tracing::error!(?other, "unexpected response to document list"),
            Err(error) => tracing::error!(%error, "error fetching documents"),
        }
    }

    fn on_uploaded(&mut self, result: Result<ApiResponse, ApiError>) -> Vec<ApiRequest> {
        self.is_uploading = false;

        match result {
            Ok(response) => {
                if let ApiResponse::Document(doc) = response {
                    self.documents.push(doc);
                }
                self.title.clear();
                self.file = None;
                self.link.clear();
                self.mode = SourceMode::File;
                self.refresh()
            },
            Err(error) => {
                tracing::error!(%error, "error uploading document");
                self.upload_error = Some(UPLOAD_ERROR);
                vec![]
            },
        }
    }

    fn on_updated(
        &mut self,
        document_id: DocumentId,
        result: Result<ApiResponse, ApiError>,
    ) -> Vec<ApiRequest> {
        self.is_saving = false;

        match result {
            Ok(_) => {
                if self.editing.as_ref().is_some_and(|edit| edit.document_id == document_id) {
                    self.editing = None;
                }
                self.refresh()
            },
            Err(error) => {
                tracing::error!(%error, %document_id, "error updating document");
                self.edit_error = Some(UPDATE_ERROR);
                vec![]
            },
        }
    }

    fn on_deleted(&mut self, document_id: DocumentId, result: Result<ApiResponse, ApiError>) {
        match result {
            Ok(_) => {
                self.documents.retain(|doc| doc.id != document_id);
                if self.editing.as_ref().is_some_and(|edit| edit.document_id == document_id) {
                    self.editing = None;
                }
            },
            Err(error) => tracing::error!(%error, %document_id, "error deleting document"),
        }
    }

    /// Replace the upload title draft.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Select the file to upload.
    pub fn set_file(&mut self, file: Option<PathBuf>) {
        self.file = file;
    }

    /// Replace the upload link draft.
    pub fn set_link(&mut self, link: impl Into<String>) {
        self.link = link.into();
    }

    /// Switch between file and link content.
    pub fn set_mode(&mut self, mode: SourceMode) {
        self.mode = mode;
    }

    /// Flip the content mode.
    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    /// All documents.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Upload title draft.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current content mode.
    pub fn mode(&self) -> SourceMode {
        self.mode
    }

    /// File selected for upload.
    pub fn file(&self) -> Option<&PathBuf> {
        self.file.as_ref()
    }

    /// Upload link draft.
    pub fn link(&self) -> &str {
        &self.link
    }

    /// Document in edit-mode. `None` if no document is being edited.
    pub fn editing(&self) -> Option<&DocumentEdit> {
        self.editing.as_ref()
    }

    /// An upload is in flight.
    pub fn is_uploading(&self) -> bool {
        self.is_uploading
    }

    /// An update is in flight.
    pub fn is_saving(&self) -> bool {
        self.is_saving
    }

    /// Error line from the last failed upload.
    pub fn upload_error(&self) -> Option<&'static str> {
        self.upload_error
    }

    /// Error line from the last failed update.
    pub fn edit_error(&self) -> Option<&'static str> {
        self.edit_error
    }
}

fn non_blank(text: &str) -> Option<String> {
    (!text.trim().is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: u64, title: &str) -> Document {
        Document {
            id: DocumentId(id),
            title: title.into(),
            file: Some(format!("http://localhost:8000/media/{id}.pdf")),
            link: None,
            uploaded_at: "2024-06-01T12:00:00Z".into(),
        }
    }

    fn failure() -> ApiError {
        ApiError::Status { url: "http://backend/document/".into(), status: 500, body: String::new() }
    }

    fn listed(docs: Vec<Document>) -> DocumentManager {
        let mut manager = DocumentManager::new();
        let _ = manager
            .handle_completion(Completion::ok(ApiRequest::ListDocuments, ApiResponse::Documents(docs)));
        manager
    }

    #[test]
    fn upload_requires_title_and_content_for_mode() {
        let mut manager = DocumentManager::new();
        manager.set_file(Some("notes.pdf".into()));
        assert!(manager.upload().is_empty());

        manager.set_title("Notes");
        manager.set_mode(SourceMode::Link);
        assert!(manager.upload().is_empty());

        manager.set_link("  ");
        assert!(manager.upload().is_empty());
        assert!(!manager.is_uploading());
    }

    #[test]
    fn upload_sends_source_for_current_mode() {
        let mut manager = DocumentManager::new();
        manager.set_title("Spec");
        manager.set_file(Some("spec.pdf".into()));
        manager.set_link("https://example.com/spec");
        manager.toggle_mode();

        let requests = manager.upload();

        assert_eq!(requests, [ApiRequest::UploadDocument {
            form: DocumentForm {
                title: "Spec".into(),
                source: Some(DocumentSource::Link("https://example.com/spec".into())),
            },
        }]);
        assert!(manager.is_uploading());
        assert!(manager.upload().is_empty());
    }

    #[test]
    fn successful_upload_resets_form_and_refreshes() {
        let mut manager = DocumentManager::new();
        manager.set_title("Spec");
        manager.set_mode(SourceMode::Link);
        manager.set_link("https://example.com/spec");
        let requests = manager.upload();
        let [request] = &requests[..] else { panic!("expected upload") };

        let follow_up = manager.handle_completion(Completion::ok(
            request.clone(),
            ApiResponse::Document(doc(5, "Spec")),
        ));

        assert_eq!(follow_up, [ApiRequest::ListDocuments]);
        assert_eq!(manager.documents(), [doc(5, "Spec")]);
        assert_eq!((manager.title(), manager.link(), manager.file()), ("", "", None));
        assert_eq!(manager.mode(), SourceMode::File);
        assert!(!manager.is_uploading());
    }

    #[test]
    fn failed_upload_sets_error_and_clears_busy() {
        let mut manager = DocumentManager::new();
        manager.set_title("Notes");
        manager.set_file(Some("notes.pdf".into()));
        let requests = manager.upload();
        let [request] = &requests[..] else { panic!("expected upload") };

        let follow_up = manager.handle_completion(Completion::err(request.clone(), failure()));

        assert!(follow_up.is_empty());
        assert_eq!(manager.upload_error(), Some(UPLOAD_ERROR));
        assert!(!manager.is_uploading());
        assert_eq!(manager.title(), "Notes");
    }

    #[test]
    fn edit_without_new_content_changes_title_only() {
        let mut manager = listed(vec![doc(1, "Old")]);
        assert!(manager.start_editing(DocumentId(1)));
        manager.set_edit_title("New");

        let requests = manager.save_edit();

        assert_eq!(requests, [ApiRequest::UpdateDocument {
            document_id: DocumentId(1),
            form: DocumentForm { title: "New".into(), source: None },
        }]);
    }

    #[test]
    fn successful_edit_exits_edit_mode_and_refreshes() {
        let mut manager = listed(vec![doc(1, "Old")]);
        let _ = manager.start_editing(DocumentId(1));
        let requests = manager.save_edit();
        let [request] = &requests[..] else { panic!("expected update") };

        let follow_up = manager.handle_completion(Completion::ok(request.clone(), ApiResponse::Empty));

        assert_eq!(follow_up, [ApiRequest::ListDocuments]);
        assert!(manager.editing().is_none());
        assert!(!manager.is_saving());
    }

    #[test]
    fn failed_edit_keeps_draft_and_sets_error() {
        let mut manager = listed(vec![doc(1, "Old")]);
        let _ = manager.start_editing(DocumentId(1));
        manager.set_edit_title("New");
        let requests = manager.save_edit();
        let [request] = &requests[..] else { panic!("expected update") };

        let _ = manager.handle_completion(Completion::err(request.clone(), failure()));

        assert_eq!(manager.edit_error(), Some(UPDATE_ERROR));
        assert_eq!(manager.editing().map(|e| e.title.as_str()), Some("New"));
        assert!(!manager.is_saving());
    }

    #[test]
    fn delete_removes_document_only_on_success() {
        let mut manager = listed(vec![doc(1, "A"), doc(2, "B")]);
        let requests = manager.delete(DocumentId(1));
        let [request] = &requests[..] else { panic!("expected delete") };

        let _ = manager.handle_completion(Completion::err(request.clone(), failure()));
        assert_eq!(manager.documents().len(), 2);

        let _ = manager.handle_completion(Completion::ok(request.clone(), ApiResponse::Empty));
        assert_eq!(manager.documents(), [doc(2, "B")]);
    }

    #[test]
    fn editing_unknown_document_is_rejected() {
        let mut manager = listed(vec![]);
        assert!(!manager.start_editing(DocumentId(9)));
        assert!(manager.save_edit().is_empty());
    }

    #[test]
    fn list_without_the_edited_document_ends_edit() {
        let mut manager = listed(vec![doc(1, "Manual"), doc(2, "Guide")]);
        assert!(manager.start_editing(DocumentId(2)));

        let _ = manager.handle_completion(Completion::ok(
            ApiRequest::ListDocuments,
            ApiResponse::Documents(vec![doc(1, "Manual")]),
        ));

        assert!(manager.editing().is_none());
    }
}
