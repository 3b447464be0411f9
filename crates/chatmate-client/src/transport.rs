//! HTTP transport.
//!
//! Executes [`ApiRequest`]s against the backend with reqwest. Every failure
//! mode (bad URL, connection error, non-2xx status, undecodable body,
//! unreadable upload file) maps to one [`ApiError`]; callers hand the result
//! back to the state machine unchanged.

use chatmate_proto::{ChatQuery, DocumentForm, DocumentSource, Endpoint, QueryEdit, RoomName};
use reqwest::multipart::{Form, Part};
use url::Url;

use crate::{ApiError, ApiRequest, ApiResponse};

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/chatmate/api/";

/// Transport configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Base URL every endpoint path is joined onto.
    pub base_url: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string() }
    }
}

/// reqwest-backed executor for API requests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a transport for the configured base URL.
    ///
    /// A missing trailing slash is added so relative paths join below the
    /// base instead of replacing its last segment.
    ///
    /// # Errors
    ///
    /// - `ApiError::Url` if the base URL does not parse
    pub fn new(config: &TransportConfig) -> Result<Self, ApiError> {
        let mut text = config.base_url.trim().to_string();
        if !text.ends_with('/') {
            text.push('/');
        }
        let base_url =
            Url::parse(&text).map_err(|e| ApiError::Url { url: text.clone(), message: e.to_string() })?;

        Ok(Self { client: reqwest::Client::new(), base_url })
    }

    /// Normalized base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL of an endpoint.
    ///
    /// # Errors
    ///
    /// - `ApiError::Url` if the path cannot be joined onto the base
    pub fn url_for(&self, endpoint: &Endpoint) -> Result<Url, ApiError> {
        let path = endpoint.path();
        self.base_url.join(&path).map_err(|e| ApiError::Url { url: path, message: e.to_string() })
    }

    /// Perform a request and decode its response.
    ///
    /// # Errors
    ///
    /// - `ApiError::Url` if the endpoint URL is invalid
    /// - `ApiError::File` if an upload file cannot be read
    /// - `ApiError::Transport` if the request cannot be sent or read
    /// - `ApiError::Status` on a non-2xx response
    /// - `ApiError::Decode` if the body has an unexpected shape
    pub async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = self.url_for(&request.endpoint())?;
        tracing::debug!(method = %request.method(), %url, "dispatching request");

        let builder = match request {
            ApiRequest::ListRooms | ApiRequest::LoadHistory { .. } | ApiRequest::ListDocuments => {
                self.client.get(url.clone())
            },
            ApiRequest::CreateRoom { name } => {
                self.client.post(url.clone()).json(&RoomName { name: name.clone() })
            },
            ApiRequest::RenameRoom { name, .. } => {
                self.client.put(url.clone()).json(&RoomName { name: name.clone() })
            },
            ApiRequest::DeleteRoom { .. } | ApiRequest::DeleteDocument { .. } => {
                self.client.delete(url.clone())
            },
            ApiRequest::SubmitQuery { room_id, query } => self
                .client
                .post(url.clone())
                .json(&ChatQuery { query: query.clone(), room: room_id.clone() }),
            ApiRequest::EditQuery { query, .. } => {
                self.client.put(url.clone()).json(&QueryEdit { query: query.clone() })
            },
            ApiRequest::UploadDocument { form } => {
                self.client.post(url.clone()).multipart(multipart_form(form).await?)
            },
            ApiRequest::UpdateDocument { form, .. } => {
                self.client.put(url.clone()).multipart(multipart_form(form).await?)
            },
        };

        let response = builder.send().await.map_err(|e| transport_error(&url, &e))?;
        let status = response.status();
        let body = response.bytes().await.map_err(|e| transport_error(&url, &e))?;

        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        request
            .decode_response(&body)
            .map_err(|e| ApiError::Decode { url: url.to_string(), message: e.to_string() })
    }
}

/// Build the multipart body of a document upload or update.
async fn multipart_form(form: &DocumentForm) -> Result<Form, ApiError> {
    let multipart = Form::new().text("title", form.title.clone());

    match &form.source {
        Some(DocumentSource::File(path)) => {
            let bytes = tokio::fs::read(path).await.map_err(|e| ApiError::File {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            let file_name = path
                .file_name()
                .map_or_else(|| "upload".to_string(), |name| name.to_string_lossy().into_owned());
            Ok(multipart.part("file", Part::bytes(bytes).file_name(file_name)))
        },
        Some(DocumentSource::Link(link)) => Ok(multipart.text("link", link.clone())),
        None => Ok(multipart),
    }
}

fn transport_error(url: &Url, error: &reqwest::Error) -> ApiError {
    ApiError::Transport { url: url.to_string(), message: error.to_string() }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chatmate_proto::{DocumentId, RoomId};

    use super::*;

    fn transport(base_url: &str) -> HttpTransport {
        HttpTransport::new(&TransportConfig { base_url: base_url.into() }).unwrap()
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let transport = transport("http://localhost:8000/api/chatmate/api");
        assert_eq!(transport.base_url().as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn endpoints_join_below_the_base_path() {
        let transport = transport(DEFAULT_BASE_URL);

        let url = transport.url_for(&Endpoint::RoomQueries(RoomId::from(4))).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/chatmate/api/query/4/get_queries_by_room_id/"
        );

        let url = transport.url_for(&Endpoint::UpdateDocument(DocumentId(2))).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/chatmate/api/document/2/update_document/");
    }

    #[test]
    fn unparsable_base_url_is_rejected() {
        let err = HttpTransport::new(&TransportConfig { base_url: "not a url".into() }).unwrap_err();
        assert!(matches!(err, ApiError::Url { .. }));
    }
}
