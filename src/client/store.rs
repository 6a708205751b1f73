/**
 * Note Store
 *
 * `NoteStore` is the persistence seam of a `NoteSession`: list, create,
 * update and delete notes. The store owns note content; the collaboration
 * server only relays edits.
 *
 * `HttpNoteStore` talks to the REST API:
 * - `GET    /api/notes`       -> `[Note]`
 * - `POST   /api/notes`       -> `{msg, note}`
 * - `PUT    /api/notes/{id}`  -> `{msg, note}`
 * - `DELETE /api/notes/{id}`  -> `{msg}`
 *
 * Errors come back as `{msg}` with 401/403/404/5xx statuses.
 */

use crate::client::config::ClientConfig;
use crate::client::error::StoreError;
use crate::shared::{Note, NoteId, NoteUpdate};
use reqwest::{Client, IntoUrl, Method, RequestBuilder, Response};
use serde::Deserialize;
use std::future::Future;
use url::Url;

pub trait NoteStore: Send + Sync + 'static {
    fn list_notes(&self) -> impl Future<Output = Result<Vec<Note>, StoreError>> + Send;

    fn create_note(
        &self,
        title: &str,
        content: &str,
    ) -> impl Future<Output = Result<Note, StoreError>> + Send;

    /// Save title and content. `Ok(None)` means the store accepted the
    /// update without echoing the stored note back.
    fn update_note(
        &self,
        id: &NoteId,
        update: &NoteUpdate,
    ) -> impl Future<Output = Result<Option<Note>, StoreError>> + Send;

    fn delete_note(&self, id: &NoteId) -> impl Future<Output = Result<(), StoreError>> + Send;
}

#[derive(Debug, Deserialize)]
struct NoteEnvelope {
    #[serde(default)]
    note: Option<Note>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    msg: String,
}

/// REST client for the notes API
#[derive(Debug, Clone)]
pub struct HttpNoteStore {
    config: ClientConfig,
    client: Client,
}

impl HttpNoteStore {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn request(&self, method: Method, url: impl IntoUrl) -> RequestBuilder {
        let request = self.client.request(method, url);
        match self.config.get_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check(response: Response, note_id: Option<&NoteId>) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| e.msg)
            .unwrap_or_else(|_| {
                if body.is_empty() {
                    status.to_string()
                } else {
                    body
                }
            });
        tracing::warn!("[Store] Request failed with {}: {}", status, message);
        Err(StoreError::from_status(status.as_u16(), message, note_id))
    }

    /// `/api/notes/{id}` with the id as a single percent-encoded segment
    fn note_url(&self, id: &NoteId) -> Result<Url, StoreError> {
        let base = self.config.api_url("/api/notes");
        let mut url = Url::parse(&base).map_err(|e| StoreError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidUrl(base.clone()))?
            .push(id.as_str());
        Ok(url)
    }
}

impl NoteStore for HttpNoteStore {
    async fn list_notes(&self) -> Result<Vec<Note>, StoreError> {
        let response = self.request(Method::GET, self.config.api_url("/api/notes")).send().await?;
        let notes: Vec<Note> = Self::check(response, None).await?.json().await?;
        tracing::debug!("[Store] Fetched {} notes", notes.len());
        Ok(notes)
    }

    async fn create_note(&self, title: &str, content: &str) -> Result<Note, StoreError> {
        let response = self
            .request(Method::POST, self.config.api_url("/api/notes"))
            .json(&serde_json::json!({ "title": title, "content": content }))
            .send()
            .await?;
        let envelope: NoteEnvelope = Self::check(response, None).await?.json().await?;
        envelope
            .note
            .ok_or_else(|| StoreError::InvalidResponse("created note missing from response".to_string()))
    }

    async fn update_note(&self, id: &NoteId, update: &NoteUpdate) -> Result<Option<Note>, StoreError> {
        let response = self
            .request(Method::PUT, self.note_url(id)?)
            .json(update)
            .send()
            .await?;
        let envelope: NoteEnvelope = Self::check(response, Some(id)).await?.json().await?;
        Ok(envelope.note)
    }

    async fn delete_note(&self, id: &NoteId) -> Result<(), StoreError> {
        let response = self
            .request(Method::DELETE, self.note_url(id)?)
            .send()
            .await?;
        Self::check(response, Some(id)).await?;
        Ok(())
    }
}
