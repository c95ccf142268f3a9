use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, info};

use super::{NotesService, RetryPolicy};
use crate::config::NotelyConfig;
use crate::error::{NotelyError, Result};
use crate::model::{NewNoteDraft, Note, NotesPage, SearchParams};

const USER_AGENT: &str = concat!("notely/", env!("CARGO_PKG_VERSION"));
/// Longest slice of an error body kept in [`NotelyError::Http`].
const MAX_ERROR_BODY: usize = 200;

/// Client for the remote notes API.
pub struct HttpNotesService {
    client: Client,
    base_url: String,
    token: Option<String>,
    per_page: u32,
    retry: RetryPolicy,
}

impl HttpNotesService {
    pub fn from_config(config: &NotelyConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            per_page: config.per_page,
            retry: RetryPolicy::default().with_max_retries(config.retries),
        })
    }

    pub fn notes_url(&self) -> String {
        format!("{}/notes", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_page(&self, params: &SearchParams) -> Result<NotesPage> {
        let request = self
            .client
            .get(self.notes_url())
            .query(&query_pairs(params, self.per_page));
        let response = check_status(self.authorize(request).send().await?).await?;
        Ok(response.json::<NotesPage>().await?)
    }

    async fn post_note(&self, draft: &NewNoteDraft) -> Result<Note> {
        let request = self.client.post(self.notes_url()).json(draft);
        let response = check_status(self.authorize(request).send().await?).await?;
        Ok(response.json::<Note>().await?)
    }
}

/// Query string for a page request. An empty search is left out entirely.
pub fn query_pairs(params: &SearchParams, per_page: u32) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::with_capacity(3);
    let search = params.search.trim();
    if !search.is_empty() {
        pairs.push(("search", search.to_string()));
    }
    pairs.push(("page", params.page.max(1).to_string()));
    pairs.push(("perPage", per_page.to_string()));
    pairs
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(NotelyError::Http {
        status: status.as_u16(),
        message: error_message(&body, status.canonical_reason()),
    })
}

fn error_message(body: &str, reason: Option<&str>) -> String {
    #[derive(serde::Deserialize)]
    struct ApiError {
        message: String,
    }

    if let Ok(api) = serde_json::from_str::<ApiError>(body) {
        return api.message;
    }
    let body = body.trim();
    if body.is_empty() {
        return reason.unwrap_or("request failed").to_string();
    }
    body.chars().take(MAX_ERROR_BODY).collect()
}

#[async_trait]
impl NotesService for HttpNotesService {
    async fn fetch_notes(&self, params: &SearchParams) -> Result<NotesPage> {
        debug!(search = %params.search, page = params.page, "GET notes");
        self.retry
            .run("fetch notes", || self.get_page(params))
            .await
    }

    async fn create_note(&self, draft: &NewNoteDraft) -> Result<Note> {
        let note = self
            .retry
            .run("create note", || self.post_note(draft))
            .await?;
        info!(id = %note.id, tag = %note.tag, "note created");
        Ok(note)
    }
}
