//! # Remote Notes Service
//!
//! The notes themselves live on a remote service; this module defines the
//! [`NotesService`] trait the rest of the crate talks to, and its
//! implementations.
//!
//! ## Implementations
//!
//! - [`http::HttpNotesService`]: production client over HTTP/JSON
//!   - `GET {base}/notes?search=&page=&perPage=` returns `{notes, totalPages}`
//!   - `POST {base}/notes` with a draft returns the persisted note
//!   - Bearer-token auth, per-request timeout, retries per [`RetryPolicy`]
//!
//! - [`memory::InMemoryNotesService`]: in-process service for tests and the
//!   `--offline` mode
//!   - Substring search over title and content, newest first
//!   - Counts requests and can be told to fail
//!
//! The trait is object safe so the terminal driver can hold an
//! `Arc<dyn NotesService>` and hand clones to background tasks.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{NewNoteDraft, Note, NotesPage, SearchParams};

pub mod http;
pub mod memory;
pub mod retry;

pub use http::HttpNotesService;
pub use memory::InMemoryNotesService;
pub use retry::RetryPolicy;

#[async_trait]
pub trait NotesService: Send + Sync {
    /// Fetch one page of notes matching `params.search`.
    async fn fetch_notes(&self, params: &SearchParams) -> Result<NotesPage>;

    /// Persist a new note and return it as stored.
    async fn create_note(&self, draft: &NewNoteDraft) -> Result<Note>;
}
