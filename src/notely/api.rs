//! # API Facade
//!
//! The single entry point for one-shot operations, whatever the UI. It
//! dispatches to `commands/*.rs`, normalizes inputs (tag names into
//! [`NoteTag`], raw page numbers into [`SearchParams`]) and returns
//! `Result<CmdResult>`. No printing, no exit codes.
//!
//! The interactive shell does not go through here for its fetches: it needs
//! the ticketed flow of [`crate::session`]. It does share the same
//! [`NotesService`] handle, available from [`NotesApi::service`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::commands;
use crate::error::Result;
use crate::model::{NewNoteDraft, NoteTag, SearchParams};
use crate::service::NotesService;

pub struct NotesApi {
    service: Arc<dyn NotesService>,
    config_dir: PathBuf,
}

impl NotesApi {
    pub fn new(service: Arc<dyn NotesService>, config_dir: PathBuf) -> Self {
        Self {
            service,
            config_dir,
        }
    }

    pub fn service(&self) -> Arc<dyn NotesService> {
        Arc::clone(&self.service)
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub async fn list_notes(
        &self,
        search: Option<String>,
        page: u32,
    ) -> Result<commands::CmdResult> {
        let params = SearchParams::new(search.unwrap_or_default(), page);
        commands::list::run(self.service.as_ref(), params).await
    }

    pub async fn create_note(
        &self,
        title: String,
        content: String,
        tag: &str,
    ) -> Result<commands::CmdResult> {
        let tag: NoteTag = tag.parse()?;
        commands::create::run(self.service.as_ref(), NewNoteDraft::new(title, content, tag)).await
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.config_dir, action)
    }
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, MessageLevel};
