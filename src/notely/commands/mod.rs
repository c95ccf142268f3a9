//! # Command Layer
//!
//! One module per operation. Commands take plain Rust arguments, talk to a
//! [`NotesService`](crate::service::NotesService) and return a [`CmdResult`];
//! they never print.

use crate::config::NotelyConfig;
use crate::model::{Note, NotesPage, SearchParams};

pub mod config;
pub mod create;
pub mod list;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// The page that was listed, with the params that produced it.
    pub listed: Option<(SearchParams, NotesPage)>,
    pub created_notes: Vec<Note>,
    pub config: Option<NotelyConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed(mut self, params: SearchParams, page: NotesPage) -> Self {
        self.listed = Some((params, page));
        self
    }

    pub fn with_created_notes(mut self, notes: Vec<Note>) -> Self {
        self.created_notes = notes;
        self
    }

    pub fn with_config(mut self, config: NotelyConfig) -> Self {
        self.config = Some(config);
        self
    }
}
