use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{NotelyError, Result};

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 50;
pub const CONTENT_MAX_CHARS: usize = 500;

/// The closed set of categories a note can carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteTag {
    #[default]
    Todo,
    Work,
    Personal,
    Meeting,
    Shopping,
}

impl NoteTag {
    pub const ALL: [NoteTag; 5] = [
        NoteTag::Todo,
        NoteTag::Work,
        NoteTag::Personal,
        NoteTag::Meeting,
        NoteTag::Shopping,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NoteTag::Todo => "Todo",
            NoteTag::Work => "Work",
            NoteTag::Personal => "Personal",
            NoteTag::Meeting => "Meeting",
            NoteTag::Shopping => "Shopping",
        }
    }

    /// Next tag in declaration order, wrapping around.
    pub fn next(self) -> Self {
        let pos = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let pos = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(pos + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for NoteTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteTag {
    type Err = NotelyError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        NoteTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| {
                NotelyError::Validation(format!(
                    "Unknown tag '{}' (expected one of: Todo, Work, Personal, Meeting, Shopping)",
                    s
                ))
            })
    }
}

/// A note as returned by the remote service. Never mutated by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub tag: NoteTag,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One page of notes for a given (search, page) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesPage {
    pub notes: Vec<Note>,
    #[serde(rename = "totalPages", default)]
    pub total_pages: u32,
}

impl NotesPage {
    pub fn new(notes: Vec<Note>, total_pages: u32) -> Self {
        Self { notes, total_pages }
    }
}

/// Input for the create-note operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNoteDraft {
    pub title: String,
    pub content: String,
    pub tag: NoteTag,
}

impl NewNoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>, tag: NoteTag) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tag,
        }
    }

    /// Checks the draft against the creation form rules and returns a
    /// trimmed copy ready to be sent.
    pub fn validate(&self) -> Result<NewNoteDraft> {
        let title = self.title.trim();
        let title_len = title.chars().count();
        if title_len == 0 {
            return Err(NotelyError::Validation("Title is required".into()));
        }
        if title_len < TITLE_MIN_CHARS {
            return Err(NotelyError::Validation(format!(
                "Title must be at least {} characters",
                TITLE_MIN_CHARS
            )));
        }
        if title_len > TITLE_MAX_CHARS {
            return Err(NotelyError::Validation(format!(
                "Title must be at most {} characters",
                TITLE_MAX_CHARS
            )));
        }
        if self.content.chars().count() > CONTENT_MAX_CHARS {
            return Err(NotelyError::Validation(format!(
                "Content must be at most {} characters",
                CONTENT_MAX_CHARS
            )));
        }
        Ok(NewNoteDraft {
            title: title.to_string(),
            content: self.content.clone(),
            tag: self.tag,
        })
    }
}

/// Search text plus page number. Page is always at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchParams {
    pub search: String,
    pub page: u32,
}

impl SearchParams {
    pub fn new(search: impl Into<String>, page: u32) -> Self {
        Self {
            search: search.into(),
            page: page.max(1),
        }
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: 1,
        }
    }
}

/// Identifies a requestable page of notes; the cache and fetch key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub search: String,
    pub page: u32,
}

impl QueryKey {
    pub fn new(search: impl Into<String>, page: u32) -> Self {
        Self {
            search: search.into(),
            page,
        }
    }

    pub fn params(&self) -> SearchParams {
        SearchParams::new(self.search.clone(), self.page)
    }
}

impl From<&SearchParams> for QueryKey {
    fn from(params: &SearchParams) -> Self {
        Self {
            search: params.search.clone(),
            page: params.page,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "notes[{:?}, page {}]", self.search, self.page)
    }
}
