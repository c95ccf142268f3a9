//! What the shell should draw, derived from a [`NotesSession`].
//!
//! Keeping this separate from the ratatui code lets the display rules be
//! tested without a terminal.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::model::Note;
use crate::query::QueryStatus;
use crate::session::NotesSession;

pub const LOADING_TEXT: &str = "Loading...";
pub const ERROR_TEXT: &str = "Error loading notes";
pub const EMPTY_TEXT: &str = "No notes found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body<'a> {
    Loading,
    Error,
    Empty,
    Notes(&'a [Note]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationView {
    pub total_pages: u32,
    pub current_page: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellView<'a> {
    pub search: &'a str,
    pub body: Body<'a>,
    pub pagination: Option<PaginationView>,
    /// Previous notes are standing in while a new page loads.
    pub revalidating: bool,
    pub modal_open: bool,
}

impl<'a> ShellView<'a> {
    pub fn build(session: &'a NotesSession) -> Self {
        let query = session.query();
        let body = match (query.status(), query.data()) {
            (QueryStatus::Loading, _) => Body::Loading,
            (QueryStatus::Error, _) => Body::Error,
            (QueryStatus::Success, Some(page)) if page.notes.is_empty() => Body::Empty,
            (QueryStatus::Success, Some(page)) => Body::Notes(&page.notes),
            (QueryStatus::Success, None) => Body::Empty,
        };

        let pagination = session.has_pagination().then(|| PaginationView {
            total_pages: session.total_pages(),
            current_page: session.controller().page(),
        });

        Self {
            search: session.search_input().text(),
            body,
            pagination,
            revalidating: query.is_placeholder(),
            modal_open: session.is_modal_open(),
        }
    }
}

/// Page labels for the pagination bar: always the first and last page, a
/// window around the current one, and `None` for each gap.
pub fn page_items(view: PaginationView, window: u32) -> Vec<Option<u32>> {
    let total = view.total_pages;
    let current = view.current_page.clamp(1, total.max(1));
    let lo = current.saturating_sub(window).max(1);
    let hi = (current + window).min(total);

    let mut items = Vec::new();
    if lo > 1 {
        items.push(Some(1));
        if lo > 2 {
            items.push(None);
        }
    }
    items.extend((lo..=hi).map(Some));
    if hi < total {
        if hi + 1 < total {
            items.push(None);
        }
        items.push(Some(total));
    }
    items
}

/// Cuts `s` to at most `width` display columns, marking the cut with an
/// ellipsis.
pub fn truncate(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('\u{2026}');
    out
}
