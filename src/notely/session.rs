//! # Notes Session
//!
//! Wires the query controller, debounced search input, cached fetch layer,
//! note form and toaster into one event-driven state machine.
//!
//! The session performs no I/O. Every input returns the [`Effect`]s the
//! driver must carry out; their outcomes come back through
//! [`NotesSession::resolve_fetch`] and [`NotesSession::resolve_create`].
//! This keeps all state on the UI thread and makes every scenario testable
//! without a runtime.

use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::commands::CmdMessage;
use crate::controller::QueryController;
use crate::debounce::{SearchInput, DEFAULT_DEBOUNCE};
use crate::error::Result;
use crate::form::NoteForm;
use crate::model::{NewNoteDraft, Note, NotesPage};
use crate::query::{FetchTicket, NotesQuery};
use crate::toast::{Toaster, DEFAULT_TOAST_TTL};

/// Work the driver must perform for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch(FetchTicket),
    Create(NewNoteDraft),
}

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub debounce: Duration,
    pub toast_ttl: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            toast_ttl: DEFAULT_TOAST_TTL,
        }
    }
}

#[derive(Debug)]
pub struct NotesSession {
    controller: QueryController,
    search: SearchInput,
    query: NotesQuery,
    form: NoteForm,
    toaster: Toaster,
}

impl Default for NotesSession {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

impl NotesSession {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            controller: QueryController::new(),
            search: SearchInput::new(options.debounce),
            query: NotesQuery::new(),
            form: NoteForm::new(),
            toaster: Toaster::new(options.toast_ttl),
        }
    }

    /// Issues the initial request for the default key.
    pub fn start(&mut self) -> Vec<Effect> {
        self.refresh()
    }

    pub fn controller(&self) -> &QueryController {
        &self.controller
    }

    pub fn query(&self) -> &NotesQuery {
        &self.query
    }

    pub fn search_input(&self) -> &SearchInput {
        &self.search
    }

    /// Raw edits to the search box. Nothing is fetched until the debounce
    /// window closes in [`NotesSession::tick`].
    pub fn search_input_mut(&mut self) -> &mut SearchInput {
        &mut self.search
    }

    pub fn form(&self) -> &NoteForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut NoteForm {
        &mut self.form
    }

    pub fn toaster(&self) -> &Toaster {
        &self.toaster
    }

    /// Earliest moment the session needs [`NotesSession::tick`] to run.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.search.deadline()
    }

    /// Commits a settled search edit and expires toasts.
    pub fn tick(&mut self, now: Instant) -> Vec<Effect> {
        self.toaster.prune(now);
        match self.search.poll(now) {
            Some(text) => {
                debug!(search = %text, "search settled");
                self.controller.set_search(text);
                self.refresh()
            }
            None => Vec::new(),
        }
    }

    /// Page count of the notes on screen, if any are.
    pub fn total_pages(&self) -> u32 {
        self.query.data().map(|p| p.total_pages).unwrap_or(0)
    }

    /// Pagination controls are shown only for a successful multi-page result.
    pub fn has_pagination(&self) -> bool {
        self.query.is_success() && self.total_pages() > 1
    }

    /// Moves to page `n` as-is; bounds are the caller's concern.
    pub fn set_page(&mut self, n: u32) -> Vec<Effect> {
        if n == self.controller.page() {
            return Vec::new();
        }
        self.controller.set_page(n);
        self.refresh()
    }

    /// Jumps to page `n` as the pager would: only while pagination is shown
    /// and only to a page that exists.
    pub fn go_to_page(&mut self, n: u32) -> Vec<Effect> {
        if !self.has_pagination() || n == 0 || n > self.total_pages() {
            return Vec::new();
        }
        self.set_page(n)
    }

    pub fn next_page(&mut self) -> Vec<Effect> {
        let page = self.controller.page();
        self.go_to_page(page + 1)
    }

    pub fn prev_page(&mut self) -> Vec<Effect> {
        let page = self.controller.page();
        self.go_to_page(page.saturating_sub(1))
    }

    pub fn last_page(&mut self) -> Vec<Effect> {
        let total = self.total_pages();
        self.go_to_page(total)
    }

    pub fn open_modal(&mut self) {
        self.controller.open_modal();
    }

    /// Closes the modal and discards the draft. A submission in flight keeps
    /// the modal open.
    pub fn close_modal(&mut self) {
        if self.form.is_submitting() {
            return;
        }
        self.controller.close_modal();
        self.form.reset();
    }

    pub fn is_modal_open(&self) -> bool {
        self.controller.is_modal_open()
    }

    pub fn submit_form(&mut self) -> Vec<Effect> {
        if !self.controller.is_modal_open() {
            return Vec::new();
        }
        match self.form.submit() {
            Ok(Some(draft)) => vec![Effect::Create(draft)],
            Ok(None) => Vec::new(),
            Err(err) => {
                debug!(%err, "note form rejected");
                Vec::new()
            }
        }
    }

    /// Feeds back the outcome of an [`Effect::Fetch`]. Returns whether the
    /// display changed.
    pub fn resolve_fetch(&mut self, ticket: &FetchTicket, result: Result<NotesPage>) -> bool {
        let result = result.map_err(|err| {
            warn!(key = %ticket.key, %err, "fetch failed");
            err.to_string()
        });
        self.query.resolve(ticket, result)
    }

    /// Feeds back the outcome of an [`Effect::Create`].
    pub fn resolve_create(&mut self, result: Result<Note>, now: Instant) -> Vec<Effect> {
        self.form.finish();
        match result {
            Ok(note) => {
                self.toaster
                    .push(CmdMessage::success(format!("Note created: {}", note.title)), now);
                self.controller.close_modal();
                self.form.reset();
                self.query.invalidate().map(Effect::Fetch).into_iter().collect()
            }
            Err(err) => {
                warn!(%err, "create failed");
                self.toaster
                    .push(CmdMessage::error(format!("Could not create note: {}", err)), now);
                Vec::new()
            }
        }
    }

    pub fn notify(&mut self, message: CmdMessage, now: Instant) {
        self.toaster.push(message, now);
    }

    /// Tears the session down; no pending search edit fires afterwards.
    pub fn dispose(&mut self) {
        self.search.dispose();
    }

    fn refresh(&mut self) -> Vec<Effect> {
        let key = self.controller.current_key();
        self.query.request(key).map(Effect::Fetch).into_iter().collect()
    }
}
