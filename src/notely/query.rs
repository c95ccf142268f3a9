//! # Cached Fetch Layer
//!
//! [`NotesQuery`] decides, for each requested [`QueryKey`], whether the
//! answer is already in the [`QueryCache`] or a network call is needed. It
//! never performs I/O itself: a cache miss hands back a [`FetchTicket`] that the
//! driver runs, and the outcome comes back through [`NotesQuery::resolve`].
//!
//! ## Display policy
//!
//! - First request ever (or after an error): `Loading`, nothing shown.
//! - Later misses: the last successful page stays on screen while the new key
//!   is fetched (`is_placeholder()`), status stays `Success`.
//! - Failure of the latest key: `Error`, the notes are cleared.
//!
//! ## Ordering
//!
//! Only the most recently requested key may change what is displayed. A
//! response that arrives for an older key is cached but otherwise ignored.

use std::collections::HashMap;
use tracing::debug;

use crate::model::{NotesPage, QueryKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Loading,
    Success,
    Error,
}

/// Explicitly owned page cache. Unbounded; lives as long as the session.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<QueryKey, NotesPage>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &QueryKey) -> Option<&NotesPage> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: QueryKey, page: NotesPage) {
        self.entries.insert(key, page);
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// A fetch the driver must perform on behalf of [`NotesQuery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub id: u64,
    pub key: QueryKey,
}

#[derive(Debug)]
pub struct NotesQuery {
    cache: QueryCache,
    current_key: Option<QueryKey>,
    /// Key whose page is currently on screen.
    displayed: Option<(QueryKey, NotesPage)>,
    in_flight: HashMap<QueryKey, u64>,
    next_ticket: u64,
    status: QueryStatus,
    error: Option<String>,
}

impl Default for NotesQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl NotesQuery {
    pub fn new() -> Self {
        Self {
            cache: QueryCache::new(),
            current_key: None,
            displayed: None,
            in_flight: HashMap::new(),
            next_ticket: 1,
            status: QueryStatus::Loading,
            error: None,
        }
    }

    pub fn status(&self) -> QueryStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn current_key(&self) -> Option<&QueryKey> {
        self.current_key.as_ref()
    }

    /// The page on screen, which may belong to an older key while the
    /// current one is being fetched.
    pub fn data(&self) -> Option<&NotesPage> {
        self.displayed.as_ref().map(|(_, page)| page)
    }

    pub fn displayed_key(&self) -> Option<&QueryKey> {
        self.displayed.as_ref().map(|(key, _)| key)
    }

    /// True while previous data stands in for a key that has not resolved yet.
    pub fn is_placeholder(&self) -> bool {
        match (&self.displayed, &self.current_key) {
            (Some((shown, _)), Some(current)) => shown != current,
            _ => false,
        }
    }

    /// True when the current key has a request on the wire.
    pub fn is_fetching(&self) -> bool {
        self.current_key
            .as_ref()
            .is_some_and(|key| self.in_flight.contains_key(key))
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Makes `key` the current key. Returns a ticket when the network must
    /// be asked, `None` on a cache hit or when the key is already in flight.
    pub fn request(&mut self, key: QueryKey) -> Option<FetchTicket> {
        self.current_key = Some(key.clone());

        if let Some(page) = self.cache.get(&key) {
            debug!(%key, "cache hit");
            self.displayed = Some((key, page.clone()));
            self.status = QueryStatus::Success;
            self.error = None;
            return None;
        }

        if self.status != QueryStatus::Success || self.displayed.is_none() {
            self.status = QueryStatus::Loading;
            self.displayed = None;
            self.error = None;
        }

        if self.in_flight.contains_key(&key) {
            debug!(%key, "already in flight");
            return None;
        }

        let ticket = self.issue(key);
        debug!(key = %ticket.key, id = ticket.id, "cache miss, fetching");
        Some(ticket)
    }

    /// Applies the outcome of a fetch. Returns whether the display changed.
    pub fn resolve(
        &mut self,
        ticket: &FetchTicket,
        result: std::result::Result<NotesPage, String>,
    ) -> bool {
        if self.in_flight.get(&ticket.key) != Some(&ticket.id) {
            debug!(key = %ticket.key, id = ticket.id, "dropping unknown ticket");
            return false;
        }
        self.in_flight.remove(&ticket.key);

        let is_current = self.current_key.as_ref() == Some(&ticket.key);

        match result {
            Ok(page) => {
                self.cache.insert(ticket.key.clone(), page.clone());
                if !is_current {
                    debug!(key = %ticket.key, "cached superseded response");
                    return false;
                }
                self.displayed = Some((ticket.key.clone(), page));
                self.status = QueryStatus::Success;
                self.error = None;
                true
            }
            Err(message) => {
                if !is_current {
                    debug!(key = %ticket.key, %message, "ignoring superseded failure");
                    return false;
                }
                self.displayed = None;
                self.status = QueryStatus::Error;
                self.error = Some(message);
                true
            }
        }
    }

    /// Forgets every cached page and pending ticket, then refetches the
    /// current key. Whatever is on screen stays there until the refetch lands.
    pub fn invalidate(&mut self) -> Option<FetchTicket> {
        debug!(entries = self.cache.len(), "invalidating notes cache");
        self.cache.clear();
        self.in_flight.clear();
        let key = self.current_key.clone()?;
        if self.status == QueryStatus::Error {
            self.status = QueryStatus::Loading;
            self.error = None;
        }
        Some(self.issue(key))
    }

    fn issue(&mut self, key: QueryKey) -> FetchTicket {
        let id = self.next_ticket;
        self.next_ticket += 1;
        self.in_flight.insert(key.clone(), id);
        FetchTicket { id, key }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Note, NoteTag};

    fn note(id: &str) -> Note {
        Note {
            id: id.to_string(),
            title: format!("Note {}", id),
            content: String::new(),
            tag: NoteTag::Todo,
            created_at: None,
            updated_at: None,
        }
    }

    fn page(ids: &[&str], total: u32) -> NotesPage {
        NotesPage::new(ids.iter().map(|id| note(id)).collect(), total)
    }

    #[test]
    fn first_request_is_loading_without_data() {
        let mut query = NotesQuery::new();
        let ticket = query.request(QueryKey::new("", 1)).unwrap();
        assert_eq!(ticket.key, QueryKey::new("", 1));
        assert!(query.is_loading());
        assert!(query.data().is_none());
        assert!(query.is_fetching());
    }

    #[test]
    fn success_is_displayed_and_cached() {
        let mut query = NotesQuery::new();
        let key = QueryKey::new("", 1);
        let ticket = query.request(key.clone()).unwrap();
        assert!(query.resolve(&ticket, Ok(page(&["a"], 1))));
        assert!(query.is_success());
        assert_eq!(query.data().unwrap().notes.len(), 1);
        assert!(query.cache().contains(&key));
        assert!(!query.is_fetching());
    }

    #[test]
    fn cache_hit_issues_no_ticket() {
        let mut query = NotesQuery::new();
        let a = QueryKey::new("", 1);
        let b = QueryKey::new("", 2);
        let t = query.request(a.clone()).unwrap();
        query.resolve(&t, Ok(page(&["a"], 2)));
        let t = query.request(b.clone()).unwrap();
        query.resolve(&t, Ok(page(&["b"], 2)));

        assert!(query.request(a.clone()).is_none());
        assert_eq!(query.data().unwrap().notes[0].id, "a");
        assert!(!query.is_placeholder());
    }

    #[test]
    fn previous_data_kept_while_new_key_in_flight() {
        let mut query = NotesQuery::new();
        let t = query.request(QueryKey::new("", 1)).unwrap();
        query.resolve(&t, Ok(page(&["a1", "a2"], 2)));

        let _t2 = query.request(QueryKey::new("", 2)).unwrap();
        assert!(query.is_success());
        assert!(query.is_placeholder());
        assert_eq!(query.data().unwrap().notes[0].id, "a1");
        assert_eq!(query.displayed_key(), Some(&QueryKey::new("", 1)));
    }

    #[test]
    fn failure_replaces_previous_notes() {
        let mut query = NotesQuery::new();
        let t = query.request(QueryKey::new("", 1)).unwrap();
        query.resolve(&t, Ok(page(&["a"], 2)));
        let t2 = query.request(QueryKey::new("", 2)).unwrap();

        assert!(query.resolve(&t2, Err("boom".into())));
        assert!(query.is_error());
        assert!(query.data().is_none());
        assert_eq!(query.error(), Some("boom"));
    }

    #[test]
    fn novel_key_after_error_goes_back_to_loading() {
        let mut query = NotesQuery::new();
        let t = query.request(QueryKey::new("", 1)).unwrap();
        query.resolve(&t, Err("down".into()));
        assert!(query.is_error());

        query.request(QueryKey::new("x", 1)).unwrap();
        assert!(query.is_loading());
        assert!(query.error().is_none());
    }

    #[test]
    fn late_response_for_stale_key_is_cached_not_shown() {
        let mut query = NotesQuery::new();
        let a = QueryKey::new("a", 1);
        let b = QueryKey::new("b", 1);
        let ta = query.request(a.clone()).unwrap();
        let tb = query.request(b.clone()).unwrap();

        assert!(query.resolve(&tb, Ok(page(&["b"], 1))));
        assert!(!query.resolve(&ta, Ok(page(&["a"], 1))));

        assert_eq!(query.data().unwrap().notes[0].id, "b");
        assert!(query.cache().contains(&a));
    }

    #[test]
    fn stale_failure_is_ignored() {
        let mut query = NotesQuery::new();
        let ta = query.request(QueryKey::new("a", 1)).unwrap();
        let tb = query.request(QueryKey::new("b", 1)).unwrap();
        assert!(!query.resolve(&ta, Err("late".into())));
        assert!(query.is_loading());
        query.resolve(&tb, Ok(page(&["b"], 1)));
        assert!(query.is_success());
    }

    #[test]
    fn returning_to_in_flight_key_reuses_ticket() {
        let mut query = NotesQuery::new();
        let a = QueryKey::new("a", 1);
        let ta = query.request(a.clone()).unwrap();
        query.request(QueryKey::new("b", 1)).unwrap();
        assert!(query.request(a.clone()).is_none());

        assert!(query.resolve(&ta, Ok(page(&["a"], 1))));
        assert_eq!(query.displayed_key(), Some(&a));
    }

    #[test]
    fn invalidate_refetches_current_key_and_keeps_data() {
        let mut query = NotesQuery::new();
        let key = QueryKey::new("", 1);
        let t = query.request(key.clone()).unwrap();
        query.resolve(&t, Ok(page(&["a"], 1)));

        let refetch = query.invalidate().unwrap();
        assert_eq!(refetch.key, key);
        assert!(query.cache().is_empty());
        assert!(query.is_success());
        assert_eq!(query.data().unwrap().notes[0].id, "a");

        assert!(query.resolve(&refetch, Ok(page(&["new", "a"], 1))));
        assert_eq!(query.data().unwrap().notes.len(), 2);
    }

    #[test]
    fn tickets_from_before_invalidation_are_dropped() {
        let mut query = NotesQuery::new();
        let t_old = query.request(QueryKey::new("", 1)).unwrap();
        let t_new = query.invalidate().unwrap();
        assert_ne!(t_old.id, t_new.id);
        assert!(!query.resolve(&t_old, Ok(page(&["old"], 1))));
        assert!(query.resolve(&t_new, Ok(page(&["new"], 1))));
        assert_eq!(query.data().unwrap().notes[0].id, "new");
    }

    #[test]
    fn invalidate_without_key_does_nothing() {
        let mut query = NotesQuery::new();
        assert!(query.invalidate().is_none());
    }
}
