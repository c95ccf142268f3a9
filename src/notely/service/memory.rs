use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use super::NotesService;
use crate::error::{NotelyError, Result};
use crate::model::{NewNoteDraft, Note, NoteTag, NotesPage, SearchParams};

pub const DEFAULT_PER_PAGE: u32 = 12;

#[derive(Debug, Default)]
struct Inner {
    /// Newest first.
    notes: Vec<Note>,
    fail_fetches: bool,
    fail_creates: bool,
}

/// In-process notes service for tests and offline use.
/// Does NOT persist data.
#[derive(Debug)]
pub struct InMemoryNotesService {
    per_page: u32,
    inner: Mutex<Inner>,
    fetch_count: AtomicUsize,
    create_count: AtomicUsize,
}

impl Default for InMemoryNotesService {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryNotesService {
    pub fn new() -> Self {
        Self::with_per_page(DEFAULT_PER_PAGE)
    }

    pub fn with_per_page(per_page: u32) -> Self {
        Self {
            per_page: per_page.max(1),
            inner: Mutex::new(Inner::default()),
            fetch_count: AtomicUsize::new(0),
            create_count: AtomicUsize::new(0),
        }
    }

    /// A handful of notes covering every tag, for `--offline` sessions.
    pub fn demo() -> Self {
        let service = Self::with_per_page(4);
        let samples = [
            ("Weekly planning", "Review the sprint board and pick goals", NoteTag::Meeting),
            ("Buy groceries", "Milk, eggs, bread, coffee", NoteTag::Shopping),
            ("Fix login bug", "Session token expires too early", NoteTag::Work),
            ("Call mom", "Sunday afternoon", NoteTag::Personal),
            ("Read chapter 4", "Ownership and borrowing", NoteTag::Todo),
            ("Design review meeting", "Bring the dashboard mockups", NoteTag::Meeting),
            ("Renew passport", "Check the photo requirements", NoteTag::Personal),
            ("Quarterly report", "Numbers due Friday", NoteTag::Work),
            ("Hardware store", "Screws, wall plugs, sandpaper", NoteTag::Shopping),
            ("Retro meeting notes", "What went well, what to change", NoteTag::Meeting),
        ];
        for (title, content, tag) in samples {
            service.insert(NewNoteDraft::new(title, content, tag));
        }
        service
    }

    /// Adds a note directly, bypassing request counting and failure injection.
    pub fn insert(&self, draft: NewNoteDraft) -> Note {
        let mut inner = self.lock();
        let offset = ChronoDuration::seconds(inner.notes.len() as i64);
        let now = Utc::now() + offset;
        let note = Note {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            content: draft.content,
            tag: draft.tag,
            created_at: Some(now),
            updated_at: Some(now),
        };
        inner.notes.insert(0, note.clone());
        note
    }

    pub fn set_fail_fetches(&self, fail: bool) {
        self.lock().fail_fetches = fail;
    }

    pub fn set_fail_creates(&self, fail: bool) {
        self.lock().fail_creates = fail;
    }

    /// Number of `fetch_notes` calls received so far.
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    pub fn create_count(&self) -> usize {
        self.create_count.load(Ordering::SeqCst)
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock only means a test panicked mid-call; the data is still usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn page_of(&self, notes: &[Note], params: &SearchParams) -> NotesPage {
        let needle = params.search.trim().to_lowercase();
        let matching: Vec<&Note> = notes
            .iter()
            .filter(|n| {
                needle.is_empty()
                    || n.title.to_lowercase().contains(&needle)
                    || n.content.to_lowercase().contains(&needle)
            })
            .collect();

        let per_page = self.per_page as usize;
        let total_pages = matching.len().div_ceil(per_page) as u32;
        let start = (params.page.max(1) as usize - 1) * per_page;
        let notes = matching
            .into_iter()
            .skip(start)
            .take(per_page)
            .cloned()
            .collect();

        NotesPage::new(notes, total_pages)
    }
}

#[async_trait]
impl NotesService for InMemoryNotesService {
    async fn fetch_notes(&self, params: &SearchParams) -> Result<NotesPage> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        let inner = self.lock();
        if inner.fail_fetches {
            return Err(NotelyError::Http {
                status: 500,
                message: "fetch failed".into(),
            });
        }
        Ok(self.page_of(&inner.notes, params))
    }

    async fn create_note(&self, draft: &NewNoteDraft) -> Result<Note> {
        self.create_count.fetch_add(1, Ordering::SeqCst);
        if self.lock().fail_creates {
            return Err(NotelyError::Http {
                status: 500,
                message: "create failed".into(),
            });
        }
        let draft = draft.validate()?;
        Ok(self.insert(draft))
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    pub struct ServiceFixture {
        pub service: InMemoryNotesService,
    }

    impl ServiceFixture {
        pub fn new(per_page: u32) -> Self {
            Self {
                service: InMemoryNotesService::with_per_page(per_page),
            }
        }

        pub fn with_notes(self, count: usize, tag: NoteTag) -> Self {
            for i in 0..count {
                self.service.insert(NewNoteDraft::new(
                    format!("Test note {}", i + 1),
                    format!("Content for note {}", i + 1),
                    tag,
                ));
            }
            self
        }

        pub fn with_note(self, title: &str, content: &str, tag: NoteTag) -> Self {
            self.service.insert(NewNoteDraft::new(title, content, tag));
            self
        }
    }
}
