//! # Debounced search input
//!
//! [`Debouncer`] is an explicit timer state machine: every edit (re)starts a
//! quiescence timer, and only when [`Debouncer::poll`] observes the deadline
//! has passed is the latest value committed. Time is passed in by the caller,
//! so the event loop decides when to wake up (see [`Debouncer::deadline`]) and
//! tests can drive it without sleeping.
//!
//! [`SearchInput`] is the text buffer behind the search box; every change to
//! it is fed into its debouncer.

use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
struct Pending {
    value: String,
    deadline: Instant,
}

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<Pending>,
    disposed: bool,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            disposed: false,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Records a new value and restarts the timer. Ignored after disposal.
    pub fn edit(&mut self, value: impl Into<String>, now: Instant) {
        if self.disposed {
            return;
        }
        self.pending = Some(Pending {
            value: value.into(),
            deadline: now + self.delay,
        });
    }

    /// Returns the pending value once its quiet period has fully elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some(pending) if now >= pending.deadline => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drops anything pending without firing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Cancels the pending value and stops accepting edits for good.
    pub fn dispose(&mut self) {
        self.pending = None;
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

/// Text buffer and cursor for the search box.
#[derive(Debug, Default)]
pub struct SearchInput {
    text: String,
    /// Cursor position in chars, not bytes.
    cursor: usize,
    debouncer: Debouncer,
}

impl SearchInput {
    pub fn new(delay: Duration) -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            debouncer: Debouncer::new(delay),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert(&mut self, c: char, now: Instant) {
        let at = self.byte_offset(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
        self.changed(now);
    }

    pub fn backspace(&mut self, now: Instant) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_offset(self.cursor);
        self.text.remove(at);
        self.changed(now);
    }

    pub fn delete(&mut self, now: Instant) {
        if self.cursor >= self.text.chars().count() {
            return;
        }
        let at = self.byte_offset(self.cursor);
        self.text.remove(at);
        self.changed(now);
    }

    pub fn clear(&mut self, now: Instant) {
        if self.text.is_empty() {
            return;
        }
        self.text.clear();
        self.cursor = 0;
        self.changed(now);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.text.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    pub fn poll(&mut self, now: Instant) -> Option<String> {
        self.debouncer.poll(now)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    pub fn dispose(&mut self) {
        self.debouncer.dispose();
    }

    fn changed(&mut self, now: Instant) {
        self.debouncer.edit(self.text.clone(), now);
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }
}
