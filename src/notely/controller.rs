//! # Query Controller
//!
//! Holds the presentation state the fetch layer is keyed on: search text and
//! current page, plus the create-note modal flag. It has no error conditions;
//! everything here is plain state with one derived value, [`QueryController::current_key`].

use crate::model::{QueryKey, SearchParams};

#[derive(Debug, Default)]
pub struct QueryController {
    params: SearchParams,
    modal_open: bool,
}

impl QueryController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn search(&self) -> &str {
        &self.params.search
    }

    pub fn page(&self) -> u32 {
        self.params.page
    }

    /// Replaces the search text. Always returns to the first page.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.params.search = text.into();
        self.params.page = 1;
    }

    /// Moves to page `n`. Staying within the last known page count is up to
    /// the caller; only the `page >= 1` floor is enforced here.
    pub fn set_page(&mut self, n: u32) {
        self.params.page = n.max(1);
    }

    pub fn current_key(&self) -> QueryKey {
        QueryKey::from(&self.params)
    }

    pub fn open_modal(&mut self) {
        self.modal_open = true;
    }

    pub fn close_modal(&mut self) {
        self.modal_open = false;
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }
}
