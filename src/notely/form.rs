//! State behind the create-note modal.

use crate::error::Result;
use crate::model::{NewNoteDraft, NoteTag};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Title,
    Content,
    Tag,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Title => FormField::Content,
            FormField::Content => FormField::Tag,
            FormField::Tag => FormField::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormField::Title => FormField::Tag,
            FormField::Content => FormField::Title,
            FormField::Tag => FormField::Content,
        }
    }
}

#[derive(Debug, Default)]
pub struct NoteForm {
    pub title: String,
    pub content: String,
    pub tag: NoteTag,
    pub focus: FormField,
    /// Validation message from the last submit attempt.
    pub error: Option<String>,
    submitting: bool,
}

impl NoteForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Types into the focused text field. The tag field ignores characters.
    pub fn insert(&mut self, c: char) {
        match self.focus {
            FormField::Title if c != '\n' => self.title.push(c),
            FormField::Content => self.content.push(c),
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            FormField::Title => {
                self.title.pop();
            }
            FormField::Content => {
                self.content.pop();
            }
            FormField::Tag => {}
        }
    }

    pub fn next_tag(&mut self) {
        self.tag = self.tag.next();
    }

    pub fn prev_tag(&mut self) {
        self.tag = self.tag.prev();
    }

    /// Validates the fields into a draft. On success the form is locked
    /// until [`NoteForm::finish`] is called; a second submit while locked
    /// yields `Ok(None)`.
    pub fn submit(&mut self) -> Result<Option<NewNoteDraft>> {
        if self.submitting {
            return Ok(None);
        }
        let draft = NewNoteDraft::new(self.title.clone(), self.content.clone(), self.tag);
        match draft.validate() {
            Ok(valid) => {
                self.error = None;
                self.submitting = true;
                Ok(Some(valid))
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Unlocks the form after the create call returned.
    pub fn finish(&mut self) {
        self.submitting = false;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(form: &mut NoteForm, s: &str) {
        for c in s.chars() {
            form.insert(c);
        }
    }

    #[test]
    fn typing_goes_to_focused_field() {
        let mut form = NoteForm::new();
        type_str(&mut form, "Groceries");
        form.focus_next();
        type_str(&mut form, "milk\neggs");
        form.focus_next();
        type_str(&mut form, "ignored");
        form.next_tag();

        assert_eq!(form.title, "Groceries");
        assert_eq!(form.content, "milk\neggs");
        assert_eq!(form.tag, NoteTag::Work);
        assert_eq!(form.focus, FormField::Tag);
    }

    #[test]
    fn title_rejects_newlines() {
        let mut form = NoteForm::new();
        type_str(&mut form, "a\nb");
        assert_eq!(form.title, "ab");
    }

    #[test]
    fn invalid_submit_records_error() {
        let mut form = NoteForm::new();
        type_str(&mut form, "ab");
        assert!(form.submit().is_err());
        assert!(form.error.as_deref().unwrap().contains("at least"));
        assert!(!form.is_submitting());
    }

    #[test]
    fn submit_locks_until_finished() {
        let mut form = NoteForm::new();
        type_str(&mut form, "Call the plumber");
        form.tag = NoteTag::Personal;
        let draft = form.submit().unwrap().unwrap();
        assert_eq!(draft.tag, NoteTag::Personal);
        assert!(form.submit().unwrap().is_none());

        form.finish();
        assert!(form.submit().unwrap().is_some());
    }

    #[test]
    fn reset_clears_everything() {
        let mut form = NoteForm::new();
        type_str(&mut form, "Something");
        form.focus_prev();
        form.reset();
        assert!(form.title.is_empty());
        assert_eq!(form.focus, FormField::Title);
    }
}
