//! Interactive terminal shell: search box, note list, pagination, the
//! create-note modal and toasts.
//!
//! [`app::App`] owns a [`NotesSession`](crate::session::NotesSession) and runs
//! the event loop on the calling thread. Network calls are spawned onto a
//! tokio runtime and report back over a channel, so all session state stays on
//! the UI thread.

pub mod app;
pub mod ui;

pub use app::{App, BgMessage};

use crate::error::Result;

/// Takes over the terminal, runs `app` until it quits, then restores the
/// terminal even if the loop failed.
pub fn run(app: &mut App) -> Result<()> {
    let mut terminal = ratatui::init();
    let outcome = app.run(&mut terminal);
    ratatui::restore();
    outcome
}
