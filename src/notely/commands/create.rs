use tracing::info;

use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::NewNoteDraft;
use crate::service::NotesService;

pub async fn run<S: NotesService + ?Sized>(service: &S, draft: NewNoteDraft) -> Result<CmdResult> {
    let draft = draft.validate()?;
    let note = service.create_note(&draft).await?;
    info!(id = %note.id, "created note from command line");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Note created: {} [{}]",
        note.title, note.tag
    )));
    Ok(result.with_created_notes(vec![note]))
}
