use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::SearchParams;
use crate::service::NotesService;

pub async fn run<S: NotesService + ?Sized>(service: &S, params: SearchParams) -> Result<CmdResult> {
    let page = service.fetch_notes(&params).await?;

    let mut result = CmdResult::default();
    if page.total_pages > 0 && params.page > page.total_pages {
        result.add_message(CmdMessage::warning(format!(
            "Page {} is past the last page ({})",
            params.page, page.total_pages
        )));
    }
    Ok(result.with_listed(params, page))
}
