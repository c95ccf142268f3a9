use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use notely::api::{CmdMessage, MessageLevel};
use notely::config::{NotelyConfig, KEYS};
use notely::model::{Note, NoteTag, NotesPage, SearchParams};
use notely::view::truncate;
use timeago::Formatter;
use unicode_width::UnicodeWidthStr;

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const TAG_WIDTH: usize = 10;

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub fn print_notes(params: &SearchParams, page: &NotesPage) {
    if page.notes.is_empty() {
        println!("No notes found.");
        return;
    }

    for (i, note) in page.notes.iter().enumerate() {
        println!("{}", format_note_line(i + 1, note, Utc::now()));
    }

    if page.total_pages > 1 {
        println!();
        println!("{}", pagination_footer(params, page.total_pages).dimmed());
    }
}

pub fn print_created(notes: &[Note]) {
    for note in notes {
        println!("{} {}", note.id.dimmed(), note.title.bold());
    }
}

pub fn print_config(config: &NotelyConfig) {
    let width = KEYS.iter().map(|k| k.len()).max().unwrap_or(0);
    for key in KEYS {
        let value = config.display_value(key).unwrap_or_default();
        let label = format!("{:width$}", key, width = width);
        println!("{}  {}", label.bold(), value);
    }
}

fn format_note_line(index: usize, note: &Note, now: DateTime<Utc>) -> String {
    let idx_str = format!("{:>3}. ", index);
    let tag_str = format!("{:<width$}", note.tag.as_str(), width = TAG_WIDTH);
    let time_ago = note
        .created_at
        .map(|ts| format_time_ago(ts, now))
        .unwrap_or_else(|| " ".repeat(TIME_WIDTH));

    let content_preview: String = note
        .content
        .chars()
        .take(60)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect();
    let title_content = if content_preview.is_empty() {
        note.title.clone()
    } else {
        format!("{}  {}", note.title, content_preview)
    };

    let fixed_width = idx_str.width() + TAG_WIDTH + TIME_WIDTH + 1;
    let available = LINE_WIDTH.saturating_sub(fixed_width);
    let title_display = truncate(&title_content, available);
    let padding = available.saturating_sub(title_display.width());

    format!(
        "{}{} {}{}{}",
        idx_str.yellow(),
        tag_colored(note.tag, &tag_str),
        title_display,
        " ".repeat(padding),
        time_ago.dimmed()
    )
}

fn tag_colored(tag: NoteTag, text: &str) -> ColoredString {
    match tag {
        NoteTag::Todo => text.yellow(),
        NoteTag::Work => text.blue(),
        NoteTag::Personal => text.magenta(),
        NoteTag::Meeting => text.cyan(),
        NoteTag::Shopping => text.green(),
    }
}

fn pagination_footer(params: &SearchParams, total_pages: u32) -> String {
    let mut footer = format!("Page {} of {}", params.page, total_pages);
    if params.page < total_pages {
        footer.push_str(&format!(" (next: --page {})", params.page + 1));
    }
    footer
}

fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(timestamp);
    let formatter = Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
