use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::commands::MessageLevel;
use crate::form::{FormField, NoteForm};
use crate::model::{Note, NoteTag};
use crate::tui::app::App;
use crate::view::{
    page_items, truncate, Body, PaginationView, ShellView, EMPTY_TEXT, ERROR_TEXT, LOADING_TEXT,
};

const CREATE_LABEL: &str = " Create note + ";
const PAGE_WINDOW: u32 = 2;
const MODAL_WIDTH: u16 = 64;
const MODAL_HEIGHT: u16 = 17;
const CONTENT_ROWS: u16 = 6;
const TOAST_WIDTH: u16 = 48;

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let view = ShellView::build(&app.session);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Toolbar
            Constraint::Min(3),    // Notes
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let search_area = draw_toolbar(frame, &view, chunks[0]);
    draw_body(frame, app, &view, chunks[1]);
    draw_status_bar(frame, app, &view, chunks[2]);

    if view.modal_open {
        draw_modal(frame, app.session.form(), area);
    } else {
        let input = app.session.search_input();
        let prefix: String = input.text().chars().take(input.cursor()).collect();
        let x = search_area.x + 1 + prefix.width() as u16;
        let max_x = search_area.right().saturating_sub(2);
        frame.set_cursor_position(Position::new(x.min(max_x), search_area.y + 1));
    }

    draw_toasts(frame, app, area);
}

/// Search box, pagination and the create hint. Returns the search box area.
fn draw_toolbar(frame: &mut Frame, view: &ShellView, area: Rect) -> Rect {
    let pager_width = view
        .pagination
        .map(|p| pager_spans(p).iter().map(|s| s.width()).sum::<usize>() as u16 + 2)
        .unwrap_or(0);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(20),
            Constraint::Length(pager_width),
            Constraint::Length(CREATE_LABEL.len() as u16 + 2),
        ])
        .split(area);

    let border_style = if view.modal_open {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let search = Paragraph::new(view.search).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Search notes "),
    );
    frame.render_widget(search, chunks[0]);

    if let Some(pagination) = view.pagination {
        let pager = Paragraph::new(Line::from(pager_spans(pagination)))
            .block(Block::default().borders(Borders::ALL).title(" Page "));
        frame.render_widget(pager, chunks[1]);
    }

    let create = Paragraph::new(CREATE_LABEL)
        .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green))
                .title(" ^N "),
        );
    frame.render_widget(create, chunks[2]);

    chunks[0]
}

fn pager_spans(pagination: PaginationView) -> Vec<Span<'static>> {
    let mut spans = vec![Span::raw("\u{2039} ")];
    for item in page_items(pagination, PAGE_WINDOW) {
        match item {
            Some(n) if n == pagination.current_page => spans.push(Span::styled(
                format!("[{}]", n),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Some(n) => spans.push(Span::raw(format!(" {} ", n))),
            None => spans.push(Span::styled(" \u{2026} ", Style::default().fg(Color::DarkGray))),
        }
    }
    spans.push(Span::raw(" \u{203A}"));
    spans
}

fn draw_body(frame: &mut Frame, app: &App, view: &ShellView, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Notes ");

    let notes = match view.body {
        Body::Notes(notes) => notes,
        Body::Loading => return draw_notice(frame, block, LOADING_TEXT, Color::Yellow, area),
        Body::Error => return draw_notice(frame, block, ERROR_TEXT, Color::Red, area),
        Body::Empty => return draw_notice(frame, block, EMPTY_TEXT, Color::DarkGray, area),
    };

    let inner_width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = notes.iter().map(|note| note_item(note, inner_width)).collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Rgb(40, 40, 50)))
        .highlight_symbol("\u{258C} ");

    let mut state = ListState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_notice(frame: &mut Frame, block: Block, text: &str, color: Color, area: Rect) {
    let notice = Paragraph::new(text)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(notice, area);
}

fn note_item(note: &Note, width: usize) -> ListItem<'static> {
    let tag = format!(" {} ", note.tag);
    let title_width = width.saturating_sub(tag.width() + 1);
    let header = Line::from(vec![
        Span::styled(
            truncate(&note.title, title_width),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(tag, Style::default().fg(Color::Black).bg(tag_color(note.tag))),
    ]);

    let first_line = note.content.lines().next().unwrap_or("");
    let preview = Line::from(Span::styled(
        truncate(first_line, width),
        Style::default().fg(Color::Gray),
    ));

    ListItem::new(vec![header, preview, Line::raw("")])
}

fn tag_color(tag: NoteTag) -> Color {
    match tag {
        NoteTag::Todo => Color::Yellow,
        NoteTag::Work => Color::Blue,
        NoteTag::Personal => Color::Magenta,
        NoteTag::Meeting => Color::Cyan,
        NoteTag::Shopping => Color::Green,
    }
}

fn draw_status_bar(frame: &mut Frame, app: &App, view: &ShellView, area: Rect) {
    let mut left_text = match (&view.body, view.pagination) {
        (Body::Notes(notes), Some(p)) => {
            format!(" {} notes | page {} of {}", notes.len(), p.current_page, p.total_pages)
        }
        (Body::Notes(notes), None) => format!(" {} notes", notes.len()),
        _ => String::from(" "),
    };
    if view.revalidating {
        left_text.push_str(" | refreshing...");
    }
    if app.offline {
        left_text.push_str(" | offline");
    }

    let right_text = if view.modal_open {
        " Tab:Field  \u{2190}\u{2192}:Tag  Enter/^S:Save  Esc:Cancel "
    } else {
        " \u{2191}\u{2193}:Select  \u{2190}\u{2192}:Page  Alt+1-9:Go to  ^N:New  ^U:Clear  Esc:Quit "
    };

    let available_width = area.width as usize;
    let left_len = left_text.width();
    let right_len = right_text.width();

    let status_str = if left_len + right_len < available_width {
        let padding = available_width - left_len - right_len;
        format!("{}{:padding$}{}", left_text, "", right_text, padding = padding)
    } else {
        format!("{:width$}", left_text, width = available_width)
    };

    let status = Paragraph::new(status_str)
        .style(Style::default().fg(Color::White).bg(Color::Rgb(0, 95, 135)));
    frame.render_widget(status, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn draw_modal(frame: &mut Frame, form: &NoteForm, area: Rect) {
    let popup_area = centered_rect(MODAL_WIDTH, MODAL_HEIGHT, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" New note ")
        .title_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),            // Title
            Constraint::Length(CONTENT_ROWS), // Content
            Constraint::Length(3),            // Tag
            Constraint::Length(1),            // Error / status
            Constraint::Min(0),
        ])
        .split(inner);

    let field_block = |label: &'static str, field: FormField| {
        let style = if form.focus == field {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Block::default().borders(Borders::ALL).border_style(style).title(label)
    };

    frame.render_widget(
        Paragraph::new(form.title.as_str()).block(field_block(" Title ", FormField::Title)),
        rows[0],
    );
    frame.render_widget(
        Paragraph::new(form.content.as_str())
            .wrap(Wrap { trim: false })
            .block(field_block(" Content ", FormField::Content)),
        rows[1],
    );

    let tags: Vec<Span> = NoteTag::ALL
        .iter()
        .map(|tag| {
            let label = format!(" {} ", tag);
            if *tag == form.tag {
                Span::styled(
                    label,
                    Style::default()
                        .fg(Color::Black)
                        .bg(tag_color(*tag))
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(label, Style::default().fg(Color::Gray))
            }
        })
        .collect();
    frame.render_widget(
        Paragraph::new(Line::from(tags)).block(field_block(" Tag ", FormField::Tag)),
        rows[2],
    );

    let status = if form.is_submitting() {
        Span::styled(" Creating note...", Style::default().fg(Color::Yellow))
    } else if let Some(error) = &form.error {
        Span::styled(format!(" {}", error), Style::default().fg(Color::Red))
    } else {
        Span::raw("")
    };
    frame.render_widget(Paragraph::new(Line::from(status)), rows[3]);

    match form.focus {
        FormField::Title => {
            let x = rows[0].x + 1 + form.title.width() as u16;
            frame.set_cursor_position(Position::new(
                x.min(rows[0].right().saturating_sub(2)),
                rows[0].y + 1,
            ));
        }
        FormField::Content => {
            let inner_width = rows[1].width.saturating_sub(2).max(1) as usize;
            let (col, row) = wrapped_end(&form.content, inner_width);
            let y = (rows[1].y + 1 + row as u16).min(rows[1].bottom().saturating_sub(2));
            frame.set_cursor_position(Position::new(rows[1].x + 1 + col as u16, y));
        }
        FormField::Tag => {}
    }
}

fn draw_toasts(frame: &mut Frame, app: &App, area: Rect) {
    let width = TOAST_WIDTH.min(area.width);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let mut y = area.y;

    for toast in app.session.toaster().visible() {
        if y + 3 > area.bottom() {
            break;
        }
        let color = match toast.message.level {
            MessageLevel::Success => Color::Green,
            MessageLevel::Error => Color::Red,
            MessageLevel::Warning => Color::Yellow,
            MessageLevel::Info => Color::Cyan,
        };
        let rect = Rect::new(x, y, width, 3);
        frame.render_widget(Clear, rect);
        let text = truncate(&toast.message.content, width.saturating_sub(4) as usize);
        frame.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .style(Style::default().fg(color))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(color)),
                ),
            rect,
        );
        y += 3;
    }
}

/// Column and row where the cursor sits after `text` when wrapped at
/// `width` columns.
fn wrapped_end(text: &str, width: usize) -> (usize, usize) {
    let mut row = 0;
    let mut col = 0;
    for c in text.chars() {
        if c == '\n' {
            row += 1;
            col = 0;
            continue;
        }
        let w = c.width().unwrap_or(0);
        if col + w > width {
            row += 1;
            col = 0;
        }
        col += w;
    }
    (col, row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_end_tracks_newlines_and_wraps() {
        assert_eq!(wrapped_end("", 10), (0, 0));
        assert_eq!(wrapped_end("abc\nde", 10), (2, 1));
        assert_eq!(wrapped_end("abcdef", 4), (2, 1));
    }

    #[test]
    fn pager_marks_current_page() {
        let spans = pager_spans(PaginationView {
            total_pages: 3,
            current_page: 2,
        });
        let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.contains("[2]"));
        assert!(text.contains(" 1 "));
        assert!(text.contains(" 3 "));
    }
}
