use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::error::Result;
use crate::form::FormField;
use crate::model::{Note, NotesPage};
use crate::query::FetchTicket;
use crate::service::NotesService;
use crate::session::{Effect, NotesSession};
use crate::tui::ui;

const TICK_RATE: Duration = Duration::from_millis(50);

/// Messages from background tasks
pub enum BgMessage {
    Fetched {
        ticket: FetchTicket,
        result: Result<NotesPage>,
    },
    Created(Result<Note>),
}

pub struct App {
    pub session: NotesSession,

    /// Highlighted row in the note list
    pub selected: usize,
    /// Shown in the status bar when running against the in-memory service
    pub offline: bool,

    service: Arc<dyn NotesService>,
    runtime: Handle,

    bg_sender: Sender<BgMessage>,
    bg_receiver: Receiver<BgMessage>,

    pub should_quit: bool,
}

impl App {
    pub fn new(session: NotesSession, service: Arc<dyn NotesService>, runtime: Handle) -> Self {
        let (bg_sender, bg_receiver) = channel();
        Self {
            session,
            selected: 0,
            offline: false,
            service,
            runtime,
            bg_sender,
            bg_receiver,
            should_quit: false,
        }
    }

    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let effects = self.session.start();
        self.execute(effects);

        loop {
            terminal.draw(|frame| ui::draw(frame, self))?;

            let now = Instant::now();
            let mut timeout = TICK_RATE;
            if let Some(deadline) = self.session.next_deadline() {
                timeout = timeout.min(deadline.saturating_duration_since(now));
            }

            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            self.process_messages();
            let effects = self.session.tick(Instant::now());
            self.execute(effects);

            if self.should_quit {
                self.session.dispose();
                return Ok(());
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.session.is_modal_open() {
            self.handle_modal_key(key);
        } else {
            self.handle_shell_key(key);
        }
    }

    fn handle_shell_key(&mut self, key: KeyEvent) {
        let now = Instant::now();
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Char('n') if ctrl => self.session.open_modal(),
            KeyCode::Char('u') if ctrl => self.session.search_input_mut().clear(now),
            KeyCode::Char(c @ '1'..='9') if alt => {
                let effects = self.session.go_to_page(c as u32 - '0' as u32);
                self.page_changed(effects);
            }
            KeyCode::Home if ctrl => {
                let effects = self.session.go_to_page(1);
                self.page_changed(effects);
            }
            KeyCode::End if ctrl => {
                let effects = self.session.last_page();
                self.page_changed(effects);
            }
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(c) if !ctrl => self.session.search_input_mut().insert(c, now),
            KeyCode::Backspace => self.session.search_input_mut().backspace(now),
            KeyCode::Delete => self.session.search_input_mut().delete(now),
            KeyCode::Home => self.session.search_input_mut().move_home(),
            KeyCode::End => self.session.search_input_mut().move_end(),
            KeyCode::Left if ctrl => self.session.search_input_mut().move_left(),
            KeyCode::Right if ctrl => self.session.search_input_mut().move_right(),
            KeyCode::Left | KeyCode::PageUp => {
                let effects = self.session.prev_page();
                self.page_changed(effects);
            }
            KeyCode::Right | KeyCode::PageDown => {
                let effects = self.session.next_page();
                self.page_changed(effects);
            }
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                let len = self.visible_notes_len();
                if len > 0 {
                    self.selected = (self.selected + 1).min(len - 1);
                }
            }
            _ => {}
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let focus = self.session.form().focus;

        match key.code {
            KeyCode::Esc => self.session.close_modal(),
            KeyCode::Char('s') if ctrl => self.submit(),
            KeyCode::Tab => self.session.form_mut().focus_next(),
            KeyCode::BackTab => self.session.form_mut().focus_prev(),
            KeyCode::Enter if focus == FormField::Content => self.session.form_mut().insert('\n'),
            KeyCode::Enter => self.submit(),
            KeyCode::Left if focus == FormField::Tag => self.session.form_mut().prev_tag(),
            KeyCode::Right if focus == FormField::Tag => self.session.form_mut().next_tag(),
            KeyCode::Backspace => self.session.form_mut().backspace(),
            KeyCode::Char(c) if !ctrl => self.session.form_mut().insert(c),
            _ => {}
        }
    }

    fn submit(&mut self) {
        let effects = self.session.submit_form();
        self.execute(effects);
    }

    fn page_changed(&mut self, effects: Vec<Effect>) {
        self.selected = 0;
        self.execute(effects);
    }

    fn visible_notes_len(&self) -> usize {
        self.session
            .query()
            .data()
            .map(|page| page.notes.len())
            .unwrap_or(0)
    }

    /// Runs session effects as background tasks.
    pub fn execute(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            let service = Arc::clone(&self.service);
            let tx = self.bg_sender.clone();
            match effect {
                Effect::Fetch(ticket) => {
                    debug!(key = %ticket.key, id = ticket.id, "spawning fetch");
                    self.runtime.spawn(async move {
                        let result = service.fetch_notes(&ticket.key.params()).await;
                        let _ = tx.send(BgMessage::Fetched { ticket, result });
                    });
                }
                Effect::Create(draft) => {
                    debug!(title = %draft.title, "spawning create");
                    self.runtime.spawn(async move {
                        let result = service.create_note(&draft).await;
                        let _ = tx.send(BgMessage::Created(result));
                    });
                }
            }
        }
    }

    /// Applies everything the background tasks have reported so far.
    pub fn process_messages(&mut self) {
        while let Ok(message) = self.bg_receiver.try_recv() {
            self.apply(message);
        }
    }

    /// Blocks until one background message arrives or `timeout` passes.
    /// Returns whether a message was applied.
    pub fn wait_for_message(&mut self, timeout: Duration) -> bool {
        match self.bg_receiver.recv_timeout(timeout) {
            Ok(message) => {
                self.apply(message);
                true
            }
            Err(_) => false,
        }
    }

    fn apply(&mut self, message: BgMessage) {
        match message {
            BgMessage::Fetched { ticket, result } => {
                if self.session.resolve_fetch(&ticket, result) {
                    let len = self.visible_notes_len();
                    self.selected = self.selected.min(len.saturating_sub(1));
                }
            }
            BgMessage::Created(result) => {
                if let Err(err) = &result {
                    warn!(%err, "note creation failed");
                }
                let effects = self.session.resolve_create(result, Instant::now());
                self.execute(effects);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NoteTag, QueryKey};
    use crate::service::memory::fixtures::ServiceFixture;
    use crate::service::InMemoryNotesService;
    use crate::session::SessionOptions;
    use crate::view::{Body, ShellView};

    const WAIT: Duration = Duration::from_secs(5);

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn app_with(service: Arc<InMemoryNotesService>, rt: &tokio::runtime::Runtime) -> App {
        let session = NotesSession::new(SessionOptions {
            debounce: Duration::from_millis(1),
            ..SessionOptions::default()
        });
        let mut app = App::new(session, service, rt.handle().clone());
        let effects = app.session.start();
        app.execute(effects);
        assert!(app.wait_for_message(WAIT));
        app
    }

    #[test]
    fn first_page_loads_in_background() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let fixture = ServiceFixture::new(3).with_notes(5, NoteTag::Work);
        let app = app_with(Arc::new(fixture.service), &rt);

        let view = ShellView::build(&app.session);
        assert!(matches!(view.body, Body::Notes(n) if n.len() == 3));
        assert_eq!(view.pagination.unwrap().total_pages, 2);
    }

    #[test]
    fn arrow_keys_page_and_typing_searches() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let fixture = ServiceFixture::new(2)
            .with_notes(3, NoteTag::Work)
            .with_note("Groceries", "", NoteTag::Shopping);
        let service = Arc::new(fixture.service);
        let mut app = app_with(Arc::clone(&service), &rt);

        app.handle_key(key(KeyCode::Right));
        assert!(app.wait_for_message(WAIT));
        assert_eq!(app.session.query().displayed_key(), Some(&QueryKey::new("", 2)));

        for c in "groc".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        std::thread::sleep(Duration::from_millis(5));
        let effects = app.session.tick(Instant::now());
        app.execute(effects);
        assert!(app.wait_for_message(WAIT));

        assert_eq!(app.session.controller().page(), 1);
        let page = app.session.query().data().unwrap();
        assert_eq!(page.notes.len(), 1);
        assert_eq!(page.notes[0].title, "Groceries");
    }

    #[test]
    fn alt_digit_and_ctrl_end_jump_to_pages() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let fixture = ServiceFixture::new(1).with_notes(4, NoteTag::Todo);
        let mut app = app_with(Arc::new(fixture.service), &rt);

        app.handle_key(KeyEvent::new(KeyCode::Char('3'), KeyModifiers::ALT));
        assert!(app.wait_for_message(WAIT));
        assert_eq!(app.session.controller().page(), 3);
        assert_eq!(app.session.search_input().text(), "");

        app.handle_key(KeyEvent::new(KeyCode::End, KeyModifiers::CONTROL));
        assert!(app.wait_for_message(WAIT));
        assert_eq!(app.session.query().displayed_key(), Some(&QueryKey::new("", 4)));

        app.handle_key(KeyEvent::new(KeyCode::Char('9'), KeyModifiers::ALT));
        assert_eq!(app.session.controller().page(), 4);
    }

    #[test]
    fn modal_create_flow() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let service = Arc::new(InMemoryNotesService::new());
        let mut app = app_with(Arc::clone(&service), &rt);

        app.handle_key(ctrl('n'));
        assert!(app.session.is_modal_open());
        for c in "Dentist".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Enter));

        // Create result, then the refetch it triggers.
        assert!(app.wait_for_message(WAIT));
        assert!(!app.session.is_modal_open());
        assert!(app.wait_for_message(WAIT));

        let page = app.session.query().data().unwrap();
        assert_eq!(page.notes[0].title, "Dentist");
        assert_eq!(page.notes[0].tag, NoteTag::Work);
        assert_eq!(service.create_count(), 1);
    }

    #[test]
    fn escape_closes_modal_before_quitting() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = app_with(Arc::new(InMemoryNotesService::new()), &rt);
        app.handle_key(ctrl('n'));
        app.handle_key(key(KeyCode::Esc));
        assert!(!app.session.is_modal_open());
        assert!(!app.should_quit);
        app.handle_key(key(KeyCode::Esc));
        assert!(app.should_quit);
    }
}
