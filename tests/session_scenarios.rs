//! End-to-end session flows against the in-memory service. The driver here
//! runs each effect to completion on demand, so tests decide exactly when
//! every response arrives.

use notely::model::{NewNoteDraft, NoteTag, QueryKey};
use notely::query::FetchTicket;
use notely::service::{InMemoryNotesService, NotesService};
use notely::session::{Effect, NotesSession};
use notely::view::{Body, ShellView};
use std::time::{Duration, Instant};

struct Driver {
    session: NotesSession,
    service: InMemoryNotesService,
}

impl Driver {
    fn new(service: InMemoryNotesService) -> Self {
        Self {
            session: NotesSession::default(),
            service,
        }
    }

    /// Resolves every effect, including follow-ups (create then refetch).
    async fn run_all(&mut self, mut effects: Vec<Effect>) {
        while let Some(effect) = effects.pop() {
            match effect {
                Effect::Fetch(ticket) => self.complete(&ticket).await,
                Effect::Create(draft) => {
                    let result = self.service.create_note(&draft).await;
                    effects.extend(self.session.resolve_create(result, Instant::now()));
                }
            }
        }
    }

    async fn complete(&mut self, ticket: &FetchTicket) {
        let result = self.service.fetch_notes(&ticket.key.params()).await;
        self.session.resolve_fetch(ticket, result);
    }

    fn displayed_titles(&self) -> Vec<String> {
        match ShellView::build(&self.session).body {
            Body::Notes(notes) => notes.iter().map(|n| n.title.clone()).collect(),
            _ => Vec::new(),
        }
    }
}

fn one_fetch(effects: Vec<Effect>) -> FetchTicket {
    match effects.as_slice() {
        [Effect::Fetch(ticket)] => ticket.clone(),
        other => panic!("expected a single fetch, got {:?}", other),
    }
}

fn seed(service: &InMemoryNotesService, titles: &[&str], tag: NoteTag) {
    for title in titles {
        service.insert(NewNoteDraft::new(*title, "", tag));
    }
}

#[tokio::test]
async fn meeting_search_keeps_page_one_visible_while_page_two_loads() {
    let service = InMemoryNotesService::with_per_page(3);
    seed(&service, &["Standup", "Retro", "Planning"], NoteTag::Work);
    seed(
        &service,
        &["meeting 1", "meeting 2", "meeting 3", "meeting 4", "meeting 5"],
        NoteTag::Meeting,
    );
    let mut driver = Driver::new(service);

    let effects = driver.session.start();
    driver.run_all(effects).await;

    let now = Instant::now();
    for c in "meeting".chars() {
        driver.session.search_input_mut().insert(c, now);
    }
    let ticket = one_fetch(driver.session.tick(now + Duration::from_millis(300)));
    assert_eq!(ticket.key, QueryKey::new("meeting", 1));
    driver.complete(&ticket).await;

    let view = ShellView::build(&driver.session);
    let pagination = view.pagination.expect("two pages of meetings");
    assert_eq!(pagination.total_pages, 2);
    let page_one = driver.displayed_titles();
    assert_eq!(page_one, vec!["meeting 5", "meeting 4", "meeting 3"]);

    let ticket = one_fetch(driver.session.set_page(2));
    assert_eq!(ticket.key, QueryKey::new("meeting", 2));
    assert_eq!(driver.displayed_titles(), page_one);
    assert!(ShellView::build(&driver.session).revalidating);

    driver.complete(&ticket).await;
    assert_eq!(driver.displayed_titles(), vec!["meeting 2", "meeting 1"]);
    assert!(!ShellView::build(&driver.session).revalidating);
}

#[tokio::test]
async fn burst_of_edits_commits_once_with_last_value() {
    let service = InMemoryNotesService::with_per_page(2);
    seed(&service, &["a", "b", "c", "d", "e"], NoteTag::Todo);
    let mut driver = Driver::new(service);
    let effects = driver.session.start();
    driver.run_all(effects).await;
    let effects = driver.session.set_page(3);
    driver.run_all(effects).await;
    let fetches_before = driver.service.fetch_count();

    let start = Instant::now();
    let mut now = start;
    let mut committed = Vec::new();
    for c in "milk".chars() {
        driver.session.search_input_mut().insert(c, now);
        now += Duration::from_millis(120);
        committed.extend(driver.session.tick(now));
    }
    assert!(committed.is_empty());

    let ticket = one_fetch(driver.session.tick(now + Duration::from_millis(300)));
    assert_eq!(ticket.key, QueryKey::new("milk", 1));
    assert_eq!(driver.session.controller().page(), 1);
    assert!(driver.session.tick(now + Duration::from_secs(2)).is_empty());

    driver.complete(&ticket).await;
    assert_eq!(driver.service.fetch_count(), fetches_before + 1);
}

#[tokio::test]
async fn revisiting_a_cached_page_skips_the_network() {
    let service = InMemoryNotesService::with_per_page(2);
    seed(&service, &["a", "b", "c"], NoteTag::Personal);
    let mut driver = Driver::new(service);
    let effects = driver.session.start();
    driver.run_all(effects).await;
    let first = driver.displayed_titles();

    let effects = driver.session.next_page();
    driver.run_all(effects).await;
    let fetches = driver.service.fetch_count();

    assert!(driver.session.prev_page().is_empty());
    assert_eq!(driver.service.fetch_count(), fetches);
    assert_eq!(driver.displayed_titles(), first);
}

#[tokio::test]
async fn failure_for_current_key_replaces_previous_notes() {
    let service = InMemoryNotesService::with_per_page(1);
    seed(&service, &["a", "b"], NoteTag::Todo);
    let mut driver = Driver::new(service);
    let effects = driver.session.start();
    driver.run_all(effects).await;

    driver.service.set_fail_fetches(true);
    let ticket = one_fetch(driver.session.next_page());
    driver.complete(&ticket).await;

    let view = ShellView::build(&driver.session);
    assert_eq!(view.body, Body::Error);
    assert!(view.pagination.is_none());
}

#[tokio::test]
async fn late_response_for_old_key_is_cached_not_shown() {
    let service = InMemoryNotesService::with_per_page(1);
    seed(&service, &["a", "b", "c"], NoteTag::Todo);
    let mut driver = Driver::new(service);
    let effects = driver.session.start();
    driver.run_all(effects).await;

    let page_two = one_fetch(driver.session.set_page(2));
    let page_three = one_fetch(driver.session.set_page(3));

    driver.complete(&page_three).await;
    assert_eq!(driver.displayed_titles(), vec!["a"]);

    driver.complete(&page_two).await;
    assert_eq!(driver.displayed_titles(), vec!["a"]);
    assert!(driver
        .session
        .query()
        .cache()
        .contains(&QueryKey::new("", 2)));
}

#[tokio::test]
async fn create_closes_modal_toasts_and_refetches() {
    let service = InMemoryNotesService::new();
    let mut driver = Driver::new(service);
    let effects = driver.session.start();
    driver.run_all(effects).await;
    assert_eq!(ShellView::build(&driver.session).body, Body::Empty);

    driver.session.open_modal();
    for c in "Water plants".chars() {
        driver.session.form_mut().insert(c);
    }
    let effects = driver.session.submit_form();
    driver.run_all(effects).await;

    assert!(!driver.session.is_modal_open());
    assert_eq!(driver.displayed_titles(), vec!["Water plants"]);
    let toast = driver.session.toaster().visible().next().unwrap();
    assert_eq!(toast.message.content, "Note created: Water plants");
}

#[tokio::test]
async fn failed_create_keeps_the_draft() {
    let service = InMemoryNotesService::new();
    service.set_fail_creates(true);
    let mut driver = Driver::new(service);
    let effects = driver.session.start();
    driver.run_all(effects).await;

    driver.session.open_modal();
    for c in "Water plants".chars() {
        driver.session.form_mut().insert(c);
    }
    let effects = driver.session.submit_form();
    driver.run_all(effects).await;

    assert!(driver.session.is_modal_open());
    assert_eq!(driver.session.form().title, "Water plants");
    let toast = driver.session.toaster().visible().next().unwrap();
    assert!(toast.message.content.starts_with("Could not create note"));
}
