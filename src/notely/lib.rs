//! # Notely Architecture
//!
//! Notely is a client for a remote notes service: browse, search, paginate
//! and create notes. The library holds every rule; the binary is a thin
//! client with two faces, one-shot commands and an interactive terminal
//! shell.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Binary (main.rs, args.rs, cli/)                            │
//! │  - Parses arguments, prints results, owns exit codes        │
//! │  - The ONLY place that writes to stdout/stderr              │
//! └─────────────────────────────────────────────────────────────┘
//!                │                               │
//!                ▼                               ▼
//! ┌──────────────────────────────┐ ┌────────────────────────────┐
//! │  API Layer (api.rs)          │ │  Terminal shell (tui/)     │
//! │  - Facade over commands      │ │  - Drives a NotesSession   │
//! │  - Normalizes inputs         │ │  - Runs its effects on a   │
//! │                              │ │    tokio runtime           │
//! └──────────────────────────────┘ └────────────────────────────┘
//!                │                               │
//!                ▼                               ▼
//! ┌──────────────────────────────┐ ┌────────────────────────────┐
//! │  Commands (commands/*.rs)    │ │  Session (session.rs)      │
//! │  - list, create, config      │ │  - controller, debounce,   │
//! │  - Return CmdResult          │ │    query cache, form,      │
//! │                              │ │    toasts; no I/O          │
//! └──────────────────────────────┘ └────────────────────────────┘
//!                │                               │
//!                └───────────────┬───────────────┘
//!                                ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Service Layer (service/)                                   │
//! │  - NotesService trait                                       │
//! │  - HttpNotesService (production), InMemoryNotesService      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! Below the binary, code takes Rust arguments and returns Rust types. The
//! session goes further: it never awaits anything. Inputs return
//! [`session::Effect`]s and the driver feeds their outcomes back, so every
//! interaction (debounced typing, out-of-order responses, create then
//! refetch) can be tested step by step without a runtime or a terminal.
//!
//! ## Testing Strategy
//!
//! 1. **State machines** (`controller`, `debounce`, `query`, `form`, `toast`,
//!    `session`): unit tests with explicit `Instant`s and hand-made tickets.
//! 2. **Commands**: unit tests against [`service::InMemoryNotesService`].
//! 3. **Service**: HTTP request shaping and retry timing (paused tokio clock).
//! 4. **Binary**: `tests/cli.rs` drives the real executable with `assert_cmd`.
//!
//! ## Module Overview
//!
//! - [`api`]: Facade for one-shot operations
//! - [`commands`]: `list`, `create`, `config`
//! - [`controller`]: Search text, page and modal flag
//! - [`debounce`]: Debouncer and the search input box
//! - [`query`]: Cached, keyed fetch state with keep-previous-data
//! - [`session`]: Everything above wired into one state machine
//! - [`form`]: Create-note form state and validation
//! - [`toast`]: Transient notices
//! - [`view`]: What the shell draws, derived from a session
//! - [`tui`]: ratatui shell driving a session
//! - [`service`]: Remote service trait and implementations
//! - [`model`]: `Note`, `NoteTag`, `NotesPage`, query keys
//! - [`config`]: `config.json` and environment overrides
//! - [`logging`]: tracing subscriber setup
//! - [`error`]: Error types
//! - `cli`: Output formatting for the binary (not part of the lib API)

pub mod api;
pub mod commands;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod form;
pub mod logging;
pub mod model;
pub mod query;
pub mod service;
pub mod session;
pub mod toast;
pub mod tui;
pub mod view;
