//! # CLI Layer
//!
//! Terminal output for the one-shot commands. This is the only code outside
//! `main.rs` that writes to stdout; everything it prints comes from a
//! [`CmdResult`](notely::api::CmdResult).

pub mod print;
