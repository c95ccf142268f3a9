//! Transient status notices shown top-center over the shell.
//!
//! Toasts never take focus and never block input; they stack in arrival order
//! and disappear once their time-to-live runs out.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::commands::CmdMessage;

pub const DEFAULT_TOAST_TTL: Duration = Duration::from_secs(3);
const MAX_VISIBLE: usize = 4;

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: CmdMessage,
    pub expires_at: Instant,
}

#[derive(Debug)]
pub struct Toaster {
    ttl: Duration,
    toasts: VecDeque<Toast>,
}

impl Toaster {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            toasts: VecDeque::new(),
        }
    }

    pub fn push(&mut self, message: CmdMessage, now: Instant) {
        self.toasts.push_back(Toast {
            message,
            expires_at: now + self.ttl,
        });
        while self.toasts.len() > MAX_VISIBLE {
            self.toasts.pop_front();
        }
    }

    /// Drops expired toasts. Returns true if anything was removed.
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.expires_at > now);
        before != self.toasts.len()
    }

    /// Oldest first; the renderer stacks them downward from the top edge.
    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_TTL)
    }
}
