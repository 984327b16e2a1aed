use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
/// Generation captured when an asynchronous load was started.
pub struct Ticket(pub u64);

#[derive(Clone, Debug, Default)]
/// Monotonic generation counter that lets async completions detect they were superseded.
///
/// Clones share one counter, so every load site holding a clone sees the same generation. Only
/// the newest ticket is ever current; in-flight work is not stopped, its effect is dropped.
pub struct GenerationGuard {
    current: Arc<AtomicU64>,
}

impl GenerationGuard {
    /// Guard at generation `0`. No ticket has been issued yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation and return its ticket; every earlier ticket becomes stale.
    pub fn advance(&self) -> Ticket {
        Ticket(self.current.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Ticket of the newest generation.
    pub fn current(&self) -> Ticket {
        Ticket(self.current.load(Ordering::Acquire))
    }

    /// Return `true` when no newer generation has started since `ticket` was issued.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.current() == ticket
    }

    /// Run `apply` only when `ticket` is still current.
    pub fn if_current<T>(&self, ticket: Ticket, apply: impl FnOnce() -> T) -> Option<T> {
        self.is_current(ticket).then(apply)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/load/token.rs"]
mod tests;
