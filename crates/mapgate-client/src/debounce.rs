//! Trailing-edge debounce with generation tickets.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Quiescence window before a search input fires.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(100);

/// Identifies one call to `Debouncer::bump`. Only the newest ticket is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    generation: AtomicU64,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            generation: AtomicU64::new(0),
        }
    }

    /// Supersede every outstanding ticket.
    pub fn bump(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::Acquire) == ticket.0
    }

    /// Wait out the window. `None` if a later call arrived meanwhile.
    pub async fn settle(&self) -> Option<Ticket> {
        let ticket = self.bump();
        tokio::time::sleep(self.window).await;
        self.is_current(ticket).then_some(ticket)
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_only_last_call_settles() {
        let debouncer = Arc::new(Debouncer::default());

        let first = tokio::spawn({
            let d = debouncer.clone();
            async move { d.settle().await }
        });
        tokio::time::sleep(Duration::from_millis(40)).await;
        let second = tokio::spawn({
            let d = debouncer.clone();
            async move { d.settle().await }
        });

        assert!(first.await.unwrap().is_none());
        let ticket = second.await.unwrap().unwrap();
        assert!(debouncer.is_current(ticket));
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_outside_window_both_settle() {
        let debouncer = Debouncer::default();
        assert!(debouncer.settle().await.is_some());
        assert!(debouncer.settle().await.is_some());
    }

    #[test]
    fn test_bump_invalidates_ticket() {
        let debouncer = Debouncer::default();
        let ticket = debouncer.bump();
        assert!(debouncer.is_current(ticket));
        debouncer.bump();
        assert!(!debouncer.is_current(ticket));
    }
}
