use std::time::{Duration, Instant};

pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Holds back search keystrokes until typing pauses.
///
/// The caller owns the clock: every method takes `now`, so the debouncer
/// never sleeps or spawns timers.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
    committed: String,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            committed: String::new(),
        }
    }

    /// Record a keystroke; restarts the debounce window
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.pending = Some((text.into(), now));
    }

    /// Commit the pending text once the window has elapsed.
    ///
    /// Returns the newly committed query, or `None` when nothing changed.
    pub fn poll(&mut self, now: Instant) -> Option<&str> {
        let ready = self
            .pending
            .as_ref()
            .is_some_and(|(_, at)| now.saturating_duration_since(*at) >= self.delay);
        if !ready {
            return None;
        }
        let (text, _) = self.pending.take()?;
        self.commit(text)
    }

    /// Commit immediately, e.g. when the user presses enter
    pub fn flush(&mut self) -> Option<&str> {
        let (text, _) = self.pending.take()?;
        self.commit(text)
    }

    /// Query the evaluator should see
    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn commit(&mut self, text: String) -> Option<&str> {
        if text == self.committed {
            return None;
        }
        tracing::trace!(query = %text, "Search committed");
        self.committed = text;
        Some(self.committed.as_str())
    }
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEBOUNCE)
    }
}
