use std::time::{Duration, Instant};

/// Quiet period before a typed query is applied.
pub(crate) const SEARCH_DEBOUNCE: Duration = Duration::from_millis(130);

/// Holds the latest value until no new value has arrived for `delay`.
pub(crate) struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub(crate) fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replace any pending value and restart the quiet period.
    pub(crate) fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Release the pending value once its deadline has passed.
    pub(crate) fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self.pending.as_ref().map(|(_, due)| *due)?;
        if due <= now {
            self.flush()
        } else {
            None
        }
    }

    /// Release the pending value immediately.
    pub(crate) fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub(crate) fn cancel(&mut self) {
        self.pending = None;
    }

    /// How long the event loop may sleep before the pending value is due.
    pub(crate) fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, due)| due.saturating_duration_since(now))
    }
}

/// Search box contents. `draft` follows every keystroke; `applied` is what
/// the views filter by.
pub(crate) struct SearchState {
    pub(crate) draft: String,
    pub(crate) applied: String,
    debounce: Debouncer<String>,
}

impl SearchState {
    pub(crate) fn new() -> Self {
        Self {
            draft: String::new(),
            applied: String::new(),
            debounce: Debouncer::new(SEARCH_DEBOUNCE),
        }
    }

    pub(crate) fn push(&mut self, ch: char, now: Instant) {
        self.draft.push(ch);
        self.debounce.schedule(self.draft.clone(), now);
    }

    pub(crate) fn backspace(&mut self, now: Instant) {
        if self.draft.pop().is_some() {
            self.debounce.schedule(self.draft.clone(), now);
        }
    }

    /// Apply a due query. Returns true when the applied query changed.
    pub(crate) fn tick(&mut self, now: Instant) -> bool {
        match self.debounce.poll(now) {
            Some(query) => self.apply(query),
            None => false,
        }
    }

    /// Apply the pending query without waiting.
    pub(crate) fn commit(&mut self) -> bool {
        match self.debounce.flush() {
            Some(query) => self.apply(query),
            None => false,
        }
    }

    pub(crate) fn clear(&mut self) -> bool {
        self.debounce.cancel();
        self.draft.clear();
        self.apply(String::new())
    }

    pub(crate) fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.debounce.time_until_due(now)
    }

    fn apply(&mut self, query: String) -> bool {
        if self.applied == query {
            return false;
        }
        self.applied = query;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_is_released_only_after_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(130));
        debouncer.schedule("a", start);
        assert_eq!(debouncer.poll(start + Duration::from_millis(100)), None);

        debouncer.schedule("ab", start + Duration::from_millis(100));
        assert_eq!(debouncer.poll(start + Duration::from_millis(200)), None);
        assert_eq!(debouncer.poll(start + Duration::from_millis(230)), Some("ab"));
        assert_eq!(debouncer.poll(start + Duration::from_millis(400)), None);
    }

    #[test]
    fn remaining_time_shrinks_towards_zero() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(130));
        assert_eq!(debouncer.time_until_due(start), None);
        debouncer.schedule(1, start);
        assert_eq!(
            debouncer.time_until_due(start + Duration::from_millis(30)),
            Some(Duration::from_millis(100))
        );
        assert_eq!(
            debouncer.time_until_due(start + Duration::from_secs(1)),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn rapid_keystrokes_coalesce_into_one_query() {
        let start = Instant::now();
        let mut search = SearchState::new();
        for (offset, ch) in "gra".chars().enumerate() {
            search.push(ch, start + Duration::from_millis(offset as u64 * 50));
        }
        assert!(!search.tick(start + Duration::from_millis(150)));
        assert_eq!(search.applied, "");
        assert!(search.tick(start + Duration::from_millis(240)));
        assert_eq!(search.applied, "gra");
    }

    #[test]
    fn commit_and_clear_apply_immediately() {
        let now = Instant::now();
        let mut search = SearchState::new();
        search.push('x', now);
        assert!(search.commit());
        assert_eq!(search.applied, "x");

        search.push('y', now);
        assert!(search.clear());
        assert_eq!(search.draft, "");
        assert_eq!(search.applied, "");
        assert!(!search.tick(now + Duration::from_secs(1)));
    }
}
