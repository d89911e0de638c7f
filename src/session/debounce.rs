/// Default quiet period before an input-triggered save fires.
pub const DEFAULT_SAVE_DELAY_MS: u64 = 1000;

/// Trailing-edge debouncer for saves.
///
/// Every queued input replaces the pending one, so at most one save is
/// outstanding and it fires only once input has been quiet for the delay.
/// Time is supplied by the caller in milliseconds from any fixed origin.
#[derive(Debug, Clone)]
pub struct SaveDebouncer {
    delay_ms: u64,
    pending_since: Option<u64>,
}

impl SaveDebouncer {
    pub const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending_since: None,
        }
    }

    pub const fn queue(&mut self, now_ms: u64) {
        self.pending_since = Some(now_ms);
    }

    /// Returns true (and clears the pending save) once the delay has elapsed.
    pub fn take_ready(&mut self, now_ms: u64) -> bool {
        let Some(queued_at) = self.pending_since else {
            return false;
        };
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending_since = None;
            true
        } else {
            false
        }
    }

    pub const fn cancel(&mut self) {
        self.pending_since = None;
    }

    pub const fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// When the pending save becomes due, if any.
    pub fn deadline(&self) -> Option<u64> {
        self.pending_since.map(|t| t.saturating_add(self.delay_ms))
    }
}

impl Default for SaveDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SAVE_DELAY_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_quiet_period() {
        let mut d = SaveDebouncer::new(100);
        d.queue(0);
        assert!(!d.take_ready(99));
        assert!(d.take_ready(100));
        assert!(!d.take_ready(500));
    }

    #[test]
    fn test_requeue_pushes_deadline_back() {
        let mut d = SaveDebouncer::new(100);
        d.queue(0);
        d.queue(80);
        assert_eq!(d.deadline(), Some(180));
        assert!(!d.take_ready(150));
        assert!(d.take_ready(180));
    }

    #[test]
    fn test_cancel_drops_pending_save() {
        let mut d = SaveDebouncer::new(10);
        d.queue(0);
        d.cancel();
        assert!(!d.is_pending());
        assert!(!d.take_ready(1_000));
    }
}
