//! Single-shot elapsed-time gate.

/// Fires once `duration_ms` has passed since the last [`start`](Self::start).
///
/// A timeout that has never been started counts as expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeout {
    started_at_ms: Option<u64>,
    duration_ms: u64,
}

impl Timeout {
    pub const fn new(duration_ms: u64) -> Self {
        Self {
            started_at_ms: None,
            duration_ms,
        }
    }

    /// Restart the gate at `now_ms`.
    pub fn start(&mut self, now_ms: u64) {
        self.started_at_ms = Some(now_ms);
    }

    pub fn has_expired(&self, now_ms: u64) -> bool {
        self.started_at_ms
            .is_none_or(|start| now_ms.wrapping_sub(start) >= self.duration_ms)
    }

    /// Time since the last start, `None` before the first.
    pub fn elapsed_ms(&self, now_ms: u64) -> Option<u64> {
        self.started_at_ms.map(|start| now_ms.wrapping_sub(start))
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}
