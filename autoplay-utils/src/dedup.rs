//! Consecutive-duplicate suppression for human-readable status lines
//!
//! The poll loop reports its view of the device once per second. Emitting
//! "Playing" sixty times a minute buries the interesting transitions, so
//! a [`DedupLog`] only lets a line through when it differs from the line
//! before it.

use parking_lot::Mutex;

/// Emits a message only when it differs from the previous one
#[derive(Debug, Default)]
pub struct DedupLog {
    previous: Mutex<Option<String>>,
}

impl DedupLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `message` differs from the last accepted message
    /// and records it as the new last message.
    pub fn accept(&self, message: &str) -> bool {
        let mut previous = self.previous.lock();
        if previous.as_deref() == Some(message) {
            return false;
        }
        *previous = Some(message.to_string());
        true
    }

    /// Log `message` at info level unless it repeats the previous line
    pub fn info(&self, message: &str) {
        if self.accept(message) {
            tracing::info!("{}", message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_consecutive_messages_print_once() {
        let log = DedupLog::new();
        assert!(log.accept("Playing"));
        assert!(!log.accept("Playing"));
    }

    #[test]
    fn test_alternating_messages_all_print() {
        let log = DedupLog::new();
        assert!(log.accept("Playing"));
        assert!(log.accept("Unknown state"));
        assert!(log.accept("Playing"));
    }
}
