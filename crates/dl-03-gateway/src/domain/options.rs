//! # Session Options

use std::time::Duration;

/// Per-operation timeouts. `None` waits indefinitely.
///
/// Expiry only stops local waiting; a submitted proposal may still commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub evaluate_timeout: Option<Duration>,
    pub submit_timeout: Option<Duration>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            evaluate_timeout: Some(Duration::from_secs(5)),
            submit_timeout: Some(Duration::from_secs(60)),
        }
    }
}

impl SessionOptions {
    /// No timeouts at all.
    pub fn unbounded() -> Self {
        Self {
            evaluate_timeout: None,
            submit_timeout: None,
        }
    }

    pub fn with_evaluate_timeout(mut self, timeout: Duration) -> Self {
        self.evaluate_timeout = Some(timeout);
        self
    }

    pub fn with_submit_timeout(mut self, timeout: Duration) -> Self {
        self.submit_timeout = Some(timeout);
        self
    }
}
