//! Bounded, human-readable combat log.

use std::collections::VecDeque;

/// Rolling window of `"[{tick}ms] {message}"` lines. Oldest lines are evicted
/// once capacity is reached. Purely observational.
///
/// # Example
///
/// ```
/// use riposte_core::log::CombatLog;
///
/// let mut log = CombatLog::new(2);
/// log.push(0, "Combat started");
/// log.push(100, "Player begins Thrust");
/// log.push(200, "Player thrust: wind_up -> committed");
///
/// assert_eq!(log.len(), 2);
/// assert_eq!(log.lines().next(), Some("[100ms] Player begins Thrust"));
/// ```
#[derive(Debug, Clone)]
pub struct CombatLog {
    lines: VecDeque<String>,
    capacity: usize,
}

impl CombatLog {
    /// Creates an empty log holding at most `capacity` lines.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a timestamped line, evicting the oldest past capacity.
    pub fn push(&mut self, tick: u64, message: impl AsRef<str>) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines
            .push_back(format!("[{tick}ms] {}", message.as_ref()));
    }

    /// Lines, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Most recent line.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.lines.back().map(String::as_str)
    }

    /// Number of lines held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if no lines are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Copies the lines out, oldest first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }

    /// Returns `true` if any line contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}
