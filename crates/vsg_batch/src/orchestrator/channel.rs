//! Log/progress channel between the engine and the orchestrator.

use std::collections::VecDeque;

use parking_lot::Mutex;

/// Default bound of [`LogQueue`].
pub const LOG_QUEUE_CAPACITY: usize = 1000;

/// Pollable source of engine messages and progress.
pub trait LogChannel: Send + Sync {
    /// Next pending message, if any. Never blocks.
    fn poll_log(&self) -> Option<String>;

    /// Latest `(percent, status)`.
    fn progress(&self) -> (i32, String);
}

/// In-process channel the engine can feed from any thread.
///
/// Bounded: once full, the oldest message is dropped.
pub struct LogQueue {
    messages: Mutex<VecDeque<String>>,
    progress: Mutex<(i32, String)>,
    capacity: usize,
}

impl Default for LogQueue {
    fn default() -> Self {
        Self::with_capacity(LOG_QUEUE_CAPACITY)
    }
}

impl LogQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            messages: Mutex::new(VecDeque::new()),
            progress: Mutex::new((0, String::new())),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&self, message: impl Into<String>) {
        let mut queue = self.messages.lock();
        queue.push_back(message.into());
        while queue.len() > self.capacity {
            queue.pop_front();
        }
    }

    pub fn set_progress(&self, percent: i32, status: impl Into<String>) {
        *self.progress.lock() = (percent, status.into());
    }

    /// Drop pending messages.
    pub fn clear(&self) {
        self.messages.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

impl LogChannel for LogQueue {
    fn poll_log(&self) -> Option<String> {
        self.messages.lock().pop_front()
    }

    fn progress(&self) -> (i32, String) {
        self.progress.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn poll_is_fifo() {
        let queue = LogQueue::new();
        queue.push("first");
        queue.push("second");

        assert_eq!(queue.poll_log().as_deref(), Some("first"));
        assert_eq!(queue.poll_log().as_deref(), Some("second"));
        assert_eq!(queue.poll_log(), None);
    }

    #[test]
    fn bounded_drops_oldest() {
        let queue = LogQueue::with_capacity(3);
        for i in 0..5 {
            queue.push(format!("m{}", i));
        }

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.poll_log().as_deref(), Some("m2"));
    }

    #[test]
    fn default_capacity_is_one_thousand() {
        let queue = LogQueue::new();
        for i in 0..1005 {
            queue.push(i.to_string());
        }
        assert_eq!(queue.len(), LOG_QUEUE_CAPACITY);
        assert_eq!(queue.poll_log().as_deref(), Some("5"));
    }

    #[test]
    fn progress_round_trip_and_clear() {
        let queue = LogQueue::new();
        assert_eq!(queue.progress(), (0, String::new()));

        queue.set_progress(40, "Analyzing");
        assert_eq!(queue.progress(), (40, "Analyzing".to_string()));

        queue.push("x");
        queue.clear();
        assert!(queue.is_empty());
    }

    #[test]
    fn fed_from_another_thread() {
        let queue = Arc::new(LogQueue::new());
        let producer = Arc::clone(&queue);
        thread::spawn(move || {
            for i in 0..10 {
                producer.push(format!("line {}", i));
            }
        })
        .join()
        .unwrap();

        let drained: Vec<String> = std::iter::from_fn(|| queue.poll_log()).collect();
        assert_eq!(drained.len(), 10);
        assert_eq!(drained[9], "line 9");
    }
}
