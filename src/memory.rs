//! Memory Buffer
//!
//! Bounded, in-process conversation window. Stores raw message turns in
//! insertion order and drops the oldest once capacity is exceeded.
//! Nothing here is persisted; the buffer lives as long as its owner.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

use crate::message::{Message, Role};

/// Default number of messages kept (rolling window)
pub const DEFAULT_CAPACITY: usize = 10;

/// Memory handle shared between agents by explicit injection
pub type SharedMemory = Arc<Mutex<MemoryBuffer>>;

/// Rolling FIFO window of recent messages
#[derive(Debug, Clone)]
pub struct MemoryBuffer {
    capacity: usize,
    buffer: VecDeque<Message>,
}

impl MemoryBuffer {
    /// Create an empty buffer. A capacity of 0 keeps nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            buffer: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY) + 1),
        }
    }

    /// Create an empty buffer wrapped for sharing
    pub fn shared(capacity: usize) -> SharedMemory {
        Arc::new(Mutex::new(Self::new(capacity)))
    }

    /// Append a message, evicting from the front while over capacity
    pub fn add(&mut self, role: Role, content: impl Into<String>) {
        self.buffer.push_back(Message::new(role, content));

        while self.buffer.len() > self.capacity {
            self.buffer.pop_front();
        }

        debug!("Memory now holds {}/{} messages", self.buffer.len(), self.capacity);
    }

    /// Snapshot of the current window, oldest first
    pub fn get_messages(&self) -> Vec<Message> {
        self.buffer.iter().cloned().collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for MemoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order() {
        let mut memory = MemoryBuffer::new(5);
        memory.add(Role::User, "hi");
        memory.add(Role::Assistant, "hello");

        let messages = memory.get_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], Message::user("hi"));
        assert_eq!(messages[1], Message::assistant("hello"));
    }

    #[test]
    fn test_rolling_window() {
        for capacity in 1..=7 {
            let mut memory = MemoryBuffer::new(capacity);
            for i in 0..20 {
                memory.add(Role::User, format!("Message {}", i));
                assert!(memory.len() <= capacity);
            }

            let messages = memory.get_messages();
            assert_eq!(messages.len(), capacity);
            // Most recent last, contiguous run of the newest messages
            for (offset, msg) in messages.iter().enumerate() {
                let expected = 20 - capacity + offset;
                assert_eq!(msg.content(), format!("Message {}", expected));
            }
        }
    }

    #[test]
    fn test_zero_capacity_stays_empty() {
        let mut memory = MemoryBuffer::new(0);
        memory.add(Role::User, "dropped");
        assert!(memory.is_empty());
        assert!(memory.get_messages().is_empty());
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let mut memory = MemoryBuffer::default();
        memory.add(Role::User, "first");
        let snapshot = memory.get_messages();
        memory.add(Role::User, "second");

        assert_eq!(snapshot.len(), 1);
        assert_eq!(memory.len(), 2);
        assert_eq!(memory.capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_shared_handle() {
        let shared = MemoryBuffer::shared(3);
        let other = Arc::clone(&shared);
        shared.lock().add(Role::User, "a");
        other.lock().add(Role::Assistant, "b");
        assert_eq!(shared.lock().len(), 2);

        other.lock().clear();
        assert!(shared.lock().is_empty());
    }

    #[test]
    fn test_huge_capacity_allocates_lazily() {
        let mut memory = MemoryBuffer::new(usize::MAX);
        memory.add(Role::User, "hi");
        memory.add(Role::Assistant, "hello");

        assert_eq!(memory.len(), 2);
        assert_eq!(memory.capacity(), usize::MAX);
    }
}
