//! Thread-safe FIFO shared between a pump and the tick loop.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

/// A FIFO that evicts its oldest entries once it grows past `capacity`.
///
/// Pushing never blocks and never fails; bursts degrade by discarding the
/// oldest unsent data.
#[derive(Debug)]
pub struct BoundedQueue<T> {
    items: VecDeque<T>,
    capacity: Option<usize>,
}

impl<T> BoundedQueue<T> {
    /// Queue holding at most `capacity` items.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity: Some(capacity),
        }
    }

    /// Queue without a length limit.
    pub fn unbounded() -> Self {
        Self {
            items: VecDeque::new(),
            capacity: None,
        }
    }

    /// Append an item, then evict from the front while over capacity.
    ///
    /// Returns the number of evicted items.
    pub fn push(&mut self, item: T) -> usize {
        self.items.push_back(item);
        let Some(capacity) = self.capacity else {
            return 0;
        };
        let mut evicted = 0;
        while self.items.len() > capacity {
            self.items.pop_front();
            evicted += 1;
        }
        evicted
    }

    /// Append every item in order. Returns the number of evicted items.
    pub fn extend(&mut self, items: impl IntoIterator<Item = T>) -> usize {
        items.into_iter().map(|item| self.push(item)).sum()
    }

    /// Remove the oldest item.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Take every queued item, oldest first.
    pub fn take_all(&mut self) -> Vec<T> {
        self.items.drain(..).collect()
    }

    /// Discard every queued item. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.items.len();
        self.items.clear();
        dropped
    }

    /// Number of queued items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maximum length, if bounded.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}

/// A [`BoundedQueue`] behind a single mutex.
pub type SharedQueue<T> = Arc<Mutex<BoundedQueue<T>>>;
