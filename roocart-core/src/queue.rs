//! Worklist of items not yet confirmed in the remote basket.

use std::collections::VecDeque;

use crate::models::Item;

/// Ordered worklist of pending items.
///
/// An item stays in the queue until a basket snapshot confirms it. The
/// checkout machine is the only consumer, so no locking is involved.
#[derive(Debug, Clone, Default)]
pub struct ItemQueue {
    pending: VecDeque<Item>,
}

impl ItemQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item at the back.
    pub fn enqueue(&mut self, item: Item) {
        self.pending.push_back(item);
    }

    /// Puts an item back at the front so it is retried next.
    pub fn requeue_front(&mut self, item: Item) {
        self.pending.push_front(item);
    }

    /// Removes the next item.
    pub fn dequeue(&mut self) -> Option<Item> {
        self.pending.pop_front()
    }

    /// Returns true if no item is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Returns the number of pending items.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Iterates over pending items in dequeue order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.pending.iter()
    }
}

impl FromIterator<Item> for ItemQueue {
    fn from_iter<T: IntoIterator<Item = Item>>(iter: T) -> Self {
        Self {
            pending: iter.into_iter().collect(),
        }
    }
}
