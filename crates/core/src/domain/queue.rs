// Item Queue - unbounded FIFO bridging producers and the single consumer

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use tokio::sync::Notify;

use crate::domain::item::Item;

/// Unbounded FIFO queue, safe for many concurrent writers and one reader.
///
/// Producers append with `try_enqueue` and never block. The consumer suspends
/// on `wait_for_available` (no CPU while idle) and drains with `try_dequeue`.
/// `close` forbids further enqueues while leaving the backlog drainable.
pub struct ItemQueue {
    inner: Mutex<QueueInner>,
    available: Notify,
}

struct QueueInner {
    items: VecDeque<Item>,
    closed: bool,
}

impl ItemQueue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(QueueInner {
                items: VecDeque::new(),
                closed: false,
            }),
            available: Notify::new(),
        }
    }

    /// Append an item to the tail.
    ///
    /// Returns false only if the queue has been closed; an unbounded queue
    /// never rejects for fullness. O(1) amortized, never suspends.
    pub fn try_enqueue(&self, item: Item) -> bool {
        {
            let mut inner = self.lock_inner();
            if inner.closed {
                return false;
            }
            inner.items.push_back(item);
        }
        self.available.notify_one();
        true
    }

    /// Remove and return the head item if present, non-blocking.
    pub fn try_dequeue(&self) -> Option<Item> {
        self.lock_inner().items.pop_front()
    }

    /// Suspend until at least one item is present or the queue is closed.
    ///
    /// Returns true when items may be available and false once the queue is
    /// closed and fully drained. A burst of enqueues may coalesce into a
    /// single wakeup, so callers drain with `try_dequeue` in a loop rather
    /// than assuming one item per return.
    pub async fn wait_for_available(&self) -> bool {
        loop {
            // Register interest before inspecting state so an enqueue racing
            // this check cannot be missed (notify_one stores a permit).
            let notified = self.available.notified();
            {
                let inner = self.lock_inner();
                if !inner.items.is_empty() {
                    return true;
                }
                if inner.closed {
                    return false;
                }
            }
            notified.await;
        }
    }

    /// Forbid further enqueues. Already-queued items remain drainable.
    pub fn close(&self) {
        self.lock_inner().closed = true;
        self.available.notify_one();
    }

    /// Number of items currently queued (backlog depth).
    pub fn len(&self) -> usize {
        self.lock_inner().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_inner().items.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.lock_inner().closed
    }

    fn lock_inner(&self) -> MutexGuard<'_, QueueInner> {
        self.inner.lock().expect("item queue lock poisoned")
    }
}

impl Default for ItemQueue {
    fn default() -> Self {
        Self::new()
    }
}
