use crossbeam_queue::ArrayQueue;

/// Default number of slots in the work queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 131_072;

/// Fixed-capacity MPMC queue.
///
/// All operations are non-blocking and lock-free. Every pushed item is
/// popped by exactly one caller; order across concurrent callers is not
/// guaranteed.
pub struct BoundedQueue<T> {
    slots: ArrayQueue<T>,
}

impl<T> BoundedQueue<T> {
    /// Panics if `capacity` is zero, like `ArrayQueue::new`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: ArrayQueue::new(capacity),
        }
    }

    /// Hands `item` to the queue, or hands it back when the queue is full.
    pub fn try_push(&self, item: T) -> Result<(), T> {
        self.slots.push(item)
    }

    pub fn try_pop(&self) -> Option<T> {
        self.slots.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }
}

impl<T> Default for BoundedQueue<T> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }
}
