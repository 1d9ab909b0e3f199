//! FIFO work queue for the breadth-first placement search
//!
//! A queue is created for one insertion and dropped when that insertion
//! returns. `dequeue` hands back `None` on an empty queue, so the search
//! loop cannot underflow it.

use std::collections::VecDeque;

#[derive(Debug)]
pub struct TraversalQueue<T> {
    items: VecDeque<T>,
}

impl<T> Default for TraversalQueue<T> {
    fn default() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }
}

impl<T> TraversalQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, item: T) {
        self.items.push_back(item);
    }

    /// Remove and return the oldest item.
    pub fn dequeue(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = TraversalQueue::new();
        queue.enqueue(1);
        queue.enqueue(2);
        queue.enqueue(3);

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.dequeue(), Some(1));
        queue.enqueue(4);
        assert_eq!(queue.dequeue(), Some(2));
        assert_eq!(queue.dequeue(), Some(3));
        assert_eq!(queue.dequeue(), Some(4));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_dequeue_empty_is_none() {
        let mut queue: TraversalQueue<usize> = TraversalQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.dequeue(), None);
    }
}
