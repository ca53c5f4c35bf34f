use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::VecDeque;

use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::gourd_asserts::gourd_assert_moderate;
use crate::propagation::Priority;

/// A queue with one FIFO per priority class. A key is in the queue at most once; enqueueing a key
/// which is already present has no effect. Popping takes the front of the best non-empty class.
#[derive(Debug, Clone)]
pub(crate) struct EventQueue<Key> {
    queues: Vec<VecDeque<Key>>,
    is_enqueued: KeyedVec<Key, bool>,
    num_enqueued: usize,
    present_priorities: BinaryHeap<Reverse<u32>>,
}

impl<Key: StorageKey> Default for EventQueue<Key> {
    fn default() -> Self {
        Self::new(Priority::NUM_PRIORITIES)
    }
}

impl<Key: StorageKey> EventQueue<Key> {
    pub(crate) fn new(num_priority_levels: u32) -> EventQueue<Key> {
        EventQueue {
            queues: (0..num_priority_levels).map(|_| VecDeque::new()).collect(),
            is_enqueued: KeyedVec::default(),
            num_enqueued: 0,
            present_priorities: BinaryHeap::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.num_enqueued == 0
    }

    pub(crate) fn len(&self) -> usize {
        self.num_enqueued
    }

    pub(crate) fn enqueue(&mut self, key: Key, priority: Priority) {
        let level = (priority as usize).min(self.queues.len() - 1);
        if self.is_enqueued(key) {
            return;
        }

        self.is_enqueued.accomodate(key, false);
        self.is_enqueued[key] = true;
        self.num_enqueued += 1;

        if self.queues[level].is_empty() {
            self.present_priorities.push(Reverse(level as u32));
        }
        self.queues[level].push_back(key);
    }

    pub(crate) fn pop(&mut self) -> Option<Key> {
        let top_priority = self.present_priorities.peek()?.0 as usize;
        gourd_assert_moderate!(!self.queues[top_priority].is_empty());

        let next = self.queues[top_priority].pop_front();

        if let Some(key) = next {
            self.is_enqueued[key] = false;
            self.num_enqueued -= 1;

            if self.queues[top_priority].is_empty() {
                let _ = self.present_priorities.pop();
            }
        }

        next
    }

    pub(crate) fn is_enqueued(&self, key: Key) -> bool {
        self.is_enqueued.get(key).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::EventQueue;
    use crate::propagation::Priority;
    use crate::propagation::PropagatorId;

    #[test]
    fn pops_by_priority_then_insertion_order() {
        let mut queue = EventQueue::default();

        queue.enqueue(PropagatorId(1), Priority::High);
        queue.enqueue(PropagatorId(0), Priority::Medium);
        queue.enqueue(PropagatorId(3), Priority::VeryLow);
        queue.enqueue(PropagatorId(5), Priority::Medium);
        queue.enqueue(PropagatorId(4), Priority::Low);

        assert_eq!(Some(PropagatorId(1)), queue.pop());
        assert_eq!(Some(PropagatorId(0)), queue.pop());
        assert_eq!(Some(PropagatorId(5)), queue.pop());
        assert_eq!(Some(PropagatorId(4)), queue.pop());
        assert_eq!(Some(PropagatorId(3)), queue.pop());
        assert_eq!(None, queue.pop());
    }

    #[test]
    fn keys_are_queued_at_most_once() {
        let mut queue = EventQueue::default();

        queue.enqueue(PropagatorId(2), Priority::Low);
        queue.enqueue(PropagatorId(2), Priority::High);
        assert_eq!(1, queue.len());

        assert_eq!(Some(PropagatorId(2)), queue.pop());
        assert!(queue.is_empty());
        queue.enqueue(PropagatorId(2), Priority::High);
        assert!(queue.is_enqueued(PropagatorId(2)));
    }
}
