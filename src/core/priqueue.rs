//! Stable sorted wait queue.
//!
//! Elements are kept in the order defined by a caller-supplied [`Comparator`].
//! Unlike a binary heap, the queue exposes positional access and removal, and
//! it is stable: an element offered after others that compare equal lands
//! behind all of them.

use std::cmp::Ordering;
use std::collections::VecDeque;

/// Two-argument ordering; `Less` means `a` ranks ahead of `b`.
pub trait Comparator<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

#[derive(Debug, Clone)]
pub struct PriQueue<T, C> {
    items: VecDeque<T>,
    comparator: C,
}

impl<T, C: Comparator<T>> PriQueue<T, C> {
    pub fn new(comparator: C) -> Self {
        Self {
            items: VecDeque::new(),
            comparator,
        }
    }

    /// Insert `item` ahead of the first element it strictly outranks and
    /// return the zero-based index it landed at.
    pub fn offer(&mut self, item: T) -> usize {
        let index = self
            .items
            .iter()
            .position(|existing| self.comparator.compare(&item, existing) == Ordering::Less)
            .unwrap_or(self.items.len());
        self.items.insert(index, item);
        index
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn poll(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    pub fn at(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        self.items.remove(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: PartialEq, C: Comparator<T>> PriQueue<T, C> {
    /// Remove every element equal to `item` by identity, ignoring the
    /// comparator. Returns how many were removed.
    pub fn remove(&mut self, item: &T) -> usize {
        let before = self.items.len();
        self.items.retain(|existing| existing != item);
        before - self.items.len()
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn by_rank(a: &(u8, usize), b: &(u8, usize)) -> Ordering {
        a.0.cmp(&b.0)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Contents stay sorted and equal ranks keep their offer order.
        #[test]
        fn sorted_and_stable(ranks in prop::collection::vec(0u8..6, 0..64)) {
            let mut q = PriQueue::new(by_rank);
            for (seq, rank) in ranks.iter().enumerate() {
                q.offer((*rank, seq));
            }

            let items: Vec<_> = q.iter().copied().collect();
            for pair in items.windows(2) {
                prop_assert!(pair[0].0 < pair[1].0 || (pair[0].0 == pair[1].0 && pair[0].1 < pair[1].1));
            }
            prop_assert_eq!(q.len(), ranks.len());
        }

        /// `offer` then `remove_at` of the returned index gives the item back.
        #[test]
        fn offer_remove_at_round_trip(
            ranks in prop::collection::vec(0u8..6, 0..32),
            rank in 0u8..6,
        ) {
            let mut q = PriQueue::new(by_rank);
            for (seq, rank) in ranks.iter().enumerate() {
                q.offer((*rank, seq));
            }
            let before = q.len();
            let item = (rank, usize::MAX);

            let index = q.offer(item);
            prop_assert_eq!(q.at(index), Some(&item));
            prop_assert_eq!(q.remove_at(index), Some(item));
            prop_assert_eq!(q.len(), before);
        }

        /// Identity removal drops every copy and leaves the rest in order.
        #[test]
        fn remove_drops_all_copies_in_place(
            entries in prop::collection::vec((0u8..4, 0usize..3), 0..48),
            target in (0u8..4, 0usize..3),
        ) {
            let mut q = PriQueue::new(by_rank);
            for entry in &entries {
                q.offer(*entry);
            }
            let copies = entries.iter().filter(|entry| **entry == target).count();
            let survivors: Vec<_> = q.iter().copied().filter(|entry| *entry != target).collect();

            prop_assert_eq!(q.remove(&target), copies);
            prop_assert_eq!(q.iter().copied().collect::<Vec<_>>(), survivors);
            prop_assert_eq!(q.remove(&target), 0);
        }

        /// Polling drains in the same order as iteration.
        #[test]
        fn poll_matches_iteration(ranks in prop::collection::vec(any::<u8>(), 0..64)) {
            let mut q = PriQueue::new(by_rank);
            for (seq, rank) in ranks.iter().enumerate() {
                q.offer((*rank, seq));
            }
            let expected: Vec<_> = q.iter().copied().collect();
            let mut drained = Vec::new();
            while let Some(item) = q.poll() {
                drained.push(item);
            }
            prop_assert_eq!(drained, expected);
        }
    }
}
