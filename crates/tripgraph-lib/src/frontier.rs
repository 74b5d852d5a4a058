//! Priority worklist for best-first search.
//!
//! Entries are ordered by ascending priority. Entries with equal priority come
//! out in the order they were pushed: each push is stamped with a monotonically
//! increasing sequence number that acts as the secondary key.
//!
//! The frontier never deduplicates. A caller that finds a cheaper way to an
//! already-queued item pushes a second entry and discards the stale one when it
//! is eventually popped.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use thiserror::Error;

use crate::error::{Error, Result};

/// Returned by [`PriorityFrontier::pop_min`] when no entries remain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("frontier is empty")]
pub struct FrontierEmpty;

#[derive(Debug)]
struct Entry<T> {
    priority: f64,
    sequence: u64,
    item: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by priority, then
        // by discovery order.
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Min-priority queue with stable (first-in, first-out) tie-breaking.
#[derive(Debug)]
pub struct PriorityFrontier<T> {
    heap: BinaryHeap<Entry<T>>,
    next_sequence: u64,
}

impl<T> Default for PriorityFrontier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PriorityFrontier<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            next_sequence: 0,
        }
    }

    /// Insert `item` with the given priority.
    ///
    /// Fails with [`Error::ResourceExhausted`] if the queue cannot grow.
    pub fn push(&mut self, item: T, priority: f64) -> Result<()> {
        self.heap
            .try_reserve(1)
            .map_err(|_| Error::ResourceExhausted {
                context: "search frontier",
            })?;
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(Entry {
            priority,
            sequence,
            item,
        });
        Ok(())
    }

    /// Remove and return the entry with the lowest priority.
    pub fn pop_min(&mut self) -> std::result::Result<T, FrontierEmpty> {
        self.heap.pop().map(|entry| entry.item).ok_or(FrontierEmpty)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Total number of pushes since construction.
    pub fn pushed(&self) -> u64 {
        self.next_sequence
    }
}
