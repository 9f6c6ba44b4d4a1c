//! The event queue: a binary min-heap with a caller-supplied comparator.
//!
//! We can't use `std::collections::BinaryHeap` because the order of two events
//! depends on data that lives outside the queue (their partner events, in the
//! event arena), so the comparator is passed in on every operation instead of
//! being baked into an `Ord` impl. Callers must pass the same comparator every
//! time; nothing checks this.

use std::cmp::Ordering;

/// A min-heap whose order is given by a comparison function.
#[derive(Clone, Debug)]
pub struct EventQueue<T> {
    heap: Vec<T>,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self { heap: Vec::new() }
    }
}

impl<T> EventQueue<T> {
    /// Creates an empty queue with room for `cap` items before reallocating.
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            heap: Vec::with_capacity(cap),
        }
    }

    /// The number of queued items.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Is the queue empty?
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// The smallest item, if there is one.
    pub fn peek(&self) -> Option<&T> {
        self.heap.first()
    }

    /// Adds an item to the queue, in `O(log n)` comparisons.
    pub fn push(&mut self, item: T, mut cmp: impl FnMut(&T, &T) -> Ordering) {
        self.heap.push(item);
        self.lift(self.heap.len() - 1, &mut cmp);
    }

    /// Removes and returns the smallest item, in `O(log n)` comparisons.
    pub fn pop(&mut self, mut cmp: impl FnMut(&T, &T) -> Ordering) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }
        // swap_remove moves the last leaf to the root, which then sinks back down.
        let top = self.heap.swap_remove(0);
        if !self.heap.is_empty() {
            self.down(0, &mut cmp);
        }
        Some(top)
    }

    // Moves the item at `pos` up until its parent is no bigger.
    fn lift(&mut self, mut pos: usize, cmp: &mut impl FnMut(&T, &T) -> Ordering) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if cmp(&self.heap[pos], &self.heap[parent]) != Ordering::Less {
                break;
            }
            self.heap.swap(pos, parent);
            pos = parent;
        }
    }

    // Moves the item at `pos` down until both children are no smaller.
    fn down(&mut self, mut pos: usize, cmp: &mut impl FnMut(&T, &T) -> Ordering) {
        let len = self.heap.len();
        let half = len / 2;
        while pos < half {
            let mut best = 2 * pos + 1;
            let right = best + 1;
            if right < len && cmp(&self.heap[right], &self.heap[best]) == Ordering::Less {
                best = right;
            }
            if cmp(&self.heap[best], &self.heap[pos]) != Ordering::Less {
                break;
            }
            self.heap.swap(pos, best);
            pos = best;
        }
    }

    #[cfg(test)]
    fn check_invariants(&self, mut cmp: impl FnMut(&T, &T) -> Ordering) {
        for i in 1..self.heap.len() {
            let parent = (i - 1) / 2;
            assert_ne!(cmp(&self.heap[i], &self.heap[parent]), Ordering::Less);
        }
    }
}
