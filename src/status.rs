//! The sweep-line status: an ordered set of the segments crossing the sweep line.
//!
//! The set is stored as a sequence of sorted chunks, each a fixed-capacity
//! [`ArrayVec`]. Finding a position is a binary search over the chunks followed
//! by a binary search within one chunk, and inserting shifts at most one chunk's
//! worth of elements (splitting the chunk in half when it's full). Unlike a plain
//! binary search tree, there's no input that degrades this to linear time per
//! operation.
//!
//! The order isn't stored anywhere: every operation that needs it takes a
//! comparator. This matters because the sweep shortens segments while they're
//! in the set, so the "same" comparator can give slightly different answers over
//! time. See [`StatusLine::find`] for how we cope with that.

use std::cmp::Ordering;

use arrayvec::ArrayVec;

/// A position in a [`StatusLine`].
///
/// Cursors are invalidated by any insertion or removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    chunk: usize,
    offset: usize,
}

/// An ordered set, ordered by a comparator supplied to each operation.
#[derive(Clone, Debug)]
pub struct StatusLine<T, const B: usize = 32> {
    // Invariant: no chunk is empty.
    chunks: Vec<ArrayVec<T, B>>,
    len: usize,
}

impl<T, const B: usize> Default for StatusLine<T, B> {
    fn default() -> Self {
        Self {
            chunks: Vec::new(),
            len: 0,
        }
    }
}

impl<T: PartialEq, const B: usize> StatusLine<T, B> {
    /// The number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Are we empty?
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the element at a cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is stale and points past the end.
    pub fn get(&self, cursor: Cursor) -> &T {
        &self.chunks[cursor.chunk][cursor.offset]
    }

    /// The position of the smallest element.
    pub fn first(&self) -> Option<Cursor> {
        (!self.is_empty()).then_some(Cursor {
            chunk: 0,
            offset: 0,
        })
    }

    /// The position just after `cursor`.
    pub fn next(&self, cursor: Cursor) -> Option<Cursor> {
        if cursor.offset + 1 < self.chunks[cursor.chunk].len() {
            Some(Cursor {
                chunk: cursor.chunk,
                offset: cursor.offset + 1,
            })
        } else if cursor.chunk + 1 < self.chunks.len() {
            Some(Cursor {
                chunk: cursor.chunk + 1,
                offset: 0,
            })
        } else {
            None
        }
    }

    /// The position just before `cursor`.
    pub fn prev(&self, cursor: Cursor) -> Option<Cursor> {
        if cursor.offset > 0 {
            Some(Cursor {
                chunk: cursor.chunk,
                offset: cursor.offset - 1,
            })
        } else if cursor.chunk > 0 {
            let chunk = cursor.chunk - 1;
            Some(Cursor {
                chunk,
                offset: self.chunks[chunk].len() - 1,
            })
        } else {
            None
        }
    }

    /// Iterates over the elements in order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.chunks.iter().flatten()
    }

    // Returns the first position whose element doesn't satisfy `pred`, assuming
    // that `pred` is true for some prefix of the set and false afterwards.
    //
    // If every element satisfies `pred`, the returned position is one-past-the-end
    // (with `chunk == self.chunks.len()`).
    fn partition_point(&self, mut pred: impl FnMut(&T) -> bool) -> Cursor {
        let chunk = self
            .chunks
            .partition_point(|c| c.last().is_some_and(&mut pred));
        let offset = self
            .chunks
            .get(chunk)
            .map_or(0, |c| c.partition_point(&mut pred));
        Cursor { chunk, offset }
    }

    /// Inserts an element, returning its position.
    ///
    /// The new element goes before every element that isn't strictly less than it,
    /// so elements comparing equal to it end up after it.
    pub fn insert(&mut self, element: T, mut cmp: impl FnMut(&T, &T) -> Ordering) -> Cursor {
        let mut at = self.partition_point(|x| cmp(x, &element) == Ordering::Less);

        if self.chunks.is_empty() {
            self.chunks.push(ArrayVec::new());
        } else if at.chunk == self.chunks.len() {
            at.chunk -= 1;
            at.offset = self.chunks[at.chunk].len();
        }

        if self.chunks[at.chunk].is_full() {
            let tail: ArrayVec<T, B> = self.chunks[at.chunk].drain(B / 2..).collect();
            self.chunks.insert(at.chunk + 1, tail);
            if at.offset > B / 2 {
                at.chunk += 1;
                at.offset -= B / 2;
            }
        }

        self.chunks[at.chunk].insert(at.offset, element);
        self.len += 1;
        at
    }

    /// Finds the position of an element.
    ///
    /// Elements are matched by `==`, not just by `cmp`: when several elements compare
    /// equal to `element`, we return the one that actually is `element`. If the
    /// comparator has become inconsistent with the stored order (which can happen
    /// when floating-point rounding bends a segment while it's in the set), we
    /// fall back to a linear scan.
    pub fn find(&self, element: &T, mut cmp: impl FnMut(&T, &T) -> Ordering) -> Option<Cursor> {
        let mut cursor = self.partition_point(|x| cmp(x, element) == Ordering::Less);
        while cursor.chunk < self.chunks.len() {
            let x = self.get(cursor);
            if x == element {
                return Some(cursor);
            }
            if cmp(x, element) != Ordering::Equal {
                break;
            }
            match self.next(cursor) {
                Some(c) => cursor = c,
                None => break,
            }
        }

        let found = self.position(element);
        if found.is_some() {
            log::warn!("status line out of order; found element by linear scan");
        }
        found
    }

    fn position(&self, element: &T) -> Option<Cursor> {
        self.chunks.iter().enumerate().find_map(|(chunk, c)| {
            c.iter()
                .position(|x| x == element)
                .map(|offset| Cursor { chunk, offset })
        })
    }

    /// Removes and returns the element at `cursor`.
    pub fn remove(&mut self, cursor: Cursor) -> T {
        let element = self.chunks[cursor.chunk].remove(cursor.offset);
        if self.chunks[cursor.chunk].is_empty() {
            self.chunks.remove(cursor.chunk);
        }
        self.len -= 1;
        element
    }

    /// Checks that the chunks are well-formed and the elements are sorted by `cmp`.
    ///
    /// Used in tests, and when enabling slow-asserts.
    #[allow(dead_code)]
    pub fn check_invariants(&self, mut cmp: impl FnMut(&T, &T) -> Ordering) {
        assert!(self.chunks.iter().all(|c| !c.is_empty()));
        assert_eq!(self.len, self.chunks.iter().map(|c| c.len()).sum::<usize>());
        let mut iter = self.iter();
        if let Some(mut prev) = iter.next() {
            for x in iter {
                assert_ne!(cmp(prev, x), Ordering::Greater);
                prev = x;
            }
        }
    }
}
