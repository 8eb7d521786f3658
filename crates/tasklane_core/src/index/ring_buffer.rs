//! Fixed-capacity FIFO ring buffer.
//!
//! # Invariants
//! - `len <= capacity` at all times.
//! - Logical position `i` lives at slot `(head + i) % capacity`.
//! - `enqueue` never evicts; only [`RingBuffer::push_evicting`] drops the
//!   oldest item to make room.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::iter::FusedIterator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingBufferError {
    /// Resize target does not exceed the number of stored items.
    CapacityTooSmall { requested: usize, len: usize },
}

impl Display for RingBufferError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CapacityTooSmall { requested, len } => write!(
                f,
                "new capacity {requested} must be larger than current size {len}"
            ),
        }
    }
}

impl Error for RingBufferError {}

#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    slots: Vec<Option<T>>,
    head: usize,
    len: usize,
}

impl<T> RingBuffer<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            head: 0,
            len: 0,
        }
    }

    /// Appends at the tail; returns `false` without side effects when full.
    pub fn enqueue(&mut self, item: T) -> bool {
        if self.is_full() {
            return false;
        }
        let tail = self.physical(self.len);
        self.slots[tail] = Some(item);
        self.len += 1;
        true
    }

    pub fn dequeue(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let item = self.slots[self.head].take();
        self.head = (self.head + 1) % self.capacity();
        self.len -= 1;
        item
    }

    /// Appends at the tail, evicting and returning the oldest item when full.
    ///
    /// With zero capacity the item itself is handed back.
    pub fn push_evicting(&mut self, item: T) -> Option<T> {
        if self.capacity() == 0 {
            return Some(item);
        }
        let evicted = if self.is_full() { self.dequeue() } else { None };
        self.enqueue(item);
        evicted
    }

    pub fn peek(&self) -> Option<&T> {
        self.get(0)
    }

    /// Item at logical position `index`, counted from the oldest.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        self.slots[self.physical(index)].as_ref()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.head = 0;
        self.len = 0;
    }

    /// Reallocates to `new_capacity`, re-linearizing items from slot 0.
    ///
    /// # Errors
    /// - [`RingBufferError::CapacityTooSmall`] when `new_capacity <= len()`.
    pub fn resize(&mut self, new_capacity: usize) -> Result<(), RingBufferError> {
        if new_capacity <= self.len {
            return Err(RingBufferError::CapacityTooSmall {
                requested: new_capacity,
                len: self.len,
            });
        }

        let mut slots: Vec<Option<T>> = Vec::with_capacity(new_capacity);
        for offset in 0..self.len {
            let index = self.physical(offset);
            slots.push(self.slots[index].take());
        }
        slots.resize_with(new_capacity, || None);

        self.slots = slots;
        self.head = 0;
        Ok(())
    }

    /// Enqueues until the buffer fills; returns how many were accepted.
    pub fn enqueue_many<I: IntoIterator<Item = T>>(&mut self, items: I) -> usize {
        let mut accepted = 0;
        for item in items {
            if !self.enqueue(item) {
                break;
            }
            accepted += 1;
        }
        accepted
    }

    /// Dequeues up to `count` items, oldest first.
    pub fn dequeue_many(&mut self, count: usize) -> Vec<T> {
        let mut drained = Vec::with_capacity(count.min(self.len));
        while drained.len() < count {
            match self.dequeue() {
                Some(item) => drained.push(item),
                None => break,
            }
        }
        drained
    }

    /// Moves the first `k mod len` items to the back (negative `k` rotates
    /// the other way).
    ///
    /// A full buffer only shifts its head pointer; otherwise the rotated
    /// items are cycled through the tail.
    pub fn rotate(&mut self, k: isize) {
        if self.is_empty() {
            return;
        }
        let rotations = k.rem_euclid(self.len as isize) as usize;
        if rotations == 0 {
            return;
        }
        if self.is_full() {
            self.head = self.physical(rotations);
            return;
        }
        for _ in 0..rotations {
            if let Some(item) = self.dequeue() {
                self.enqueue(item);
            }
        }
    }

    /// Oldest-to-newest traversal; `.rev()` walks newest-to-oldest.
    ///
    /// Each call starts a fresh traversal from the current head.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            buffer: self,
            front: 0,
            back: self.len,
        }
    }

    pub fn contains_by<F>(&self, item: &T, eq: F) -> bool
    where
        F: Fn(&T, &T) -> bool,
    {
        self.index_of_by(item, eq).is_some()
    }

    pub fn index_of_by<F>(&self, item: &T, eq: F) -> Option<usize>
    where
        F: Fn(&T, &T) -> bool,
    {
        self.iter().position(|candidate| eq(candidate, item))
    }

    fn physical(&self, offset: usize) -> usize {
        (self.head + offset) % self.capacity()
    }
}

impl<T: PartialEq> RingBuffer<T> {
    pub fn contains(&self, item: &T) -> bool {
        self.contains_by(item, |a, b| a == b)
    }

    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.index_of_by(item, |a, b| a == b)
    }
}

impl<T: Clone> RingBuffer<T> {
    /// Oldest-to-newest snapshot.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<'a, T> IntoIterator for &'a RingBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing traversal over a [`RingBuffer`].
pub struct Iter<'a, T> {
    buffer: &'a RingBuffer<T>,
    front: usize,
    back: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let item = self.buffer.get(self.front);
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.buffer.get(self.back)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
