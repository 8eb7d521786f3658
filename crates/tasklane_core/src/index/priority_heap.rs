//! Binary heap ordered by an injected comparator.
//!
//! # Invariants
//! - `peek()` is always the comparator-least element: for every pair `a`
//!   before `b` in pop order, `compare(a, b) != Greater`.
//! - Ties have no guaranteed order.

use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Three-way ordering: `Less` means the first argument is served first.
pub type Comparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// The item to re-key is not in the heap.
    ItemNotFound,
    /// The new key does not order strictly before the old one.
    NotDecreasing,
}

impl Display for HeapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ItemNotFound => write!(f, "item is not present in the heap"),
            Self::NotDecreasing => {
                write!(f, "new key must order strictly before the current key")
            }
        }
    }
}

impl Error for HeapError {}

pub struct PriorityHeap<T> {
    items: Vec<T>,
    comparator: Comparator<T>,
}

impl<T: Ord + 'static> PriorityHeap<T> {
    /// Min-heap over the natural ordering of `T`.
    pub fn new() -> Self {
        Self::with_comparator(|a: &T, b: &T| a.cmp(b))
    }
}

impl<T: Ord + 'static> Default for PriorityHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PriorityHeap<T> {
    pub fn with_comparator<F>(comparator: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        Self {
            items: Vec::new(),
            comparator: Arc::new(comparator),
        }
    }

    pub fn enqueue(&mut self, item: T) {
        self.items.push(item);
        let last = self.items.len() - 1;
        sift_up(&mut self.items, last, self.comparator.as_ref());
    }

    pub fn dequeue(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let root = self.items.swap_remove(0);
        if !self.items.is_empty() {
            sift_down(&mut self.items, 0, self.comparator.as_ref());
        }
        Some(root)
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Items in internal array order, not pop order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Pops everything in order, leaving the heap empty.
    pub fn drain_sorted(&mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.items.len());
        while let Some(item) = self.dequeue() {
            sorted.push(item);
        }
        sorted
    }

    pub fn into_sorted_vec(mut self) -> Vec<T> {
        self.drain_sorted()
    }
}

impl<T: PartialEq> PriorityHeap<T> {
    /// Replaces `old` with `new` and restores heap order upward.
    ///
    /// Locates `old` by linear scan, so the whole operation is O(n).
    ///
    /// # Errors
    /// - [`HeapError::ItemNotFound`] when `old` is absent.
    /// - [`HeapError::NotDecreasing`] when `new` does not order strictly
    ///   before `old`; the heap is left unchanged.
    pub fn decrease_key(&mut self, old: &T, new: T) -> Result<(), HeapError> {
        let index = self
            .items
            .iter()
            .position(|item| item == old)
            .ok_or(HeapError::ItemNotFound)?;
        if (self.comparator)(&new, old) != Ordering::Less {
            return Err(HeapError::NotDecreasing);
        }
        self.items[index] = new;
        sift_up(&mut self.items, index, self.comparator.as_ref());
        Ok(())
    }
}

impl<T: Clone> PriorityHeap<T> {
    /// First `k` items in pop order, computed on a private copy.
    pub fn peek_top_k(&self, k: usize) -> Vec<T> {
        let mut scratch = self.items.clone();
        let take = k.min(scratch.len());
        let mut top = Vec::with_capacity(take);
        for _ in 0..take {
            let item = scratch.swap_remove(0);
            if !scratch.is_empty() {
                sift_down(&mut scratch, 0, self.comparator.as_ref());
            }
            top.push(item);
        }
        top
    }

    /// Whole heap in pop order without draining it.
    pub fn sorted_snapshot(&self) -> Vec<T> {
        self.peek_top_k(self.items.len())
    }
}

impl<T: Clone> Clone for PriorityHeap<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            comparator: Arc::clone(&self.comparator),
        }
    }
}

impl<T> Extend<T> for PriorityHeap<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.enqueue(item);
        }
    }
}

fn sift_up<T>(
    items: &mut [T],
    mut index: usize,
    compare: &(dyn Fn(&T, &T) -> Ordering + Send + Sync),
) {
    while index > 0 {
        let parent = (index - 1) / 2;
        if compare(&items[index], &items[parent]) != Ordering::Less {
            break;
        }
        items.swap(index, parent);
        index = parent;
    }
}

fn sift_down<T>(
    items: &mut [T],
    mut index: usize,
    compare: &(dyn Fn(&T, &T) -> Ordering + Send + Sync),
) {
    let len = items.len();
    loop {
        let left = 2 * index + 1;
        let right = left + 1;
        let mut first = index;

        if left < len && compare(&items[left], &items[first]) == Ordering::Less {
            first = left;
        }
        if right < len && compare(&items[right], &items[first]) == Ordering::Less {
            first = right;
        }
        if first == index {
            break;
        }
        items.swap(index, first);
        index = first;
    }
}
