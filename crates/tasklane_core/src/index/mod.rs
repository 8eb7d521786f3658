//! In-memory index structures mirrored from the task store.
//!
//! # Responsibility
//! - Provide the leaf data structures the task service keeps in sync:
//!   hash lookup, priority ordering, recency, text search and dependencies.
//!
//! # Invariants
//! - Structures are generic and know nothing about tasks; coherence across
//!   them is owned by `service::task_service`.
//! - Lookup misses are `None`/empty results, never errors.

pub mod dep_graph;
pub mod hash_index;
pub mod priority_heap;
pub mod ring_buffer;
pub mod trie;

pub use dep_graph::DependencyGraph;
pub use hash_index::{fold_hash, HashIndex};
pub use priority_heap::{HeapError, PriorityHeap};
pub use ring_buffer::{RingBuffer, RingBufferError};
pub use trie::Trie;
