//! Task domain model.
//!
//! # Responsibility
//! - Define the record shape shared by the store, the indices and callers.
//! - Define create/update payloads and canned templates.
//!
//! # Invariants
//! - Every record is identified by a store-assigned, immutable `TaskId`.
//! - Subtasks and time entries live and die with their parent task.

pub mod task;
pub mod template;
