//! Task store abstractions and implementations.
//!
//! # Responsibility
//! - Define the authoritative store contract the index service consumes.
//! - Isolate persistence details (in-memory vector, SQLite) from indexing.
//!
//! # Invariants
//! - Repository writes enforce `validate()` before persistence.
//! - Missing identifiers are reported as `None`/`false`, not errors.

pub mod sqlite_task_repo;
pub mod task_repo;
