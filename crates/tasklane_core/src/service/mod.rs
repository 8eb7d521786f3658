//! Task use-case services.
//!
//! # Responsibility
//! - Coordinate the authoritative store with the in-memory indices.
//! - Keep storage details out of composite queries.

pub mod analytics;
pub mod clock;
pub mod shared;
pub mod task_service;
