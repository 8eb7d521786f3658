//! Multi-index task engine.
//! The store is authoritative; every index here is a rebuildable cache.

pub mod config;
pub mod db;
pub mod index;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{FuzzyMode, IndexConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{
    Frequency, RecurrenceEnd, RecurrenceRule, Subtask, SubtaskDraft, SubtaskPatch, Task,
    TaskDraft, TaskId, TaskPatch, TaskValidationError, TimeEntry,
};
pub use model::template::{TaskTemplate, TemplateCatalog};
pub use repo::sqlite_task_repo::SqliteTaskRepository;
pub use repo::task_repo::{InMemoryTaskRepository, RepoError, RepoResult, TaskRepository};
pub use service::analytics::TaskAnalytics;
pub use service::clock::{Clock, ManualClock, SystemClock};
pub use service::shared::SharedTaskService;
pub use service::task_service::{SearchOptions, ServiceError, ServiceResult, TaskIndexService};

/// Minimal health-check API for embedding hosts.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
