//! Mutual-exclusion wrapper around the index service.
//!
//! # Responsibility
//! - Serialize every coordinator call behind one lock for multi-threaded hosts.
//!
//! # Invariants
//! - Each closure observes and leaves the coordinator in a consistent state;
//!   calls from different threads never interleave.
//! - A poisoned lock is recovered; callers can run
//!   [`TaskIndexService::refresh`] to rebuild indices from the store.

use crate::repo::task_repo::TaskRepository;
use crate::service::task_service::TaskIndexService;
use log::warn;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub struct SharedTaskService<R: TaskRepository> {
    inner: Mutex<TaskIndexService<R>>,
}

impl<R: TaskRepository> SharedTaskService<R> {
    pub fn new(service: TaskIndexService<R>) -> Self {
        Self {
            inner: Mutex::new(service),
        }
    }

    /// Runs a mutating operation as one critical section.
    pub fn with<T>(&self, operation: impl FnOnce(&mut TaskIndexService<R>) -> T) -> T {
        let mut guard = self.lock();
        operation(&mut guard)
    }

    /// Runs a read-only operation as one critical section.
    pub fn read<T>(&self, operation: impl FnOnce(&TaskIndexService<R>) -> T) -> T {
        let guard = self.lock();
        operation(&guard)
    }

    pub fn into_inner(self) -> TaskIndexService<R> {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> MutexGuard<'_, TaskIndexService<R>> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("event=service_lock module=service status=recovered reason=poisoned");
            poisoned.into_inner()
        })
    }
}
