//! Task store contract and in-memory implementation.
//!
//! # Responsibility
//! - Define the authoritative CRUD surface the index service builds on.
//! - Provide a process-local store with sequential identifiers.
//!
//! # Invariants
//! - Write paths call `validate()` before mutating stored state.
//! - `list_tasks` returns records in creation order.
//! - Identifiers are never reused within one store instance.

use crate::db::DbError;
use crate::model::task::{now_epoch_ms, Task, TaskDraft, TaskId, TaskPatch, TaskValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Store-level failure.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaskValidationError),
    Db(DbError),
    Serialization(serde_json::Error),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "task document encoding failed: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Authoritative task store consumed by the index service.
///
/// Lookups report absence through `Option`/`bool`, not errors.
pub trait TaskRepository {
    /// Persists a new task and returns it with store-assigned fields set.
    fn create_task(&mut self, draft: &TaskDraft) -> RepoResult<Task>;

    /// All tasks in creation order.
    fn list_tasks(&self) -> RepoResult<Vec<Task>>;

    fn get_task(&self, id: &str) -> RepoResult<Option<Task>>;

    /// Applies `patch`, bumps `updated_at`, and returns the stored result.
    fn update_task(&mut self, id: &str, patch: &TaskPatch) -> RepoResult<Option<Task>>;

    /// Returns whether a task was removed.
    fn delete_task(&mut self, id: &str) -> RepoResult<bool>;

    fn list_completed(&self) -> RepoResult<Vec<Task>> {
        Ok(self
            .list_tasks()?
            .into_iter()
            .filter(|task| task.completed)
            .collect())
    }

    fn list_pending(&self) -> RepoResult<Vec<Task>> {
        Ok(self
            .list_tasks()?
            .into_iter()
            .filter(|task| !task.completed)
            .collect())
    }
}

/// Volatile store keeping tasks in a vector.
///
/// Identifiers are decimal strings counting up from `1`.
#[derive(Debug, Clone)]
pub struct InMemoryTaskRepository {
    tasks: Vec<Task>,
    next_id: u64,
}

impl Default for InMemoryTaskRepository {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
        }
    }
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }
}

impl TaskRepository for InMemoryTaskRepository {
    fn create_task(&mut self, draft: &TaskDraft) -> RepoResult<Task> {
        draft.validate()?;

        let id: TaskId = self.next_id.to_string();
        let task = Task::from_draft(id, draft, now_epoch_ms());
        self.next_id += 1;
        self.tasks.push(task.clone());
        Ok(task)
    }

    fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        Ok(self.tasks.clone())
    }

    fn get_task(&self, id: &str) -> RepoResult<Option<Task>> {
        Ok(self.position(id).map(|index| self.tasks[index].clone()))
    }

    fn update_task(&mut self, id: &str, patch: &TaskPatch) -> RepoResult<Option<Task>> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };

        let mut updated = self.tasks[index].clone();
        updated.apply_patch(patch, now_epoch_ms());
        updated.validate()?;

        self.tasks[index] = updated.clone();
        Ok(Some(updated))
    }

    fn delete_task(&mut self, id: &str) -> RepoResult<bool> {
        match self.position(id) {
            Some(index) => {
                self.tasks.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
