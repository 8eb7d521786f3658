//! SQLite-backed task store.
//!
//! # Responsibility
//! - Persist tasks durably so indices can be rebuilt after restart.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Each row stores the full task as a JSON document in `body`.
//! - `priority`/`completed` columns mirror the document for SQL filtering.
//! - The document's `id` always equals the row's `id` column.
//! - Read paths reject documents that fail validation instead of masking them.

use crate::model::task::{now_epoch_ms, Task, TaskDraft, TaskPatch};
use crate::repo::task_repo::{RepoError, RepoResult, TaskRepository};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT id, body FROM tasks";

/// Task store over a migrated SQLite connection.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Wraps a connection opened through [`crate::db::open_db`] or
    /// [`crate::db::open_db_in_memory`].
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_tasks(&self, sql: &str) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn write_task(&self, task: &Task) -> RepoResult<usize> {
        let body = serde_json::to_string(task)?;
        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                priority = ?1,
                completed = ?2,
                body = ?3,
                updated_at = ?4
             WHERE id = ?5;",
            params![
                i64::from(task.priority),
                bool_to_int(task.completed),
                body,
                task.updated_at,
                task.id.as_str(),
            ],
        )?;
        Ok(changed)
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&mut self, draft: &TaskDraft) -> RepoResult<Task> {
        draft.validate()?;

        let now = now_epoch_ms();
        let tx = self.conn.unchecked_transaction()?;
        let placeholder = Uuid::new_v4().to_string();
        tx.execute(
            "INSERT INTO tasks (id, priority, completed, body, created_at, updated_at)
             VALUES (?1, ?2, ?3, '{}', ?4, ?4);",
            params![
                placeholder,
                i64::from(draft.priority),
                bool_to_int(draft.completed),
                now,
            ],
        )?;
        let seq = tx.last_insert_rowid();

        let task = Task::from_draft(seq.to_string(), draft, now);
        tx.execute(
            "UPDATE tasks SET id = ?1, body = ?2 WHERE seq = ?3;",
            params![task.id.as_str(), serde_json::to_string(&task)?, seq],
        )?;
        tx.commit()?;

        Ok(task)
    }

    fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        self.query_tasks(&format!("{TASK_SELECT_SQL} ORDER BY seq ASC"))
    }

    fn get_task(&self, id: &str) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1"))?;
        let raw = stmt
            .query_row([id], |row| {
                Ok((row.get::<_, String>("id")?, row.get::<_, String>("body")?))
            })
            .optional()?;

        raw.map(|(id, body)| decode_task(id, &body)).transpose()
    }

    fn update_task(&mut self, id: &str, patch: &TaskPatch) -> RepoResult<Option<Task>> {
        let Some(mut task) = self.get_task(id)? else {
            return Ok(None);
        };

        task.apply_patch(patch, now_epoch_ms());
        task.validate()?;

        if self.write_task(&task)? == 0 {
            return Ok(None);
        }
        Ok(Some(task))
    }

    fn delete_task(&mut self, id: &str) -> RepoResult<bool> {
        let changed = self.conn.execute("DELETE FROM tasks WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn list_completed(&self) -> RepoResult<Vec<Task>> {
        self.query_tasks(&format!(
            "{TASK_SELECT_SQL} WHERE completed = 1 ORDER BY seq ASC"
        ))
    }

    fn list_pending(&self) -> RepoResult<Vec<Task>> {
        self.query_tasks(&format!(
            "{TASK_SELECT_SQL} WHERE completed = 0 ORDER BY seq ASC"
        ))
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id: String = row.get("id")?;
    let body: String = row.get("body")?;
    decode_task(id, &body)
}

fn decode_task(id: String, body: &str) -> RepoResult<Task> {
    let task: Task = serde_json::from_str(body).map_err(|err| {
        RepoError::InvalidData(format!("undecodable body for task `{id}`: {err}"))
    })?;
    if task.id != id {
        return Err(RepoError::InvalidData(format!(
            "body id `{}` does not match row id `{id}`",
            task.id
        )));
    }
    task.validate()?;
    Ok(task)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
