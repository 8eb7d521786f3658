//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical record managed by the store and mirrored by indices.
//! - Provide validation and derived helpers (overdue, progress, open timer).
//!
//! # Invariants
//! - `id` is assigned by the store and never changes afterwards.
//! - `priority` stays within `MIN_PRIORITY..=MAX_PRIORITY`.
//! - At most one time entry is open (`end_time == None`); `validate`
//!   rejects records with more.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable record identifier assigned by the store.
pub type TaskId = String;
/// Identifier of a subtask, unique within its parent task.
pub type SubtaskId = String;
/// Identifier of a time entry, unique within its parent task.
pub type TimeEntryId = String;

pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 5;
pub const DEFAULT_PRIORITY: u8 = 3;

/// Returns the current wall-clock time as Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or_default()
}

/// Generates an identifier for task-owned child items.
pub fn new_child_id() -> String {
    Uuid::new_v4().to_string()
}

/// Copies every field set in a [`TaskPatch`] onto a `Task` or `TaskDraft`.
///
/// Both targets name these fields identically; a field added to the patch
/// must be listed here.
macro_rules! overlay_patch {
    (@cloned $target:ident, $patch:ident; $($field:ident),+) => {
        $(
            if let Some(value) = &$patch.$field {
                $target.$field = value.clone();
            }
        )+
    };
    (@copied $target:ident, $patch:ident; $($field:ident),+) => {
        $(
            if let Some(value) = $patch.$field {
                $target.$field = value;
            }
        )+
    };
    ($target:expr, $patch:expr) => {{
        let target = &mut *$target;
        let patch: &TaskPatch = $patch;
        overlay_patch!(@cloned target, patch;
            title, description, tags, category, subtasks, dependencies, time_entries, assignee);
        overlay_patch!(@copied target, patch;
            priority, completed, due_date, estimated_time, actual_time, recurring, progress);
    }};
}

/// Validation failures for task payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    BlankTitle,
    PriorityOutOfRange(u8),
    ProgressOutOfRange(u8),
    InvalidTimeEntry {
        entry_id: TimeEntryId,
        start: i64,
        end: i64,
    },
    ZeroRecurrenceInterval,
    BlankSubtaskTitle,
    MultipleOpenTimeEntries(usize),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "title must not be blank"),
            Self::PriorityOutOfRange(value) => write!(
                f,
                "priority {value} is outside {MIN_PRIORITY}..={MAX_PRIORITY}"
            ),
            Self::ProgressOutOfRange(value) => {
                write!(f, "progress {value} is outside 0..=100")
            }
            Self::InvalidTimeEntry {
                entry_id,
                start,
                end,
            } => write!(
                f,
                "time entry {entry_id}: end_time ({end}) must be >= start_time ({start})"
            ),
            Self::ZeroRecurrenceInterval => write!(f, "recurrence interval must be >= 1"),
            Self::BlankSubtaskTitle => write!(f, "subtask title must not be blank"),
            Self::MultipleOpenTimeEntries(count) => {
                write!(f, "{count} time entries are open; at most one may be")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// Checklist item owned by exactly one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: SubtaskId,
    pub title: String,
    pub completed: bool,
    /// Minutes.
    #[serde(default)]
    pub estimated_time: Option<u32>,
    /// Minutes.
    #[serde(default)]
    pub actual_time: Option<u32>,
}

/// One tracked work interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: TimeEntryId,
    /// Unix epoch milliseconds.
    pub start_time: i64,
    /// Unix epoch milliseconds; `None` while the timer runs.
    #[serde(default)]
    pub end_time: Option<i64>,
    /// Whole minutes, `0` until stopped.
    pub duration: u32,
    #[serde(default)]
    pub description: Option<String>,
}

impl TimeEntry {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Optional stop condition for a recurrence rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceEnd {
    /// Last occurrence no later than this epoch-ms timestamp.
    Until(i64),
    /// Fixed number of occurrences.
    Count(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    /// Every N periods of `frequency`.
    pub interval: u32,
    #[serde(default)]
    pub end: Option<RecurrenceEnd>,
}

/// Canonical task record.
///
/// The store owns these; every index holds a snapshot copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// 1..=5, higher is more urgent.
    pub priority: u8,
    pub completed: bool,
    /// Unix epoch milliseconds.
    #[serde(default)]
    pub due_date: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    /// Prerequisites that must complete before this task.
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
    #[serde(default)]
    pub time_entries: Vec<TimeEntry>,
    /// Minutes.
    #[serde(default)]
    pub estimated_time: Option<u32>,
    /// Minutes.
    #[serde(default)]
    pub actual_time: Option<u32>,
    #[serde(default)]
    pub recurring: Option<RecurrenceRule>,
    /// Name of the template this task was created from.
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub assignee: Option<String>,
    /// Manual progress override, 0..=100.
    #[serde(default)]
    pub progress: Option<u8>,
}

impl Task {
    /// Materializes a draft into a stored record.
    ///
    /// Used by store implementations; the draft is not validated here.
    pub fn from_draft(id: TaskId, draft: &TaskDraft, now_ms: i64) -> Self {
        Self {
            id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            priority: draft.priority,
            completed: draft.completed,
            due_date: draft.due_date,
            created_at: now_ms,
            updated_at: now_ms,
            tags: draft.tags.clone(),
            category: draft.category.clone(),
            subtasks: draft.subtasks.clone(),
            dependencies: draft.dependencies.clone(),
            time_entries: draft.time_entries.clone(),
            estimated_time: draft.estimated_time,
            actual_time: draft.actual_time,
            recurring: draft.recurring,
            template: draft.template.clone(),
            assignee: draft.assignee.clone(),
            progress: draft.progress,
        }
    }

    /// Checks field-level invariants.
    ///
    /// # Errors
    /// - Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        validate_fields(
            &self.title,
            self.priority,
            self.progress,
            &self.subtasks,
            &self.time_entries,
            self.recurring.as_ref(),
        )
    }

    /// Not completed and due strictly before `now_ms`.
    pub fn is_overdue(&self, now_ms: i64) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < now_ms)
    }

    /// Returns the running time entry, if any.
    pub fn open_time_entry(&self) -> Option<&TimeEntry> {
        self.time_entries.iter().find(|entry| entry.is_open())
    }

    /// Percentage of completed subtasks, rounded; `0` without subtasks.
    pub fn subtask_progress(&self) -> u8 {
        if self.subtasks.is_empty() {
            return 0;
        }
        let done = self.subtasks.iter().filter(|s| s.completed).count();
        ((done as f64 / self.subtasks.len() as f64) * 100.0).round() as u8
    }

    /// Applies a partial update in place and bumps `updated_at`.
    pub fn apply_patch(&mut self, patch: &TaskPatch, now_ms: i64) {
        overlay_patch!(self, patch);
        self.updated_at = now_ms;
    }
}

/// Creation payload: a task without store-assigned fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub priority: u8,
    pub completed: bool,
    pub due_date: Option<i64>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub subtasks: Vec<Subtask>,
    pub dependencies: Vec<TaskId>,
    pub time_entries: Vec<TimeEntry>,
    pub estimated_time: Option<u32>,
    pub actual_time: Option<u32>,
    pub recurring: Option<RecurrenceRule>,
    pub template: Option<String>,
    pub assignee: Option<String>,
    pub progress: Option<u8>,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            priority: DEFAULT_PRIORITY,
            completed: false,
            due_date: None,
            tags: Vec::new(),
            category: None,
            subtasks: Vec::new(),
            dependencies: Vec::new(),
            time_entries: Vec::new(),
            estimated_time: None,
            actual_time: None,
            recurring: None,
            template: None,
            assignee: None,
            progress: None,
        }
    }
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, priority: u8) -> Self {
        Self {
            title: title.into(),
            priority,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), TaskValidationError> {
        validate_fields(
            &self.title,
            self.priority,
            self.progress,
            &self.subtasks,
            &self.time_entries,
            self.recurring.as_ref(),
        )
    }

    /// Overlays every field set in `patch` onto this draft.
    pub fn merge_patch(&mut self, patch: &TaskPatch) {
        overlay_patch!(self, patch);
    }
}

/// Partial update payload.
///
/// Outer `None` leaves a field untouched; for optional fields `Some(None)`
/// clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<u8>,
    pub completed: Option<bool>,
    pub due_date: Option<Option<i64>>,
    pub tags: Option<Vec<String>>,
    pub category: Option<Option<String>>,
    pub subtasks: Option<Vec<Subtask>>,
    pub dependencies: Option<Vec<TaskId>>,
    pub time_entries: Option<Vec<TimeEntry>>,
    pub estimated_time: Option<Option<u32>>,
    pub actual_time: Option<Option<u32>>,
    pub recurring: Option<Option<RecurrenceRule>>,
    pub assignee: Option<Option<String>>,
    pub progress: Option<Option<u8>>,
}

impl TaskPatch {
    /// Whether applying this patch can change search tokens.
    pub fn touches_search_fields(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.tags.is_some()
            || self.category.is_some()
    }
}

/// Payload for [`crate::TaskIndexService::add_subtask`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtaskDraft {
    pub title: String,
    pub completed: bool,
    pub estimated_time: Option<u32>,
    pub actual_time: Option<u32>,
}

impl SubtaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn into_subtask(self, id: SubtaskId) -> Subtask {
        Subtask {
            id,
            title: self.title,
            completed: self.completed,
            estimated_time: self.estimated_time,
            actual_time: self.actual_time,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtaskPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub estimated_time: Option<Option<u32>>,
    pub actual_time: Option<Option<u32>>,
}

impl SubtaskPatch {
    pub fn apply(&self, subtask: &mut Subtask) {
        if let Some(title) = &self.title {
            subtask.title = title.clone();
        }
        if let Some(completed) = self.completed {
            subtask.completed = completed;
        }
        if let Some(estimated_time) = self.estimated_time {
            subtask.estimated_time = estimated_time;
        }
        if let Some(actual_time) = self.actual_time {
            subtask.actual_time = actual_time;
        }
    }
}

fn validate_fields(
    title: &str,
    priority: u8,
    progress: Option<u8>,
    subtasks: &[Subtask],
    time_entries: &[TimeEntry],
    recurring: Option<&RecurrenceRule>,
) -> Result<(), TaskValidationError> {
    if title.trim().is_empty() {
        return Err(TaskValidationError::BlankTitle);
    }
    if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&priority) {
        return Err(TaskValidationError::PriorityOutOfRange(priority));
    }
    if let Some(progress) = progress.filter(|value| *value > 100) {
        return Err(TaskValidationError::ProgressOutOfRange(progress));
    }
    if subtasks.iter().any(|subtask| subtask.title.trim().is_empty()) {
        return Err(TaskValidationError::BlankSubtaskTitle);
    }
    for entry in time_entries {
        if let Some(end) = entry.end_time {
            if end < entry.start_time {
                return Err(TaskValidationError::InvalidTimeEntry {
                    entry_id: entry.id.clone(),
                    start: entry.start_time,
                    end,
                });
            }
        }
    }
    let open_entries = time_entries.iter().filter(|entry| entry.is_open()).count();
    if open_entries > 1 {
        return Err(TaskValidationError::MultipleOpenTimeEntries(open_entries));
    }
    if recurring.is_some_and(|rule| rule.interval == 0) {
        return Err(TaskValidationError::ZeroRecurrenceInterval);
    }
    Ok(())
}
