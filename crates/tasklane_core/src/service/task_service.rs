//! Task index coordinator.
//!
//! # Responsibility
//! - Apply every mutation to the authoritative store first, then propagate
//!   the stored record into the in-memory indices.
//! - Answer lookup, ordering, recency, search and dependency queries from
//!   those indices without touching the store.
//!
//! # Invariants
//! - The hash index and the store always agree on which ids exist.
//! - The dependency graph never keeps an edge that closes a cycle; a
//!   rejected link rebuilds the graph from the store.
//! - Search tokens of a record are re-indexed whenever title, description,
//!   tags or category change, and dropped on delete.
//! - The priority heap and recency buffer are approximate views: they may
//!   hold stale copies after updates and deletes until [`TaskIndexService::refresh`].
//! - At most one time entry per task is open.

use crate::config::{FuzzyMode, IndexConfig};
use crate::index::{DependencyGraph, HashIndex, PriorityHeap, RingBuffer, Trie};
use crate::model::task::{
    new_child_id, Subtask, SubtaskDraft, SubtaskId, SubtaskPatch, Task, TaskDraft, TaskId,
    TaskPatch, TaskValidationError, TimeEntry, TimeEntryId,
};
use crate::model::template::TemplateCatalog;
use crate::repo::task_repo::{RepoError, TaskRepository};
use crate::service::analytics::TaskAnalytics;
use crate::service::clock::{Clock, SystemClock};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

static WORD_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}]+").expect("valid word split regex"));

const MS_PER_MINUTE: f64 = 60_000.0;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from coordinator operations.
#[derive(Debug)]
pub enum ServiceError {
    /// No task with this id is indexed or stored.
    NotFound(TaskId),
    SubtaskNotFound {
        task_id: TaskId,
        subtask_id: SubtaskId,
    },
    TimeEntryNotFound {
        task_id: TaskId,
        entry_id: TimeEntryId,
    },
    TemplateNotFound(String),
    /// A task may not depend on itself.
    SelfDependency(TaskId),
    /// Linking `task_id -> dependency_id` would close a cycle.
    CycleDetected {
        task_id: TaskId,
        dependency_id: TaskId,
    },
    /// The graph is cyclic, so no dependency order exists.
    DependencyCycle(Vec<TaskId>),
    TimerAlreadyRunning {
        task_id: TaskId,
        entry_id: TimeEntryId,
    },
    TimerAlreadyStopped {
        task_id: TaskId,
        entry_id: TimeEntryId,
    },
    Validation(TaskValidationError),
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::SubtaskNotFound {
                task_id,
                subtask_id,
            } => write!(f, "subtask {subtask_id} not found on task {task_id}"),
            Self::TimeEntryNotFound { task_id, entry_id } => {
                write!(f, "time entry {entry_id} not found on task {task_id}")
            }
            Self::TemplateNotFound(name) => write!(f, "template not found: {name}"),
            Self::SelfDependency(id) => write!(f, "task {id} cannot depend on itself"),
            Self::CycleDetected {
                task_id,
                dependency_id,
            } => write!(
                f,
                "dependency {task_id} -> {dependency_id} would create a cycle"
            ),
            Self::DependencyCycle(cycle) => {
                write!(f, "dependency graph contains a cycle: {}", cycle.join(" -> "))
            }
            Self::TimerAlreadyRunning { task_id, entry_id } => write!(
                f,
                "task {task_id} already has a running time entry {entry_id}"
            ),
            Self::TimerAlreadyStopped { task_id, entry_id } => {
                write!(f, "time entry {entry_id} on task {task_id} is already stopped")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<TaskValidationError> for ServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Filters applied after the text lookup of [`TaskIndexService::search_tasks`].
///
/// Every populated filter must match. `tags` matches when the task carries
/// any of the listed tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Approximate token matching instead of prefix matching.
    pub fuzzy: bool,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub priority: Option<u8>,
    pub completed: Option<bool>,
}

impl SearchOptions {
    fn matches(&self, task: &Task) -> bool {
        if let Some(category) = &self.category {
            if task.category.as_ref() != Some(category) {
                return false;
            }
        }
        if !self.tags.is_empty() && !self.tags.iter().any(|tag| task.tags.contains(tag)) {
            return false;
        }
        if self.priority.is_some_and(|priority| priority != task.priority) {
            return false;
        }
        if self.completed.is_some_and(|completed| completed != task.completed) {
            return false;
        }
        true
    }
}

/// Record index coordinator over a task store.
///
/// Single-writer: wrap in [`crate::SharedTaskService`] to share across threads.
pub struct TaskIndexService<R: TaskRepository> {
    repo: R,
    config: IndexConfig,
    templates: TemplateCatalog,
    clock: Box<dyn Clock>,
    by_id: HashIndex<TaskId, Task>,
    by_priority: PriorityHeap<Task>,
    recent: RingBuffer<Task>,
    dependencies: DependencyGraph<TaskId>,
    search: Trie<TaskId>,
}

impl<R: TaskRepository> TaskIndexService<R> {
    /// Creates a coordinator and builds every index from `repo`.
    ///
    /// # Errors
    /// - Returns store errors raised while loading existing tasks.
    pub fn new(repo: R, config: IndexConfig, templates: TemplateCatalog) -> ServiceResult<Self> {
        let mut service = Self {
            by_id: HashIndex::with_capacity(config.hash_initial_capacity, config.hash_load_factor),
            by_priority: priority_heap(),
            recent: RingBuffer::with_capacity(config.recent_capacity),
            dependencies: DependencyGraph::new(),
            search: Trie::new(),
            repo,
            config,
            templates,
            clock: Box::new(SystemClock),
        };
        service.refresh()?;
        Ok(service)
    }

    /// Replaces the time source used for overdue checks and time tracking.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn template_names(&self) -> Vec<String> {
        self.templates.names()
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn into_repository(self) -> R {
        self.repo
    }

    /// Discards every index and rebuilds it from the store.
    ///
    /// The recency buffer ends up holding the most recently created tasks.
    pub fn refresh(&mut self) -> ServiceResult<()> {
        let started = Instant::now();
        let tasks = self.repo.list_tasks()?;

        self.by_id.clear();
        self.by_priority.clear();
        self.recent.clear();
        self.search.clear();
        self.dependencies = build_graph(tasks.iter());

        for task in &tasks {
            self.by_id.put(task.id.clone(), task.clone());
            self.by_priority.enqueue(task.clone());
            self.recent.push_evicting(task.clone());
            self.index_search_tokens(task);
        }

        info!(
            "event=index_refresh module=service status=ok tasks={} tokens={} edges={} duration_ms={}",
            tasks.len(),
            self.search.len(),
            self.dependencies.edge_count(),
            started.elapsed().as_millis()
        );
        Ok(())
    }

    /// Persists a new task and indexes it everywhere.
    ///
    /// # Errors
    /// - `NotFound` when a listed dependency is not an indexed task; nothing
    ///   is written.
    pub fn create_task(&mut self, draft: TaskDraft) -> ServiceResult<Task> {
        if let Some(missing) = self.unknown_dependency(&draft.dependencies, &[]) {
            warn!(
                "event=task_create module=service status=rejected reason=unknown_dependency dependency_id={missing}"
            );
            return Err(ServiceError::NotFound(missing.clone()));
        }
        let task = self.repo.create_task(&draft)?;

        self.by_id.put(task.id.clone(), task.clone());
        self.by_priority.enqueue(task.clone());
        self.recent.push_evicting(task.clone());
        add_task_edges(&mut self.dependencies, &task.id, &task.dependencies);
        self.index_search_tokens(&task);

        info!(
            "event=task_create module=service status=ok task_id={} priority={}",
            task.id, task.priority
        );
        Ok(task)
    }

    /// All stored tasks in creation order.
    pub fn get_all_tasks(&self) -> ServiceResult<Vec<Task>> {
        Ok(self.repo.list_tasks()?)
    }

    /// Indexed snapshot of one task.
    pub fn get_task_by_id(&self, id: &str) -> Option<&Task> {
        self.by_id.get(&id.to_owned())
    }

    /// Applies `patch` through the store and re-indexes the result.
    ///
    /// # Errors
    /// - `NotFound` when no such task is stored, or when a newly listed
    ///   dependency is not an indexed task.
    /// - `SelfDependency` / `CycleDetected` when a new dependency list would
    ///   point at the task itself or close a cycle; nothing is written.
    pub fn update_task(&mut self, id: &str, patch: &TaskPatch) -> ServiceResult<Task> {
        if let Some(dependencies) = &patch.dependencies {
            self.check_dependency_list(id, dependencies)?;
        }

        let updated = self.persist_patch(id, patch)?;
        if patch.dependencies.is_some() {
            self.rebuild_graph()?;
        }
        Ok(updated)
    }

    /// Removes a task from the store, the hash index and the search index.
    ///
    /// Returns `false` when nothing was stored under `id`. The priority and
    /// recency views keep their copies until the next refresh.
    pub fn delete_task(&mut self, id: &str) -> ServiceResult<bool> {
        if !self.repo.delete_task(id)? {
            debug!("event=task_delete module=service status=miss task_id={id}");
            return Ok(false);
        }

        if let Some(removed) = self.by_id.remove(&id.to_owned()) {
            self.unindex_search_tokens(&removed);
        }
        info!("event=task_delete module=service status=ok task_id={id}");
        Ok(true)
    }

    /// Heap contents in priority order, highest first; non-destructive.
    ///
    /// May include stale copies of updated or deleted tasks.
    pub fn get_tasks_by_priority(&self) -> Vec<Task> {
        self.by_priority.sorted_snapshot()
    }

    /// Recently created or updated tasks, oldest first.
    ///
    /// May include stale copies; an updated task appears once per touch.
    pub fn get_recent_tasks(&self) -> Vec<Task> {
        self.recent.to_vec()
    }

    pub fn get_completed_tasks(&self) -> ServiceResult<Vec<Task>> {
        Ok(self.repo.list_completed()?)
    }

    pub fn get_pending_tasks(&self) -> ServiceResult<Vec<Task>> {
        Ok(self.repo.list_pending()?)
    }

    /// Text search over indexed tokens, then attribute filters.
    ///
    /// Prefix matching by default; `options.fuzzy` switches to the configured
    /// [`FuzzyMode`] with `fuzzy_max_distance` as the edit budget. Each task
    /// appears at most once, in discovery order.
    pub fn search_tasks(&self, query: &str, options: &SearchOptions) -> Vec<Task> {
        let query = query.trim();
        let candidates = if options.fuzzy {
            match self.config.fuzzy_mode {
                FuzzyMode::Substitution => self
                    .search
                    .fuzzy_search(query, self.config.fuzzy_max_distance),
                FuzzyMode::Levenshtein => self
                    .search
                    .edit_distance_search(query, self.config.fuzzy_max_distance),
            }
        } else {
            self.search.prefix_search(query)
        };

        let mut seen = HashSet::new();
        candidates
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .filter_map(|id| self.by_id.get(&id))
            .filter(|task| options.matches(task))
            .cloned()
            .collect()
    }

    /// Aggregates over the store, evaluated at the service clock's "now".
    pub fn get_task_analytics(&self) -> ServiceResult<TaskAnalytics> {
        let tasks = self.repo.list_tasks()?;
        Ok(TaskAnalytics::from_tasks(&tasks, self.clock.now_ms()))
    }

    /// Indexed tasks with every prerequisite before its dependents.
    ///
    /// # Errors
    /// - `DependencyCycle` when the graph is cyclic.
    pub fn get_tasks_by_dependency_order(&self) -> ServiceResult<Vec<Task>> {
        if let Some(cycle) = self.dependencies.find_cycle() {
            warn!(
                "event=dependency_order module=service status=error reason=cycle length={}",
                cycle.len()
            );
            return Err(ServiceError::DependencyCycle(cycle));
        }

        Ok(self
            .dependencies
            .topological_sort()
            .into_iter()
            .filter_map(|id| self.by_id.get(&id).cloned())
            .collect())
    }

    /// Incomplete tasks with at least one dependency that is missing or not
    /// yet completed.
    pub fn get_blocked_tasks(&self) -> ServiceResult<Vec<Task>> {
        let tasks = self.repo.list_tasks()?;
        Ok(tasks
            .into_iter()
            .filter(|task| !task.completed)
            .filter(|task| {
                task.dependencies.iter().any(|dependency_id| {
                    self.by_id
                        .get(dependency_id)
                        .map_or(true, |dependency| !dependency.completed)
                })
            })
            .collect())
    }

    pub fn add_subtask(&mut self, task_id: &str, draft: SubtaskDraft) -> ServiceResult<Subtask> {
        let task = self.indexed(task_id)?;
        let subtask = draft.into_subtask(new_child_id());
        let mut subtasks = task.subtasks.clone();
        subtasks.push(subtask.clone());

        self.persist_patch(
            task_id,
            &TaskPatch {
                subtasks: Some(subtasks),
                ..TaskPatch::default()
            },
        )?;
        Ok(subtask)
    }

    pub fn update_subtask(
        &mut self,
        task_id: &str,
        subtask_id: &str,
        patch: &SubtaskPatch,
    ) -> ServiceResult<Subtask> {
        let mut subtasks = self.indexed(task_id)?.subtasks.clone();
        let subtask = subtasks
            .iter_mut()
            .find(|subtask| subtask.id == subtask_id)
            .ok_or_else(|| ServiceError::SubtaskNotFound {
                task_id: task_id.to_owned(),
                subtask_id: subtask_id.to_owned(),
            })?;
        patch.apply(subtask);
        let updated = subtask.clone();

        self.persist_patch(
            task_id,
            &TaskPatch {
                subtasks: Some(subtasks),
                ..TaskPatch::default()
            },
        )?;
        Ok(updated)
    }

    /// Records that `task_id` waits on `dependency_id`.
    ///
    /// Linking an existing dependency again is a no-op.
    ///
    /// # Errors
    /// - `SelfDependency` when both ids are equal.
    /// - `NotFound` when either task is not indexed.
    /// - `CycleDetected` when the edge would close a cycle; the graph is
    ///   rebuilt from the store and the task is left unchanged.
    pub fn add_dependency(&mut self, task_id: &str, dependency_id: &str) -> ServiceResult<Task> {
        if task_id == dependency_id {
            return Err(ServiceError::SelfDependency(task_id.to_owned()));
        }
        let task = self.indexed(task_id)?.clone();
        self.indexed(dependency_id)?;

        if task.dependencies.iter().any(|existing| existing == dependency_id) {
            return Ok(task);
        }

        self.dependencies
            .add_edge(task_id.to_owned(), dependency_id.to_owned());
        if self.dependencies.has_cycle() {
            self.rebuild_graph()?;
            warn!(
                "event=dependency_add module=service status=rejected reason=cycle task_id={task_id} dependency_id={dependency_id}"
            );
            return Err(ServiceError::CycleDetected {
                task_id: task_id.to_owned(),
                dependency_id: dependency_id.to_owned(),
            });
        }

        let mut dependencies = task.dependencies;
        dependencies.push(dependency_id.to_owned());
        let updated = self.persist_patch(
            task_id,
            &TaskPatch {
                dependencies: Some(dependencies),
                ..TaskPatch::default()
            },
        )?;
        info!(
            "event=dependency_add module=service status=ok task_id={task_id} dependency_id={dependency_id}"
        );
        Ok(updated)
    }

    /// Opens a new time entry starting now.
    ///
    /// # Errors
    /// - `TimerAlreadyRunning` when the task already has an open entry.
    pub fn start_time_tracking(
        &mut self,
        task_id: &str,
        description: Option<String>,
    ) -> ServiceResult<TimeEntry> {
        let task = self.indexed(task_id)?;
        if let Some(open) = task.open_time_entry() {
            return Err(ServiceError::TimerAlreadyRunning {
                task_id: task_id.to_owned(),
                entry_id: open.id.clone(),
            });
        }

        let entry = TimeEntry {
            id: new_child_id(),
            start_time: self.clock.now_ms(),
            end_time: None,
            duration: 0,
            description,
        };
        let mut time_entries = task.time_entries.clone();
        time_entries.push(entry.clone());

        self.persist_patch(
            task_id,
            &TaskPatch {
                time_entries: Some(time_entries),
                ..TaskPatch::default()
            },
        )?;
        info!(
            "event=timer_start module=service status=ok task_id={task_id} entry_id={}",
            entry.id
        );
        Ok(entry)
    }

    /// Closes an open time entry and adds its rounded minutes to the task's
    /// `actual_time`.
    pub fn stop_time_tracking(
        &mut self,
        task_id: &str,
        entry_id: &str,
    ) -> ServiceResult<TimeEntry> {
        let task = self.indexed(task_id)?;
        let mut time_entries = task.time_entries.clone();
        let previous_actual = task.actual_time.unwrap_or(0);
        let entry = time_entries
            .iter_mut()
            .find(|entry| entry.id == entry_id)
            .ok_or_else(|| ServiceError::TimeEntryNotFound {
                task_id: task_id.to_owned(),
                entry_id: entry_id.to_owned(),
            })?;
        if !entry.is_open() {
            return Err(ServiceError::TimerAlreadyStopped {
                task_id: task_id.to_owned(),
                entry_id: entry_id.to_owned(),
            });
        }

        let end_time = self.clock.now_ms().max(entry.start_time);
        entry.end_time = Some(end_time);
        entry.duration = ((end_time - entry.start_time) as f64 / MS_PER_MINUTE).round() as u32;
        let stopped = entry.clone();

        self.persist_patch(
            task_id,
            &TaskPatch {
                time_entries: Some(time_entries),
                actual_time: Some(Some(previous_actual.saturating_add(stopped.duration))),
                ..TaskPatch::default()
            },
        )?;
        info!(
            "event=timer_stop module=service status=ok task_id={task_id} entry_id={entry_id} minutes={}",
            stopped.duration
        );
        Ok(stopped)
    }

    /// Creates a task from a named template with `overrides` applied on top.
    pub fn create_task_from_template(
        &mut self,
        name: &str,
        overrides: &TaskPatch,
    ) -> ServiceResult<Task> {
        let draft = self
            .templates
            .get(name)
            .ok_or_else(|| ServiceError::TemplateNotFound(name.to_owned()))?
            .instantiate(name, overrides);
        self.create_task(draft)
    }

    fn indexed(&self, id: &str) -> ServiceResult<&Task> {
        self.by_id
            .get(&id.to_owned())
            .ok_or_else(|| ServiceError::NotFound(id.to_owned()))
    }

    /// Writes `patch` to the store and refreshes the hash index, recency
    /// buffer, search tokens and (on priority change) the heap. The graph is
    /// left to the caller.
    fn persist_patch(&mut self, id: &str, patch: &TaskPatch) -> ServiceResult<Task> {
        let previous = self.by_id.get(&id.to_owned()).cloned();
        let updated = self
            .repo
            .update_task(id, patch)?
            .ok_or_else(|| ServiceError::NotFound(id.to_owned()))?;

        self.by_id.put(updated.id.clone(), updated.clone());
        self.recent.push_evicting(updated.clone());

        if patch.touches_search_fields() || previous.is_none() {
            if let Some(previous) = &previous {
                self.unindex_search_tokens(previous);
            }
            self.index_search_tokens(&updated);
        }

        let priority_changed = previous
            .as_ref()
            .map_or(true, |previous| previous.priority != updated.priority);
        if priority_changed {
            self.rebuild_priority_heap()?;
        }

        info!(
            "event=task_update module=service status=ok task_id={id} priority_changed={priority_changed}"
        );
        Ok(updated)
    }

    fn check_dependency_list(&self, id: &str, dependencies: &[TaskId]) -> ServiceResult<()> {
        if dependencies.iter().any(|dependency| dependency == id) {
            return Err(ServiceError::SelfDependency(id.to_owned()));
        }
        let current = self
            .by_id
            .get(&id.to_owned())
            .map(|task| task.dependencies.as_slice())
            .unwrap_or_default();
        if let Some(missing) = self.unknown_dependency(dependencies, current) {
            warn!(
                "event=task_update module=service status=rejected reason=unknown_dependency task_id={id} dependency_id={missing}"
            );
            return Err(ServiceError::NotFound(missing.clone()));
        }

        let mut candidate = DependencyGraph::new();
        for task in self.by_id.values() {
            let edges = if task.id == id {
                dependencies
            } else {
                task.dependencies.as_slice()
            };
            add_task_edges(&mut candidate, &task.id, edges);
        }

        let Some(cycle) = candidate.find_cycle() else {
            return Ok(());
        };
        let dependency_id = cycle
            .iter()
            .position(|vertex| vertex == id)
            .map(|index| cycle[(index + 1) % cycle.len()].clone())
            .or_else(|| dependencies.first().cloned())
            .unwrap_or_default();
        warn!(
            "event=task_update module=service status=rejected reason=cycle task_id={id} dependency_id={dependency_id}"
        );
        Err(ServiceError::CycleDetected {
            task_id: id.to_owned(),
            dependency_id,
        })
    }

    /// First id in `dependencies` that is neither indexed nor already linked.
    ///
    /// Links left dangling by a delete stay acceptable; ids are never reused.
    fn unknown_dependency<'a>(
        &self,
        dependencies: &'a [TaskId],
        already_linked: &[TaskId],
    ) -> Option<&'a TaskId> {
        dependencies.iter().find(|dependency| {
            !already_linked.contains(dependency) && self.by_id.get(*dependency).is_none()
        })
    }

    fn rebuild_priority_heap(&mut self) -> ServiceResult<()> {
        let tasks = self.repo.list_tasks()?;
        self.by_priority.clear();
        self.by_priority.extend(tasks);
        debug!(
            "event=heap_rebuild module=service status=ok tasks={}",
            self.by_priority.len()
        );
        Ok(())
    }

    fn rebuild_graph(&mut self) -> ServiceResult<()> {
        let tasks = self.repo.list_tasks()?;
        self.dependencies = build_graph(tasks.iter());
        debug!(
            "event=graph_rebuild module=service status=ok vertices={} edges={}",
            self.dependencies.vertex_count(),
            self.dependencies.edge_count()
        );
        Ok(())
    }

    fn index_search_tokens(&mut self, task: &Task) {
        for token in search_tokens(task, self.config.index_words) {
            self.search.insert(&token, task.id.clone());
        }
    }

    fn unindex_search_tokens(&mut self, task: &Task) {
        for token in search_tokens(task, self.config.index_words) {
            self.search.remove(&token, &task.id);
        }
    }
}

/// Higher priority is served first.
fn priority_heap() -> PriorityHeap<Task> {
    PriorityHeap::with_comparator(|a: &Task, b: &Task| b.priority.cmp(&a.priority))
}

fn build_graph<'a>(tasks: impl Iterator<Item = &'a Task>) -> DependencyGraph<TaskId> {
    let mut graph = DependencyGraph::new();
    for task in tasks {
        add_task_edges(&mut graph, &task.id, &task.dependencies);
    }
    graph
}

fn add_task_edges(graph: &mut DependencyGraph<TaskId>, id: &str, dependencies: &[TaskId]) {
    graph.add_vertex(id.to_owned());
    for dependency in dependencies {
        graph.add_edge(id.to_owned(), dependency.clone());
    }
}

/// Distinct (case-folded) search tokens of a task.
///
/// Whole title, description, each tag and category; with `index_words`, also
/// every word of title and description.
fn search_tokens(task: &Task, index_words: bool) -> Vec<String> {
    let mut phrases: Vec<&str> = vec![task.title.as_str()];
    phrases.extend(task.description.as_deref());
    phrases.extend(task.tags.iter().map(String::as_str));
    phrases.extend(task.category.as_deref());

    let mut words: Vec<&str> = Vec::new();
    if index_words {
        for text in std::iter::once(task.title.as_str()).chain(task.description.as_deref()) {
            words.extend(WORD_SPLIT_RE.split(text));
        }
    }

    let mut seen = HashSet::new();
    phrases
        .into_iter()
        .chain(words)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter(|token| seen.insert(token.to_lowercase()))
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::search_tokens;
    use crate::model::task::{Task, TaskDraft};

    fn task(title: &str) -> Task {
        let mut draft = TaskDraft::new(title, 3);
        draft.description = Some("Prepare the Q3 budget".to_string());
        draft.tags = vec!["Work".to_string(), "finance".to_string()];
        draft.category = Some("work".to_string());
        Task::from_draft("1".to_string(), &draft, 0)
    }

    #[test]
    fn tokens_cover_phrases_and_words_without_case_duplicates() {
        let tokens = search_tokens(&task("Budget review"), true);

        assert_eq!(
            tokens,
            vec![
                "Budget review",
                "Prepare the Q3 budget",
                "Work",
                "finance",
                "Budget",
                "review",
                "Prepare",
                "the",
                "Q3",
            ]
        );
    }

    #[test]
    fn word_indexing_can_be_disabled() {
        let tokens = search_tokens(&task("Budget review"), false);
        assert_eq!(
            tokens,
            vec!["Budget review", "Prepare the Q3 budget", "Work", "finance"]
        );
    }
}
