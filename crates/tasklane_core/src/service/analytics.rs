//! Aggregate statistics over the authoritative task list.

use crate::model::task::{Task, MAX_PRIORITY, MIN_PRIORITY};
use serde::Serialize;
use std::collections::BTreeMap;

/// Point-in-time summary of a task collection.
///
/// Computed from store contents, never from the priority or recency views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskAnalytics {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    /// Not completed and due strictly before the evaluation instant.
    pub overdue_tasks: usize,
    /// Average of `priority`; `0.0` for an empty collection.
    pub average_priority: f64,
    /// Minutes.
    pub total_estimated_time: u64,
    /// Minutes.
    pub total_actual_time: u64,
    /// Only tasks with a category are counted.
    pub tasks_by_category: BTreeMap<String, usize>,
    /// Every priority level is present, zero-filled.
    pub tasks_by_priority: BTreeMap<u8, usize>,
}

impl TaskAnalytics {
    pub fn from_tasks(tasks: &[Task], now_ms: i64) -> Self {
        let mut tasks_by_priority: BTreeMap<u8, usize> =
            (MIN_PRIORITY..=MAX_PRIORITY).map(|level| (level, 0)).collect();
        let mut tasks_by_category = BTreeMap::new();
        let mut completed_tasks = 0;
        let mut overdue_tasks = 0;
        let mut priority_sum = 0_u64;
        let mut total_estimated_time = 0_u64;
        let mut total_actual_time = 0_u64;

        for task in tasks {
            if task.completed {
                completed_tasks += 1;
            }
            if task.is_overdue(now_ms) {
                overdue_tasks += 1;
            }
            priority_sum += u64::from(task.priority);
            total_estimated_time += u64::from(task.estimated_time.unwrap_or(0));
            total_actual_time += u64::from(task.actual_time.unwrap_or(0));
            *tasks_by_priority.entry(task.priority).or_insert(0) += 1;
            if let Some(category) = &task.category {
                *tasks_by_category.entry(category.clone()).or_insert(0) += 1;
            }
        }

        let average_priority = if tasks.is_empty() {
            0.0
        } else {
            priority_sum as f64 / tasks.len() as f64
        };

        Self {
            total_tasks: tasks.len(),
            completed_tasks,
            pending_tasks: tasks.len() - completed_tasks,
            overdue_tasks,
            average_priority,
            total_estimated_time,
            total_actual_time,
            tasks_by_category,
            tasks_by_priority,
        }
    }
}
