//! Canned task shapes.
//!
//! # Responsibility
//! - Map a template name to a partial task.
//! - Produce a creation draft from a template plus caller overrides.
//!
//! # Invariants
//! - Catalogs are plain values owned by one service instance; there is no
//!   process-wide template registry.

use crate::model::task::{TaskDraft, TaskPatch, DEFAULT_PRIORITY};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Partial task preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskTemplate {
    pub title: String,
    pub description: Option<String>,
    pub priority: u8,
    pub category: Option<String>,
    /// Minutes.
    pub estimated_time: Option<u32>,
    pub tags: Vec<String>,
}

impl Default for TaskTemplate {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            priority: DEFAULT_PRIORITY,
            category: None,
            estimated_time: None,
            tags: Vec::new(),
        }
    }
}

impl TaskTemplate {
    /// Builds a draft tagged with `name`, overlaying `overrides`.
    pub fn instantiate(&self, name: &str, overrides: &TaskPatch) -> TaskDraft {
        let mut draft = TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority,
            category: self.category.clone(),
            estimated_time: self.estimated_time,
            tags: self.tags.clone(),
            template: Some(name.to_string()),
            ..TaskDraft::default()
        };
        draft.merge_patch(overrides);
        draft
    }
}

/// Name-keyed template collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateCatalog {
    templates: BTreeMap<String, TaskTemplate>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the `meeting`, `development` and `review` presets.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.insert(
            "meeting",
            TaskTemplate {
                title: "Meeting".to_string(),
                category: Some("Work".to_string()),
                estimated_time: Some(60),
                tags: vec!["meeting".to_string(), "work".to_string()],
                ..TaskTemplate::default()
            },
        );
        catalog.insert(
            "development",
            TaskTemplate {
                title: "Development Task".to_string(),
                category: Some("Development".to_string()),
                estimated_time: Some(120),
                tags: vec!["development".to_string(), "coding".to_string()],
                ..TaskTemplate::default()
            },
        );
        catalog.insert(
            "review",
            TaskTemplate {
                title: "Code Review".to_string(),
                category: Some("Development".to_string()),
                estimated_time: Some(30),
                tags: vec!["review".to_string(), "development".to_string()],
                ..TaskTemplate::default()
            },
        );
        catalog
    }

    /// Adds or replaces one template.
    pub fn insert(&mut self, name: impl Into<String>, template: TaskTemplate) {
        self.templates.insert(name.into(), template);
    }

    pub fn get(&self, name: &str) -> Option<&TaskTemplate> {
        self.templates.get(name)
    }

    /// Sorted template names.
    pub fn names(&self) -> Vec<String> {
        self.templates.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
