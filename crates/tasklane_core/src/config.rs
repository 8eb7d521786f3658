//! Index service configuration.
//!
//! # Responsibility
//! - Hold tunables for the in-memory indices kept by the task service.
//! - Parse configuration documents supplied by the embedding application.
//!
//! # Invariants
//! - Missing fields fall back to [`IndexConfig::default`].

use crate::index::hash_index::{DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR};
use serde::{Deserialize, Serialize};

/// Matching strategy for fuzzy search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuzzyMode {
    /// Same-length tokens differing in at most N positions.
    #[default]
    Substitution,
    /// Tokens within Levenshtein distance N (insert, delete, substitute).
    Levenshtein,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Capacity of the recently-touched buffer.
    pub recent_capacity: usize,
    pub hash_initial_capacity: usize,
    pub hash_load_factor: f64,
    /// Edit budget used by fuzzy search.
    pub fuzzy_max_distance: usize,
    pub fuzzy_mode: FuzzyMode,
    /// Also index individual words of multi-word titles and descriptions.
    pub index_words: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            recent_capacity: 10,
            hash_initial_capacity: DEFAULT_CAPACITY,
            hash_load_factor: DEFAULT_LOAD_FACTOR,
            fuzzy_max_distance: 1,
            fuzzy_mode: FuzzyMode::Substitution,
            index_words: true,
        }
    }
}

impl IndexConfig {
    /// Parses a JSON document; absent keys keep their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
