//! Character trie mapping case-folded tokens to associated values.
//!
//! # Invariants
//! - Tokens are folded to lowercase before every walk.
//! - A node is terminal iff at least one inserted token ends there.
//! - Values are not de-duplicated; inserting the same `(token, value)` pair
//!   twice stores it twice.
//! - Child traversal is in character order, so collection order is stable.

use std::collections::BTreeMap;

#[derive(Debug, Clone)]
struct TrieNode<T> {
    children: BTreeMap<char, TrieNode<T>>,
    terminal: bool,
    values: Vec<T>,
}

impl<T> Default for TrieNode<T> {
    fn default() -> Self {
        Self {
            children: BTreeMap::new(),
            terminal: false,
            values: Vec::new(),
        }
    }
}

impl<T> TrieNode<T> {
    fn is_prunable(&self) -> bool {
        !self.terminal && self.children.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Trie<T> {
    root: TrieNode<T>,
    entries: usize,
}

impl<T> Default for Trie<T> {
    fn default() -> Self {
        Self {
            root: TrieNode::default(),
            entries: 0,
        }
    }
}

impl<T> Trie<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes `value` under `token`.
    pub fn insert(&mut self, token: &str, value: T) {
        let mut node = &mut self.root;
        for ch in fold(token).chars() {
            node = node.children.entry(ch).or_default();
        }
        node.terminal = true;
        node.values.push(value);
        self.entries += 1;
    }

    /// Whether some token equal to `word` (case-insensitively) is indexed.
    pub fn contains(&self, word: &str) -> bool {
        self.find(word).is_some_and(|node| node.terminal)
    }

    /// Number of stored `(token, value)` pairs.
    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    pub fn clear(&mut self) {
        self.root = TrieNode::default();
        self.entries = 0;
    }

    fn find(&self, word: &str) -> Option<&TrieNode<T>> {
        let mut node = &self.root;
        for ch in fold(word).chars() {
            node = node.children.get(&ch)?;
        }
        Some(node)
    }
}

impl<T: Clone> Trie<T> {
    /// Values of the token equal to `word`; empty when `word` is only a prefix.
    pub fn exact_search(&self, word: &str) -> Vec<T> {
        match self.find(word) {
            Some(node) if node.terminal => node.values.clone(),
            _ => Vec::new(),
        }
    }

    /// Values of every token starting with `prefix`, depth-first.
    pub fn prefix_search(&self, prefix: &str) -> Vec<T> {
        let mut results = Vec::new();
        if let Some(node) = self.find(prefix) {
            collect_subtree(node, &mut results);
        }
        results
    }

    /// Values of every same-length token differing from `word` in at most
    /// `max_substitutions` positions.
    ///
    /// Substitution-only: tokens that need an insertion or deletion to match
    /// are never returned. See [`Trie::edit_distance_search`] for that.
    pub fn fuzzy_search(&self, word: &str, max_substitutions: usize) -> Vec<T> {
        let target: Vec<char> = fold(word).chars().collect();
        let mut results = Vec::new();
        collect_substitutions(&self.root, &target, 0, max_substitutions, &mut results);
        results
    }

    /// Values of every token within Levenshtein distance `max_edits` of
    /// `word` (insertions, deletions and substitutions each cost one).
    pub fn edit_distance_search(&self, word: &str, max_edits: usize) -> Vec<T> {
        let target: Vec<char> = fold(word).chars().collect();
        let first_row: Vec<usize> = (0..=target.len()).collect();
        let mut results = Vec::new();

        if self.root.terminal && target.len() <= max_edits {
            results.extend(self.root.values.iter().cloned());
        }
        for (ch, child) in &self.root.children {
            collect_within_distance(child, *ch, &target, &first_row, max_edits, &mut results);
        }
        results
    }
}

impl<T: PartialEq> Trie<T> {
    /// Removes one occurrence of `value` from `token`, pruning emptied nodes.
    ///
    /// Returns `false` when the pair was not indexed.
    pub fn remove(&mut self, token: &str, value: &T) -> bool {
        let chars: Vec<char> = fold(token).chars().collect();
        let removed = remove_from(&mut self.root, &chars, value);
        if removed {
            self.entries -= 1;
        }
        removed
    }
}

fn fold(token: &str) -> String {
    token.to_lowercase()
}

fn collect_subtree<T: Clone>(node: &TrieNode<T>, results: &mut Vec<T>) {
    results.extend(node.values.iter().cloned());
    for child in node.children.values() {
        collect_subtree(child, results);
    }
}

fn collect_substitutions<T: Clone>(
    node: &TrieNode<T>,
    target: &[char],
    used: usize,
    budget: usize,
    results: &mut Vec<T>,
) {
    let Some((expected, rest)) = target.split_first() else {
        if node.terminal {
            results.extend(node.values.iter().cloned());
        }
        return;
    };

    for (ch, child) in &node.children {
        let cost = usize::from(ch != expected);
        if used + cost <= budget {
            collect_substitutions(child, rest, used + cost, budget, results);
        }
    }
}

fn collect_within_distance<T: Clone>(
    node: &TrieNode<T>,
    ch: char,
    target: &[char],
    previous_row: &[usize],
    budget: usize,
    results: &mut Vec<T>,
) {
    let mut row = Vec::with_capacity(previous_row.len());
    row.push(previous_row[0] + 1);
    for (column, expected) in target.iter().enumerate() {
        let insert_cost = row[column] + 1;
        let delete_cost = previous_row[column + 1] + 1;
        let replace_cost = previous_row[column] + usize::from(*expected != ch);
        row.push(insert_cost.min(delete_cost).min(replace_cost));
    }

    if node.terminal && row[target.len()] <= budget {
        results.extend(node.values.iter().cloned());
    }
    if row.iter().min().is_some_and(|best| *best <= budget) {
        for (next, child) in &node.children {
            collect_within_distance(child, *next, target, &row, budget, results);
        }
    }
}

fn remove_from<T: PartialEq>(node: &mut TrieNode<T>, chars: &[char], value: &T) -> bool {
    let Some((ch, rest)) = chars.split_first() else {
        if !node.terminal {
            return false;
        }
        let Some(position) = node.values.iter().position(|stored| stored == value) else {
            return false;
        };
        node.values.remove(position);
        if node.values.is_empty() {
            node.terminal = false;
        }
        return true;
    };

    let Some(child) = node.children.get_mut(ch) else {
        return false;
    };
    let removed = remove_from(child, rest, value);
    if removed && child.is_prunable() {
        node.children.remove(ch);
    }
    removed
}
