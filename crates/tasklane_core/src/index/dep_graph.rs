//! Directed dependency graph with cycle detection and topological ordering.
//!
//! Edges point from a dependent vertex to its prerequisite (`from -> to`
//! means `from` waits on `to`).
//!
//! # Invariants
//! - Every edge endpoint is a registered vertex.
//! - Vertex iteration follows first-registration order.
//! - Parallel edges are kept; `add_edge` does not collapse duplicates.
//! - Traversals use explicit stacks, so depth is not bounded by the call stack.

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    /// On the current DFS path.
    Gray,
    /// Fully explored.
    Black,
}

#[derive(Debug, Clone)]
pub struct DependencyGraph<V> {
    adjacency: HashMap<V, Vec<V>>,
    order: Vec<V>,
}

impl<V> Default for DependencyGraph<V> {
    fn default() -> Self {
        Self {
            adjacency: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<V: Clone + Eq + Hash> DependencyGraph<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `vertex`; returns `false` if it already existed.
    pub fn add_vertex(&mut self, vertex: V) -> bool {
        if self.adjacency.contains_key(&vertex) {
            return false;
        }
        self.order.push(vertex.clone());
        self.adjacency.insert(vertex, Vec::new());
        true
    }

    /// Appends `from -> to`, registering missing endpoints.
    pub fn add_edge(&mut self, from: V, to: V) {
        self.add_vertex(from.clone());
        self.add_vertex(to.clone());
        if let Some(targets) = self.adjacency.get_mut(&from) {
            targets.push(to);
        }
    }

    /// Prerequisites of `vertex` in insertion order.
    pub fn neighbors<Q>(&self, vertex: &Q) -> &[V]
    where
        V: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.adjacency.get(vertex).map_or(&[], Vec::as_slice)
    }

    pub fn contains_vertex<Q>(&self, vertex: &Q) -> bool
    where
        V: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.adjacency.contains_key(vertex)
    }

    pub fn vertices(&self) -> &[V] {
        &self.order
    }

    pub fn vertex_count(&self) -> usize {
        self.order.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    pub fn clear(&mut self) {
        self.adjacency.clear();
        self.order.clear();
    }

    pub fn has_cycle(&self) -> bool {
        self.find_cycle().is_some()
    }

    /// Returns the vertices of one cycle in path order, if any exists.
    ///
    /// White/gray/black depth-first search over every vertex; a gray target
    /// is a back-edge into the current path. O(V + E).
    pub fn find_cycle(&self) -> Option<Vec<V>> {
        let mut marks: HashMap<&V, Mark> = HashMap::with_capacity(self.order.len());

        for start in &self.order {
            if marks.contains_key(start) {
                continue;
            }
            marks.insert(start, Mark::Gray);
            let mut stack: Vec<(&V, usize)> = vec![(start, 0)];

            while let Some(frame) = stack.last_mut() {
                let vertex = frame.0;
                let next = self.neighbors(vertex).get(frame.1);
                frame.1 += 1;

                let Some(next) = next else {
                    marks.insert(vertex, Mark::Black);
                    stack.pop();
                    continue;
                };
                match marks.get(next) {
                    None => {
                        marks.insert(next, Mark::Gray);
                        stack.push((next, 0));
                    }
                    Some(Mark::Gray) => {
                        let cycle_start = stack
                            .iter()
                            .position(|(on_path, _)| *on_path == next)
                            .unwrap_or(0);
                        return Some(
                            stack[cycle_start..]
                                .iter()
                                .map(|(on_path, _)| (*on_path).clone())
                                .collect(),
                        );
                    }
                    Some(Mark::Black) => {}
                }
            }
        }

        None
    }

    /// Depth-first finishing order: every prerequisite precedes the vertices
    /// that depend on it.
    ///
    /// Only meaningful on an acyclic graph; on a cyclic graph the result is
    /// plain finishing order. Callers check [`DependencyGraph::has_cycle`] first.
    pub fn topological_sort(&self) -> Vec<V> {
        let mut visited: HashSet<&V> = HashSet::with_capacity(self.order.len());
        let mut finished = Vec::with_capacity(self.order.len());

        for start in &self.order {
            if !visited.insert(start) {
                continue;
            }
            let mut stack: Vec<(&V, usize)> = vec![(start, 0)];

            while let Some(frame) = stack.last_mut() {
                let vertex = frame.0;
                let next = self.neighbors(vertex).get(frame.1);
                frame.1 += 1;

                match next {
                    Some(next) => {
                        if visited.insert(next) {
                            stack.push((next, 0));
                        }
                    }
                    None => {
                        finished.push(vertex.clone());
                        stack.pop();
                    }
                }
            }
        }

        finished
    }
}

#[cfg(test)]
mod tests {
    use super::DependencyGraph;

    fn position(order: &[u32], vertex: u32) -> usize {
        order.iter().position(|v| *v == vertex).unwrap()
    }

    #[test]
    fn add_vertex_is_idempotent() {
        let mut graph = DependencyGraph::new();
        assert!(graph.add_vertex(1));
        assert!(!graph.add_vertex(1));
        assert_eq!(graph.vertex_count(), 1);
    }

    #[test]
    fn contains_vertex_sees_both_edge_ends() {
        let mut graph: DependencyGraph<String> = DependencyGraph::new();
        graph.add_edge("top".to_string(), "base".to_string());

        assert!(graph.contains_vertex("top"));
        assert!(graph.contains_vertex("base"));
        assert!(!graph.contains_vertex("other"));
    }

    #[test]
    fn duplicate_edges_are_kept() {
        let mut graph = DependencyGraph::new();
        graph.add_edge(1, 2);
        graph.add_edge(1, 2);

        assert_eq!(graph.neighbors(&1), &[2, 2]);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.neighbors(&9).is_empty());
        assert!(!graph.has_cycle());
    }

    #[test]
    fn closing_a_chain_creates_cycle() {
        let mut graph = DependencyGraph::new();
        graph.add_edge(1, 2);
        graph.add_edge(2, 3);
        assert!(!graph.has_cycle());

        graph.add_edge(3, 1);
        assert!(graph.has_cycle());
        let cycle = graph.find_cycle().unwrap();
        assert_eq!(cycle.len(), 3);
        for vertex in [1, 2, 3] {
            assert!(cycle.contains(&vertex));
        }
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("a", "a");
        assert_eq!(graph.find_cycle(), Some(vec!["a"]));
    }

    #[test]
    fn diamond_is_acyclic() {
        let mut graph = DependencyGraph::new();
        graph.add_edge(1, 2);
        graph.add_edge(1, 3);
        graph.add_edge(2, 4);
        graph.add_edge(3, 4);
        assert!(!graph.has_cycle());
    }

    #[test]
    fn topological_sort_puts_prerequisites_first() {
        let mut graph = DependencyGraph::new();
        graph.add_edge(1, 2);
        graph.add_edge(2, 3);

        assert_eq!(graph.topological_sort(), vec![3, 2, 1]);
    }

    #[test]
    fn topological_sort_respects_every_edge() {
        let mut graph = DependencyGraph::new();
        graph.add_vertex(7);
        graph.add_edge(5, 11);
        graph.add_edge(7, 11);
        graph.add_edge(7, 8);
        graph.add_edge(3, 8);
        graph.add_edge(3, 10);
        graph.add_edge(11, 2);
        graph.add_edge(11, 9);
        graph.add_edge(8, 9);

        let order = graph.topological_sort();
        assert_eq!(order.len(), graph.vertex_count());
        for from in graph.vertices() {
            for to in graph.neighbors(from) {
                assert!(position(&order, *to) < position(&order, *from));
            }
        }
    }

    #[test]
    fn long_chain_does_not_overflow() {
        let mut graph = DependencyGraph::new();
        for vertex in 0..50_000_u32 {
            graph.add_edge(vertex, vertex + 1);
        }
        assert!(!graph.has_cycle());
        assert_eq!(graph.topological_sort().first(), Some(&50_000));
    }
}
