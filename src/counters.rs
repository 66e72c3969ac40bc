//! Count-ranked secondary indices over symbols and edges.
//!
//! Every symbol and every edge has exactly one entry, keyed by its current
//! count. The graph re-ranks an entry on every count change, so the indices
//! answer top-k and bottom-k queries without scanning the arenas.

use crate::edge::EdgeId;
use crate::symbol::SymbolId;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub(crate) struct Counters {
    vertices: BTreeSet<(u64, SymbolId)>,
    edges: BTreeSet<(u64, EdgeId)>,
}

impl Counters {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert_vertex(&mut self, id: SymbolId, count: u64) {
        let fresh = self.vertices.insert((count, id));
        debug_assert!(fresh, "symbol {id} already ranked");
    }

    /// Moves a symbol's entry from `old` to `new`.
    pub(crate) fn rerank_vertex(&mut self, id: SymbolId, old: u64, new: u64) {
        let removed = self.vertices.remove(&(old, id));
        debug_assert!(removed, "symbol {id} missing from rank index");
        self.vertices.insert((new, id));
    }

    pub(crate) fn insert_edge(&mut self, id: EdgeId, count: u64) {
        let fresh = self.edges.insert((count, id));
        debug_assert!(fresh, "edge {id} already ranked");
    }

    /// Moves an edge's entry from `old` to `new`.
    pub(crate) fn rerank_edge(&mut self, id: EdgeId, old: u64, new: u64) {
        let removed = self.edges.remove(&(old, id));
        debug_assert!(removed, "edge {id} missing from rank index");
        self.edges.insert((new, id));
    }

    /// Highest-count symbols first; ties go to the higher ID.
    pub(crate) fn top_vertices(&self, k: usize) -> impl Iterator<Item = (u64, SymbolId)> + '_ {
        self.vertices.iter().rev().take(k).copied()
    }

    /// Lowest-count symbols first; ties go to the lower ID.
    pub(crate) fn bottom_vertices(&self, k: usize) -> impl Iterator<Item = (u64, SymbolId)> + '_ {
        self.vertices.iter().take(k).copied()
    }

    /// Highest-count edges first; ties go to the higher ID.
    pub(crate) fn top_edges(&self, k: usize) -> impl Iterator<Item = (u64, EdgeId)> + '_ {
        self.edges.iter().rev().take(k).copied()
    }

    #[cfg(test)]
    pub(crate) fn vertex_len(&self) -> usize {
        self.vertices.len()
    }

    #[cfg(test)]
    pub(crate) fn edge_len(&self) -> usize {
        self.edges.len()
    }

    #[cfg(test)]
    pub(crate) fn contains_vertex(&self, id: SymbolId, count: u64) -> bool {
        self.vertices.contains(&(count, id))
    }

    #[cfg(test)]
    pub(crate) fn contains_edge(&self, id: EdgeId, count: u64) -> bool {
        self.edges.contains(&(count, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sid(raw: u32) -> SymbolId {
        SymbolId::new(raw).unwrap()
    }

    #[test]
    fn test_rerank_keeps_one_entry() {
        let mut counters = Counters::new();
        counters.insert_vertex(sid(1), 0);
        counters.rerank_vertex(sid(1), 0, 1);
        counters.rerank_vertex(sid(1), 1, 2);

        assert_eq!(counters.vertex_len(), 1);
        assert!(counters.contains_vertex(sid(1), 2));
        assert!(!counters.contains_vertex(sid(1), 0));
    }

    #[test]
    fn test_top_and_bottom_order() {
        let mut counters = Counters::new();
        counters.insert_vertex(sid(1), 5);
        counters.insert_vertex(sid(2), 1);
        counters.insert_vertex(sid(3), 9);

        let top: Vec<_> = counters.top_vertices(2).collect();
        assert_eq!(top, vec![(9, sid(3)), (5, sid(1))]);

        let bottom: Vec<_> = counters.bottom_vertices(1).collect();
        assert_eq!(bottom, vec![(1, sid(2))]);
    }

    #[test]
    fn test_edge_ranking() {
        let mut counters = Counters::new();
        counters.insert_edge(EdgeId(0), 1);
        counters.insert_edge(EdgeId(1), 1);
        counters.rerank_edge(EdgeId(0), 1, 2);

        let top: Vec<_> = counters.top_edges(5).collect();
        assert_eq!(top, vec![(2, EdgeId(0)), (1, EdgeId(1))]);
        assert_eq!(counters.edge_len(), 2);
        assert!(counters.contains_edge(EdgeId(0), 2));
    }
}
