//! The symbol graph store.
//!
//! Symbols and edges live in append-only arenas indexed by their IDs. Nothing
//! is ever removed: apart from count increments and one-time promotion, the
//! graph only grows.

use crate::counters::Counters;
use crate::edge::{Edge, EdgeId};
use crate::id_gen::IdGenerator;
use crate::symbol::{Symbol, SymbolId};
use ahash::AHashMap as HashMap;
use std::collections::btree_map::{self, BTreeMap};
use std::ops::Bound;

/// Directed graph of learned symbols and the transitions between them.
///
/// # Example
///
/// ```
/// use runes_rs::Graph;
///
/// let mut graph = Graph::new();
/// let a = graph.get_or_create("a");
/// assert_eq!(graph.get_or_create("a"), a);
///
/// let e = graph.tally_edge(a, a);
/// assert_eq!(graph.edge(e).count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Graph {
    /// Symbol arena, indexed by `SymbolId::index`
    pub(crate) symbols: Vec<Symbol>,

    /// Edge arena, indexed by `EdgeId::index`
    pub(crate) edges: Vec<Edge>,

    /// Canonical name lookup, ordered for prefix queries
    pub(crate) names: BTreeMap<String, SymbolId>,

    /// Maps `(from, to)` to the unique edge between them
    pub(crate) edge_index: HashMap<(SymbolId, SymbolId), EdgeId>,

    pub(crate) counters: Counters,

    pub(crate) id_gen: IdGenerator,

    /// Sum of name lengths over every `tally_vertex` call
    pub(crate) total_chars: u64,
}

impl Graph {
    /// Creates a graph holding only the empty-name root symbol.
    pub fn new() -> Self {
        let mut graph = Self::empty();
        let root = graph.get_or_create("");
        debug_assert_eq!(root, SymbolId::ROOT, "root must be the first symbol");
        graph
    }

    /// A graph without even the root. Only valid as a starting point for
    /// rebuilding from a snapshot.
    pub(crate) fn empty() -> Self {
        Self {
            symbols: Vec::new(),
            edges: Vec::new(),
            names: BTreeMap::new(),
            edge_index: HashMap::default(),
            counters: Counters::new(),
            id_gen: IdGenerator::new(),
            total_chars: 0,
        }
    }

    /// Returns the symbol named `name`, creating it with count 0 if absent.
    pub fn get_or_create(&mut self, name: &str) -> SymbolId {
        if let Some(&id) = self.names.get(name) {
            return id;
        }

        let id = self.id_gen.get();
        debug_assert_eq!(id.index(), self.symbols.len());
        self.symbols.push(Symbol::new(id, name.to_owned()));
        self.names.insert(name.to_owned(), id);
        self.counters.insert_vertex(id, 0);
        id
    }

    /// Returns the single-character symbol for `c`.
    ///
    /// The NUL terminator maps to the root.
    pub fn get_or_create_char(&mut self, c: char) -> SymbolId {
        if c == '\0' {
            return self.get_or_create("");
        }
        let mut buf = [0u8; 4];
        self.get_or_create(c.encode_utf8(&mut buf))
    }

    /// Looks up a symbol by name without creating it.
    pub fn find(&self, name: &str) -> Option<SymbolId> {
        self.names.get(name).copied()
    }

    /// Looks up the edge between two symbols without creating it.
    pub fn find_edge(&self, from: SymbolId, to: SymbolId) -> Option<EdgeId> {
        self.edge_index.get(&(from, to)).copied()
    }

    /// Increments a symbol's count and the running character total.
    pub fn tally_vertex(&mut self, id: SymbolId) {
        let symbol = &mut self.symbols[id.index()];
        let old = symbol.count;
        symbol.count = old + 1;
        self.total_chars += symbol.len as u64;
        self.counters.rerank_vertex(id, old, old + 1);
    }

    /// Counts one traversal of `from -> to`, creating the edge on first use.
    pub fn tally_edge(&mut self, from: SymbolId, to: SymbolId) -> EdgeId {
        match self.edge_index.get(&(from, to)) {
            Some(&id) => {
                let edge = &mut self.edges[id.index()];
                let old = edge.count;
                edge.count = old + 1;
                self.counters.rerank_edge(id, old, old + 1);
                id
            }
            None => {
                let id = self.push_edge(Edge::new(from, to));
                self.edges[id.index()].count = 1;
                self.counters.insert_edge(id, 1);
                id
            }
        }
    }

    /// Appends an edge to the arena and links it into its source's out list.
    ///
    /// The caller ranks it.
    pub(crate) fn push_edge(&mut self, edge: Edge) -> EdgeId {
        let id = EdgeId(self.edges.len() as u32);
        self.edge_index.insert((edge.from, edge.to), id);
        self.symbols[edge.from.index()].out_edges.push(id);
        self.edges.push(edge);
        id
    }

    /// Binds an edge to the symbol named by its concatenated digram.
    ///
    /// An edge is promoted at most once; later calls return the existing
    /// representative unchanged.
    pub(crate) fn promote(&mut self, id: EdgeId) -> SymbolId {
        let edge = &self.edges[id.index()];
        if let Some(rep) = edge.rep_symbol {
            return rep;
        }

        let (from, to) = (edge.from, edge.to);
        let mut name = String::with_capacity(
            self.symbols[from.index()].name.len() + self.symbols[to.index()].name.len(),
        );
        name.push_str(&self.symbols[from.index()].name);
        name.push_str(&self.symbols[to.index()].name);

        let reused = self.names.contains_key(name.as_str());
        let rep = self.get_or_create(&name);
        self.edges[id.index()].rep_symbol = Some(rep);

        tracing::debug!(edge = %id, %from, %to, symbol = %rep, reused, "promoted digram");
        rep
    }

    /// Returns every symbol whose name starts with `prefix`, in name order.
    ///
    /// An empty prefix yields nothing.
    pub fn starts_with(&self, prefix: &str) -> PrefixRange<'_> {
        if prefix.is_empty() {
            return PrefixRange { inner: None };
        }

        let upper = prefix_upper_bound(prefix);
        let end = match &upper {
            Some(bound) => Bound::Excluded(bound.as_str()),
            None => Bound::Unbounded,
        };
        let range = self
            .names
            .range::<str, _>((Bound::Included(prefix), end));

        PrefixRange { inner: Some(range) }
    }

    pub fn root(&self) -> SymbolId {
        SymbolId::ROOT
    }

    /// Returns the symbol with the given ID.
    ///
    /// Panics if the ID does not belong to this graph.
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    /// Returns the edge with the given ID.
    ///
    /// Panics if the ID does not belong to this graph.
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    /// All symbols in ID order.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> + '_ {
        self.symbols.iter()
    }

    /// All edges in creation order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, edge)| (EdgeId(i as u32), edge))
    }

    /// Outgoing edges of `id`, oldest first.
    pub fn out_edges(&self, id: SymbolId) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.symbols[id.index()]
            .out_edges
            .iter()
            .map(move |&e| (e, &self.edges[e.index()]))
    }

    /// Number of symbols, root included.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false: a graph holds at least its root.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Total characters observed, summed over every symbol tally.
    pub fn total_chars(&self) -> u64 {
        self.total_chars
    }

    /// The `k` most frequent symbols, most frequent first.
    pub fn top_symbols(&self, k: usize) -> impl Iterator<Item = &Symbol> + '_ {
        self.counters
            .top_vertices(k)
            .map(move |(_, id)| &self.symbols[id.index()])
    }

    /// The `k` least frequent symbols, least frequent first.
    ///
    /// These are the natural candidates for pruning.
    pub fn rarest_symbols(&self, k: usize) -> impl Iterator<Item = &Symbol> + '_ {
        self.counters
            .bottom_vertices(k)
            .map(move |(_, id)| &self.symbols[id.index()])
    }

    /// The `k` most traversed edges, most traversed first.
    pub fn top_edges(&self, k: usize) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.counters
            .top_edges(k)
            .map(move |(_, id)| (id, &self.edges[id.index()]))
    }

    /// Checks that every index agrees with the arenas.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.names.len(), self.symbols.len());
        assert_eq!(self.counters.vertex_len(), self.symbols.len());
        assert_eq!(self.counters.edge_len(), self.edges.len());
        assert_eq!(self.edge_index.len(), self.edges.len());

        let mut total = 0u64;
        for (i, symbol) in self.symbols.iter().enumerate() {
            assert_eq!(symbol.id.index(), i);
            assert_eq!(self.names.get(symbol.name.as_str()), Some(&symbol.id));
            assert!(self.counters.contains_vertex(symbol.id, symbol.count));
            total += symbol.count * symbol.len as u64;
        }
        assert_eq!(total, self.total_chars);

        for (id, edge) in self.edges() {
            assert!(edge.count >= 1);
            assert_eq!(self.edge_index.get(&(edge.from, edge.to)), Some(&id));
            assert!(self.counters.contains_edge(id, edge.count));
            assert!(self.symbols[edge.from.index()].out_edges.contains(&id));
        }
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the symbols matching a prefix query.
pub struct PrefixRange<'a> {
    inner: Option<btree_map::Range<'a, String, SymbolId>>,
}

impl<'a> Iterator for PrefixRange<'a> {
    type Item = (&'a str, SymbolId);

    fn next(&mut self) -> Option<Self::Item> {
        let (name, &id) = self.inner.as_mut()?.next()?;
        Some((name.as_str(), id))
    }
}

impl DoubleEndedIterator for PrefixRange<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let (name, &id) = self.inner.as_mut()?.next_back()?;
        Some((name.as_str(), id))
    }
}

/// Smallest string greater than every string that starts with `prefix`.
///
/// Trailing `char::MAX` characters cannot be incremented and are dropped
/// first. Returns `None` when nothing is left, meaning the range is open
/// ended.
fn prefix_upper_bound(prefix: &str) -> Option<String> {
    let mut chars: Vec<char> = prefix.chars().collect();
    while let Some(last) = chars.pop() {
        if let Some(next) = next_char(last) {
            chars.push(next);
            return Some(chars.into_iter().collect());
        }
    }
    None
}

/// The next Unicode scalar value, skipping the surrogate gap.
fn next_char(c: char) -> Option<char> {
    match c {
        char::MAX => None,
        '\u{D7FF}' => Some('\u{E000}'),
        _ => char::from_u32(c as u32 + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names<'a>(range: PrefixRange<'a>) -> Vec<&'a str> {
        range.map(|(name, _)| name).collect()
    }

    #[test]
    fn test_new_has_root() {
        let graph = Graph::new();
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.find(""), Some(SymbolId::ROOT));
        assert_eq!(graph.symbol(graph.root()).name(), "");
        graph.assert_consistent();
    }

    #[test]
    fn test_get_or_create_idempotent() {
        let mut graph = Graph::new();
        let a = graph.get_or_create("a");
        let len = graph.len();
        assert_eq!(graph.get_or_create("a"), a);
        assert_eq!(graph.len(), len);
        assert_eq!(graph.symbol(a).count(), 0);
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut graph = Graph::new();
        let a = graph.get_or_create("a");
        let b = graph.get_or_create("b");
        assert_eq!(a.get(), 2);
        assert_eq!(b.get(), 3);
    }

    #[test]
    fn test_nul_char_is_root() {
        let mut graph = Graph::new();
        assert_eq!(graph.get_or_create_char('\0'), SymbolId::ROOT);
        assert_eq!(graph.len(), 1);
        let x = graph.get_or_create_char('x');
        assert_eq!(graph.find("x"), Some(x));
    }

    #[test]
    fn test_tally_vertex_tracks_total_chars() {
        let mut graph = Graph::new();
        let ab = graph.get_or_create("ab");
        let c = graph.get_or_create("c");
        graph.tally_vertex(ab);
        graph.tally_vertex(ab);
        graph.tally_vertex(c);
        graph.tally_vertex(SymbolId::ROOT);

        assert_eq!(graph.symbol(ab).count(), 2);
        assert_eq!(graph.total_chars(), 5);
        graph.assert_consistent();
    }

    #[test]
    fn test_tally_edge_create_or_increment() {
        let mut graph = Graph::new();
        let a = graph.get_or_create("a");
        let b = graph.get_or_create("b");

        let e1 = graph.tally_edge(a, b);
        assert_eq!(graph.edge(e1).count(), 1);
        let e2 = graph.tally_edge(a, b);
        assert_eq!(e1, e2);
        assert_eq!(graph.edge(e1).count(), 2);
        assert_eq!(graph.edge_count(), 1);

        let back = graph.tally_edge(b, a);
        assert_ne!(back, e1);
        assert_eq!(graph.find_edge(b, a), Some(back));
        assert_eq!(graph.out_edges(a).count(), 1);
        graph.assert_consistent();
    }

    #[test]
    fn test_promote_once() {
        let mut graph = Graph::new();
        let a = graph.get_or_create("a");
        let n = graph.get_or_create("n");
        let e = graph.tally_edge(a, n);

        let an = graph.promote(e);
        assert_eq!(graph.symbol(an).name(), "an");
        assert_eq!(graph.edge(e).rep_symbol(), Some(an));

        let len = graph.len();
        assert_eq!(graph.promote(e), an);
        assert_eq!(graph.len(), len);
    }

    #[test]
    fn test_promote_reuses_existing_name() {
        let mut graph = Graph::new();
        let an = graph.get_or_create("an");
        let a = graph.get_or_create("a");
        let n = graph.get_or_create("n");
        let e = graph.tally_edge(a, n);
        assert_eq!(graph.promote(e), an);
    }

    #[test]
    fn test_starts_with_empty_prefix() {
        let mut graph = Graph::new();
        graph.get_or_create("a");
        assert_eq!(graph.starts_with("").count(), 0);
    }

    #[test]
    fn test_starts_with_basic() {
        let mut graph = Graph::new();
        for name in ["b", "ba", "ban", "c", "a", "bz", "b\u{10ffff}"] {
            graph.get_or_create(name);
        }
        assert_eq!(
            names(graph.starts_with("b")),
            vec!["b", "ba", "ban", "bz", "b\u{10ffff}"]
        );
        assert_eq!(names(graph.starts_with("ba")), vec!["ba", "ban"]);
        assert!(names(graph.starts_with("x")).is_empty());
    }

    #[test]
    fn test_starts_with_max_char_boundary() {
        let mut graph = Graph::new();
        let max = char::MAX;
        let only_max = max.to_string();
        let max_then_a = format!("{max}a");
        let a_max = format!("a{max}");
        let a_max_b = format!("a{max}b");
        for name in [only_max.as_str(), max_then_a.as_str(), "a", a_max.as_str(), a_max_b.as_str(), "b"] {
            graph.get_or_create(name);
        }

        assert_eq!(
            names(graph.starts_with(&only_max)),
            vec![only_max.as_str(), max_then_a.as_str()]
        );
        assert_eq!(
            names(graph.starts_with(&a_max)),
            vec![a_max.as_str(), a_max_b.as_str()]
        );
    }

    #[test]
    fn test_upper_bound_skips_surrogates() {
        assert_eq!(prefix_upper_bound("a"), Some("b".to_string()));
        assert_eq!(prefix_upper_bound("\u{D7FF}"), Some("\u{E000}".to_string()));
        assert_eq!(prefix_upper_bound("x\u{10ffff}"), Some("y".to_string()));
        assert_eq!(prefix_upper_bound("\u{10ffff}\u{10ffff}"), None);
    }

    #[test]
    fn test_top_and_rarest_symbols() {
        let mut graph = Graph::new();
        let a = graph.get_or_create("a");
        let b = graph.get_or_create("b");
        for _ in 0..3 {
            graph.tally_vertex(a);
        }
        graph.tally_vertex(b);

        let top: Vec<_> = graph.top_symbols(2).map(|s| s.id()).collect();
        assert_eq!(top, vec![a, b]);
        let rarest: Vec<_> = graph.rarest_symbols(1).map(|s| s.id()).collect();
        assert_eq!(rarest, vec![SymbolId::ROOT]);
    }
}
