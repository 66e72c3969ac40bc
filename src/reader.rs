use crate::edge::EdgeId;
use crate::graph::Graph;
use crate::learner::Learner;
use crate::symbol::SymbolId;
use crate::watch::{Step, Watch};
use std::collections::BTreeSet;

/// Online update engine over one graph.
///
/// The reader holds the set of symbols consistent with everything read so
/// far (the active set) and the watches following in-progress matches of
/// longer symbols. Each call to [`advance`](Reader::advance) counts the new
/// transitions, advances the watches, consults the learner and rebuilds both
/// sets for the next character.
///
/// The reader borrows its graph mutably, so a graph has at most one writer.
///
/// # Example
///
/// ```
/// use runes_rs::{FixedThreshold, Graph, Reader};
///
/// let mut graph = Graph::new();
/// let mut reader = Reader::new(&mut graph, FixedThreshold(2));
/// reader.extend("bananabanana".chars());
///
/// assert!(reader.graph().find("an").is_some());
/// ```
pub struct Reader<'g, L> {
    graph: &'g mut Graph,
    learner: L,
    active: BTreeSet<SymbolId>,
    pending: BTreeSet<Watch>,
}

impl<'g, L: Learner> Reader<'g, L> {
    /// Creates a reader starting at the root symbol.
    pub fn new(graph: &'g mut Graph, learner: L) -> Self {
        Self::with_start(graph, learner, "")
    }

    /// Creates a reader whose active set starts at the symbol named `start`.
    pub fn with_start(graph: &'g mut Graph, learner: L, start: &str) -> Self {
        let start = graph.get_or_create(start);
        let active = BTreeSet::from([start]);
        let pending = graph
            .symbol(start)
            .out_edges()
            .iter()
            .map(|&e| Watch::new(&*graph, e))
            .collect();

        Self {
            graph,
            learner,
            active,
            pending,
        }
    }

    /// Applies one input character.
    ///
    /// NUL resolves to the root symbol like any other character; stream
    /// readers should stop before it, as [`extend`](Reader::extend) does.
    pub fn advance(&mut self, c: char) {
        let vc = self.graph.get_or_create_char(c);

        let mut completed = BTreeSet::from([vc]);
        let mut resolved: BTreeSet<EdgeId> = BTreeSet::new();
        let mut carried: BTreeSet<Watch> = BTreeSet::new();

        for &s in &self.active {
            resolved.insert(self.graph.tally_edge(s, vc));
        }

        for watch in std::mem::take(&mut self.pending) {
            // Already counted through the active set this round
            if resolved.contains(&watch.edge) {
                continue;
            }

            match watch.step(self.graph, c) {
                Step::Pending(moved) => {
                    carried.insert(moved);
                }
                Step::Complete => {
                    let e = self.graph.tally_edge(watch.source, watch.target);
                    completed.insert(watch.target);
                    if !self.graph.edge(e).is_promoted() {
                        resolved.insert(e);
                    }
                }
                Step::Mismatch => {}
            }
        }

        let resolved_len = resolved.len();
        for e in resolved {
            let edge = self.graph.edge(e);
            if edge.is_promoted() || !self.learner.should_promote(self.graph, edge) {
                continue;
            }
            completed.insert(self.graph.promote(e));
        }

        for &v in &completed {
            self.graph.tally_vertex(v);
            for &e in self.graph.symbol(v).out_edges() {
                carried.insert(Watch::new(self.graph, e));
            }
        }

        tracing::trace!(
            input = ?c,
            active = completed.len(),
            pending = carried.len(),
            resolved = resolved_len,
            "advanced"
        );

        self.active = completed;
        self.pending = carried;
    }

    /// Applies characters in order, stopping at the first NUL.
    pub fn extend<I: IntoIterator<Item = char>>(&mut self, iter: I) {
        for c in iter {
            if c == '\0' {
                break;
            }
            self.advance(c);
        }
    }

    /// Symbols consistent with the input so far, in ID order.
    pub fn active(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.active.iter().copied()
    }

    /// Number of in-progress partial matches.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn graph(&self) -> &Graph {
        self.graph
    }

    pub fn learner(&self) -> &L {
        &self.learner
    }

    pub(crate) fn active_set(&self) -> &BTreeSet<SymbolId> {
        &self.active
    }
}
