use crate::graph::Graph;
use crate::learner::Learner;
use crate::reader::Reader;
use crate::symbol::SymbolId;
use serde::{Deserialize, Serialize};

/// How candidate continuations are ranked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scoring {
    /// Raw transition count.
    #[default]
    Count,
    /// Transition count times the target's name length, favoring longer
    /// symbols in proportion to how often they follow.
    LengthWeighted,
}

impl Scoring {
    fn score(self, graph: &Graph, count: u64, target: SymbolId) -> u64 {
        match self {
            Scoring::Count => count,
            Scoring::LengthWeighted => count.saturating_mul(graph.symbol(target).len() as u64),
        }
    }
}

impl<L: Learner> Reader<'_, L> {
    /// Proposes the most likely next symbol name by transition count.
    ///
    /// Returns `Some("")` when no active state has been followed by anything
    /// yet, and `None` only if the active set is empty.
    pub fn guess(&self) -> Option<&str> {
        self.guess_with(Scoring::Count)
    }

    /// Like [`guess`](Reader::guess) with an explicit scoring function.
    pub fn guess_with(&self, scoring: Scoring) -> Option<&str> {
        let id = self.guess_symbol(scoring)?;
        Some(self.graph().symbol(id).name())
    }

    /// The symbol behind [`guess_with`](Reader::guess_with).
    ///
    /// Each active state nominates its best outgoing edge (the root if it has
    /// none) and the best nomination wins. Nominations across states are
    /// compared by the same edge score that picked them, not by the
    /// nominated symbols' own counts. Ties keep whichever was seen first,
    /// walking active states by ID and edges by creation order.
    pub fn guess_symbol(&self, scoring: Scoring) -> Option<SymbolId> {
        let graph = self.graph();
        let mut best: Option<(u64, SymbolId)> = None;

        for &state in self.active_set() {
            let nominee = best_successor(graph, state, scoring);
            match best {
                Some((top, _)) if top >= nominee.0 => {}
                _ => best = Some(nominee),
            }
        }

        best.map(|(_, id)| id)
    }
}

/// Highest-scoring successor of `state`, as `(score, target)`.
fn best_successor(graph: &Graph, state: SymbolId, scoring: Scoring) -> (u64, SymbolId) {
    let mut best: Option<(u64, SymbolId)> = None;

    for (_, edge) in graph.out_edges(state) {
        let score = scoring.score(graph, edge.count(), edge.to());
        match best {
            Some((top, _)) if top >= score => {}
            _ => best = Some((score, edge.to())),
        }
    }

    best.unwrap_or((0, graph.root()))
}
