use crate::edge::EdgeId;
use crate::graph::Graph;
use crate::symbol::SymbolId;

/// A partial match of one edge's target name against upcoming input.
///
/// A watch is spawned at position 0 when its source symbol becomes active and
/// follows the input one character at a time. The first mismatch discards it.
///
/// Ordering is by value (source, target, position), so a set of watches
/// iterates the same way on every run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Watch {
    pub source: SymbolId,
    pub target: SymbolId,
    /// Byte offset into the target's name; equal to its byte length when complete
    pub position: usize,
    /// The `source -> target` edge; determined by the two IDs above
    pub edge: EdgeId,
}

/// Result of feeding one character to a watch.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Step {
    /// Expected character seen, more to come.
    Pending(Watch),
    /// The final character of the target was seen.
    Complete,
    Mismatch,
}

impl Watch {
    /// Starts watching `edge` from the beginning of its target name.
    pub(crate) fn new(graph: &Graph, edge: EdgeId) -> Self {
        let e = graph.edge(edge);
        Self {
            source: e.from(),
            target: e.to(),
            position: 0,
            edge,
        }
    }

    /// The character this watch needs next, or `None` if complete.
    pub(crate) fn expects(&self, graph: &Graph) -> Option<char> {
        graph.symbol(self.target).char_at(self.position)
    }

    pub(crate) fn is_complete(&self, graph: &Graph) -> bool {
        self.position == graph.symbol(self.target).name().len()
    }

    /// Feeds `c` to the watch.
    pub(crate) fn step(self, graph: &Graph, c: char) -> Step {
        match self.expects(graph) {
            Some(expected) if expected == c => {
                let advanced = Watch {
                    position: self.position + c.len_utf8(),
                    ..self
                };
                if advanced.is_complete(graph) {
                    Step::Complete
                } else {
                    Step::Pending(advanced)
                }
            }
            _ => Step::Mismatch,
        }
    }
}
