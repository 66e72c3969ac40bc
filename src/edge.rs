use crate::symbol::SymbolId;
use std::fmt;

/// Identity of a transition: its position in the graph's edge arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub(crate) u32);

impl EdgeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// A directed, counted transition between two symbols.
///
/// There is at most one edge per ordered `(from, to)` pair. Once an edge has
/// been promoted its representative symbol never changes.
#[derive(Debug, Clone)]
pub struct Edge {
    pub(crate) from: SymbolId,
    pub(crate) to: SymbolId,
    pub(crate) count: u64,
    pub(crate) rep_symbol: Option<SymbolId>,
}

impl Edge {
    pub(crate) fn new(from: SymbolId, to: SymbolId) -> Self {
        Self {
            from,
            to,
            count: 0,
            rep_symbol: None,
        }
    }

    /// The head of the digram.
    pub fn from(&self) -> SymbolId {
        self.from
    }

    /// The tail of the digram.
    pub fn to(&self) -> SymbolId {
        self.to
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// The compound symbol this digram was promoted into, if any.
    pub fn rep_symbol(&self) -> Option<SymbolId> {
        self.rep_symbol
    }

    pub fn is_promoted(&self) -> bool {
        self.rep_symbol.is_some()
    }
}
