use crate::edge::EdgeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

/// Identity of a symbol within one graph.
///
/// IDs are dense, start at 1 and are handed out in creation order, so the
/// root symbol of every graph is ID 1. Zero is never a valid ID, which keeps
/// `Option<SymbolId>` the same size as the ID itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub(crate) NonZeroU32);

impl SymbolId {
    /// ID of the empty-name root symbol.
    pub const ROOT: SymbolId = SymbolId(NonZeroU32::MIN);

    /// Wraps a raw ID, returning `None` for zero.
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(SymbolId)
    }

    /// Returns the raw numeric ID.
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Position of this symbol in the graph's arena.
    #[inline]
    pub(crate) fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A vertex of the symbol graph: a single character or a learned compound.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub(crate) id: SymbolId,
    pub(crate) name: String,
    /// Length of `name` in chars
    pub(crate) len: usize,
    pub(crate) count: u64,
    /// Outgoing transitions in creation order
    pub(crate) out_edges: Vec<EdgeId>,
}

impl Symbol {
    pub(crate) fn new(id: SymbolId, name: String) -> Self {
        let len = name.chars().count();
        Self {
            id,
            name,
            len,
            count: 0,
            out_edges: Vec::new(),
        }
    }

    pub fn id(&self) -> SymbolId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of characters in the name.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True only for the root symbol.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of times this symbol has been tallied.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Outgoing transitions, oldest first.
    pub fn out_edges(&self) -> &[EdgeId] {
        &self.out_edges
    }

    /// Returns the character at byte offset `pos` of the name, if any.
    #[inline]
    pub(crate) fn char_at(&self, pos: usize) -> Option<char> {
        self.name.get(pos..).and_then(|rest| rest.chars().next())
    }
}

/// Display adapter that renders a symbol name for diagnostics.
///
/// Printable ASCII is written as-is except for `"`, which is backslash
/// escaped. Everything else is written as `\u` followed by at least four hex
/// digits.
pub struct Escaped<'a>(pub &'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                ' '..='~' => write!(f, "{c}")?,
                _ => write!(f, "\\u{:04x}", c as u32)?,
            }
        }
        Ok(())
    }
}
