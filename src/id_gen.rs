use crate::symbol::SymbolId;
use std::num::NonZeroU32;

/// Symbol ID allocator owned by a single graph.
///
/// IDs start at 1 and increase by one per allocation. They are never freed:
/// the graph is append-only, so an ID stays bound to its symbol for the
/// lifetime of the store.
#[derive(Debug, Clone)]
pub(crate) struct IdGenerator {
    next: NonZeroU32,
}

impl IdGenerator {
    /// Creates a new ID generator starting from ID 1.
    pub(crate) fn new() -> Self {
        Self {
            next: NonZeroU32::MIN,
        }
    }

    /// Returns the next unused ID.
    pub(crate) fn get(&mut self) -> SymbolId {
        let id = self.next;
        self.next = id.checked_add(1).expect("symbol id space exhausted");
        SymbolId(id)
    }

    /// Returns the ID the next call to `get` will hand out.
    pub(crate) fn peek(&self) -> SymbolId {
        SymbolId(self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_allocation() {
        let mut gen = IdGenerator::new();
        assert_eq!(gen.get().get(), 1);
        assert_eq!(gen.get().get(), 2);
        assert_eq!(gen.get().get(), 3);
    }

    #[test]
    fn test_peek_does_not_allocate() {
        let mut gen = IdGenerator::new();
        assert_eq!(gen.peek().get(), 1);
        assert_eq!(gen.peek().get(), 1);
        assert_eq!(gen.get().get(), 1);
        assert_eq!(gen.peek().get(), 2);
    }

    #[test]
    fn test_generators_are_independent() {
        let mut a = IdGenerator::new();
        let mut b = IdGenerator::new();
        a.get();
        a.get();
        assert_eq!(b.get().get(), 1);
        assert_eq!(a.get().get(), 3);
    }
}
