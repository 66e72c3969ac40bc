//! Versioned JSON snapshots of a graph.
//!
//! A snapshot restores a graph exactly: symbols with their IDs, names and
//! counts, and edges with their counts and promotion state. Derived state is
//! rebuilt on load rather than stored:
//!
//! - the count-ranked indices,
//! - the character total, which is exactly `Σ count × len(name)` because
//!   `tally_vertex` is its only writer.
//!
//! Reader state (active set and watches) is not part of a snapshot. A
//! resumed session starts a fresh reader at its start symbol.

use crate::edge::Edge;
use crate::error::SnapshotError;
use crate::graph::Graph;
use crate::symbol::{Symbol, SymbolId};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub symbols: Vec<SymbolRecord>,
    pub edges: Vec<EdgeRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRecord {
    pub id: u32,
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: u32,
    pub to: u32,
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rep_symbol_id: Option<u32>,
}

impl Snapshot {
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), SnapshotError> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

impl Graph {
    /// Captures the graph's persistent state.
    pub fn snapshot(&self) -> Snapshot {
        let symbols = self
            .symbols
            .iter()
            .map(|s| SymbolRecord {
                id: s.id.get(),
                name: s.name.clone(),
                count: s.count,
            })
            .collect();

        let edges = self
            .edges
            .iter()
            .map(|e| EdgeRecord {
                from: e.from.get(),
                to: e.to.get(),
                count: e.count,
                rep_symbol_id: e.rep_symbol.map(SymbolId::get),
            })
            .collect();

        Snapshot {
            version: SNAPSHOT_VERSION,
            symbols,
            edges,
        }
    }

    /// Rebuilds a graph from a snapshot, validating it fully first.
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self, SnapshotError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        match snapshot.symbols.first() {
            Some(root) if root.id == SymbolId::ROOT.get() && root.name.is_empty() => {}
            _ => return Err(SnapshotError::MissingRoot),
        }

        let mut graph = Graph::empty();
        let mut headroom = 0u64;

        for record in &snapshot.symbols {
            let expected = graph.id_gen.peek();
            if record.id != expected.get() {
                return Err(SnapshotError::NonContiguousId {
                    expected: expected.get(),
                    found: record.id,
                });
            }
            if let Some(&first) = graph.names.get(record.name.as_str()) {
                return Err(SnapshotError::DuplicateName {
                    name: record.name.clone(),
                    first: first.get(),
                    second: record.id,
                });
            }

            let id = graph.id_gen.get();
            let mut symbol = Symbol::new(id, record.name.clone());
            symbol.count = record.count;

            // Every symbol must be able to take at least one more tally
            let next = record
                .count
                .checked_add(1)
                .and_then(|n| n.checked_mul(symbol.len as u64))
                .ok_or(SnapshotError::CountOverflow)?;
            headroom = headroom
                .checked_add(next)
                .ok_or(SnapshotError::CountOverflow)?;
            graph.total_chars += record.count * symbol.len as u64;

            graph.names.insert(record.name.clone(), id);
            graph.counters.insert_vertex(id, record.count);
            graph.symbols.push(symbol);
        }

        let resolve = |raw: u32, context: &'static str| {
            SymbolId::new(raw)
                .filter(|id| id.index() < graph.symbols.len())
                .ok_or(SnapshotError::UnknownSymbol { id: raw, context })
        };

        let mut edges = Vec::with_capacity(snapshot.edges.len());
        for record in &snapshot.edges {
            let from = resolve(record.from, "edge source")?;
            let to = resolve(record.to, "edge target")?;
            let rep = record
                .rep_symbol_id
                .map(|raw| resolve(raw, "edge representative"))
                .transpose()?;
            if record.count == 0 {
                return Err(SnapshotError::ZeroEdgeCount {
                    from: record.from,
                    to: record.to,
                });
            }
            if record.count == u64::MAX {
                return Err(SnapshotError::CountOverflow);
            }
            if let Some(rep) = rep {
                let head = graph.symbols[from.index()].name.as_str();
                let tail = graph.symbols[to.index()].name.as_str();
                let name = graph.symbols[rep.index()].name.as_str();
                if name.len() != head.len() + tail.len()
                    || !name.starts_with(head)
                    || !name.ends_with(tail)
                {
                    return Err(SnapshotError::RepresentativeMismatch {
                        from: record.from,
                        to: record.to,
                        rep: rep.get(),
                    });
                }
            }
            edges.push(Edge {
                from,
                to,
                count: record.count,
                rep_symbol: rep,
            });
        }

        for edge in edges {
            if graph.edge_index.contains_key(&(edge.from, edge.to)) {
                return Err(SnapshotError::DuplicateEdge {
                    from: edge.from.get(),
                    to: edge.to.get(),
                });
            }
            let count = edge.count;
            let id = graph.push_edge(edge);
            graph.counters.insert_edge(id, count);
        }

        tracing::debug!(
            symbols = graph.len(),
            edges = graph.edge_count(),
            total_chars = graph.total_chars,
            "loaded snapshot"
        );
        Ok(graph)
    }

    /// Writes the graph as a JSON snapshot.
    pub fn save<W: Write>(&self, writer: W) -> Result<(), SnapshotError> {
        let snapshot = self.snapshot();
        tracing::debug!(
            symbols = snapshot.symbols.len(),
            edges = snapshot.edges.len(),
            "saving snapshot"
        );
        snapshot.to_writer(writer)
    }

    /// Reads and validates a JSON snapshot.
    pub fn load<R: Read>(reader: R) -> Result<Self, SnapshotError> {
        Graph::from_snapshot(&Snapshot::from_reader(reader)?)
    }
}
