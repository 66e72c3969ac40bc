//! Human-readable dump of a graph.

use crate::graph::Graph;
use crate::symbol::Escaped;
use std::fmt;

/// Display adapter returned by [`Graph::dump`].
///
/// Writes one block per symbol in ID order:
///
/// ```text
/// { id: 3, name: "a", count: 2, out_edges: [
///     { id: 4, count: 2, rep_symbol_id: 5, name: "n", p: 1.0000 }
/// ]}
/// ```
///
/// `p` is the empirical transition probability `edge.count / source.count`
/// and is left out while the source has never been tallied.
pub struct Dump<'a> {
    graph: &'a Graph,
}

impl Graph {
    pub fn dump(&self) -> Dump<'_> {
        Dump { graph: self }
    }
}

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let graph = self.graph;
        for symbol in graph.symbols() {
            write!(
                f,
                "{{ id: {}, name: \"{}\", count: {}, out_edges: [",
                symbol.id(),
                Escaped(symbol.name()),
                symbol.count()
            )?;

            for (i, (_, edge)) in graph.out_edges(symbol.id()).enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                let target = graph.symbol(edge.to());
                write!(
                    f,
                    "\n\t{{ id: {}, count: {}, rep_symbol_id: {}, name: \"{}\"",
                    target.id(),
                    edge.count(),
                    edge.rep_symbol().map_or(0, |id| id.get()),
                    Escaped(target.name())
                )?;
                if symbol.count() > 0 {
                    let p = edge.count() as f64 / symbol.count() as f64;
                    write!(f, ", p: {p:.4}")?;
                }
                f.write_str(" }")?;
            }

            f.write_str("\n]}\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_fresh_graph() {
        let graph = Graph::new();
        assert_eq!(
            graph.dump().to_string(),
            "{ id: 1, name: \"\", count: 0, out_edges: [\n]}\n"
        );
    }

    #[test]
    fn test_dump_edges_and_probability() {
        let mut graph = Graph::new();
        let a = graph.get_or_create("a");
        let q = graph.get_or_create("\"");
        let nl = graph.get_or_create("\n");
        graph.tally_vertex(a);
        graph.tally_vertex(a);
        graph.tally_edge(a, q);
        graph.tally_edge(a, nl);

        let out = graph.dump().to_string();
        assert!(out.contains(
            "{ id: 2, name: \"a\", count: 2, out_edges: [\n\
             \t{ id: 3, count: 1, rep_symbol_id: 0, name: \"\\\"\", p: 0.5000 },\n\
             \t{ id: 4, count: 1, rep_symbol_id: 0, name: \"\\u000a\", p: 0.5000 }\n]}\n"
        ));
    }

    #[test]
    fn test_dump_omits_probability_without_source_count() {
        let mut graph = Graph::new();
        let a = graph.get_or_create("a");
        let b = graph.get_or_create("b");
        graph.tally_edge(a, b);

        let out = graph.dump().to_string();
        assert!(out.contains("{ id: 3, count: 1, rep_symbol_id: 0, name: \"b\" }"));
    }
}
