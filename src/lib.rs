//! # Runes - Online Symbol Learning
//!
//! Learns a vocabulary of recurring multi-character symbols from a stream of
//! characters, one character at a time, and predicts likely continuations.
//!
//! The engine keeps a directed graph whose vertices are symbols (single
//! characters, plus compounds learned along the way) and whose edges count
//! how often one symbol followed another. For each incoming character a
//! [`Reader`]:
//! 1. counts the transition from every active symbol to the character,
//! 2. advances partial matches of longer symbols,
//! 3. asks a [`Learner`] whether freshly counted digrams deserve to become
//!    symbols of their own,
//! 4. rebuilds its active set for the next character.
//!
//! ## Example
//!
//! ```
//! use runes_rs::{FixedThreshold, Graph, Reader};
//!
//! let mut graph = Graph::new();
//! let mut reader = Reader::new(&mut graph, FixedThreshold(2));
//!
//! reader.extend("the cat sat on the mat".chars());
//! println!("next: {:?}", reader.guess());
//!
//! assert!(graph.find("at").is_some());
//! ```
//!
//! ## Learners
//!
//! - [`FixedThreshold`] promotes a digram after a fixed number of sightings.
//! - [`PoissonSignificance`] promotes a digram only when it is seen
//!   significantly more often than its halves' independent frequencies
//!   predict.
//! - Any `Fn(&Graph, &Edge) -> bool` closure.
//!
//! Symbol IDs are local to one [`Graph`] and not stable across versions.

mod config;
mod counters;
mod dump;
mod edge;
mod error;
mod graph;
mod id_gen;
mod learner;
mod predict;
mod reader;
mod snapshot;
mod symbol;
mod watch;


pub use config::{EngineConfig, LearnerConfig};
pub use dump::Dump;
pub use edge::{Edge, EdgeId};
pub use error::{ConfigError, SnapshotError};
pub use graph::{Graph, PrefixRange};
pub use learner::{FixedThreshold, Learner, Never, Policy, PoissonSignificance};
pub use predict::Scoring;
pub use reader::Reader;
pub use snapshot::{EdgeRecord, Snapshot, SymbolRecord, SNAPSHOT_VERSION};
pub use symbol::{Escaped, Symbol, SymbolId};
