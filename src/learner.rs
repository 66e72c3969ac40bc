//! Promotion policies.
//!
//! A learner looks at one edge and decides whether its digram has earned a
//! symbol of its own. Learners only read the graph; the reader performs the
//! promotion.

use crate::edge::Edge;
use crate::graph::Graph;

/// Decides whether a digram edge should become a compound symbol.
///
/// Any `Fn(&Graph, &Edge) -> bool` closure is a learner.
pub trait Learner {
    fn should_promote(&self, graph: &Graph, edge: &Edge) -> bool;
}

impl<F> Learner for F
where
    F: Fn(&Graph, &Edge) -> bool,
{
    fn should_promote(&self, graph: &Graph, edge: &Edge) -> bool {
        self(graph, edge)
    }
}

/// Never promotes anything; the graph only counts transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Never;

impl Learner for Never {
    fn should_promote(&self, _graph: &Graph, _edge: &Edge) -> bool {
        false
    }
}

/// Promotes a digram once it has been seen `threshold` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedThreshold(pub u64);

impl Default for FixedThreshold {
    fn default() -> Self {
        FixedThreshold(10)
    }
}

impl Learner for FixedThreshold {
    fn should_promote(&self, _graph: &Graph, edge: &Edge) -> bool {
        edge.count() >= self.0
    }
}

/// Promotes a digram only when it occurs significantly more often than the
/// independent frequencies of its two halves predict.
///
/// The edge count is treated as binomial with `n` = head count and
/// `p` = tail count / total characters observed. A digram passes when its
/// count exceeds `floor`, exceeds the expectation `n·p`, and the squared
/// excess exceeds `sigma² · n·p·(1-p)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoissonSignificance {
    pub sigma: f64,
    pub floor: u64,
}

impl PoissonSignificance {
    pub const DEFAULT_FLOOR: u64 = 20;

    pub fn new(sigma: f64) -> Self {
        Self {
            sigma,
            floor: Self::DEFAULT_FLOOR,
        }
    }

    pub fn with_floor(sigma: f64, floor: u64) -> Self {
        Self { sigma, floor }
    }

    /// Expectation and variance of the edge count under independence.
    pub fn moments(graph: &Graph, edge: &Edge) -> (f64, f64) {
        let trials = graph.symbol(edge.from()).count() as f64;
        let total = graph.total_chars();
        let p = if total == 0 {
            0.0
        } else {
            graph.symbol(edge.to()).count() as f64 / total as f64
        };
        let expectation = trials * p;
        (expectation, expectation * (1.0 - p))
    }

    /// The significance test on raw statistics.
    pub fn test(&self, count: u64, expectation: f64, variance: f64) -> bool {
        if count <= self.floor {
            return false;
        }
        let observed = count as f64;
        if observed <= expectation {
            return false;
        }
        let excess = observed - expectation;
        excess * excess > self.sigma * self.sigma * variance
    }
}

impl Default for PoissonSignificance {
    fn default() -> Self {
        Self::new(3.0)
    }
}

impl Learner for PoissonSignificance {
    fn should_promote(&self, graph: &Graph, edge: &Edge) -> bool {
        let (expectation, variance) = Self::moments(graph, edge);
        self.test(edge.count(), expectation, variance)
    }
}

/// A learner chosen at runtime, typically from configuration.
///
/// Dispatches by match rather than through a trait object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Policy {
    Never(Never),
    FixedThreshold(FixedThreshold),
    Poisson(PoissonSignificance),
}

impl Learner for Policy {
    #[inline]
    fn should_promote(&self, graph: &Graph, edge: &Edge) -> bool {
        match self {
            Policy::Never(l) => l.should_promote(graph, edge),
            Policy::FixedThreshold(l) => l.should_promote(graph, edge),
            Policy::Poisson(l) => l.should_promote(graph, edge),
        }
    }
}

impl From<Never> for Policy {
    fn from(l: Never) -> Self {
        Policy::Never(l)
    }
}

impl From<FixedThreshold> for Policy {
    fn from(l: FixedThreshold) -> Self {
        Policy::FixedThreshold(l)
    }
}

impl From<PoissonSignificance> for Policy {
    fn from(l: PoissonSignificance) -> Self {
        Policy::Poisson(l)
    }
}
