//! Per-edge signal snapshots
//!
//! A [`SignalSet`] maps each directed [`Edge`] to the raw metrics reported
//! for it (congestion level, emissions estimate, ...). Snapshots are built
//! once per computation and only read afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;

/// Location identifier usable as a graph node
///
/// Ordering is the node's natural order and drives deterministic
/// tie-breaking during search.
pub trait Node: Clone + Eq + Ord + Hash + fmt::Debug + fmt::Display {}

impl<T> Node for T where T: Clone + Eq + Ord + Hash + fmt::Debug + fmt::Display {}

/// Directed edge between two nodes. `(A, B)` and `(B, A)` are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge<N> {
    pub from: N,
    pub to: N,
}

impl<N> Edge<N> {
    pub fn new(from: N, to: N) -> Self {
        Self { from, to }
    }
}

impl<N: fmt::Display> fmt::Display for Edge<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

/// Named raw metrics for one edge
pub type Metrics = BTreeMap<String, f64>;

/// Build a [`Metrics`] record from `(name, value)` pairs
pub fn metrics<'a, I>(pairs: I) -> Metrics
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

/// Snapshot of raw metrics keyed by directed edge
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSet<N> {
    edges: BTreeMap<Edge<N>, Metrics>,
}

impl<N: Node> Default for SignalSet<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Node> SignalSet<N> {
    pub fn new() -> Self {
        Self {
            edges: BTreeMap::new(),
        }
    }

    /// Record metrics for an edge, replacing any earlier record for it
    pub fn insert(&mut self, edge: Edge<N>, metrics: Metrics) -> Option<Metrics> {
        self.edges.insert(edge, metrics)
    }

    /// Merge one independently sourced metric into the snapshot
    ///
    /// Edges not yet present are added with just this metric; a value
    /// already recorded under `metric` for an edge is overwritten.
    pub fn add_layer<I>(&mut self, metric: &str, values: I)
    where
        I: IntoIterator<Item = (Edge<N>, f64)>,
    {
        for (edge, value) in values {
            self.edges
                .entry(edge)
                .or_default()
                .insert(metric.to_string(), value);
        }
    }

    /// Builder-style [`SignalSet::add_layer`]
    pub fn with_layer<I>(mut self, metric: &str, values: I) -> Self
    where
        I: IntoIterator<Item = (Edge<N>, f64)>,
    {
        self.add_layer(metric, values);
        self
    }

    pub fn get(&self, edge: &Edge<N>) -> Option<&Metrics> {
        self.edges.get(edge)
    }

    /// Edges in ascending `(from, to)` order
    pub fn iter(&self) -> impl Iterator<Item = (&Edge<N>, &Metrics)> {
        self.edges.iter()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl<N: Node> FromIterator<(Edge<N>, Metrics)> for SignalSet<N> {
    fn from_iter<I: IntoIterator<Item = (Edge<N>, Metrics)>>(iter: I) -> Self {
        let mut set = SignalSet::new();
        for (edge, metrics) in iter {
            set.insert(edge, metrics);
        }
        set
    }
}
