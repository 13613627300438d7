//! Immutable weighted road graph
//!
//! A [`Graph`] is derived once from a [`SignalSet`] and never mutated.
//! Fresher data produces a new graph; derivation helpers such as
//! [`Graph::without_node`] return new snapshots as well.

use log::debug;
use std::collections::{BTreeMap, BTreeSet};

use crate::core::cost::CostModel;
use crate::core::error::Result;
use crate::core::signal::{Edge, Node, SignalSet};

/// Directed graph with one finite, non-negative weight per edge
///
/// Every edge endpoint is in the node set. Adjacency is kept in node order
/// so iteration, and therefore search, is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph<N> {
    pub(crate) nodes: BTreeSet<N>,
    pub(crate) adjacency: BTreeMap<N, BTreeMap<N, f64>>,
}

impl<N: Node> Default for Graph<N> {
    fn default() -> Self {
        Self {
            nodes: BTreeSet::new(),
            adjacency: BTreeMap::new(),
        }
    }
}

impl<N: Node> Graph<N> {
    /// Build a graph from a signal snapshot with the given cost model
    pub fn build(signals: &SignalSet<N>, model: &CostModel) -> Result<Self> {
        GraphBuilder::new(model.clone()).build(signals)
    }

    pub fn contains_node(&self, node: &N) -> bool {
        self.nodes.contains(node)
    }

    /// Nodes in ascending order
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.iter()
    }

    /// All edges with their weights, ordered by `(from, to)`
    pub fn edges(&self) -> impl Iterator<Item = (Edge<&N>, f64)> {
        self.adjacency.iter().flat_map(|(from, targets)| {
            targets
                .iter()
                .map(move |(to, &weight)| (Edge::new(from, to), weight))
        })
    }

    /// Outgoing edges of `node` as `(target, weight)`, ordered by target
    pub fn neighbors<'a>(&'a self, node: &N) -> impl Iterator<Item = (&'a N, f64)> + 'a {
        self.adjacency
            .get(node)
            .into_iter()
            .flat_map(|targets| targets.iter().map(|(to, &weight)| (to, weight)))
    }

    pub fn weight(&self, from: &N, to: &N) -> Option<f64> {
        self.adjacency.get(from)?.get(to).copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(|targets| targets.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total weight along `nodes`, or `None` if a hop is not an edge
    ///
    /// A single known node weighs 0.
    pub fn path_weight(&self, nodes: &[N]) -> Option<f64> {
        match nodes {
            [] => None,
            [only] => self.contains_node(only).then_some(0.0),
            _ => nodes
                .windows(2)
                .map(|hop| self.weight(&hop[0], &hop[1]))
                .sum(),
        }
    }

    /// Snapshot with every edge into or out of `node` removed
    ///
    /// `node` itself stays in the node set.
    pub fn without_incident_edges(&self, node: &N) -> Self {
        let mut adjacency = self.adjacency.clone();
        adjacency.remove(node);
        for targets in adjacency.values_mut() {
            targets.remove(node);
        }
        adjacency.retain(|_, targets| !targets.is_empty());

        Self {
            nodes: self.nodes.clone(),
            adjacency,
        }
    }

    /// Snapshot with `node` and all its edges removed
    pub fn without_node(&self, node: &N) -> Self {
        let mut graph = self.without_incident_edges(node);
        graph.nodes.remove(node);
        graph
    }
}

/// Derives graphs from signal snapshots through a [`CostModel`]
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    model: CostModel,
}

impl GraphBuilder {
    pub fn new(model: CostModel) -> Self {
        Self { model }
    }

    pub fn cost_model(&self) -> &CostModel {
        &self.model
    }

    /// Build a new graph from `signals`
    ///
    /// All-or-nothing: the first edge whose metrics the cost model rejects
    /// aborts the build with [`crate::Error::InvalidSignal`].
    pub fn build<N: Node>(&self, signals: &SignalSet<N>) -> Result<Graph<N>> {
        let mut graph = Graph::default();

        for (edge, metrics) in signals.iter() {
            let weight = self.model.weight(edge, metrics)?;

            graph.nodes.insert(edge.from.clone());
            graph.nodes.insert(edge.to.clone());
            graph
                .adjacency
                .entry(edge.from.clone())
                .or_default()
                .insert(edge.to.clone(), weight);
        }

        debug!(
            "Built graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cost::{CONGESTION, EMISSIONS};
    use crate::core::error::Error;
    use crate::core::signal::metrics;

    fn ring() -> SignalSet<&'static str> {
        SignalSet::new()
            .with_layer(
                CONGESTION,
                [
                    (Edge::new("A", "B"), 2.0),
                    (Edge::new("B", "C"), 1.0),
                    (Edge::new("C", "D"), 3.0),
                    (Edge::new("D", "A"), 1.0),
                ],
            )
            .with_layer(
                EMISSIONS,
                [
                    (Edge::new("A", "B"), 5.0),
                    (Edge::new("B", "C"), 3.0),
                    (Edge::new("C", "D"), 8.0),
                    (Edge::new("D", "A"), 2.0),
                ],
            )
    }

    #[test]
    fn test_build_weights() {
        let graph = Graph::build(&ring(), &CostModel::default()).unwrap();

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.weight(&"A", &"B"), Some(10.0));
        assert_eq!(graph.weight(&"B", &"C"), Some(3.0));
        assert_eq!(graph.weight(&"C", &"D"), Some(24.0));
        assert_eq!(graph.weight(&"D", &"A"), Some(2.0));
        assert_eq!(graph.weight(&"A", &"D"), None);
    }

    #[test]
    fn test_empty_signals_build_empty_graph() {
        let graph = Graph::build(&SignalSet::<&str>::new(), &CostModel::default()).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.nodes().count(), 0);
    }

    #[test]
    fn test_build_is_atomic() {
        let mut signals = ring();
        signals.insert(
            Edge::new("C", "E"),
            metrics([(CONGESTION, -1.0), (EMISSIONS, 1.0)]),
        );

        let err = Graph::build(&signals, &CostModel::default()).unwrap_err();
        match err {
            Error::InvalidSignal { edge, .. } => assert_eq!(edge, "C->E"),
            other => panic!("Expected InvalidSignal, got {other:?}"),
        }
    }

    #[test]
    fn test_rebuild_produces_independent_graph() {
        let builder = GraphBuilder::default();
        let first = builder.build(&ring()).unwrap();

        let mut fresher = ring();
        fresher.insert(
            Edge::new("A", "B"),
            metrics([(CONGESTION, 1.0), (EMISSIONS, 1.0)]),
        );
        let second = builder.build(&fresher).unwrap();

        assert_eq!(first.weight(&"A", &"B"), Some(10.0));
        assert_eq!(second.weight(&"A", &"B"), Some(1.0));
    }

    #[test]
    fn test_neighbors_in_node_order() {
        let signals: SignalSet<&str> = [
            (Edge::new("A", "C"), metrics([(CONGESTION, 1.0)])),
            (Edge::new("A", "B"), metrics([(CONGESTION, 1.0)])),
            (Edge::new("A", "D"), metrics([(CONGESTION, 1.0)])),
        ]
        .into_iter()
        .collect();
        let graph = Graph::build(&signals, &CostModel::default()).unwrap();

        let targets: Vec<&str> = graph.neighbors(&"A").map(|(to, _)| *to).collect();
        assert_eq!(targets, vec!["B", "C", "D"]);
        assert_eq!(graph.neighbors(&"B").count(), 0);
        assert_eq!(graph.neighbors(&"Z").count(), 0);
    }

    #[test]
    fn test_path_weight() {
        let graph = Graph::build(&ring(), &CostModel::default()).unwrap();

        assert_eq!(graph.path_weight(&["A", "B", "C"]), Some(13.0));
        assert_eq!(graph.path_weight(&["A"]), Some(0.0));
        assert_eq!(graph.path_weight(&["A", "C"]), None);
        assert_eq!(graph.path_weight(&["Z"]), None);
        assert_eq!(graph.path_weight(&[]), None);
    }

    #[test]
    fn test_derived_snapshots_leave_original_untouched() {
        let graph = Graph::build(&ring(), &CostModel::default()).unwrap();

        let isolated = graph.without_incident_edges(&"D");
        assert!(isolated.contains_node(&"D"));
        assert_eq!(isolated.edge_count(), 2);
        assert_eq!(isolated.weight(&"C", &"D"), None);

        let removed = graph.without_node(&"D");
        assert!(!removed.contains_node(&"D"));
        assert_eq!(removed.node_count(), 3);

        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.weight(&"C", &"D"), Some(24.0));
    }
}
