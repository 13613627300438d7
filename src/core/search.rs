//! Shortest-path search - Dijkstra over an immutable [`Graph`]
//!
//! Frontier is an addressable min-queue keyed by `(tentative distance, node)`.
//! Equal distances settle in ascending node order, neighbors are relaxed in
//! ascending node order, and a predecessor is only replaced by a strictly
//! shorter distance. Among equal-cost paths the one discovered first wins,
//! which makes every query fully deterministic.

use log::{debug, error};
use priority_queue::PriorityQueue;
use serde::Serialize;
use std::cmp::{Ordering, Reverse};
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::core::error::{suggest_node, Error, Result};
use crate::core::graph::Graph;
use crate::core::signal::Node;

/// Route through the graph: at least one node plus its total weight
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Path<N> {
    nodes: Vec<N>,
    total_weight: f64,
}

impl<N: Node> Path<N> {
    /// Zero-edge path from a node to itself
    pub fn trivial(node: N) -> Self {
        Self {
            nodes: vec![node],
            total_weight: 0.0,
        }
    }

    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<N> {
        self.nodes
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn source(&self) -> &N {
        &self.nodes[0]
    }

    pub fn target(&self) -> &N {
        &self.nodes[self.nodes.len() - 1]
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_trivial(&self) -> bool {
        self.nodes.len() == 1
    }
}

impl<N: Node> fmt::Display for Path<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{node}")?;
        }
        Ok(())
    }
}

/// Counters collected during one query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes popped with their final distance
    pub settled: usize,
    /// Edges examined into unsettled nodes
    pub relaxed: usize,
    /// Largest frontier size observed
    pub frontier_peak: usize,
}

/// Tentative distance with a total order (weights are never NaN)
#[derive(Debug, Clone, Copy)]
struct Cost(f64);

impl PartialEq for Cost {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Single-query Dijkstra engine borrowing one graph snapshot
///
/// The graph is only read, so any number of engines may query the same
/// snapshot concurrently.
pub struct ShortestPath<'a, N> {
    graph: &'a Graph<N>,
}

impl<'a, N: Node> ShortestPath<'a, N> {
    pub fn new(graph: &'a Graph<N>) -> Self {
        Self { graph }
    }

    /// Minimum-weight path from `source` to `target`
    pub fn query(&self, source: &N, target: &N) -> Result<Path<N>> {
        self.query_with_stats(source, target).map(|(path, _)| path)
    }

    /// Like [`ShortestPath::query`], also returning search counters
    pub fn query_with_stats(&self, source: &N, target: &N) -> Result<(Path<N>, SearchStats)> {
        self.ensure_known(source)?;
        self.ensure_known(target)?;
        self.ensure_valid_weights()?;

        let mut stats = SearchStats::default();

        if source == target {
            return Ok((Path::trivial(source.clone()), stats));
        }

        let mut dist: HashMap<N, f64> = HashMap::new();
        let mut parent: HashMap<N, N> = HashMap::new();
        let mut settled: HashSet<N> = HashSet::new();
        let mut frontier: PriorityQueue<N, Reverse<(Cost, N)>> = PriorityQueue::new();

        dist.insert(source.clone(), 0.0);
        frontier.push(source.clone(), Reverse((Cost(0.0), source.clone())));
        stats.frontier_peak = 1;

        while let Some((u, Reverse((Cost(d), _)))) = frontier.pop() {
            settled.insert(u.clone());
            stats.settled += 1;

            if u == *target {
                let path = reconstruct_path(&parent, source, target, d);
                debug!(
                    "Route {source} -> {target}: weight {d}, {} hops, settled={}, relaxed={}, frontier_peak={}",
                    path.edge_count(),
                    stats.settled,
                    stats.relaxed,
                    stats.frontier_peak
                );
                return Ok((path, stats));
            }

            for (v, w) in self.graph.neighbors(&u) {
                if settled.contains(v) {
                    continue;
                }

                stats.relaxed += 1;
                let new_dist = d + w;
                if !new_dist.is_finite() {
                    return Err(invalid_weight(&u, v, new_dist));
                }

                let improves = dist.get(v).map_or(true, |&known| new_dist < known);
                if improves {
                    dist.insert(v.clone(), new_dist);
                    parent.insert(v.clone(), u.clone());
                    frontier.push(v.clone(), Reverse((Cost(new_dist), v.clone())));
                }
            }

            stats.frontier_peak = stats.frontier_peak.max(frontier.len());
        }

        debug!(
            "No route {source} -> {target}: settled={}, relaxed={}",
            stats.settled, stats.relaxed
        );

        Err(Error::NoPathFound {
            from: source.to_string(),
            to: target.to_string(),
        })
    }

    /// Dijkstra is only correct if every edge, expanded or not, is finite
    /// and non-negative
    fn ensure_valid_weights(&self) -> Result<()> {
        match self
            .graph
            .edges()
            .find(|(_, w)| !w.is_finite() || *w < 0.0)
        {
            Some((edge, w)) => Err(invalid_weight(edge.from, edge.to, w)),
            None => Ok(()),
        }
    }

    fn ensure_known(&self, node: &N) -> Result<()> {
        if self.graph.contains_node(node) {
            return Ok(());
        }

        let names: Vec<String> = self.graph.nodes().map(|n| n.to_string()).collect();
        let name = node.to_string();
        Err(Error::UnknownNode {
            suggestion: suggest_node(&name, names.iter().map(String::as_str)),
            node: name,
        })
    }
}

/// Minimum-weight path from `source` to `target` in `graph`
///
/// Fails with [`Error::UnknownNode`] if either endpoint is not in the graph,
/// [`Error::NoPathFound`] if the target is unreachable, and
/// [`Error::InvalidWeight`] if any edge weight is negative or non-finite.
pub fn shortest_path<N: Node>(graph: &Graph<N>, source: &N, target: &N) -> Result<Path<N>> {
    ShortestPath::new(graph).query(source, target)
}

fn invalid_weight<N: Node>(from: &N, to: &N, weight: f64) -> Error {
    error!("BUG: invalid weight {weight} on edge {from}->{to} reached the search engine");
    Error::InvalidWeight {
        edge: format!("{from}->{to}"),
        weight,
    }
}

/// Walk parent pointers back from `target`
fn reconstruct_path<N: Node>(
    parent: &HashMap<N, N>,
    source: &N,
    target: &N,
    total_weight: f64,
) -> Path<N> {
    let mut nodes = vec![target.clone()];
    let mut current = target;

    while current != source {
        match parent.get(current) {
            Some(prev) => {
                nodes.push(prev.clone());
                current = prev;
            }
            None => break,
        }
    }

    nodes.reverse();
    Path {
        nodes,
        total_weight,
    }
}
