//! # Butterfly-ecoroute
//!
//! Least-cost routing over road graphs whose edge costs combine several
//! independently sourced signals, such as traffic congestion and emissions
//! impact.
//!
//! The pipeline runs leaf-first on one consistent snapshot per query:
//! a [`SignalProvider`] supplies a [`SignalSet`], a [`CostModel`] turns each
//! edge's metrics into a weight, [`GraphBuilder`] derives an immutable
//! [`Graph`], and [`shortest_path`] finds the minimum-weight [`Path`].
//!
//! ```
//! use butterfly_ecoroute::{shortest_path, CostModel, Edge, Graph, SignalSet};
//!
//! let signals = SignalSet::new()
//!     .with_layer("congestion", [(Edge::new("A", "B"), 2.0), (Edge::new("A", "D"), 1.0)])
//!     .with_layer("emissions", [(Edge::new("A", "B"), 5.0), (Edge::new("A", "D"), 2.0)]);
//!
//! let graph = Graph::build(&signals, &CostModel::default())?;
//! let path = shortest_path(&graph, &"A", &"D")?;
//!
//! assert_eq!(path.nodes(), &["A", "D"]);
//! assert_eq!(path.total_weight(), 2.0);
//! # Ok::<(), butterfly_ecoroute::Error>(())
//! ```

pub mod core;

pub use crate::core::cost::{Combination, CostModel, MetricSpec, CONGESTION, EMISSIONS};
pub use crate::core::error::{Error, Result};
pub use crate::core::graph::{Graph, GraphBuilder};
pub use crate::core::provider::{JsonFileSignals, SignalProvider, StaticSignals};
pub use crate::core::search::{shortest_path, Path, SearchStats, ShortestPath};
pub use crate::core::signal::{metrics, Edge, Metrics, Node, SignalSet};

/// Run one complete query: snapshot, weigh, build, search
///
/// The graph is built fresh from the provider's current snapshot and
/// dropped afterwards. To serve many queries against one snapshot, build a
/// [`Graph`] once and call [`shortest_path`] on it directly.
pub fn route<N, P>(provider: &P, model: &CostModel, source: &N, target: &N) -> Result<Path<N>>
where
    N: Node,
    P: SignalProvider<N> + ?Sized,
{
    let signals = provider.snapshot()?;
    let graph = GraphBuilder::new(model.clone()).build(&signals)?;
    shortest_path(&graph, source, target)
}
