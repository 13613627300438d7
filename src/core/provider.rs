//! Signal provider boundary
//!
//! Acquiring traffic and environmental data happens outside the routing
//! core. Providers hand over a complete [`SignalSet`] snapshot or report
//! that none is available; the core never retries them.

use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::error::{Error, Result};
use crate::core::signal::{Edge, Metrics, Node, SignalSet};

/// Source of per-edge signal snapshots
pub trait SignalProvider<N: Node> {
    /// Produce the snapshot for one computation
    fn snapshot(&self) -> Result<SignalSet<N>>;
}

/// Provider serving a fixed in-memory snapshot
#[derive(Debug, Clone)]
pub struct StaticSignals<N> {
    signals: SignalSet<N>,
}

impl<N: Node> StaticSignals<N> {
    pub fn new(signals: SignalSet<N>) -> Self {
        Self { signals }
    }
}

impl<N: Node> SignalProvider<N> for StaticSignals<N> {
    fn snapshot(&self) -> Result<SignalSet<N>> {
        Ok(self.signals.clone())
    }
}

/// One edge record of a snapshot file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub metrics: Metrics,
}

/// On-disk snapshot layout
///
/// ```json
/// {"edges": [{"from": "A", "to": "B", "metrics": {"congestion": 2, "emissions": 5}}]}
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub edges: Vec<EdgeRecord>,
}

impl SnapshotFile {
    /// Later records for the same edge replace earlier ones
    pub fn into_signals(self) -> SignalSet<String> {
        self.edges
            .into_iter()
            .map(|record| (Edge::new(record.from, record.to), record.metrics))
            .collect()
    }
}

/// Provider reading a JSON snapshot file on every call
#[derive(Debug, Clone)]
pub struct JsonFileSignals {
    path: PathBuf,
}

impl JsonFileSignals {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SignalProvider<String> for JsonFileSignals {
    fn snapshot(&self) -> Result<SignalSet<String>> {
        let json = std::fs::read_to_string(&self.path).map_err(|e| {
            Error::SignalsUnavailable(format!("cannot read {}: {e}", self.path.display()))
        })?;

        let file: SnapshotFile = serde_json::from_str(&json).map_err(|e| {
            Error::SignalsUnavailable(format!("cannot parse {}: {e}", self.path.display()))
        })?;

        let signals = file.into_signals();
        debug!(
            "Loaded {} edge signals from {}",
            signals.len(),
            self.path.display()
        );
        Ok(signals)
    }
}
