//! Error types for butterfly-ecoroute
//!
//! Every failure of the weighting and search pipeline is reported as a
//! distinct variant so callers can tell "no route exists" apart from bad
//! input data or an internal defect.

use strsim::{jaro_winkler, normalized_levenshtein};

/// Main error type for butterfly-ecoroute operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A raw metric is negative, non-finite, missing while required, or the
    /// combined weight cannot be represented
    #[error("Invalid signal on edge {edge}: {reason}")]
    InvalidSignal { edge: String, reason: String },

    /// A weight reaching the search engine violates the non-negative, finite
    /// contract. Indicates a bug upstream of the engine.
    #[error("Internal error: edge {edge} carries invalid weight {weight}")]
    InvalidWeight { edge: String, weight: f64 },

    /// Source or target is not a node of the graph
    #[error("Unknown node '{node}'{}", suggestion_hint(.suggestion))]
    UnknownNode {
        node: String,
        suggestion: Option<String>,
    },

    /// Both endpoints exist but no directed path connects them
    #[error("No path found from '{from}' to '{to}'")]
    NoPathFound { from: String, to: String },

    /// The signal provider could not produce a snapshot
    #[error("No signal snapshot available: {0}")]
    SignalsUnavailable(String),

    /// Cost model configuration rejected
    #[error("Invalid cost model: {0}")]
    InvalidConfig(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None => String::new(),
    }
}

impl Error {
    /// Exhaustive search finished without reaching the target
    pub fn is_no_path(&self) -> bool {
        matches!(self, Error::NoPathFound { .. })
    }

    pub fn is_unknown_node(&self) -> bool {
        matches!(self, Error::UnknownNode { .. })
    }

    /// Invariant violation inside the crate, not a data or caller problem
    pub fn is_internal(&self) -> bool {
        matches!(self, Error::InvalidWeight { .. })
    }
}

/// Convenience result type for butterfly-ecoroute operations
pub type Result<T> = std::result::Result<T, Error>;

/// Minimum hybrid similarity for a node name to be offered as a suggestion
const MIN_SIMILARITY: f64 = 0.65;

/// Suggest the closest known node name for a misspelled one
///
/// Scores candidates with Jaro-Winkler (70%) plus normalized Levenshtein
/// (30%) on lowercased names. Returns `None` when the input matches a
/// candidate exactly (ignoring case) or nothing clears the threshold.
/// Ties keep the earliest candidate, so pass candidates in a stable order.
pub fn suggest_node<'a, I>(input: &str, candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let input_lower = input.to_lowercase();
    let mut best_match = None;
    let mut best_score = 0.0f64;

    for candidate in candidates {
        let candidate_lower = candidate.to_lowercase();
        if candidate_lower == input_lower {
            return None;
        }

        let jw_score = jaro_winkler(&input_lower, &candidate_lower);
        let lev_score = normalized_levenshtein(&input_lower, &candidate_lower);
        let score = (jw_score * 0.7) + (lev_score * 0.3);

        if score >= MIN_SIMILARITY && score > best_score {
            best_score = score;
            best_match = Some(candidate.to_string());
        }
    }

    best_match
}
