//! CLI-specific rendering of query outcomes
//!
//! Maps each library outcome to terminal output and a distinct process
//! exit code so scripts can branch on "no route" versus bad data.

use butterfly_ecoroute::{Error, Path};
use serde::Serialize;

/// Exit code for a query that found no route
pub const EXIT_NO_PATH: i32 = 2;
/// Exit code for an endpoint missing from the graph
pub const EXIT_UNKNOWN_NODE: i32 = 3;
/// Exit code for unusable input data or configuration
pub const EXIT_BAD_DATA: i32 = 4;
/// Exit code for an internal invariant violation (EX_SOFTWARE)
pub const EXIT_INTERNAL: i32 = 70;

/// Exit code for a failed query
pub fn exit_code(err: &Error) -> i32 {
    match err {
        Error::NoPathFound { .. } => EXIT_NO_PATH,
        Error::UnknownNode { .. } => EXIT_UNKNOWN_NODE,
        Error::InvalidSignal { .. } | Error::SignalsUnavailable(_) | Error::InvalidConfig(_) => {
            EXIT_BAD_DATA
        }
        Error::InvalidWeight { .. } => EXIT_INTERNAL,
        Error::Io(_) => 1,
    }
}

/// Human-readable message for a failed query
pub fn describe_error(err: &Error) -> String {
    match err {
        Error::NoPathFound { .. } => format!("🚫 {err}"),
        Error::UnknownNode { .. } => format!("❓ {err}"),
        Error::InvalidSignal { .. } | Error::SignalsUnavailable(_) | Error::InvalidConfig(_) => {
            format!("⚠️  Data problem: {err}")
        }
        Error::InvalidWeight { .. } => format!("💥 {err} (please report this bug)"),
        Error::Io(_) => format!("❌ {err}"),
    }
}

#[derive(Serialize)]
struct JsonRoute<'a> {
    nodes: &'a [String],
    hops: usize,
    total_weight: f64,
}

/// Render a found route
pub fn render_path(path: &Path<String>, json: bool) -> String {
    if json {
        let route = JsonRoute {
            nodes: path.nodes(),
            hops: path.edge_count(),
            total_weight: path.total_weight(),
        };
        // Serializing plain strings and numbers cannot fail
        serde_json::to_string(&route).unwrap_or_default()
    } else {
        format!(
            "🛣️  {}\n   hops: {}, total cost: {:.2}",
            path,
            path.edge_count(),
            path.total_weight()
        )
    }
}
