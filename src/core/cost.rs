//! Cost model: raw edge signals to a single traversal weight
//!
//! A [`CostModel`] declares which metrics take part in the weight, what to
//! substitute when a metric is absent, and how present values combine.
//! Every supported combination is associative and monotonic non-decreasing
//! in each metric, so worse traffic or worse emissions never lowers a cost.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::core::error::{Error, Result};
use crate::core::signal::{Edge, Metrics, Node};

/// Congestion level reported by traffic feeds
pub const CONGESTION: &str = "congestion";

/// Emissions impact estimate
pub const EMISSIONS: &str = "emissions";

/// How declared metrics combine into one weight
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Combination {
    /// Product of all declared metrics
    #[default]
    Product,
    /// Sum of all declared metrics
    Sum,
    /// Sum of `coefficient * metric`; metrics without a coefficient use 1.0
    WeightedSum { coefficients: BTreeMap<String, f64> },
}

/// One metric taking part in the weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSpec {
    pub name: String,

    /// Value substituted when the edge has no such metric.
    /// `None` makes the metric required.
    #[serde(default)]
    pub default: Option<f64>,
}

impl MetricSpec {
    pub fn required(name: &str) -> Self {
        Self {
            name: name.to_string(),
            default: None,
        }
    }

    pub fn with_default(name: &str, default: f64) -> Self {
        Self {
            name: name.to_string(),
            default: Some(default),
        }
    }
}

/// Weighting policy applied to every edge of a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    pub metrics: Vec<MetricSpec>,

    #[serde(default)]
    pub combination: Combination,
}

impl Default for CostModel {
    /// Congestion (required) times emissions (defaults to 0 when unreported)
    fn default() -> Self {
        Self {
            metrics: vec![
                MetricSpec::required(CONGESTION),
                MetricSpec::with_default(EMISSIONS, 0.0),
            ],
            combination: Combination::Product,
        }
    }
}

impl CostModel {
    /// Create a validated cost model
    pub fn new(metrics: Vec<MetricSpec>, combination: Combination) -> Result<Self> {
        let model = Self {
            metrics,
            combination,
        };
        model.validate()?;
        Ok(model)
    }

    /// Parse and validate a cost model from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let model: CostModel =
            serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        model.validate()?;
        Ok(model)
    }

    /// Load and validate a cost model from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Check declared defaults and coefficients
    pub fn validate(&self) -> Result<()> {
        if self.metrics.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one metric must be declared".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for spec in &self.metrics {
            if !seen.insert(spec.name.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "metric '{}' declared twice",
                    spec.name
                )));
            }
            if let Some(default) = spec.default {
                if !is_valid_value(default) {
                    return Err(Error::InvalidConfig(format!(
                        "default for '{}' must be finite and non-negative, got {default}",
                        spec.name
                    )));
                }
            }
        }

        if let Combination::WeightedSum { coefficients } = &self.combination {
            for (name, &coefficient) in coefficients {
                if !seen.contains(name.as_str()) {
                    return Err(Error::InvalidConfig(format!(
                        "coefficient given for undeclared metric '{name}'"
                    )));
                }
                // Negative coefficients would break monotonicity
                if !is_valid_value(coefficient) {
                    return Err(Error::InvalidConfig(format!(
                        "coefficient for '{name}' must be finite and non-negative, got {coefficient}"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Compute the traversal weight of `edge` from its raw metrics
    ///
    /// Fails with [`Error::InvalidSignal`] if any reported metric is negative
    /// or non-finite, a required metric is missing, or the combination
    /// overflows. The returned weight is always finite and non-negative.
    pub fn weight<N: Node>(&self, edge: &Edge<N>, metrics: &Metrics) -> Result<f64> {
        let invalid = |reason: String| Error::InvalidSignal {
            edge: edge.to_string(),
            reason,
        };

        for (name, &value) in metrics {
            if !is_valid_value(value) {
                return Err(invalid(format!(
                    "metric '{name}' must be finite and non-negative, got {value}"
                )));
            }
            if !self.metrics.iter().any(|spec| &spec.name == name) {
                debug!("{edge}: ignoring undeclared metric '{name}'");
            }
        }

        let mut values = Vec::with_capacity(self.metrics.len());
        for spec in &self.metrics {
            let value = match (metrics.get(&spec.name), spec.default) {
                (Some(&value), _) => value,
                (None, Some(default)) => default,
                (None, None) => {
                    return Err(invalid(format!("missing required metric '{}'", spec.name)))
                }
            };
            values.push((spec.name.as_str(), value));
        }

        let weight = match &self.combination {
            Combination::Product => values.iter().map(|(_, v)| v).product::<f64>(),
            Combination::Sum => values.iter().map(|(_, v)| v).sum::<f64>(),
            Combination::WeightedSum { coefficients } => values
                .iter()
                .map(|(name, v)| coefficients.get(*name).copied().unwrap_or(1.0) * v)
                .sum::<f64>(),
        };

        if !weight.is_finite() {
            return Err(invalid(format!("combined weight overflows ({weight})")));
        }

        Ok(weight)
    }
}

fn is_valid_value(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::signal::metrics;

    fn ab() -> Edge<&'static str> {
        Edge::new("A", "B")
    }

    #[test]
    fn test_default_model_multiplies() {
        let model = CostModel::default();
        let m = metrics([(CONGESTION, 2.0), (EMISSIONS, 5.0)]);
        assert_eq!(model.weight(&ab(), &m).unwrap(), 10.0);
    }

    #[test]
    fn test_missing_emissions_defaults_to_zero() {
        let model = CostModel::default();
        let m = metrics([(CONGESTION, 3.0)]);
        assert_eq!(model.weight(&ab(), &m).unwrap(), 0.0);
    }

    #[test]
    fn test_missing_required_metric_rejected() {
        let model = CostModel::default();
        let m = metrics([(EMISSIONS, 3.0)]);
        let err = model.weight(&ab(), &m).unwrap_err();
        assert!(matches!(err, Error::InvalidSignal { ref edge, .. } if edge == "A->B"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let model = CostModel::default();
        for bad in [-1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let m = metrics([(CONGESTION, bad), (EMISSIONS, 1.0)]);
            assert!(
                matches!(model.weight(&ab(), &m), Err(Error::InvalidSignal { .. })),
                "value {bad} should be rejected"
            );
        }

        // Undeclared metrics are still validated
        let m = metrics([(CONGESTION, 1.0), ("noise", -4.0)]);
        assert!(matches!(
            model.weight(&ab(), &m),
            Err(Error::InvalidSignal { .. })
        ));
    }

    #[test]
    fn test_undeclared_metric_ignored() {
        let model = CostModel::default();
        let m = metrics([(CONGESTION, 2.0), (EMISSIONS, 4.0), ("noise", 100.0)]);
        assert_eq!(model.weight(&ab(), &m).unwrap(), 8.0);
    }

    #[test]
    fn test_overflow_rejected() {
        let model = CostModel::default();
        let m = metrics([(CONGESTION, f64::MAX), (EMISSIONS, 2.0)]);
        assert!(matches!(
            model.weight(&ab(), &m),
            Err(Error::InvalidSignal { .. })
        ));
    }

    #[test]
    fn test_weighted_sum() {
        let model = CostModel::new(
            vec![
                MetricSpec::required(CONGESTION),
                MetricSpec::with_default(EMISSIONS, 0.0),
            ],
            Combination::WeightedSum {
                coefficients: BTreeMap::from([(EMISSIONS.to_string(), 0.5)]),
            },
        )
        .unwrap();

        let m = metrics([(CONGESTION, 2.0), (EMISSIONS, 8.0)]);
        assert_eq!(model.weight(&ab(), &m).unwrap(), 6.0);
    }

    #[test]
    fn test_monotonic_in_each_metric() {
        let models = [
            CostModel::default(),
            CostModel::new(CostModel::default().metrics, Combination::Sum).unwrap(),
        ];
        let grid = [0.0, 0.5, 1.0, 3.0, 10.0];

        for model in &models {
            for &c in &grid {
                for &e in &grid {
                    let base = model
                        .weight(&ab(), &metrics([(CONGESTION, c), (EMISSIONS, e)]))
                        .unwrap();
                    let worse_c = model
                        .weight(&ab(), &metrics([(CONGESTION, c + 1.0), (EMISSIONS, e)]))
                        .unwrap();
                    let worse_e = model
                        .weight(&ab(), &metrics([(CONGESTION, c), (EMISSIONS, e + 1.0)]))
                        .unwrap();
                    assert!(worse_c >= base && worse_e >= base);
                }
            }
        }
    }

    #[test]
    fn test_validate_rejects_bad_config() {
        assert!(matches!(
            CostModel::new(vec![], Combination::Product),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            CostModel::new(
                vec![MetricSpec::with_default(EMISSIONS, -1.0)],
                Combination::Product
            ),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            CostModel::new(
                vec![MetricSpec::required(CONGESTION), MetricSpec::required(CONGESTION)],
                Combination::Sum
            ),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            CostModel::new(
                vec![MetricSpec::required(CONGESTION)],
                Combination::WeightedSum {
                    coefficients: BTreeMap::from([(CONGESTION.to_string(), -2.0)]),
                }
            ),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            CostModel::new(
                vec![MetricSpec::required(CONGESTION)],
                Combination::WeightedSum {
                    coefficients: BTreeMap::from([("noise".to_string(), 1.0)]),
                }
            ),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_from_json() {
        let model = CostModel::from_json_str(
            r#"{
                "metrics": [
                    {"name": "congestion"},
                    {"name": "emissions", "default": 1.0}
                ],
                "combination": {"weighted_sum": {"coefficients": {"congestion": 2.0}}}
            }"#,
        )
        .unwrap();

        assert_eq!(model.metrics[0], MetricSpec::required(CONGESTION));
        assert_eq!(model.metrics[1].default, Some(1.0));
        // 2 * 3 + 1 * default 1
        let m = metrics([(CONGESTION, 3.0)]);
        assert_eq!(model.weight(&ab(), &m).unwrap(), 7.0);

        // Combination defaults to product
        let model = CostModel::from_json_str(r#"{"metrics": [{"name": "congestion"}]}"#).unwrap();
        assert_eq!(model.combination, Combination::Product);

        assert!(matches!(
            CostModel::from_json_str("{not json"),
            Err(Error::InvalidConfig(_))
        ));
    }
}
