//! Logistic model package: loading, validation, and scoring

use crate::config::Config;
use crate::error::{FraudScopeError, Result};
use crate::schemas::FEATURE_NAMES;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

/// Verdict labels rendered into the result slot.
pub const RESULT_FRAUD: &str = "Fraud Transaction 🚨";
pub const RESULT_LEGIT: &str = "Legitimate Transaction ✅";

/// Trained model package: coefficients, intercept, decision threshold, and
/// the feature order submitted values are resolved against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPackage {
    pub features: Vec<String>,
    pub weights: Vec<f64>,
    pub intercept: f64,
    pub threshold: f64,
}

/// Outcome of scoring one transaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub probability: f64,
    pub is_fraud: bool,
}

impl Prediction {
    pub fn label(&self) -> &'static str {
        if self.is_fraud {
            RESULT_FRAUD
        } else {
            RESULT_LEGIT
        }
    }
}

impl ModelPackage {
    /// Parse and validate a model package from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        let package: ModelPackage =
            serde_json::from_str(json).map_err(|e| FraudScopeError::Model {
                message: format!("Invalid model package JSON: {}", e),
            })?;
        package.validate()
    }

    /// Load a model package from disk.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| FraudScopeError::Model {
            message: format!("Failed to read model package {}: {}", path, e),
        })?;
        Self::from_json(&content)
    }

    fn validate(self) -> Result<Self> {
        if self.features.is_empty() {
            return Err(FraudScopeError::Model {
                message: "Model package has no features".to_string(),
            });
        }
        if self.weights.len() != self.features.len() {
            return Err(FraudScopeError::Model {
                message: format!(
                    "Model package has {} weights for {} features",
                    self.weights.len(),
                    self.features.len()
                ),
            });
        }
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(FraudScopeError::Model {
                message: format!(
                    "Decision threshold {} must lie strictly between 0 and 1",
                    self.threshold
                ),
            });
        }
        Ok(self)
    }

    /// Deterministic built-in package for local runs without a trained model.
    /// Weights are hand-set on the features that dominate fraud separation in
    /// the source dataset.
    pub fn demo() -> Self {
        let weights = FEATURE_NAMES
            .iter()
            .map(|name| match *name {
                "V4" => 0.72,
                "V11" => 0.48,
                "V2" => 0.21,
                "V21" => 0.11,
                "V3" => -0.25,
                "V7" => -0.18,
                "V10" => -0.61,
                "V12" => -0.54,
                "V14" => -0.93,
                "V16" => -0.33,
                "V17" => -0.70,
                "Amount" => 0.0015,
                "Time" => -0.000004,
                _ => 0.0,
            })
            .collect();
        Self {
            features: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            weights,
            intercept: -3.2,
            threshold: 0.42,
        }
    }

    /// Fraud probability for feature values given in this package's order.
    pub fn probability(&self, values: &[f64]) -> f64 {
        let z: f64 = self
            .weights
            .iter()
            .zip(values)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;
        sigmoid(z)
    }

    pub fn predict(&self, values: &[f64]) -> Prediction {
        let probability = self.probability(values);
        Prediction {
            probability,
            is_fraud: probability >= self.threshold,
        }
    }

    /// Resolve submitted form fields against this package's feature order.
    /// Every feature must be present and parse as a float; extra fields are
    /// ignored.
    pub fn ordered_values(&self, fields: &HashMap<String, String>) -> Result<Vec<f64>> {
        self.features
            .iter()
            .map(|feature| {
                let raw = fields.get(feature).ok_or_else(|| FraudScopeError::Validation {
                    message: format!("Missing form field: {}", feature),
                })?;
                raw.trim()
                    .parse::<f64>()
                    .map_err(|_| FraudScopeError::Validation {
                        message: format!("Field {} is not a number: '{}'", feature, raw),
                    })
            })
            .collect()
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Round half-up to 4 decimals for rendering, matching the served page.
pub fn round_probability(p: f64) -> f64 {
    (p * 10_000.0).round() / 10_000.0
}

/// Factory: load the configured package, falling back to the built-in demo
/// package unless strict model loading is enabled.
pub fn load_model(config: &Config) -> Result<ModelPackage> {
    match ModelPackage::load(&config.system.model_path) {
        Ok(package) => {
            info!(
                "Loaded model package from {} ({} features, threshold {})",
                config.system.model_path,
                package.features.len(),
                package.threshold
            );
            Ok(package)
        }
        Err(e) if config.system.model_strict => Err(e),
        Err(e) => {
            warn!("{}; falling back to built-in demo package", e);
            Ok(ModelPackage::demo())
        }
    }
}
