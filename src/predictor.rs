//! Frozen regression model interface and artifact loading

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Interface to the frozen regression model.
///
/// Implementations must be pure and deterministic; the engine calls
/// `predict` once per forecast step and treats the model as a black box.
pub trait SalesPredictor: std::fmt::Debug + Send + Sync {
    /// Score one schema-aligned feature row
    fn predict(&self, features: &[f64]) -> Result<f64>;

    /// Model name, for logs and diagnostics
    fn name(&self) -> &str;
}

/// A frozen linear regression model loaded from a JSON artifact.
///
/// The artifact is `{"weights": [...], "intercept": ...}` with one weight
/// per schema column, exported at training time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearPredictor {
    weights: Vec<f64>,
    intercept: f64,
}

impl LinearPredictor {
    /// Create a model from its coefficients
    pub fn new(weights: Vec<f64>, intercept: f64) -> Result<Self> {
        if weights.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "model must have at least one weight".to_string(),
            ));
        }
        Ok(Self { weights, intercept })
    }

    /// Load the model artifact from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| {
            ForecastError::ArtifactError(format!(
                "failed to open model artifact {:?}: {}",
                path.as_ref(),
                e
            ))
        })?;
        let model: LinearPredictor = serde_json::from_reader(file).map_err(|e| {
            ForecastError::ArtifactError(format!(
                "failed to parse model artifact {:?}: {}",
                path.as_ref(),
                e
            ))
        })?;
        if model.weights.is_empty() {
            return Err(ForecastError::ArtifactError(
                "model artifact has no weights".to_string(),
            ));
        }
        info!(
            "loaded linear model with {} features from {:?}",
            model.weights.len(),
            path.as_ref()
        );
        Ok(model)
    }

    /// Number of features the model expects per row
    pub fn expected_features(&self) -> usize {
        self.weights.len()
    }
}

impl SalesPredictor for LinearPredictor {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.weights.len() {
            return Err(ForecastError::ForecastFailure(format!(
                "model expects {} features, got {}",
                self.weights.len(),
                features.len()
            )));
        }
        let dot: f64 = self
            .weights
            .iter()
            .zip(features.iter())
            .map(|(w, x)| w * x)
            .sum();
        Ok(dot + self.intercept)
    }

    fn name(&self) -> &str {
        "linear regression"
    }
}
