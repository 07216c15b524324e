//! Feature schema artifact and column alignment

use crate::data::{FeatureRow, FeatureValue};
use crate::error::{ForecastError, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::path::Path;
use tracing::info;

/// The ordered list of feature columns the frozen model expects.
///
/// Fixed at training time, loaded once per process, never mutated. Every
/// row handed to the model is projected onto exactly this order.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    /// Build a schema from an ordered column list
    pub fn from_columns(columns: Vec<String>) -> Result<Self> {
        if columns.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "schema must contain at least one column".to_string(),
            ));
        }
        let mut seen = BTreeSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(ForecastError::InvalidParameter(format!(
                    "schema contains duplicate column '{}'",
                    column
                )));
            }
        }
        Ok(Self { columns })
    }

    /// Load the schema artifact (a JSON array of column names)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| {
            ForecastError::ArtifactError(format!(
                "failed to open schema artifact {:?}: {}",
                path.as_ref(),
                e
            ))
        })?;
        let columns: Vec<String> = serde_json::from_reader(file).map_err(|e| {
            ForecastError::ArtifactError(format!(
                "failed to parse schema artifact {:?}: {}",
                path.as_ref(),
                e
            ))
        })?;
        let schema = Self::from_columns(columns)?;
        info!(
            "loaded feature schema with {} columns from {:?}",
            schema.len(),
            path.as_ref()
        );
        Ok(schema)
    }

    /// Column names in model order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if the schema is empty (never true for a constructed schema)
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Check whether a column is part of the schema
    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}

/// Projects raw feature rows onto a fixed schema.
///
/// This is a total function: columns the schema wants but the row lacks
/// are zero-filled, columns the row has but the schema does not want are
/// dropped, and the output length always equals the schema length.
#[derive(Debug, Clone, Copy)]
pub struct ColumnAligner<'a> {
    schema: &'a Schema,
}

impl<'a> ColumnAligner<'a> {
    /// Create an aligner bound to a schema
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Align a raw feature row to the schema order.
    ///
    /// Categorical fields are expanded into `{field}_{value}` indicator
    /// columns first, mirroring how the training pipeline one-hot encoded
    /// them.
    pub fn align(&self, row: &FeatureRow) -> Vec<f64> {
        let expanded = expand_categoricals(row);
        self.schema
            .columns
            .iter()
            .map(|column| expanded.get(column).copied().unwrap_or(0.0))
            .collect()
    }
}

/// One-hot expand categorical fields; numeric fields pass through unchanged
fn expand_categoricals(row: &FeatureRow) -> BTreeMap<String, f64> {
    let mut expanded = BTreeMap::new();
    for (name, value) in row {
        match value {
            FeatureValue::Numeric(v) => {
                expanded.insert(name.clone(), *v);
            }
            FeatureValue::Categorical(level) => {
                expanded.insert(format!("{}_{}", name, level), 1.0);
            }
        }
    }
    expanded
}
