//! Recursive forecast engine

use crate::align::{ColumnAligner, Schema};
use crate::data::{SalesDataset, SalesRecord};
use crate::error::{ForecastError, Result};
use crate::features::FeatureVectorBuilder;
use crate::predictor::{LinearPredictor, SalesPredictor};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Number of future days forecast per request
pub const HORIZON: usize = 7;

/// Minimum number of qualifying records a store needs before a forecast
pub const MIN_HISTORY: usize = 30;

/// The frozen model and its feature schema, loaded once at startup and
/// shared read-only by every engine instance
#[derive(Debug)]
pub struct ForecastArtifacts {
    schema: Schema,
    predictor: Box<dyn SalesPredictor>,
}

impl ForecastArtifacts {
    /// Bundle a schema with a predictor
    pub fn new(schema: Schema, predictor: Box<dyn SalesPredictor>) -> Self {
        Self { schema, predictor }
    }

    /// Load both artifacts from disk and check that they agree on width
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(schema_path: P, model_path: Q) -> Result<Self> {
        let schema = Schema::load(schema_path)?;
        let predictor = LinearPredictor::load(model_path)?;
        if predictor.expected_features() != schema.len() {
            return Err(ForecastError::ArtifactError(format!(
                "model expects {} features but schema has {} columns",
                predictor.expected_features(),
                schema.len()
            )));
        }
        Ok(Self::new(schema, Box::new(predictor)))
    }

    /// The feature schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The frozen model
    pub fn predictor(&self) -> &dyn SalesPredictor {
        self.predictor.as_ref()
    }
}

/// A forecast request for one store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub store_id: String,
    /// Cutoff date: only records on or before this date seed the forecast
    pub start_date: NaiveDate,
}

/// One forecast day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub sales: f64,
}

/// An ordered 7-day forecast, keyed by date for joining with real history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    points: Vec<ForecastPoint>,
}

impl Forecast {
    /// Create a forecast, validating the horizon
    pub fn new(points: Vec<ForecastPoint>) -> Result<Self> {
        if points.len() != HORIZON {
            return Err(ForecastError::InvalidParameter(format!(
                "forecast must have exactly {} points, got {}",
                HORIZON,
                points.len()
            )));
        }
        Ok(Self { points })
    }

    /// The forecast points, in date order
    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    /// Forecast dates, in order
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Predicted values, in date order
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.sales).collect()
    }

    /// Number of forecast days (always the horizon)
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the forecast is empty (never true for a constructed forecast)
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Serialize the forecast points to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.points)?)
    }

    /// Write the forecast as CSV with `Date` and `Predicted Sales` columns
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["Date", "Predicted Sales"])?;
        for point in &self.points {
            wtr.write_record([point.date.to_string(), point.sales.to_string()])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Drives the recursive 7-day forecast loop for one request at a time.
///
/// Each request copies the store history up to its cutoff date into a
/// private working history, then repeatedly derives features for the next
/// day, aligns them to the model schema, scores them, and appends the
/// scored day back onto the working history so later steps see it. The
/// source dataset and the shared artifacts are never mutated, so engines
/// over the same artifacts can serve concurrent requests independently.
///
/// Forecast-quality caveat: from the second step onward the lag and
/// rolling-mean features are computed over a mix of real and predicted
/// values, so errors compound across the horizon. That is the intended
/// autoregressive behavior.
#[derive(Debug, Clone, Copy)]
pub struct ForecastEngine<'a> {
    artifacts: &'a ForecastArtifacts,
}

impl<'a> ForecastEngine<'a> {
    /// Create an engine over shared artifacts
    pub fn new(artifacts: &'a ForecastArtifacts) -> Self {
        Self { artifacts }
    }

    /// Run a 7-day forecast for one store.
    ///
    /// Fails before any computation if the store is unknown, the start date
    /// precedes the store's earliest record, or fewer than 30 records fall
    /// on or before the start date. A predictor failure mid-loop aborts the
    /// whole request; partial forecasts are never returned.
    pub fn forecast(&self, dataset: &SalesDataset, request: &ForecastRequest) -> Result<Forecast> {
        let history = dataset
            .history(&request.store_id)
            .ok_or_else(|| ForecastError::UnknownStore(request.store_id.clone()))?;

        // history is never empty for a present store
        let earliest = history[0].date;
        if request.start_date < earliest {
            return Err(ForecastError::InvalidDate {
                store: request.store_id.clone(),
                start: request.start_date,
                earliest,
            });
        }

        let mut working: Vec<SalesRecord> = history
            .iter()
            .filter(|r| r.date <= request.start_date)
            .cloned()
            .collect();
        if working.len() < MIN_HISTORY {
            return Err(ForecastError::InsufficientHistory {
                store: request.store_id.clone(),
                needed: MIN_HISTORY,
                got: working.len(),
                cutoff: request.start_date,
            });
        }

        debug!(
            "forecasting {} days for store {} from {} ({} seed records)",
            HORIZON,
            request.store_id,
            request.start_date,
            working.len()
        );

        let aligner = ColumnAligner::new(self.artifacts.schema());
        let mut points = Vec::with_capacity(HORIZON);
        for _ in 0..HORIZON {
            let snapshot = FeatureVectorBuilder::next_snapshot(&working);
            let aligned = aligner.align(&snapshot.feature_row());
            let predicted = self.artifacts.predictor().predict(&aligned)?;
            points.push(ForecastPoint {
                date: snapshot.date,
                sales: predicted,
            });
            working.push(snapshot.into_record(request.store_id.clone(), predicted));
        }

        Forecast::new(points)
    }
}
