//! # Demand Forecast
//!
//! A Rust library for recursive per-store retail demand forecasting with a
//! frozen regression model.
//!
//! ## Features
//!
//! - Store sales dataset loading (cleaned CSV with precomputed feature columns)
//! - Recursive 7-day forecasting: each prediction is appended to the working
//!   history so later lag and rolling-mean features reflect it
//! - Column alignment of raw feature rows onto the fixed schema the frozen
//!   model was trained with, including one-hot expansion of categorical fields
//! - Pluggable predictor interface with a JSON-loaded linear model artifact
//! - Forecast accuracy metrics for backtesting against held-out days
//!
//! ## Quick Start
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use chrono::{Duration, NaiveDate};
//! use demand_forecast::align::Schema;
//! use demand_forecast::data::{SalesDataset, SalesRecord};
//! use demand_forecast::engine::{ForecastArtifacts, ForecastEngine, ForecastRequest};
//! use demand_forecast::predictor::LinearPredictor;
//!
//! // 40 days of history for one store
//! let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
//! let records: Vec<SalesRecord> = (0..40)
//!     .map(|i| SalesRecord::new("1", start + Duration::days(i), 100.0 + i as f64))
//!     .collect();
//! let dataset = SalesDataset::from_records(records)?;
//!
//! // Artifacts are loaded once and shared; here they are built in memory
//! let schema = Schema::from_columns(vec!["Lag_1".to_string(), "Rolling_Mean_7".to_string()])?;
//! let predictor = LinearPredictor::new(vec![0.6, 0.4], 0.0)?;
//! let artifacts = ForecastArtifacts::new(schema, Box::new(predictor));
//!
//! // Forecast the 7 days after the last observation
//! let engine = ForecastEngine::new(&artifacts);
//! let request = ForecastRequest {
//!     store_id: "1".to_string(),
//!     start_date: start + Duration::days(39),
//! };
//! let forecast = engine.forecast(&dataset, &request)?;
//! assert_eq!(forecast.len(), 7);
//! # Ok(())
//! # }
//! ```

pub mod align;
pub mod data;
pub mod engine;
pub mod error;
pub mod features;
pub mod metrics;
pub mod predictor;

// Re-export commonly used types
pub use crate::align::{ColumnAligner, Schema};
pub use crate::data::{DataLoader, FeatureRow, FeatureValue, SalesDataset, SalesRecord};
pub use crate::engine::{
    Forecast, ForecastArtifacts, ForecastEngine, ForecastPoint, ForecastRequest, HORIZON,
    MIN_HISTORY,
};
pub use crate::error::{ForecastError, Result};
pub use crate::features::{FeatureSnapshot, FeatureVectorBuilder};
pub use crate::metrics::{forecast_accuracy, ForecastAccuracy};
pub use crate::predictor::{LinearPredictor, SalesPredictor};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
