//! Store sales dataset handling for forecasting

use crate::error::{ForecastError, Result};
use chrono::{Datelike, Duration, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Canonical column names of the cleaned dataset.
///
/// These must match the columns the frozen model was trained on; renaming
/// them here without re-exporting the model artifact will silently degrade
/// every forecast.
pub mod columns {
    pub const STORE: &str = "Store";
    pub const DATE: &str = "Date";
    pub const SALES: &str = "Sales";
    pub const YEAR: &str = "Year";
    pub const MONTH: &str = "Month";
    pub const DAY: &str = "Day";
    pub const DAY_OF_WEEK: &str = "DayOfWeek";
    pub const LAG_1: &str = "Lag_1";
    pub const LAG_7: &str = "Lag_7";
    pub const ROLLING_MEAN_7: &str = "Rolling_Mean_7";
    pub const ROLLING_MEAN_14: &str = "Rolling_Mean_14";
    pub const ROLLING_MEAN_30: &str = "Rolling_Mean_30";
}

const CORE_COLUMNS: [&str; 12] = [
    columns::STORE,
    columns::DATE,
    columns::SALES,
    columns::YEAR,
    columns::MONTH,
    columns::DAY,
    columns::DAY_OF_WEEK,
    columns::LAG_1,
    columns::LAG_7,
    columns::ROLLING_MEAN_7,
    columns::ROLLING_MEAN_14,
    columns::ROLLING_MEAN_30,
];

/// A single feature value carried by a record outside the core column set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    /// Numeric feature, used as-is by the model
    Numeric(f64),
    /// Categorical feature, expanded into indicator columns at alignment time
    Categorical(String),
}

/// A raw, unlabeled feature row keyed by column name
pub type FeatureRow = BTreeMap<String, FeatureValue>;

/// One store-day observation with its precomputed feature columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub store_id: String,
    pub date: NaiveDate,
    pub sales: f64,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Day of week with Monday = 0, matching the convention the model was trained with
    pub day_of_week: u32,
    pub lag_1: f64,
    pub lag_7: f64,
    pub rolling_mean_7: f64,
    pub rolling_mean_14: f64,
    pub rolling_mean_30: f64,
    /// Any further dataset columns (store attributes, promo flags, ...),
    /// carried forward unchanged onto synthetic records
    pub extras: BTreeMap<String, FeatureValue>,
}

impl SalesRecord {
    /// Create a record with calendar fields derived from the date.
    ///
    /// Lag and rolling-mean fields start at zero; the CSV loader overwrites
    /// them with the precomputed values from the cleaned dataset.
    pub fn new(store_id: impl Into<String>, date: NaiveDate, sales: f64) -> Self {
        Self {
            store_id: store_id.into(),
            date,
            sales,
            year: date.year(),
            month: date.month(),
            day: date.day(),
            day_of_week: date.weekday().num_days_from_monday(),
            lag_1: 0.0,
            lag_7: 0.0,
            rolling_mean_7: 0.0,
            rolling_mean_14: 0.0,
            rolling_mean_30: 0.0,
            extras: BTreeMap::new(),
        }
    }

    /// Attach an extra feature column to this record
    pub fn with_extra(mut self, name: impl Into<String>, value: FeatureValue) -> Self {
        self.extras.insert(name.into(), value);
        self
    }
}

/// Immutable per-process collection of store histories, ordered by date
/// within each store.
///
/// Loaded once and shared read-only across requests; forecast runs copy the
/// slice they need and never write back.
#[derive(Debug, Clone)]
pub struct SalesDataset {
    stores: BTreeMap<String, Vec<SalesRecord>>,
}

/// Data loader for the cleaned store sales dataset
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load the dataset from a cleaned CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<SalesDataset> {
        let file = File::open(path.as_ref())?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        let dataset = Self::from_dataframe(&df)?;
        info!(
            "loaded {} records across {} stores from {:?}",
            dataset.len(),
            dataset.store_count(),
            path.as_ref()
        );
        Ok(dataset)
    }

    /// Build the dataset from an existing DataFrame
    pub fn from_dataframe(df: &DataFrame) -> Result<SalesDataset> {
        if df.height() == 0 {
            return Err(ForecastError::DataError("dataset is empty".to_string()));
        }

        let stores = store_keys(required_column(df, columns::STORE)?)?;
        let dates = date_column(required_column(df, columns::DATE)?)?;
        let sales = numeric_column(required_column(df, columns::SALES)?)?;
        let years = numeric_column(required_column(df, columns::YEAR)?)?;
        let months = numeric_column(required_column(df, columns::MONTH)?)?;
        let days = numeric_column(required_column(df, columns::DAY)?)?;
        let dows = numeric_column(required_column(df, columns::DAY_OF_WEEK)?)?;
        let lag_1 = numeric_column(required_column(df, columns::LAG_1)?)?;
        let lag_7 = numeric_column(required_column(df, columns::LAG_7)?)?;
        let rm_7 = numeric_column(required_column(df, columns::ROLLING_MEAN_7)?)?;
        let rm_14 = numeric_column(required_column(df, columns::ROLLING_MEAN_14)?)?;
        let rm_30 = numeric_column(required_column(df, columns::ROLLING_MEAN_30)?)?;

        // Every non-core column rides along as an extra feature
        let mut extra_columns: Vec<(String, Vec<FeatureValue>)> = Vec::new();
        for name in df.get_column_names() {
            if CORE_COLUMNS.contains(&name) {
                continue;
            }
            let series = df.column(name)?;
            let values = match series.dtype() {
                DataType::Utf8 => series
                    .utf8()?
                    .into_iter()
                    .map(|opt| {
                        opt.map(|s| FeatureValue::Categorical(s.to_string()))
                            .ok_or_else(|| null_error(name))
                    })
                    .collect::<Result<Vec<_>>>()?,
                _ => numeric_column(series)?
                    .into_iter()
                    .map(FeatureValue::Numeric)
                    .collect(),
            };
            extra_columns.push((name.to_string(), values));
        }

        let mut records = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let extras = extra_columns
                .iter()
                .map(|(name, values)| (name.clone(), values[i].clone()))
                .collect();
            records.push(SalesRecord {
                store_id: stores[i].clone(),
                date: dates[i],
                sales: sales[i],
                year: years[i] as i32,
                month: months[i] as u32,
                day: days[i] as u32,
                day_of_week: dows[i] as u32,
                lag_1: lag_1[i],
                lag_7: lag_7[i],
                rolling_mean_7: rm_7[i],
                rolling_mean_14: rm_14[i],
                rolling_mean_30: rm_30[i],
                extras,
            });
        }

        SalesDataset::from_records(records)
    }
}

impl SalesDataset {
    /// Group records by store and sort each history by date.
    ///
    /// Rejects duplicate dates within a store; the forecast loop relies on
    /// histories being strictly ascending.
    pub fn from_records(records: Vec<SalesRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(ForecastError::DataError("dataset is empty".to_string()));
        }

        let mut stores: BTreeMap<String, Vec<SalesRecord>> = BTreeMap::new();
        for record in records {
            stores.entry(record.store_id.clone()).or_default().push(record);
        }

        for (store_id, history) in stores.iter_mut() {
            history.sort_by_key(|r| r.date);
            for pair in history.windows(2) {
                if pair[0].date == pair[1].date {
                    return Err(ForecastError::DataError(format!(
                        "duplicate date {} for store {}",
                        pair[0].date, store_id
                    )));
                }
            }
        }

        Ok(Self { stores })
    }

    /// All store ids, in sorted order
    pub fn store_ids(&self) -> Vec<&str> {
        self.stores.keys().map(|s| s.as_str()).collect()
    }

    /// Number of stores in the dataset
    pub fn store_count(&self) -> usize {
        self.stores.len()
    }

    /// Total number of records
    pub fn len(&self) -> usize {
        self.stores.values().map(|h| h.len()).sum()
    }

    /// Check if the dataset is empty
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Full date-ordered history for a store, if present
    pub fn history(&self, store_id: &str) -> Option<&[SalesRecord]> {
        self.stores.get(store_id).map(|h| h.as_slice())
    }

    /// The most recent `n` real observations on or before `cutoff`, as
    /// `(date, sales)` pairs ready to join with a forecast for display
    pub fn recent_history(
        &self,
        store_id: &str,
        cutoff: NaiveDate,
        n: usize,
    ) -> Option<Vec<(NaiveDate, f64)>> {
        let history = self.stores.get(store_id)?;
        let qualifying: Vec<(NaiveDate, f64)> = history
            .iter()
            .filter(|r| r.date <= cutoff)
            .map(|r| (r.date, r.sales))
            .collect();
        let start = qualifying.len().saturating_sub(n);
        Some(qualifying[start..].to_vec())
    }
}

fn required_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map_err(|_| ForecastError::DataError(format!("required column '{}' not found", name)))
}

fn null_error(column: &str) -> ForecastError {
    ForecastError::DataError(format!("null value in column '{}'", column))
}

/// Render the store id column to strings so lookups are uniform regardless
/// of whether the source stores ids as integers or text
fn store_keys(series: &Series) -> Result<Vec<String>> {
    match series.dtype() {
        DataType::Utf8 => series
            .utf8()?
            .into_iter()
            .map(|opt| {
                opt.map(|s| s.to_string())
                    .ok_or_else(|| null_error(columns::STORE))
            })
            .collect(),
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => {
            let cast = series.cast(&DataType::Int64)?;
            cast.i64()?
                .into_iter()
                .map(|opt| {
                    opt.map(|v| v.to_string())
                        .ok_or_else(|| null_error(columns::STORE))
                })
                .collect()
        }
        other => Err(ForecastError::DataError(format!(
            "store id column has unsupported type {:?}",
            other
        ))),
    }
}

/// Parse the date column from either text (`YYYY-MM-DD`) or a native date type
fn date_column(series: &Series) -> Result<Vec<NaiveDate>> {
    match series.dtype() {
        DataType::Utf8 => series
            .utf8()?
            .into_iter()
            .map(|opt| {
                let s = opt.ok_or_else(|| null_error(columns::DATE))?;
                NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
                    ForecastError::DataError(format!("unparsable date '{}': {}", s, e))
                })
            })
            .collect(),
        DataType::Date => {
            let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
            series
                .date()?
                .into_iter()
                .map(|opt| {
                    let days = opt.ok_or_else(|| null_error(columns::DATE))?;
                    Ok(epoch + Duration::days(days as i64))
                })
                .collect()
        }
        other => Err(ForecastError::DataError(format!(
            "date column has unsupported type {:?}",
            other
        ))),
    }
}

/// Extract a numeric column as f64, rejecting nulls
fn numeric_column(series: &Series) -> Result<Vec<f64>> {
    let cast = series.cast(&DataType::Float64).map_err(|_| {
        ForecastError::DataError(format!(
            "column '{}' cannot be converted to f64",
            series.name()
        ))
    })?;
    cast.f64()?
        .into_iter()
        .map(|opt| opt.ok_or_else(|| null_error(series.name())))
        .collect()
}
